use std::cell::Cell;
use std::rc::Rc;

/// Asks the host to deliver one more frame, on which the simulation ticks.
pub trait TickScheduler {
    fn request_tick(&mut self);

    fn cancel(&mut self) {}
}

/// Scheduler for driving a simulation by hand. Clones share their counters,
/// so a test can keep one and hand the other to the simulation.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    requests: Rc<Cell<u64>>,
    cancelled: Rc<Cell<bool>>,
}

impl ManualScheduler {
    pub fn requests(&self) -> u64 {
        self.requests.get()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl TickScheduler for ManualScheduler {
    fn request_tick(&mut self) {
        self.requests.set(self.requests.get() + 1);
    }

    fn cancel(&mut self) {
        self.cancelled.set(true);
    }
}
