use eframe::egui::{self, Pos2, Rect, Ui};

use crate::interaction::Click;

use super::super::ViewModel;

impl ViewModel {
    /// Feeds canvas pointer input to the interaction layer in surface
    /// coordinates, i.e. relative to the canvas corner.
    pub(in crate::app) fn handle_graph_pointer(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let (pointer, pressed, released) = ui.input(|input| {
            (
                input.pointer.interact_pos(),
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
            )
        });
        let local = pointer.map(|pointer| to_local(rect, pointer));
        let gesture_active =
            self.interaction.dragged().is_some() || self.interaction.is_panning();

        match local {
            Some(local) if pressed && response.hovered() => {
                self.interaction
                    .pointer_pressed(local, &mut self.simulation, &self.viewport);
            }
            Some(local) if response.hovered() || gesture_active => {
                self.interaction
                    .pointer_moved(local, &mut self.simulation, &mut self.viewport);
            }
            _ => self.interaction.hover(None, &self.simulation, &self.viewport),
        }

        if released {
            match self.interaction.pointer_released(&mut self.simulation) {
                Some(Click::Node(id)) => tracing::debug!(%id, "node clicked"),
                Some(Click::Background) | None => {}
            }
        }

        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.viewport.pan_by(response.drag_delta());
        }

        if self.interaction.dragged().is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        } else if self.interaction.hovered().is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
    }

    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let (scroll, pinch, pointer) = ui.input(|input| {
            (
                input.raw_scroll_delta.y,
                input.zoom_delta(),
                input.pointer.hover_pos(),
            )
        });
        let anchor = to_local(rect, pointer.unwrap_or_else(|| rect.center()));

        if scroll.abs() > f32::EPSILON {
            // egui scrolls up with positive deltas, wheel zoom expects the opposite.
            self.interaction.wheel(anchor, -scroll, &mut self.viewport);
        }
        if (pinch - 1.0).abs() > f32::EPSILON {
            self.viewport.zoom_at(anchor, pinch);
        }
    }
}

fn to_local(rect: Rect, pointer: Pos2) -> Pos2 {
    (pointer - rect.min).to_pos2()
}
