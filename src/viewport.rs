use std::time::Duration;

use eframe::egui::{Pos2, Vec2};

use crate::config::ViewportConfig;

/// `surface = world * scale + translate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub translate: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate: Vec2::ZERO,
    };

    pub fn new(scale: f32, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    /// Transform that shows `world` at the middle of a surface of `surface_size`.
    pub fn centered_on(world: Vec2, surface_size: Vec2, scale: f32) -> Self {
        Self {
            scale,
            translate: surface_size * 0.5 - world * scale,
        }
    }

    pub fn to_surface(&self, world: Vec2) -> Pos2 {
        (world * self.scale + self.translate).to_pos2()
    }

    pub fn to_world(&self, surface: Pos2) -> Vec2 {
        (surface.to_vec2() - self.translate) / self.scale
    }

    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            scale: self.scale + (other.scale - self.scale) * t,
            translate: self.translate + (other.translate - self.translate) * t,
        }
    }
}

fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

#[derive(Clone, Copy, Debug)]
struct Animation {
    from: Transform,
    to: Transform,
    duration: Duration,
    elapsed: Duration,
}

/// Scale and translation between simulation space and the drawing surface.
/// Never touches node state.
#[derive(Clone, Debug)]
pub struct Viewport {
    transform: Transform,
    min_scale: f32,
    max_scale: f32,
    animation: Option<Animation>,
}

impl Viewport {
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            transform: Transform::IDENTITY,
            min_scale: config.min_scale,
            max_scale: config.max_scale.max(config.min_scale),
            animation: None,
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale
    }

    pub fn scale_extent(&self) -> (f32, f32) {
        (self.min_scale, self.max_scale)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn to_surface(&self, world: Vec2) -> Pos2 {
        self.transform.to_surface(world)
    }

    pub fn to_world(&self, surface: Pos2) -> Vec2 {
        self.transform.to_world(surface)
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        if !delta.x.is_finite() || !delta.y.is_finite() {
            return;
        }
        self.animation = None;
        self.transform.translate += delta;
    }

    /// Zooms by `factor` while keeping the world point under `pointer` still.
    pub fn zoom_at(&mut self, pointer: Pos2, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.animation = None;

        let anchor = self.transform.to_world(pointer);
        let scale = self.clamp_scale(self.transform.scale * factor);
        self.transform = Transform {
            scale,
            translate: pointer.to_vec2() - anchor * scale,
        };
    }

    pub fn reset(&mut self) {
        self.animation = None;
        self.transform = Transform::IDENTITY;
    }

    /// Starts an eased transition to `target`, replacing any transition in
    /// flight.
    pub fn animate_to(&mut self, target: Transform, duration: Duration) {
        let target = Transform {
            scale: self.clamp_scale(target.scale),
            translate: target.translate,
        };

        if duration.is_zero() {
            self.animation = None;
            self.transform = target;
            return;
        }

        self.animation = Some(Animation {
            from: self.transform,
            to: target,
            duration,
            elapsed: Duration::ZERO,
        });
    }

    /// Advances the running transition. Returns whether one is still running.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };

        animation.elapsed = (animation.elapsed + dt).min(animation.duration);
        let progress = animation.elapsed.as_secs_f32() / animation.duration.as_secs_f32();
        let eased = ease_cubic_in_out(progress);
        let (from, to) = (animation.from, animation.to);
        let finished = animation.elapsed >= animation.duration;

        self.transform = if finished { to } else { from.lerp(&to, eased) };
        self.transform.scale = self.clamp_scale(self.transform.scale);
        if finished {
            self.animation = None;
        }
        !finished
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(&ViewportConfig::default())
    }

    #[test]
    fn test_transform_round_trips_point() {
        let transform = Transform::new(2.5, vec2(30.0, -12.0));
        let world = vec2(17.0, 4.0);
        let back = transform.to_world(transform.to_surface(world));
        assert!((back - world).length() < 1e-4);
    }

    #[test]
    fn test_zoom_keeps_pointer_anchor_fixed() {
        let mut viewport = viewport();
        viewport.pan_by(vec2(40.0, 25.0));
        let pointer = pos2(300.0, 200.0);
        let anchor = viewport.to_world(pointer);

        viewport.zoom_at(pointer, 1.7);

        assert!((viewport.scale() - 1.7).abs() < 1e-6);
        assert!((viewport.to_surface(anchor) - pointer).length() < 1e-3);
    }

    #[test]
    fn test_zoom_scale_stays_in_extent() {
        let mut viewport = viewport();
        let pointer = pos2(100.0, 100.0);
        for factor in [1e6, 3.0, 0.5, 1e-9, 42.0, 0.0, f32::NAN, f32::INFINITY, -2.0] {
            for _ in 0..10 {
                viewport.zoom_at(pointer, factor);
                let scale = viewport.scale();
                assert!((0.1..=4.0).contains(&scale), "scale {scale} after {factor}");
            }
        }
    }

    #[test]
    fn test_zoom_at_extent_does_not_drift() {
        let mut viewport = viewport();
        let pointer = pos2(250.0, 120.0);
        viewport.zoom_at(pointer, 100.0);
        let pinned = viewport.transform();

        viewport.zoom_at(pointer, 100.0);

        let after = viewport.transform();
        assert_eq!(after.scale, pinned.scale);
        assert!((after.translate - pinned.translate).length() < 1e-3);
    }

    #[test]
    fn test_animation_reaches_target_and_eases() {
        let mut viewport = viewport();
        let target = Transform::new(2.0, vec2(-100.0, 50.0));
        viewport.animate_to(target, Duration::from_millis(750));

        assert!(viewport.advance(Duration::from_millis(375)));
        let midway = viewport.transform();
        assert!((midway.scale - 1.5).abs() < 1e-4);

        assert!(!viewport.advance(Duration::from_millis(500)));
        assert_eq!(viewport.transform(), target);
        assert!(!viewport.is_animating());
    }

    #[test]
    fn test_new_animation_supersedes_previous() {
        let mut viewport = viewport();
        viewport.animate_to(Transform::new(3.0, vec2(10.0, 10.0)), Duration::from_millis(500));
        viewport.advance(Duration::from_millis(100));

        let latest = Transform::new(0.5, vec2(-20.0, 0.0));
        viewport.animate_to(latest, Duration::from_millis(200));
        viewport.advance(Duration::from_millis(1_000));

        assert_eq!(viewport.transform(), latest);
    }

    #[test]
    fn test_pan_cancels_animation() {
        let mut viewport = viewport();
        viewport.animate_to(Transform::new(2.0, Vec2::ZERO), Duration::from_millis(500));
        viewport.pan_by(vec2(5.0, 0.0));

        assert!(!viewport.is_animating());
        assert!(!viewport.advance(Duration::from_millis(16)));
        assert_eq!(viewport.transform().translate, vec2(5.0, 0.0));
    }

    #[test]
    fn test_animation_target_scale_is_clamped() {
        let mut viewport = viewport();
        viewport.animate_to(Transform::new(50.0, Vec2::ZERO), Duration::ZERO);
        assert_eq!(viewport.scale(), 4.0);
    }

    #[test]
    fn test_reset_restores_identity() {
        let mut viewport = viewport();
        viewport.zoom_at(pos2(10.0, 10.0), 2.0);
        viewport.reset();
        assert_eq!(viewport.transform(), Transform::IDENTITY);
    }
}
