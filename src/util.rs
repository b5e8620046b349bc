use std::f32::consts::{PI, TAU};

use eframe::egui::{Vec2, vec2};

/// Unit vector used to push apart two coincident nodes. Antisymmetric:
/// `separation_direction(a, b) == -separation_direction(b, a)`.
pub fn separation_direction(from: usize, to: usize) -> Vec2 {
    let (low, high) = if from <= to { (from, to) } else { (to, from) };
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214 + 0.11) * TAU;
    let direction = vec2(angle.cos(), angle.sin());
    if from <= to { direction } else { -direction }
}

/// Offset of the `index`-th node on a phyllotaxis spiral, the initial layout
/// before any force has run.
pub fn phyllotaxis(index: usize) -> Vec2 {
    let initial_angle = PI * (3.0 - 5.0_f32.sqrt());
    let radius = 10.0 * (0.5 + index as f32).sqrt();
    let angle = index as f32 * initial_angle;
    vec2(angle.cos(), angle.sin()) * radius
}

pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_owned();
    }
    let mut truncated = label.chars().take(max_chars.saturating_sub(1)).collect::<String>();
    truncated.push('…');
    truncated
}
