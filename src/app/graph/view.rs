use std::time::Duration;

use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, Ui, Vec2};

use crate::render::{Highlights, Surface, draw_frame};
use crate::viewport::Transform;

use super::super::ViewModel;

/// [`Surface`] over an egui painter clipped to the canvas rect.
struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
}

impl PainterSurface<'_> {
    fn offset(&self, position: Pos2) -> Pos2 {
        position + self.rect.min.to_vec2()
    }
}

impl Surface for PainterSurface<'_> {
    fn size(&self) -> Vec2 {
        self.rect.size()
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter
            .line_segment([self.offset(from), self.offset(to)], stroke);
    }

    fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, stroke: Stroke) {
        self.painter.circle(self.offset(center), radius, fill, stroke);
    }

    fn label(&mut self, at: Pos2, text: &str, color: Color32) {
        self.painter.text(
            self.offset(at),
            Align2::LEFT_CENTER,
            text,
            FontId::proportional(12.0),
            color,
        );
    }
}

fn draw_background(painter: &Painter, rect: Rect, transform: Transform) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * transform.scale.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + transform.translate;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        if rect.size() != self.surface_size {
            self.surface_size = rect.size();
            self.simulation.resize(self.surface_size);
        }

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pointer(ui, rect, &response);

        let frame_delta_seconds = ui.input(|input| input.stable_dt).clamp(0.0, 0.1);
        if self
            .viewport
            .advance(Duration::from_secs_f32(frame_delta_seconds))
        {
            ui.ctx().request_repaint();
        }
        self.simulation.on_frame();

        draw_background(&painter, rect, self.viewport.transform());

        if self.simulation.nodes().is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No entities to display.",
                FontId::proportional(15.0),
                Color32::from_gray(200),
            );
            return;
        }

        let highlights = Highlights::new(
            &self.simulation,
            self.interaction.selected(),
            self.interaction.hovered(),
            &self.search_results,
        );
        let mut surface = PainterSurface {
            painter: &painter,
            rect,
        };
        draw_frame(
            Some(&mut surface),
            &self.simulation,
            self.viewport.transform(),
            &highlights,
        );
    }
}
