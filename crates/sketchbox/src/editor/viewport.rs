//! Rendering window: the live physics view, painted with egui.

use egui::{Color32, Pos2, Shape, Stroke};

use super::to_color32;
use crate::app::App;
use crate::math::{Vec2, rotate};
use crate::render::{Sprite, SpriteRenderer, SpriteShape, draw_scene};

/// Paints sprites into an egui panel.
///
/// Sprite coordinates are canvas pixels; `origin` is where the canvas's
/// top-left corner lands on screen.
pub struct PainterRenderer<'a> {
    painter: &'a egui::Painter,
    origin: Pos2,
}

impl<'a> PainterRenderer<'a> {
    pub fn new(painter: &'a egui::Painter, origin: Pos2) -> Self {
        Self { painter, origin }
    }

    fn to_screen(&self, v: Vec2) -> Pos2 {
        egui::pos2(self.origin.x + v.x, self.origin.y + v.y)
    }
}

impl SpriteRenderer for PainterRenderer<'_> {
    fn draw_sprite(&mut self, sprite: &Sprite) {
        let fill = to_color32(sprite.color);
        match sprite.shape {
            SpriteShape::Quad => {
                let half = sprite.size * 0.5;
                let points = [
                    Vec2::new(-half.x, -half.y),
                    Vec2::new(half.x, -half.y),
                    Vec2::new(half.x, half.y),
                    Vec2::new(-half.x, half.y),
                ]
                .map(|c| self.to_screen(sprite.center + rotate(c, sprite.rotation)))
                .to_vec();
                self.painter
                    .add(Shape::convex_polygon(points, fill, Stroke::NONE));
            }
            SpriteShape::Disc => {
                let radius = sprite.size.x * 0.5;
                let center = self.to_screen(sprite.center);
                self.painter.circle_filled(center, radius, fill);
                // Spoke so rotation is visible.
                let rim = self.to_screen(sprite.center + rotate(Vec2::new(radius, 0.0), sprite.rotation));
                self.painter
                    .line_segment([center, rim], Stroke::new(1.5, Color32::BLACK));
            }
        }
    }
}

pub(crate) fn rendering_window(ctx: &egui::Context, app: &App) {
    let canvas = Vec2::new(
        app.config.screen_width as f32,
        app.config.screen_height as f32,
    );
    egui::Window::new("Rendering")
        .default_pos([360.0, 540.0])
        .default_size([600.0, 400.0])
        .show(ctx, |ui| {
            let size = ui.available_size().max(egui::vec2(50.0, 50.0));
            let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
            let rect = response.rect;
            painter.rect_filled(rect, 0.0, to_color32(app.ui.clear_color));

            // Fit the whole canvas into the panel.
            let fit = (rect.width() / canvas.x).min(rect.height() / canvas.y);
            let painter = painter.with_clip_rect(rect);
            let mut renderer = PainterRenderer::new(&painter, rect.min);
            draw_scene(&app.scene, app.config.render_scale * fit, &mut renderer);
        });
}
