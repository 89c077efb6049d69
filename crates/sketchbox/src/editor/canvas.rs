//! Canvas window: the drawing surface.
//!
//! Left-drag draws with the current tool (or selects, in select mode),
//! right-drag pans, right-click opens the remove menu. Shapes are shown as
//! outlines in canvas pixel space; the physics view lives in the Rendering
//! window.

use egui::{Color32, PointerButton, Pos2, Sense, Shape, Stroke};

use super::file_dialog::{FileAction, FileDialog};
use super::to_color32;
use crate::app::App;
use crate::math::Vec2;
use crate::shape::{DrawTool, ShapeKind, ShapeRecord};

const GRID_STEP: f32 = 64.0;
const BACKGROUND: Color32 = Color32::from_rgb(50, 50, 50);
const GRID_COLOR: Color32 = Color32::from_rgb(90, 90, 90);
const SELECTED_COLOR: Color32 = Color32::YELLOW;

pub(crate) fn canvas_window(ctx: &egui::Context, app: &mut App, dialog: &mut FileDialog) {
    egui::Window::new("Canvas")
        .default_pos([360.0, 10.0])
        .default_size([700.0, 500.0])
        .show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open...").clicked() {
                        dialog.open(FileAction::Open);
                        ui.close();
                    }
                    if ui.button("Save...").clicked() {
                        dialog.open(FileAction::Save);
                        ui.close();
                    }
                });
            });

            tool_bar(ui, app);
            ui.label("Left-drag to draw, right-drag to pan, right-click for the menu.");
            drawing_area(ui, app);
        });
}

fn tool_bar(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal(|ui| {
        ui.checkbox(&mut app.ui.show_grid, "Grid");
        ui.checkbox(&mut app.ui.context_menu, "Context menu");
        let mut rgba = app.ui.shape_color.to_array();
        if ui.color_edit_button_rgba_unmultiplied(&mut rgba).changed() {
            app.ui.shape_color = rgba.into();
        }
        ui.label("Color");
    });

    ui.horizontal(|ui| {
        egui::ComboBox::from_label("Tool")
            .selected_text(app.ui.tool.label())
            .show_ui(ui, |ui| {
                for tool in DrawTool::ALL {
                    ui.selectable_value(&mut app.ui.tool, tool, tool.label());
                }
            });
        ui.radio_value(&mut app.ui.is_static, false, "Dynamic");
        ui.radio_value(&mut app.ui.is_static, true, "Static");
    });

    ui.horizontal(|ui| {
        if ui.checkbox(&mut app.ui.select_mode, "Select").changed() && !app.ui.select_mode {
            app.ui.selected = None;
        }
        if let Some(mut degrees) = app.selected_shape().map(|s| s.rotation_degrees) {
            let slider = egui::Slider::new(&mut degrees, -180.0..=180.0).text("Rotation");
            if ui.add(slider).changed() {
                app.set_selected_rotation(degrees);
            }
        }
    });
}

fn drawing_area(ui: &mut egui::Ui, app: &mut App) {
    let size = ui.available_size().max(egui::vec2(50.0, 50.0));
    let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
    let rect = response.rect;
    let origin = rect.min + egui::vec2(app.ui.scrolling.x, app.ui.scrolling.y);
    let to_canvas = |p: Pos2| Vec2::new(p.x - origin.x, p.y - origin.y);

    // ── Input ───────────────────────────────────────────────────────────

    if let Some(pointer) = response.interact_pointer_pos() {
        if response.drag_started_by(PointerButton::Primary) {
            let press = ui.input(|i| i.pointer.press_origin());
            let start = to_canvas(drag_start(press, pointer));
            if app.ui.select_mode {
                app.select_at(start);
            } else {
                app.begin_shape(start);
                app.drag_shape(to_canvas(pointer));
            }
        } else if response.dragged_by(PointerButton::Primary) {
            app.drag_shape(to_canvas(pointer));
        }
    }
    if response.drag_stopped_by(PointerButton::Primary)
        && app.pad.active().is_some()
        && !app.release_shape()
    {
        log::debug!("Shape discarded");
    }
    if app.ui.select_mode && response.clicked_by(PointerButton::Primary) {
        if let Some(pointer) = response.interact_pointer_pos() {
            app.select_at(to_canvas(pointer));
        }
    }
    if response.dragged_by(PointerButton::Secondary) {
        let delta = response.drag_delta();
        app.ui.scrolling += Vec2::new(delta.x, delta.y);
    }

    if app.ui.context_menu {
        response.context_menu(|ui| {
            if ui.button("Remove one").clicked() {
                if let Err(e) = app.remove_last() {
                    log::error!("Remove one failed: {e}");
                }
                ui.close();
            }
            if ui.button("Remove all").clicked() {
                if let Err(e) = app.remove_all() {
                    log::error!("Remove all failed: {e}");
                }
                ui.close();
            }
        });
    }

    // ── Drawing ─────────────────────────────────────────────────────────

    painter.rect_filled(rect, 0.0, BACKGROUND);

    if app.ui.show_grid {
        let stroke = Stroke::new(1.0, GRID_COLOR);
        let mut x = app.ui.scrolling.x.rem_euclid(GRID_STEP);
        while x < rect.width() {
            painter.line_segment(
                [egui::pos2(rect.left() + x, rect.top()), egui::pos2(rect.left() + x, rect.bottom())],
                stroke,
            );
            x += GRID_STEP;
        }
        let mut y = app.ui.scrolling.y.rem_euclid(GRID_STEP);
        while y < rect.height() {
            painter.line_segment(
                [egui::pos2(rect.left(), rect.top() + y), egui::pos2(rect.right(), rect.top() + y)],
                stroke,
            );
            y += GRID_STEP;
        }
    }

    let to_screen = |v: Vec2| egui::pos2(origin.x + v.x, origin.y + v.y);
    let painter = painter.with_clip_rect(rect);
    for (i, shape) in app.sketch.iter().enumerate() {
        let color = if app.ui.selected == Some(i) {
            SELECTED_COLOR
        } else {
            to_color32(shape.color)
        };
        painter.add(outline(shape, color, &to_screen));
    }
    if let Some(shape) = app.pad.active() {
        painter.add(outline(shape, to_color32(shape.color), &to_screen));
    }
}

/// Where a primary drag began. egui only reports a drag once the pointer has
/// moved past its threshold, so the press origin is the true first corner.
fn drag_start(press_origin: Option<Pos2>, pointer: Pos2) -> Pos2 {
    press_origin.unwrap_or(pointer)
}

fn outline(shape: &ShapeRecord, color: Color32, to_screen: &impl Fn(Vec2) -> Pos2) -> Shape {
    let stroke = Stroke::new(2.0, color);
    match shape.kind {
        ShapeKind::Line => Shape::line_segment([to_screen(shape.corner1), to_screen(shape.corner2)], stroke),
        ShapeKind::Ball => Shape::circle_stroke(to_screen(shape.corner1), shape.radius(), stroke),
        ShapeKind::Box | ShapeKind::Wall => {
            let points = shape.corners().map(to_screen).to_vec();
            Shape::closed_line(points, stroke)
        }
    }
}
