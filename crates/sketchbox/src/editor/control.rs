//! Control window: play/stop/reset, gravity, background color, frame rate.

use crate::app::App;
use crate::scene::SimulationState;

pub(crate) fn control_window(ctx: &egui::Context, app: &mut App) {
    egui::Window::new("Control")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Play").clicked() {
                    app.scene.play();
                }
                if ui.button("Stop").clicked() {
                    app.scene.stop();
                }
                if ui.button("Reset").clicked() {
                    app.scene.reset();
                }
            });

            let state = match app.scene.state() {
                SimulationState::Stopped => "Stopped",
                SimulationState::Playing => "Playing",
                SimulationState::Paused => "Paused",
            };
            ui.label(format!("State: {state}"));

            let mut gravity = app.scene.gravity_enabled();
            if ui.checkbox(&mut gravity, "Enable gravity").changed() {
                app.scene.enable_gravity(gravity);
            }

            ui.horizontal(|ui| {
                let mut rgba = app.ui.clear_color.to_array();
                if ui.color_edit_button_rgba_unmultiplied(&mut rgba).changed() {
                    app.ui.clear_color = rgba.into();
                }
                ui.label("Background color");
            });

            ui.separator();
            let dt = app.time.delta_secs();
            ui.label(format!(
                "Application average {:.3} ms/frame ({:.1} FPS)",
                dt * 1000.0,
                app.time.fps()
            ));
            ui.label(format!(
                "Bodies: {}  Shapes: {}",
                app.scene.body_count(),
                app.sketch.len()
            ));
        });
}
