//! Open/Save path prompt shown from the Canvas window's File menu.

use crate::app::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileAction {
    Open,
    Save,
}

impl FileAction {
    fn title(self) -> &'static str {
        match self {
            FileAction::Open => "Open sketch",
            FileAction::Save => "Save sketch",
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FileDialog {
    pending: Option<FileAction>,
    /// Outcome of the last action, shown under the path field.
    status: Option<String>,
}

impl FileDialog {
    pub(crate) fn open(&mut self, action: FileAction) {
        self.pending = Some(action);
        self.status = None;
    }

    pub(crate) fn show(&mut self, ctx: &egui::Context, app: &mut App) {
        let Some(action) = self.pending else {
            return;
        };

        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new(action.title())
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.set_min_width(360.0);
                ui.label("Path (.json, or .txt/.sketch for the text format):");
                let edit = ui.text_edit_singleline(&mut app.ui.file_path);
                if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    confirmed = true;
                }
                if let Some(status) = &self.status {
                    ui.label(status.as_str());
                }
                ui.horizontal(|ui| {
                    let label = match action {
                        FileAction::Open => "Open",
                        FileAction::Save => "Save",
                    };
                    if ui.button(label).clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });

        if cancelled {
            self.pending = None;
            return;
        }
        if !confirmed {
            return;
        }

        let path = app.ui.file_path.trim().to_string();
        let result = match action {
            FileAction::Open => app.load_sketch(&path).map(drop),
            FileAction::Save => app.save_sketch(&path),
        };
        match result {
            Ok(()) => self.pending = None,
            Err(e) => {
                log::error!("{} failed: {e}", action.title());
                self.status = Some(e.to_string());
            }
        }
    }
}
