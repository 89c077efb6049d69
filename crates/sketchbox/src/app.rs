//! App: the single application context.
//!
//! [`App`] bundles the configuration, the [`SceneManager`], the drawn
//! [`Sketch`], the pointer [`SketchPad`], frame timing, and the UI state the
//! editor panels read and write. The window loop calls [`App::frame`] once per
//! redraw; the editor calls the other methods in response to user input.
//!
//! The sketch is the source of truth for what the user drew. The scene holds
//! one body per accepted physical shape, created in sketch order after the
//! boundary walls, so the newest body always belongs to the newest physical
//! shape.

use std::path::Path;

use crate::config::SandboxConfig;
use crate::error::{AppError, PhysicsError};
use crate::format;
use crate::math::{Color, Vec2};
use crate::scene::SceneManager;
use crate::shape::{DrawTool, ShapeRecord};
use crate::sketch::{Sketch, SketchPad};
use crate::time::Time;

// ── UI state ────────────────────────────────────────────────────────────

/// Editor-facing state that outlives a single frame.
#[derive(Debug, Clone)]
pub struct UiState {
    pub tool: DrawTool,
    /// New rectangles and circles become static bodies.
    pub is_static: bool,
    pub shape_color: Color,
    pub clear_color: Color,
    pub show_grid: bool,
    pub context_menu: bool,
    /// Clicks select shapes instead of drawing.
    pub select_mode: bool,
    /// Index into the sketch.
    pub selected: Option<usize>,
    /// Canvas pan offset in pixels.
    pub scrolling: Vec2,
    /// Path typed into the Open/Save dialog.
    pub file_path: String,
}

impl UiState {
    fn new(config: &SandboxConfig) -> Self {
        Self {
            tool: DrawTool::default(),
            is_static: false,
            shape_color: config.shape_color,
            clear_color: config.clear_color,
            show_grid: true,
            context_menu: true,
            select_mode: false,
            selected: None,
            scrolling: Vec2::ZERO,
            file_path: String::from("sketch.json"),
        }
    }
}

// ── App ─────────────────────────────────────────────────────────────────

pub struct App {
    pub config: SandboxConfig,
    pub scene: SceneManager,
    pub sketch: Sketch,
    pub pad: SketchPad,
    pub time: Time,
    pub ui: UiState,
}

impl App {
    pub fn new(config: SandboxConfig) -> Self {
        let scene = SceneManager::new(&config);
        let ui = UiState::new(&config);
        let mut app = Self {
            config,
            scene,
            sketch: Sketch::new(),
            pad: SketchPad::new(),
            time: Time::new(),
            ui,
        };
        app.spawn_boundary();
        app
    }

    fn spawn_boundary(&mut self) {
        if self.config.boundary_walls {
            self.scene.spawn_boundary(
                self.config.screen_width as f32,
                self.config.screen_height as f32,
            );
        }
    }

    /// One frame of simulation.
    ///
    /// A reset requested last frame is completed here: the world is cleared
    /// and rebuilt from the sketch, putting every body back where it was
    /// drawn. Then the world advances one fixed step if simulating.
    pub fn frame(&mut self) -> Result<(), PhysicsError> {
        self.time.update();
        if self.scene.begin_frame()? {
            self.spawn_boundary();
            self.scene.rebuild(&self.sketch);
        }
        self.scene.step();
        Ok(())
    }

    // ── Drawing ─────────────────────────────────────────────────────────

    /// Offer a finished shape to the scene. Returns whether it was kept.
    ///
    /// Lines are kept unless degenerate. Physical shapes are kept only when
    /// the scene accepts them as a body.
    pub fn commit_shape(&mut self, shape: ShapeRecord) -> bool {
        let accepted = if shape.kind.is_physical() {
            self.scene.create_object(&shape).is_some()
        } else {
            !shape.is_degenerate()
        };
        if accepted {
            self.sketch.push(shape);
        }
        accepted
    }

    /// Pointer pressed on the canvas at `at` (canvas pixels).
    pub fn begin_shape(&mut self, at: Vec2) {
        self.pad
            .begin(self.ui.tool, self.ui.is_static, at, self.ui.shape_color);
    }

    pub fn drag_shape(&mut self, at: Vec2) {
        self.pad.drag_to(at);
    }

    /// Pointer released: commit the shape in progress, if any.
    pub fn release_shape(&mut self) -> bool {
        match self.pad.release() {
            Some(shape) => self.commit_shape(shape),
            None => false,
        }
    }

    // ── Removal ─────────────────────────────────────────────────────────

    /// Remove the newest shape and, for physical shapes, its body.
    pub fn remove_last(&mut self) -> Result<Option<ShapeRecord>, PhysicsError> {
        let Some(shape) = self.sketch.pop() else {
            return Ok(None);
        };
        if shape.kind.is_physical() {
            self.scene.clear_last_object()?;
        }
        if self.ui.selected.is_some_and(|i| i >= self.sketch.len()) {
            self.ui.selected = None;
        }
        Ok(Some(shape))
    }

    /// Remove every shape and body, then restore the boundary walls.
    pub fn remove_all(&mut self) -> Result<(), PhysicsError> {
        self.sketch.clear();
        self.ui.selected = None;
        self.scene.clear_objects()?;
        self.spawn_boundary();
        Ok(())
    }

    // ── Selection ───────────────────────────────────────────────────────

    /// Select the topmost shape under `point`.
    pub fn select_at(&mut self, point: Vec2) -> Option<usize> {
        self.ui.selected = self.sketch.pick(point);
        self.ui.selected
    }

    pub fn selected_shape(&self) -> Option<&ShapeRecord> {
        self.ui.selected.and_then(|i| self.sketch.get(i))
    }

    /// Rotate the selected shape. The body picks it up on the next rebuild.
    pub fn set_selected_rotation(&mut self, degrees: f32) -> bool {
        let Some(shape) = self.ui.selected.and_then(|i| self.sketch.get_mut(i)) else {
            return false;
        };
        shape.rotation_degrees = degrees;
        true
    }

    // ── Files ───────────────────────────────────────────────────────────

    pub fn save_sketch(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        format::save(path, &self.sketch)?;
        Ok(())
    }

    /// Replace the sketch with a file's contents and rebuild the scene.
    ///
    /// Physical shapes the scene rejects are dropped. Returns the number of
    /// shapes kept.
    pub fn load_sketch(&mut self, path: impl AsRef<Path>) -> Result<usize, AppError> {
        let loaded = format::load(path)?;
        self.remove_all()?;
        let total = loaded.len();
        for shape in loaded.iter().cloned() {
            self.commit_shape(shape);
        }
        if self.sketch.len() < total {
            log::warn!(
                "Dropped {} shapes that could not become bodies",
                total - self.sketch.len()
            );
        }
        Ok(self.sketch.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SimulationState;
    use crate::shape::ShapeKind;

    fn app() -> App {
        App::new(SandboxConfig::default())
    }

    fn shape(kind: ShapeKind, x1: f32, y1: f32, x2: f32, y2: f32) -> ShapeRecord {
        ShapeRecord::new(kind, Vec2::new(x1, y1), Vec2::new(x2, y2), Color::WHITE, false)
    }

    #[test]
    fn new_app_has_boundary_only() {
        let app = app();
        assert_eq!(app.scene.body_count(), 4);
        assert!(app.sketch.is_empty());

        let bare = App::new(SandboxConfig::default().with_boundary_walls(false));
        assert_eq!(bare.scene.body_count(), 0);
    }

    #[test]
    fn commit_filters_shapes() {
        let mut app = app();
        assert!(app.commit_shape(shape(ShapeKind::Box, 0.0, 0.0, 40.0, 40.0)));
        assert!(!app.commit_shape(shape(ShapeKind::Box, 0.0, 0.0, 5.0, 5.0)));
        assert!(app.commit_shape(shape(ShapeKind::Line, 0.0, 0.0, 3.0, 3.0)));
        assert!(!app.commit_shape(shape(ShapeKind::Line, 1.0, 1.0, 1.0, 1.0)));
        assert_eq!(app.sketch.len(), 2);
        assert_eq!(app.scene.body_count(), 5);
    }

    #[test]
    fn pointer_drag_commits_shape() {
        let mut app = app();
        app.ui.tool = DrawTool::Circle;
        app.begin_shape(Vec2::new(100.0, 100.0));
        app.drag_shape(Vec2::new(120.0, 100.0));
        assert!(app.release_shape());
        assert_eq!(app.sketch.count(ShapeKind::Ball), 1);
        assert_eq!(app.scene.objects(ShapeKind::Ball).len(), 1);
        assert!(!app.release_shape());
    }

    #[test]
    fn remove_last_keeps_scene_in_step() {
        let mut app = app();
        app.commit_shape(shape(ShapeKind::Box, 0.0, 0.0, 40.0, 40.0));
        app.commit_shape(shape(ShapeKind::Line, 0.0, 0.0, 30.0, 30.0));

        let line = app.remove_last().unwrap().unwrap();
        assert_eq!(line.kind, ShapeKind::Line);
        assert_eq!(app.scene.objects(ShapeKind::Box).len(), 1);

        let boxed = app.remove_last().unwrap().unwrap();
        assert_eq!(boxed.kind, ShapeKind::Box);
        assert!(app.scene.objects(ShapeKind::Box).is_empty());
        // Boundary walls survive.
        assert_eq!(app.scene.body_count(), 4);
        assert!(app.remove_last().unwrap().is_none());
        assert_eq!(app.scene.body_count(), 4);
    }

    #[test]
    fn remove_all_restores_boundary() {
        let mut app = app();
        app.commit_shape(shape(ShapeKind::Box, 0.0, 0.0, 40.0, 40.0));
        app.remove_all().unwrap();
        assert!(app.sketch.is_empty());
        assert_eq!(app.scene.body_count(), 4);
    }

    #[test]
    fn reset_rebuilds_drawn_poses() {
        let mut app = app();
        app.commit_shape(shape(ShapeKind::Box, 300.0, 300.0, 340.0, 340.0));
        app.scene.play();
        for _ in 0..30 {
            app.frame().unwrap();
        }
        let fallen = app.scene.objects(ShapeKind::Box)[0].clone();
        let y = app.scene.object_pose(&fallen).unwrap().0.y;
        assert!(y > 320.0 / 30.0);

        app.scene.reset();
        app.frame().unwrap();
        assert_eq!(app.scene.state(), SimulationState::Stopped);
        assert_eq!(app.scene.body_count(), 5);
        let rebuilt = app.scene.objects(ShapeKind::Box)[0].clone();
        let pos = app.scene.object_pose(&rebuilt).unwrap().0;
        assert!((pos - Vec2::new(320.0 / 30.0, 320.0 / 30.0)).length() < 1e-4);
    }

    #[test]
    fn frame_steps_only_while_simulating() {
        let mut app = app();
        app.commit_shape(shape(ShapeKind::Box, 300.0, 300.0, 340.0, 340.0));
        let obj = app.scene.objects(ShapeKind::Box)[0].clone();
        let start = app.scene.object_pose(&obj).unwrap().0;
        app.frame().unwrap();
        assert_eq!(app.scene.object_pose(&obj).unwrap().0, start);
        assert_eq!(app.time.frame_count(), 1);
    }

    #[test]
    fn selection_and_rotation() {
        let mut app = app();
        app.commit_shape(shape(ShapeKind::Wall, 100.0, 100.0, 200.0, 200.0));
        assert!(!app.set_selected_rotation(30.0));
        assert_eq!(app.select_at(Vec2::new(150.0, 150.0)), Some(0));
        assert!(app.set_selected_rotation(30.0));
        assert_eq!(app.selected_shape().map(|s| s.rotation_degrees), Some(30.0));
        assert_eq!(app.select_at(Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sketch.json");

        let mut app = app();
        app.commit_shape(shape(ShapeKind::Box, 0.0, 0.0, 40.0, 40.0));
        app.commit_shape(shape(ShapeKind::Ball, 100.0, 100.0, 120.0, 100.0));
        app.save_sketch(&path).unwrap();

        let mut other = App::new(SandboxConfig::default());
        other.commit_shape(shape(ShapeKind::Wall, 500.0, 500.0, 600.0, 600.0));
        assert_eq!(other.load_sketch(&path).unwrap(), 2);
        assert_eq!(other.sketch, app.sketch);
        assert_eq!(other.scene.objects(ShapeKind::Wall).len(), 4);
        assert_eq!(other.scene.body_count(), 6);
    }

    #[test]
    fn load_missing_file_leaves_app_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.commit_shape(shape(ShapeKind::Box, 0.0, 0.0, 40.0, 40.0));
        let err = app.load_sketch(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, AppError::Sketch(_)));
        assert_eq!(app.sketch.len(), 1);
        assert_eq!(app.scene.body_count(), 5);
    }
}
