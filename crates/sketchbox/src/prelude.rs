//! Convenience re-exports: `use sketchbox::prelude::*` for the common items.

pub use crate::app::{App, UiState};
pub use crate::config::{CONFIG_FILE, SandboxConfig, StepSettings};
pub use crate::error::{AppError, ConfigError, PhysicsError, SketchError};
pub use crate::math::{Color, Vec2, Vec4};
pub use crate::physics::{BodyHandle, BodyType, ColliderShape, PhysicsWorld};
pub use crate::render::{Sprite, SpriteRenderer, SpriteShape, draw_scene};
pub use crate::scene::{SceneManager, SceneObject, SimulationState};
pub use crate::shape::{DrawTool, ShapeKind, ShapeRecord};
pub use crate::sketch::{Sketch, SketchPad};
pub use crate::time::{FrameLimiter, Time};

#[cfg(feature = "editor")]
pub use crate::window::run;
