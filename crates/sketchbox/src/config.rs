//! Sandbox configuration.
//!
//! [`SandboxConfig`] holds every tunable constant of the sandbox. Defaults
//! reproduce the classic setup (1200x800 canvas, 30 px per world unit,
//! gravity pointing down the canvas). Values can be overridden with the
//! builder methods or by dropping a `sketchbox.json` next to the binary.
//!
//! ```ignore
//! let config = SandboxConfig::default()
//!     .with_render_scale(40.0)
//!     .with_gravity(Vec2::new(0.0, 5.0));
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::{Color, Vec2};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "sketchbox.json";

/// Fixed-step solver settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepSettings {
    /// Timestep in seconds.
    pub dt: f32,
    pub velocity_iterations: usize,
    pub position_iterations: usize,
}

impl Default for StepSettings {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            velocity_iterations: 6,
            position_iterations: 2,
        }
    }
}

/// All tunables of the sandbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Canvas width in pixels.
    pub screen_width: u32,
    /// Canvas height in pixels.
    pub screen_height: u32,
    /// Pixels per world unit.
    pub render_scale: f32,
    /// Shapes with a smaller area (square pixels) are discarded.
    pub min_area: f32,
    /// World gravity when enabled (y points down the canvas).
    pub gravity: Vec2,
    pub step: StepSettings,
    /// Frame-rate cap of the window loop.
    pub target_fps: f32,
    /// Surround the canvas with static walls.
    pub boundary_walls: bool,
    pub clear_color: Color,
    pub shape_color: Color,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            screen_width: 1200,
            screen_height: 800,
            render_scale: 30.0,
            min_area: 100.0,
            gravity: Vec2::new(0.0, 10.0),
            step: StepSettings::default(),
            target_fps: 60.0,
            boundary_walls: true,
            clear_color: Color::rgba(0.3, 0.4, 0.8, 1.0),
            shape_color: Color::rgba(1.0, 0.0, 0.5, 1.0),
        }
    }
}

impl SandboxConfig {
    pub fn with_render_scale(mut self, scale: f32) -> Self {
        self.render_scale = scale;
        self
    }

    pub fn with_min_area(mut self, area: f32) -> Self {
        self.min_area = area;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_screen_size(mut self, width: u32, height: u32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    pub fn with_boundary_walls(mut self, enabled: bool) -> Self {
        self.boundary_walls = enabled;
        self
    }

    pub fn with_step(mut self, step: StepSettings) -> Self {
        self.step = step;
        self
    }

    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            log::info!("Loading config from {}", path.display());
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.render_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "render_scale must be positive, got {}",
                self.render_scale
            )));
        }
        if !(self.step.dt > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "step.dt must be positive, got {}",
                self.step.dt
            )));
        }
        if !(self.target_fps > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "target_fps must be positive, got {}",
                self.target_fps
            )));
        }
        if self.min_area < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_area must not be negative, got {}",
                self.min_area
            )));
        }
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(ConfigError::Invalid("screen size must be non-zero".into()));
        }
        Ok(())
    }
}
