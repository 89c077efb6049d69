//! Error types shared across the crate.

use std::fmt;
use std::io;

use crate::physics::BodyHandle;

// ── Physics ─────────────────────────────────────────────────────────────

/// Errors reported by the physics world boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    /// The handle does not refer to a live body.
    UnknownBody(BodyHandle),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::UnknownBody(h) => write!(f, "no live body for handle {h:?}"),
        }
    }
}

impl std::error::Error for PhysicsError {}

// ── Sketch files ────────────────────────────────────────────────────────

/// Errors that can occur while saving or loading a sketch file.
#[derive(Debug)]
pub enum SketchError {
    Io(io::Error),
    Json(serde_json::Error),
    /// A malformed row in the legacy text format (1-based line number).
    Parse { line: usize, message: String },
    UnsupportedVersion(u32),
}

impl SketchError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        SketchError::Parse {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchError::Io(e) => write!(f, "sketch file i/o failed: {e}"),
            SketchError::Json(e) => write!(f, "sketch json invalid: {e}"),
            SketchError::Parse { line, message } => {
                write!(f, "sketch parse error on line {line}: {message}")
            }
            SketchError::UnsupportedVersion(v) => {
                write!(f, "sketch format version {v} is not supported")
            }
        }
    }
}

impl std::error::Error for SketchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SketchError::Io(e) => Some(e),
            SketchError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SketchError {
    fn from(e: io::Error) -> Self {
        SketchError::Io(e)
    }
}

impl From<serde_json::Error> for SketchError {
    fn from(e: serde_json::Error) -> Self {
        SketchError::Json(e)
    }
}

// ── Configuration ───────────────────────────────────────────────────────

/// Errors that can occur while loading the sandbox configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config read failed: {e}"),
            ConfigError::Json(e) => write!(f, "config json invalid: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

// ── Application ─────────────────────────────────────────────────────────

/// Errors from application-level operations that touch both the sketch file
/// and the scene.
#[derive(Debug)]
pub enum AppError {
    Sketch(SketchError),
    Physics(PhysicsError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Sketch(e) => e.fmt(f),
            AppError::Physics(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Sketch(e) => Some(e),
            AppError::Physics(e) => Some(e),
        }
    }
}

impl From<SketchError> for AppError {
    fn from(e: SketchError) -> Self {
        AppError::Sketch(e)
    }
}

impl From<PhysicsError> for AppError {
    fn from(e: PhysicsError) -> Self {
        AppError::Physics(e)
    }
}
