//! # Sketchbox: 2D Physics Sketch Sandbox
//!
//! Draw rectangles and circles on a canvas; each accepted shape becomes a
//! rigid body in a Rapier world and the simulation plays back in an egui
//! panel. Sketches save to and load from disk.
//!
//! The simulation core ([`scene`], [`physics`], [`sketch`], [`format`]) has no
//! window dependency. The desktop front end lives behind the `editor` feature.
//!
//! Start with `use sketchbox::prelude::*` and build an [`App`](app::App).

pub mod app;
pub mod config;
pub mod error;
pub mod format;
pub mod math;
pub mod physics;
pub mod prelude;
pub mod render;
pub mod scene;
pub mod shape;
pub mod sketch;
pub mod time;

#[cfg(feature = "editor")]
pub mod editor;
#[cfg(feature = "editor")]
pub mod gpu;
#[cfg(feature = "editor")]
pub mod window;
