//! # Scene Manager: shape → body lifecycle
//!
//! The [`SceneManager`] is the single authority over which physics bodies
//! exist and whether the simulation is advancing. It maps accepted
//! [`ShapeRecord`]s to [`SceneObject`]s (one body each), keyed by shape kind,
//! and drives a small play/pause/reset state machine.
//!
//! ```text
//!             play()             stop()
//!  Stopped ───────────► Playing ───────► Paused
//!     ▲                    │  ▲   play()   │
//!     │   reset() + next   │  └────────────┘
//!     └──── begin_frame() ─┴───────────────┘
//! ```
//!
//! `reset()` only raises a flag. The bodies are destroyed on the following
//! [`begin_frame`](SceneManager::begin_frame), so the frame in flight renders
//! against a consistent scene.
//!
//! ## Invariant
//!
//! Every live [`SceneObject`] has exactly one live body in the world and every
//! body in the world belongs to exactly one object. All mutations below keep
//! both sides in step.

use std::collections::BTreeMap;

use crate::config::{SandboxConfig, StepSettings};
use crate::error::PhysicsError;
use crate::math::{Color, Vec2};
use crate::physics::{BodyDesc, BodyHandle, BodyType, ColliderDesc, ColliderShape, PhysicsWorld};
use crate::shape::{ShapeKind, ShapeRecord};
use crate::sketch::Sketch;

/// Thickness of the boundary walls, in world units.
const BOUNDARY_THICKNESS: f32 = 20.0;

/// Observable simulation state, derived from the manager's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    Stopped,
    Playing,
    Paused,
}

/// One body in the scene together with its render attributes.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub kind: ShapeKind,
    pub body: BodyHandle,
    pub collider: ColliderShape,
    /// Half-extents in world units (`(r, r)` for balls).
    pub dimensions: Vec2,
    pub color: Color,
    /// Rotation at creation, in radians. The body's angle is authoritative
    /// afterwards.
    pub rotation: f32,
}

/// Material used for each physical kind.
fn material_for(kind: ShapeKind, shape: ColliderShape) -> ColliderDesc {
    match kind {
        ShapeKind::Ball => ColliderDesc::new(shape)
            .with_density(1.0)
            .with_friction(0.3)
            .with_restitution(0.5),
        ShapeKind::Wall => ColliderDesc::new(shape).with_density(0.0),
        ShapeKind::Box | ShapeKind::Line => ColliderDesc::new(shape)
            .with_density(1.0)
            .with_friction(0.3),
    }
}

/// Owns the physics world and every scene object.
pub struct SceneManager {
    world: PhysicsWorld,
    objects: BTreeMap<ShapeKind, Vec<SceneObject>>,
    gravity: Vec2,
    gravity_enabled: bool,
    playing: bool,
    simulating: bool,
    resetting: bool,
    render_scale: f32,
    min_area: f32,
    step: StepSettings,
}

impl std::fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneManager")
            .field("world", &self.world)
            .field("objects", &self.object_count())
            .field("state", &self.state())
            .field("resetting", &self.resetting)
            .finish()
    }
}

impl SceneManager {
    pub fn new(config: &SandboxConfig) -> Self {
        Self {
            world: PhysicsWorld::new(config.gravity),
            objects: BTreeMap::new(),
            gravity: config.gravity,
            gravity_enabled: true,
            playing: false,
            simulating: false,
            resetting: false,
            render_scale: config.render_scale,
            min_area: config.min_area,
            step: config.step,
        }
    }

    // ── State machine ───────────────────────────────────────────────────

    /// Start (or resume) the simulation. Idempotent.
    pub fn play(&mut self) {
        if !self.simulating {
            log::info!("Simulation playing");
        }
        self.playing = true;
        self.simulating = true;
    }

    /// Pause: bodies and the `playing` flag are kept.
    pub fn stop(&mut self) {
        if self.simulating {
            log::info!("Simulation paused");
        }
        self.simulating = false;
    }

    /// Request a reset. Bodies are destroyed on the next [`begin_frame`](Self::begin_frame).
    pub fn reset(&mut self) {
        log::info!("Simulation reset requested");
        self.resetting = true;
        self.playing = false;
        self.simulating = false;
    }

    /// Per-frame hook. Completes a pending reset by clearing every object.
    /// Returns `true` if the scene was cleared.
    pub fn begin_frame(&mut self) -> Result<bool, PhysicsError> {
        if !self.resetting {
            return Ok(false);
        }
        self.clear_objects()?;
        self.resetting = false;
        Ok(true)
    }

    /// Advance the world by one fixed step, only while simulating.
    pub fn step(&mut self) -> bool {
        if !self.simulating {
            return false;
        }
        self.world.step(&self.step);
        true
    }

    pub fn state(&self) -> SimulationState {
        match (self.playing, self.simulating) {
            (false, _) => SimulationState::Stopped,
            (true, true) => SimulationState::Playing,
            (true, false) => SimulationState::Paused,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    pub fn is_resetting(&self) -> bool {
        self.resetting
    }

    // ── Gravity ─────────────────────────────────────────────────────────

    /// Change the configured gravity.
    ///
    /// Applied to the world immediately when gravity is enabled. While it is
    /// disabled the world keeps zero gravity and the new vector is stored; the
    /// next `enable_gravity(true)` applies it.
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
        if self.gravity_enabled {
            self.world.set_gravity(gravity);
        }
    }

    /// Toggle gravity between the configured vector and zero.
    pub fn enable_gravity(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
        self.world
            .set_gravity(if enabled { self.gravity } else { Vec2::ZERO });
        log::info!("Gravity {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    /// The gravity currently applied to the world.
    pub fn gravity(&self) -> Vec2 {
        self.world.gravity()
    }

    // ── Objects ─────────────────────────────────────────────────────────

    /// Convert a finished shape into a scene object.
    ///
    /// Returns `None` for lines, shapes below the minimum area, and degenerate
    /// shapes. Otherwise a body and a matching collider are created and the
    /// object is stored under the shape's kind.
    pub fn create_object(&mut self, shape: &ShapeRecord) -> Option<&SceneObject> {
        if !shape.kind.is_physical() {
            return None;
        }
        if shape.area < self.min_area || shape.is_degenerate() {
            log::debug!(
                "Rejected {} with area {:.1} (minimum {:.1})",
                shape.kind,
                shape.area,
                self.min_area
            );
            return None;
        }

        let scale = self.render_scale;
        let center = shape.center() / scale;
        let (collider, dimensions) = if shape.kind.is_round() {
            let radius = shape.radius() / scale;
            (ColliderShape::Ball { radius }, Vec2::splat(radius))
        } else {
            let half = shape.size() / scale * 0.5;
            (ColliderShape::Cuboid { hx: half.x, hy: half.y }, half)
        };
        let rotation = shape.rotation_radians();
        let body_type = if shape.is_static {
            BodyType::Static
        } else {
            BodyType::Dynamic
        };

        let object = self.spawn(
            shape.kind,
            BodyDesc {
                body_type,
                position: center,
                rotation,
            },
            collider,
            dimensions,
            shape.color,
        );
        log::debug!(
            "Created {} at {:?} with half-extents {:?}",
            object.name,
            center,
            dimensions
        );
        Some(object)
    }

    fn spawn(
        &mut self,
        kind: ShapeKind,
        desc: BodyDesc,
        collider: ColliderShape,
        dimensions: Vec2,
        color: Color,
    ) -> &SceneObject {
        let body = self
            .world
            .create_body_with_collider(desc, material_for(kind, collider));
        let list = self.objects.entry(kind).or_default();
        list.push(SceneObject {
            name: kind.name().to_string(),
            kind,
            body,
            collider,
            dimensions,
            color,
            rotation: desc.rotation,
        });
        &list[list.len() - 1]
    }

    /// Create objects for every physical shape of a sketch, in sketch order.
    /// Returns the number of objects created.
    pub fn rebuild(&mut self, sketch: &Sketch) -> usize {
        let created = sketch
            .iter()
            .filter(|shape| self.create_object(shape).is_some())
            .count();
        log::info!("Rebuilt {created} objects from sketch");
        created
    }

    /// Surround a `width` x `height` pixel canvas with four static walls.
    pub fn spawn_boundary(&mut self, width: f32, height: f32) {
        let w = width / self.render_scale;
        let h = height / self.render_scale;
        let t = BOUNDARY_THICKNESS;
        let walls = [
            (Vec2::new(w / 2.0, h + t / 2.0), Vec2::new(w / 2.0, t / 2.0)), // bottom
            (Vec2::new(w / 2.0, -t / 2.0), Vec2::new(w / 2.0, t / 2.0)),    // top
            (Vec2::new(-t / 2.0, h / 2.0), Vec2::new(t / 2.0, h / 2.0)),    // left
            (Vec2::new(w + t / 2.0, h / 2.0), Vec2::new(t / 2.0, h / 2.0)), // right
        ];
        for (position, half) in walls {
            self.spawn(
                ShapeKind::Wall,
                BodyDesc {
                    body_type: BodyType::Static,
                    position,
                    rotation: 0.0,
                },
                ColliderShape::Cuboid { hx: half.x, hy: half.y },
                half,
                Color::WHITE,
            );
        }
    }

    /// Destroy every body in the world and forget every object.
    ///
    /// A failed destroy is propagated as-is; the scene is not repaired.
    pub fn clear_objects(&mut self) -> Result<(), PhysicsError> {
        let handles: Vec<BodyHandle> = self.world.bodies_newest_first().collect();
        for handle in handles {
            self.world.destroy_body(handle)?;
        }
        self.objects.clear();
        log::info!("Scene cleared");
        Ok(())
    }

    /// Remove the most recently created body and its object.
    /// No-op on an empty scene.
    pub fn clear_last_object(&mut self) -> Result<Option<SceneObject>, PhysicsError> {
        let Some(handle) = self.world.newest_body() else {
            return Ok(None);
        };
        self.world.destroy_body(handle)?;

        let mut removed = None;
        for list in self.objects.values_mut() {
            if let Some(pos) = list.iter().position(|o| o.body == handle) {
                removed = Some(list.remove(pos));
                break;
            }
        }
        self.objects.retain(|_, list| !list.is_empty());
        if let Some(obj) = &removed {
            log::debug!("Removed last object ({})", obj.name);
        }
        Ok(removed)
    }

    /// Objects of one kind, oldest first.
    pub fn objects(&self, kind: ShapeKind) -> &[SceneObject] {
        self.objects.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every object, grouped by kind.
    pub fn iter_objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values().flatten()
    }

    pub fn object_count(&self) -> usize {
        self.objects.values().map(Vec::len).sum()
    }

    /// Number of live bodies in the physics world.
    pub fn body_count(&self) -> usize {
        self.world.body_count()
    }

    /// Current world-space position and angle of an object's body.
    pub fn object_pose(&self, object: &SceneObject) -> Option<(Vec2, f32)> {
        self.world.body_pose(object.body)
    }

    pub fn body_type(&self, object: &SceneObject) -> Option<BodyType> {
        self.world.body_type(object.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SceneManager {
        SceneManager::new(&SandboxConfig::default())
    }

    fn shape(kind: ShapeKind, x1: f32, y1: f32, x2: f32, y2: f32, is_static: bool) -> ShapeRecord {
        ShapeRecord::new(kind, Vec2::new(x1, y1), Vec2::new(x2, y2), Color::WHITE, is_static)
    }

    #[test]
    fn box_scenario_half_extents() {
        let mut scene = manager();
        let obj = scene
            .create_object(&shape(ShapeKind::Box, 0.0, 0.0, 40.0, 40.0, false))
            .cloned()
            .unwrap();
        assert_eq!(obj.name, "Box");
        assert!((obj.dimensions.x - 0.6667).abs() < 1e-3);
        assert!((obj.dimensions.y - 0.6667).abs() < 1e-3);
        assert_eq!(scene.objects(ShapeKind::Box).len(), 1);
        assert_eq!(scene.body_type(&obj), Some(BodyType::Dynamic));

        let (pos, _) = scene.object_pose(&obj).unwrap();
        assert!((pos - Vec2::new(20.0 / 30.0, 20.0 / 30.0)).length() < 1e-5);
    }

    #[test]
    fn area_threshold() {
        let mut scene = manager();
        // 10x10 = 100: accepted.
        assert!(scene.create_object(&shape(ShapeKind::Box, 0.0, 0.0, 10.0, 10.0, false)).is_some());
        // 9x11 = 99: rejected.
        assert!(scene.create_object(&shape(ShapeKind::Box, 0.0, 0.0, 9.0, 11.0, false)).is_none());
        assert_eq!(scene.object_count(), 1);
        assert_eq!(scene.body_count(), 1);
    }

    #[test]
    fn lines_and_degenerate_shapes_are_rejected() {
        let mut scene = manager();
        assert!(scene.create_object(&shape(ShapeKind::Line, 0.0, 0.0, 100.0, 100.0, false)).is_none());
        let mut flat = shape(ShapeKind::Wall, 0.0, 0.0, 0.0, 100.0, true);
        flat.area = 500.0;
        assert!(scene.create_object(&flat).is_none());
        assert_eq!(scene.body_count(), 0);
    }

    #[test]
    fn ball_uses_radius_and_static_flag() {
        let mut scene = manager();
        let obj = scene
            .create_object(&shape(ShapeKind::Ball, 60.0, 60.0, 60.0, 90.0, true))
            .cloned()
            .unwrap();
        assert_eq!(obj.collider, ColliderShape::Ball { radius: 1.0 });
        assert_eq!(obj.dimensions, Vec2::splat(1.0));
        assert_eq!(scene.body_type(&obj), Some(BodyType::Static));
        let (pos, _) = scene.object_pose(&obj).unwrap();
        assert!((pos - Vec2::new(2.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn rotation_is_applied_to_body() {
        let mut scene = manager();
        let s = shape(ShapeKind::Wall, 0.0, 0.0, 60.0, 30.0, true).with_rotation(45.0);
        let obj = scene.create_object(&s).cloned().unwrap();
        let (_, angle) = scene.object_pose(&obj).unwrap();
        assert!((angle - 45f32.to_radians()).abs() < 1e-5);
    }

    #[test]
    fn clear_objects_empties_world() {
        let mut scene = manager();
        scene.spawn_boundary(1200.0, 800.0);
        scene.create_object(&shape(ShapeKind::Box, 0.0, 0.0, 40.0, 40.0, false));
        scene.create_object(&shape(ShapeKind::Ball, 100.0, 100.0, 120.0, 100.0, false));
        assert_eq!(scene.body_count(), 6);

        scene.clear_objects().unwrap();
        assert_eq!(scene.body_count(), 0);
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn clear_last_object_pops_newest() {
        let mut scene = manager();
        scene.create_object(&shape(ShapeKind::Box, 0.0, 0.0, 40.0, 40.0, false));
        scene.create_object(&shape(ShapeKind::Ball, 100.0, 100.0, 120.0, 100.0, false));
        scene.create_object(&shape(ShapeKind::Box, 200.0, 0.0, 240.0, 40.0, false));

        let removed = scene.clear_last_object().unwrap().unwrap();
        assert_eq!(removed.kind, ShapeKind::Box);
        assert_eq!(scene.objects(ShapeKind::Box).len(), 1);

        let removed = scene.clear_last_object().unwrap().unwrap();
        assert_eq!(removed.kind, ShapeKind::Ball);
        assert!(scene.objects(ShapeKind::Ball).is_empty());
        assert_eq!(scene.body_count(), scene.object_count());
    }

    #[test]
    fn clear_last_object_on_empty_scene_is_noop() {
        let mut scene = manager();
        assert!(scene.clear_last_object().unwrap().is_none());
        assert_eq!(scene.body_count(), 0);
    }

    #[test]
    fn gravity_toggle() {
        let mut scene = manager();
        assert_eq!(scene.gravity(), Vec2::new(0.0, 10.0));
        scene.enable_gravity(false);
        assert_eq!(scene.gravity(), Vec2::ZERO);
        assert!(!scene.gravity_enabled());
        scene.enable_gravity(true);
        assert_eq!(scene.gravity(), Vec2::new(0.0, 10.0));
    }

    #[test]
    fn set_gravity_while_disabled_is_deferred() {
        let mut scene = manager();
        scene.enable_gravity(false);
        scene.set_gravity(Vec2::new(0.0, 3.0));
        assert_eq!(scene.gravity(), Vec2::ZERO);
        scene.enable_gravity(true);
        assert_eq!(scene.gravity(), Vec2::new(0.0, 3.0));
    }

    #[test]
    fn play_stop_reset_transitions() {
        let mut scene = manager();
        assert_eq!(scene.state(), SimulationState::Stopped);
        assert!(!scene.step());

        scene.play();
        scene.play();
        assert_eq!(scene.state(), SimulationState::Playing);
        assert!(scene.step());

        scene.stop();
        assert_eq!(scene.state(), SimulationState::Paused);
        assert!(scene.is_playing());
        assert!(!scene.step());

        scene.play();
        assert_eq!(scene.state(), SimulationState::Playing);
    }

    #[test]
    fn reset_clears_on_next_frame() {
        let mut scene = manager();
        scene.create_object(&shape(ShapeKind::Box, 0.0, 0.0, 40.0, 40.0, false));
        scene.play();
        assert!(!scene.begin_frame().unwrap());

        scene.reset();
        assert_eq!(scene.state(), SimulationState::Stopped);
        assert!(scene.is_resetting());
        // Bodies survive until the next frame begins.
        assert_eq!(scene.body_count(), 1);

        assert!(scene.begin_frame().unwrap());
        assert!(!scene.is_resetting());
        assert_eq!(scene.body_count(), 0);
        assert!(!scene.begin_frame().unwrap());
    }

    #[test]
    fn stepping_moves_dynamic_objects_only() {
        let mut scene = manager();
        let dynamic = scene
            .create_object(&shape(ShapeKind::Box, 0.0, 0.0, 30.0, 30.0, false))
            .cloned()
            .unwrap();
        let wall = scene
            .create_object(&shape(ShapeKind::Wall, 300.0, 300.0, 330.0, 330.0, true))
            .cloned()
            .unwrap();
        let start = scene.object_pose(&dynamic).unwrap().0;
        scene.play();
        for _ in 0..20 {
            scene.step();
        }
        assert!(scene.object_pose(&dynamic).unwrap().0.y > start.y);
        assert_eq!(scene.object_pose(&wall).unwrap().0, Vec2::new(10.5, 10.5));
    }

    #[test]
    fn boundary_walls_are_static_objects() {
        let mut scene = manager();
        scene.spawn_boundary(1200.0, 800.0);
        assert_eq!(scene.objects(ShapeKind::Wall).len(), 4);
        assert_eq!(scene.world.collider_count(), 4);
        let bottom = &scene.objects(ShapeKind::Wall)[0];
        assert_eq!(scene.body_type(bottom), Some(BodyType::Static));
        let (pos, _) = scene.object_pose(bottom).unwrap();
        assert!((pos - Vec2::new(20.0, 800.0 / 30.0 + 10.0)).length() < 1e-4);
    }

    #[test]
    fn rebuild_creates_physical_shapes_only() {
        let mut scene = manager();
        let mut sketch = Sketch::new();
        sketch.push(shape(ShapeKind::Line, 0.0, 0.0, 50.0, 50.0, false));
        sketch.push(shape(ShapeKind::Box, 0.0, 0.0, 40.0, 40.0, false));
        sketch.push(shape(ShapeKind::Ball, 100.0, 100.0, 120.0, 100.0, false));
        sketch.push(shape(ShapeKind::Box, 0.0, 0.0, 5.0, 5.0, false));
        assert_eq!(scene.rebuild(&sketch), 2);
        assert_eq!(scene.body_count(), 2);
        assert_eq!(scene.world.collider_count(), 2);
    }
}
