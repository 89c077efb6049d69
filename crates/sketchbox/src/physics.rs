//! Physics world boundary over Rapier.
//!
//! [`PhysicsWorld`] owns every Rapier set (bodies, colliders, joints, solver
//! state). Callers only ever hold a [`BodyHandle`]; all creation and
//! destruction goes through the world, which makes it the sole owner of body
//! storage. The world also remembers creation order so the most recent body
//! can be popped like a stack.

use rapier2d::prelude::*;

use crate::config::StepSettings;
use crate::error::PhysicsError;
use crate::math::Vec2;

// ── Handles & descriptors ───────────────────────────────────────────────

/// Opaque handle to a body owned by a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// Static bodies never move; dynamic bodies respond to forces and contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Static,
}

fn body_type_to_rapier(bt: BodyType) -> RigidBodyType {
    match bt {
        BodyType::Dynamic => RigidBodyType::Dynamic,
        BodyType::Static => RigidBodyType::Fixed,
    }
}

/// Where and how to create a body.
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    pub body_type: BodyType,
    /// World-space position of the body origin.
    pub position: Vec2,
    /// Radians.
    pub rotation: f32,
}

/// Collision geometry, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Cuboid { hx: f32, hy: f32 },
    Ball { radius: f32 },
}

/// A collider attached to a body: geometry plus material.
#[derive(Debug, Clone, Copy)]
pub struct ColliderDesc {
    pub shape: ColliderShape,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl ColliderDesc {
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            density: 1.0,
            friction: 0.3,
            restitution: 0.0,
        }
    }

    pub fn with_density(mut self, d: f32) -> Self {
        self.density = d;
        self
    }

    pub fn with_friction(mut self, f: f32) -> Self {
        self.friction = f;
        self
    }

    pub fn with_restitution(mut self, r: f32) -> Self {
        self.restitution = r;
        self
    }
}

fn shape_to_collider_builder(shape: &ColliderShape) -> ColliderBuilder {
    match *shape {
        ColliderShape::Cuboid { hx, hy } => ColliderBuilder::cuboid(hx, hy),
        ColliderShape::Ball { radius } => ColliderBuilder::ball(radius),
    }
}

fn build_collider(desc: &ColliderDesc) -> Collider {
    shape_to_collider_builder(&desc.shape)
        .density(desc.density)
        .friction(desc.friction)
        .restitution(desc.restitution)
        .build()
}

// ── World ───────────────────────────────────────────────────────────────

/// The 2D physics world. Owns all body memory.
pub struct PhysicsWorld {
    gravity: Vec2,
    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    /// Live handles, oldest first.
    order: Vec<RigidBodyHandle>,
}

impl std::fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("gravity", &self.gravity)
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .finish()
    }
}

impl PhysicsWorld {
    /// Create an empty world with the given gravity.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            pipeline: PhysicsPipeline::new(),
            params: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            order: Vec::new(),
        }
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    /// Number of live bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of live colliders.
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Allocate a body. It has no collider until [`attach_collider`](Self::attach_collider).
    pub fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let rb = RigidBodyBuilder::new(body_type_to_rapier(desc.body_type))
            .translation(desc.position)
            .rotation(desc.rotation)
            .build();
        let handle = self.bodies.insert(rb);
        self.order.push(handle);
        BodyHandle(handle)
    }

    /// Allocate a body together with its collider.
    pub fn create_body_with_collider(&mut self, desc: BodyDesc, collider: ColliderDesc) -> BodyHandle {
        let body = self.create_body(desc);
        self.colliders
            .insert_with_parent(build_collider(&collider), body.0, &mut self.bodies);
        body
    }

    /// Attach a collider to a live body.
    pub fn attach_collider(&mut self, body: BodyHandle, desc: ColliderDesc) -> Result<(), PhysicsError> {
        if !self.bodies.contains(body.0) {
            return Err(PhysicsError::UnknownBody(body));
        }
        self.colliders
            .insert_with_parent(build_collider(&desc), body.0, &mut self.bodies);
        Ok(())
    }

    /// Destroy a body and every collider attached to it.
    pub fn destroy_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError> {
        let removed = self.bodies.remove(
            body.0,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        if removed.is_none() {
            return Err(PhysicsError::UnknownBody(body));
        }
        self.order.retain(|h| *h != body.0);
        Ok(())
    }

    /// Live bodies, most recently created first.
    pub fn bodies_newest_first(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.order.iter().rev().map(|h| BodyHandle(*h))
    }

    /// The most recently created live body.
    pub fn newest_body(&self) -> Option<BodyHandle> {
        self.order.last().map(|h| BodyHandle(*h))
    }

    /// World-space position and angle (radians) of a body.
    pub fn body_pose(&self, body: BodyHandle) -> Option<(Vec2, f32)> {
        let rb = self.bodies.get(body.0)?;
        let pos = rb.translation();
        Some((Vec2::new(pos.x, pos.y), rb.rotation().angle()))
    }

    pub fn body_type(&self, body: BodyHandle) -> Option<BodyType> {
        let rb = self.bodies.get(body.0)?;
        Some(if rb.is_dynamic() {
            BodyType::Dynamic
        } else {
            BodyType::Static
        })
    }

    /// Advance the simulation by one fixed step.
    ///
    /// Only `settings.dt` reaches Rapier. Its solver has no velocity/position
    /// split, so the iteration counts stay at Rapier's own defaults.
    pub fn step(&mut self, settings: &StepSettings) {
        self.params.dt = settings.dt;
        self.pipeline.step(
            self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dynamic_at(x: f32, y: f32) -> BodyDesc {
        BodyDesc {
            body_type: BodyType::Dynamic,
            position: Vec2::new(x, y),
            rotation: 0.0,
        }
    }

    #[test]
    fn create_and_destroy() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 10.0));
        let a = world.create_body(dynamic_at(0.0, 0.0));
        world
            .attach_collider(a, ColliderDesc::new(ColliderShape::Ball { radius: 1.0 }))
            .unwrap();
        assert_eq!(world.body_count(), 1);
        assert!(world.contains(a));

        world.destroy_body(a).unwrap();
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.destroy_body(a), Err(PhysicsError::UnknownBody(a)));
    }

    #[test]
    fn newest_first_order() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let a = world.create_body(dynamic_at(0.0, 0.0));
        let b = world.create_body(dynamic_at(1.0, 0.0));
        let c = world.create_body(dynamic_at(2.0, 0.0));
        assert_eq!(world.bodies_newest_first().collect::<Vec<_>>(), vec![c, b, a]);

        world.destroy_body(b).unwrap();
        assert_eq!(world.newest_body(), Some(c));
        world.destroy_body(c).unwrap();
        assert_eq!(world.newest_body(), Some(a));
    }

    #[test]
    fn dynamic_body_falls_along_gravity() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 10.0));
        let body = world.create_body(dynamic_at(5.0, 5.0));
        world
            .attach_collider(body, ColliderDesc::new(ColliderShape::Cuboid { hx: 0.5, hy: 0.5 }))
            .unwrap();
        for _ in 0..30 {
            world.step(&StepSettings::default());
        }
        let (pos, _) = world.body_pose(body).unwrap();
        assert!(pos.y > 5.0, "body should move down the canvas, got {pos:?}");
        assert!((pos.x - 5.0).abs() < 1e-3);
    }

    #[test]
    fn static_body_stays_put() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 10.0));
        let wall = world.create_body(BodyDesc {
            body_type: BodyType::Static,
            position: Vec2::new(1.0, 2.0),
            rotation: 0.3,
        });
        world
            .attach_collider(
                wall,
                ColliderDesc::new(ColliderShape::Cuboid { hx: 1.0, hy: 1.0 }).with_density(0.0),
            )
            .unwrap();
        world.step(&StepSettings::default());
        let (pos, angle) = world.body_pose(wall).unwrap();
        assert_eq!(pos, Vec2::new(1.0, 2.0));
        assert!((angle - 0.3).abs() < 1e-5);
        assert_eq!(world.body_type(wall), Some(BodyType::Static));
    }

    #[test]
    fn body_created_with_collider_collides() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 10.0));
        world.create_body_with_collider(
            BodyDesc {
                body_type: BodyType::Static,
                position: Vec2::new(0.0, 5.0),
                rotation: 0.0,
            },
            ColliderDesc::new(ColliderShape::Cuboid { hx: 5.0, hy: 0.5 }),
        );
        let ball = world.create_body_with_collider(
            dynamic_at(0.0, 0.0),
            ColliderDesc::new(ColliderShape::Ball { radius: 0.5 }),
        );
        assert_eq!(world.collider_count(), 2);

        for _ in 0..240 {
            world.step(&StepSettings::default());
        }
        let (pos, _) = world.body_pose(ball).unwrap();
        // Resting on the floor's top face at y = 4.5.
        assert!(pos.y > 3.8 && pos.y < 4.1, "ball should rest on the floor, got {pos:?}");
    }

    #[test]
    fn attach_to_dead_body_fails() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let a = world.create_body(dynamic_at(0.0, 0.0));
        world.destroy_body(a).unwrap();
        let err = world
            .attach_collider(a, ColliderDesc::new(ColliderShape::Ball { radius: 1.0 }))
            .unwrap_err();
        assert_eq!(err, PhysicsError::UnknownBody(a));
    }
}
