//! Rendering bridge: scene objects → sprite draw calls.
//!
//! The scene stores bodies in world units. [`draw_scene`] reads each body's
//! current pose, converts it back to canvas pixels, and hands one [`Sprite`]
//! per object to a [`SpriteRenderer`]. The renderer decides how a sprite is
//! actually painted (the editor uses the egui painter).

use crate::math::{Color, Vec2};
use crate::scene::SceneManager;
use crate::shape::ShapeKind;

/// Primitive a sprite is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteShape {
    Quad,
    Disc,
}

/// One draw call in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub shape: SpriteShape,
    pub center: Vec2,
    /// Full width and height (diameter for discs).
    pub size: Vec2,
    /// Radians.
    pub rotation: f32,
    pub color: Color,
}

/// A sink for sprite draw calls.
pub trait SpriteRenderer {
    fn draw_sprite(&mut self, sprite: &Sprite);
}

impl SpriteRenderer for Vec<Sprite> {
    fn draw_sprite(&mut self, sprite: &Sprite) {
        self.push(*sprite);
    }
}

/// Emit one sprite per scene object at its current body pose.
///
/// Returns the number of sprites drawn.
pub fn draw_scene(scene: &SceneManager, render_scale: f32, renderer: &mut impl SpriteRenderer) -> usize {
    let mut drawn = 0;
    for object in scene.iter_objects() {
        let Some((position, angle)) = scene.object_pose(object) else {
            log::warn!("{} has no live body, skipping", object.name);
            continue;
        };
        let shape = if object.kind == ShapeKind::Ball {
            SpriteShape::Disc
        } else {
            SpriteShape::Quad
        };
        renderer.draw_sprite(&Sprite {
            shape,
            center: position * render_scale,
            size: object.dimensions * 2.0 * render_scale,
            rotation: angle,
            color: object.color,
        });
        drawn += 1;
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SandboxConfig;
    use crate::shape::ShapeRecord;

    #[test]
    fn sprites_follow_objects() {
        let mut scene = SceneManager::new(&SandboxConfig::default());
        let red = Color::rgb(1.0, 0.0, 0.0);
        scene.create_object(&ShapeRecord::new(
            ShapeKind::Box,
            Vec2::new(0.0, 0.0),
            Vec2::new(60.0, 30.0),
            red,
            false,
        ));
        scene.create_object(&ShapeRecord::new(
            ShapeKind::Ball,
            Vec2::new(300.0, 300.0),
            Vec2::new(330.0, 300.0),
            Color::WHITE,
            true,
        ));

        let mut sprites: Vec<Sprite> = Vec::new();
        assert_eq!(draw_scene(&scene, 30.0, &mut sprites), 2);

        let quad = sprites.iter().find(|s| s.shape == SpriteShape::Quad).unwrap();
        assert!((quad.center - Vec2::new(30.0, 15.0)).length() < 1e-3);
        assert!((quad.size - Vec2::new(60.0, 30.0)).length() < 1e-3);
        assert_eq!(quad.color, red);

        let disc = sprites.iter().find(|s| s.shape == SpriteShape::Disc).unwrap();
        assert!((disc.center - Vec2::new(300.0, 300.0)).length() < 1e-3);
        assert!((disc.size - Vec2::splat(60.0)).length() < 1e-3);
    }

    #[test]
    fn empty_scene_draws_nothing() {
        let scene = SceneManager::new(&SandboxConfig::default());
        let mut sprites: Vec<Sprite> = Vec::new();
        assert_eq!(draw_scene(&scene, 30.0, &mut sprites), 0);
        assert!(sprites.is_empty());
    }
}
