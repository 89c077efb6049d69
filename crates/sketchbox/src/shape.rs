//! Shape records: the user-drawn primitives.
//!
//! A [`ShapeRecord`] is plain data: which kind of primitive, the two canvas
//! corners that define it, its color, rotation, and whether it should become a
//! static or dynamic body. The only behaviour is geometry: area, hit testing,
//! and the degenerate-shape guard.
//!
//! ## Corner conventions
//!
//! - **Line / Box / Wall**: `corner1` and `corner2` are opposite corners of the
//!   axis-aligned bounding rectangle (before rotation).
//! - **Ball**: `corner1` is the center; the radius is the distance to
//!   `corner2`.

use std::f32::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::{Color, Vec2, rotate};

/// Body type code for dynamic bodies in the text format.
pub const BODY_TYPE_DYNAMIC: u32 = 0;
/// Body type code for static bodies in the text format.
pub const BODY_TYPE_STATIC: u32 = 2;

/// The kind of primitive a shape describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Visual only. Never becomes a body.
    Line,
    Box,
    Wall,
    Ball,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [ShapeKind::Line, ShapeKind::Box, ShapeKind::Wall, ShapeKind::Ball];

    /// Display/category name.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Line => "Line",
            ShapeKind::Box => "Box",
            ShapeKind::Wall => "Wall",
            ShapeKind::Ball => "Ball",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name().eq_ignore_ascii_case(name))
    }

    /// Block index used by the legacy text format.
    ///
    /// Lines, boxes and balls keep the indices of older sketch files; walls
    /// live in their own block after them.
    pub fn index(self) -> u32 {
        match self {
            ShapeKind::Line => 0,
            ShapeKind::Box => 1,
            ShapeKind::Ball => 2,
            ShapeKind::Wall => 3,
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.index() == index)
    }

    /// Whether shapes of this kind are backed by a physics body.
    pub fn is_physical(self) -> bool {
        !matches!(self, ShapeKind::Line)
    }

    /// Whether the area is `π·r²` rather than `|dx|·|dy|`.
    pub fn is_round(self) -> bool {
        matches!(self, ShapeKind::Ball)
    }

    /// Resolve the canvas tool and static toggle into a kind.
    pub fn from_tool(tool: DrawTool, is_static: bool) -> Self {
        match tool {
            DrawTool::Line => ShapeKind::Line,
            DrawTool::Rectangle if is_static => ShapeKind::Wall,
            DrawTool::Rectangle => ShapeKind::Box,
            DrawTool::Circle => ShapeKind::Ball,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The canvas drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawTool {
    Line,
    #[default]
    Rectangle,
    Circle,
}

impl DrawTool {
    pub const ALL: [DrawTool; 3] = [DrawTool::Line, DrawTool::Rectangle, DrawTool::Circle];

    pub fn label(self) -> &'static str {
        match self {
            DrawTool::Line => "Line",
            DrawTool::Rectangle => "Rectangle",
            DrawTool::Circle => "Circle",
        }
    }
}

/// One user-drawn primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub kind: ShapeKind,
    pub corner1: Vec2,
    pub corner2: Vec2,
    pub color: Color,
    pub is_static: bool,
    #[serde(default)]
    pub rotation_degrees: f32,
    pub area: f32,
    /// True while the pointer is still dragging `corner2`.
    #[serde(skip)]
    drawing: bool,
}

impl ShapeRecord {
    /// A finished shape with its area computed from the corners.
    pub fn new(kind: ShapeKind, corner1: Vec2, corner2: Vec2, color: Color, is_static: bool) -> Self {
        let mut shape = Self {
            kind,
            corner1,
            corner2,
            color,
            is_static,
            rotation_degrees: 0.0,
            area: 0.0,
            drawing: false,
        };
        shape.area = shape.compute_area();
        shape
    }

    /// Start drawing a shape at `at`; both corners coincide until dragged.
    pub fn begin(kind: ShapeKind, at: Vec2, color: Color, is_static: bool) -> Self {
        Self {
            drawing: true,
            ..Self::new(kind, at, at, color, is_static)
        }
    }

    /// Restore a shape exactly as stored, keeping the recorded area.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        kind: ShapeKind,
        corner1: Vec2,
        corner2: Vec2,
        color: Color,
        is_static: bool,
        area: f32,
        rotation_degrees: f32,
    ) -> Self {
        Self {
            kind,
            corner1,
            corner2,
            color,
            is_static,
            rotation_degrees,
            area,
            drawing: false,
        }
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Move the second corner. The area follows only while drawing.
    pub fn update_corner2(&mut self, at: Vec2) {
        self.corner2 = at;
        if self.drawing {
            self.area = self.compute_area();
        }
    }

    /// Stop drawing; the area is frozen from here on.
    pub fn finish(&mut self) {
        if self.drawing {
            self.area = self.compute_area();
            self.drawing = false;
        }
    }

    /// `|dx|·|dy|` for rectangular kinds, `π·r²` for balls.
    pub fn compute_area(&self) -> f32 {
        if self.kind.is_round() {
            let r = self.radius();
            PI * r * r
        } else {
            let d = self.corner2 - self.corner1;
            d.x.abs() * d.y.abs()
        }
    }

    /// Euclidean distance between the corners.
    pub fn radius(&self) -> f32 {
        self.corner1.distance(self.corner2)
    }

    /// Center in canvas pixels.
    pub fn center(&self) -> Vec2 {
        if self.kind.is_round() {
            self.corner1
        } else {
            (self.corner1 + self.corner2) * 0.5
        }
    }

    /// Unrotated width and height in canvas pixels.
    pub fn size(&self) -> Vec2 {
        if self.kind.is_round() {
            Vec2::splat(self.radius() * 2.0)
        } else {
            (self.corner2 - self.corner1).abs()
        }
    }

    pub fn rotation_radians(&self) -> f32 {
        self.rotation_degrees.to_radians()
    }

    /// Body type code for the legacy text format.
    pub fn body_type_code(&self) -> u32 {
        if self.is_static {
            BODY_TYPE_STATIC
        } else {
            BODY_TYPE_DYNAMIC
        }
    }

    /// Degenerate shapes cannot become bodies: a rectangle with a zero-length
    /// side, or a ball with zero radius.
    pub fn is_degenerate(&self) -> bool {
        if self.kind.is_round() {
            corners_overlap(self.corner1, self.corner2)
        } else {
            self.corner1.x == self.corner2.x || self.corner1.y == self.corner2.y
        }
    }

    /// The four corners of the rotated bounding rectangle, in order around the
    /// rectangle.
    pub fn corners(&self) -> [Vec2; 4] {
        let center = self.center();
        let half = self.size() * 0.5;
        let angle = self.rotation_radians();
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .map(|c| center + rotate(c, angle))
    }

    /// Hit test against the drawn outline.
    pub fn contains(&self, point: Vec2) -> bool {
        if self.kind.is_round() {
            self.corner1.distance(point) <= self.radius()
        } else {
            point_in_area(&self.corners(), point)
        }
    }
}

/// True when the two points are equal as an x–y pair.
pub fn corners_overlap(p1: Vec2, p2: Vec2) -> bool {
    p1.x == p2.x && p1.y == p2.y
}

/// Point-in-rotated-rectangle test.
///
/// `rect` lists the corners in order around the rectangle (A, B, C, D). The
/// point M is inside when its projection onto AB and AD falls within the
/// edges: `0 ≤ AM·AB ≤ AB·AB` and `0 ≤ AM·AD ≤ AD·AD`.
pub fn point_in_area(rect: &[Vec2; 4], point: Vec2) -> bool {
    let [a, b, _, d] = *rect;
    let ab = b - a;
    let ad = d - a;
    let am = point - a;
    let p_ab = am.dot(ab);
    let p_ad = am.dot(ad);
    (0.0..=ab.dot(ab)).contains(&p_ab) && (0.0..=ad.dot(ad)).contains(&p_ad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(kind: ShapeKind, x1: f32, y1: f32, x2: f32, y2: f32) -> ShapeRecord {
        ShapeRecord::new(kind, Vec2::new(x1, y1), Vec2::new(x2, y2), Color::WHITE, false)
    }

    #[test]
    fn rectangle_area_uses_absolute_deltas() {
        assert_eq!(rect(ShapeKind::Box, 40.0, 40.0, 0.0, 10.0).area, 1200.0);
    }

    #[test]
    fn ball_area_uses_radius() {
        let ball = rect(ShapeKind::Ball, 0.0, 0.0, 3.0, 4.0);
        assert_eq!(ball.radius(), 5.0);
        assert!((ball.area - PI * 25.0).abs() < 1e-4);
    }

    #[test]
    fn area_tracks_drag_then_freezes() {
        let mut s = ShapeRecord::begin(ShapeKind::Box, Vec2::ZERO, Color::WHITE, false);
        assert!(s.is_drawing());
        assert_eq!(s.area, 0.0);
        s.update_corner2(Vec2::new(10.0, 10.0));
        assert_eq!(s.area, 100.0);
        s.update_corner2(Vec2::new(20.0, 10.0));
        assert_eq!(s.area, 200.0);
        s.finish();
        s.update_corner2(Vec2::new(100.0, 100.0));
        assert_eq!(s.area, 200.0);
    }

    #[test]
    fn degenerate_shapes() {
        assert!(rect(ShapeKind::Box, 5.0, 5.0, 5.0, 5.0).is_degenerate());
        // Axis-aligned zero-width rectangle is degenerate even though the
        // corners differ.
        assert!(rect(ShapeKind::Wall, 5.0, 0.0, 5.0, 50.0).is_degenerate());
        assert!(!rect(ShapeKind::Box, 0.0, 0.0, 1.0, 1.0).is_degenerate());
        // A ball dragged straight down still has a radius.
        assert!(!rect(ShapeKind::Ball, 5.0, 0.0, 5.0, 50.0).is_degenerate());
        assert!(rect(ShapeKind::Ball, 5.0, 5.0, 5.0, 5.0).is_degenerate());
    }

    #[test]
    fn corners_overlap_is_pair_equality() {
        assert!(corners_overlap(Vec2::new(1.0, 2.0), Vec2::new(1.0, 2.0)));
        assert!(!corners_overlap(Vec2::new(1.0, 2.0), Vec2::new(1.0, 3.0)));
    }

    #[test]
    fn point_in_rotated_rectangle() {
        let s = rect(ShapeKind::Box, -10.0, -2.0, 10.0, 2.0).with_rotation(90.0);
        // After a quarter turn the box is tall and thin.
        assert!(s.contains(Vec2::new(0.0, 9.0)));
        assert!(!s.contains(Vec2::new(9.0, 0.0)));
        assert!(s.contains(Vec2::ZERO));
    }

    #[test]
    fn point_in_area_edges_inclusive() {
        let r = [
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        assert!(point_in_area(&r, Vec2::new(4.0, 2.0)));
        assert!(!point_in_area(&r, Vec2::new(4.1, 1.0)));
        assert!(!point_in_area(&r, Vec2::new(-0.1, 1.0)));
    }

    #[test]
    fn kind_from_tool() {
        assert_eq!(ShapeKind::from_tool(DrawTool::Rectangle, false), ShapeKind::Box);
        assert_eq!(ShapeKind::from_tool(DrawTool::Rectangle, true), ShapeKind::Wall);
        assert_eq!(ShapeKind::from_tool(DrawTool::Circle, true), ShapeKind::Ball);
        assert_eq!(ShapeKind::from_tool(DrawTool::Line, false), ShapeKind::Line);
    }

    #[test]
    fn kind_names_and_indices_round_trip() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_name(kind.name()), Some(kind));
            assert_eq!(ShapeKind::from_index(kind.index()), Some(kind));
        }
        assert_eq!(ShapeKind::from_name("ball"), Some(ShapeKind::Ball));
        assert_eq!(ShapeKind::from_index(1), Some(ShapeKind::Box));
        assert_eq!(ShapeKind::from_index(2), Some(ShapeKind::Ball));
        assert_eq!(ShapeKind::from_index(3), Some(ShapeKind::Wall));
        assert_eq!(ShapeKind::from_index(9), None);
    }

    #[test]
    fn body_type_codes() {
        let mut s = rect(ShapeKind::Wall, 0.0, 0.0, 10.0, 10.0);
        assert_eq!(s.body_type_code(), BODY_TYPE_DYNAMIC);
        s.is_static = true;
        assert_eq!(s.body_type_code(), BODY_TYPE_STATIC);
    }
}
