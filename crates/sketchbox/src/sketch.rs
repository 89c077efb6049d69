//! The drawn sketch and the pointer state machine that feeds it.

use std::collections::BTreeMap;

use crate::math::{Color, Vec2};
use crate::shape::{DrawTool, ShapeKind, ShapeRecord};

/// Every committed shape, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sketch {
    shapes: Vec<ShapeRecord>,
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, shape: ShapeRecord) {
        self.shapes.push(shape);
    }

    /// Remove and return the newest shape.
    pub fn pop(&mut self) -> Option<ShapeRecord> {
        self.shapes.pop()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of shapes of one kind.
    pub fn count(&self, kind: ShapeKind) -> usize {
        self.shapes.iter().filter(|s| s.kind == kind).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ShapeRecord> {
        self.shapes.iter()
    }

    pub fn as_slice(&self) -> &[ShapeRecord] {
        &self.shapes
    }

    /// Shapes grouped by kind, insertion order kept inside each group.
    pub fn by_kind(&self) -> BTreeMap<ShapeKind, Vec<&ShapeRecord>> {
        let mut groups: BTreeMap<ShapeKind, Vec<&ShapeRecord>> = BTreeMap::new();
        for shape in &self.shapes {
            groups.entry(shape.kind).or_default().push(shape);
        }
        groups
    }

    /// Index of the topmost (newest) shape under `point`.
    pub fn pick(&self, point: Vec2) -> Option<usize> {
        self.shapes.iter().rposition(|s| s.contains(point))
    }

    pub fn get(&self, index: usize) -> Option<&ShapeRecord> {
        self.shapes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ShapeRecord> {
        self.shapes.get_mut(index)
    }
}

impl From<Vec<ShapeRecord>> for Sketch {
    fn from(shapes: Vec<ShapeRecord>) -> Self {
        Self { shapes }
    }
}

impl<'a> IntoIterator for &'a Sketch {
    type Item = &'a ShapeRecord;
    type IntoIter = std::slice::Iter<'a, ShapeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}

/// Turns a press / drag / release sequence into a [`ShapeRecord`].
#[derive(Debug, Clone, Default)]
pub struct SketchPad {
    active: Option<ShapeRecord>,
}

impl SketchPad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a shape at `at`. Replaces any shape still in progress.
    pub fn begin(&mut self, tool: DrawTool, is_static: bool, at: Vec2, color: Color) {
        let kind = ShapeKind::from_tool(tool, is_static);
        self.active = Some(ShapeRecord::begin(kind, at, color, is_static));
    }

    /// Move the free corner of the shape in progress.
    pub fn drag_to(&mut self, at: Vec2) {
        if let Some(shape) = &mut self.active {
            shape.update_corner2(at);
        }
    }

    /// Finish the shape in progress, freezing its area.
    pub fn release(&mut self) -> Option<ShapeRecord> {
        let mut shape = self.active.take()?;
        shape.finish();
        Some(shape)
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// The shape being drawn, for preview.
    pub fn active(&self) -> Option<&ShapeRecord> {
        self.active.as_ref()
    }
}
