//! Shape records read from the element store.

use crate::geometry::Bounds;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes and connectors.
pub type ShapeId = Uuid;

/// The kind of a board element that occupies space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Rect,
    Text,
    Image,
    Ellipse,
    Triangle,
    LineH,
    LineV,
}

/// Which fixed anchor table a shape kind uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSet {
    /// Four edge midpoints plus four corners.
    RectLike,
    /// Four edge midpoints.
    Ellipse,
    /// Three vertices plus three edge midpoints.
    Triangle,
    /// Not connectable.
    None,
}

impl ShapeKind {
    pub fn anchor_set(self) -> AnchorSet {
        match self {
            ShapeKind::Rect | ShapeKind::Text | ShapeKind::Image => AnchorSet::RectLike,
            ShapeKind::Ellipse => AnchorSet::Ellipse,
            ShapeKind::Triangle => AnchorSet::Triangle,
            ShapeKind::LineH | ShapeKind::LineV => AnchorSet::None,
        }
    }

    /// Check if connectors may attach to this kind.
    pub fn is_connectable(self) -> bool {
        self.anchor_set() != AnchorSet::None
    }
}

/// A positioned, sized, optionally rotated shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    /// Top-left corner before rotation.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, clockwise about the center.
    #[serde(default)]
    pub rotation: f64,
}

impl Shape {
    /// Create an unrotated shape with a fresh id.
    pub fn new(kind: ShapeKind, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            width,
            height,
            rotation: 0.0,
        }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Unrotated box. Snapping works on this frame and ignores rotation.
    pub fn frame(&self) -> Bounds {
        Bounds::new(self.position.x, self.position.y, self.width, self.height)
    }

    /// Rotation pivot.
    pub fn center(&self) -> Point {
        self.frame().center()
    }

    pub fn is_connectable(&self) -> bool {
        self.kind.is_connectable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_sets() {
        assert_eq!(ShapeKind::Rect.anchor_set(), AnchorSet::RectLike);
        assert_eq!(ShapeKind::Text.anchor_set(), AnchorSet::RectLike);
        assert_eq!(ShapeKind::Image.anchor_set(), AnchorSet::RectLike);
        assert_eq!(ShapeKind::Ellipse.anchor_set(), AnchorSet::Ellipse);
        assert_eq!(ShapeKind::Triangle.anchor_set(), AnchorSet::Triangle);
        assert!(!ShapeKind::LineH.is_connectable());
        assert!(!ShapeKind::LineV.is_connectable());
    }

    #[test]
    fn test_frame_and_center() {
        let shape = Shape::new(ShapeKind::Rect, Point::new(10.0, 20.0), 100.0, 50.0).with_rotation(45.0);
        assert_eq!(shape.frame(), Bounds::new(10.0, 20.0, 100.0, 50.0));
        assert_eq!(shape.center(), Point::new(60.0, 45.0));
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        assert_eq!(serde_json::to_string(&ShapeKind::LineH).unwrap(), "\"line-h\"");
        let kind: ShapeKind = serde_json::from_str("\"triangle\"").unwrap();
        assert_eq!(kind, ShapeKind::Triangle);
    }
}
