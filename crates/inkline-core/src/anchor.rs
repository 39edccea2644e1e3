//! Connector attachment points on shapes.
//!
//! Each [`AnchorSet`] owns a fixed table of [`AnchorId`]s. Anchor positions are
//! first computed on the shape's unrotated frame and then rotated about the
//! shape center to land in stage coordinates.

use crate::geometry::{rotate_point, rotate_vec};
use crate::shapes::{AnchorSet, Shape};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stable anchor identifiers. The string forms are persisted and never renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorId {
    #[serde(rename = "n")]
    North,
    #[serde(rename = "s")]
    South,
    #[serde(rename = "e")]
    East,
    #[serde(rename = "w")]
    West,
    #[serde(rename = "nw")]
    NorthWest,
    #[serde(rename = "ne")]
    NorthEast,
    #[serde(rename = "se")]
    SouthEast,
    #[serde(rename = "sw")]
    SouthWest,
    /// Triangle apex.
    #[serde(rename = "0")]
    Vertex0,
    /// Triangle bottom-right corner.
    #[serde(rename = "1")]
    Vertex1,
    /// Triangle bottom-left corner.
    #[serde(rename = "2")]
    Vertex2,
    /// Midpoint of the apex to bottom-right edge.
    #[serde(rename = "0-mid")]
    Edge0Mid,
    /// Midpoint of the base.
    #[serde(rename = "1-mid")]
    Edge1Mid,
    /// Midpoint of the bottom-left to apex edge.
    #[serde(rename = "2-mid")]
    Edge2Mid,
}

const RECT_LIKE_ANCHORS: [AnchorId; 8] = [
    AnchorId::North,
    AnchorId::South,
    AnchorId::East,
    AnchorId::West,
    AnchorId::NorthWest,
    AnchorId::NorthEast,
    AnchorId::SouthEast,
    AnchorId::SouthWest,
];

const ELLIPSE_ANCHORS: [AnchorId; 4] = [
    AnchorId::North,
    AnchorId::South,
    AnchorId::East,
    AnchorId::West,
];

const TRIANGLE_ANCHORS: [AnchorId; 6] = [
    AnchorId::Vertex0,
    AnchorId::Vertex1,
    AnchorId::Vertex2,
    AnchorId::Edge0Mid,
    AnchorId::Edge1Mid,
    AnchorId::Edge2Mid,
];

/// Error returned when parsing an anchor id string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown anchor id: {0:?}")]
pub struct AnchorParseError(pub String);

impl AnchorId {
    pub const ALL: [AnchorId; 14] = [
        AnchorId::North,
        AnchorId::South,
        AnchorId::East,
        AnchorId::West,
        AnchorId::NorthWest,
        AnchorId::NorthEast,
        AnchorId::SouthEast,
        AnchorId::SouthWest,
        AnchorId::Vertex0,
        AnchorId::Vertex1,
        AnchorId::Vertex2,
        AnchorId::Edge0Mid,
        AnchorId::Edge1Mid,
        AnchorId::Edge2Mid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnchorId::North => "n",
            AnchorId::South => "s",
            AnchorId::East => "e",
            AnchorId::West => "w",
            AnchorId::NorthWest => "nw",
            AnchorId::NorthEast => "ne",
            AnchorId::SouthEast => "se",
            AnchorId::SouthWest => "sw",
            AnchorId::Vertex0 => "0",
            AnchorId::Vertex1 => "1",
            AnchorId::Vertex2 => "2",
            AnchorId::Edge0Mid => "0-mid",
            AnchorId::Edge1Mid => "1-mid",
            AnchorId::Edge2Mid => "2-mid",
        }
    }

    /// Outward direction from the shape edge at this anchor, before rotation.
    pub fn outward(self) -> Vec2 {
        match self {
            AnchorId::North | AnchorId::Vertex0 => Vec2::new(0.0, -1.0),
            AnchorId::South | AnchorId::Edge1Mid => Vec2::new(0.0, 1.0),
            AnchorId::East => Vec2::new(1.0, 0.0),
            AnchorId::West | AnchorId::Edge2Mid => Vec2::new(-1.0, 0.0),
            AnchorId::NorthWest => Vec2::new(-0.707, -0.707),
            AnchorId::NorthEast => Vec2::new(0.707, -0.707),
            AnchorId::SouthEast | AnchorId::Vertex1 => Vec2::new(0.707, 0.707),
            AnchorId::SouthWest | AnchorId::Vertex2 => Vec2::new(-0.707, 0.707),
            AnchorId::Edge0Mid => Vec2::new(0.707, -0.5),
        }
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnchorId {
    type Err = AnchorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnchorId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| AnchorParseError(s.to_string()))
    }
}

impl AnchorSet {
    /// The anchor ids this set exposes, in display order.
    pub fn ids(self) -> &'static [AnchorId] {
        match self {
            AnchorSet::RectLike => &RECT_LIKE_ANCHORS,
            AnchorSet::Ellipse => &ELLIPSE_ANCHORS,
            AnchorSet::Triangle => &TRIANGLE_ANCHORS,
            AnchorSet::None => &[],
        }
    }

    pub fn contains(self, id: AnchorId) -> bool {
        self.ids().contains(&id)
    }
}

/// An anchor id paired with a position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub anchor: AnchorId,
    pub point: Point,
}

/// Position of `id` on the unrotated frame of `shape`, if the shape's anchor set has it.
fn unrotated_position(shape: &Shape, id: AnchorId) -> Option<Point> {
    let set = shape.kind.anchor_set();
    if !set.contains(id) {
        return None;
    }
    let f = shape.frame();
    let (cx, cy) = (f.center_x(), f.center_y());
    let apex = Point::new(cx, f.y);
    let bottom_right = Point::new(f.right(), f.bottom());
    let bottom_left = Point::new(f.x, f.bottom());
    let point = match id {
        AnchorId::North => Point::new(cx, f.y),
        AnchorId::South => Point::new(cx, f.bottom()),
        AnchorId::East => Point::new(f.right(), cy),
        AnchorId::West => Point::new(f.x, cy),
        AnchorId::NorthWest => Point::new(f.x, f.y),
        AnchorId::NorthEast => Point::new(f.right(), f.y),
        AnchorId::SouthEast => bottom_right,
        AnchorId::SouthWest => bottom_left,
        AnchorId::Vertex0 => apex,
        AnchorId::Vertex1 => bottom_right,
        AnchorId::Vertex2 => bottom_left,
        AnchorId::Edge0Mid => apex.midpoint(bottom_right),
        AnchorId::Edge1Mid => bottom_right.midpoint(bottom_left),
        AnchorId::Edge2Mid => bottom_left.midpoint(apex),
    };
    Some(point)
}

/// Anchors of `shape` on its unrotated frame. Empty for non-connectable kinds.
pub fn local_anchors(shape: &Shape) -> Vec<AnchorPoint> {
    shape
        .kind
        .anchor_set()
        .ids()
        .iter()
        .filter_map(|&anchor| {
            unrotated_position(shape, anchor).map(|point| AnchorPoint { anchor, point })
        })
        .collect()
}

/// Stage position of one anchor with the shape's rotation applied.
///
/// Returns `None` when the shape is not connectable or does not carry `id`.
pub fn resolve_anchor(shape: &Shape, id: AnchorId) -> Option<Point> {
    let local = unrotated_position(shape, id)?;
    Some(rotate_point(local, shape.center(), shape.rotation))
}

/// Every anchor of `shape` in stage coordinates, for hover affordances.
pub fn list_anchors(shape: &Shape) -> Vec<AnchorPoint> {
    let center = shape.center();
    local_anchors(shape)
        .into_iter()
        .map(|a| AnchorPoint {
            anchor: a.anchor,
            point: rotate_point(a.point, center, shape.rotation),
        })
        .collect()
}

/// Outward direction at `id` with the shape's rotation applied.
pub fn outward_direction(shape: &Shape, id: AnchorId) -> Vec2 {
    rotate_vec(id.outward(), shape.rotation)
}
