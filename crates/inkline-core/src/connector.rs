//! Connector records: an edge between two shape anchors.

use crate::anchor::AnchorId;
use crate::arrowhead::Compass;
use crate::config::GeometryConfig;
use crate::shapes::ShapeId;
use kurbo::Point;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Line style used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorStyle {
    #[default]
    Solid,
    Dashed,
    Double,
}

/// How a connector between two different shapes is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    /// Horizontal, vertical, horizontal.
    #[default]
    Orthogonal,
    /// Single quadratic curve.
    Curved,
}

/// Direction an arrowhead points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowDirection {
    /// Follow the path tangent.
    #[default]
    Auto,
    #[serde(rename = "n")]
    North,
    #[serde(rename = "s")]
    South,
    #[serde(rename = "e")]
    East,
    #[serde(rename = "w")]
    West,
}

impl ArrowDirection {
    /// The fixed compass direction, or `None` for tangent-following arrows.
    pub fn compass(self) -> Option<Compass> {
        match self {
            ArrowDirection::Auto => None,
            ArrowDirection::North => Some(Compass::North),
            ArrowDirection::South => Some(Compass::South),
            ArrowDirection::East => Some(Compass::East),
            ArrowDirection::West => Some(Compass::West),
        }
    }
}

/// Arrow settings for one end of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArrowEnd {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub direction: ArrowDirection,
}

impl ArrowEnd {
    pub fn auto() -> Self {
        Self {
            enabled: true,
            direction: ArrowDirection::Auto,
        }
    }

    pub fn fixed(direction: ArrowDirection) -> Self {
        Self {
            enabled: true,
            direction,
        }
    }
}

/// One end of a connector. Either field may be unset while the user is still drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub shape_id: Option<ShapeId>,
    #[serde(default, deserialize_with = "lenient_anchor")]
    pub anchor: Option<AnchorId>,
}

impl Endpoint {
    pub fn new(shape_id: ShapeId, anchor: AnchorId) -> Self {
        Self {
            shape_id: Some(shape_id),
            anchor: Some(anchor),
        }
    }
}

/// Unknown anchor strings become "unset" so one bad connector cannot poison a board.
fn lenient_anchor<'de, D>(deserializer: D) -> Result<Option<AnchorId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| match s.parse() {
        Ok(id) => Some(id),
        Err(e) => {
            log::warn!("Ignoring connector anchor: {}", e);
            None
        }
    }))
}

/// User-placed route points. Each stays set until the user clears or re-drags it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteOverrides {
    /// X of the vertical segment of an orthogonal route.
    #[serde(default)]
    pub bend_x: Option<f64>,
    /// Control point of a curved route.
    #[serde(default)]
    pub control: Option<Point>,
    /// Apex of a self-loop.
    #[serde(default)]
    pub self_bend: Option<Point>,
}

impl RouteOverrides {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.bend_x.is_none() && self.control.is_none() && self.self_bend.is_none()
    }
}

/// A connector between two anchors, possibly on the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub id: ShapeId,
    #[serde(default)]
    pub start: Endpoint,
    #[serde(default)]
    pub end: Endpoint,
    #[serde(default)]
    pub style: ConnectorStyle,
    #[serde(default)]
    pub route: RouteKind,
    #[serde(default)]
    pub start_arrow: ArrowEnd,
    #[serde(default)]
    pub end_arrow: ArrowEnd,
    /// Arrowhead size in world units.
    #[serde(default)]
    pub arrow_size: Option<f64>,
    #[serde(default)]
    pub border_width: Option<f64>,
    #[serde(default)]
    pub overrides: RouteOverrides,
}

impl Connector {
    /// Create an orthogonal, solid, arrowless connector with a fresh id.
    pub fn new(start: Endpoint, end: Endpoint) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style: ConnectorStyle::default(),
            route: RouteKind::default(),
            start_arrow: ArrowEnd::default(),
            end_arrow: ArrowEnd::default(),
            arrow_size: None,
            border_width: None,
            overrides: RouteOverrides::default(),
        }
    }

    pub fn with_route(mut self, route: RouteKind) -> Self {
        self.route = route;
        self
    }

    pub fn with_arrows(mut self, start: ArrowEnd, end: ArrowEnd) -> Self {
        self.start_arrow = start;
        self.end_arrow = end;
        self
    }

    /// Check if both ends reference the same shape.
    pub fn is_self(&self) -> bool {
        matches!(
            (self.start.shape_id, self.end.shape_id),
            (Some(a), Some(b)) if a == b
        )
    }

    pub fn border_width(&self, config: &GeometryConfig) -> f64 {
        self.border_width.unwrap_or(config.default_border_width)
    }

    pub fn arrow_size(&self, config: &GeometryConfig) -> f64 {
        self.arrow_size.unwrap_or(config.default_arrow_size)
    }

    /// Store a dragged bend handle as the override matching the current routing mode.
    pub fn drag_bend(&mut self, point: Point) {
        if self.is_self() {
            self.overrides.self_bend = Some(point);
            return;
        }
        match self.route {
            RouteKind::Orthogonal => self.overrides.bend_x = Some(point.x),
            RouteKind::Curved => self.overrides.control = Some(point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn between_two() -> Connector {
        Connector::new(
            Endpoint::new(Uuid::new_v4(), AnchorId::East),
            Endpoint::new(Uuid::new_v4(), AnchorId::West),
        )
    }

    #[test]
    fn test_is_self() {
        let id = Uuid::new_v4();
        let looped = Connector::new(
            Endpoint::new(id, AnchorId::North),
            Endpoint::new(id, AnchorId::East),
        );
        assert!(looped.is_self());
        assert!(!between_two().is_self());
        assert!(!Connector::new(Endpoint::default(), Endpoint::default()).is_self());
    }

    #[test]
    fn test_drag_bend_orthogonal_sets_only_bend_x() {
        let mut c = between_two();
        c.drag_bend(Point::new(42.0, 7.0));
        assert_eq!(c.overrides.bend_x, Some(42.0));
        assert!(c.overrides.control.is_none());
    }

    #[test]
    fn test_drag_bend_curved_sets_control() {
        let mut c = between_two().with_route(RouteKind::Curved);
        c.drag_bend(Point::new(1.0, 2.0));
        assert_eq!(c.overrides.control, Some(Point::new(1.0, 2.0)));
        assert!(c.overrides.bend_x.is_none());
    }

    #[test]
    fn test_drag_bend_self_loop() {
        let id = Uuid::new_v4();
        let mut c = Connector::new(
            Endpoint::new(id, AnchorId::North),
            Endpoint::new(id, AnchorId::East),
        );
        c.drag_bend(Point::new(5.0, 5.0));
        assert_eq!(c.overrides.self_bend, Some(Point::new(5.0, 5.0)));
        c.overrides.clear();
        assert!(c.overrides.is_empty());
    }

    #[test]
    fn test_unknown_anchor_deserializes_as_unset() {
        let json = format!(
            r#"{{ "shape_id": "{}", "anchor": "bogus" }}"#,
            Uuid::new_v4()
        );
        let end: Endpoint = serde_json::from_str(&json).unwrap();
        assert!(end.shape_id.is_some());
        assert!(end.anchor.is_none());
    }

    #[test]
    fn test_defaults_from_config() {
        let c = between_two();
        let config = GeometryConfig::default();
        assert_eq!(c.border_width(&config), 2.0);
        assert_eq!(c.arrow_size(&config), 10.0);
    }
}
