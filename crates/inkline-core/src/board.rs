//! Board document: the shapes and connectors the geometry queries read.

use crate::config::GeometryConfig;
use crate::connector::Connector;
use crate::geometry::Bounds;
use crate::route::{PathDescriptor, ShapeLookup, route_connector};
use crate::shapes::{Shape, ShapeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// Board loading errors.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Invalid board JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate element id: {0}")]
    DuplicateId(Uuid),
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// A board's elements, in z-order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

impl Board {
    /// Create an empty board.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            shapes: Vec::new(),
            connectors: Vec::new(),
        }
    }

    /// Deserialize a board, rejecting documents that reuse an element id.
    pub fn from_json(json: &str) -> BoardResult<Self> {
        let board: Self = serde_json::from_str(json)?;
        board.validate()?;
        Ok(board)
    }

    /// Serialize the board to JSON.
    pub fn to_json(&self) -> BoardResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> BoardResult<()> {
        let mut seen = HashSet::new();
        let ids = self
            .shapes
            .iter()
            .map(|s| s.id)
            .chain(self.connectors.iter().map(|c| c.id));
        for id in ids {
            if !seen.insert(id) {
                return Err(BoardError::DuplicateId(id));
            }
        }
        Ok(())
    }

    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id;
        self.shapes.push(shape);
        id
    }

    pub fn add_connector(&mut self, connector: Connector) -> ShapeId {
        let id = connector.id;
        self.connectors.push(connector);
        id
    }

    pub fn connector(&self, id: ShapeId) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.id == id)
    }

    pub fn connector_mut(&mut self, id: ShapeId) -> Option<&mut Connector> {
        self.connectors.iter_mut().find(|c| c.id == id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    /// Route one connector.
    pub fn route(&self, id: ShapeId, config: &GeometryConfig) -> Option<PathDescriptor> {
        route_connector(self.connector(id)?, self, config)
    }

    /// Route every connector that can be routed, in z-order.
    pub fn route_all(&self, config: &GeometryConfig) -> Vec<(ShapeId, PathDescriptor)> {
        self.connectors
            .iter()
            .filter_map(|c| route_connector(c, self, config).map(|d| (c.id, d)))
            .collect()
    }

    /// Connectors that cannot be routed any more, e.g. after a shape was deleted.
    pub fn dangling_connectors(&self, config: &GeometryConfig) -> Vec<ShapeId> {
        self.connectors
            .iter()
            .filter(|c| route_connector(c, self, config).is_none())
            .map(|c| c.id)
            .collect()
    }

    /// Padded path bounds of a connector, for hit-testing and selection.
    pub fn connector_bounds(&self, id: ShapeId, config: &GeometryConfig) -> Option<Bounds> {
        self.route(id, config).map(|d| d.bounds)
    }

    /// Shapes other than `ids`, used as the static set while `ids` are dragged.
    pub fn shapes_except(&self, ids: &[ShapeId]) -> Vec<Shape> {
        self.shapes
            .iter()
            .filter(|s| !ids.contains(&s.id))
            .cloned()
            .collect()
    }

    /// Shapes named by `ids`, in z-order.
    pub fn shapes_by_id(&self, ids: &[ShapeId]) -> Vec<Shape> {
        self.shapes
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect()
    }
}

impl ShapeLookup for Board {
    fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.as_slice().shape(id)
    }
}
