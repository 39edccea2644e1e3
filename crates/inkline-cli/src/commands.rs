//! Subcommand implementations. Each returns a serializable report.

use inkline_core::{
    AlignmentSnap, AnchorPoint, Board, Bounds, GeometryConfig, PathDescriptor, ShapeId, ShapeLookup,
    alignment_snap, get_bounds, list_anchors,
};
use serde::Serialize;
use thiserror::Error;

/// Lookup failures for ids named on the command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("No shape with id {0}")]
    UnknownShape(ShapeId),
    #[error("No connector with id {0}")]
    UnknownConnector(ShapeId),
    #[error("Connector {0} cannot be routed")]
    Unroutable(ShapeId),
    #[error("No shapes selected")]
    EmptySelection,
}

#[derive(Debug, Serialize)]
pub struct AnchorReport {
    pub shape: ShapeId,
    pub anchors: Vec<AnchorPoint>,
}

#[derive(Debug, Serialize)]
pub struct RoutedConnector {
    pub id: ShapeId,
    #[serde(flatten)]
    pub descriptor: PathDescriptor,
}

#[derive(Debug, Serialize)]
pub struct RouteReport {
    pub routes: Vec<RoutedConnector>,
    /// Connectors skipped because they cannot be routed.
    #[serde(skip)]
    pub dangling: Vec<ShapeId>,
}

#[derive(Debug, Serialize)]
pub struct SnapReport {
    /// Selection bounds before the snap.
    pub bounds: Bounds,
    #[serde(flatten)]
    pub snap: AlignmentSnap,
}

pub fn anchors(board: &Board, shape: ShapeId) -> Result<AnchorReport, CommandError> {
    let found = board.shape(shape).ok_or(CommandError::UnknownShape(shape))?;
    Ok(AnchorReport {
        shape,
        anchors: list_anchors(found),
    })
}

pub fn route(board: &Board, connector: Option<ShapeId>, config: &GeometryConfig) -> Result<RouteReport, CommandError> {
    if let Some(id) = connector {
        board.connector(id).ok_or(CommandError::UnknownConnector(id))?;
        let descriptor = board.route(id, config).ok_or(CommandError::Unroutable(id))?;
        return Ok(RouteReport {
            routes: vec![RoutedConnector { id, descriptor }],
            dangling: Vec::new(),
        });
    }
    let routes = board
        .route_all(config)
        .into_iter()
        .map(|(id, descriptor)| RoutedConnector { id, descriptor })
        .collect();
    Ok(RouteReport {
        routes,
        dangling: board.dangling_connectors(config),
    })
}

pub fn snap(board: &Board, moving: &[ShapeId], threshold: f64, config: &GeometryConfig) -> Result<SnapReport, CommandError> {
    if let Some(&missing) = moving.iter().find(|&&id| board.shape(id).is_none()) {
        return Err(CommandError::UnknownShape(missing));
    }
    let selected = board.shapes_by_id(moving);
    let bounds = get_bounds(&selected).ok_or(CommandError::EmptySelection)?;
    let statics = board.shapes_except(moving);
    Ok(SnapReport {
        bounds,
        snap: alignment_snap(&bounds, &statics, threshold, config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkline_core::{AnchorId, Connector, Endpoint, Shape, ShapeKind};
    use kurbo::Point;
    use uuid::Uuid;

    fn board() -> (Board, ShapeId, ShapeId, ShapeId) {
        let mut board = Board::new("cli");
        let a = board.add_shape(Shape::new(ShapeKind::Rect, Point::new(0.0, 0.0), 100.0, 100.0));
        let b = board.add_shape(Shape::new(ShapeKind::Triangle, Point::new(203.0, 0.0), 100.0, 100.0));
        let c = board.add_connector(Connector::new(
            Endpoint::new(a, AnchorId::East),
            Endpoint::new(b, AnchorId::Edge2Mid),
        ));
        (board, a, b, c)
    }

    #[test]
    fn test_anchors_report() {
        let (board, a, b, _) = board();
        assert_eq!(anchors(&board, a).unwrap().anchors.len(), 8);
        assert_eq!(anchors(&board, b).unwrap().anchors.len(), 6);
        let missing = Uuid::new_v4();
        assert_eq!(anchors(&board, missing).unwrap_err(), CommandError::UnknownShape(missing));
    }

    #[test]
    fn test_route_one_and_all() {
        let (mut board, _, b, c) = board();
        let config = GeometryConfig::default();
        assert_eq!(route(&board, Some(c), &config).unwrap().routes.len(), 1);

        board.shapes.retain(|s| s.id != b);
        assert_eq!(route(&board, Some(c), &config).unwrap_err(), CommandError::Unroutable(c));
        let all = route(&board, None, &config).unwrap();
        assert!(all.routes.is_empty());
        assert_eq!(all.dangling, vec![c]);
    }

    #[test]
    fn test_route_unknown_connector() {
        let (board, _, _, _) = board();
        let id = Uuid::new_v4();
        let err = route(&board, Some(id), &GeometryConfig::default()).unwrap_err();
        assert_eq!(err, CommandError::UnknownConnector(id));
    }

    #[test]
    fn test_snap_report() {
        let (board, _, b, _) = board();
        let report = snap(&board, &[b], 8.0, &GeometryConfig::default()).unwrap();
        assert_eq!(report.bounds.x, 203.0);
        // Nothing on x is within 8 of 203, 253 or 303.
        assert!(report.snap.x.is_none());
        // Top edges line up exactly.
        assert_eq!(report.snap.y.map(|s| s.delta), Some(0.0));
        assert!(snap(&board, &[], 8.0, &GeometryConfig::default()).is_err());
    }

    #[test]
    fn test_report_serializes() {
        let (board, _, _, c) = board();
        let report = route(&board, Some(c), &GeometryConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["routes"][0]["bend_point"].is_object());
        assert!(json["routes"][0].get("dangling").is_none());
    }
}
