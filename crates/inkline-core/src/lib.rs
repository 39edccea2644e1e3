//! Inkline Core Library
//!
//! Diagram geometry for the Inkline whiteboard: connector anchors and routing,
//! path sampling and arrowheads, and alignment/spacing snaps for drag operations.
//! Every query is a pure function over borrowed inputs.

pub mod anchor;
pub mod arrowhead;
pub mod board;
pub mod config;
pub mod connector;
pub mod geometry;
pub mod path;
pub mod route;
pub mod shapes;
pub mod snap;

pub use anchor::{AnchorId, AnchorPoint, list_anchors, local_anchors, resolve_anchor};
pub use arrowhead::{ArrowHead, Compass, Heading};
pub use board::{Board, BoardError, BoardResult};
pub use config::GeometryConfig;
pub use connector::{ArrowDirection, ArrowEnd, Connector, ConnectorStyle, Endpoint, RouteKind, RouteOverrides};
pub use geometry::Bounds;
pub use path::{ConnectorPath, PathError, PathSegment, path_length, point_at_fraction};
pub use route::{ArrowPlacement, PathDescriptor, ShapeLookup, route_connector};
pub use shapes::{AnchorSet, Shape, ShapeId, ShapeKind};
pub use snap::{
    AlignmentSnap, Axis, GuideDistance, GuideLine, Orientation, SnapResult, alignment_snap,
    choose_closer_snap, distance_labels, gap_match_snap, get_bounds, snap_delta,
};
