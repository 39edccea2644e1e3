//! Connector routing: resolved anchors in, drawable path descriptor out.

use crate::anchor::{AnchorId, outward_direction, resolve_anchor};
use crate::arrowhead::{ArrowHead, Heading};
use crate::config::{ARROW_TANGENT_STEP, GeometryConfig};
use crate::connector::{ArrowEnd, Connector, Endpoint, RouteKind};
use crate::geometry::{Bounds, normalize_or_zero, rotate_vec};
use crate::path::ConnectorPath;
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read-only access to shapes by id.
pub trait ShapeLookup {
    fn shape(&self, id: ShapeId) -> Option<&Shape>;
}

impl ShapeLookup for [Shape] {
    fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.iter().find(|s| s.id == id)
    }
}

impl ShapeLookup for Vec<Shape> {
    fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.as_slice().shape(id)
    }
}

impl ShapeLookup for HashMap<ShapeId, Shape> {
    fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.get(&id)
    }
}

/// An arrow marker placed along the path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowPlacement {
    pub position: Point,
    pub head: ArrowHead,
}

/// Everything the renderer and interaction layer need to draw and edit a connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathDescriptor {
    pub path: ConnectorPath,
    pub start: Point,
    pub end: Point,
    /// Path bounds grown by the hit-test padding.
    pub bounds: Bounds,
    /// Drag handle: bend x, control point, or self-loop apex.
    pub bend_point: Point,
    pub start_arrow: Option<ArrowPlacement>,
    pub end_arrow: Option<ArrowPlacement>,
}

struct Route {
    path: ConnectorPath,
    bend_point: Point,
}

fn endpoint_shape<'a, L>(end: &Endpoint, shapes: &'a L, which: &str, connector: ShapeId) -> Option<(&'a Shape, AnchorId)>
where
    L: ShapeLookup + ?Sized,
{
    let (Some(shape_id), Some(anchor)) = (end.shape_id, end.anchor) else {
        log::debug!("Connector {} has no {} attachment", connector, which);
        return None;
    };
    let Some(shape) = shapes.shape(shape_id) else {
        log::debug!("Connector {} {} shape {} is missing", connector, which, shape_id);
        return None;
    };
    Some((shape, anchor))
}

/// Route `connector` against the shapes in `shapes`.
///
/// Returns `None` when either end is unset, references a missing shape, or names
/// an anchor its shape does not have. Callers must not draw in that case.
pub fn route_connector<L>(connector: &Connector, shapes: &L, config: &GeometryConfig) -> Option<PathDescriptor>
where
    L: ShapeLookup + ?Sized,
{
    let (start_shape, start_anchor) = endpoint_shape(&connector.start, shapes, "start", connector.id)?;
    let (end_shape, end_anchor) = endpoint_shape(&connector.end, shapes, "end", connector.id)?;

    let (Some(start), Some(end)) = (
        resolve_anchor(start_shape, start_anchor),
        resolve_anchor(end_shape, end_anchor),
    ) else {
        log::debug!("Connector {} references an anchor its shape does not have", connector.id);
        return None;
    };

    let route = if connector.is_self() {
        self_loop_route(start_shape, (start, start_anchor), (end, end_anchor), connector.overrides.self_bend, config)
    } else {
        match connector.route {
            RouteKind::Orthogonal => orthogonal_route(start, end, connector.overrides.bend_x),
            RouteKind::Curved => curved_route(start, end, connector.overrides.control, config),
        }
    };

    let pad = connector.border_width(config) + config.hit_padding;
    let bounds = Bounds::from_points(route.path.points())?.inflate(pad);

    let size = connector.arrow_size(config);
    let start_arrow = place_arrow(&route.path, connector.start_arrow, config.arrow_start_fraction, ARROW_TANGENT_STEP, size, config);
    let end_arrow = place_arrow(&route.path, connector.end_arrow, config.arrow_end_fraction, -ARROW_TANGENT_STEP, size, config);

    let descriptor = PathDescriptor {
        path: route.path,
        start,
        end,
        bounds,
        bend_point: route.bend_point,
        start_arrow,
        end_arrow,
    };
    if !descriptor_is_finite(&descriptor) {
        log::debug!("Connector {} produced non-finite geometry", connector.id);
        return None;
    }
    Some(descriptor)
}

/// Horizontal to `bend_x`, vertical, horizontal to the end.
fn orthogonal_route(start: Point, end: Point, bend_x: Option<f64>) -> Route {
    let bend_x = bend_x.unwrap_or((start.x + end.x) / 2.0);
    let mut path = ConnectorPath::new(start);
    path.line_to(Point::new(bend_x, start.y));
    path.line_to(Point::new(bend_x, end.y));
    path.line_to(end);
    Route {
        path,
        bend_point: Point::new(bend_x, (start.y + end.y) / 2.0),
    }
}

/// Default control point: the midpoint pushed by `curve_bulge` of the segment length,
/// along x only when the segment has a y extent and along -y only when it has an x extent.
pub fn default_control_point(start: Point, end: Point, config: &GeometryConfig) -> Point {
    let mid = start.midpoint(end);
    let d = end - start;
    let bulge = d.hypot() * config.curve_bulge;
    let ox = if d.y != 0.0 { bulge } else { 0.0 };
    let oy = if d.x != 0.0 { bulge } else { 0.0 };
    Point::new(mid.x + ox, mid.y - oy)
}

fn curved_route(start: Point, end: Point, control: Option<Point>, config: &GeometryConfig) -> Route {
    let control = control.unwrap_or_else(|| default_control_point(start, end, config));
    let mut path = ConnectorPath::new(start);
    path.quad_to(control, end);
    Route {
        path,
        bend_point: control,
    }
}

/// Default apex of a self-loop on `shape` given its two stand-off points.
///
/// The apex is pushed away from the shape center through the stand-off midpoint.
/// When that midpoint coincides with the center the push follows the shape's
/// rotated local south.
pub fn default_self_loop_apex(shape: &Shape, start_out: Point, end_out: Point, config: &GeometryConfig) -> Point {
    let mid = start_out.midpoint(end_out);
    let mut dir = normalize_or_zero(mid - shape.center());
    if dir == Vec2::ZERO {
        dir = rotate_vec(Vec2::new(0.0, 1.0), shape.rotation);
    }
    mid + dir * config.self_loop_push_out
}

fn self_loop_route(
    shape: &Shape,
    (start, start_anchor): (Point, AnchorId),
    (end, end_anchor): (Point, AnchorId),
    apex: Option<Point>,
    config: &GeometryConfig,
) -> Route {
    let start_out = start + outward_direction(shape, start_anchor) * config.self_loop_offset;
    let end_out = end + outward_direction(shape, end_anchor) * config.self_loop_offset;
    let apex = apex.unwrap_or_else(|| default_self_loop_apex(shape, start_out, end_out, config));

    let mut path = ConnectorPath::new(start);
    path.line_to(start_out);
    path.line_to(apex);
    path.line_to(end_out);
    path.line_to(end);
    Route {
        path,
        bend_point: apex,
    }
}

/// Arrow marker at `fraction`, aimed using a sample `step` further along the path.
///
/// A positive step makes the head point back toward the path start.
fn place_arrow(
    path: &ConnectorPath,
    end: ArrowEnd,
    fraction: f64,
    step: f64,
    size: f64,
    config: &GeometryConfig,
) -> Option<ArrowPlacement> {
    if !end.enabled {
        return None;
    }
    let position = path.point_at_fraction(fraction);
    let heading = match end.direction.compass() {
        Some(compass) => Heading::Fixed(compass),
        None => Heading::From(path.point_at_fraction(fraction + step)),
    };
    Some(ArrowPlacement {
        position,
        head: ArrowHead::new(position, heading, size, config.arrow_spread),
    })
}

fn descriptor_is_finite(d: &PathDescriptor) -> bool {
    let arrows_finite = [d.start_arrow, d.end_arrow].iter().flatten().all(|a| {
        a.position.is_finite() && a.head.left.is_finite() && a.head.right.is_finite()
    });
    d.path.points().all(|p| p.is_finite())
        && d.bend_point.is_finite()
        && d.bounds.x.is_finite()
        && d.bounds.y.is_finite()
        && d.bounds.width.is_finite()
        && d.bounds.height.is_finite()
        && arrows_finite
}
