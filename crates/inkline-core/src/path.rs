//! Structured connector paths and sampling along them.
//!
//! A [`ConnectorPath`] always starts with a single `MoveTo` followed by line and
//! quadratic segments, so sampling never has to parse anything.

use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One path command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    /// Control point, end point.
    QuadTo(Point, Point),
}

impl PathSegment {
    /// Where the pen is after this segment.
    pub fn end_point(&self) -> Point {
        match *self {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) | PathSegment::QuadTo(_, p) => p,
        }
    }
}

/// Rejected segment lists when loading a stored path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Path has no segments")]
    Empty,
    #[error("Path must start with a single MoveTo")]
    BadMoveTo,
}

/// An open connector path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPath")]
pub struct ConnectorPath {
    segments: Vec<PathSegment>,
}

#[derive(Deserialize)]
struct RawPath {
    segments: Vec<PathSegment>,
}

impl TryFrom<RawPath> for ConnectorPath {
    type Error = PathError;

    fn try_from(raw: RawPath) -> Result<Self, Self::Error> {
        let (first, rest) = raw.segments.split_first().ok_or(PathError::Empty)?;
        let later_move = rest.iter().any(|seg| matches!(seg, PathSegment::MoveTo(_)));
        if !matches!(first, PathSegment::MoveTo(_)) || later_move {
            return Err(PathError::BadMoveTo);
        }
        Ok(Self {
            segments: raw.segments,
        })
    }
}

impl ConnectorPath {
    /// Start a new path at `start`.
    pub fn new(start: Point) -> Self {
        Self {
            segments: vec![PathSegment::MoveTo(start)],
        }
    }

    /// Build a polyline through `points`. Returns `None` for an empty slice.
    pub fn polyline(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut path = Self::new(*first);
        for p in rest {
            path.line_to(*p);
        }
        Some(path)
    }

    pub fn line_to(&mut self, p: Point) {
        self.segments.push(PathSegment::LineTo(p));
    }

    pub fn quad_to(&mut self, control: Point, end: Point) {
        self.segments.push(PathSegment::QuadTo(control, end));
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn start(&self) -> Point {
        self.segments[0].end_point()
    }

    pub fn end(&self) -> Point {
        self.segments[self.segments.len() - 1].end_point()
    }

    /// Every point the path names, control points included.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.segments.iter().flat_map(|seg| {
            let (a, b) = match *seg {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => (None, p),
                PathSegment::QuadTo(c, p) => (Some(c), p),
            };
            a.into_iter().chain(std::iter::once(b))
        })
    }

    /// Length used for arrow placement.
    ///
    /// Lines use their Euclidean length; a quadratic uses the sum of its two control
    /// chords, which overestimates the true arc length.
    pub fn length(&self) -> f64 {
        self.pieces().map(|piece| piece.length()).sum()
    }

    /// Point at fraction `t` of the path.
    ///
    /// `t <= 0` gives the start and `t >= 1` the end. Line segments are walked by
    /// length; inside a quadratic the remaining fraction is used as the curve
    /// parameter, so a single-curve path is sampled parametrically at `t`.
    pub fn point_at_fraction(&self, t: f64) -> Point {
        if t.is_nan() || t <= 0.0 {
            return self.start();
        }
        if t >= 1.0 {
            return self.end();
        }
        let target = self.length() * t;
        let mut walked = 0.0;
        let mut last = self.start();
        for piece in self.pieces() {
            let len = piece.length();
            if walked + len >= target {
                let u = if len > 0.0 { (target - walked) / len } else { 0.0 };
                return piece.eval(u);
            }
            walked += len;
            last = piece.end();
        }
        last
    }

    /// Convert into a kurbo path for rendering.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for seg in &self.segments {
            match *seg {
                PathSegment::MoveTo(p) => path.move_to(p),
                PathSegment::LineTo(p) => path.line_to(p),
                PathSegment::QuadTo(c, p) => path.quad_to(c, p),
            }
        }
        path
    }

    /// Drawable pieces with their start points resolved.
    fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.segments.windows(2).filter_map(|w| {
            let from = w[0].end_point();
            match w[1] {
                PathSegment::MoveTo(_) => None,
                PathSegment::LineTo(to) => Some(Piece::Line(from, to)),
                PathSegment::QuadTo(c, to) => Some(Piece::Quad(from, c, to)),
            }
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Piece {
    Line(Point, Point),
    Quad(Point, Point, Point),
}

impl Piece {
    fn length(&self) -> f64 {
        match *self {
            Piece::Line(a, b) => a.distance(b),
            Piece::Quad(a, c, b) => a.distance(c) + c.distance(b),
        }
    }

    fn end(&self) -> Point {
        match *self {
            Piece::Line(_, b) | Piece::Quad(_, _, b) => b,
        }
    }

    fn eval(&self, u: f64) -> Point {
        match *self {
            Piece::Line(a, b) => a.lerp(b, u),
            Piece::Quad(a, c, b) => {
                let mt = 1.0 - u;
                Point::new(
                    mt * mt * a.x + 2.0 * mt * u * c.x + u * u * b.x,
                    mt * mt * a.y + 2.0 * mt * u * c.y + u * u * b.y,
                )
            }
        }
    }
}

/// Length of `path`; see [`ConnectorPath::length`].
pub fn path_length(path: &ConnectorPath) -> f64 {
    path.length()
}

/// Point at fraction `t` of `path`; see [`ConnectorPath::point_at_fraction`].
pub fn point_at_fraction(path: &ConnectorPath, t: f64) -> Point {
    path.point_at_fraction(t)
}
