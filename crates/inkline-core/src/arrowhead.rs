//! Filled triangular arrowheads.

use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Fixed arrow direction on a y-down stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compass {
    North,
    South,
    East,
    West,
}

impl Compass {
    /// Angle in radians, measured from +x toward +y.
    pub fn angle(self) -> f64 {
        match self {
            Compass::North => -FRAC_PI_2,
            Compass::South => FRAC_PI_2,
            Compass::East => 0.0,
            Compass::West => PI,
        }
    }
}

/// Where an arrowhead takes its direction from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Heading {
    /// Point away from this preceding point, toward the tip.
    From(Point),
    /// Ignore the path and point this way.
    Fixed(Compass),
}

impl Heading {
    /// Direction angle for an arrow whose tip is `tip`.
    ///
    /// A preceding point coincident with the tip yields angle 0.
    pub fn angle(self, tip: Point) -> f64 {
        match self {
            Heading::Fixed(compass) => compass.angle(),
            Heading::From(prev) => {
                let d = tip - prev;
                if d.hypot2() > 0.0 && d.is_finite() {
                    d.y.atan2(d.x)
                } else {
                    0.0
                }
            }
        }
    }
}

/// A filled arrowhead triangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowHead {
    pub tip: Point,
    pub left: Point,
    pub right: Point,
}

impl ArrowHead {
    /// Build the head at `tip`. The back corners sit `size` away from the tip at
    /// `± spread` radians from the direction of travel.
    pub fn new(tip: Point, heading: Heading, size: f64, spread: f64) -> Self {
        let angle = heading.angle(tip);
        let corner = |a: f64| Point::new(tip.x + size * a.cos(), tip.y + size * a.sin());
        Self {
            tip,
            left: corner(angle + spread),
            right: corner(angle - spread),
        }
    }

    /// Closed triangle for filling.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.tip);
        path.line_to(self.left);
        path.line_to(self.right);
        path.close_path();
        path
    }
}
