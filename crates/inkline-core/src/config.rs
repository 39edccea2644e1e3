//! Tunable constants for routing and snapping.
//!
//! These values encode visual heuristics, not geometric invariants, so they are
//! collected here and mirrored by [`GeometryConfig`] for callers that want to
//! override them.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Distance a self-loop stands off from each of its anchors.
pub const SELF_LOOP_OFFSET: f64 = 48.0;

/// Extra push of a self-loop's midpoint away from the shape center.
pub const SELF_LOOP_PUSH_OUT: f64 = 56.0;

/// Curve bulge as a fraction of the start-to-end distance.
pub const CURVE_BULGE: f64 = 0.3;

/// Cross-axis slack when deciding whether a static shape takes part in gap matching.
pub const GAP_CROSS_TOLERANCE: f64 = 40.0;

/// Gaps wider than this get no distance label.
pub const MAX_LABEL_DISTANCE: f64 = 400.0;

/// Hit-test margin added on top of the connector's border width.
pub const HIT_PADDING: f64 = 4.0;

/// Border width assumed when a connector does not carry one.
pub const DEFAULT_BORDER_WIDTH: f64 = 2.0;

/// Arrowhead size when a connector does not carry one.
pub const DEFAULT_ARROW_SIZE: f64 = 10.0;

/// Snap tolerance used by the interaction layer, in world units.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 8.0;

/// Path fraction where the start arrow sits.
pub const ARROW_START_FRACTION: f64 = 1.0 / 7.0;

/// Path fraction where the end arrow sits.
pub const ARROW_END_FRACTION: f64 = 6.0 / 7.0;

/// Angle between the arrow direction and each back corner of the head.
pub const ARROW_SPREAD: f64 = 0.8 * PI;

/// Fraction step used to sample the path tangent next to an arrow.
pub const ARROW_TANGENT_STEP: f64 = 0.01;

/// Horizontal-gap labels sit this far above (left gap) or below (right gap) the center line.
pub const LABEL_OFFSET_HORIZONTAL_GAP: f64 = 12.0;

/// Vertical-gap labels sit this far right (top gap) or left (bottom gap) of the center line.
pub const LABEL_OFFSET_VERTICAL_GAP: f64 = 10.0;

/// Geometry tunables. `Default` matches the module constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub self_loop_offset: f64,
    pub self_loop_push_out: f64,
    pub curve_bulge: f64,
    pub gap_cross_tolerance: f64,
    pub max_label_distance: f64,
    pub hit_padding: f64,
    pub default_border_width: f64,
    pub default_arrow_size: f64,
    pub snap_threshold: f64,
    pub arrow_start_fraction: f64,
    pub arrow_end_fraction: f64,
    /// Arrowhead spread in radians.
    pub arrow_spread: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            self_loop_offset: SELF_LOOP_OFFSET,
            self_loop_push_out: SELF_LOOP_PUSH_OUT,
            curve_bulge: CURVE_BULGE,
            gap_cross_tolerance: GAP_CROSS_TOLERANCE,
            max_label_distance: MAX_LABEL_DISTANCE,
            hit_padding: HIT_PADDING,
            default_border_width: DEFAULT_BORDER_WIDTH,
            default_arrow_size: DEFAULT_ARROW_SIZE,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            arrow_start_fraction: ARROW_START_FRACTION,
            arrow_end_fraction: ARROW_END_FRACTION,
            arrow_spread: ARROW_SPREAD,
        }
    }
}
