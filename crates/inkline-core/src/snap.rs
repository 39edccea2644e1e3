//! Alignment and spacing snaps for dragged selections.
//!
//! Every function here is a pure query over the moving box and the static shapes;
//! the interaction layer applies the returned delta itself.

use crate::config::{GeometryConfig, LABEL_OFFSET_HORIZONTAL_GAP, LABEL_OFFSET_VERTICAL_GAP};
use crate::geometry::Bounds;
use crate::shapes::Shape;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Axis along which a snap moves the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// `(start, end)` of `bounds` along this axis.
    fn span(self, bounds: &Bounds) -> (f64, f64) {
        match self {
            Axis::X => (bounds.x, bounds.right()),
            Axis::Y => (bounds.y, bounds.bottom()),
        }
    }

    /// `(start, end)` of `bounds` across this axis.
    fn cross_span(self, bounds: &Bounds) -> (f64, f64) {
        match self {
            Axis::X => (bounds.y, bounds.bottom()),
            Axis::Y => (bounds.x, bounds.right()),
        }
    }

    /// Start, center and end of `bounds` along this axis.
    fn lines(self, bounds: &Bounds) -> [f64; 3] {
        match self {
            Axis::X => [bounds.x, bounds.center_x(), bounds.right()],
            Axis::Y => [bounds.y, bounds.center_y(), bounds.bottom()],
        }
    }

    /// Orientation of a guide line marking a snap on this axis.
    fn guide_orientation(self) -> Orientation {
        match self {
            Axis::X => Orientation::Vertical,
            Axis::Y => Orientation::Horizontal,
        }
    }
}

/// A snap correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    /// Signed amount to move the selection.
    pub delta: f64,
    /// Absolute coordinate the selection snaps to.
    pub line: f64,
}

/// Guide line orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// An alignment guide to draw while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuideLine {
    pub orientation: Orientation,
    pub value: f64,
}

/// A gap annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideDistance {
    pub position: Point,
    pub text: String,
}

/// Combined snap for both axes of a drag step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlignmentSnap {
    pub x: Option<SnapResult>,
    pub y: Option<SnapResult>,
    pub guides: Vec<GuideLine>,
    /// Distance labels measured after the snap is applied.
    pub labels: Vec<GuideDistance>,
}

impl AlignmentSnap {
    /// Correction to add to the drag offset.
    pub fn delta(&self) -> Vec2 {
        Vec2::new(
            self.x.map_or(0.0, |s| s.delta),
            self.y.map_or(0.0, |s| s.delta),
        )
    }

    /// Check if either axis snapped.
    pub fn is_snapped(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

/// Union of the frames of `shapes`, or `None` for an empty set.
pub fn get_bounds(shapes: &[Shape]) -> Option<Bounds> {
    let (first, rest) = shapes.split_first()?;
    Some(rest.iter().fold(first.frame(), |acc, s| acc.union(&s.frame())))
}

/// Closest `(value, candidate)` pair within `threshold`.
///
/// Ties keep the first pair found, iterating values in the outer loop.
pub fn snap_delta(values: &[f64], candidates: &[f64], threshold: f64) -> Option<SnapResult> {
    let mut best: Option<SnapResult> = None;
    for &value in values {
        for &candidate in candidates {
            let delta = candidate - value;
            if !(delta.abs() <= threshold) {
                continue;
            }
            if best.is_none_or(|b| delta.abs() < b.delta.abs()) {
                best = Some(SnapResult { delta, line: candidate });
            }
        }
    }
    best
}

/// The smaller correction of two snaps. Ties go to `a`.
pub fn choose_closer_snap(a: Option<SnapResult>, b: Option<SnapResult>) -> Option<SnapResult> {
    match (a, b) {
        (None, b) => b,
        (a, None) => a,
        (Some(a), Some(b)) => Some(if a.delta.abs() <= b.delta.abs() { a } else { b }),
    }
}

/// Open-interval overlap test.
pub fn ranges_overlap(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> bool {
    a_start < b_end && b_start < a_end
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    start: f64,
    end: f64,
    cross_start: f64,
    cross_end: f64,
}

/// Snap the moving box so its gap to a neighbour repeats a gap already present
/// between the static shapes.
///
/// Needs at least two static shapes. Neighbours only count when their cross-axis
/// extent, widened by the gap tolerance, overlaps the moving box.
pub fn gap_match_snap(
    axis: Axis,
    moving: &Bounds,
    statics: &[Shape],
    threshold: f64,
    config: &GeometryConfig,
) -> Option<SnapResult> {
    if statics.len() < 2 {
        return None;
    }
    let (start, end) = axis.span(moving);
    let (cross_start, cross_end) = axis.cross_span(moving);

    let mut segments: Vec<Segment> = statics
        .iter()
        .map(|shape| {
            let frame = shape.frame();
            let (start, end) = axis.span(&frame);
            let (cross_start, cross_end) = axis.cross_span(&frame);
            Segment { start, end, cross_start, cross_end }
        })
        .collect();
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));

    let known_gaps: Vec<f64> = segments
        .windows(2)
        .map(|w| w[1].start - w[0].end)
        .filter(|&gap| gap > 0.0)
        .collect();
    if known_gaps.is_empty() {
        return None;
    }

    let tolerance = config.gap_cross_tolerance;
    let mut best: Option<SnapResult> = None;
    let mut consider = |delta: f64, line: f64| {
        if !(delta.abs() <= threshold) {
            return;
        }
        if best.is_none_or(|b| delta.abs() < b.delta.abs()) {
            best = Some(SnapResult { delta, line });
        }
    };

    for seg in &segments {
        if !ranges_overlap(cross_start, cross_end, seg.cross_start - tolerance, seg.cross_end + tolerance) {
            continue;
        }

        // Moving box placed after this shape.
        let gap_after = start - seg.end;
        for &gap in &known_gaps {
            consider(gap - gap_after, seg.end + gap);
        }

        // Moving box placed before this shape.
        let gap_before = seg.start - end;
        for &gap in &known_gaps {
            consider(gap_before - gap, seg.start - gap);
        }
    }

    if let Some(snap) = best {
        log::trace!("Gap snap on {:?}: delta {} to line {}", axis, snap.delta, snap.line);
    }
    best
}

fn distance_text(distance: f64) -> String {
    format!("{}px", distance as i64)
}

/// Labels for the nearest overlapping neighbour in each of the four directions.
///
/// Distances are rounded and labelled only when within `[0, max_label_distance]`.
pub fn distance_labels(moving: &Bounds, statics: &[Shape], config: &GeometryConfig) -> Vec<GuideDistance> {
    let mut left: Option<Bounds> = None;
    let mut right: Option<Bounds> = None;
    let mut top: Option<Bounds> = None;
    let mut bottom: Option<Bounds> = None;

    for shape in statics {
        let item = shape.frame();
        let overlap_y = ranges_overlap(item.y, item.bottom(), moving.y, moving.bottom());
        let overlap_x = ranges_overlap(item.x, item.right(), moving.x, moving.right());

        if overlap_y && item.right() <= moving.x && left.is_none_or(|c| item.right() > c.right()) {
            left = Some(item);
        }
        if overlap_y && item.x >= moving.right() && right.is_none_or(|c| item.x < c.x) {
            right = Some(item);
        }
        if overlap_x && item.bottom() <= moving.y && top.is_none_or(|c| item.bottom() > c.bottom()) {
            top = Some(item);
        }
        if overlap_x && item.y >= moving.bottom() && bottom.is_none_or(|c| item.y < c.y) {
            bottom = Some(item);
        }
    }

    let in_range = |d: f64| d >= 0.0 && d <= config.max_label_distance;
    let mut labels = Vec::new();

    if let Some(c) = left {
        let distance = (moving.x - c.right()).round();
        if in_range(distance) {
            labels.push(GuideDistance {
                position: Point::new((moving.x + c.right()) / 2.0, moving.center_y() - LABEL_OFFSET_HORIZONTAL_GAP),
                text: distance_text(distance),
            });
        }
    }
    if let Some(c) = right {
        let distance = (c.x - moving.right()).round();
        if in_range(distance) {
            labels.push(GuideDistance {
                position: Point::new((moving.right() + c.x) / 2.0, moving.center_y() + LABEL_OFFSET_HORIZONTAL_GAP),
                text: distance_text(distance),
            });
        }
    }
    if let Some(c) = top {
        let distance = (moving.y - c.bottom()).round();
        if in_range(distance) {
            labels.push(GuideDistance {
                position: Point::new(moving.center_x() + LABEL_OFFSET_VERTICAL_GAP, (moving.y + c.bottom()) / 2.0),
                text: distance_text(distance),
            });
        }
    }
    if let Some(c) = bottom {
        let distance = (c.y - moving.bottom()).round();
        if in_range(distance) {
            labels.push(GuideDistance {
                position: Point::new(moving.center_x() - LABEL_OFFSET_VERTICAL_GAP, (moving.bottom() + c.y) / 2.0),
                text: distance_text(distance),
            });
        }
    }
    labels
}

/// Edge/center alignment merged with gap matching, per axis.
///
/// Alignment is passed first to [`choose_closer_snap`], so it wins ties.
pub fn alignment_snap(
    moving: &Bounds,
    statics: &[Shape],
    threshold: f64,
    config: &GeometryConfig,
) -> AlignmentSnap {
    let mut snap = AlignmentSnap::default();

    for axis in [Axis::X, Axis::Y] {
        let candidates: Vec<f64> = statics
            .iter()
            .flat_map(|s| axis.lines(&s.frame()))
            .collect();
        let aligned = snap_delta(&axis.lines(moving), &candidates, threshold);
        let spaced = gap_match_snap(axis, moving, statics, threshold, config);
        let best = choose_closer_snap(aligned, spaced);

        if let Some(result) = best {
            snap.guides.push(GuideLine {
                orientation: axis.guide_orientation(),
                value: result.line,
            });
        }
        match axis {
            Axis::X => snap.x = best,
            Axis::Y => snap.y = best,
        }
    }

    snap.labels = distance_labels(&moving.translate(snap.delta()), statics, config);
    log::trace!("Alignment snap: {:?}", snap.delta());
    snap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    const EPS: f64 = 1e-9;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::new(ShapeKind::Rect, Point::new(x, y), w, h)
    }

    fn config() -> GeometryConfig {
        GeometryConfig::default()
    }

    #[test]
    fn test_get_bounds() {
        assert!(get_bounds(&[]).is_none());
        let b = get_bounds(&[rect(10.0, 10.0, 20.0, 20.0), rect(-5.0, 40.0, 10.0, 10.0)]).unwrap();
        assert_eq!(b, Bounds::new(-5.0, 10.0, 35.0, 40.0));
        assert_eq!(b.center_x(), 12.5);
    }

    #[test]
    fn test_snap_delta_threshold_boundary() {
        let threshold = 8.0;
        let hit = snap_delta(&[10.0], &[10.0 + threshold], threshold).unwrap();
        assert_eq!(hit.delta, threshold);
        assert_eq!(hit.line, 18.0);
        assert!(snap_delta(&[10.0], &[10.0 + threshold + 0.01], threshold).is_none());
    }

    #[test]
    fn test_snap_delta_picks_smallest_and_first_on_tie() {
        let best = snap_delta(&[0.0, 100.0], &[3.0, 98.0], 8.0).unwrap();
        assert_eq!(best, SnapResult { delta: -2.0, line: 98.0 });
        let tie = snap_delta(&[0.0, 10.0], &[5.0], 8.0).unwrap();
        assert_eq!(tie, SnapResult { delta: 5.0, line: 5.0 });
    }

    #[test]
    fn test_snap_delta_ignores_nan() {
        assert!(snap_delta(&[f64::NAN], &[0.0], 8.0).is_none());
        assert!(snap_delta(&[], &[0.0], 8.0).is_none());
    }

    #[test]
    fn test_choose_closer_snap_tie_prefers_first() {
        let a = SnapResult { delta: 5.0, line: 0.0 };
        let b = SnapResult { delta: -5.0, line: 100.0 };
        assert_eq!(choose_closer_snap(Some(a), Some(b)), Some(a));
        assert_eq!(choose_closer_snap(None, Some(b)), Some(b));
        assert_eq!(choose_closer_snap(Some(a), None), Some(a));
        assert_eq!(choose_closer_snap(None, None), None);
        let c = SnapResult { delta: 1.0, line: 3.0 };
        assert_eq!(choose_closer_snap(Some(a), Some(c)), Some(c));
    }

    #[test]
    fn test_ranges_overlap_is_strict() {
        assert!(ranges_overlap(0.0, 10.0, 5.0, 15.0));
        assert!(!ranges_overlap(0.0, 10.0, 10.0, 20.0));
    }

    #[test]
    fn test_gap_match_needs_two_shapes() {
        let moving = Bounds::new(300.0, 0.0, 100.0, 100.0);
        assert!(gap_match_snap(Axis::X, &moving, &[rect(0.0, 0.0, 100.0, 100.0)], 8.0, &config()).is_none());
        assert!(gap_match_snap(Axis::X, &moving, &[], 8.0, &config()).is_none());
    }

    #[test]
    fn test_gap_match_after_neighbour() {
        let statics = [rect(150.0, 0.0, 100.0, 100.0), rect(0.0, 0.0, 100.0, 100.0)];
        let moving = Bounds::new(297.0, 0.0, 100.0, 100.0);
        let snap = gap_match_snap(Axis::X, &moving, &statics, 8.0, &config()).unwrap();
        assert!((snap.delta - 3.0).abs() < EPS);
        assert!((snap.line - 300.0).abs() < EPS);
    }

    #[test]
    fn test_gap_match_before_neighbour() {
        let statics = [rect(0.0, 0.0, 100.0, 100.0), rect(150.0, 0.0, 100.0, 100.0)];
        let moving = Bounds::new(-148.0, 0.0, 100.0, 100.0);
        let snap = gap_match_snap(Axis::X, &moving, &statics, 8.0, &config()).unwrap();
        assert!((snap.delta + 2.0).abs() < EPS);
        assert!((snap.line + 50.0).abs() < EPS);
    }

    #[test]
    fn test_gap_match_vertical_axis() {
        let statics = [rect(0.0, 0.0, 100.0, 50.0), rect(0.0, 80.0, 100.0, 50.0)];
        let moving = Bounds::new(10.0, 165.0, 50.0, 50.0);
        let snap = gap_match_snap(Axis::Y, &moving, &statics, 8.0, &config()).unwrap();
        assert!((snap.delta - -5.0).abs() < EPS);
        assert!((snap.line - 160.0).abs() < EPS);
    }

    #[test]
    fn test_gap_match_cross_axis_tolerance() {
        let statics = [rect(0.0, 0.0, 100.0, 100.0), rect(150.0, 0.0, 100.0, 100.0)];
        let near = Bounds::new(297.0, 130.0, 100.0, 100.0);
        assert!(gap_match_snap(Axis::X, &near, &statics, 8.0, &config()).is_some());
        let far = Bounds::new(297.0, 141.0, 100.0, 100.0);
        assert!(gap_match_snap(Axis::X, &far, &statics, 8.0, &config()).is_none());
    }

    #[test]
    fn test_gap_match_without_positive_gaps() {
        let statics = [rect(0.0, 0.0, 100.0, 100.0), rect(50.0, 0.0, 100.0, 100.0)];
        let moving = Bounds::new(200.0, 0.0, 100.0, 100.0);
        assert!(gap_match_snap(Axis::X, &moving, &statics, 8.0, &config()).is_none());
    }

    #[test]
    fn test_distance_label_bound() {
        let moving = Bounds::new(200.0, 0.0, 100.0, 100.0);
        let at_400 = [rect(-300.0, 0.0, 100.0, 100.0)];
        let labels = distance_labels(&moving, &at_400, &config());
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "400px");

        let at_401 = [rect(-301.0, 0.0, 100.0, 100.0)];
        assert!(distance_labels(&moving, &at_401, &config()).is_empty());
    }

    #[test]
    fn test_distance_rounded_before_bound() {
        let statics = [rect(-300.0, 0.0, 100.0, 100.0)];
        let just_over = Bounds::new(200.4, 0.0, 100.0, 100.0);
        let labels = distance_labels(&just_over, &statics, &config());
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "400px");

        let rounds_out = Bounds::new(200.6, 0.0, 100.0, 100.0);
        assert!(distance_labels(&rounds_out, &statics, &config()).is_empty());
    }

    #[test]
    fn test_distance_labels_positions() {
        let moving = Bounds::new(200.0, 200.0, 100.0, 100.0);
        let statics = [
            rect(50.0, 200.0, 100.0, 100.0),  // left, gap 50
            rect(0.0, 200.0, 100.0, 100.0),   // farther left, ignored
            rect(330.0, 220.0, 50.0, 50.0),   // right, gap 30
            rect(200.0, 100.0, 100.0, 80.0),  // top, gap 20
            rect(250.0, 310.0, 20.0, 20.0),   // bottom, gap 10
        ];
        let labels = distance_labels(&moving, &statics, &config());
        assert_eq!(labels.len(), 4);
        assert_eq!(labels[0], GuideDistance { position: Point::new(175.0, 238.0), text: "50px".into() });
        assert_eq!(labels[1], GuideDistance { position: Point::new(315.0, 262.0), text: "30px".into() });
        assert_eq!(labels[2], GuideDistance { position: Point::new(260.0, 190.0), text: "20px".into() });
        assert_eq!(labels[3], GuideDistance { position: Point::new(240.0, 305.0), text: "10px".into() });
    }

    #[test]
    fn test_distance_labels_need_cross_overlap() {
        let moving = Bounds::new(200.0, 0.0, 100.0, 100.0);
        let statics = [rect(0.0, 500.0, 100.0, 100.0)];
        assert!(distance_labels(&moving, &statics, &config()).is_empty());
    }

    #[test]
    fn test_alignment_snap_edges() {
        let statics = [rect(0.0, 0.0, 100.0, 100.0)];
        let moving = Bounds::new(103.0, 205.0, 50.0, 50.0);
        let snap = alignment_snap(&moving, &statics, 8.0, &config());
        // Left edge 103 snaps onto the static right edge 100.
        assert_eq!(snap.x, Some(SnapResult { delta: -3.0, line: 100.0 }));
        assert!(snap.y.is_none());
        assert_eq!(snap.guides, vec![GuideLine { orientation: Orientation::Vertical, value: 100.0 }]);
        assert_eq!(snap.delta(), Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn test_alignment_snap_centers() {
        let statics = [rect(0.0, 0.0, 100.0, 100.0)];
        let moving = Bounds::new(400.0, 22.0, 10.0, 10.0);
        let snap = alignment_snap(&moving, &statics, 8.0, &config());
        // Top 22, center 27 and bottom 32 are all more than 8 from 0, 50 and 100.
        assert!(snap.y.is_none());
        let moving = Bounds::new(400.0, 44.0, 10.0, 10.0);
        let snap = alignment_snap(&moving, &statics, 8.0, &config());
        assert_eq!(snap.y, Some(SnapResult { delta: 1.0, line: 50.0 }));
        assert_eq!(snap.guides[0].orientation, Orientation::Horizontal);
    }

    #[test]
    fn test_alignment_snap_prefers_gap_when_closer() {
        let statics = [rect(0.0, 0.0, 100.0, 100.0), rect(150.0, 0.0, 100.0, 100.0)];
        let moving = Bounds::new(299.0, 0.0, 100.0, 100.0);
        let snap = alignment_snap(&moving, &statics, 8.0, &config());
        assert_eq!(snap.x, Some(SnapResult { delta: 1.0, line: 300.0 }));
        // Labels are measured after the snap: gap to the right neighbour is exactly 50.
        assert!(snap.labels.iter().any(|l| l.text == "50px"));
    }
}
