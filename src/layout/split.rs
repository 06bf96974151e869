//! Seat-run splitting.
//!
//! A run longer than [`MAX_SEAT_LENGTH`] is cut once at its integer midpoint. The cut is
//! computed here only; backrest strips read it from the [`SeatRun`].

use glam::DVec2;
use serde::Serialize;

use super::defaults::MAX_SEAT_LENGTH;
use super::plan::CornerKind;
use super::points::{Anchor, PointMap};
use super::types::Piece;
use crate::errors::LayoutError;
use crate::log::debug;
use crate::types::{Axis, EPSILON, Polygon, Side, Span};

/// Split coordinate of `[a, b]`, or `None` when the span fits within `threshold`.
///
/// The cut sits `⌊|b−a|/2⌋` from `a`, so an odd span leaves the longer half at the far end.
pub fn split_coordinate(a: f64, b: f64, threshold: f64) -> Option<f64> {
    let length = (b - a).abs();
    if length <= threshold {
        return None;
    }
    Some(a + (length / 2.0).floor() * (b - a).signum())
}

/// Sub-spans of `span` on either side of `cut`.
fn pieces_of(span: Span, cut: Option<f64>) -> Vec<Span> {
    match cut {
        Some(c) if span.contains_strictly(c) => vec![Span::new(span.start, c), Span::new(c, span.end)],
        _ => vec![span],
    }
}

/// Rectangle covering `along` on `axis` and `cross` on the other axis.
pub(crate) fn rect_on(axis: Axis, along: Span, cross: Span) -> Polygon {
    match axis {
        Axis::X => Polygon::rect(along.start, cross.start, along.end, cross.end),
        Axis::Y => Polygon::rect(cross.start, along.start, cross.end, along.end),
    }
}

/// Seat rectangles between two points on an axis-aligned edge.
///
/// The rectangles extend `depth` in the positive direction of the other axis.
pub fn split_run(a: DVec2, b: DVec2, depth: f64, threshold: f64) -> Vec<Polygon> {
    let axis = if (b.y - a.y).abs() <= EPSILON { Axis::X } else { Axis::Y };
    let (lo, hi) = (axis.along(a).min(axis.along(b)), axis.along(a).max(axis.along(b)));
    let cross_start = match axis {
        Axis::X => a.y,
        Axis::Y => a.x,
    };
    let cross = Span::new(cross_start, cross_start + depth);
    let cut = split_coordinate(lo, hi, threshold);
    pieces_of(Span::new(lo, hi), cut)
        .into_iter()
        .map(|s| rect_on(axis, s, cross))
        .collect()
}

/// One straight seating segment of the frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatRun {
    pub side: Side,
    /// Extent along the run axis.
    pub span: Span,
    /// Extent across the run axis.
    pub lane: Span,
    pub cut: Option<f64>,
    pub start_corner: Option<CornerKind>,
    pub end_corner: Option<CornerKind>,
}

impl SeatRun {
    pub fn new(
        side: Side,
        span: Span,
        lane: Span,
        start_corner: Option<CornerKind>,
        end_corner: Option<CornerKind>,
    ) -> Self {
        let cut = split_coordinate(span.start, span.end, MAX_SEAT_LENGTH);
        if let Some(cut) = cut {
            debug!(side = %side, start = span.start, end = span.end, cut, "splitting seat run");
        }
        Self {
            side,
            span,
            lane,
            cut,
            start_corner,
            end_corner,
        }
    }

    pub fn axis(&self) -> Axis {
        self.side.axis()
    }

    /// Along-axis extents of the seats of this run.
    pub fn pieces(&self) -> Vec<Span> {
        pieces_of(self.span, self.cut)
    }

    pub fn seats(&self) -> Vec<Piece> {
        self.pieces()
            .into_iter()
            .map(|s| Piece {
                side: self.side,
                polygon: rect_on(self.axis(), s, self.lane),
            })
            .collect()
    }
}

/// Seat runs of a point map, bottom first.
pub fn seat_runs(points: &PointMap) -> Result<Vec<SeatRun>, LayoutError> {
    let topology = points.topology();
    let depth = points.depth();
    let mut runs = Vec::with_capacity(3);

    for &side in topology.run_sides() {
        let start = points.require(Anchor::run_start(side))?;
        let end = points.require(Anchor::run_end(side))?;
        let axis = side.axis();
        let span = Span::new(axis.along(start), axis.along(end));
        let lane = match side {
            Side::Bottom => Span::new(start.y, start.y + depth),
            Side::Left => Span::new(start.x, start.x + depth),
            Side::Right => Span::new(start.x - depth, start.x),
        };
        let (start_corner, end_corner) = match side {
            Side::Bottom => (topology.left_corner(), topology.right_corner()),
            Side::Left => (topology.left_corner(), None),
            Side::Right => (topology.right_corner(), None),
        };
        runs.push(SeatRun::new(side, span, lane, start_corner, end_corner));
    }
    Ok(runs)
}

/// Backrest rectangles over the visible part of a band, split in lockstep with `cut`.
///
/// The split applies only when the cut lies strictly inside the visible range.
pub fn backrest_pieces(visible: Span, cross: Span, axis: Axis, cut: Option<f64>) -> Vec<Polygon> {
    pieces_of(visible, cut)
        .into_iter()
        .map(|s| rect_on(axis, s, cross))
        .filter(Polygon::has_area)
        .collect()
}

/// Reject any seat whose rounded long side exceeds the limit.
pub fn check_seat_lengths(seats: &[Piece]) -> Result<(), LayoutError> {
    let limit = MAX_SEAT_LENGTH.round() as i64;
    for seat in seats {
        let (length, depth) = seat.polygon.dims();
        if length > limit {
            return Err(LayoutError::LengthExceeded { length, depth, limit });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    // ========================================================================
    // split_coordinate tests
    // ========================================================================

    #[test]
    fn short_spans_are_not_split() {
        assert_eq!(split_coordinate(15.0, 265.0, 250.0), None);
        assert_eq!(split_coordinate(0.0, 250.0, 250.0), None);
    }

    #[test]
    fn long_spans_split_at_integer_midpoint() {
        assert_eq!(split_coordinate(80.0, 525.0, 250.0), Some(302.0));
        assert_eq!(split_coordinate(10.0, 345.0, 250.0), Some(177.0));
        assert_eq!(split_coordinate(0.0, 300.0, 250.0), Some(150.0));
    }

    #[test]
    fn reversed_spans_split_toward_a() {
        assert_eq!(split_coordinate(525.0, 80.0, 250.0), Some(303.0));
    }

    // ========================================================================
    // split_run tests
    // ========================================================================

    #[test]
    fn split_run_horizontal() {
        let seats = split_run(dvec2(80.0, 10.0), dvec2(525.0, 10.0), 70.0, 250.0);
        assert_eq!(seats.len(), 2);
        assert_eq!(seats[0], Polygon::rect(80.0, 10.0, 302.0, 80.0));
        assert_eq!(seats[1], Polygon::rect(302.0, 10.0, 525.0, 80.0));
    }

    #[test]
    fn split_run_vertical_single() {
        let seats = split_run(dvec2(10.0, 80.0), dvec2(10.0, 245.0), 70.0, 250.0);
        assert_eq!(seats, vec![Polygon::rect(10.0, 80.0, 80.0, 245.0)]);
    }

    // ========================================================================
    // SeatRun tests
    // ========================================================================

    #[test]
    fn seat_run_pieces_share_the_cut() {
        let run = SeatRun::new(
            Side::Left,
            Span::new(10.0, 345.0),
            Span::new(10.0, 80.0),
            Some(CornerKind::SideOwned),
            None,
        );
        assert_eq!(run.cut, Some(177.0));
        let seats = run.seats();
        assert_eq!(seats.len(), 2);
        assert_eq!(seats[0].polygon, Polygon::rect(10.0, 10.0, 80.0, 177.0));
        assert_eq!(seats[1].polygon.dims(), (168, 70));
        assert!(check_seat_lengths(&seats).is_ok());
    }

    #[test]
    fn check_seat_lengths_names_the_seat() {
        let seats = split_run(dvec2(10.0, 10.0), dvec2(525.0, 10.0), 70.0, 250.0);
        let seats: Vec<Piece> = seats
            .into_iter()
            .map(|polygon| Piece { side: Side::Bottom, polygon })
            .collect();
        // [10, 525] is cut at 267, leaving 257 and 258
        assert_eq!(
            check_seat_lengths(&seats),
            Err(LayoutError::LengthExceeded { length: 257, depth: 70, limit: 250 })
        );
    }

    // ========================================================================
    // backrest_pieces tests
    // ========================================================================

    #[test]
    fn backrest_follows_seat_cut() {
        let pieces = backrest_pieces(Span::new(10.0, 525.0), Span::new(0.0, 10.0), Axis::X, Some(302.0));
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0], Polygon::rect(10.0, 0.0, 302.0, 10.0));
    }

    #[test]
    fn truncated_backrest_ignores_cut_outside() {
        // a chaise shortened the visible band below the cut
        let pieces = backrest_pieces(Span::new(0.0, 150.0), Span::new(0.0, 10.0), Axis::Y, Some(177.0));
        assert_eq!(pieces, vec![Polygon::rect(0.0, 0.0, 10.0, 150.0)]);
    }

    #[test]
    fn empty_backrest_is_dropped() {
        assert!(backrest_pieces(Span::new(80.0, 80.0), Span::new(0.0, 10.0), Axis::Y, None).is_empty());
    }
}
