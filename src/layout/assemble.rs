//! Frame assembly: seats, mitred corner blocks, backrests, armrests and bolsters.
//!
//! Everything is derived from the point map and the seat runs. Backrest strips reuse the
//! cut stored on their run.

use glam::dvec2;

use super::defaults::{BOLSTER_LENGTH, BOLSTER_THICKNESS, CORNER_EXTRA};
use super::plan::{CornerKind, Topology};
use super::points::{Anchor, PointMap};
use super::split::{SeatRun, backrest_pieces, rect_on};
use super::types::{BackrestKind, BackrestPiece, Piece};
use crate::errors::LayoutError;
use crate::parse::BolsterSet;
use crate::types::{Polygon, Side, Span};

/// Polygons of one assembled variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    pub seats: Vec<Piece>,
    pub corner_blocks: Vec<Polygon>,
    pub backrests: Vec<BackrestPiece>,
    pub armrests: Vec<Piece>,
    pub bolsters: Vec<Piece>,
}

impl Assembly {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Assemble every component of a variant. `bolsters` must already be filtered to the
/// sides the family accepts.
pub fn assemble(points: &PointMap, runs: &[SeatRun], bolsters: &BolsterSet) -> Result<Assembly, LayoutError> {
    let mut assembly = Assembly::new();
    assembly.seats = runs.iter().flat_map(SeatRun::seats).collect();
    assembly.corner_blocks = corner_blocks(points)?;
    assembly.backrests = backrests(points, runs)?;
    assembly.armrests = armrests(points)?;
    assembly.bolsters = place_bolsters(points, bolsters)?;
    Ok(assembly)
}

// ============================================================================
// Corner blocks
// ============================================================================

pub fn corner_blocks(points: &PointMap) -> Result<Vec<Polygon>, LayoutError> {
    let p = points.depth();
    let a = p + CORNER_EXTRA;
    let mut blocks = Vec::new();
    let topology = points.topology();

    if topology.left_corner() == Some(CornerKind::Mitred) {
        let o = points.require(Anchor::SeatOrigin)?;
        blocks.push(Polygon::closed(vec![
            o,
            o + dvec2(a, 0.0),
            o + dvec2(a, p),
            o + dvec2(p, a),
            o + dvec2(0.0, a),
        ]));
    }
    if topology.right_corner() == Some(CornerKind::Mitred) {
        let o = points.require(Anchor::RightSeatOrigin)?;
        blocks.push(Polygon::closed(vec![
            o,
            o + dvec2(0.0, a),
            o + dvec2(-p, a),
            o + dvec2(-a, p),
            o + dvec2(-a, 0.0),
        ]));
    }
    Ok(blocks)
}

// ============================================================================
// Backrests
// ============================================================================

/// Cross-axis extent of the backrest band on `side`.
fn band_cross(points: &PointMap, side: Side) -> Result<Span, LayoutError> {
    let seat = points.require(Anchor::SeatOrigin)?;
    Ok(match side {
        Side::Left => Span::new(0.0, seat.x),
        Side::Bottom => Span::new(0.0, seat.y),
        Side::Right => Span::new(
            points.require(Anchor::RightSeatOrigin)?.x,
            points.require(Anchor::OuterRight)?.x,
        ),
    })
}

pub fn backrests(points: &PointMap, runs: &[SeatRun]) -> Result<Vec<BackrestPiece>, LayoutError> {
    let mut pieces = Vec::new();

    for run in runs {
        let side = run.side;
        let (Some(start), Some(end)) = (
            points.get(Anchor::backrest_start(side)),
            points.get(Anchor::backrest_end(side)),
        ) else {
            continue;
        };
        let axis = run.axis();
        let band = Span::new(axis.along(start), axis.along(end));
        let cross = band_cross(points, side)?;
        let not_owned = |corner: Option<CornerKind>| corner.is_some_and(|c| !c.owned_by(side));

        let mut strip = band;
        if not_owned(run.start_corner) {
            let returned = Span::new(band.start, run.span.start.min(band.end));
            push_return(&mut pieces, side, rect_on(axis, returned, cross));
            strip.start = run.span.start;
        }
        let mut end_return = None;
        if side == Side::Bottom && not_owned(run.end_corner) {
            end_return = Some(Span::new(run.span.end.max(band.start), band.end));
            strip.end = run.span.end.min(band.end);
        }

        let strip_pieces = backrest_pieces(strip, cross, axis, run.cut);
        let cut = if strip_pieces.len() > 1 { run.cut } else { None };
        pieces.extend(strip_pieces.into_iter().map(|polygon| BackrestPiece {
            side,
            kind: BackrestKind::Strip,
            polygon,
            cut,
        }));
        if let Some(returned) = end_return {
            push_return(&mut pieces, side, rect_on(axis, returned, cross));
        }
    }
    Ok(pieces)
}

fn push_return(pieces: &mut Vec<BackrestPiece>, side: Side, polygon: Polygon) {
    if polygon.has_area() {
        pieces.push(BackrestPiece {
            side,
            kind: BackrestKind::Return,
            polygon,
            cut: None,
        });
    }
}

// ============================================================================
// Armrests
// ============================================================================

pub fn armrests(points: &PointMap) -> Result<Vec<Piece>, LayoutError> {
    let arms = points.structure().armrests;
    let p = points.depth();
    let seat = points.require(Anchor::SeatOrigin)?;
    let (ox, oy) = (seat.x, seat.y);
    let tx = points.require(Anchor::OuterRight)?.x;
    let mut out = Vec::new();
    let mut push = |side: Side, polygon: Polygon| {
        if polygon.has_area() {
            out.push(Piece { side, polygon });
        }
    };

    match points.topology() {
        Topology::Straight => {
            // without a backrest oy is 0, so the armrests start at the seat edge
            let xl = points.require(Anchor::BottomRunStart)?.x;
            let xr = points.require(Anchor::BottomRunEnd)?.x;
            if arms.left {
                push(Side::Left, Polygon::rect(0.0, 0.0, xl, oy + p));
            }
            if arms.right {
                push(Side::Right, Polygon::rect(xr, 0.0, tx, oy + p));
            }
        }
        Topology::Corner { .. } | Topology::DoubleCorner { .. } => {
            if arms.left {
                let top = points.require(Anchor::LeftRunEnd)?.y;
                let ty = points.require(Anchor::LeftOuterTop)?.y;
                push(Side::Left, Polygon::rect(0.0, top, ox + p, ty));
            }
            if arms.bottom && matches!(points.topology(), Topology::Corner { .. }) {
                let xb = points.require(Anchor::BottomRunEnd)?.x;
                push(Side::Bottom, Polygon::rect(xb, 0.0, tx, oy + p));
            }
            if arms.right && points.contains(Anchor::RightRunEnd) {
                let rx = points.require(Anchor::RightSeatOrigin)?.x;
                let top = points.require(Anchor::RightRunEnd)?.y;
                let tz = points.require(Anchor::RightOuterTop)?.y;
                push(Side::Right, Polygon::rect(rx - p, top, tx, tz));
            }
        }
    }
    Ok(out)
}

// ============================================================================
// Bolsters
// ============================================================================

pub fn place_bolsters(points: &PointMap, bolsters: &BolsterSet) -> Result<Vec<Piece>, LayoutError> {
    let p = points.depth();
    let width = BOLSTER_LENGTH.min(p);
    let seat = points.require(Anchor::SeatOrigin)?;
    let (ox, oy) = (seat.x, seat.y);
    let mut out = Vec::new();

    for side in bolsters.iter() {
        let polygon = match (points.topology(), side) {
            (Topology::Straight, Side::Left | Side::Right) => {
                let y0 = oy + ((p - BOLSTER_LENGTH) / 2.0).max(0.0);
                let y1 = y0 + width;
                if side == Side::Left {
                    let start = points.require(Anchor::BottomLimitStart)?.x;
                    Polygon::rect(start, y0, start + BOLSTER_THICKNESS, y1)
                } else {
                    let end = points.require(Anchor::BottomLimitEnd)?.x;
                    Polygon::rect(end - BOLSTER_THICKNESS, y0, end, y1)
                }
            }
            (Topology::Corner { .. } | Topology::DoubleCorner { .. }, Side::Left) => {
                let end = points.require(Anchor::LeftLimit)?.y;
                Polygon::rect(ox, end - BOLSTER_THICKNESS, ox + width, end)
            }
            (Topology::Corner { .. }, Side::Bottom) => {
                let end = points.require(Anchor::BottomLimitEnd)?.x;
                Polygon::rect(end - BOLSTER_THICKNESS, oy, end, oy + width)
            }
            (Topology::DoubleCorner { .. }, Side::Right) => {
                let rx = points.require(Anchor::RightSeatOrigin)?.x;
                let end = points.require(Anchor::RightLimit)?.y;
                Polygon::rect(rx - width, end - BOLSTER_THICKNESS, rx, end)
            }
            _ => continue,
        };
        out.push(Piece { side, polygon });
    }
    Ok(out)
}
