//! Variant selection for families with several topologies.

use serde::Serialize;

use super::defaults::{MAX_SEAT_LENGTH, SHORT_SEAT_LENGTH};
use super::plan::{Family, ShapeFamily, Variant};
use super::points::build_points;
use super::split::seat_runs;
use super::types::{Chaise, Dimensions, Structure};
use crate::errors::LayoutError;
use crate::log::debug;

/// Seat statistics of one candidate variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariantMetrics {
    pub variant: Variant,
    pub seat_count: usize,
    /// Seats added by splitting.
    pub splits: usize,
    /// Seats no longer than 200 cm.
    pub short_runs: usize,
    /// Every seat fits within 250 cm.
    pub feasible: bool,
}

impl VariantMetrics {
    fn infeasible(variant: Variant) -> Self {
        Self {
            variant,
            seat_count: 0,
            splits: 0,
            short_runs: 0,
            feasible: false,
        }
    }
}

/// Metrics of `variant`. Structural errors, collapsed runs included, are returned.
pub fn metrics(
    family: &Family,
    variant: Variant,
    dimensions: &Dimensions,
    structure: &Structure,
    chaise: Option<&Chaise>,
) -> Result<VariantMetrics, LayoutError> {
    let plan = family.plan(variant).ok_or(LayoutError::VariantUnsupported {
        shape: family.shape(),
        variant,
    })?;
    let points = build_points(&plan, dimensions, structure, chaise)?;
    let runs = seat_runs(&points)?;
    let limit = MAX_SEAT_LENGTH.round() as i64;
    let short = SHORT_SEAT_LENGTH.round() as i64;

    let lengths: Vec<i64> = runs
        .iter()
        .flat_map(|r| r.seats())
        .map(|seat| seat.polygon.dims().0)
        .collect();
    Ok(VariantMetrics {
        variant,
        seat_count: lengths.len(),
        splits: lengths.len() - runs.len(),
        short_runs: lengths.iter().filter(|&&l| l <= short).count(),
        feasible: lengths.iter().all(|&l| l <= limit),
    })
}

/// Pick a variant: feasible first, then fewest seats, then (for U families) most short
/// seats, then the family's preference order.
///
/// A variant whose runs collapse counts as infeasible. When every variant collapses the
/// first [`LayoutError::RunTooShort`] is returned instead of
/// [`LayoutError::NoFeasibleVariant`].
pub fn select_variant(
    family: &Family,
    dimensions: &Dimensions,
    structure: &Structure,
    chaise: Option<&Chaise>,
) -> Result<(Variant, Vec<VariantMetrics>), LayoutError> {
    let mut candidates = Vec::with_capacity(family.variants().len());
    let mut collapsed = None;
    for &variant in family.variants() {
        match metrics(family, variant, dimensions, structure, chaise) {
            Ok(m) => candidates.push(m),
            Err(err @ LayoutError::RunTooShort { .. }) => {
                debug!(variant = %variant, error = %err, "variant collapses");
                candidates.push(VariantMetrics::infeasible(variant));
                collapsed.get_or_insert(err);
            }
            Err(err) => return Err(err),
        }
    }
    let measured = candidates.iter().filter(|m| m.seat_count > 0).count();

    let rank = |m: &VariantMetrics| {
        family
            .preference()
            .iter()
            .position(|&v| v == m.variant)
            .unwrap_or(usize::MAX)
    };
    let short_weight = |m: &VariantMetrics| {
        if family.prefers_short_runs() {
            m.short_runs
        } else {
            0
        }
    };

    let best = candidates
        .iter()
        .filter(|m| m.feasible)
        .min_by(|a, b| {
            a.seat_count
                .cmp(&b.seat_count)
                .then_with(|| short_weight(b).cmp(&short_weight(a)))
                .then_with(|| rank(a).cmp(&rank(b)))
        })
        .copied();

    match best {
        Some(m) => {
            debug!(
                shape = %family.shape(),
                variant = %m.variant,
                seats = m.seat_count,
                splits = m.splits,
                short_runs = m.short_runs,
                "selected variant"
            );
            Ok((m.variant, candidates))
        }
        None => match collapsed {
            Some(err) if measured == 0 => Err(err),
            _ => Err(LayoutError::NoFeasibleVariant {
                shape: family.shape(),
                limit: MAX_SEAT_LENGTH.round() as i64,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::plan::Shape;
    use crate::types::Side;

    fn select(shape: Shape, dims: Dimensions) -> Result<(Variant, Vec<VariantMetrics>), LayoutError> {
        select_variant(&Family::from(shape), &dims, &Structure::default(), None)
    }

    #[test]
    fn single_variant_families_use_v1() {
        let (v, candidates) = select(Shape::Straight, Dimensions::straight(280.0)).unwrap();
        assert_eq!(v, Variant::V1);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn l_plain_prefers_the_feasible_variant() {
        let (v, candidates) = select(Shape::LPlain, Dimensions::l_shape(540.0, 360.0)).unwrap();
        assert_eq!(v, Variant::V1);
        assert!(candidates[0].feasible);
        assert_eq!(candidates[0].seat_count, 4);
        assert_eq!(candidates[0].splits, 2);
        // v2 bottom run [10, 525] splits into 257 + 258
        assert!(!candidates[1].feasible);
    }

    #[test]
    fn l_plain_fewer_seats_wins() {
        // v1: left [10, 285] split, bottom [80, 285]; v2: left [80, 285], bottom [10, 285]
        let (v, candidates) = select(Shape::LPlain, Dimensions::l_shape(300.0, 300.0)).unwrap();
        assert_eq!(candidates[0].seat_count, 3);
        assert_eq!(candidates[1].seat_count, 3);
        assert_eq!(v, Variant::V1);
    }

    #[test]
    fn u_prefers_short_runs_then_preference() {
        // v1 splits the bottom run; v2, v3 and v4 all have 3 seats but v2 has one short seat
        let (v, candidates) = select(Shape::UPlain, Dimensions::u_shape(280.0, 260.0, 260.0)).unwrap();
        let by = |variant| *candidates.iter().find(|m| m.variant == variant).unwrap();
        assert_eq!(by(Variant::V1).seat_count, 4);
        assert_eq!(by(Variant::V2).short_runs, 1);
        assert_eq!(by(Variant::V3).short_runs, 2);
        assert_eq!(by(Variant::V4).short_runs, 2);
        assert_eq!(v, Variant::V3);
    }

    #[test]
    fn u_without_feasible_variant() {
        let err = select(Shape::UPlain, Dimensions::u_shape(400.0, 600.0, 300.0)).unwrap_err();
        assert_eq!(err, LayoutError::NoFeasibleVariant { shape: Shape::UPlain, limit: 250 });
    }

    #[test]
    fn collapsed_runs_are_infeasible_not_errors() {
        // the mitred left branch is empty, the other variants still work
        let (v, candidates) = select(Shape::UOneMitre, Dimensions::u_shape(400.0, 105.0, 250.0)).unwrap();
        assert!(!candidates[0].feasible);
        assert!(!candidates[1].feasible);
        assert_eq!(v, Variant::V3);
    }

    #[test]
    fn every_variant_collapsed_reports_the_run() {
        // the left branch is shorter than any corner arrangement
        let err = select(Shape::UPlain, Dimensions::u_shape(400.0, 20.0, 250.0)).unwrap_err();
        assert_eq!(err, LayoutError::RunTooShort { side: Side::Left, length: -75.0 });
    }
}
