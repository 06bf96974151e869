//! Named frame points of a sofa variant.
//!
//! [`build_points`] validates the request and computes every anchor the splitter, the
//! assembler and the packer read. The map is built once and never mutated.

use std::collections::BTreeMap;

use glam::{DVec2, dvec2};
use serde::Serialize;

use super::defaults::{ARMREST_THICKNESS, BACKREST_THICKNESS, CORNER_EXTRA};
use super::plan::{CornerKind, Family, Shape, ShapeFamily, Topology, VariantPlan};
use super::types::{Chaise, Dimensions, Structure};
use crate::errors::LayoutError;
use crate::log::debug;
use crate::types::Side;

/// Named frame points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Origin,
    /// Inner corner of the backrests, `(ox, oy)`
    SeatOrigin,
    /// `(rx, oy)`, U shapes only
    RightSeatOrigin,
    LeftRunStart,
    LeftRunEnd,
    BottomRunStart,
    BottomRunEnd,
    RightRunStart,
    RightRunEnd,
    /// End of the left branch after the chaise
    LeftLimit,
    RightLimit,
    /// Bottom run extent after the chaise
    BottomLimitStart,
    BottomLimitEnd,
    LeftBackrestStart,
    LeftBackrestEnd,
    BottomBackrestStart,
    BottomBackrestEnd,
    RightBackrestStart,
    RightBackrestEnd,
    /// `(0, ty)`
    LeftOuterTop,
    /// `(tx, tz)`
    RightOuterTop,
    /// `(tx, 0)`
    OuterRight,
}

impl Anchor {
    pub fn name(self) -> &'static str {
        match self {
            Anchor::Origin => "origin",
            Anchor::SeatOrigin => "seat origin",
            Anchor::RightSeatOrigin => "right seat origin",
            Anchor::LeftRunStart => "left run start",
            Anchor::LeftRunEnd => "left run end",
            Anchor::BottomRunStart => "bottom run start",
            Anchor::BottomRunEnd => "bottom run end",
            Anchor::RightRunStart => "right run start",
            Anchor::RightRunEnd => "right run end",
            Anchor::LeftLimit => "left limit",
            Anchor::RightLimit => "right limit",
            Anchor::BottomLimitStart => "bottom limit start",
            Anchor::BottomLimitEnd => "bottom limit end",
            Anchor::LeftBackrestStart => "left backrest start",
            Anchor::LeftBackrestEnd => "left backrest end",
            Anchor::BottomBackrestStart => "bottom backrest start",
            Anchor::BottomBackrestEnd => "bottom backrest end",
            Anchor::RightBackrestStart => "right backrest start",
            Anchor::RightBackrestEnd => "right backrest end",
            Anchor::LeftOuterTop => "left outer top",
            Anchor::RightOuterTop => "right outer top",
            Anchor::OuterRight => "outer right",
        }
    }

    pub fn run_start(side: Side) -> Anchor {
        match side {
            Side::Left => Anchor::LeftRunStart,
            Side::Bottom => Anchor::BottomRunStart,
            Side::Right => Anchor::RightRunStart,
        }
    }

    pub fn run_end(side: Side) -> Anchor {
        match side {
            Side::Left => Anchor::LeftRunEnd,
            Side::Bottom => Anchor::BottomRunEnd,
            Side::Right => Anchor::RightRunEnd,
        }
    }

    pub fn backrest_start(side: Side) -> Anchor {
        match side {
            Side::Left => Anchor::LeftBackrestStart,
            Side::Bottom => Anchor::BottomBackrestStart,
            Side::Right => Anchor::RightBackrestStart,
        }
    }

    pub fn backrest_end(side: Side) -> Anchor {
        match side {
            Side::Left => Anchor::LeftBackrestEnd,
            Side::Bottom => Anchor::BottomBackrestEnd,
            Side::Right => Anchor::RightBackrestEnd,
        }
    }
}

/// Immutable anchor map of one variant, with the inputs it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointMap {
    plan: VariantPlan,
    depth: f64,
    structure: Structure,
    points: BTreeMap<Anchor, DVec2>,
}

impl PointMap {
    pub fn plan(&self) -> &VariantPlan {
        &self.plan
    }

    pub fn topology(&self) -> Topology {
        self.plan.topology
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Structure restricted to the flags the family exposes.
    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn get(&self, anchor: Anchor) -> Option<DVec2> {
        self.points.get(&anchor).copied()
    }

    pub fn require(&self, anchor: Anchor) -> Result<DVec2, LayoutError> {
        self.get(anchor).ok_or(LayoutError::MissingAnchor {
            anchor: anchor.name(),
        })
    }

    pub fn contains(&self, anchor: Anchor) -> bool {
        self.points.contains_key(&anchor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Anchor, DVec2)> + '_ {
        self.points.iter().map(|(a, p)| (*a, *p))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Check the chaise against the family and the (restricted) structure.
///
/// A zero length means no chaise.
pub fn validate_chaise(
    family: &Family,
    structure: &Structure,
    chaise: Option<&Chaise>,
) -> Result<Option<Chaise>, LayoutError> {
    let Some(chaise) = chaise.copied() else {
        return Ok(None);
    };
    if chaise.length == 0.0 {
        return Ok(None);
    }
    if !(chaise.length > 0.0 && chaise.length.is_finite()) {
        return Err(LayoutError::InvalidDimension {
            name: "chaise length",
            value: chaise.length,
        });
    }
    let side = chaise.side;
    if !family.chaise_sides().contains(&side) {
        return Err(LayoutError::ChaiseSideUnsupported {
            side,
            shape: family.shape(),
        });
    }
    if structure.armrests[side] {
        return Err(LayoutError::ChaiseWithArmrest { side });
    }
    // a straight chaise shortens the only backrest there is
    let backrest_side = if family.shape() == Shape::Straight {
        Side::Bottom
    } else {
        side
    };
    if !structure.backrests[backrest_side] {
        return Err(LayoutError::ChaiseWithoutBackrest { side });
    }
    Ok(Some(chaise))
}

fn require_positive(name: &'static str, value: f64) -> Result<(), LayoutError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(LayoutError::InvalidDimension { name, value })
    }
}

fn require_run(side: Side, length: f64) -> Result<(), LayoutError> {
    if length > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::RunTooShort { side, length })
    }
}

/// Start of a side branch (left or right) along y.
fn side_run_start(corner: CornerKind, oy: f64, depth: f64, block: f64) -> f64 {
    match corner {
        CornerKind::Mitred => oy + block,
        CornerKind::BottomOwned => oy + depth,
        CornerKind::SideOwned => oy,
    }
}

/// Offset of the bottom run from a corner's seat edge.
fn bottom_run_inset(corner: CornerKind, depth: f64, block: f64) -> f64 {
    match corner {
        CornerKind::Mitred => block,
        CornerKind::BottomOwned => 0.0,
        CornerKind::SideOwned => depth,
    }
}

/// Build and validate the anchor map of one variant.
pub fn build_points(
    plan: &VariantPlan,
    dimensions: &Dimensions,
    structure: &Structure,
    chaise: Option<&Chaise>,
) -> Result<PointMap, LayoutError> {
    let family = Family::from(plan.shape);
    let structure = structure.restricted_to(&family);
    let chaise = validate_chaise(&family, &structure, chaise)?;

    require_positive("width", dimensions.width)?;
    require_positive("depth", dimensions.depth)?;
    if plan.topology != Topology::Straight {
        require_positive("left height", dimensions.left_height)?;
    }
    if matches!(plan.topology, Topology::DoubleCorner { .. }) {
        require_positive("right height", dimensions.right_height)?;
    }

    let backrests = structure.backrests;
    let armrests = structure.armrests;
    let flag = |on: bool, value: f64| if on { value } else { 0.0 };
    let chaise_len = |side: Side| chaise.filter(|c| c.side == side).map_or(0.0, |c| c.length);

    let (tx, ty, tz) = (dimensions.width, dimensions.left_height, dimensions.right_height);
    let depth = dimensions.depth;
    let block = depth + CORNER_EXTRA;
    let ox = flag(backrests.left, BACKREST_THICKNESS);
    let oy = flag(backrests.bottom, BACKREST_THICKNESS);
    let rx = tx - flag(backrests.right, BACKREST_THICKNESS);

    let mut points = BTreeMap::new();
    points.insert(Anchor::Origin, DVec2::ZERO);
    points.insert(Anchor::SeatOrigin, dvec2(ox, oy));
    points.insert(Anchor::OuterRight, dvec2(tx, 0.0));

    match plan.topology {
        Topology::Straight => {
            let xl = flag(armrests.left, ARMREST_THICKNESS);
            let xr = tx - flag(armrests.right, ARMREST_THICKNESS);
            require_run(Side::Bottom, xr - xl)?;
            let start = (xl + chaise_len(Side::Left)).min(xr);
            let end = (xr - chaise_len(Side::Right)).max(xl);

            points.insert(Anchor::BottomRunStart, dvec2(xl, oy));
            points.insert(Anchor::BottomRunEnd, dvec2(xr, oy));
            points.insert(Anchor::BottomLimitStart, dvec2(start, oy));
            points.insert(Anchor::BottomLimitEnd, dvec2(end, oy));
            if backrests.bottom {
                points.insert(Anchor::BottomBackrestStart, dvec2(start, 0.0));
                points.insert(Anchor::BottomBackrestEnd, dvec2(end, 0.0));
            }
        }
        Topology::Corner { left } => {
            let top_l = ty - flag(armrests.left, ARMREST_THICKNESS);
            let x_b = tx - flag(armrests.bottom, ARMREST_THICKNESS);
            let s_l = side_run_start(left, oy, depth, block);
            let s_b = ox + bottom_run_inset(left, depth, block);
            require_run(Side::Left, top_l - s_l)?;
            require_run(Side::Bottom, x_b - s_b)?;
            let limit_l = (top_l - chaise_len(Side::Left)).clamp(s_l, top_l);
            let limit_b = (x_b - chaise_len(Side::Bottom)).clamp(s_b, x_b);

            points.insert(Anchor::LeftRunStart, dvec2(ox, s_l));
            points.insert(Anchor::LeftRunEnd, dvec2(ox, top_l));
            points.insert(Anchor::LeftLimit, dvec2(ox, limit_l));
            points.insert(Anchor::BottomRunStart, dvec2(s_b, oy));
            points.insert(Anchor::BottomRunEnd, dvec2(x_b, oy));
            points.insert(Anchor::BottomLimitStart, dvec2(ox, oy));
            points.insert(Anchor::BottomLimitEnd, dvec2(limit_b, oy));
            points.insert(Anchor::LeftOuterTop, dvec2(0.0, ty));
            if backrests.left {
                points.insert(Anchor::LeftBackrestStart, DVec2::ZERO);
                points.insert(Anchor::LeftBackrestEnd, dvec2(0.0, limit_l));
            }
            if backrests.bottom {
                points.insert(Anchor::BottomBackrestStart, dvec2(ox, 0.0));
                points.insert(Anchor::BottomBackrestEnd, dvec2(limit_b, 0.0));
            }
        }
        Topology::DoubleCorner { left, right } => {
            let inner = (rx - depth) - (ox + depth);
            if inner <= 0.0 {
                return Err(LayoutError::InvalidDimension {
                    name: "inner width",
                    value: inner,
                });
            }
            let top_l = ty - flag(armrests.left, ARMREST_THICKNESS);
            let top_r = tz - flag(armrests.right, ARMREST_THICKNESS);
            let s_l = side_run_start(left, oy, depth, block);
            let s_r = side_run_start(right, oy, depth, block);
            let s_b = ox + bottom_run_inset(left, depth, block);
            let e_b = rx - bottom_run_inset(right, depth, block);
            require_run(Side::Left, top_l - s_l)?;
            require_run(Side::Bottom, e_b - s_b)?;
            require_run(Side::Right, top_r - s_r)?;
            let limit_l = (top_l - chaise_len(Side::Left)).clamp(s_l, top_l);
            let limit_r = (top_r - chaise_len(Side::Right)).clamp(s_r, top_r);

            points.insert(Anchor::RightSeatOrigin, dvec2(rx, oy));
            points.insert(Anchor::LeftRunStart, dvec2(ox, s_l));
            points.insert(Anchor::LeftRunEnd, dvec2(ox, top_l));
            points.insert(Anchor::LeftLimit, dvec2(ox, limit_l));
            points.insert(Anchor::BottomRunStart, dvec2(s_b, oy));
            points.insert(Anchor::BottomRunEnd, dvec2(e_b, oy));
            points.insert(Anchor::BottomLimitStart, dvec2(ox, oy));
            points.insert(Anchor::BottomLimitEnd, dvec2(rx, oy));
            points.insert(Anchor::RightRunStart, dvec2(rx, s_r));
            points.insert(Anchor::RightRunEnd, dvec2(rx, top_r));
            points.insert(Anchor::RightLimit, dvec2(rx, limit_r));
            points.insert(Anchor::LeftOuterTop, dvec2(0.0, ty));
            points.insert(Anchor::RightOuterTop, dvec2(tx, tz));
            if backrests.left {
                points.insert(Anchor::LeftBackrestStart, DVec2::ZERO);
                points.insert(Anchor::LeftBackrestEnd, dvec2(0.0, limit_l));
            }
            if backrests.bottom {
                points.insert(Anchor::BottomBackrestStart, dvec2(ox, 0.0));
                points.insert(Anchor::BottomBackrestEnd, dvec2(rx, 0.0));
            }
            if backrests.right {
                points.insert(Anchor::RightBackrestStart, dvec2(tx, 0.0));
                points.insert(Anchor::RightBackrestEnd, dvec2(tx, limit_r));
            }
        }
    }

    debug!(
        shape = %plan.shape,
        variant = %plan.variant,
        anchors = points.len(),
        "built point map"
    );
    Ok(PointMap {
        plan: *plan,
        depth,
        structure,
        points,
    })
}
