//! Request and output types of the layout pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::defaults::{DEFAULT_DEPTH, HALF_BACKREST_LENGTH};
use super::packing::{Cushion, Packing};
use super::plan::{Family, Shape, ShapeFamily, Variant};
use super::points::PointMap;
use super::select::VariantMetrics;
use super::split::SeatRun;
use crate::parse::{BolsterSet, CushionSpec};
use crate::types::{Polygon, Side, Sides};

// ============================================================================
// Request
// ============================================================================

fn default_depth() -> f64 {
    DEFAULT_DEPTH
}

/// Overall dimensions in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Overall width along x (tx)
    pub width: f64,
    /// Height of the left branch (ty); unused by straight sofas
    #[serde(default)]
    pub left_height: f64,
    /// Height of the right branch (tz); U shapes only
    #[serde(default)]
    pub right_height: f64,
    /// Seat depth
    #[serde(default = "default_depth")]
    pub depth: f64,
}

impl Dimensions {
    pub fn straight(width: f64) -> Self {
        Self {
            width,
            left_height: 0.0,
            right_height: 0.0,
            depth: DEFAULT_DEPTH,
        }
    }

    pub fn l_shape(width: f64, left_height: f64) -> Self {
        Self {
            left_height,
            ..Self::straight(width)
        }
    }

    pub fn u_shape(width: f64, left_height: f64, right_height: f64) -> Self {
        Self {
            left_height,
            right_height,
            ..Self::straight(width)
        }
    }

    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }
}

/// Which sides carry a backrest and an armrest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Structure {
    pub backrests: Sides<bool>,
    pub armrests: Sides<bool>,
}

impl Default for Structure {
    fn default() -> Self {
        Self {
            backrests: Sides::splat(true),
            armrests: Sides::splat(true),
        }
    }
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_backrest(mut self, side: Side) -> Self {
        self.backrests[side] = false;
        self
    }

    pub fn without_armrest(mut self, side: Side) -> Self {
        self.armrests[side] = false;
        self
    }

    /// Clear the flags a family does not expose.
    pub fn restricted_to(&self, family: &Family) -> Structure {
        let mut out = *self;
        for side in Side::ALL {
            out.backrests[side] &= family.backrest_sides().contains(&side);
            out.armrests[side] &= family.armrest_sides().contains(&side);
        }
        out
    }
}

/// Chaise extension (méridienne) replacing the armrest on one side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chaise {
    pub side: Side,
    pub length: f64,
}

/// Variant requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VariantChoice {
    /// Let the selector pick.
    #[default]
    Auto,
    Fixed(Variant),
}

impl VariantChoice {
    pub fn from_code(code: &str) -> Option<VariantChoice> {
        if code.trim().eq_ignore_ascii_case("auto") {
            return Some(VariantChoice::Auto);
        }
        Variant::from_code(code).map(VariantChoice::Fixed)
    }
}

impl fmt::Display for VariantChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantChoice::Auto => f.write_str("auto"),
            VariantChoice::Fixed(v) => write!(f, "{v}"),
        }
    }
}

impl TryFrom<String> for VariantChoice {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        VariantChoice::from_code(&value).ok_or_else(|| format!("unknown variant `{value}`"))
    }
}

impl From<VariantChoice> for String {
    fn from(choice: VariantChoice) -> String {
        choice.to_string()
    }
}

/// Everything needed to lay out one sofa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SofaRequest {
    #[serde(alias = "family")]
    pub shape: Shape,
    #[serde(default)]
    pub variant: VariantChoice,
    pub dimensions: Dimensions,
    #[serde(default)]
    pub structure: Structure,
    #[serde(default)]
    pub chaise: Option<Chaise>,
    #[serde(default)]
    pub cushions: CushionSpec,
    #[serde(default)]
    pub bolsters: BolsterSet,
}

impl SofaRequest {
    pub fn new(shape: Shape, dimensions: Dimensions) -> Self {
        Self {
            shape,
            variant: VariantChoice::Auto,
            dimensions,
            structure: Structure::default(),
            chaise: None,
            cushions: CushionSpec::Auto,
            bolsters: BolsterSet::none(),
        }
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = VariantChoice::Fixed(variant);
        self
    }

    pub fn with_structure(mut self, structure: Structure) -> Self {
        self.structure = structure;
        self
    }

    pub fn with_chaise(mut self, side: Side, length: f64) -> Self {
        self.chaise = Some(Chaise { side, length });
        self
    }

    pub fn with_cushions(mut self, cushions: CushionSpec) -> Self {
        self.cushions = cushions;
        self
    }

    pub fn with_bolsters(mut self, bolsters: BolsterSet) -> Self {
        self.bolsters = bolsters;
        self
    }

    pub fn family(&self) -> Family {
        Family::from(self.shape)
    }
}

// ============================================================================
// Output
// ============================================================================

/// A polygon attached to a frame side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Piece {
    pub side: Side,
    pub polygon: Polygon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackrestKind {
    /// Short piece alongside a corner the run does not cover.
    Return,
    /// Piece running along a seat run.
    Strip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackrestPiece {
    pub side: Side,
    pub kind: BackrestKind,
    pub polygon: Polygon,
    /// Split coordinate of the strip this piece belongs to, if it was split.
    pub cut: Option<f64>,
}

impl BackrestPiece {
    /// 0.5 for pieces up to 110 cm, 1.0 above.
    pub fn weight(&self) -> f64 {
        if self.polygon.extent() <= HALF_BACKREST_LENGTH {
            0.5
        } else {
            1.0
        }
    }
}

/// A fully assembled sofa floor plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub shape: Shape,
    pub variant: Variant,
    pub dimensions: Dimensions,
    pub chaise: Option<Chaise>,
    pub points: PointMap,
    pub runs: Vec<SeatRun>,
    pub seats: Vec<Piece>,
    pub backrests: Vec<BackrestPiece>,
    pub armrests: Vec<Piece>,
    pub corner_blocks: Vec<Polygon>,
    pub bolsters: Vec<Piece>,
    pub packing: Packing,
    /// Metrics of every candidate when the variant was selected automatically.
    pub candidates: Vec<VariantMetrics>,
}

impl Layout {
    pub fn cushions(&self) -> &[Cushion] {
        &self.packing.cushions
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    pub fn armrest_count(&self) -> usize {
        self.armrests.len()
    }

    pub fn corner_count(&self) -> usize {
        self.corner_blocks.len()
    }

    pub fn bolster_count(&self) -> usize {
        self.bolsters.len()
    }

    pub fn cushion_count(&self) -> usize {
        self.packing.total
    }

    /// Backrests counted with short pieces as halves.
    pub fn weighted_backrest_count(&self) -> f64 {
        self.backrests.iter().map(BackrestPiece::weight).sum()
    }

    /// Number of backrest strips that were split in two.
    pub fn backrest_splits(&self) -> usize {
        let mut cuts: Vec<(Side, f64)> = self
            .backrests
            .iter()
            .filter(|p| p.kind == BackrestKind::Strip)
            .filter_map(|p| p.cut.map(|c| (p.side, c)))
            .collect();
        cuts.dedup();
        cuts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req = SofaRequest::new(Shape::LPlain, Dimensions::l_shape(300.0, 250.0));
        assert_eq!(req.variant, VariantChoice::Auto);
        assert_eq!(req.cushions, CushionSpec::Auto);
        assert!(req.bolsters.is_empty());
        assert!(req.structure.backrests.right);
        assert_eq!(req.dimensions.depth, 70.0);
    }

    #[test]
    fn structure_is_restricted_per_family() {
        let s = Structure::default().restricted_to(&Family::from(Shape::Straight));
        assert_eq!(s.backrests, Sides { left: false, bottom: true, right: false });
        assert_eq!(s.armrests, Sides { left: true, bottom: false, right: true });

        let s = Structure::default().restricted_to(&Family::from(Shape::UPlain));
        assert_eq!(s.backrests, Sides::splat(true));
        assert!(!s.armrests.bottom);
    }

    #[test]
    fn variant_choice_codes() {
        assert_eq!(VariantChoice::from_code("AUTO"), Some(VariantChoice::Auto));
        assert_eq!(VariantChoice::from_code("v3"), Some(VariantChoice::Fixed(Variant::V3)));
        assert_eq!(VariantChoice::from_code("v9"), None);
    }

    #[test]
    fn backrest_weight_threshold() {
        let piece = |len: f64| BackrestPiece {
            side: Side::Bottom,
            kind: BackrestKind::Strip,
            polygon: Polygon::rect(0.0, 0.0, len, 10.0),
            cut: None,
        };
        assert_eq!(piece(110.0).weight(), 0.5);
        assert_eq!(piece(110.5).weight(), 1.0);
    }
}
