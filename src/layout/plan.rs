//! Declarative description of every sofa shape and its topological variants.
//!
//! A variant is nothing more than the way each bottom corner is resolved. The point
//! builder and the assembler interpret a [`VariantPlan`]; no variant has code of its own.

use std::fmt;

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use crate::types::Side;

/// Shape family as requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// Straight sofa (S1)
    #[serde(rename = "s1", alias = "straight", alias = "simple")]
    Straight,
    /// L without mitred corner (LNF)
    #[serde(rename = "lnf")]
    LPlain,
    /// L with a mitred corner block (LF)
    #[serde(rename = "lf")]
    LMitred,
    /// U without mitred corners
    #[serde(rename = "u")]
    UPlain,
    /// U with one mitred corner (U1F)
    #[serde(rename = "u1f")]
    UOneMitre,
    /// U with two mitred corners (U2F)
    #[serde(rename = "u2f")]
    UTwoMitres,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Straight,
        Shape::LPlain,
        Shape::LMitred,
        Shape::UPlain,
        Shape::UOneMitre,
        Shape::UTwoMitres,
    ];

    /// Short code accepted on the command line.
    pub fn code(self) -> &'static str {
        match self {
            Shape::Straight => "s1",
            Shape::LPlain => "lnf",
            Shape::LMitred => "lf",
            Shape::UPlain => "u",
            Shape::UOneMitre => "u1f",
            Shape::UTwoMitres => "u2f",
        }
    }

    pub fn from_code(code: &str) -> Option<Shape> {
        let code = code.trim().to_ascii_lowercase();
        Shape::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Name printed in report headers.
    pub fn french(self) -> &'static str {
        match self {
            Shape::Straight => "droit",
            Shape::LPlain => "L sans angle",
            Shape::LMitred => "L avec angle",
            Shape::UPlain => "U sans angle",
            Shape::UOneMitre => "U 1 angle",
            Shape::UTwoMitres => "U 2 angles",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Straight => "straight",
            Shape::LPlain => "L",
            Shape::LMitred => "mitred L",
            Shape::UPlain => "U",
            Shape::UOneMitre => "one-mitre U",
            Shape::UTwoMitres => "two-mitre U",
        })
    }
}

/// Topological variant of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    V1,
    V2,
    V3,
    V4,
}

impl Variant {
    pub fn from_code(code: &str) -> Option<Variant> {
        match code.trim().to_ascii_lowercase().as_str() {
            "v1" => Some(Variant::V1),
            "v2" => Some(Variant::V2),
            "v3" => Some(Variant::V3),
            "v4" => Some(Variant::V4),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variant::V1 => "v1",
            Variant::V2 => "v2",
            Variant::V3 => "v3",
            Variant::V4 => "v4",
        })
    }
}

/// How a bottom corner of an L or U is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerKind {
    /// A depth + 20 square block with a diagonal joint; both runs start after it.
    Mitred,
    /// The bottom run spans the depth × depth corner square.
    BottomOwned,
    /// The side branch spans the corner square.
    SideOwned,
}

impl CornerKind {
    /// Does the run on `side` extend over this corner?
    pub fn owned_by(self, side: Side) -> bool {
        match self {
            CornerKind::Mitred => false,
            CornerKind::BottomOwned => side == Side::Bottom,
            CornerKind::SideOwned => side != Side::Bottom,
        }
    }
}

/// Frame topology of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// One bottom run between two free ends.
    Straight,
    /// Left branch and bottom run meeting at one corner; the bottom end is free.
    Corner { left: CornerKind },
    /// Left branch, bottom run and right branch meeting at two corners.
    DoubleCorner { left: CornerKind, right: CornerKind },
}

impl Topology {
    /// Sides carrying a seat run, in packing order (bottom first).
    pub fn run_sides(&self) -> &'static [Side] {
        match self {
            Topology::Straight => &[Side::Bottom],
            Topology::Corner { .. } => &[Side::Bottom, Side::Left],
            Topology::DoubleCorner { .. } => &[Side::Bottom, Side::Left, Side::Right],
        }
    }

    pub fn left_corner(&self) -> Option<CornerKind> {
        match *self {
            Topology::Straight => None,
            Topology::Corner { left } | Topology::DoubleCorner { left, .. } => Some(left),
        }
    }

    pub fn right_corner(&self) -> Option<CornerKind> {
        match *self {
            Topology::DoubleCorner { right, .. } => Some(right),
            _ => None,
        }
    }

    pub fn has_side(&self, side: Side) -> bool {
        self.run_sides().contains(&side)
    }
}

/// A fully resolved shape + variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariantPlan {
    pub shape: Shape,
    pub variant: Variant,
    pub topology: Topology,
}

/// Behaviour shared by every shape family.
#[enum_dispatch]
pub trait ShapeFamily {
    fn shape(&self) -> Shape;

    /// Variants in their natural order.
    fn variants(&self) -> &'static [Variant];

    /// Final tie-break order of the variant selector.
    fn preference(&self) -> &'static [Variant] {
        self.variants()
    }

    fn topology(&self, variant: Variant) -> Option<Topology>;

    /// Sides where a chaise may replace the armrest.
    fn chaise_sides(&self) -> &'static [Side];

    /// Sides where a bolster may be placed.
    fn bolster_sides(&self) -> &'static [Side];

    /// Sides whose backrest flag is meaningful.
    fn backrest_sides(&self) -> &'static [Side];

    /// Sides whose armrest flag is meaningful.
    fn armrest_sides(&self) -> &'static [Side];

    /// Whether the selector favours runs of at most 200 cm before the preference order.
    fn prefers_short_runs(&self) -> bool {
        false
    }

    fn plan(&self, variant: Variant) -> Option<VariantPlan> {
        self.topology(variant).map(|topology| VariantPlan {
            shape: self.shape(),
            variant,
            topology,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Straight;

#[derive(Debug, Clone, Copy, Default)]
pub struct LPlain;

#[derive(Debug, Clone, Copy, Default)]
pub struct LMitred;

#[derive(Debug, Clone, Copy, Default)]
pub struct UPlain;

#[derive(Debug, Clone, Copy, Default)]
pub struct UOneMitre;

#[derive(Debug, Clone, Copy, Default)]
pub struct UTwoMitres;

/// Shape family dispatch
#[enum_dispatch(ShapeFamily)]
#[derive(Debug, Clone, Copy)]
pub enum Family {
    Straight,
    LPlain,
    LMitred,
    UPlain,
    UOneMitre,
    UTwoMitres,
}

impl From<Shape> for Family {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Straight => Family::from(Straight),
            Shape::LPlain => Family::from(LPlain),
            Shape::LMitred => Family::from(LMitred),
            Shape::UPlain => Family::from(UPlain),
            Shape::UOneMitre => Family::from(UOneMitre),
            Shape::UTwoMitres => Family::from(UTwoMitres),
        }
    }
}

const SINGLE: &[Variant] = &[Variant::V1];
const PAIR: &[Variant] = &[Variant::V1, Variant::V2];
const FOUR: &[Variant] = &[Variant::V1, Variant::V2, Variant::V3, Variant::V4];

const SIDES_LR: &[Side] = &[Side::Left, Side::Right];
const SIDES_LB: &[Side] = &[Side::Left, Side::Bottom];
const SIDES_ALL: &[Side] = &[Side::Left, Side::Bottom, Side::Right];

impl ShapeFamily for Straight {
    fn shape(&self) -> Shape {
        Shape::Straight
    }

    fn variants(&self) -> &'static [Variant] {
        SINGLE
    }

    fn topology(&self, variant: Variant) -> Option<Topology> {
        (variant == Variant::V1).then_some(Topology::Straight)
    }

    fn chaise_sides(&self) -> &'static [Side] {
        SIDES_LR
    }

    fn bolster_sides(&self) -> &'static [Side] {
        SIDES_LR
    }

    fn backrest_sides(&self) -> &'static [Side] {
        &[Side::Bottom]
    }

    fn armrest_sides(&self) -> &'static [Side] {
        SIDES_LR
    }
}

impl ShapeFamily for LPlain {
    fn shape(&self) -> Shape {
        Shape::LPlain
    }

    fn variants(&self) -> &'static [Variant] {
        PAIR
    }

    fn topology(&self, variant: Variant) -> Option<Topology> {
        let left = match variant {
            Variant::V1 => CornerKind::SideOwned,
            Variant::V2 => CornerKind::BottomOwned,
            _ => return None,
        };
        Some(Topology::Corner { left })
    }

    fn chaise_sides(&self) -> &'static [Side] {
        SIDES_LB
    }

    fn bolster_sides(&self) -> &'static [Side] {
        SIDES_LB
    }

    fn backrest_sides(&self) -> &'static [Side] {
        SIDES_LB
    }

    fn armrest_sides(&self) -> &'static [Side] {
        SIDES_LB
    }
}

impl ShapeFamily for LMitred {
    fn shape(&self) -> Shape {
        Shape::LMitred
    }

    fn variants(&self) -> &'static [Variant] {
        SINGLE
    }

    fn topology(&self, variant: Variant) -> Option<Topology> {
        (variant == Variant::V1).then_some(Topology::Corner {
            left: CornerKind::Mitred,
        })
    }

    fn chaise_sides(&self) -> &'static [Side] {
        SIDES_LB
    }

    fn bolster_sides(&self) -> &'static [Side] {
        SIDES_LB
    }

    fn backrest_sides(&self) -> &'static [Side] {
        SIDES_LB
    }

    fn armrest_sides(&self) -> &'static [Side] {
        SIDES_LB
    }
}

impl ShapeFamily for UPlain {
    fn shape(&self) -> Shape {
        Shape::UPlain
    }

    fn variants(&self) -> &'static [Variant] {
        FOUR
    }

    fn preference(&self) -> &'static [Variant] {
        &[Variant::V2, Variant::V1, Variant::V3, Variant::V4]
    }

    fn topology(&self, variant: Variant) -> Option<Topology> {
        use CornerKind::{BottomOwned, SideOwned};
        let (left, right) = match variant {
            Variant::V1 => (BottomOwned, BottomOwned),
            Variant::V2 => (SideOwned, SideOwned),
            Variant::V3 => (BottomOwned, SideOwned),
            Variant::V4 => (SideOwned, BottomOwned),
        };
        Some(Topology::DoubleCorner { left, right })
    }

    fn chaise_sides(&self) -> &'static [Side] {
        SIDES_LR
    }

    fn bolster_sides(&self) -> &'static [Side] {
        SIDES_LR
    }

    fn backrest_sides(&self) -> &'static [Side] {
        SIDES_ALL
    }

    fn armrest_sides(&self) -> &'static [Side] {
        SIDES_LR
    }

    fn prefers_short_runs(&self) -> bool {
        true
    }
}

impl ShapeFamily for UOneMitre {
    fn shape(&self) -> Shape {
        Shape::UOneMitre
    }

    fn variants(&self) -> &'static [Variant] {
        FOUR
    }

    fn preference(&self) -> &'static [Variant] {
        &[Variant::V1, Variant::V3, Variant::V2, Variant::V4]
    }

    fn topology(&self, variant: Variant) -> Option<Topology> {
        use CornerKind::{BottomOwned, Mitred, SideOwned};
        let (left, right) = match variant {
            Variant::V1 => (Mitred, SideOwned),
            Variant::V2 => (Mitred, BottomOwned),
            Variant::V3 => (SideOwned, Mitred),
            Variant::V4 => (BottomOwned, Mitred),
        };
        Some(Topology::DoubleCorner { left, right })
    }

    fn chaise_sides(&self) -> &'static [Side] {
        SIDES_LR
    }

    fn bolster_sides(&self) -> &'static [Side] {
        SIDES_LR
    }

    fn backrest_sides(&self) -> &'static [Side] {
        SIDES_ALL
    }

    fn armrest_sides(&self) -> &'static [Side] {
        SIDES_LR
    }

    fn prefers_short_runs(&self) -> bool {
        true
    }
}

impl ShapeFamily for UTwoMitres {
    fn shape(&self) -> Shape {
        Shape::UTwoMitres
    }

    fn variants(&self) -> &'static [Variant] {
        SINGLE
    }

    fn topology(&self, variant: Variant) -> Option<Topology> {
        (variant == Variant::V1).then_some(Topology::DoubleCorner {
            left: CornerKind::Mitred,
            right: CornerKind::Mitred,
        })
    }

    fn chaise_sides(&self) -> &'static [Side] {
        SIDES_LR
    }

    fn bolster_sides(&self) -> &'static [Side] {
        SIDES_LR
    }

    fn backrest_sides(&self) -> &'static [Side] {
        SIDES_ALL
    }

    fn armrest_sides(&self) -> &'static [Side] {
        SIDES_LR
    }

    fn prefers_short_runs(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_variant_has_a_plan() {
        for shape in Shape::ALL {
            let family = Family::from(shape);
            for &v in family.variants() {
                let plan = family.plan(v).expect("listed variant must resolve");
                assert_eq!(plan.shape, shape);
            }
            for &v in family.preference() {
                assert!(family.variants().contains(&v));
            }
        }
    }

    #[test]
    fn unlisted_variants_are_rejected() {
        assert!(Family::from(Shape::Straight).plan(Variant::V2).is_none());
        assert!(Family::from(Shape::LPlain).plan(Variant::V3).is_none());
        assert!(Family::from(Shape::UTwoMitres).plan(Variant::V4).is_none());
    }

    #[test]
    fn corner_ownership() {
        assert!(CornerKind::BottomOwned.owned_by(Side::Bottom));
        assert!(!CornerKind::BottomOwned.owned_by(Side::Left));
        assert!(CornerKind::SideOwned.owned_by(Side::Right));
        assert!(!CornerKind::Mitred.owned_by(Side::Bottom));
    }

    #[test]
    fn u_one_mitre_variants_place_the_mitre() {
        let family = Family::from(Shape::UOneMitre);
        let t = family.topology(Variant::V3).unwrap();
        assert_eq!(t.left_corner(), Some(CornerKind::SideOwned));
        assert_eq!(t.right_corner(), Some(CornerKind::Mitred));
    }

    #[test]
    fn shape_codes() {
        for shape in Shape::ALL {
            assert_eq!(Shape::from_code(shape.code()), Some(shape));
        }
        assert_eq!(Shape::from_code("U2F"), Some(Shape::UTwoMitres));
    }
}
