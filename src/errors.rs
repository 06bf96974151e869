//! Error types with rich diagnostics using miette
//!
//! Layout errors describe sofa configurations the engine refuses to build. Spec errors
//! come from the boundary parsers and carry a span into the offending user string.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::layout::plan::{Shape, Variant};
use crate::types::Side;

// ============================================================================
// Layout Errors
// ============================================================================

/// Errors raised while turning a request into a layout
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("a {side} chaise cannot coexist with a {side} armrest")]
    #[diagnostic(
        code(canape::structure::chaise_with_armrest),
        help("remove the {side} armrest or move the chaise to another side")
    )]
    ChaiseWithArmrest { side: Side },

    #[error("a {side} chaise requires a {side} backrest")]
    #[diagnostic(code(canape::structure::chaise_without_backrest))]
    ChaiseWithoutBackrest { side: Side },

    #[error("a {shape} sofa has no chaise on the {side} side")]
    #[diagnostic(code(canape::structure::chaise_side_unsupported))]
    ChaiseSideUnsupported { side: Side, shape: Shape },

    #[error("invalid {name}: {value} cm")]
    #[diagnostic(
        code(canape::structure::invalid_dimension),
        help("dimensions are positive centimetre values")
    )]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("the {side} seat run would be {length} cm long")]
    #[diagnostic(
        code(canape::structure::run_too_short),
        help("increase the overall dimensions or remove an armrest on that side")
    )]
    RunTooShort { side: Side, length: f64 },

    #[error("a {shape} sofa has no variant {variant}")]
    #[diagnostic(code(canape::structure::variant_unsupported))]
    VariantUnsupported { shape: Shape, variant: Variant },

    #[error("seat of {length}×{depth} cm exceeds {limit} cm, a further split is needed")]
    #[diagnostic(
        code(canape::length::exceeded),
        help("seat runs are split once at their midpoint; shorten the run or change the variant")
    )]
    LengthExceeded { length: i64, depth: i64, limit: i64 },

    #[error("no valid cushion packing for sizes {min}..={max}")]
    #[diagnostic(
        code(canape::packing::no_valid_packing),
        help("widen the size range or use a fixed size")
    )]
    NoValidPacking { min: u32, max: u32 },

    #[error("no feasible {shape} variant: every candidate keeps a seat longer than {limit} cm")]
    #[diagnostic(
        code(canape::select::no_feasible_variant),
        help("adjust the dimensions so that each seat respects {limit} cm")
    )]
    NoFeasibleVariant { shape: Shape, limit: i64 },

    #[error("point map has no {anchor} anchor")]
    #[diagnostic(code(canape::points::missing_anchor))]
    MissingAnchor { anchor: &'static str },
}

// ============================================================================
// Specification Errors
// ============================================================================

/// Errors from the cushion, bolster and palette specification parsers
#[derive(Error, Diagnostic, Debug)]
pub enum SpecError {
    #[error("invalid cushion specification")]
    #[diagnostic(
        code(canape::spec::invalid_cushions),
        help("expected auto, a size in cm, valise, p, g, s, p:s, g:s or a range like 70-80")
    )]
    InvalidCushionSpec {
        #[source_code]
        src: NamedSource<String>,
        #[label("not understood")]
        span: SourceSpan,
    },

    #[error("invalid cushion size range {min}-{max}")]
    #[diagnostic(code(canape::spec::invalid_range))]
    InvalidRange {
        min: u32,
        max: u32,
        #[source_code]
        src: NamedSource<String>,
        #[label("minimum must be positive and not above the maximum")]
        span: SourceSpan,
    },

    #[error("cushion size range {min}-{max} is wider than {limit} cm")]
    #[diagnostic(code(canape::spec::range_too_wide))]
    RangeTooWide {
        min: u32,
        max: u32,
        limit: u32,
        #[source_code]
        src: NamedSource<String>,
        #[label("this range")]
        span: SourceSpan,
    },

    #[error("invalid bolster sides")]
    #[diagnostic(
        code(canape::spec::invalid_bolsters),
        help("list sides among g, b, d separated by commas, or none")
    )]
    InvalidBolster {
        #[source_code]
        src: NamedSource<String>,
        #[label("unknown side")]
        span: SourceSpan,
    },

    #[error("invalid palette entry")]
    #[diagnostic(
        code(canape::spec::invalid_palette),
        help("entries look like `accoudoirs:gris foncé; coussins:#8B7E74`")
    )]
    InvalidPaletteEntry {
        #[source_code]
        src: NamedSource<String>,
        #[label("expected key:value")]
        span: SourceSpan,
    },
}

impl SpecError {
    /// Byte span of the error inside its source string.
    pub fn span(&self) -> SourceSpan {
        match self {
            SpecError::InvalidCushionSpec { span, .. }
            | SpecError::InvalidRange { span, .. }
            | SpecError::RangeTooWide { span, .. }
            | SpecError::InvalidBolster { span, .. }
            | SpecError::InvalidPaletteEntry { span, .. } => *span,
        }
    }
}
