//! Sofa floor-plan engine.
//!
//! Given a sofa family (straight, L or U), its outer dimensions and which backrests,
//! armrests, chaise and bolsters it carries, [`layout`] computes every seat, backrest,
//! armrest, corner block and cushion polygon, splitting seat runs longer than 250 cm
//! and choosing cushion sizes that waste as little length as possible.
//!
//! ```
//! use canape::{Dimensions, Shape, SofaRequest, layout};
//!
//! let layout = layout(&SofaRequest::new(Shape::Straight, Dimensions::straight(280.0))).unwrap();
//! assert_eq!(layout.seat_count(), 1);
//! assert_eq!(layout.cushion_count(), 3);
//! ```

pub mod errors;
pub mod layout;
pub mod log;
pub mod palette;
pub mod parse;
pub mod render;
pub mod report;
pub mod types;

use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "canape.pest"]
pub struct SpecParser;

pub use errors::{LayoutError, SpecError};
pub use layout::{
    BackrestKind, BackrestPiece, Chaise, Cushion, Dimensions, Family, Layout, Packing, Piece,
    Shape, ShapeFamily, SofaRequest, Structure, Variant, VariantChoice, VariantMetrics, layout,
};
pub use palette::{Palette, Rgb, Swatch};
pub use parse::{BolsterSet, CushionSpec, PaletteSpec};
pub use render::{draw_items, render_svg};
pub use report::Report;
pub use types::{Polygon, Side, Span};
