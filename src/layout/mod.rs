//! Sofa layout pipeline
//!
//! This module is organized into several submodules:
//! - `defaults`: manufacturing constants
//! - `plan`: shape families and their declarative variant plans
//! - `points`: validated anchor map of one variant
//! - `split`: seat runs and the single split of long runs
//! - `packing`: cushion size and shift search
//! - `assemble`: seats, corner blocks, backrests, armrests, bolsters
//! - `select`: automatic variant selection
//! - `types`: request and output types

pub mod assemble;
pub mod defaults;
pub mod packing;
pub mod plan;
pub mod points;
pub mod select;
pub mod split;
pub mod types;

pub use assemble::Assembly;
pub use packing::{Cushion, CushionRun, Packing, PackingProblem};
pub use plan::{CornerKind, Family, Shape, ShapeFamily, Topology, Variant, VariantPlan};
pub use points::{Anchor, PointMap};
pub use select::VariantMetrics;
pub use split::SeatRun;
pub use types::{
    BackrestKind, BackrestPiece, Chaise, Dimensions, Layout, Piece, SofaRequest, Structure,
    VariantChoice,
};

use crate::errors::LayoutError;
use crate::log::debug;

/// Lay out a sofa.
///
/// Runs the variant selector unless the request names a variant or the family has a single
/// one, then builds the point map, splits the seat runs, assembles the frame and packs the
/// cushions.
pub fn layout(request: &SofaRequest) -> Result<Layout, LayoutError> {
    let family = request.family();
    let chaise = request.chaise.as_ref();

    let (variant, candidates) = match request.variant {
        VariantChoice::Fixed(variant) => (variant, Vec::new()),
        VariantChoice::Auto => match family.variants() {
            [only] => (*only, Vec::new()),
            _ => select::select_variant(&family, &request.dimensions, &request.structure, chaise)?,
        },
    };
    let plan = family.plan(variant).ok_or(LayoutError::VariantUnsupported {
        shape: request.shape,
        variant,
    })?;

    let points = points::build_points(&plan, &request.dimensions, &request.structure, chaise)?;
    let runs = split::seat_runs(&points)?;
    // a zero-length chaise is dropped from the output
    let chaise = points::validate_chaise(&family, points.structure(), chaise)?;
    let bolsters = request.bolsters.restricted_to(family.bolster_sides());
    let assembly = assemble::assemble(&points, &runs, &bolsters)?;
    split::check_seat_lengths(&assembly.seats)?;

    let problem = packing::problem_for(&points, &bolsters)?;
    let packing = packing::pack(&problem, request.cushions)?;

    debug!(
        shape = %request.shape,
        variant = %variant,
        seats = assembly.seats.len(),
        cushions = packing.total,
        "layout complete"
    );
    Ok(Layout {
        shape: request.shape,
        variant,
        dimensions: request.dimensions,
        chaise,
        points,
        runs,
        seats: assembly.seats,
        backrests: assembly.backrests,
        armrests: assembly.armrests,
        corner_blocks: assembly.corner_blocks,
        bolsters: assembly.bolsters,
        packing,
        candidates,
    })
}
