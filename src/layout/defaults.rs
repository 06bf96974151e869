//! Default sizes and manufacturing constants (all in centimetres)

/// Thickness of a backrest band.
pub const BACKREST_THICKNESS: f64 = 10.0;
/// Thickness of an armrest.
pub const ARMREST_THICKNESS: f64 = 15.0;
/// Depth of a cushion laid against a backrest; also the shift unit at joints.
pub const CUSHION_DEPTH: f64 = 15.0;
/// Standard seat depth.
pub const DEFAULT_DEPTH: f64 = 70.0;
/// Longest seat a single module may have; longer runs are split once.
pub const MAX_SEAT_LENGTH: f64 = 250.0;
/// Seats up to this length count as short for U-shape variant selection.
pub const SHORT_SEAT_LENGTH: f64 = 200.0;
/// Backrest pieces up to this length count as half a backrest.
pub const HALF_BACKREST_LENGTH: f64 = 110.0;
/// A mitred corner block measures depth + this on each side.
pub const CORNER_EXTRA: f64 = 20.0;

/// Sizes tried by the automatic cushion policy.
pub const STANDARD_SIZES: [u32; 3] = [65, 80, 90];
/// Largest size difference allowed between runs in valise mode.
pub const MAX_SIZE_SPREAD: u32 = 5;
/// Widest valise range accepted by the parser.
pub const MAX_RANGE_WIDTH: u32 = 60;

pub const VALISE_RANGE: (u32, u32) = (60, 100);
pub const SMALL_RANGE: (u32, u32) = (60, 74);
pub const LARGE_RANGE: (u32, u32) = (76, 100);

pub const BOLSTER_LENGTH: f64 = 70.0;
pub const BOLSTER_THICKNESS: f64 = 30.0;
pub const BOLSTER_LABEL: &str = "70x30";

/// Cosmetic corner radius of drawn cushions and bolsters.
pub const CUSHION_CORNER_RADIUS: f64 = 3.0;
