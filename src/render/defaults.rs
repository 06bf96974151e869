//! Drawing sizes, all in centimetres of floor plan

use crate::palette::Rgb;

pub const MARGIN: f64 = 20.0;
pub const STROKE_WIDTH: f64 = 0.6;
pub const LABEL_FONT_SIZE: f64 = 7.0;
pub const CUSHION_FONT_SIZE: f64 = 6.0;
pub const TITLE_FONT_SIZE: f64 = 9.0;
pub const TITLE_GAP: f64 = 8.0;
pub const LEGEND_FONT_SIZE: f64 = 6.0;
pub const LEGEND_SWATCH: f64 = 8.0;
pub const LEGEND_ROW_GAP: f64 = 4.0;
pub const LEGEND_PADDING: f64 = 4.0;
/// Gap between the sofa and the legend box.
pub const LEGEND_GAP: f64 = 15.0;
/// Average glyph width as a fraction of the font size, for extent estimates.
pub const CHAR_WIDTH: f64 = 0.55;
pub const FONT_FAMILY: &str = "Arial, sans-serif";
pub const LEGEND_BACKGROUND: Rgb = Rgb::new(0xff, 0xff, 0xff);
pub const LEGEND_OUTLINE: Rgb = Rgb::new(0xaa, 0xaa, 0xaa);
