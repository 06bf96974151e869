//! SVG floor plan rendering
//!
//! This module is organized into submodules:
//! - `defaults`: drawing sizes and fixed colors
//! - `svg`: serialization of draw items into an SVG document
//!
//! [`draw_items`] turns a [`Layout`] into a flat list of [`DrawItem`]s in floor-plan
//! coordinates (centimetres, y up). The SVG writer flips the y axis so the backrest
//! ends up at the bottom of the picture.

pub mod defaults;
pub mod svg;

use glam::{DVec2, dvec2};
use serde::Serialize;

use crate::layout::Layout;
use crate::layout::defaults::{BOLSTER_LABEL, CUSHION_CORNER_RADIUS};
use crate::palette::{BOLSTER_COLOR, OUTLINE_COLOR, Palette, Rgb};
use crate::types::{BoundingBox, Polygon};
use defaults::*;

pub use svg::generate_svg;

/// Component family a shape belongs to, emitted as the SVG `class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Seat,
    CornerBlock,
    Backrest,
    Armrest,
    Cushion,
    Bolster,
    Legend,
}

impl Layer {
    pub fn class(self) -> &'static str {
        match self {
            Layer::Seat => "seat",
            Layer::CornerBlock => "corner-block",
            Layer::Backrest => "backrest",
            Layer::Armrest => "armrest",
            Layer::Cushion => "cushion",
            Layer::Bolster => "bolster",
            Layer::Legend => "legend",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Start,
    Middle,
}

/// One drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawItem {
    Polygon {
        layer: Layer,
        points: Vec<DVec2>,
        fill: Rgb,
        stroke: Rgb,
    },
    RoundedRect {
        layer: Layer,
        min: DVec2,
        max: DVec2,
        radius: f64,
        fill: Rgb,
        stroke: Rgb,
    },
    /// Text centered vertically on `at`.
    Label {
        at: DVec2,
        text: String,
        font_size: f64,
        anchor: TextAnchor,
        bold: bool,
    },
}

impl DrawItem {
    fn polygon(layer: Layer, polygon: &Polygon, fill: Rgb) -> Self {
        DrawItem::Polygon {
            layer,
            points: polygon.points.clone(),
            fill,
            stroke: OUTLINE_COLOR,
        }
    }

    fn label(at: DVec2, text: impl Into<String>, font_size: f64) -> Self {
        DrawItem::Label {
            at,
            text: text.into(),
            font_size,
            anchor: TextAnchor::Middle,
            bold: true,
        }
    }

    pub fn layer(&self) -> Option<Layer> {
        match self {
            DrawItem::Polygon { layer, .. } | DrawItem::RoundedRect { layer, .. } => Some(*layer),
            DrawItem::Label { .. } => None,
        }
    }

    /// Extent of the item. Label extents are estimated from the character count.
    pub fn bbox(&self) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        match self {
            DrawItem::Polygon { points, .. } => {
                for p in points {
                    bb.expand(*p);
                }
            }
            DrawItem::RoundedRect { min, max, .. } => {
                bb.expand(*min);
                bb.expand(*max);
            }
            DrawItem::Label {
                at,
                text,
                font_size,
                anchor,
                ..
            } => {
                let width = text_width(text, *font_size);
                let x0 = match anchor {
                    TextAnchor::Start => at.x,
                    TextAnchor::Middle => at.x - width / 2.0,
                };
                bb.expand(dvec2(x0, at.y - font_size / 2.0));
                bb.expand(dvec2(x0 + width, at.y + font_size / 2.0));
            }
        }
        bb
    }
}

pub fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * CHAR_WIDTH
}

fn centre_label(polygon: &Polygon) -> String {
    let (long, short) = polygon.dims();
    format!("{long}x{short}")
}

/// Drawing instructions for `layout`, back to front.
pub fn draw_items(layout: &Layout, palette: &Palette) -> Vec<DrawItem> {
    let mut items = Vec::new();

    for seat in &layout.seats {
        items.push(DrawItem::polygon(Layer::Seat, &seat.polygon, palette.seat.color));
    }
    for block in &layout.corner_blocks {
        items.push(DrawItem::polygon(Layer::CornerBlock, block, palette.seat.color));
    }
    for backrest in &layout.backrests {
        items.push(DrawItem::polygon(
            Layer::Backrest,
            &backrest.polygon,
            palette.backrests.color,
        ));
    }
    for armrest in &layout.armrests {
        items.push(DrawItem::polygon(
            Layer::Armrest,
            &armrest.polygon,
            palette.armrests.color,
        ));
    }
    for cushion in layout.cushions() {
        let bb = cushion.polygon.bbox();
        items.push(DrawItem::RoundedRect {
            layer: Layer::Cushion,
            min: bb.min,
            max: bb.max,
            radius: CUSHION_CORNER_RADIUS,
            fill: palette.cushions.color,
            stroke: OUTLINE_COLOR,
        });
    }
    for bolster in &layout.bolsters {
        items.push(DrawItem::polygon(Layer::Bolster, &bolster.polygon, BOLSTER_COLOR));
    }

    for seat in &layout.seats {
        items.push(DrawItem::label(
            seat.polygon.centroid(),
            centre_label(&seat.polygon),
            LABEL_FONT_SIZE,
        ));
    }
    for cushion in layout.cushions() {
        items.push(DrawItem::label(
            cushion.polygon.centroid(),
            cushion.size.to_string(),
            CUSHION_FONT_SIZE,
        ));
    }
    for bolster in &layout.bolsters {
        items.push(DrawItem::label(
            bolster.polygon.centroid(),
            BOLSTER_LABEL,
            CUSHION_FONT_SIZE,
        ));
    }

    let sofa = items
        .iter()
        .map(DrawItem::bbox)
        .fold(BoundingBox::empty(), BoundingBox::union);
    if sofa.is_empty() {
        return items;
    }

    items.push(DrawItem::label(
        dvec2(sofa.center().x, sofa.max.y + TITLE_GAP),
        format!("Canapé {} [{}]", layout.shape.french(), layout.variant),
        TITLE_FONT_SIZE,
    ));
    legend(&mut items, palette, dvec2(sofa.max.x + LEGEND_GAP, sofa.max.y));
    items
}

/// Legend box hanging from `top_left`.
fn legend(items: &mut Vec<DrawItem>, palette: &Palette, top_left: DVec2) {
    let rows: Vec<(String, Rgb)> = palette
        .legend()
        .into_iter()
        .map(|item| {
            let text = match &item.name {
                Some(name) => format!("{} : {name}", item.label),
                None => item.label.to_string(),
            };
            (text, item.color)
        })
        .collect();

    let n = rows.len() as f64;
    let text_x = top_left.x + LEGEND_PADDING + LEGEND_SWATCH + LEGEND_PADDING;
    let widest = rows
        .iter()
        .map(|(text, _)| text_width(text, LEGEND_FONT_SIZE))
        .fold(0.0, f64::max);
    let width = text_x - top_left.x + widest + LEGEND_PADDING;
    let height = 2.0 * LEGEND_PADDING + n * LEGEND_SWATCH + (n - 1.0).max(0.0) * LEGEND_ROW_GAP;

    items.push(DrawItem::Polygon {
        layer: Layer::Legend,
        points: Polygon::rect(
            top_left.x,
            top_left.y - height,
            top_left.x + width,
            top_left.y,
        )
        .points,
        fill: LEGEND_BACKGROUND,
        stroke: LEGEND_OUTLINE,
    });

    for (i, (text, color)) in rows.into_iter().enumerate() {
        let top = top_left.y - LEGEND_PADDING - i as f64 * (LEGEND_SWATCH + LEGEND_ROW_GAP);
        let x0 = top_left.x + LEGEND_PADDING;
        items.push(DrawItem::Polygon {
            layer: Layer::Legend,
            points: Polygon::rect(x0, top - LEGEND_SWATCH, x0 + LEGEND_SWATCH, top).points,
            fill: color,
            stroke: OUTLINE_COLOR,
        });
        items.push(DrawItem::Label {
            at: dvec2(text_x, top - LEGEND_SWATCH / 2.0),
            text,
            font_size: LEGEND_FONT_SIZE,
            anchor: TextAnchor::Start,
            bold: false,
        });
    }
}

/// Render `layout` as a standalone SVG document.
pub fn render_svg(layout: &Layout, palette: &Palette) -> String {
    let items = draw_items(layout, palette);
    generate_svg(&items)
}
