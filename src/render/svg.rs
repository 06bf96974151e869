//! SVG generation

use ::svg::Document;
use ::svg::node::element::{Polygon, Rectangle, Text};
use glam::{DVec2, dvec2};

use super::defaults::{FONT_FAMILY, MARGIN, STROKE_WIDTH};
use super::{DrawItem, TextAnchor};
use crate::palette::Rgb;
use crate::types::BoundingBox;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Maps floor-plan coordinates (y up) to SVG user units (y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub min_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    /// Frame around `bounds` padded by `margin` on every side.
    pub fn around(bounds: BoundingBox, margin: f64) -> Self {
        if bounds.is_empty() {
            return Self {
                min_x: -margin,
                max_y: margin,
                width: 2.0 * margin,
                height: 2.0 * margin,
            };
        }
        Self {
            min_x: bounds.min.x - margin,
            max_y: bounds.max.y + margin,
            width: bounds.width() + 2.0 * margin,
            height: bounds.height() + 2.0 * margin,
        }
    }

    pub fn map(&self, p: DVec2) -> DVec2 {
        dvec2(p.x - self.min_x, self.max_y - p.y)
    }
}

/// Frame that fits every draw item plus the page margin.
pub fn frame_for(items: &[DrawItem]) -> Frame {
    let bounds = items
        .iter()
        .map(DrawItem::bbox)
        .fold(BoundingBox::empty(), BoundingBox::union);
    Frame::around(bounds, MARGIN)
}

fn polygon_node(frame: &Frame, class: &str, points: &[DVec2], fill: &Rgb, stroke: &Rgb) -> Polygon {
    let points: Vec<String> = points
        .iter()
        .map(|p| {
            let q = frame.map(*p);
            format!("{},{}", fmt_num(q.x), fmt_num(q.y))
        })
        .collect();
    Polygon::new()
        .set("class", class)
        .set("points", points.join(" "))
        .set("fill", fill.to_string())
        .set("stroke", stroke.to_string())
        .set("stroke-width", fmt_num(STROKE_WIDTH))
}

fn rect_node(frame: &Frame, class: &str, min: DVec2, max: DVec2, radius: f64, fill: &Rgb, stroke: &Rgb) -> Rectangle {
    // the top-left corner in SVG space has the largest floor-plan y
    let corner = frame.map(dvec2(min.x, max.y));
    let size = max - min;
    Rectangle::new()
        .set("class", class)
        .set("x", fmt_num(corner.x))
        .set("y", fmt_num(corner.y))
        .set("width", fmt_num(size.x))
        .set("height", fmt_num(size.y))
        .set("rx", fmt_num(radius))
        .set("ry", fmt_num(radius))
        .set("fill", fill.to_string())
        .set("stroke", stroke.to_string())
        .set("stroke-width", fmt_num(STROKE_WIDTH))
}

fn text_node(frame: &Frame, at: DVec2, content: &str, font_size: f64, anchor: TextAnchor, bold: bool) -> Text {
    let q = frame.map(at);
    let anchor = match anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
    };
    let text = Text::new(content)
        .set("x", fmt_num(q.x))
        .set("y", fmt_num(q.y))
        .set("font-family", FONT_FAMILY)
        .set("font-size", fmt_num(font_size))
        .set("text-anchor", anchor)
        .set("dominant-baseline", "central");
    if bold { text.set("font-weight", "bold") } else { text }
}

/// Build the SVG DOM for `items` and serialize it.
///
/// The document is sized in centimetres; one user unit is one centimetre.
pub fn generate_svg(items: &[DrawItem]) -> String {
    let frame = frame_for(items);
    let (w, h) = (fmt_num(frame.width), fmt_num(frame.height));
    let mut document = Document::new()
        .set("xmlns", SVG_NS)
        .set("width", format!("{w}cm"))
        .set("height", format!("{h}cm"))
        .set("viewBox", format!("0 0 {w} {h}"));

    for item in items {
        document = match item {
            DrawItem::Polygon {
                layer,
                points,
                fill,
                stroke,
            } => document.add(polygon_node(&frame, layer.class(), points, fill, stroke)),
            DrawItem::RoundedRect {
                layer,
                min,
                max,
                radius,
                fill,
                stroke,
            } => document.add(rect_node(&frame, layer.class(), *min, *max, *radius, fill, stroke)),
            DrawItem::Label {
                at,
                text,
                font_size,
                anchor,
                bold,
            } => document.add(text_node(&frame, *at, text, *font_size, *anchor, *bold)),
        };
    }
    document.to_string()
}

/// Format a coordinate with up to two decimals, trailing zeros trimmed.
pub(crate) fn fmt_num(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Layer;

    #[test]
    fn fmt_num_trims() {
        assert_eq!(fmt_num(12.0), "12");
        assert_eq!(fmt_num(12.5), "12.5");
        assert_eq!(fmt_num(0.126), "0.13");
        assert_eq!(fmt_num(100.0), "100");
        assert_eq!(fmt_num(-0.001), "0");
    }

    #[test]
    fn y_axis_is_flipped() {
        let mut bb = BoundingBox::empty();
        bb.expand(dvec2(0.0, 0.0));
        bb.expand(dvec2(100.0, 50.0));
        let frame = Frame::around(bb, 10.0);
        assert_eq!(frame.map(dvec2(0.0, 0.0)), dvec2(10.0, 60.0));
        assert_eq!(frame.map(dvec2(100.0, 50.0)), dvec2(110.0, 10.0));
        assert_eq!((frame.width, frame.height), (120.0, 70.0));
    }

    #[test]
    fn rounded_rect_uses_top_left_corner() {
        let items = vec![DrawItem::RoundedRect {
            layer: Layer::Cushion,
            min: dvec2(0.0, 0.0),
            max: dvec2(80.0, 15.0),
            radius: 3.0,
            fill: Rgb::new(0x8b, 0x7e, 0x74),
            stroke: Rgb::new(0, 0, 0),
        }];
        assert_eq!(frame_for(&items).width, 120.0);
        let svg = generate_svg(&items);
        assert_eq!(svg.matches("<rect").count(), 1);
        for attr in [
            r#"class="cushion""#,
            r#"x="20""#,
            r#"y="20""#,
            r#"width="80""#,
            r#"height="15""#,
            r#"rx="3""#,
            r##"fill="#8b7e74""##,
            r##"stroke="#000000""##,
            r#"viewBox="0 0 120 55""#,
            r#"width="120cm""#,
        ] {
            assert!(svg.contains(attr), "missing {attr} in {svg}");
        }
    }

    #[test]
    fn label_text_is_escaped() {
        let items = vec![DrawItem::Label {
            at: dvec2(0.0, 0.0),
            text: "70 < 80 & 90".to_string(),
            font_size: 12.0,
            anchor: TextAnchor::Middle,
            bold: true,
        }];
        let svg = generate_svg(&items);
        assert!(svg.contains("70 &lt; 80 &amp; 90"), "{svg}");
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains(r#"text-anchor="middle""#));
    }
}
