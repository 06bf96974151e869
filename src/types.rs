//! Geometric primitives shared by the layout pipeline.
//!
//! Coordinates are centimetres in a y-up frame whose origin is the outer bottom-left
//! corner of the sofa. Points are `glam::DVec2`.

use std::fmt;
use std::ops::{Index, IndexMut};

use glam::{DVec2, dvec2};
use serde::{Deserialize, Serialize};

/// Tolerance used when comparing centimetre coordinates.
pub const EPSILON: f64 = 1e-9;

/// A side of the sofa frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left branch ("g", gauche)
    Left,
    /// Bottom run ("b", bas)
    Bottom,
    /// Right branch ("d", droite)
    Right,
}

impl Side {
    pub const ALL: [Side; 3] = [Side::Left, Side::Bottom, Side::Right];

    /// Single-letter code used in user-facing specifications.
    pub fn code(self) -> char {
        match self {
            Side::Left => 'g',
            Side::Bottom => 'b',
            Side::Right => 'd',
        }
    }

    pub fn from_code(code: &str) -> Option<Side> {
        match code.trim().to_ascii_lowercase().as_str() {
            "g" | "gauche" | "left" => Some(Side::Left),
            "b" | "bas" | "bottom" => Some(Side::Bottom),
            "d" | "droite" | "droit" | "right" => Some(Side::Right),
            _ => None,
        }
    }

    /// Axis along which a seat run on this side extends.
    pub fn axis(self) -> Axis {
        match self {
            Side::Bottom => Axis::X,
            Side::Left | Side::Right => Axis::Y,
        }
    }

    /// French name, as printed in reports.
    pub fn french(self) -> &'static str {
        match self {
            Side::Left => "gauche",
            Side::Bottom => "bas",
            Side::Right => "droit",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Bottom => write!(f, "bottom"),
            Side::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Coordinate of `p` along this axis.
    #[inline]
    pub fn along(self, p: DVec2) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }
}

/// One value per frame side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sides<T> {
    pub left: T,
    pub bottom: T,
    pub right: T,
}

impl<T: Copy> Sides<T> {
    pub const fn splat(value: T) -> Self {
        Self {
            left: value,
            bottom: value,
            right: value,
        }
    }

    pub fn get(&self, side: Side) -> T {
        self[side]
    }
}

impl<T> Index<Side> for Sides<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Bottom => &self.bottom,
            Side::Right => &self.right,
        }
    }
}

impl<T> IndexMut<Side> for Sides<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Left => &mut self.left,
            Side::Bottom => &mut self.bottom,
            Side::Right => &mut self.right,
        }
    }
}

/// A closed interval along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() <= EPSILON
    }

    /// True when `value` lies strictly inside the interval.
    #[inline]
    pub fn contains_strictly(&self, value: f64) -> bool {
        self.start < value && value < self.end
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BoundingBox {
    /// An inverted box that any point expands.
    pub fn empty() -> Self {
        Self {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }

    pub fn expand(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(mut self, other: BoundingBox) -> Self {
        self.expand(other.min);
        self.expand(other.max);
        self
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }
}

/// Closed polygon: the first vertex is repeated as the last one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Polygon {
    pub points: Vec<DVec2>,
}

impl Polygon {
    /// Close `points` if needed.
    pub fn closed(mut points: Vec<DVec2>) -> Self {
        if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
            if first.distance_squared(last) > EPSILON {
                points.push(first);
            }
        }
        Self { points }
    }

    /// Axis-aligned rectangle `[(x0,y0),(x1,y0),(x1,y1),(x0,y1),(x0,y0)]`.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            points: vec![
                dvec2(x0, y0),
                dvec2(x1, y0),
                dvec2(x1, y1),
                dvec2(x0, y1),
                dvec2(x0, y0),
            ],
        }
    }

    pub fn bbox(&self) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        for p in &self.points {
            bb.expand(*p);
        }
        bb
    }

    /// `(long side, short side)` of the bounding box, rounded to whole centimetres.
    pub fn dims(&self) -> (i64, i64) {
        let bb = self.bbox();
        let (w, h) = (bb.width(), bb.height());
        (w.max(h).round() as i64, w.min(h).round() as i64)
    }

    /// Longest bounding-box extent, unrounded.
    pub fn extent(&self) -> f64 {
        let bb = self.bbox();
        bb.width().max(bb.height())
    }

    pub fn has_area(&self) -> bool {
        if self.points.len() < 4 {
            return false;
        }
        let bb = self.bbox();
        bb.width() > EPSILON && bb.height() > EPSILON
    }

    /// Shoelace area.
    pub fn area(&self) -> f64 {
        let twice: f64 = self
            .points
            .windows(2)
            .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
            .sum();
        (twice * 0.5).abs()
    }

    /// Vertex average, excluding the closing vertex.
    pub fn centroid(&self) -> DVec2 {
        let open = match self.points.split_last() {
            Some((_, rest)) if !rest.is_empty() => rest,
            _ => &self.points[..],
        };
        if open.is_empty() {
            return DVec2::ZERO;
        }
        open.iter().copied().sum::<DVec2>() / open.len() as f64
    }
}

/// Format centimetres the way reports print them: whole values without decimals.
pub fn fmt_cm(value: f64) -> String {
    if (value - value.round()).abs() < EPSILON {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.1}", value)
    }
}
