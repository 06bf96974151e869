//! Color palette resolution.
//!
//! Colors are named in French with optional shade words ("gris foncé", "taupe très
//! clair", "gris très clair presque blanc") or given as hex. A [`Palette`] is an
//! immutable value handed to the renderer; nothing here touches global state.

use std::fmt;

use serde::Serialize;

use crate::log::warn;
use crate::parse::PaletteSpec;

/// Named base colors.
pub const BASE_COLORS: &[(&str, Rgb)] = &[
    ("gris", Rgb::new(0x9e, 0x9e, 0x9e)),
    ("beige", Rgb::new(0xd8, 0xc4, 0xa8)),
    ("taupe", Rgb::new(0x8b, 0x7e, 0x74)),
    ("creme", Rgb::new(0xf4, 0xf1, 0xe9)),
    ("blanc", Rgb::new(0xff, 0xff, 0xff)),
    ("noir", Rgb::new(0x11, 0x11, 0x11)),
    ("sable", Rgb::new(0xe6, 0xd8, 0xb8)),
    ("anthracite", Rgb::new(0x4b, 0x4b, 0x4b)),
];

pub const BOLSTER_COLOR: Rgb = Rgb::new(0xe0, 0xd9, 0xc7);
pub const OUTLINE_COLOR: Rgb = Rgb::new(0x00, 0x00, 0x00);

/// Lightening applied to the armrest color when no backrest color is given.
const BACKREST_LIGHTEN: f64 = 0.20;

const DEFAULT_ARMRESTS: &str = "gris";
const DEFAULT_SEAT: &str = "gris très clair presque blanc";
const DEFAULT_CUSHIONS: &str = "taupe";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb`, or the same without `#`.
    pub fn from_hex(s: &str) -> Option<Rgb> {
        let h = s.trim();
        let h = h.strip_prefix('#').unwrap_or(h);
        if !h.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let expanded: String = match h.len() {
            3 => h.chars().flat_map(|c| [c, c]).collect(),
            6 => h.to_string(),
            _ => return None,
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Move each channel toward white: `c + (255 - c) * factor`.
    pub fn lighten(self, factor: f64) -> Rgb {
        let f = |c: u8| clamp_channel(c as f64 + (255.0 - c as f64) * factor);
        Rgb::new(f(self.r), f(self.g), f(self.b))
    }

    /// Move each channel toward black: `c * (1 - factor)`.
    pub fn darken(self, factor: f64) -> Rgb {
        let f = |c: u8| clamp_channel(c as f64 * (1.0 - factor));
        Rgb::new(f(self.r), f(self.g), f(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn clamp_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Lowercase, strip French accents and collapse whitespace.
pub fn normalize(s: &str) -> String {
    let folded: String = s
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' | 'á' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' | 'í' => 'i',
            'ô' | 'ö' | 'ó' => 'o',
            'ù' | 'û' | 'ü' | 'ú' => 'u',
            'ç' => 'c',
            'ÿ' => 'y',
            other => other,
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Shade {
    Lighten(f64),
    Darken(f64),
}

/// Shade words, most specific first.
const SHADES: &[(&str, Shade)] = &[
    ("presque blanc", Shade::Lighten(0.75)),
    ("tres clair", Shade::Lighten(0.40)),
    ("clair", Shade::Lighten(0.22)),
    ("tres fonce", Shade::Darken(0.40)),
    ("fonce", Shade::Darken(0.22)),
];

fn apply_shade(base: Rgb, shade_words: &str) -> Rgb {
    for (word, shade) in SHADES {
        if shade_words.contains(word) {
            return match *shade {
                Shade::Lighten(f) => base.lighten(f),
                Shade::Darken(f) => base.darken(f),
            };
        }
    }
    base
}

/// Shade words with their accents restored, for legend names.
fn pretty_shade(shade_words: &str) -> String {
    shade_words.replace("tres", "très").replace("fonce", "foncé")
}

/// A resolved color and, for named colors, its display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Swatch {
    pub color: Rgb,
    pub name: Option<String>,
}

impl Swatch {
    /// Resolve a French color name with shade words, or a hex string.
    pub fn parse(value: &str) -> Swatch {
        let s = normalize(value);
        let bare = s.trim_start_matches('#');
        let looks_hex = s.starts_with('#')
            || ((bare.len() == 3 || bare.len() == 6) && bare.chars().all(|c| c.is_ascii_hexdigit()));
        if looks_hex {
            if let Some(color) = Rgb::from_hex(&s) {
                return Swatch { color, name: None };
            }
        }

        let mut words = s.split(' ');
        let first = words.next().unwrap_or_default();
        let shade_words = words.collect::<Vec<_>>().join(" ");
        let (base_name, base) = match BASE_COLORS.iter().find(|(name, _)| *name == first) {
            Some((name, rgb)) => (*name, *rgb),
            None => {
                warn!(value, "unknown color, falling back to gris");
                ("gris", BASE_COLORS[0].1)
            }
        };
        let color = apply_shade(base, &shade_words);
        let name = if shade_words.is_empty() {
            base_name.to_string()
        } else {
            format!("{} {}", base_name, pretty_shade(&shade_words))
        };
        Swatch {
            color,
            name: Some(name),
        }
    }
}

/// Fill colors for every component family of the drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Palette {
    pub armrests: Swatch,
    pub backrests: Swatch,
    pub seat: Swatch,
    pub cushions: Swatch,
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub label: &'static str,
    pub color: Rgb,
    pub name: Option<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::resolve(&PaletteSpec::default())
    }
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve user overrides on top of the default palette.
    ///
    /// Without an explicit backrest color, backrests take the armrest color lightened
    /// by 20% and are named "<armrest name> clair".
    pub fn resolve(spec: &PaletteSpec) -> Palette {
        let armrests = Swatch::parse(spec.armrests.as_deref().unwrap_or(DEFAULT_ARMRESTS));
        let backrests = match spec.backrests.as_deref() {
            Some(value) => Swatch::parse(value),
            None => Swatch {
                color: armrests.color.lighten(BACKREST_LIGHTEN),
                name: Some(match &armrests.name {
                    Some(name) => format!("{name} clair"),
                    None => "gris clair".to_string(),
                }),
            },
        };
        let seat = Swatch::parse(spec.seat.as_deref().unwrap_or(DEFAULT_SEAT));
        let cushions = Swatch::parse(spec.cushions.as_deref().unwrap_or(DEFAULT_CUSHIONS));
        Palette {
            armrests,
            backrests,
            seat,
            cushions,
        }
    }

    pub fn legend(&self) -> Vec<LegendItem> {
        let item = |label, swatch: &Swatch| LegendItem {
            label,
            color: swatch.color,
            name: swatch.name.clone(),
        };
        vec![
            item("Dossier", &self.backrests),
            item("Accoudoir", &self.armrests),
            item("Coussins", &self.cushions),
            item("Assise", &self.seat),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Rgb tests
    // ========================================================================

    #[test]
    fn hex_forms() {
        assert_eq!(Rgb::from_hex("#9e9e9e"), Some(Rgb::new(0x9e, 0x9e, 0x9e)));
        assert_eq!(Rgb::from_hex("fff"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(Rgb::from_hex("#12"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
        assert_eq!(Rgb::new(0x8b, 0x7e, 0x74).to_string(), "#8b7e74");
    }

    #[test]
    fn lighten_and_darken_round_and_clamp() {
        // 158 + 97 * 0.22 = 179.34
        assert_eq!(Rgb::new(158, 158, 158).lighten(0.22), Rgb::new(179, 179, 179));
        // 158 * 0.78 = 123.24
        assert_eq!(Rgb::new(158, 158, 158).darken(0.22), Rgb::new(123, 123, 123));
        assert_eq!(Rgb::new(10, 20, 30).lighten(1.0), Rgb::new(255, 255, 255));
        assert_eq!(Rgb::new(10, 20, 30).darken(1.0), Rgb::new(0, 0, 0));
    }

    // ========================================================================
    // Swatch tests
    // ========================================================================

    #[test]
    fn normalize_strips_accents_and_spaces() {
        assert_eq!(normalize("  Gris   Très  Foncé "), "gris tres fonce");
        assert_eq!(normalize("Crème"), "creme");
    }

    #[test]
    fn named_colors_with_shades() {
        let s = Swatch::parse("gris foncé");
        assert_eq!(s.color, Rgb::new(123, 123, 123));
        assert_eq!(s.name.as_deref(), Some("gris foncé"));

        // "tres clair" is matched before "clair"
        let s = Swatch::parse("gris très clair");
        assert_eq!(s.color, Rgb::new(158, 158, 158).lighten(0.40));
        assert_eq!(s.name.as_deref(), Some("gris très clair"));

        // "presque blanc" wins over every other shade word
        let s = Swatch::parse("gris très clair presque blanc");
        assert_eq!(s.color, Rgb::new(158, 158, 158).lighten(0.75));
    }

    #[test]
    fn hex_values_have_no_name() {
        let s = Swatch::parse("#8B7E74");
        assert_eq!(s.color, Rgb::new(0x8b, 0x7e, 0x74));
        assert_eq!(s.name, None);
        assert_eq!(Swatch::parse("abc").color, Rgb::new(0xaa, 0xbb, 0xcc));
    }

    #[test]
    fn unknown_name_falls_back_to_gris() {
        let s = Swatch::parse("violet clair");
        assert_eq!(s.color, Rgb::new(158, 158, 158).lighten(0.22));
        assert_eq!(s.name.as_deref(), Some("gris clair"));
    }

    // ========================================================================
    // Palette tests
    // ========================================================================

    #[test]
    fn default_palette() {
        let p = Palette::default();
        assert_eq!(p.armrests.color, Rgb::new(0x9e, 0x9e, 0x9e));
        assert_eq!(p.backrests.color, Rgb::new(0x9e, 0x9e, 0x9e).lighten(0.20));
        assert_eq!(p.backrests.name.as_deref(), Some("gris clair"));
        assert_eq!(p.cushions.name.as_deref(), Some("taupe"));
        let labels: Vec<_> = p.legend().iter().map(|i| i.label).collect();
        assert_eq!(labels, ["Dossier", "Accoudoir", "Coussins", "Assise"]);
    }

    #[test]
    fn backrests_follow_armrests() {
        let spec = PaletteSpec {
            armrests: Some("taupe foncé".into()),
            ..PaletteSpec::default()
        };
        let p = Palette::resolve(&spec);
        assert_eq!(p.backrests.color, p.armrests.color.lighten(0.20));
        assert_eq!(p.backrests.name.as_deref(), Some("taupe foncé clair"));
    }

    #[test]
    fn hex_armrests_name_backrests_gris_clair() {
        let spec = PaletteSpec {
            armrests: Some("#123456".into()),
            ..PaletteSpec::default()
        };
        let p = Palette::resolve(&spec);
        assert_eq!(p.backrests.name.as_deref(), Some("gris clair"));
    }
}
