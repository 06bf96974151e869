//! Boundary parsers for the small specification strings a request carries.
//!
//! - [`CushionSpec`]: `auto`, a fixed size, or a valise range (`valise`, `p`, `g`, `s`, `70-80:s`)
//! - [`BolsterSet`]: `g,d`, `b`, `none`
//! - [`PaletteSpec`]: `accoudoirs:gris foncé; coussins:#8B7E74`
//!
//! All three go through the pest grammar in `canape.pest`; failures become
//! [`SpecError`] diagnostics pointing into the original string.

use std::fmt;
use std::str::FromStr;

use miette::{NamedSource, SourceSpan};
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;
use serde::{Deserialize, Serialize};

use crate::errors::SpecError;
use crate::layout::defaults::{LARGE_RANGE, MAX_RANGE_WIDTH, SMALL_RANGE, VALISE_RANGE};
use crate::log::{debug, warn};
use crate::palette::normalize;
use crate::types::{Side, Sides};
use crate::{Rule, SpecParser};

fn source(name: &str, input: &str) -> NamedSource<String> {
    NamedSource::new(name, input.to_string())
}

/// Span of a pest failure, widened to the offending character.
fn error_span(input: &str, err: &pest::error::Error<Rule>) -> SourceSpan {
    match err.location {
        InputLocation::Pos(pos) => {
            let len = input
                .get(pos..)
                .and_then(|rest| rest.chars().next())
                .map_or(0, char::len_utf8);
            (pos, len).into()
        }
        InputLocation::Span((start, end)) => (start, end.saturating_sub(start)).into(),
    }
}

fn pair_span(pair: &Pair<'_, Rule>) -> SourceSpan {
    let span = pair.as_span();
    (span.start(), span.end() - span.start()).into()
}

// ============================================================================
// Cushion sizing policy
// ============================================================================

/// How cushion sizes are chosen for the seat runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "CushionSpecRepr", into = "String")]
pub enum CushionSpec {
    /// Best of the standard sizes.
    #[default]
    Auto,
    /// One size for every run.
    Fixed(u32),
    /// Valise search over `[min, max]`; `same` forces one shared size.
    Ranged { min: u32, max: u32, same: bool },
}

impl CushionSpec {
    pub fn parse(input: &str) -> Result<CushionSpec, SpecError> {
        let invalid = |span: SourceSpan| SpecError::InvalidCushionSpec {
            src: source("cushions", input),
            span,
        };

        let mut pairs = SpecParser::parse(Rule::cushion_spec, input)
            .map_err(|e| invalid(error_span(input, &e)))?;
        let policy = pairs
            .next()
            .and_then(|spec| spec.into_inner().next())
            .ok_or_else(|| invalid((0, input.len()).into()))?;

        let spec = match policy.as_rule() {
            Rule::auto => CushionSpec::Auto,
            Rule::fixed => {
                let size = parse_size(&policy).filter(|&s| s > 0);
                match size {
                    Some(size) => CushionSpec::Fixed(size),
                    None => return Err(invalid(pair_span(&policy))),
                }
            }
            Rule::ranged => parse_ranged(input, policy)?,
            _ => return Err(invalid(pair_span(&policy))),
        };
        debug!(input, spec = %spec, "parsed cushion spec");
        Ok(spec)
    }

    pub fn is_ranged(&self) -> bool {
        matches!(self, CushionSpec::Ranged { .. })
    }
}

fn parse_size(pair: &Pair<'_, Rule>) -> Option<u32> {
    pair.as_str().trim().parse().ok()
}

fn parse_ranged(input: &str, pair: Pair<'_, Rule>) -> Result<CushionSpec, SpecError> {
    let whole = pair_span(&pair);
    let mut min_max = None;
    let mut same = false;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::named_range => {
                let name = inner.as_str().to_ascii_lowercase();
                let (range, shared) = match name.as_str() {
                    "p" => (SMALL_RANGE, false),
                    "g" => (LARGE_RANGE, false),
                    "s" => (VALISE_RANGE, true),
                    _ => (VALISE_RANGE, false),
                };
                min_max = Some(range);
                same |= shared;
            }
            Rule::custom_range => {
                let span = pair_span(&inner);
                let sizes: Vec<Option<u32>> = inner.into_inner().map(|s| parse_size(&s)).collect();
                let (Some(Some(min)), Some(Some(max))) = (sizes.first(), sizes.get(1)) else {
                    return Err(SpecError::InvalidCushionSpec {
                        src: source("cushions", input),
                        span,
                    });
                };
                min_max = Some((*min, *max));
            }
            Rule::same_suffix => same = true,
            _ => {}
        }
    }

    let Some((min, max)) = min_max else {
        return Err(SpecError::InvalidCushionSpec {
            src: source("cushions", input),
            span: whole,
        });
    };
    if min == 0 || min > max {
        return Err(SpecError::InvalidRange {
            min,
            max,
            src: source("cushions", input),
            span: whole,
        });
    }
    if max - min > MAX_RANGE_WIDTH {
        return Err(SpecError::RangeTooWide {
            min,
            max,
            limit: MAX_RANGE_WIDTH,
            src: source("cushions", input),
            span: whole,
        });
    }
    Ok(CushionSpec::Ranged { min, max, same })
}

impl fmt::Display for CushionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CushionSpec::Auto => f.write_str("auto"),
            CushionSpec::Fixed(size) => write!(f, "{size}"),
            CushionSpec::Ranged { min, max, same } => {
                let name = match (min, max) {
                    r if r == VALISE_RANGE => return f.write_str(if same { "s" } else { "valise" }),
                    r if r == SMALL_RANGE => "p".to_string(),
                    r if r == LARGE_RANGE => "g".to_string(),
                    _ => format!("{min}-{max}"),
                };
                f.write_str(&name)?;
                if same {
                    f.write_str(":s")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for CushionSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CushionSpec::parse(s)
    }
}

/// Request form of a cushion policy: a spec string or a bare size.
#[derive(Deserialize)]
#[serde(untagged)]
enum CushionSpecRepr {
    Size(u32),
    Text(String),
}

impl TryFrom<CushionSpecRepr> for CushionSpec {
    type Error = SpecError;

    fn try_from(value: CushionSpecRepr) -> Result<Self, Self::Error> {
        match value {
            CushionSpecRepr::Size(size) => CushionSpec::parse(&size.to_string()),
            CushionSpecRepr::Text(text) => CushionSpec::parse(&text),
        }
    }
}

impl From<CushionSpec> for String {
    fn from(spec: CushionSpec) -> String {
        spec.to_string()
    }
}

// ============================================================================
// Bolster sides
// ============================================================================

/// Sides that should carry a bolster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BolsterSet {
    sides: Sides<bool>,
}

impl BolsterSet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_sides(sides: &[Side]) -> Self {
        let mut set = Self::default();
        for &side in sides {
            set.sides[side] = true;
        }
        set
    }

    pub fn parse(input: &str) -> Result<BolsterSet, SpecError> {
        let spec = SpecParser::parse(Rule::bolster_spec, input)
            .map_err(|e| SpecError::InvalidBolster {
                src: source("bolsters", input),
                span: error_span(input, &e),
            })?
            .next();

        let mut set = BolsterSet::none();
        let Some(spec) = spec else {
            return Ok(set);
        };
        for item in spec.into_inner() {
            if item.as_rule() != Rule::bolster_list {
                continue;
            }
            for token in item.into_inner() {
                let side = Side::from_code(token.as_str()).ok_or_else(|| SpecError::InvalidBolster {
                    src: source("bolsters", input),
                    span: pair_span(&token),
                })?;
                set.sides[side] = true;
            }
        }
        Ok(set)
    }

    pub fn contains(&self, side: Side) -> bool {
        self.sides[side]
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Sides in the set, left to right.
    pub fn iter(&self) -> impl Iterator<Item = Side> + '_ {
        Side::ALL.into_iter().filter(|&s| self.sides[s])
    }

    /// Keep only the sides a family accepts; the others are dropped with a warning.
    pub fn restricted_to(&self, allowed: &[Side]) -> BolsterSet {
        let mut kept = BolsterSet::none();
        for side in self.iter() {
            if allowed.contains(&side) {
                kept.sides[side] = true;
            } else {
                warn!(side = %side, "bolster side not available for this shape, dropped");
            }
        }
        kept
    }
}

impl fmt::Display for BolsterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let codes: Vec<String> = self.iter().map(|s| s.code().to_string()).collect();
        f.write_str(&codes.join(","))
    }
}

impl FromStr for BolsterSet {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BolsterSet::parse(s)
    }
}

impl TryFrom<String> for BolsterSet {
    type Error = SpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BolsterSet::parse(&value)
    }
}

impl From<BolsterSet> for String {
    fn from(set: BolsterSet) -> String {
        set.to_string()
    }
}

// ============================================================================
// Palette overrides
// ============================================================================

/// Raw color overrides, one optional value per component family.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteSpec {
    pub armrests: Option<String>,
    pub backrests: Option<String>,
    pub seat: Option<String>,
    pub cushions: Option<String>,
}

impl PaletteSpec {
    pub fn parse(input: &str) -> Result<PaletteSpec, SpecError> {
        let invalid = |span: SourceSpan| SpecError::InvalidPaletteEntry {
            src: source("colors", input),
            span,
        };

        let spec = SpecParser::parse(Rule::palette_spec, input)
            .map_err(|e| invalid(error_span(input, &e)))?
            .next();

        let mut palette = PaletteSpec::default();
        let Some(spec) = spec else {
            return Ok(palette);
        };
        for entry in spec.into_inner() {
            if entry.as_rule() != Rule::palette_entry {
                continue;
            }
            let entry_span = pair_span(&entry);
            let mut parts = entry.into_inner();
            let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
                return Err(invalid(entry_span));
            };
            let value_text = value.as_str().trim();
            if value_text.is_empty() {
                return Err(invalid(pair_span(&value)));
            }
            let slot = match normalize(key.as_str()).as_str() {
                "accoudoir" | "accoudoirs" => &mut palette.armrests,
                "dossier" | "dossiers" => &mut palette.backrests,
                "assise" | "assises" | "banquette" | "banquettes" => &mut palette.seat,
                "coussin" | "coussins" => &mut palette.cushions,
                // unknown keys are ignored
                _ => continue,
            };
            *slot = Some(value_text.to_string());
        }
        Ok(palette)
    }
}

impl FromStr for PaletteSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaletteSpec::parse(s)
    }
}
