//! Plain-text layout report.
//!
//! Labels are in French, as printed for the workshop.

use std::collections::BTreeMap;
use std::fmt;

use crate::layout::defaults::{BOLSTER_LABEL, CORNER_EXTRA};
use crate::layout::{Layout, Shape};
use crate::parse::CushionSpec;
use crate::types::{Side, fmt_cm};

/// Rank of a side in size breakdowns.
fn side_rank(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Bottom => 1,
        Side::Right => 2,
    }
}

/// Aggregate per-run cushion sizes into `"4x86 / 3x83 - total 10"`.
///
/// Sizes are listed by the first side using them (left, bottom, right), larger sizes
/// first within a side.
pub fn format_size_breakdown(sides: &[Side], sizes: &[u32], counts: &[usize], total: usize) -> String {
    // size -> (rank of first side, count)
    let mut by_size: BTreeMap<u32, (usize, usize)> = BTreeMap::new();
    for ((&side, &size), &count) in sides.iter().zip(sizes).zip(counts) {
        if count == 0 {
            continue;
        }
        let entry = by_size.entry(size).or_insert((side_rank(side), 0));
        entry.0 = entry.0.min(side_rank(side));
        entry.1 += count;
    }

    let mut parts: Vec<(usize, u32, usize)> = by_size
        .into_iter()
        .map(|(size, (rank, count))| (rank, size, count))
        .collect();
    parts.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    if parts.is_empty() {
        return format!("- total {total}");
    }
    let listed: Vec<String> = parts
        .iter()
        .map(|(_, size, count)| format!("{count}x{size}"))
        .collect();
    format!("{} - total {total}", listed.join(" / "))
}

/// Text report of a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn from_layout(layout: &Layout) -> Self {
        let dims = &layout.dimensions;
        let mut lines = Vec::with_capacity(8);

        lines.push(format!(
            "=== Rapport canapé {} [{}] ===",
            layout.shape.french(),
            layout.variant
        ));

        let extent = match layout.shape {
            Shape::Straight => fmt_cm(dims.width),
            Shape::LPlain | Shape::LMitred => {
                format!("{}×{}", fmt_cm(dims.width), fmt_cm(dims.left_height))
            }
            Shape::UPlain | Shape::UOneMitre | Shape::UTwoMitres => format!(
                "{}×{}×{}",
                fmt_cm(dims.width),
                fmt_cm(dims.left_height),
                fmt_cm(dims.right_height)
            ),
        };
        lines.push(format!(
            "Dimensions : {extent} cm, profondeur {} cm",
            fmt_cm(dims.depth)
        ));

        let seats: Vec<String> = layout
            .seats
            .iter()
            .map(|s| {
                let (long, short) = s.polygon.dims();
                format!("{long}x{short}")
            })
            .collect();
        lines.push(format!(
            "Banquettes : {} → {}",
            layout.seat_count(),
            seats.join(", ")
        ));

        lines.push(format!(
            "Dossiers : {} (+{} via scission) | Accoudoirs : {}",
            fmt_cm(layout.weighted_backrest_count()),
            layout.backrest_splits(),
            layout.armrest_count()
        ));

        let corners = layout.corner_count();
        if corners == 0 {
            lines.push("Angles : 0".to_string());
        } else {
            let side = fmt_cm(dims.depth + CORNER_EXTRA);
            lines.push(format!("Angles : {corners} × {side}x{side} cm"));
        }

        lines.push(format!(
            "Traversins : {} × {BOLSTER_LABEL}",
            layout.bolster_count()
        ));

        let packing = &layout.packing;
        let size = packing.uniform_size().unwrap_or_default();
        let policy = match packing.policy {
            CushionSpec::Auto => format!("auto → {} × {size} cm", packing.total),
            CushionSpec::Fixed(fixed) => format!("{fixed} → {} × {fixed} cm", packing.total),
            CushionSpec::Ranged { .. } => {
                let sides: Vec<Side> = packing.runs.iter().map(|r| r.side).collect();
                format_size_breakdown(&sides, &packing.sizes, &packing.counts, packing.total)
            }
        };
        lines.push(format!("Coussins : {policy}"));

        if let Some(chaise) = &layout.chaise {
            lines.push(format!(
                "Méridienne : côté {} - {} cm",
                chaise.side.french(),
                fmt_cm(chaise.length)
            ));
        }

        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Dimensions, SofaRequest, Structure, layout};
    use crate::parse::BolsterSet;
    use insta::assert_snapshot;

    // ========================================================================
    // Size breakdown tests
    // ========================================================================

    #[test]
    fn breakdown_orders_by_side_then_size() {
        let text = format_size_breakdown(
            &[Side::Bottom, Side::Left, Side::Right],
            &[83, 86, 81],
            &[3, 4, 3],
            10,
        );
        assert_snapshot!(text, @"4x86 / 3x83 / 3x81 - total 10");
    }

    #[test]
    fn breakdown_merges_equal_sizes() {
        let text = format_size_breakdown(&[Side::Bottom, Side::Left], &[80, 80], &[3, 2], 5);
        assert_snapshot!(text, @"5x80 - total 5");
    }

    #[test]
    fn breakdown_without_cushions() {
        assert_eq!(format_size_breakdown(&[Side::Bottom], &[80], &[0], 0), "- total 0");
    }

    // ========================================================================
    // Report tests
    // ========================================================================

    #[test]
    fn straight_report() {
        let request = SofaRequest::new(Shape::Straight, Dimensions::straight(280.0));
        let report = Report::from_layout(&layout(&request).unwrap());
        assert_snapshot!(report.to_string(), @r"
        === Rapport canapé droit [v1] ===
        Dimensions : 280 cm, profondeur 70 cm
        Banquettes : 1 → 250x70
        Dossiers : 1 (+0 via scission) | Accoudoirs : 2
        Angles : 0
        Traversins : 0 × 70x30
        Coussins : auto → 3 × 80 cm
        ");
    }

    #[test]
    fn straight_report_with_chaise_and_bolster() {
        let request = SofaRequest::new(Shape::Straight, Dimensions::straight(250.0))
            .with_structure(Structure::default().without_armrest(Side::Right))
            .with_chaise(Side::Right, 90.0)
            .with_bolsters(BolsterSet::from_sides(&[Side::Left]))
            .with_cushions(CushionSpec::Fixed(50));
        let report = Report::from_layout(&layout(&request).unwrap());
        // seat [15, 250], backrest [15, 145], cushions on [45, 145]
        assert_snapshot!(report.to_string(), @r"
        === Rapport canapé droit [v1] ===
        Dimensions : 250 cm, profondeur 70 cm
        Banquettes : 1 → 235x70
        Dossiers : 1 (+0 via scission) | Accoudoirs : 1
        Angles : 0
        Traversins : 1 × 70x30
        Coussins : 50 → 2 × 50 cm
        Méridienne : côté droit - 90 cm
        ");
    }

    #[test]
    fn l_mitred_report_counts_corner_and_halves() {
        let request = SofaRequest::new(Shape::LMitred, Dimensions::l_shape(300.0, 250.0));
        let report = Report::from_layout(&layout(&request).unwrap());
        let lines = report.lines();
        assert_eq!(lines[0], "=== Rapport canapé L avec angle [v1] ===");
        assert_eq!(lines[1], "Dimensions : 300×250 cm, profondeur 70 cm");
        assert_eq!(lines[2], "Banquettes : 2 → 185x70, 135x70");
        // returns 90 + 100 count as halves, strips 185 + 135
        assert_eq!(lines[3], "Dossiers : 3 (+0 via scission) | Accoudoirs : 2");
        assert_eq!(lines[4], "Angles : 1 × 90x90 cm");
    }
}
