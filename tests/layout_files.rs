use canape::layout::defaults::{MAX_SEAT_LENGTH, MAX_SIZE_SPREAD};
use canape::layout::packing::{problem_for, waste_and_count};
use canape::types::EPSILON;
use canape::{CushionSpec, Layout, Palette, Report, ShapeFamily, SofaRequest, layout, render_svg};
use datatest_stable::Utf8Path;
use miette::Diagnostic;
use serde::Deserialize;

/// A request file; `expect_error` holds the diagnostic code of a rejected request.
#[derive(Deserialize)]
struct Fixture {
    #[serde(flatten)]
    request: SofaRequest,
    #[serde(default)]
    expect_error: Option<String>,
}

/// Tolerance for lengths recomputed from polygon bounding boxes
const LENGTH_TOLERANCE: f64 = 1e-6;

fn check_seats(path: &Utf8Path, layout: &Layout) {
    for seat in &layout.seats {
        assert!(
            seat.polygon.extent() <= MAX_SEAT_LENGTH + LENGTH_TOLERANCE,
            "{path}: {} seat is {} cm long",
            seat.side,
            seat.polygon.extent()
        );
    }
    assert_eq!(
        layout.seats.len(),
        layout.runs.iter().map(|r| r.pieces().len()).sum::<usize>(),
        "{path}: seats do not match run pieces"
    );
}

fn check_backrest_cuts(path: &Utf8Path, layout: &Layout) {
    for piece in &layout.backrests {
        let Some(cut) = piece.cut else { continue };
        let run_cut = layout
            .runs
            .iter()
            .find(|r| r.side == piece.side)
            .and_then(|r| r.cut);
        assert_eq!(
            run_cut,
            Some(cut),
            "{path}: {} backrest split at {cut} but its seat run is not",
            piece.side
        );
    }
}

fn check_packing(path: &Utf8Path, request: &SofaRequest, layout: &Layout) {
    let packing = &layout.packing;
    assert_eq!(packing.total, packing.counts.iter().sum::<usize>(), "{path}");
    assert_eq!(packing.total, layout.cushions().len(), "{path}");
    assert!(packing.waste >= 0.0, "{path}: negative waste");

    for (run, (&size, &count)) in packing
        .runs
        .iter()
        .zip(packing.sizes.iter().zip(&packing.counts))
    {
        let placed = count as f64 * size as f64;
        assert!(
            placed <= run.span.len() + EPSILON,
            "{path}: {count} x {size} cushions overflow the {} run ({} cm)",
            run.side,
            run.span.len()
        );
    }

    for cushion in layout.cushions() {
        let run = packing
            .runs
            .iter()
            .find(|r| r.side == cushion.side)
            .unwrap_or_else(|| panic!("{path}: cushion on a side without run"));
        let bb = cushion.polygon.bbox();
        let axis = cushion.side.axis();
        assert!(
            axis.along(bb.min) >= run.span.start - LENGTH_TOLERANCE
                && axis.along(bb.max) <= run.span.end + LENGTH_TOLERANCE,
            "{path}: {} cushion leaves its run",
            cushion.side
        );
    }

    // auto and fixed sizes: each run holds floor(L / s) cushions over its usable length
    if !request.cushions.is_ranged() {
        let bolsters = request.bolsters.restricted_to(request.family().bolster_sides());
        let problem = problem_for(&layout.points, &bolsters).unwrap();
        let usable = problem.usable(&packing.shifts);
        for ((span, &size), &count) in usable.iter().zip(&packing.sizes).zip(&packing.counts) {
            let (expected, waste) = waste_and_count(span.len(), size);
            assert_eq!(count, expected, "{path}: {} cm run holds {expected} x {size}", span.len());
            assert_eq!(count, (span.len() / size as f64 + EPSILON).floor().max(0.0) as usize, "{path}");
            assert!(waste < size as f64, "{path}: {waste} cm wasted with {size} cm cushions");
        }
    }

    if let CushionSpec::Ranged { min, max, same } = request.cushions {
        let used: Vec<u32> = packing
            .sizes
            .iter()
            .zip(&packing.counts)
            .filter(|(_, count)| **count > 0)
            .map(|(size, _)| *size)
            .collect();
        for &size in &packing.sizes {
            assert!((min..=max).contains(&size), "{path}: size {size} outside {min}-{max}");
        }
        if let (Some(lo), Some(hi)) = (used.iter().min(), used.iter().max()) {
            if same {
                assert_eq!(lo, hi, "{path}: sizes differ under :s");
            } else {
                assert!(hi - lo <= MAX_SIZE_SPREAD, "{path}: sizes {lo}..{hi} spread too far");
            }
        }
    }
}

fn test_layout_file(path: &Utf8Path) -> datatest_stable::Result<()> {
    let source = std::fs::read_to_string(path)?;
    let Fixture { request, expect_error } = serde_json::from_str(&source)?;
    let rejected = path
        .file_name()
        .is_some_and(|name| name.starts_with("err_"));
    assert_eq!(
        rejected,
        expect_error.is_some(),
        "{path}: err_ files and only they name an expected error"
    );

    match (layout(&request), expect_error) {
        (Ok(result), Some(code)) => {
            panic!("{path}: expected {code}, got:\n{}", Report::from_layout(&result));
        }
        (Err(e), Some(code)) => {
            let actual = e.code().map(|c| c.to_string());
            assert_eq!(actual.as_deref(), Some(code.as_str()), "{path}: {e}");
        }
        (Err(e), None) => panic!("{path}: layout failed: {e}"),
        (Ok(result), None) => {
            check_seats(path, &result);
            check_backrest_cuts(path, &result);
            check_packing(path, &request, &result);

            if let Some(chosen) = result.candidates.iter().find(|m| m.variant == result.variant) {
                assert!(chosen.feasible, "{path}: selected an infeasible variant");
            }

            // requests round-trip and layouts are deterministic
            let reparsed: SofaRequest = serde_json::from_str(&serde_json::to_string(&request)?)?;
            assert_eq!(reparsed, request, "{path}: request does not round-trip");
            assert_eq!(layout(&request)?, result, "{path}: layout is not deterministic");

            let svg = render_svg(&result, &Palette::default());
            assert!(svg.trim_start().starts_with("<svg"), "{path}: bad svg header");
            assert_eq!(
                svg.matches("<rect ").count(),
                result.cushion_count(),
                "{path}: one rounded rect per cushion"
            );
        }
    }
    Ok(())
}

datatest_stable::harness! {
    { test = test_layout_file, root = "tests/layouts", pattern = r"\.json$" },
}
