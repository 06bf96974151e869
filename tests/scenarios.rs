//! End-to-end layouts of the reference sofas.
//!
//! Run with: RUST_LOG=canape=debug cargo test --features tracing --test scenarios -- --nocapture

use canape::layout::defaults::{MAX_SEAT_LENGTH, MAX_SIZE_SPREAD, STANDARD_SIZES};
use canape::layout::packing::waste_and_count;
use canape::layout::split::split_coordinate;
use canape::{
    BackrestKind, CushionSpec, Dimensions, LayoutError, Shape, Side, SofaRequest, Variant, layout,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn scenario_a_straight_auto() {
    init_tracing();
    let request = SofaRequest::new(Shape::Straight, Dimensions::straight(280.0));
    let result = layout(&request).unwrap();

    assert_eq!(result.variant, Variant::V1);
    assert_eq!(result.seat_count(), 1);
    assert_eq!(result.armrest_count(), 2);

    let packing = &result.packing;
    let size = packing.uniform_size().unwrap();
    assert!(STANDARD_SIZES.contains(&size));
    let run = packing.runs[0].span;
    let usable = if packing.shifts[0] { run.len() - 15.0 } else { run.len() };
    let (count, waste) = waste_and_count(usable, size);
    assert_eq!(packing.total, count);
    assert_eq!(count, (usable / size as f64).floor() as usize);
    assert!(waste < size as f64);
    assert_eq!((size, count), (80, 3));
}

#[test]
fn scenario_b_l_plain_valise() {
    init_tracing();
    let request = SofaRequest::new(Shape::LPlain, Dimensions::l_shape(540.0, 360.0))
        .with_cushions(CushionSpec::parse("valise").unwrap());
    let result = layout(&request).unwrap();

    assert_eq!(result.variant, Variant::V1);
    assert!(result.runs.iter().all(|r| r.cut.is_some()), "both runs split");
    assert_eq!(result.seat_count(), 4);
    for seat in &result.seats {
        assert!(seat.polygon.extent() <= MAX_SEAT_LENGTH);
    }

    let sizes = &result.packing.sizes;
    let lo = sizes.iter().min().unwrap();
    let hi = sizes.iter().max().unwrap();
    assert!(hi - lo <= MAX_SIZE_SPREAD);
    assert!(result.cushion_count() > 0);
}

#[test]
fn scenario_c_chaise_against_armrest() {
    init_tracing();
    let request = SofaRequest::new(Shape::Straight, Dimensions::straight(280.0))
        .with_chaise(Side::Left, 90.0);
    let err = layout(&request).unwrap_err();
    assert_eq!(err, LayoutError::ChaiseWithArmrest { side: Side::Left });
}

#[test]
fn scenario_c_chaise_fixed_variant() {
    // the check also runs when no selection happens
    let request = SofaRequest::new(Shape::LPlain, Dimensions::l_shape(300.0, 250.0))
        .with_variant(Variant::V2)
        .with_chaise(Side::Left, 90.0);
    let err = layout(&request).unwrap_err();
    assert_eq!(err, LayoutError::ChaiseWithArmrest { side: Side::Left });
}

#[test]
fn scenario_d_u_without_feasible_variant() {
    init_tracing();
    let request = SofaRequest::new(Shape::UPlain, Dimensions::u_shape(400.0, 600.0, 300.0));
    let err = layout(&request).unwrap_err();
    assert_eq!(
        err,
        LayoutError::NoFeasibleVariant {
            shape: Shape::UPlain,
            limit: 250
        }
    );
    assert!(err.to_string().contains("250"));
}

#[test]
fn backrest_cuts_follow_seat_cuts() {
    init_tracing();
    let request = SofaRequest::new(Shape::LPlain, Dimensions::l_shape(540.0, 360.0));
    let result = layout(&request).unwrap();

    for run in &result.runs {
        let cut = split_coordinate(run.span.start, run.span.end, MAX_SEAT_LENGTH);
        assert_eq!(cut, run.cut, "{} run", run.side);

        let strip_cuts: Vec<f64> = result
            .backrests
            .iter()
            .filter(|b| b.side == run.side && b.kind == BackrestKind::Strip)
            .filter_map(|b| b.cut)
            .collect();
        assert!(!strip_cuts.is_empty(), "{} strip is split", run.side);
        assert!(strip_cuts.iter().all(|&c| Some(c) == cut));
    }
}

#[test]
fn straight_too_short_names_the_run() {
    init_tracing();
    let err = layout(&SofaRequest::new(Shape::Straight, Dimensions::straight(20.0))).unwrap_err();
    assert_eq!(err, LayoutError::RunTooShort { side: Side::Bottom, length: -10.0 });
}

#[test]
fn straight_split_too_long_names_the_seat() {
    init_tracing();
    // [15, 585] is cut at 300, both halves are 285 cm
    let err = layout(&SofaRequest::new(Shape::Straight, Dimensions::straight(600.0))).unwrap_err();
    assert_eq!(err, LayoutError::LengthExceeded { length: 285, depth: 70, limit: 250 });
    assert!(err.to_string().contains("285"));
}

#[test]
fn l_mitred_collapsed_branch_names_the_run() {
    init_tracing();
    // the left run starts above the corner block at 100 and ends under the armrest at 85
    let request = SofaRequest::new(Shape::LMitred, Dimensions::l_shape(300.0, 100.0));
    let err = layout(&request).unwrap_err();
    assert_eq!(err, LayoutError::RunTooShort { side: Side::Left, length: -15.0 });
}
