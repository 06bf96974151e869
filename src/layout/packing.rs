//! Cushion packing.
//!
//! Cushions are laid along the inner face of the backrests. Where two runs meet at a
//! right angle they share one cushion-depth square; a shift decides which run gives it
//! up. Every policy is an exhaustive search over sizes and shift assignments, scored by
//! waste and coverage.

use serde::Serialize;

use super::defaults::{BOLSTER_THICKNESS, CUSHION_DEPTH, MAX_SIZE_SPREAD, STANDARD_SIZES};
use super::plan::Topology;
use super::points::{Anchor, PointMap};
use super::split::rect_on;
use crate::errors::LayoutError;
use crate::log::debug;
use crate::parse::{BolsterSet, CushionSpec};
use crate::types::{EPSILON, Polygon, Side, Span};

/// A line of cushions against one backrest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CushionRun {
    pub side: Side,
    pub span: Span,
    /// Cross-axis extent: one cushion depth off the backrest face.
    pub lane: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEnd {
    Start,
    End,
}

/// One end of one cushion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunRef {
    pub run: usize,
    pub end: RunEnd,
}

impl RunRef {
    pub const fn start(run: usize) -> Self {
        Self { run, end: RunEnd::Start }
    }

    pub const fn end(run: usize) -> Self {
        Self { run, end: RunEnd::End }
    }
}

/// A binary shift decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Coupling {
    /// Shared square at a corner: `true` makes `first` yield, `false` makes `second` yield.
    Corner { first: RunRef, second: RunRef },
    /// Free shift: `true` makes this end yield.
    Offset(RunRef),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackingProblem {
    pub runs: Vec<CushionRun>,
    pub couplings: Vec<Coupling>,
}

impl PackingProblem {
    /// Every shift assignment, the first coupling being the most significant bit.
    pub fn masks(&self) -> Vec<Vec<bool>> {
        let k = self.couplings.len();
        (0..1u32 << k)
            .map(|bits| (0..k).map(|i| bits & (1 << (k - 1 - i)) != 0).collect())
            .collect()
    }

    /// Run spans left once the yielding ends give up one cushion depth.
    pub fn usable(&self, shifts: &[bool]) -> Vec<Span> {
        let mut spans: Vec<Span> = self.runs.iter().map(|r| r.span).collect();
        let mut yield_end = |r: RunRef| {
            if let Some(span) = spans.get_mut(r.run) {
                match r.end {
                    RunEnd::Start => span.start += CUSHION_DEPTH,
                    RunEnd::End => span.end -= CUSHION_DEPTH,
                }
            }
        };
        for (coupling, &shift) in self.couplings.iter().zip(shifts) {
            match *coupling {
                Coupling::Corner { first, second } => yield_end(if shift { first } else { second }),
                Coupling::Offset(r) => {
                    if shift {
                        yield_end(r)
                    }
                }
            }
        }
        spans
    }
}

/// Cushion runs and couplings of a point map, bottom run first.
///
/// Each bolster takes [`BOLSTER_THICKNESS`] off the end of its run.
pub fn problem_for(points: &PointMap, bolsters: &BolsterSet) -> Result<PackingProblem, LayoutError> {
    let seat = points.require(Anchor::SeatOrigin)?;
    let (ox, oy) = (seat.x, seat.y);
    let bolster = |side: Side| if bolsters.contains(side) { BOLSTER_THICKNESS } else { 0.0 };
    let row = Span::new(oy, oy + CUSHION_DEPTH);
    let left_column = Span::new(ox, ox + CUSHION_DEPTH);

    let left_run = |points: &PointMap| -> Result<CushionRun, LayoutError> {
        let limit = points.require(Anchor::LeftLimit)?.y;
        Ok(CushionRun {
            side: Side::Left,
            span: Span::new(oy, limit - bolster(Side::Left)),
            lane: left_column,
        })
    };

    let problem = match points.topology() {
        Topology::Straight => {
            let start = points.require(Anchor::BottomLimitStart)?.x + bolster(Side::Left);
            let end = points.require(Anchor::BottomLimitEnd)?.x - bolster(Side::Right);
            PackingProblem {
                runs: vec![CushionRun {
                    side: Side::Bottom,
                    span: Span::new(start, end),
                    lane: row,
                }],
                couplings: vec![Coupling::Offset(RunRef::start(0))],
            }
        }
        Topology::Corner { .. } => {
            let end = points.require(Anchor::BottomLimitEnd)?.x - bolster(Side::Bottom);
            PackingProblem {
                runs: vec![
                    CushionRun {
                        side: Side::Bottom,
                        span: Span::new(ox, end),
                        lane: row,
                    },
                    left_run(points)?,
                ],
                couplings: vec![Coupling::Corner {
                    first: RunRef::start(0),
                    second: RunRef::start(1),
                }],
            }
        }
        Topology::DoubleCorner { .. } => {
            let rx = points.require(Anchor::RightSeatOrigin)?.x;
            let limit_r = points.require(Anchor::RightLimit)?.y;
            PackingProblem {
                runs: vec![
                    CushionRun {
                        side: Side::Bottom,
                        span: Span::new(ox, rx),
                        lane: row,
                    },
                    left_run(points)?,
                    CushionRun {
                        side: Side::Right,
                        span: Span::new(oy, limit_r - bolster(Side::Right)),
                        lane: Span::new(rx - CUSHION_DEPTH, rx),
                    },
                ],
                couplings: vec![
                    Coupling::Corner {
                        first: RunRef::start(0),
                        second: RunRef::start(1),
                    },
                    Coupling::Corner {
                        first: RunRef::end(0),
                        second: RunRef::start(2),
                    },
                ],
            }
        }
    };
    Ok(problem)
}

/// `(count, waste)` of cushions of `size` along `length`.
///
/// Degenerate inputs place nothing and waste whatever positive length there is.
pub fn waste_and_count(length: f64, size: u32) -> (usize, f64) {
    if length <= 0.0 || size == 0 {
        return (0, length.max(0.0));
    }
    let size = size as f64;
    let count = (length / size + EPSILON).floor();
    let waste = (length - count * size).max(0.0);
    (count as usize, waste)
}

/// Score of one (sizes, shifts) assignment.
#[derive(Debug, Clone, PartialEq)]
struct Evaluation {
    sizes: Vec<u32>,
    shifts: Vec<bool>,
    counts: Vec<usize>,
    wastes: Vec<f64>,
    waste: f64,
    coverage: f64,
}

impl Evaluation {
    fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    fn max_waste(&self) -> f64 {
        self.wastes.iter().copied().fold(0.0, f64::max)
    }

    /// Less waste, then more coverage.
    fn beats_on_waste(&self, other: &Evaluation) -> Option<bool> {
        if self.waste < other.waste - EPSILON {
            return Some(true);
        }
        if self.waste > other.waste + EPSILON {
            return Some(false);
        }
        if self.coverage > other.coverage + EPSILON {
            return Some(true);
        }
        if self.coverage < other.coverage - EPSILON {
            return Some(false);
        }
        None
    }
}

fn evaluate(problem: &PackingProblem, sizes: &[u32], shifts: &[bool]) -> Evaluation {
    let usable = problem.usable(shifts);
    let mut counts = Vec::with_capacity(sizes.len());
    let mut wastes = Vec::with_capacity(sizes.len());
    let mut coverage = 0.0;
    for (span, &size) in usable.iter().zip(sizes) {
        let (count, waste) = waste_and_count(span.len(), size);
        coverage += count as f64 * size as f64;
        counts.push(count);
        wastes.push(waste);
    }
    Evaluation {
        sizes: sizes.to_vec(),
        shifts: shifts.to_vec(),
        counts,
        waste: wastes.iter().sum(),
        wastes,
        coverage,
    }
}

/// Best shift assignment for fixed sizes; ties keep the first assignment.
fn best_shifts(problem: &PackingProblem, sizes: &[u32]) -> Evaluation {
    let mut best: Option<Evaluation> = None;
    for mask in problem.masks() {
        let candidate = evaluate(problem, sizes, &mask);
        let better = match &best {
            None => true,
            Some(b) => candidate.beats_on_waste(b) == Some(true),
        };
        if better {
            best = Some(candidate);
        }
    }
    best.unwrap_or_else(|| evaluate(problem, sizes, &[]))
}

/// Standard size whose worst run wastes least over the best shifts; ties go to the larger size.
fn auto_size(problem: &PackingProblem) -> u32 {
    let mut best: Option<(u32, f64)> = None;
    for size in STANDARD_SIZES {
        let sizes = vec![size; problem.runs.len()];
        let score = problem
            .masks()
            .iter()
            .map(|mask| evaluate(problem, &sizes, mask).max_waste())
            .fold(f64::INFINITY, f64::min);
        let better = match best {
            None => true,
            Some((best_size, best_score)) => {
                score < best_score - EPSILON
                    || ((score - best_score).abs() <= EPSILON && size > best_size)
            }
        };
        if better {
            best = Some((size, score));
        }
    }
    best.map_or(STANDARD_SIZES[0], |(size, _)| size)
}

/// Visit every per-run size assignment in `[min, max]` whose spread stays within tolerance.
fn for_each_combination(
    runs: usize,
    min: u32,
    max: u32,
    current: &mut Vec<u32>,
    visit: &mut dyn FnMut(&[u32]),
) {
    if current.len() == runs {
        visit(current);
        return;
    }
    for size in min..=max {
        let lo = current.iter().copied().min().unwrap_or(size).min(size);
        let hi = current.iter().copied().max().unwrap_or(size).max(size);
        if hi - lo > MAX_SIZE_SPREAD {
            continue;
        }
        current.push(size);
        for_each_combination(runs, min, max, current, visit);
        current.pop();
    }
}

fn valise(problem: &PackingProblem, min: u32, max: u32, same: bool) -> Result<Evaluation, LayoutError> {
    let runs = problem.runs.len();
    let masks = problem.masks();
    let mut best: Option<Evaluation> = None;

    let mut consider = |sizes: &[u32]| {
        for mask in &masks {
            let candidate = evaluate(problem, sizes, mask);
            if candidate.total() == 0 {
                continue;
            }
            let better = match &best {
                None => true,
                Some(b) => match candidate.beats_on_waste(b) {
                    Some(wins) => wins,
                    None => candidate.sizes > b.sizes,
                },
            };
            if better {
                best = Some(candidate);
            }
        }
    };

    if min <= max {
        if same {
            for size in min..=max {
                consider(&vec![size; runs]);
            }
        } else {
            for_each_combination(runs, min, max, &mut Vec::with_capacity(runs), &mut consider);
        }
    }
    best.ok_or(LayoutError::NoValidPacking { min, max })
}

/// One placed cushion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cushion {
    pub side: Side,
    pub size: u32,
    pub polygon: Polygon,
}

/// Chosen sizes and shifts with the resulting cushions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Packing {
    pub policy: CushionSpec,
    pub runs: Vec<CushionRun>,
    pub sizes: Vec<u32>,
    pub shifts: Vec<bool>,
    pub counts: Vec<usize>,
    pub total: usize,
    pub waste: f64,
    pub coverage: f64,
    pub cushions: Vec<Cushion>,
}

impl Packing {
    /// Size shared by every run, as printed for the auto and fixed policies.
    pub fn uniform_size(&self) -> Option<u32> {
        let first = *self.sizes.first()?;
        self.sizes.iter().all(|&s| s == first).then_some(first)
    }
}

/// Solve `problem` under `policy` and place the cushions.
pub fn pack(problem: &PackingProblem, policy: CushionSpec) -> Result<Packing, LayoutError> {
    let runs = problem.runs.len();
    let best = match policy {
        CushionSpec::Auto => best_shifts(problem, &vec![auto_size(problem); runs]),
        CushionSpec::Fixed(size) => best_shifts(problem, &vec![size; runs]),
        CushionSpec::Ranged { min, max, same } => valise(problem, min, max, same)?,
    };

    let usable = problem.usable(&best.shifts);
    let mut cushions = Vec::with_capacity(best.total());
    for ((run, span), (&size, &count)) in problem
        .runs
        .iter()
        .zip(&usable)
        .zip(best.sizes.iter().zip(&best.counts))
    {
        let axis = run.side.axis();
        for i in 0..count {
            let from = span.start + (i as u32 * size) as f64;
            cushions.push(Cushion {
                side: run.side,
                size,
                polygon: rect_on(axis, Span::new(from, from + size as f64), run.lane),
            });
        }
    }

    debug!(
        policy = %policy,
        sizes = ?best.sizes,
        shifts = ?best.shifts,
        waste = best.waste,
        total = cushions.len(),
        "packed cushions"
    );
    Ok(Packing {
        policy,
        runs: problem.runs.clone(),
        total: cushions.len(),
        sizes: best.sizes,
        shifts: best.shifts,
        counts: best.counts,
        waste: best.waste,
        coverage: best.coverage,
        cushions,
    })
}
