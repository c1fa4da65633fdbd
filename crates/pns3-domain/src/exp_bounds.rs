//! Admissible bounds on the experimental matrix E_{y|x}
//!
//! An observational joint distribution restricts which experimental
//! distributions it can be consistent with. Each cell of E_{y|x} gets a
//! `[lower, upper]` interval; the `E_{0|x}` cells follow from the `E_{1|x}`
//! ones by complementation (if `a <= v <= b` then `1-b <= 1-v <= 1-a`).

use crate::interval::Interval;
use crate::model::ProbabilityModel;
use crate::probability::TransitionMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Elementwise bounds on E_{y|x}, both matrices indexed `[y][x]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpProbsBounds {
    /// Lower bound for each cell
    pub lower: [[f64; 2]; 2],
    /// Upper bound for each cell
    pub upper: [[f64; 2]; 2],
}

impl ExpProbsBounds {
    /// Interval for cell `E_{y|x}`
    pub fn cell(&self, y: usize, x: usize) -> Interval {
        Interval::new(self.lower[y][x], self.upper[y][x])
    }

    /// Check that no cell has `upper < lower`
    pub fn is_consistent(&self) -> bool {
        cells().all(|(y, x)| !self.cell(y, x).is_empty())
    }

    /// Check that every cell of `e_y_bar_x` lies within its bounds
    pub fn contains(&self, e_y_bar_x: &TransitionMatrix) -> bool {
        cells().all(|(y, x)| self.cell(y, x).contains(e_y_bar_x.get(y, x)))
    }

    /// Cells of `e_y_bar_x` that fall outside their bounds, as `(y, x)`
    pub fn violations(&self, e_y_bar_x: &TransitionMatrix) -> Vec<(usize, usize)> {
        self.violations_within(e_y_bar_x, 0.0)
    }

    /// Cells of `e_y_bar_x` that miss their bounds by more than `tolerance`
    pub fn violations_within(
        &self,
        e_y_bar_x: &TransitionMatrix,
        tolerance: f64,
    ) -> Vec<(usize, usize)> {
        cells()
            .filter(|&(y, x)| {
                let bounds = self.cell(y, x);
                let value = e_y_bar_x.get(y, x);
                !(value >= bounds.lower - tolerance && value <= bounds.upper + tolerance)
            })
            .collect()
    }
}

fn cells() -> impl Iterator<Item = (usize, usize)> {
    (0..2).flat_map(|y| (0..2).map(move |x| (y, x)))
}

/// Compute the admissible bounds on E_{y|x} implied by a model's
/// observational data
///
/// Does not look at the model's own E_{y|x}; checking an observed
/// experimental matrix against the result is left to the caller.
pub fn compute_exp_probs_bounds(model: &ProbabilityModel) -> ExpProbsBounds {
    let j = model.joint();
    let mut lower = [[0.0; 2]; 2];
    let mut upper = [[0.0; 2]; 2];

    if !model.assumptions().monotonicity() {
        lower[1][1] = j.o11;
        upper[1][1] = 1.0 - j.o10;
        lower[1][0] = j.o01;
        upper[1][0] = 1.0 - j.o00;

        lower[0][1] = j.o10;
        upper[0][1] = 1.0 - j.o11;
        lower[0][0] = j.o00;
        upper[0][0] = 1.0 - j.o01;
    } else {
        let (py0, py1) = model.py();

        lower[1][1] = py1;
        upper[1][1] = 1.0 - j.o10;
        lower[1][0] = j.o01;
        upper[1][0] = py1;

        lower[0][1] = j.o10;
        upper[0][1] = py0;
        lower[0][0] = py0;
        upper[0][0] = 1.0 - j.o01;
    }

    ExpProbsBounds { lower, upper }
}

/// Merge the admissible E_{y|x} bounds of two strata
///
/// E_{y|x} comes from a randomized trial, so it is shared by both strata
/// and must satisfy both sets of bounds: the merged lower bound is the
/// elementwise maximum, the merged upper bound the elementwise minimum.
/// Returns `None` when some cell ends up with `upper < lower`, meaning no
/// shared experimental distribution is consistent with both strata.
pub fn merge_exp_probs_bounds(
    a: &ProbabilityModel,
    b: &ProbabilityModel,
) -> Option<ExpProbsBounds> {
    let bounds_a = compute_exp_probs_bounds(a);
    let bounds_b = compute_exp_probs_bounds(b);

    let mut merged = ExpProbsBounds {
        lower: [[0.0; 2]; 2],
        upper: [[0.0; 2]; 2],
    };
    for (y, x) in cells() {
        merged.lower[y][x] = bounds_a.lower[y][x].max(bounds_b.lower[y][x]);
        merged.upper[y][x] = bounds_a.upper[y][x].min(bounds_b.upper[y][x]);
    }

    if merged.is_consistent() {
        debug!(?merged, "merged admissible E_{{y|x}} bounds");
        Some(merged)
    } else {
        warn!("strata are inconsistent: no shared E_{{y|x}} satisfies both");
        None
    }
}
