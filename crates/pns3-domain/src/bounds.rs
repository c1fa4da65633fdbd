//! PNS3 bound computation
//!
//! Closed-form Tian–Pearl bounds on the probabilities of necessity and
//! sufficiency (PNS), necessity (PN) and sufficiency (PS):
//! 1. Without experimental data only the observational correlation
//!    constrains PNS.
//! 2. With experimental data one of four regimes applies, selected by the
//!    exogeneity and monotonicity flags.
//! 3. Strong exogeneity then pins PN and PS to `PNS_lower / O_{1|1}` and
//!    `PNS_lower / O_{0|0}`.
//!
//! Every division by a joint or conditional probability is guarded: a zero
//! denominator yields the unconstrained interval `[0, 1]` (or the point 1
//! in the monotone regimes) instead of NaN.

use crate::assumptions::Regime;
use crate::interval::{Interval, Pns3Bounds};
use crate::model::{JointProbs, ProbabilityModel};
use crate::probability::TransitionMatrix;
use tracing::debug;

/// Compute bounds on (PNS, PN, PS) for a model under its assumptions
///
/// The intervals come out ordered only when the model's E_{y|x} lies within
/// [`compute_exp_probs_bounds`](crate::compute_exp_probs_bounds). An E
/// outside those bounds is not rejected here: the result may then have
/// `lower > upper`, and PN/PS may exceed 1 on the lower side. Callers that
/// accept E from users should check [`ExpProbsBounds::contains`] first.
///
/// [`ExpProbsBounds::contains`]: crate::ExpProbsBounds::contains
pub fn compute_pns3_bounds(model: &ProbabilityModel) -> Pns3Bounds {
    // Step 1: observational data only
    let Some(e) = model.experimental() else {
        debug!("no experimental data, using worst-case PNS3 bounds");
        return Pns3Bounds {
            pns: Interval::new(0.0, model.o_joint_diag_sum()),
            pn: Interval::unit(),
            ps: Interval::unit(),
        };
    };

    // Step 2: regime bounds
    let inputs = BoundInputs::gather(model, e);
    let regime = model.assumptions().regime();
    debug!(%regime, "computing PNS3 bounds");

    let mut bounds = match regime {
        Regime::Unconstrained => unconstrained_bounds(&inputs),
        Regime::Exogenous => exogenous_bounds(&inputs),
        Regime::Monotone => monotone_bounds(&inputs),
        Regime::ExogenousMonotone => exogenous_monotone_bounds(&inputs),
    };

    // Step 3: strong-exogeneity adjustment
    if model.assumptions().strong_exogeneity() {
        apply_strong_exogeneity(&mut bounds, &inputs);
    }

    bounds
}

/// Scalars every regime draws from, gathered once per computation
struct BoundInputs {
    joint: JointProbs,
    py0: f64,
    py1: f64,
    o0b0: f64,
    o0b1: f64,
    o1b0: f64,
    o1b1: f64,
    e0b0: f64,
    e1b1: f64,
    e_diag: f64,
    o_diag: f64,
    o_joint_diag: f64,
}

impl BoundInputs {
    fn gather(model: &ProbabilityModel, e: &TransitionMatrix) -> Self {
        let o = model.observational();
        let (py0, py1) = model.py();
        Self {
            joint: *model.joint(),
            py0,
            py1,
            o0b0: o.get(0, 0),
            o0b1: o.get(0, 1),
            o1b0: o.get(1, 0),
            o1b1: o.get(1, 1),
            e0b0: e.get(0, 0),
            e1b1: e.get(1, 1),
            e_diag: e.get(0, 0) + e.get(1, 1),
            o_diag: model.o_diag_sum(),
            o_joint_diag: model.o_joint_diag_sum(),
        }
    }
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

/// `[max(0, lo/denom), min(1, hi/denom)]`, or `[0, 1]` when `denom <= 0`
fn ratio_interval(lo: f64, hi: f64, denom: f64) -> Interval {
    if denom <= 0.0 {
        debug!("zero denominator, falling back to [0, 1]");
        return Interval::unit();
    }
    Interval::new((lo / denom).max(0.0), (hi / denom).min(1.0))
}

/// `point(num/denom)`, or `point(1)` when `denom <= 0`
fn ratio_point(num: f64, denom: f64) -> Interval {
    if denom <= 0.0 {
        debug!("zero denominator, falling back to point 1");
        return Interval::point(1.0);
    }
    Interval::point(num / denom)
}

fn unconstrained_bounds(v: &BoundInputs) -> Pns3Bounds {
    let pns = Interval::new(
        max_of(&[0.0, v.e_diag - 1.0, v.e0b0 - v.py0, v.e1b1 - v.py1]),
        min_of(&[v.e1b1, v.e0b0, v.o_joint_diag, v.e_diag - v.o_joint_diag]),
    );
    let pn = ratio_interval(v.e0b0 - v.py0, v.e0b0 - v.joint.o00, v.joint.o11);
    let ps = ratio_interval(v.e1b1 - v.py1, v.e1b1 - v.joint.o11, v.joint.o00);
    Pns3Bounds { pns, pn, ps }
}

fn exogenous_bounds(v: &BoundInputs) -> Pns3Bounds {
    let pns = Interval::new((v.o_diag - 1.0).max(0.0), v.o1b1.min(v.o0b0));
    let pn = ratio_interval(v.o1b1 - v.o1b0, v.o0b0, v.o1b1);
    let ps = ratio_interval(v.o0b0 - v.o0b1, v.o1b1, v.o0b0);
    Pns3Bounds { pns, pn, ps }
}

fn monotone_bounds(v: &BoundInputs) -> Pns3Bounds {
    Pns3Bounds {
        pns: Interval::point(v.e_diag - 1.0),
        pn: ratio_point(v.e0b0 - v.py0, v.joint.o11),
        ps: ratio_point(v.e1b1 - v.py1, v.joint.o00),
    }
}

fn exogenous_monotone_bounds(v: &BoundInputs) -> Pns3Bounds {
    Pns3Bounds {
        pns: Interval::point(v.o_diag - 1.0),
        pn: ratio_point(v.o0b0 - v.py0, v.joint.o11),
        ps: ratio_point(v.o1b1 - v.py1, v.joint.o00),
    }
}

/// Overrides PN and PS with point values derived from the PNS lower bound
fn apply_strong_exogeneity(bounds: &mut Pns3Bounds, v: &BoundInputs) {
    let pns_lower = bounds.pns.lower;
    if v.o1b1 > 0.0 {
        bounds.pn = Interval::point(pns_lower / v.o1b1);
    }
    if v.o0b0 > 0.0 {
        bounds.ps = Interval::point(pns_lower / v.o0b0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::Assumptions;
    use crate::probability::ProbabilityVector;

    const EPS: f64 = 1e-9;

    fn assert_interval(actual: Interval, lower: f64, upper: f64) {
        assert!(
            (actual.lower - lower).abs() < EPS && (actual.upper - upper).abs() < EPS,
            "expected [{}, {}], got [{}, {}]",
            lower,
            upper,
            actual.lower,
            actual.upper
        );
    }

    fn female(assumptions: Assumptions) -> ProbabilityModel {
        ProbabilityModel::new(
            TransitionMatrix::new([[0.3, 0.73], [0.7, 0.27]]).unwrap(),
            ProbabilityVector::new([0.3, 0.7]).unwrap(),
        )
        .with_experimental(TransitionMatrix::new([[0.79, 0.52], [0.21, 0.48]]).unwrap())
        .with_assumptions(assumptions)
    }

    #[test]
    fn test_observational_only_uniform() {
        let model =
            ProbabilityModel::new(TransitionMatrix::uniform(), ProbabilityVector::uniform());
        let b = compute_pns3_bounds(&model);
        assert_interval(b.pns, 0.0, 0.5);
        assert_interval(b.pn, 0.0, 1.0);
        assert_interval(b.ps, 0.0, 1.0);
    }

    #[test]
    fn test_observational_only_ignores_assumptions() {
        let model =
            ProbabilityModel::new(TransitionMatrix::uniform(), ProbabilityVector::uniform())
                .with_assumptions(Assumptions::monotone());
        let b = compute_pns3_bounds(&model);
        assert_interval(b.pns, 0.0, 0.5);
        assert_interval(b.pn, 0.0, 1.0);
    }

    #[test]
    fn test_female_unconstrained() {
        let b = compute_pns3_bounds(&female(Assumptions::none()));
        // PNS: max(0, 0.27, 0.189, 0.081), min(0.48, 0.79, 0.279, 0.991)
        assert_interval(b.pns, 0.27, 0.279);
        // PN: (0.79 - 0.601) / 0.189 = 1, clamped upper bound 1
        assert_interval(b.pn, 1.0, 1.0);
        // PS: (0.48 - 0.399) / 0.09 = 0.9
        assert_interval(b.ps, 0.9, 1.0);
    }

    #[test]
    fn test_female_monotone_points() {
        let model = female(Assumptions::monotone());
        let b = compute_pns3_bounds(&model);
        let (py0, py1) = model.py();
        let j = model.joint();

        assert!(b.pns.is_point() && b.pn.is_point() && b.ps.is_point());
        let e_diag = model.e_diag_sum().unwrap();
        assert_interval(b.pns, e_diag - 1.0, e_diag - 1.0);
        assert_interval(b.pn, (0.79 - py0) / j.o11, (0.79 - py0) / j.o11);
        assert_interval(b.ps, (0.48 - py1) / j.o00, (0.48 - py1) / j.o00);
        assert_interval(b.pns, 0.27, 0.27);
        assert_interval(b.ps, 0.9, 0.9);
    }

    #[test]
    fn test_female_exogenous() {
        let b = compute_pns3_bounds(&female(Assumptions::exogenous()));
        // O_{0|0} + O_{1|1} - 1 < 0
        assert_interval(b.pns, 0.0, 0.27);
        // (0.27 - 0.7) / 0.27 < 0, 0.3 / 0.27 > 1
        assert_interval(b.pn, 0.0, 1.0);
        // (0.3 - 0.73) / 0.3 < 0, 0.27 / 0.3
        assert_interval(b.ps, 0.0, 0.9);
    }

    #[test]
    fn test_female_exogenous_monotone() {
        let model = female(Assumptions::exogenous().with_monotonicity(true));
        let b = compute_pns3_bounds(&model);
        let (py0, py1) = model.py();
        assert_interval(b.pns, -0.43, -0.43);
        assert_interval(b.pn, (0.3 - py0) / 0.189, (0.3 - py0) / 0.189);
        assert_interval(b.ps, (0.27 - py1) / 0.09, (0.27 - py1) / 0.09);
    }

    #[test]
    fn test_strong_exogeneity_pins_pn_ps() {
        let model = ProbabilityModel::new(
            TransitionMatrix::new([[0.8, 0.4], [0.2, 0.6]]).unwrap(),
            ProbabilityVector::new([0.5, 0.5]).unwrap(),
        )
        .with_experimental(TransitionMatrix::new([[0.8, 0.4], [0.2, 0.6]]).unwrap())
        .with_assumptions(Assumptions::strongly_exogenous());
        let b = compute_pns3_bounds(&model);

        // exogenous regime: PNS in [max(0, 1.4 - 1), min(0.6, 0.8)]
        assert_interval(b.pns, 0.4, 0.6);
        assert_interval(b.pn, 0.4 / 0.6, 0.4 / 0.6);
        assert_interval(b.ps, 0.4 / 0.8, 0.4 / 0.8);
    }

    #[test]
    fn test_strong_exogeneity_skips_zero_denominator() {
        let model = ProbabilityModel::new(
            TransitionMatrix::new([[0.5, 1.0], [0.5, 0.0]]).unwrap(),
            ProbabilityVector::new([0.5, 0.5]).unwrap(),
        )
        .with_experimental(TransitionMatrix::uniform())
        .with_assumptions(Assumptions::strongly_exogenous());
        let b = compute_pns3_bounds(&model);

        // O_{1|1} = 0: PN keeps the regime's guarded [0, 1]
        assert_interval(b.pn, 0.0, 1.0);
        // O_{0|0} = 0.5 > 0: PS pinned to PNS_lower / 0.5
        assert!(b.ps.is_point());
        assert_interval(b.ps, b.pns.lower / 0.5, b.pns.lower / 0.5);
    }

    #[test]
    fn test_pn_guard_when_o11_is_zero() {
        // P(x=1) = 0 makes o11 = 0 even though O_{1|1} > 0
        let model = ProbabilityModel::new(
            TransitionMatrix::new([[0.4, 0.3], [0.6, 0.7]]).unwrap(),
            ProbabilityVector::new([1.0, 0.0]).unwrap(),
        )
        .with_experimental(TransitionMatrix::new([[0.5, 0.2], [0.5, 0.8]]).unwrap());
        let b = compute_pns3_bounds(&model);
        assert_interval(b.pn, 0.0, 1.0);
        assert!(b.pn.lower.is_finite() && b.pn.upper.is_finite());

        // O_{1|1} = 0 as well
        let model = ProbabilityModel::new(
            TransitionMatrix::new([[0.1, 1.0], [0.9, 0.0]]).unwrap(),
            ProbabilityVector::new([0.4, 0.6]).unwrap(),
        )
        .with_experimental(TransitionMatrix::new([[0.05, 0.6], [0.95, 0.4]]).unwrap());
        assert_interval(compute_pns3_bounds(&model).pn, 0.0, 1.0);
    }

    #[test]
    fn test_ps_guard_when_o00_is_zero() {
        let model = ProbabilityModel::new(
            TransitionMatrix::new([[0.0, 0.3], [1.0, 0.7]]).unwrap(),
            ProbabilityVector::new([0.5, 0.5]).unwrap(),
        )
        .with_experimental(TransitionMatrix::uniform());
        assert_interval(compute_pns3_bounds(&model).ps, 0.0, 1.0);

        let monotone = model.with_assumptions(Assumptions::monotone());
        assert_interval(compute_pns3_bounds(&monotone).ps, 1.0, 1.0);
    }

    #[test]
    fn test_inadmissible_experimental_gives_inverted_bounds() {
        // uniform O admits E_{1|x} only within [0.25, 0.75]
        let e = TransitionMatrix::new([[1.0, 0.0], [0.0, 1.0]]).unwrap();
        let model =
            ProbabilityModel::new(TransitionMatrix::uniform(), ProbabilityVector::uniform())
                .with_experimental(e);
        assert!(!crate::exp_bounds::compute_exp_probs_bounds(&model).contains(&e));

        let b = compute_pns3_bounds(&model);
        // PNS: max(0, 1, 0.5, 0.5), min(1, 1, 0.5, 1.5)
        assert_interval(b.pns, 1.0, 0.5);
        // PN: (1 - 0.5) / 0.25 is not clamped from above
        assert_interval(b.pn, 2.0, 1.0);
        assert_interval(b.ps, 2.0, 1.0);
        assert!(b.pns.is_empty() && b.pn.is_empty() && b.ps.is_empty());
    }
}
