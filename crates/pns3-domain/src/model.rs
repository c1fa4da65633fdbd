//! Probability model for one population stratum

use crate::assumptions::Assumptions;
use crate::bounds::compute_pns3_bounds;
use crate::error::Result;
use crate::exp_bounds::{compute_exp_probs_bounds, ExpProbsBounds};
use crate::interval::Pns3Bounds;
use crate::probability::{ProbabilityVector, TransitionMatrix};
use serde::Serialize;

/// Joint observational probabilities `o_{xy} = P(x, y)`
///
/// Note the index order: the first digit is the treatment `x`, the second
/// the outcome `y`, whereas the conditional matrix is indexed `[y][x]`.
/// So `o01 = O_{1|0}·P(x=0)` and `o10 = O_{0|1}·P(x=1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JointProbs {
    /// `P(x=0, y=0) = O_{0|0}·P(x=0)`
    pub o00: f64,
    /// `P(x=0, y=1) = O_{1|0}·P(x=0)`
    pub o01: f64,
    /// `P(x=1, y=0) = O_{0|1}·P(x=1)`
    pub o10: f64,
    /// `P(x=1, y=1) = O_{1|1}·P(x=1)`
    pub o11: f64,
}

impl JointProbs {
    fn derive(o: &TransitionMatrix, px: &ProbabilityVector) -> Self {
        Self {
            o00: o.get(0, 0) * px.p0(),
            o01: o.get(1, 0) * px.p0(),
            o10: o.get(0, 1) * px.p1(),
            o11: o.get(1, 1) * px.p1(),
        }
    }
}

/// Observational (and optionally experimental) probabilities for one stratum
///
/// The observational pair `O_{y|x}`, `P(x)` is always present and valid.
/// The experimental matrix `E_{y|x}` is present only after it has been set.
/// Every setter replaces its inputs as a whole and re-derives the joint
/// probabilities in the same call, so derived values are never stale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityModel {
    o_y_bar_x: TransitionMatrix,
    px: ProbabilityVector,
    joint: JointProbs,
    e_y_bar_x: Option<TransitionMatrix>,
    assumptions: Assumptions,
}

impl ProbabilityModel {
    /// Create an observational-only model with no assumptions
    pub fn new(o_y_bar_x: TransitionMatrix, px: ProbabilityVector) -> Self {
        Self {
            joint: JointProbs::derive(&o_y_bar_x, &px),
            o_y_bar_x,
            px,
            e_y_bar_x: None,
            assumptions: Assumptions::none(),
        }
    }

    /// Create a model from unvalidated input
    ///
    /// Every structure is validated before the model is built.
    pub fn from_raw<R: AsRef<[f64]>>(
        o_y_bar_x: &[R],
        px: &[f64],
        e_y_bar_x: Option<&[R]>,
        assumptions: Assumptions,
    ) -> Result<Self> {
        let o = TransitionMatrix::from_rows(o_y_bar_x)?;
        let px = ProbabilityVector::from_slice(px)?;
        let e = e_y_bar_x.map(TransitionMatrix::from_rows).transpose()?;

        let mut model = Self::new(o, px).with_assumptions(assumptions);
        model.e_y_bar_x = e;
        Ok(model)
    }

    /// Attach experimental data
    pub fn with_experimental(mut self, e_y_bar_x: TransitionMatrix) -> Self {
        self.e_y_bar_x = Some(e_y_bar_x);
        self
    }

    /// Attach assumption flags
    pub fn with_assumptions(mut self, assumptions: Assumptions) -> Self {
        self.assumptions = assumptions;
        self
    }

    /// Replace the observational probabilities
    pub fn set_observational(&mut self, o_y_bar_x: TransitionMatrix, px: ProbabilityVector) {
        self.joint = JointProbs::derive(&o_y_bar_x, &px);
        self.o_y_bar_x = o_y_bar_x;
        self.px = px;
    }

    /// Validate and replace the observational probabilities
    ///
    /// Both inputs are validated before either is committed.
    pub fn try_set_observational<R: AsRef<[f64]>>(
        &mut self,
        o_y_bar_x: &[R],
        px: &[f64],
    ) -> Result<()> {
        let o = TransitionMatrix::from_rows(o_y_bar_x)?;
        let px = ProbabilityVector::from_slice(px)?;
        self.set_observational(o, px);
        Ok(())
    }

    /// Replace the experimental probabilities
    pub fn set_experimental(&mut self, e_y_bar_x: TransitionMatrix) {
        self.e_y_bar_x = Some(e_y_bar_x);
    }

    /// Validate and replace the experimental probabilities
    pub fn try_set_experimental<R: AsRef<[f64]>>(&mut self, e_y_bar_x: &[R]) -> Result<()> {
        self.set_experimental(TransitionMatrix::from_rows(e_y_bar_x)?);
        Ok(())
    }

    /// Drop the experimental probabilities (observational-only analysis)
    pub fn clear_experimental(&mut self) {
        self.e_y_bar_x = None;
    }

    /// Replace the assumption flags
    pub fn set_assumptions(&mut self, assumptions: Assumptions) {
        self.assumptions = assumptions;
    }

    /// `O_{y|x}`
    pub fn observational(&self) -> &TransitionMatrix {
        &self.o_y_bar_x
    }

    /// `P(x)`
    pub fn px(&self) -> &ProbabilityVector {
        &self.px
    }

    /// `E_{y|x}`, if set
    pub fn experimental(&self) -> Option<&TransitionMatrix> {
        self.e_y_bar_x.as_ref()
    }

    /// Joint observational probabilities
    pub fn joint(&self) -> &JointProbs {
        &self.joint
    }

    /// Assumption flags
    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// `(P(y=0), P(y=1))`
    pub fn py(&self) -> (f64, f64) {
        let j = &self.joint;
        (j.o00 + j.o10, j.o01 + j.o11)
    }

    /// `E_{0|0} + E_{1|1}`, or `None` without experimental data
    pub fn e_diag_sum(&self) -> Option<f64> {
        self.e_y_bar_x.map(|e| e.get(0, 0) + e.get(1, 1))
    }

    /// `O_{0|0} + O_{1|1}`
    pub fn o_diag_sum(&self) -> f64 {
        self.o_y_bar_x.get(0, 0) + self.o_y_bar_x.get(1, 1)
    }

    /// `o00 + o11`
    pub fn o_joint_diag_sum(&self) -> f64 {
        self.joint.o00 + self.joint.o11
    }

    /// Bounds on (PNS, PN, PS); see [`compute_pns3_bounds`]
    pub fn pns3_bounds(&self) -> Pns3Bounds {
        compute_pns3_bounds(self)
    }

    /// Admissible E_{y|x} bounds; see [`compute_exp_probs_bounds`]
    pub fn exp_probs_bounds(&self) -> ExpProbsBounds {
        compute_exp_probs_bounds(self)
    }
}
