//! Two-stratum study session

use crate::config::{ExperimentalParams, ObservationalParams, StudyConfig};
use crate::StudyError;
use pns3_domain::render::{render_all_probs, render_pns3_bounds};
use pns3_domain::{
    merge_exp_probs_bounds, Assumptions, ExpProbsBounds, Interval, Pns3Bounds, ProbabilityModel,
    ProbabilityVector, TransitionMatrix, TOLERANCE,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Which of the two strata an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StratumId {
    /// The first stratum
    First,
    /// The second stratum
    Second,
}

impl StratumId {
    fn index(self) -> usize {
        match self {
            StratumId::First => 0,
            StratumId::Second => 1,
        }
    }
}

/// A labelled sub-population and its model
#[derive(Debug, Clone, Serialize)]
pub struct Stratum {
    label: String,
    model: ProbabilityModel,
}

impl Stratum {
    /// Stratum label, e.g. "female"
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The stratum's probability model
    pub fn model(&self) -> &ProbabilityModel {
        &self.model
    }
}

/// Whether experimental data takes part in the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Only observational data is available
    ObservationalOnly,
    /// A shared E_{y|x} is applied to both strata
    WithExperimental,
}

/// Consistency of the two strata
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StudyStatus {
    /// A shared E_{y|x} exists; admissible ranges of its free parameters
    Consistent {
        /// Admissible E_{1|0}
        e1b0: Interval,
        /// Admissible E_{1|1}
        e1b1: Interval,
    },
    /// No shared E_{y|x} exists, detected before experimental data was added
    InconsistentObservational,
    /// No shared E_{y|x} exists, detected with experimental data present
    InconsistentExperimental,
    /// A shared E_{y|x} exists but the current one lies outside it, e.g.
    /// after the observational data moved
    InadmissibleExperimental,
}

impl StudyStatus {
    /// Whether a shared E_{y|x} exists
    pub fn is_consistent(&self) -> bool {
        matches!(self, StudyStatus::Consistent { .. })
    }

    /// Human-readable status line(s)
    pub fn message(&self, precision: usize) -> String {
        match self {
            StudyStatus::Consistent { e1b0, e1b1 } => format!(
                "Good choices! The observational probabilities are consistent.\n\
                 {:.p$} <= E_{{1|0}} <= {:.p$}\n\
                 {:.p$} <= E_{{1|1}} <= {:.p$}",
                e1b0.lower,
                e1b0.upper,
                e1b1.lower,
                e1b1.upper,
                p = precision
            ),
            StudyStatus::InconsistentObservational => {
                "Bad choices! The observational probabilities are inconsistent. \
                 Try alternative values."
                    .to_string()
            }
            StudyStatus::InconsistentExperimental => {
                "Bad choices! The experimental probabilities are inconsistent. \
                 Try alternative values."
                    .to_string()
            }
            StudyStatus::InadmissibleExperimental => {
                "Bad choices! The experimental probabilities lie outside the admissible \
                 bounds. Try alternative values."
                    .to_string()
            }
        }
    }
}

/// Bounds for one stratum at the time of a refresh
#[derive(Debug, Clone, Serialize)]
pub struct StratumSnapshot {
    /// Stratum label
    pub label: String,
    /// PNS3 bounds under the study's assumptions
    pub bounds: Pns3Bounds,
}

/// Immutable result of [`Study::refresh`]
#[derive(Debug, Clone, Serialize)]
pub struct StudySnapshot {
    /// Mode at the time of the refresh
    pub mode: Mode,
    /// Shared assumptions
    pub assumptions: Assumptions,
    /// First stratum bounds
    pub first: StratumSnapshot,
    /// Second stratum bounds
    pub second: StratumSnapshot,
    /// Merged admissible E_{y|x} bounds, `None` when the strata disagree
    pub joint_exp_bounds: Option<ExpProbsBounds>,
    /// Consistency status
    pub status: StudyStatus,
}

/// Two strata analysed together
///
/// Both strata share the assumption flags and, once added, the experimental
/// matrix E_{y|x}: a randomized trial does not depend on which stratum a
/// unit belongs to. Every update is validated before anything is
/// committed, and a failed update leaves the study unchanged.
///
/// # Examples
///
/// ```
/// use pns3_study::{ObservationalParams, StratumId, Study, StudyConfig};
///
/// let mut study = Study::new(StudyConfig::default()).unwrap();
/// let female = ObservationalParams { o1b0: 0.7, o1b1: 0.27, px1: 0.7 };
/// study.set_observational(StratumId::Second, female).unwrap();
///
/// let snapshot = study.refresh();
/// assert!(snapshot.status.is_consistent());
/// ```
#[derive(Debug, Clone)]
pub struct Study {
    strata: [Stratum; 2],
    assumptions: Assumptions,
    mode: Mode,
}

impl Study {
    /// Create a study from a configuration
    pub fn new(config: StudyConfig) -> Result<Self, StudyError> {
        config.validate()?;

        let build = |label: String, params: &ObservationalParams| -> Result<Stratum, StudyError> {
            let (o, px) = params.to_matrices()?;
            Ok(Stratum {
                label,
                model: ProbabilityModel::new(o, px).with_assumptions(config.assumptions),
            })
        };

        Ok(Self {
            strata: [
                build(config.first_label.clone(), &config.first)?,
                build(config.second_label.clone(), &config.second)?,
            ],
            assumptions: config.assumptions,
            mode: Mode::ObservationalOnly,
        })
    }

    /// A stratum
    pub fn stratum(&self, id: StratumId) -> &Stratum {
        &self.strata[id.index()]
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Shared assumptions
    pub fn assumptions(&self) -> Assumptions {
        self.assumptions
    }

    /// Shared E_{y|x}, once experimental data has been added
    pub fn experimental(&self) -> Option<&TransitionMatrix> {
        self.strata[0].model.experimental()
    }

    /// Replace one stratum's observational data from its free parameters
    pub fn set_observational(
        &mut self,
        id: StratumId,
        params: ObservationalParams,
    ) -> Result<(), StudyError> {
        let (o, px) = params.to_matrices()?;
        self.set_observational_matrices(id, o, px);
        Ok(())
    }

    /// Replace one stratum's observational data
    pub fn set_observational_matrices(
        &mut self,
        id: StratumId,
        o_y_bar_x: TransitionMatrix,
        px: ProbabilityVector,
    ) {
        debug!(stratum = %self.strata[id.index()].label, "observational data updated");
        self.strata[id.index()].model.set_observational(o_y_bar_x, px);
    }

    /// Apply assumptions to both strata
    pub fn set_assumptions(&mut self, assumptions: Assumptions) {
        info!(
            regime = %assumptions.regime(),
            strong_exogeneity = assumptions.strong_exogeneity(),
            "assumptions updated"
        );
        self.assumptions = assumptions;
        for stratum in &mut self.strata {
            stratum.model.set_assumptions(assumptions);
        }
    }

    /// Switch to experimental mode
    ///
    /// Requires the strata to be consistent. The shared E_{y|x} is seeded
    /// with the lowest admissible E_{1|0} and E_{1|1}, so the study starts
    /// from a valid point. Calling this again in experimental mode returns
    /// the current E_{y|x} unchanged.
    pub fn add_experimental(&mut self) -> Result<TransitionMatrix, StudyError> {
        if let (Mode::WithExperimental, Some(e)) = (self.mode, self.experimental()) {
            return Ok(*e);
        }

        let merged = merge_exp_probs_bounds(&self.strata[0].model, &self.strata[1].model)
            .ok_or(StudyError::InconsistentStrata)?;
        let e = TransitionMatrix::from_outcome_probs(merged.lower[1][0], merged.lower[1][1])?;

        for stratum in &mut self.strata {
            stratum.model.set_experimental(e);
        }
        self.mode = Mode::WithExperimental;
        info!(e1b0 = e.get(1, 0), e1b1 = e.get(1, 1), "experimental data added");
        Ok(e)
    }

    /// Replace the shared E_{y|x} from its free parameters
    pub fn set_experimental(&mut self, params: ExperimentalParams) -> Result<(), StudyError> {
        if self.mode == Mode::ObservationalOnly {
            return Err(StudyError::ObservationalOnly);
        }
        let e = params.to_matrix()?;
        self.set_experimental_matrix(e)
    }

    /// Replace the shared E_{y|x}
    ///
    /// Every cell must lie within the merged admissible bounds of both
    /// strata, up to [`TOLERANCE`]. A rejected matrix leaves the study
    /// unchanged.
    pub fn set_experimental_matrix(
        &mut self,
        e_y_bar_x: TransitionMatrix,
    ) -> Result<(), StudyError> {
        if self.mode == Mode::ObservationalOnly {
            return Err(StudyError::ObservationalOnly);
        }

        let merged = merge_exp_probs_bounds(&self.strata[0].model, &self.strata[1].model)
            .ok_or(StudyError::InconsistentStrata)?;
        let violations = merged.violations_within(&e_y_bar_x, TOLERANCE);
        if !violations.is_empty() {
            let cells = violations
                .iter()
                .map(|(y, x)| format!("E_{{{}|{}}}", y, x))
                .collect::<Vec<_>>()
                .join(", ");
            warn!(%cells, "rejected inadmissible E_{{y|x}}");
            return Err(StudyError::InadmissibleExperimental { cells });
        }

        for stratum in &mut self.strata {
            stratum.model.set_experimental(e_y_bar_x);
        }
        Ok(())
    }

    /// Recompute both strata's bounds and the merged admissible E_{y|x}
    pub fn refresh(&self) -> StudySnapshot {
        let joint_exp_bounds =
            merge_exp_probs_bounds(&self.strata[0].model, &self.strata[1].model);
        let inadmissible = match (&joint_exp_bounds, self.experimental()) {
            (Some(b), Some(e)) => !b.violations_within(e, TOLERANCE).is_empty(),
            _ => false,
        };

        let status = match (&joint_exp_bounds, self.mode) {
            (Some(_), Mode::WithExperimental) if inadmissible => {
                StudyStatus::InadmissibleExperimental
            }
            (Some(b), _) => StudyStatus::Consistent {
                e1b0: b.cell(1, 0),
                e1b1: b.cell(1, 1),
            },
            (None, Mode::ObservationalOnly) => StudyStatus::InconsistentObservational,
            (None, Mode::WithExperimental) => StudyStatus::InconsistentExperimental,
        };

        let snapshot = |s: &Stratum| StratumSnapshot {
            label: s.label.clone(),
            bounds: s.model.pns3_bounds(),
        };

        StudySnapshot {
            mode: self.mode,
            assumptions: self.assumptions,
            first: snapshot(&self.strata[0]),
            second: snapshot(&self.strata[1]),
            joint_exp_bounds,
            status,
        }
    }

    /// Probabilities and PNS3 bounds of both strata as text
    pub fn report(&self, precision: usize) -> String {
        let mut sections = vec!["###################################".to_string()];
        for stratum in &self.strata {
            sections.push(format!("{}:{}", capitalize(&stratum.label), "-".repeat(30)));
            sections.push(render_all_probs(&stratum.model, precision));
            sections.push(render_pns3_bounds(&stratum.model.pns3_bounds(), precision));
        }
        sections.join("\n")
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn female_params() -> ObservationalParams {
        ObservationalParams {
            o1b0: 0.7,
            o1b1: 0.27,
            px1: 0.7,
        }
    }

    fn male_params() -> ObservationalParams {
        ObservationalParams {
            o1b0: 0.7,
            o1b1: 0.7,
            px1: 0.7,
        }
    }

    #[test]
    fn test_new_study_is_observational_only() {
        let study = Study::new(StudyConfig::default()).unwrap();
        assert_eq!(study.mode(), Mode::ObservationalOnly);
        assert!(study.experimental().is_none());
        assert_eq!(study.stratum(StratumId::First).label(), "male");

        let snapshot = study.refresh();
        assert!((snapshot.first.bounds.pns.upper - 0.5).abs() < 1e-12);
        assert_eq!(snapshot.second.bounds.pn, Interval::unit());
    }

    #[test]
    fn test_add_experimental_seeds_lower_bounds() {
        let mut study = Study::new(StudyConfig::default()).unwrap();
        let e = study.add_experimental().unwrap();

        // uniform strata: E_{1|x} admissible in [0.25, 0.75]
        assert!((e.get(1, 0) - 0.25).abs() < 1e-12);
        assert!((e.get(1, 1) - 0.25).abs() < 1e-12);
        assert_eq!(study.mode(), Mode::WithExperimental);
        assert_eq!(study.stratum(StratumId::Second).model().experimental(), Some(&e));

        // second call is a no-op
        assert_eq!(study.add_experimental().unwrap(), e);
    }

    #[test]
    fn test_add_experimental_requires_consistent_strata() {
        let mut study = Study::new(StudyConfig::default()).unwrap();
        study.set_observational(StratumId::First, male_params()).unwrap();
        study.set_observational(StratumId::Second, female_params()).unwrap();

        assert!(matches!(study.add_experimental(), Err(StudyError::InconsistentStrata)));
        assert_eq!(study.mode(), Mode::ObservationalOnly);
        assert_eq!(study.refresh().status, StudyStatus::InconsistentObservational);
    }

    #[test]
    fn test_inconsistent_after_experimental_added() {
        let mut study = Study::new(StudyConfig::default()).unwrap();
        study.add_experimental().unwrap();
        study.set_observational(StratumId::First, male_params()).unwrap();
        study.set_observational(StratumId::Second, female_params()).unwrap();

        let snapshot = study.refresh();
        assert_eq!(snapshot.status, StudyStatus::InconsistentExperimental);
        assert!(snapshot.joint_exp_bounds.is_none());
    }

    #[test]
    fn test_set_experimental_requires_mode() {
        let mut study = Study::new(StudyConfig::default()).unwrap();
        let params = ExperimentalParams { e1b0: 0.3, e1b1: 0.6 };
        assert!(matches!(study.set_experimental(params), Err(StudyError::ObservationalOnly)));

        study.add_experimental().unwrap();
        study.set_experimental(params).unwrap();
        let e = study.experimental().unwrap();
        assert_eq!(e.get(1, 1), 0.6);
        assert_eq!(study.stratum(StratumId::First).model().experimental(), Some(e));
    }

    #[test]
    fn test_invalid_update_leaves_study_unchanged() {
        let mut study = Study::new(StudyConfig::default()).unwrap();
        let before = study.stratum(StratumId::First).model().clone();

        let bad = ObservationalParams { o1b0: 1.5, o1b1: 0.5, px1: 0.5 };
        assert!(matches!(
            study.set_observational(StratumId::First, bad),
            Err(StudyError::Validation(_))
        ));
        assert_eq!(study.stratum(StratumId::First).model(), &before);
    }

    #[test]
    fn test_assumptions_apply_to_both_strata() {
        let mut study = Study::new(StudyConfig::default()).unwrap();
        study.add_experimental().unwrap();
        study.set_assumptions(Assumptions::monotone());

        for id in [StratumId::First, StratumId::Second] {
            assert!(study.stratum(id).model().assumptions().monotonicity());
        }
        let snapshot = study.refresh();
        assert!(snapshot.first.bounds.pns.is_point());
        assert!(snapshot.second.bounds.ps.is_point());
    }

    #[test]
    fn test_set_experimental_rejects_inadmissible() {
        let mut study = Study::new(StudyConfig::default()).unwrap();
        let seeded = study.add_experimental().unwrap();

        // uniform strata admit E_{1|1} only up to 0.75
        let result = study.set_experimental(ExperimentalParams { e1b0: 0.3, e1b1: 0.95 });
        match result {
            Err(StudyError::InadmissibleExperimental { cells }) => {
                assert_eq!(cells, "E_{0|1}, E_{1|1}")
            }
            other => panic!("expected inadmissible E, got {:?}", other),
        }
        assert_eq!(study.experimental(), Some(&seeded));
        assert!(study.refresh().status.is_consistent());
    }

    #[test]
    fn test_status_when_observational_moves_past_experimental() {
        let mut study = Study::new(StudyConfig::default()).unwrap();
        study.add_experimental().unwrap();
        study.set_experimental(ExperimentalParams { e1b0: 0.3, e1b1: 0.7 }).unwrap();

        // female admits E_{1|1} only up to 0.489
        study.set_observational(StratumId::Second, female_params()).unwrap();
        let snapshot = study.refresh();
        assert_eq!(snapshot.status, StudyStatus::InadmissibleExperimental);
        assert!(snapshot.joint_exp_bounds.is_some());
        assert!(snapshot.status.message(2).contains("outside the admissible"));
    }

    #[test]
    fn test_status_message() {
        let status = StudyStatus::Consistent {
            e1b0: Interval::new(0.25, 0.75),
            e1b1: Interval::new(0.3, 0.7),
        };
        let message = status.message(2);
        assert!(message.starts_with("Good choices!"));
        assert!(message.contains("0.25 <= E_{1|0} <= 0.75"));
        assert!(message.contains("0.30 <= E_{1|1} <= 0.70"));
        assert!(StudyStatus::InconsistentExperimental.message(2).contains("experimental"));
    }

    #[test]
    fn test_report() {
        let study = Study::new(StudyConfig::default()).unwrap();
        let report = study.report(6);
        assert!(report.contains("Male:"));
        assert!(report.contains("Female:"));
        assert!(report.contains("0.000000 <= PNS <= 0.500000"));
        assert!(report.contains("E_{y|x}=\nNone"));
    }
}
