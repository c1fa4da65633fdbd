//! Study configuration

use crate::StudyError;
use pns3_domain::{Assumptions, ProbabilityVector, TransitionMatrix, ValidationError};
use serde::{Deserialize, Serialize};

/// The three free observational parameters of one stratum
///
/// Each column of O_{y|x} and P(x) sums to one, so O_{1|0}, O_{1|1} and
/// P(x=1) determine everything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationalParams {
    /// O_{1|0}
    pub o1b0: f64,
    /// O_{1|1}
    pub o1b1: f64,
    /// P(x=1)
    pub px1: f64,
}

impl Default for ObservationalParams {
    fn default() -> Self {
        Self {
            o1b0: 0.5,
            o1b1: 0.5,
            px1: 0.5,
        }
    }
}

impl ObservationalParams {
    /// Build and validate O_{y|x} and P(x)
    pub fn to_matrices(&self) -> Result<(TransitionMatrix, ProbabilityVector), ValidationError> {
        Ok((
            TransitionMatrix::from_outcome_probs(self.o1b0, self.o1b1)?,
            ProbabilityVector::from_treated(self.px1)?,
        ))
    }
}

/// The two free experimental parameters, E_{1|0} and E_{1|1}
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperimentalParams {
    /// E_{1|0}
    pub e1b0: f64,
    /// E_{1|1}
    pub e1b1: f64,
}

impl ExperimentalParams {
    /// Build and validate E_{y|x}
    pub fn to_matrix(&self) -> Result<TransitionMatrix, ValidationError> {
        TransitionMatrix::from_outcome_probs(self.e1b0, self.e1b1)
    }
}

/// Configuration for a two-stratum study
///
/// # Examples
///
/// ```
/// use pns3_study::StudyConfig;
///
/// let config = StudyConfig::default();
/// assert_eq!(config.first_label, "male");
/// assert_eq!(config.second_label, "female");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Label of the first stratum
    #[serde(default = "default_first_label")]
    pub first_label: String,

    /// Label of the second stratum
    #[serde(default = "default_second_label")]
    pub second_label: String,

    /// Assumptions shared by both strata
    #[serde(default)]
    pub assumptions: Assumptions,

    /// Starting observational parameters of the first stratum
    #[serde(default)]
    pub first: ObservationalParams,

    /// Starting observational parameters of the second stratum
    #[serde(default)]
    pub second: ObservationalParams,
}

fn default_first_label() -> String {
    "male".to_string()
}

fn default_second_label() -> String {
    "female".to_string()
}

impl Default for StudyConfig {
    /// Uniform observational data in both strata, no assumptions
    fn default() -> Self {
        Self {
            first_label: default_first_label(),
            second_label: default_second_label(),
            assumptions: Assumptions::none(),
            first: ObservationalParams::default(),
            second: ObservationalParams::default(),
        }
    }
}

impl StudyConfig {
    /// Default configuration with custom stratum labels
    pub fn with_labels(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first_label: first.into(),
            second_label: second.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), StudyError> {
        if self.first_label.trim().is_empty() || self.second_label.trim().is_empty() {
            return Err(StudyError::Config("stratum labels must not be empty".to_string()));
        }
        if self.first_label == self.second_label {
            return Err(StudyError::Config(format!(
                "stratum labels must differ, both are '{}'",
                self.first_label
            )));
        }
        self.first.to_matrices()?;
        self.second.to_matrices()?;
        Ok(())
    }
}
