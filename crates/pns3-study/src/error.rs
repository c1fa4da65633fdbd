//! Study error types

use pns3_domain::ValidationError;
use thiserror::Error;

/// Errors that can occur during study operations
#[derive(Error, Debug)]
pub enum StudyError {
    /// Rejected probability input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The strata admit no shared experimental distribution
    #[error("Strata are inconsistent: no shared E_{{y|x}} satisfies both")]
    InconsistentStrata,

    /// Shared E_{y|x} outside the bounds both strata admit
    #[error("E_{{y|x}} outside the bounds both strata admit: {cells}")]
    InadmissibleExperimental {
        /// Offending cells, e.g. "E_{0|1}, E_{1|1}"
        cells: String,
    },

    /// Experimental values supplied before experimental data was added
    #[error("Study is observational-only; add experimental data first")]
    ObservationalOnly,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
