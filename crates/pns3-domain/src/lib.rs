//! PNS3 Domain Layer
//!
//! Bounds on the probabilities of causation for a binary treatment `X` and
//! binary outcome `Y`, following the Tian–Pearl partial-identification
//! framework.
//!
//! ## Key Concepts
//!
//! - **O_{y|x}, P(x)**: observational data, e.g. from a survey
//! - **E_{y|x}**: experimental data from a randomized controlled trial
//! - **PNS3**: the trio PNS (necessity and sufficiency), PN (necessity)
//!   and PS (sufficiency)
//! - **Assumptions**: exogeneity, strong exogeneity and monotonicity, each
//!   tightening the bounds
//! - **Stratum**: a sub-population with its own [`ProbabilityModel`]
//!
//! ## Example
//!
//! ```
//! use pns3_domain::{ProbabilityModel, ProbabilityVector, TransitionMatrix};
//!
//! let model = ProbabilityModel::new(
//!     TransitionMatrix::new([[0.3, 0.73], [0.7, 0.27]]).unwrap(),
//!     ProbabilityVector::new([0.3, 0.7]).unwrap(),
//! )
//! .with_experimental(TransitionMatrix::new([[0.79, 0.52], [0.21, 0.48]]).unwrap());
//!
//! let bounds = model.pns3_bounds();
//! assert!(bounds.pns.lower <= bounds.pns.upper);
//! assert!(model.exp_probs_bounds().contains(model.experimental().unwrap()));
//! ```
//!
//! All computation is synchronous and runs in constant time on 2x2 inputs.
//! Separate models share nothing and may be used from separate threads.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assumptions;
pub mod bounds;
pub mod error;
pub mod exp_bounds;
pub mod interval;
pub mod model;
pub mod probability;
pub mod render;

// Re-exports for convenience
pub use assumptions::{Assumptions, Regime};
pub use bounds::compute_pns3_bounds;
pub use error::ValidationError;
pub use exp_bounds::{compute_exp_probs_bounds, merge_exp_probs_bounds, ExpProbsBounds};
pub use interval::{Interval, Pns3Bounds};
pub use model::{JointProbs, ProbabilityModel};
pub use probability::{
    validate_probability_vector, validate_transition_matrix, ProbabilityVector, TransitionMatrix,
    TOLERANCE,
};
