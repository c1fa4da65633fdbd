//! PNS3 Study
//!
//! Analyses two strata of a population side by side (by default "male"
//! and "female"), sharing assumptions and experimental data between them.
//!
//! The study provides:
//! - Per-stratum PNS3 bounds under the shared assumptions
//! - Consistency checking: whether a single E_{y|x} fits both strata
//! - Seeding of E_{y|x} from the merged admissible bounds
//! - A plain-text report of both strata
//!
//! # Examples
//!
//! ```
//! use pns3_study::{ExperimentalParams, Study, StudyConfig};
//!
//! let mut study = Study::new(StudyConfig::default()).unwrap();
//! study.add_experimental().unwrap();
//! study.set_experimental(ExperimentalParams { e1b0: 0.3, e1b1: 0.6 }).unwrap();
//!
//! let snapshot = study.refresh();
//! println!("{}", snapshot.status.message(2));
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod study;

pub use config::{ExperimentalParams, ObservationalParams, StudyConfig};
pub use error::StudyError;
pub use study::{Mode, Stratum, StratumId, StratumSnapshot, Study, StudySnapshot, StudyStatus};
