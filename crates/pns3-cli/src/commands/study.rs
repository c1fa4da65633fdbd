//! Study command implementation.

use crate::cli::ScenarioArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::scenario::{Scenario, StratumEntry};
use pns3_domain::{ProbabilityVector, TransitionMatrix};
use pns3_study::{StratumId, Study, StudyConfig, StudyError};
use tracing::warn;

/// Execute the study command.
pub fn execute_study(args: ScenarioArgs, formatter: &Formatter) -> Result<String> {
    let scenario = Scenario::load(&args.file)?;
    let study = build_study(&scenario, &args)?;
    formatter.format_study(&study, &study.refresh())
}

/// Build a study from a two-stratum scenario.
///
/// Experimental data, if any, is shared: every stratum that declares an
/// E_{y|x} must declare the same one, and it must lie within the bounds
/// both strata admit.
pub fn build_study(scenario: &Scenario, args: &ScenarioArgs) -> Result<Study> {
    let (first, second) = scenario.pair()?;

    let mut config = StudyConfig::with_labels(first.label.clone(), second.label.clone());
    config.assumptions = args.assumptions.apply_to(scenario.assumptions);
    let mut study = Study::new(config)?;

    for (id, entry) in [(StratumId::First, first), (StratumId::Second, second)] {
        let o = TransitionMatrix::from_rows(entry.o_y_bar_x.as_slice())?;
        let px = ProbabilityVector::from_slice(&entry.px)?;
        study.set_observational_matrices(id, o, px);
    }

    if let Some(e) = shared_experimental(first, second)? {
        match study.add_experimental() {
            Ok(_) => study.set_experimental_matrix(e)?,
            Err(StudyError::InconsistentStrata) => {
                warn!("strata are inconsistent, experimental data not applied");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(study)
}

fn shared_experimental(
    first: &StratumEntry,
    second: &StratumEntry,
) -> Result<Option<TransitionMatrix>> {
    let parse = |entry: &StratumEntry| {
        entry.e_y_bar_x
            .as_deref()
            .map(TransitionMatrix::from_rows)
            .transpose()
    };

    match (parse(first)?, parse(second)?) {
        (Some(a), Some(b)) if a != b => Err(CliError::Scenario(format!(
            "strata '{}' and '{}' declare different E_{{y|x}}; a study shares one",
            first.label, second.label
        ))),
        (a, b) => Ok(a.or(b)),
    }
}
