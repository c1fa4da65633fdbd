//! Bounds command implementation.

use crate::cli::BoundsArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::scenario::Scenario;
use pns3_domain::{Assumptions, ProbabilityModel, ProbabilityVector, TransitionMatrix};
use tracing::info;

/// Label used for a stratum given on the command line.
const INLINE_LABEL: &str = "stratum";

/// Execute the bounds command.
pub fn execute_bounds(args: BoundsArgs, formatter: &Formatter) -> Result<String> {
    let strata = match &args.file {
        Some(path) => {
            let scenario = Scenario::load(path)?;
            scenario.models(args.assumptions.apply_to(scenario.assumptions))?
        }
        None => vec![(INLINE_LABEL.to_string(), inline_model(&args)?)],
    };

    info!(strata = strata.len(), "computing bounds");
    formatter.format_strata(&strata)
}

fn inline_model(args: &BoundsArgs) -> Result<ProbabilityModel> {
    let (Some(o1b0), Some(o1b1), Some(px1)) = (args.o1b0, args.o1b1, args.px1) else {
        return Err(CliError::InvalidInput(
            "give a scenario file or all of --o1b0, --o1b1 and --px1".to_string(),
        ));
    };

    let mut model = ProbabilityModel::new(
        TransitionMatrix::from_outcome_probs(o1b0, o1b1)?,
        ProbabilityVector::from_treated(px1)?,
    )
    .with_assumptions(args.assumptions.apply_to(Assumptions::none()));

    if let (Some(e1b0), Some(e1b1)) = (args.e1b0, args.e1b1) {
        model.set_experimental(TransitionMatrix::from_outcome_probs(e1b0, e1b1)?);
    }
    Ok(model)
}
