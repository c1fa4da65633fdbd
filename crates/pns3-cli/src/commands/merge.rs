//! Merge command implementation.

use crate::cli::ScenarioArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::scenario::Scenario;
use pns3_domain::merge_exp_probs_bounds;

/// Execute the merge command.
///
/// Inconsistent strata are a result, not an error.
pub fn execute_merge(args: ScenarioArgs, formatter: &Formatter) -> Result<String> {
    let scenario = Scenario::load(&args.file)?;
    scenario.pair()?;

    let models = scenario.models(args.assumptions.apply_to(scenario.assumptions))?;
    let (first, second) = (&models[0], &models[1]);
    let merged = merge_exp_probs_bounds(&first.1, &second.1);

    formatter.format_merge(&first.0, &second.0, merged.as_ref())
}
