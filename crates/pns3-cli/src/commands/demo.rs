//! Demo command implementation.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use crate::scenario::Scenario;
use pns3_domain::merge_exp_probs_bounds;

/// Execute the demo command: bounds for each worked-example stratum, then
/// the cross-stratum merge.
pub fn execute_demo(formatter: &Formatter) -> Result<String> {
    let scenario = Scenario::demo();
    let models = scenario.models(scenario.assumptions)?;
    let merged = merge_exp_probs_bounds(&models[0].1, &models[1].1);

    if formatter.format() == OutputFormat::Json {
        let value = serde_json::json!({
            "strata": formatter.strata_json(&models),
            "merge": formatter.merge_json(&models[0].0, &models[1].0, merged.as_ref()),
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let strata = formatter.format_strata(&models)?;
    let merge = formatter.format_merge(&models[0].0, &models[1].0, merged.as_ref())?;
    Ok(format!(
        "{}\n{}\n\n{}",
        formatter.info("Worked example: drug trial stratified by sex"),
        strata,
        merge
    ))
}
