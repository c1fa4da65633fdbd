//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use pns3_domain::render::{
    render_all_probs, render_bound_line, render_exp_probs_bounds, render_pns3_bounds,
};
use pns3_domain::{ExpProbsBounds, Interval, ProbabilityModel};
use pns3_study::{Study, StudySnapshot};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// E_{y|x} cells in print order.
const EXP_CELLS: [(usize, usize); 4] = [(0, 0), (0, 1), (1, 0), (1, 1)];

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
    precision: usize,
}

#[derive(Clone, Copy)]
enum Tone {
    Good,
    Bad,
    Note,
    Heading,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool, precision: usize) -> Self {
        Self {
            format,
            color_enabled,
            precision,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format probabilities, admissible E_{y|x} bounds and PNS3 bounds for
    /// each stratum.
    pub fn format_strata(&self, strata: &[(String, ProbabilityModel)]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&self.strata_json(strata))?),
            OutputFormat::Table => Ok(self.format_strata_table(strata)),
            OutputFormat::Text => Ok(self.format_strata_text(strata)),
        }
    }

    fn format_strata_text(&self, strata: &[(String, ProbabilityModel)]) -> String {
        let sections: Vec<String> = strata
            .iter()
            .map(|(label, model)| {
                let exp_bounds = model.exp_probs_bounds();
                let heading = if point_identified(model) {
                    format!("{} ({}, point-identified):", label, model.assumptions().regime())
                } else {
                    format!("{}:", label)
                };
                let mut lines = vec![
                    self.paint(&heading, Tone::Heading),
                    render_all_probs(model, self.precision),
                    render_exp_probs_bounds(&exp_bounds, model.experimental(), self.precision),
                ];
                if let Some(e) = model.experimental() {
                    let violations = exp_bounds.violations(e);
                    if !violations.is_empty() {
                        let cells: Vec<String> = violations
                            .iter()
                            .map(|(y, x)| format!("E_{{{}|{}}}", y, x))
                            .collect();
                        lines.push(self.warning(&format!(
                            "{} outside the bounds admitted by the observational data",
                            cells.join(", ")
                        )));
                    }
                }
                lines.push(render_pns3_bounds(&model.pns3_bounds(), self.precision));
                lines.join("\n")
            })
            .collect();
        sections.join("\n\n")
    }

    /// Strata as a JSON array, full precision.
    pub(crate) fn strata_json(&self, strata: &[(String, ProbabilityModel)]) -> serde_json::Value {
        let values: Vec<serde_json::Value> = strata
            .iter()
            .map(|(label, model)| {
                let exp_bounds = model.exp_probs_bounds();
                let within = model.experimental().map(|e| exp_bounds.contains(e));
                serde_json::json!({
                    "label": label,
                    "model": model,
                    "regime": model.assumptions().regime(),
                    "point_identified": point_identified(model),
                    "exp_probs_bounds": exp_bounds,
                    "experimental_within_bounds": within,
                    "pns3_bounds": model.pns3_bounds(),
                })
            })
            .collect();
        serde_json::Value::Array(values)
    }

    fn format_strata_table(&self, strata: &[(String, ProbabilityModel)]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Stratum", "Quantity", "Lower", "Value", "Upper"]);

        for (label, model) in strata {
            for (name, interval) in model.pns3_bounds().iter() {
                self.push_interval(&mut builder, label, name, interval, None);
            }
            let exp_bounds = model.exp_probs_bounds();
            for (y, x) in EXP_CELLS {
                let value = model.experimental().map(|e| e.get(y, x));
                let name = format!("E_{{{}|{}}}", y, x);
                self.push_interval(&mut builder, label, &name, exp_bounds.cell(y, x), value);
            }
        }

        self.finish_table(builder)
    }

    /// Format the merged admissible bounds of two strata.
    pub fn format_merge(
        &self,
        first: &str,
        second: &str,
        merged: Option<&ExpProbsBounds>,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = self.merge_json(first, second, merged);
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => Ok(match merged {
                Some(bounds) => {
                    let mut builder = Builder::default();
                    builder.push_record(["Strata", "Quantity", "Lower", "Value", "Upper"]);
                    let strata = format!("{} & {}", first, second);
                    for (y, x) in EXP_CELLS {
                        let name = format!("E_{{{}|{}}}", y, x);
                        self.push_interval(&mut builder, &strata, &name, bounds.cell(y, x), None);
                    }
                    self.finish_table(builder)
                }
                None => self.inconsistent_strata(first, second),
            }),
            OutputFormat::Text => Ok(match merged {
                Some(bounds) => {
                    let mut lines = vec![self.success(&format!(
                        "Strata '{}' and '{}' admit a shared E_{{y|x}}",
                        first, second
                    ))];
                    for (y, x) in EXP_CELLS {
                        let name = format!("E_{{{}|{}}}", y, x);
                        lines.push(render_bound_line(&name, bounds.cell(y, x), self.precision));
                    }
                    lines.join("\n")
                }
                None => self.inconsistent_strata(first, second),
            }),
        }
    }

    /// Merge outcome as a JSON object, full precision.
    pub(crate) fn merge_json(
        &self,
        first: &str,
        second: &str,
        merged: Option<&ExpProbsBounds>,
    ) -> serde_json::Value {
        serde_json::json!({
            "strata": [first, second],
            "consistent": merged.is_some(),
            "merged_exp_probs_bounds": merged,
        })
    }

    fn inconsistent_strata(&self, first: &str, second: &str) -> String {
        self.warning(&format!(
            "Strata '{}' and '{}' are inconsistent: no shared E_{{y|x}} satisfies both",
            first, second
        ))
    }

    /// Format a study: report, then status.
    pub fn format_study(&self, study: &Study, snapshot: &StudySnapshot) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(snapshot)?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Stratum", "Quantity", "Lower", "Value", "Upper"]);
                for stratum in [&snapshot.first, &snapshot.second] {
                    for (name, interval) in stratum.bounds.iter() {
                        self.push_interval(&mut builder, &stratum.label, name, interval, None);
                    }
                }
                Ok(format!(
                    "{}\n{}",
                    self.finish_table(builder),
                    self.format_status(snapshot)
                ))
            }
            OutputFormat::Text => Ok(format!(
                "{}\n{}",
                study.report(self.precision),
                self.format_status(snapshot)
            )),
        }
    }

    fn format_status(&self, snapshot: &StudySnapshot) -> String {
        let message = snapshot.status.message(self.precision);
        if snapshot.status.is_consistent() {
            self.paint(&message, Tone::Good)
        } else {
            self.paint(&message, Tone::Bad)
        }
    }

    fn push_interval(
        &self,
        builder: &mut Builder,
        group: &str,
        name: &str,
        interval: Interval,
        value: Option<f64>,
    ) {
        let p = self.precision;
        builder.push_record([
            group.to_string(),
            name.to_string(),
            format!("{:.*}", p, interval.lower),
            value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", p, v)),
            format!("{:.*}", p, interval.upper),
        ]);
    }

    fn finish_table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.paint(&format!("✓ {}", message), Tone::Good)
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.paint(&format!("⚠ {}", message), Tone::Bad)
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.paint(&format!("ℹ {}", message), Tone::Note)
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match tone {
            Tone::Good => text.green().to_string(),
            Tone::Bad => text.yellow().to_string(),
            Tone::Note => text.blue().to_string(),
            Tone::Heading => text.cyan().bold().to_string(),
        }
    }
}

/// Bounds collapse to points only once E_{y|x} is known
fn point_identified(model: &ProbabilityModel) -> bool {
    model.experimental().is_some() && model.assumptions().regime().is_point_identified()
}
