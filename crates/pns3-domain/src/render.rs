//! Plain-text rendering of models and bounds
//!
//! Every function takes the number of decimal places explicitly. Bound
//! lines have the shape `"<lower> <= <LABEL> <= <upper>"`, which reporting
//! surfaces consume verbatim.

use crate::exp_bounds::ExpProbsBounds;
use crate::interval::{Interval, Pns3Bounds};
use crate::model::ProbabilityModel;
use crate::probability::{ProbabilityVector, TransitionMatrix};

/// Decimal places used when no precision is configured
pub const DEFAULT_PRECISION: usize = 6;

/// `"<label>=\n[[a b]\n [c d]]"`
pub fn render_matrix(label: &str, matrix: &TransitionMatrix, precision: usize) -> String {
    let rows: Vec<String> = matrix
        .as_array()
        .iter()
        .map(|row| render_row(row, precision))
        .collect();
    format!("{}=\n[{}]", label, rows.join("\n "))
}

/// `"<label>=\n[a b]"`
pub fn render_vector(label: &str, vector: &ProbabilityVector, precision: usize) -> String {
    format!("{}=\n{}", label, render_row(&vector.as_array(), precision))
}

fn render_row(values: &[f64], precision: usize) -> String {
    let cells: Vec<String> = values.iter().map(|v| format!("{:.*}", precision, v)).collect();
    format!("[{}]", cells.join(" "))
}

/// O_{y|x} and P(x)
pub fn render_observational(model: &ProbabilityModel, precision: usize) -> String {
    format!(
        "{}\n{}",
        render_matrix("O_{y|x}", model.observational(), precision),
        render_vector("P_x", model.px(), precision)
    )
}

/// E_{y|x}, or `None` when absent
pub fn render_experimental(model: &ProbabilityModel, precision: usize) -> String {
    match model.experimental() {
        Some(e) => render_matrix("E_{y|x}", e, precision),
        None => "E_{y|x}=\nNone".to_string(),
    }
}

/// Observational then experimental probabilities
pub fn render_all_probs(model: &ProbabilityModel, precision: usize) -> String {
    format!(
        "{}\n{}",
        render_observational(model, precision),
        render_experimental(model, precision)
    )
}

/// `"<lower> <= <label> <= <upper>"`, label padded to three characters
pub fn render_bound_line(label: &str, interval: Interval, precision: usize) -> String {
    format!(
        "{:.p$} <= {:<3} <= {:.p$}",
        interval.lower,
        label,
        interval.upper,
        p = precision
    )
}

/// One line each for PNS, PN and PS
pub fn render_pns3_bounds(bounds: &Pns3Bounds, precision: usize) -> String {
    bounds
        .iter()
        .map(|(label, interval)| render_bound_line(label, interval, precision))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per E_{y|x} cell: `"E_{y|x}: <lower> <= <value> <= <upper>"`
///
/// `observed` is the model's experimental matrix; without one each value
/// renders as zero.
pub fn render_exp_probs_bounds(
    bounds: &ExpProbsBounds,
    observed: Option<&TransitionMatrix>,
    precision: usize,
) -> String {
    let mut lines = Vec::with_capacity(4);
    for y in 0..2 {
        for x in 0..2 {
            let value = observed.map_or(0.0, |e| e.get(y, x));
            let cell = bounds.cell(y, x);
            lines.push(format!(
                "E_{{{}|{}}}: {:.p$} <= {:.p$} <= {:.p$}",
                y,
                x,
                cell.lower,
                value,
                cell.upper,
                p = precision
            ));
        }
    }
    lines.join("\n")
}
