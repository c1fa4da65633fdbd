//! Scenario files: one or more strata with shared assumptions.
//!
//! TOML or JSON, chosen by file extension:
//!
//! ```toml
//! [assumptions]
//! monotonicity = false
//!
//! [[strata]]
//! label = "female"
//! o_y_bar_x = [[0.3, 0.73], [0.7, 0.27]]
//! px = [0.3, 0.7]
//! e_y_bar_x = [[0.79, 0.52], [0.21, 0.48]]
//! ```

use crate::error::{CliError, Result};
use pns3_domain::{Assumptions, ProbabilityModel, ValidationError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// A parsed scenario file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Assumptions applied to every stratum
    #[serde(default)]
    pub assumptions: Assumptions,

    /// Strata, in file order
    #[serde(default)]
    pub strata: Vec<StratumEntry>,
}

/// Raw probabilities of one stratum, validated when built into a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StratumEntry {
    /// Stratum label
    pub label: String,

    /// Observational O_{y|x}, indexed `[y][x]`
    pub o_y_bar_x: Vec<Vec<f64>>,

    /// Observational P(x)
    pub px: Vec<f64>,

    /// Experimental E_{y|x}, indexed `[y][x]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_y_bar_x: Option<Vec<Vec<f64>>>,
}

impl StratumEntry {
    /// Validate the probabilities and build a model.
    pub fn to_model(
        &self,
        assumptions: Assumptions,
    ) -> std::result::Result<ProbabilityModel, ValidationError> {
        ProbabilityModel::from_raw(
            self.o_y_bar_x.as_slice(),
            &self.px,
            self.e_y_bar_x.as_deref(),
            assumptions,
        )
    }
}

impl Scenario {
    /// Load a scenario, picking the parser from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let scenario = match extension.as_deref() {
            Some("toml") => Self::from_toml(&contents)?,
            Some("json") => Self::from_json(&contents)?,
            _ => {
                return Err(CliError::Scenario(format!(
                    "{}: expected a .toml or .json file",
                    path.display()
                )))
            }
        };
        debug!(path = %path.display(), strata = scenario.strata.len(), "scenario loaded");
        Ok(scenario)
    }

    /// Parse a TOML scenario.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(contents)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Parse a JSON scenario.
    pub fn from_json(contents: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(contents)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// The female/male worked example.
    pub fn demo() -> Self {
        Self {
            assumptions: Assumptions::none(),
            strata: vec![
                StratumEntry {
                    label: "female".to_string(),
                    o_y_bar_x: vec![vec![0.3, 0.73], vec![0.7, 0.27]],
                    px: vec![0.3, 0.7],
                    e_y_bar_x: Some(vec![vec![0.79, 0.52], vec![0.21, 0.48]]),
                },
                StratumEntry {
                    label: "male".to_string(),
                    o_y_bar_x: vec![vec![0.3, 0.3], vec![0.7, 0.7]],
                    px: vec![0.3, 0.7],
                    e_y_bar_x: Some(vec![vec![0.79, 0.51], vec![0.21, 0.49]]),
                },
            ],
        }
    }

    fn validate(&self) -> Result<()> {
        if self.strata.is_empty() {
            return Err(CliError::Scenario("no strata defined".to_string()));
        }
        for (i, stratum) in self.strata.iter().enumerate() {
            if stratum.label.trim().is_empty() {
                return Err(CliError::Scenario(format!("stratum {} has an empty label", i)));
            }
        }
        Ok(())
    }

    /// Build one model per stratum under the given assumptions.
    pub fn models(&self, assumptions: Assumptions) -> Result<Vec<(String, ProbabilityModel)>> {
        self.strata
            .iter()
            .map(|s| {
                let model = s
                    .to_model(assumptions)
                    .map_err(|e| CliError::Scenario(format!("stratum '{}': {}", s.label, e)))?;
                Ok((s.label.clone(), model))
            })
            .collect()
    }

    /// The two strata of a two-stratum scenario.
    pub fn pair(&self) -> Result<(&StratumEntry, &StratumEntry)> {
        match self.strata.as_slice() {
            [a, b] => Ok((a, b)),
            other => Err(CliError::Scenario(format!(
                "expected exactly two strata, found {}",
                other.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const FEMALE_TOML: &str = r#"
        [assumptions]
        monotonicity = true

        [[strata]]
        label = "female"
        o_y_bar_x = [[0.3, 0.73], [0.7, 0.27]]
        px = [0.3, 0.7]
        e_y_bar_x = [[0.79, 0.52], [0.21, 0.48]]
    "#;

    #[test]
    fn test_parse_toml() {
        let scenario = Scenario::from_toml(FEMALE_TOML).unwrap();
        assert!(scenario.assumptions.monotonicity());
        assert_eq!(scenario.strata.len(), 1);
        assert!(scenario.strata[0].e_y_bar_x.is_some());

        let models = scenario.models(scenario.assumptions).unwrap();
        assert_eq!(models[0].0, "female");
        assert!(models[0].1.assumptions().monotonicity());
    }

    #[test]
    fn test_parse_json_without_experimental() {
        let json = r#"{"strata": [
            {"label": "a", "o_y_bar_x": [[0.5, 0.5], [0.5, 0.5]], "px": [0.5, 0.5]}
        ]}"#;
        let scenario = Scenario::from_json(json).unwrap();
        assert_eq!(scenario.assumptions, Assumptions::none());
        let models = scenario.models(Assumptions::none()).unwrap();
        assert!(models[0].1.experimental().is_none());
    }

    #[test]
    fn test_invalid_probabilities_name_stratum() {
        let json = r#"{"strata": [{"label": "bad", "o_y_bar_x": [[0.5, 0.5]], "px": [0.5, 0.5]}]}"#;
        let scenario = Scenario::from_json(json).unwrap();
        match scenario.models(Assumptions::none()) {
            Err(CliError::Scenario(msg)) => assert!(msg.contains("'bad'")),
            other => panic!("expected scenario error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_scenario_rejected() {
        assert!(matches!(Scenario::from_toml(""), Err(CliError::Scenario(_))));
    }

    #[test]
    fn test_pair() {
        let demo = Scenario::demo();
        let (a, b) = demo.pair().unwrap();
        assert_eq!((a.label.as_str(), b.label.as_str()), ("female", "male"));

        let single = Scenario::from_toml(FEMALE_TOML).unwrap();
        assert!(matches!(single.pair(), Err(CliError::Scenario(_))));
    }

    #[test]
    fn test_load_by_extension() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(FEMALE_TOML.as_bytes()).unwrap();
        assert_eq!(Scenario::load(file.path()).unwrap().strata.len(), 1);

        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"strata: []").unwrap();
        assert!(matches!(Scenario::load(file.path()), Err(CliError::Scenario(_))));
    }
}
