//! Epistemic assumptions that tighten the PNS3 bounds

use serde::{Deserialize, Serialize};

/// Assumption flags attached to a model
///
/// Strong exogeneity implies exogeneity: `exogeneity()` reports true
/// whenever `strong_exogeneity()` does, however the flags were set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Assumptions {
    #[serde(default)]
    monotonicity: bool,
    #[serde(default)]
    exogeneity: bool,
    #[serde(default)]
    strong_exogeneity: bool,
}

impl Assumptions {
    /// No assumptions (worst-case bounds)
    pub fn none() -> Self {
        Self::default()
    }

    /// Exogeneity only
    pub fn exogenous() -> Self {
        Self::none().with_exogeneity(true)
    }

    /// Monotonicity only
    pub fn monotone() -> Self {
        Self::none().with_monotonicity(true)
    }

    /// Strong exogeneity (and therefore exogeneity)
    pub fn strongly_exogenous() -> Self {
        Self::none().with_strong_exogeneity(true)
    }

    /// Set the monotonicity flag
    pub fn with_monotonicity(mut self, on: bool) -> Self {
        self.monotonicity = on;
        self
    }

    /// Set the exogeneity flag
    pub fn with_exogeneity(mut self, on: bool) -> Self {
        self.exogeneity = on;
        self
    }

    /// Set the strong-exogeneity flag; turning it on also turns on exogeneity
    pub fn with_strong_exogeneity(mut self, on: bool) -> Self {
        self.strong_exogeneity = on;
        if on {
            self.exogeneity = true;
        }
        self
    }

    /// No unit is harmed by the treatment
    pub fn monotonicity(&self) -> bool {
        self.monotonicity
    }

    /// Treatment assignment is independent of potential outcomes
    pub fn exogeneity(&self) -> bool {
        self.exogeneity || self.strong_exogeneity
    }

    /// Exogeneity strong enough to pin PN and PS to point values
    pub fn strong_exogeneity(&self) -> bool {
        self.strong_exogeneity
    }

    /// The bound regime selected by these flags
    pub fn regime(&self) -> Regime {
        match (self.exogeneity(), self.monotonicity) {
            (false, false) => Regime::Unconstrained,
            (true, false) => Regime::Exogenous,
            (false, true) => Regime::Monotone,
            (true, true) => Regime::ExogenousMonotone,
        }
    }
}

/// One of the four mutually exclusive bound regimes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Neither exogeneity nor monotonicity
    Unconstrained,
    /// Exogeneity only
    Exogenous,
    /// Monotonicity only
    Monotone,
    /// Exogeneity and monotonicity
    ExogenousMonotone,
}

impl Regime {
    /// Regime name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Unconstrained => "unconstrained",
            Regime::Exogenous => "exogenous",
            Regime::Monotone => "monotone",
            Regime::ExogenousMonotone => "exogenous_monotone",
        }
    }

    /// Monotone regimes collapse every bound to a point
    pub fn is_point_identified(&self) -> bool {
        matches!(self, Regime::Monotone | Regime::ExogenousMonotone)
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
