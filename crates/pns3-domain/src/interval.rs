//! Bound intervals

use serde::{Deserialize, Serialize};

/// Closed interval `[lower, upper]` on a probability of causation
///
/// Unlike a validated probability, an interval is not clamped: the
/// point-identified regimes can produce values outside [0, 1] when the
/// experimental data disagrees with the observational data, and callers
/// should see that rather than have it hidden.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
}

impl Interval {
    /// Create a new interval
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Degenerate interval `[value, value]`
    pub fn point(value: f64) -> Self {
        Self::new(value, value)
    }

    /// The whole unit interval `[0, 1]`
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Width of the interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Check if the interval collapses to a single value
    pub fn is_point(&self) -> bool {
        self.lower == self.upper
    }

    /// Check if no value satisfies both bounds
    pub fn is_empty(&self) -> bool {
        self.upper < self.lower
    }

    /// Check if the interval contains a value
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// As `[lower, upper]`
    pub fn as_array(&self) -> [f64; 2] {
        [self.lower, self.upper]
    }
}

/// Bounds on the trio (PNS, PN, PS)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pns3Bounds {
    /// Probability of necessity and sufficiency
    pub pns: Interval,
    /// Probability of necessity
    pub pn: Interval,
    /// Probability of sufficiency
    pub ps: Interval,
}

impl Pns3Bounds {
    /// Rows `{PNS, PN, PS}`, columns `{lower, upper}`
    pub fn as_array(&self) -> [[f64; 2]; 3] {
        [self.pns.as_array(), self.pn.as_array(), self.ps.as_array()]
    }

    /// Iterate `(label, interval)` in PNS, PN, PS order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Interval)> {
        [("PNS", self.pns), ("PN", self.pn), ("PS", self.ps)].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_creation() {
        let i = Interval::new(0.27, 0.279);
        assert_eq!(i.lower, 0.27);
        assert_eq!(i.upper, 0.279);
        assert!(!i.is_point());
        assert!(!i.is_empty());
    }

    #[test]
    fn test_width() {
        let i = Interval::new(0.5, 0.75);
        assert_eq!(i.width(), 0.25);
    }

    #[test]
    fn test_point_and_empty() {
        assert!(Interval::point(0.4).is_point());
        assert!(Interval::new(0.49, 0.489).is_empty());
        assert!(Interval::unit().contains(1.0));
        assert!(!Interval::unit().contains(1.01));
    }

    #[test]
    fn test_as_array_layout() {
        let b = Pns3Bounds {
            pns: Interval::new(0.0, 0.5),
            pn: Interval::unit(),
            ps: Interval::point(0.9),
        };
        assert_eq!(b.as_array(), [[0.0, 0.5], [0.0, 1.0], [0.9, 0.9]]);
        let labels: Vec<_> = b.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["PNS", "PN", "PS"]);
    }
}
