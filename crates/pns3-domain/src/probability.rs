//! Validated probability structures
//!
//! Both structures are binary: treatment `x ∈ {0, 1}` and outcome
//! `y ∈ {0, 1}`. A value of either type is valid by construction; the
//! `validate_*` functions are exposed for callers that need to check raw
//! input without building anything.

use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};

/// Tolerance used when checking that a column or vector sums to 1
pub const TOLERANCE: f64 = 1e-5;

/// Check that `v` is a valid 2-entry probability vector
pub fn validate_probability_vector(v: &[f64]) -> Result<()> {
    if v.len() != 2 {
        return Err(ValidationError::Shape {
            expected: "2",
            found: v.len().to_string(),
        });
    }

    for (i, &value) in v.iter().enumerate() {
        check_range(value, || format!("[{}]", i))?;
    }

    check_sum(v.iter().sum(), || "probability vector".to_string())
}

/// Check that `rows` is a valid 2x2 transition matrix indexed `[y][x]`
///
/// Shape is checked first, then the range of every entry, then that each
/// column sums to 1.
pub fn validate_transition_matrix<R: AsRef<[f64]>>(rows: &[R]) -> Result<()> {
    let shape_ok = rows.len() == 2 && rows.iter().all(|r| r.as_ref().len() == 2);
    if !shape_ok {
        let found = match rows.iter().map(|r| r.as_ref().len()).max() {
            Some(cols) => format!("{}x{}", rows.len(), cols),
            None => "0x0".to_string(),
        };
        return Err(ValidationError::Shape {
            expected: "2x2",
            found,
        });
    }

    for (y, row) in rows.iter().enumerate() {
        for (x, &value) in row.as_ref().iter().enumerate() {
            check_range(value, || format!("[{}, {}]", y, x))?;
        }
    }

    for x in 0..2 {
        let sum = rows[0].as_ref()[x] + rows[1].as_ref()[x];
        check_sum(sum, || format!("column {}", x))?;
    }

    Ok(())
}

fn check_range(value: f64, index: impl FnOnce() -> String) -> Result<()> {
    // NaN fails `contains` as well
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::Range {
            index: index(),
            value,
        });
    }
    Ok(())
}

fn check_sum(sum: f64, what: impl FnOnce() -> String) -> Result<()> {
    if (sum - 1.0).abs() >= TOLERANCE {
        return Err(ValidationError::Stochasticity {
            what: what(),
            sum,
            tolerance: TOLERANCE,
        });
    }
    Ok(())
}

/// Marginal distribution of the treatment: `(P(x=0), P(x=1))`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct ProbabilityVector([f64; 2]);

impl ProbabilityVector {
    /// Create a vector from both entries
    pub fn new(values: [f64; 2]) -> Result<Self> {
        validate_probability_vector(&values)?;
        Ok(Self(values))
    }

    /// Create a vector from a dynamically sized slice
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        validate_probability_vector(values)?;
        Ok(Self([values[0], values[1]]))
    }

    /// Create `[1 - p1, p1]` from the single free parameter `P(x=1)`
    pub fn from_treated(p1: f64) -> Result<Self> {
        Self::new([1.0 - p1, p1])
    }

    /// Uniform distribution `[0.5, 0.5]`
    pub fn uniform() -> Self {
        Self([0.5, 0.5])
    }

    /// `P(x=0)`
    pub fn p0(&self) -> f64 {
        self.0[0]
    }

    /// `P(x=1)`
    pub fn p1(&self) -> f64 {
        self.0[1]
    }

    /// Entry `i`; panics if `i > 1`
    pub fn get(&self, i: usize) -> f64 {
        self.0[i]
    }

    /// Both entries as an array
    pub fn as_array(&self) -> [f64; 2] {
        self.0
    }
}

impl TryFrom<Vec<f64>> for ProbabilityVector {
    type Error = ValidationError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::from_slice(&values)
    }
}

impl From<ProbabilityVector> for Vec<f64> {
    fn from(v: ProbabilityVector) -> Self {
        v.0.to_vec()
    }
}

/// Column-stochastic 2x2 matrix `M[y][x] = P(y | x)`
///
/// Used for both the observational matrix O_{y|x} and the experimental
/// matrix E_{y|x}.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct TransitionMatrix([[f64; 2]; 2]);

impl TransitionMatrix {
    /// Create a matrix from rows indexed `[y][x]`
    pub fn new(rows: [[f64; 2]; 2]) -> Result<Self> {
        validate_transition_matrix(&rows)?;
        Ok(Self(rows))
    }

    /// Create a matrix from dynamically sized rows
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        validate_transition_matrix(rows)?;
        let r0 = rows[0].as_ref();
        let r1 = rows[1].as_ref();
        Ok(Self([[r0[0], r0[1]], [r1[0], r1[1]]]))
    }

    /// Create a matrix from its two free parameters, `P(y=1|x=0)` and
    /// `P(y=1|x=1)`
    pub fn from_outcome_probs(p1_given_x0: f64, p1_given_x1: f64) -> Result<Self> {
        Self::new([
            [1.0 - p1_given_x0, 1.0 - p1_given_x1],
            [p1_given_x0, p1_given_x1],
        ])
    }

    /// Uniform matrix, every entry 0.5
    pub fn uniform() -> Self {
        Self([[0.5, 0.5], [0.5, 0.5]])
    }

    /// `P(y | x)`; panics if either index is greater than 1
    pub fn get(&self, y: usize, x: usize) -> f64 {
        self.0[y][x]
    }

    /// The conditional distribution of `y` given `x`
    pub fn column(&self, x: usize) -> [f64; 2] {
        [self.0[0][x], self.0[1][x]]
    }

    /// Rows as an array indexed `[y][x]`
    pub fn as_array(&self) -> [[f64; 2]; 2] {
        self.0
    }
}

impl TryFrom<Vec<Vec<f64>>> for TransitionMatrix {
    type Error = ValidationError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(&rows)
    }
}

impl From<TransitionMatrix> for Vec<Vec<f64>> {
    fn from(m: TransitionMatrix) -> Self {
        m.0.iter().map(|row| row.to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_matrix() {
        let m = TransitionMatrix::new([[0.3, 0.73], [0.7, 0.27]]).unwrap();
        assert_eq!(m.get(1, 0), 0.7);
        assert_eq!(m.column(1), [0.73, 0.27]);
    }

    #[test]
    fn test_matrix_wrong_shape() {
        let rows = vec![vec![0.5, 0.5, 0.0], vec![0.5, 0.5, 1.0]];
        match TransitionMatrix::from_rows(&rows) {
            Err(ValidationError::Shape { expected, found }) => {
                assert_eq!(expected, "2x2");
                assert_eq!(found, "2x3");
            }
            other => panic!("Expected Shape error, got {:?}", other),
        }

        let rows = vec![vec![1.0, 1.0]];
        assert!(matches!(
            TransitionMatrix::from_rows(&rows),
            Err(ValidationError::Shape { .. })
        ));
    }

    #[test]
    fn test_matrix_out_of_range() {
        let result = TransitionMatrix::new([[1.2, 0.5], [-0.2, 0.5]]);
        match result {
            Err(ValidationError::Range { index, value }) => {
                assert_eq!(index, "[0, 0]");
                assert_eq!(value, 1.2);
            }
            other => panic!("Expected Range error, got {:?}", other),
        }
    }

    #[test]
    fn test_matrix_nan_is_out_of_range() {
        let result = TransitionMatrix::new([[f64::NAN, 0.5], [0.5, 0.5]]);
        assert!(matches!(result, Err(ValidationError::Range { .. })));
    }

    #[test]
    fn test_matrix_column_must_sum_to_one() {
        let result = TransitionMatrix::new([[0.3, 0.5], [0.6, 0.5]]);
        match result {
            Err(ValidationError::Stochasticity { what, .. }) => assert_eq!(what, "column 0"),
            other => panic!("Expected Stochasticity error, got {:?}", other),
        }
    }

    #[test]
    fn test_matrix_sum_within_tolerance() {
        assert!(TransitionMatrix::new([[0.3, 0.5], [0.700004, 0.5]]).is_ok());
        assert!(TransitionMatrix::new([[0.3, 0.5], [0.70002, 0.5]]).is_err());
    }

    #[test]
    fn test_from_outcome_probs() {
        let m = TransitionMatrix::from_outcome_probs(0.21, 0.48).unwrap();
        assert!((m.get(0, 0) - 0.79).abs() < 1e-12);
        assert!((m.get(0, 1) - 0.52).abs() < 1e-12);
        assert!(TransitionMatrix::from_outcome_probs(1.5, 0.5).is_err());
    }

    #[test]
    fn test_vector_validation() {
        assert!(ProbabilityVector::new([0.3, 0.7]).is_ok());
        assert!(matches!(
            ProbabilityVector::from_slice(&[0.2, 0.3, 0.5]),
            Err(ValidationError::Shape { .. })
        ));
        assert!(matches!(
            ProbabilityVector::new([-0.1, 1.1]),
            Err(ValidationError::Range { .. })
        ));
        assert!(matches!(
            ProbabilityVector::new([0.3, 0.6]),
            Err(ValidationError::Stochasticity { .. })
        ));
    }

    #[test]
    fn test_vector_from_treated() {
        let px = ProbabilityVector::from_treated(0.7).unwrap();
        assert!((px.p0() - 0.3).abs() < 1e-12);
        assert_eq!(px.p1(), 0.7);
    }

    #[test]
    fn test_serde_validates() {
        let m: TransitionMatrix = serde_json::from_str("[[0.3, 0.73], [0.7, 0.27]]").unwrap();
        assert_eq!(m.get(1, 1), 0.27);

        let bad = serde_json::from_str::<TransitionMatrix>("[[0.3, 0.73], [0.6, 0.27]]");
        assert!(bad.is_err());

        let px: ProbabilityVector = serde_json::from_str("[0.3, 0.7]").unwrap();
        assert_eq!(serde_json::to_string(&px).unwrap(), "[0.3,0.7]");
    }
}
