use thiserror::Error;

/// Errors raised while validating a linear program, before any tableau work
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Shape mismatch in {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    #[error("Invalid bounds for variable {index}: lower {lower} exceeds upper {upper}")]
    InvalidBounds { index: usize, lower: f64, upper: f64 },
    #[error("Negative lower bound {lower} for variable {index}; variables must be non-negative")]
    NegativeLowerBound { index: usize, lower: f64 },
    #[error("Non-finite value in {0}")]
    NonFiniteInput(String),
    #[error("Big-M penalty must be finite and positive, got {0}")]
    InvalidPenalty(f64),
}

impl SolverError {
    pub(crate) fn shape(what: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected,
            found,
        }
    }
}
