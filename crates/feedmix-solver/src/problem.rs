use crate::error::SolverError;

/// A linear program in minimization form:
///
/// ```text
/// minimize    c · x
/// subject to  A_eq · x  = b_eq
///             A_ub · x <= b_ub
///             lower_i <= x_i <= upper_i
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    /// Objective coefficients, one per variable
    pub objective: Vec<f64>,
    /// Equality block `A_eq · x = b_eq`
    #[cfg_attr(feature = "serde", serde(default))]
    pub equalities: Option<ConstraintBlock>,
    /// Inequality block `A_ub · x <= b_ub`
    #[cfg_attr(feature = "serde", serde(default))]
    pub inequalities: Option<ConstraintBlock>,
    /// Per-variable bounds
    pub bounds: Vec<Bound>,
}

/// A dense block of constraint rows sharing one comparison operator
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintBlock {
    /// Row-major coefficients
    pub coefficients: Vec<Vec<f64>>,
    /// Right-hand side, one entry per row
    pub rhs: Vec<f64>,
}

/// Variable bound pair. `upper: None` means unbounded above.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub lower: f64,
    pub upper: Option<f64>,
}

impl Default for Bound {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: None,
        }
    }
}

impl Bound {
    /// Build a bound; an infinite `upper` is stored as unbounded.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper: if upper == f64::INFINITY { None } else { Some(upper) },
        }
    }

    pub fn at_least(lower: f64) -> Self {
        Self { lower, upper: None }
    }

    pub fn upper_or_infinity(&self) -> f64 {
        self.upper.unwrap_or(f64::INFINITY)
    }
}

/// A constraint not satisfied by a candidate point
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    /// Row label, e.g. `eq[0]`, `ub[3]`, `lower[1]`, `upper[1]`
    pub constraint: String,
    /// Required value (right-hand side or bound)
    pub required: f64,
    /// Value achieved by the candidate point
    pub actual: f64,
    /// How far outside the feasible side the point is
    pub violation_amount: f64,
    pub description: String,
}

fn dot(row: &[f64], x: &[f64]) -> f64 {
    row.iter().zip(x).map(|(a, v)| a * v).sum()
}

impl ConstraintBlock {
    pub fn new(coefficients: Vec<Vec<f64>>, rhs: Vec<f64>) -> Self {
        Self { coefficients, rhs }
    }

    pub fn num_rows(&self) -> usize {
        self.coefficients.len()
    }

    fn validate(&self, name: &str, n_vars: usize) -> Result<(), SolverError> {
        if self.rhs.len() != self.coefficients.len() {
            return Err(SolverError::shape(
                format!("{name} right-hand side"),
                self.coefficients.len(),
                self.rhs.len(),
            ));
        }
        for (i, row) in self.coefficients.iter().enumerate() {
            if row.len() != n_vars {
                return Err(SolverError::shape(format!("{name} row {i}"), n_vars, row.len()));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(SolverError::NonFiniteInput(format!("{name} row {i}")));
            }
        }
        if self.rhs.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::NonFiniteInput(format!("{name} right-hand side")));
        }
        Ok(())
    }
}

impl LinearProgram {
    /// A program over `objective.len()` variables, each bounded to `[0, +inf)`.
    pub fn new(objective: Vec<f64>) -> Self {
        let n = objective.len();
        Self {
            objective,
            equalities: None,
            inequalities: None,
            bounds: vec![Bound::default(); n],
        }
    }

    pub fn with_equalities(mut self, coefficients: Vec<Vec<f64>>, rhs: Vec<f64>) -> Self {
        self.equalities = Some(ConstraintBlock::new(coefficients, rhs));
        self
    }

    pub fn with_inequalities(mut self, coefficients: Vec<Vec<f64>>, rhs: Vec<f64>) -> Self {
        self.inequalities = Some(ConstraintBlock::new(coefficients, rhs));
        self
    }

    pub fn with_bounds(mut self, bounds: Vec<Bound>) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_equalities(&self) -> usize {
        self.equalities.as_ref().map_or(0, ConstraintBlock::num_rows)
    }

    pub fn num_inequalities(&self) -> usize {
        self.inequalities.as_ref().map_or(0, ConstraintBlock::num_rows)
    }

    /// Check dimensions, finiteness and bound ordering.
    pub fn validate(&self) -> Result<(), SolverError> {
        let n = self.num_variables();
        if self.objective.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::NonFiniteInput("objective".to_string()));
        }
        if let Some(block) = &self.equalities {
            block.validate("equality", n)?;
        }
        if let Some(block) = &self.inequalities {
            block.validate("inequality", n)?;
        }
        if self.bounds.len() != n {
            return Err(SolverError::shape("bounds", n, self.bounds.len()));
        }
        for (index, bound) in self.bounds.iter().enumerate() {
            if !bound.lower.is_finite() {
                return Err(SolverError::NonFiniteInput(format!("lower bound {index}")));
            }
            if bound.lower < 0.0 {
                return Err(SolverError::NegativeLowerBound {
                    index,
                    lower: bound.lower,
                });
            }
            let upper = bound.upper_or_infinity();
            if upper.is_nan() {
                return Err(SolverError::NonFiniteInput(format!("upper bound {index}")));
            }
            if bound.lower > upper {
                return Err(SolverError::InvalidBounds {
                    index,
                    lower: bound.lower,
                    upper,
                });
            }
        }
        Ok(())
    }

    /// Objective value `c · x`
    pub fn objective_at(&self, x: &[f64]) -> f64 {
        dot(&self.objective, x)
    }

    /// Every constraint and bound that `x` violates by more than `tolerance`,
    /// worst first.
    pub fn violations(&self, x: &[f64], tolerance: f64) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        if let Some(block) = &self.equalities {
            for (i, (row, &rhs)) in block.coefficients.iter().zip(&block.rhs).enumerate() {
                let lhs = dot(row, x);
                let diff = (lhs - rhs).abs();
                if diff > tolerance {
                    violations.push(ConstraintViolation {
                        constraint: format!("eq[{i}]"),
                        required: rhs,
                        actual: lhs,
                        violation_amount: diff,
                        description: format!("eq[{i}] requires exactly {rhs:.4} but got {lhs:.4}"),
                    });
                }
            }
        }

        if let Some(block) = &self.inequalities {
            for (i, (row, &rhs)) in block.coefficients.iter().zip(&block.rhs).enumerate() {
                let lhs = dot(row, x);
                if lhs > rhs + tolerance {
                    let amount = lhs - rhs;
                    violations.push(ConstraintViolation {
                        constraint: format!("ub[{i}]"),
                        required: rhs,
                        actual: lhs,
                        violation_amount: amount,
                        description: format!("ub[{i}] exceeds maximum of {rhs:.4} by {amount:.4}"),
                    });
                }
            }
        }

        for (i, bound) in self.bounds.iter().enumerate() {
            let value = x.get(i).copied().unwrap_or(0.0);
            if value < bound.lower - tolerance {
                let amount = bound.lower - value;
                violations.push(ConstraintViolation {
                    constraint: format!("lower[{i}]"),
                    required: bound.lower,
                    actual: value,
                    violation_amount: amount,
                    description: format!("x{i} is below minimum of {:.4} by {amount:.4}", bound.lower),
                });
            }
            if let Some(upper) = bound.upper {
                if value > upper + tolerance {
                    let amount = value - upper;
                    violations.push(ConstraintViolation {
                        constraint: format!("upper[{i}]"),
                        required: upper,
                        actual: value,
                        violation_amount: amount,
                        description: format!("x{i} exceeds maximum of {upper:.4} by {amount:.4}"),
                    });
                }
            }
        }

        violations.sort_by(|a, b| {
            b.violation_amount
                .partial_cmp(&a.violation_amount)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_to_non_negative_bounds() {
        let lp = LinearProgram::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(lp.bounds.len(), 3);
        assert!(lp.bounds.iter().all(|b| b.lower == 0.0 && b.upper.is_none()));
        assert!(lp.validate().is_ok());
    }

    #[test]
    fn test_bound_new_maps_infinity_to_unbounded() {
        assert_eq!(Bound::new(1.0, f64::INFINITY), Bound::at_least(1.0));
        assert_eq!(Bound::new(0.0, 5.0).upper, Some(5.0));
        assert_eq!(Bound::at_least(2.0).upper_or_infinity(), f64::INFINITY);
    }

    #[test]
    fn test_row_width_mismatch() {
        let lp = LinearProgram::new(vec![1.0, 1.0]).with_inequalities(vec![vec![1.0, 1.0, 1.0]], vec![4.0]);
        assert_eq!(
            lp.validate(),
            Err(SolverError::ShapeMismatch {
                what: "inequality row 0".to_string(),
                expected: 2,
                found: 3,
            })
        );
    }

    #[test]
    fn test_rhs_length_mismatch() {
        let lp = LinearProgram::new(vec![1.0]).with_equalities(vec![vec![1.0], vec![2.0]], vec![1.0]);
        match lp.validate() {
            Err(SolverError::ShapeMismatch { expected, found, .. }) => {
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("expected shape mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_bounds_length_mismatch() {
        let lp = LinearProgram::new(vec![1.0, 1.0]).with_bounds(vec![Bound::default()]);
        assert!(matches!(lp.validate(), Err(SolverError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_lower_above_upper() {
        let lp = LinearProgram::new(vec![1.0, 1.0]).with_bounds(vec![Bound::default(), Bound::new(3.0, 2.0)]);
        assert_eq!(
            lp.validate(),
            Err(SolverError::InvalidBounds {
                index: 1,
                lower: 3.0,
                upper: 2.0,
            })
        );
    }

    #[test]
    fn test_negative_lower_bound_rejected() {
        let lp = LinearProgram::new(vec![1.0]).with_bounds(vec![Bound::new(-1.0, 1.0)]);
        assert!(matches!(lp.validate(), Err(SolverError::NegativeLowerBound { index: 0, .. })));
    }

    #[test]
    fn test_nan_rejected() {
        let lp = LinearProgram::new(vec![f64::NAN]);
        assert!(matches!(lp.validate(), Err(SolverError::NonFiniteInput(_))));
    }

    #[test]
    fn test_violations_worst_first() {
        // x0 + x1 = 4, x0 <= 1, x1 <= 10 (bound)
        let lp = LinearProgram::new(vec![1.0, 1.0])
            .with_equalities(vec![vec![1.0, 1.0]], vec![4.0])
            .with_inequalities(vec![vec![1.0, 0.0]], vec![1.0])
            .with_bounds(vec![Bound::default(), Bound::new(0.0, 10.0)]);

        assert!(lp.violations(&[1.0, 3.0], 1e-9).is_empty());

        let violations = lp.violations(&[2.0, 12.0], 1e-9);
        let names: Vec<_> = violations.iter().map(|v| v.constraint.as_str()).collect();
        assert_eq!(names, vec!["eq[0]", "upper[1]", "ub[0]"]);
        assert!((violations[0].violation_amount - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_objective_at() {
        let lp = LinearProgram::new(vec![2.0, -1.0]);
        assert_eq!(lp.objective_at(&[3.0, 4.0]), 2.0);
    }
}
