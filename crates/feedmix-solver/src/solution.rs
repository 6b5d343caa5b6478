use std::fmt;

use crate::problem::LinearProgram;
use crate::tableau::Tableau;

/// The result of solving a linear program
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Optimal values of the original variables; `None` unless optimal
    pub values: Option<Vec<f64>>,
    /// Optimal objective value `c · x`; `None` unless optimal
    pub objective_value: Option<f64>,
    /// Pivots performed by the solve call that produced this result
    pub iterations: usize,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The objective decreases without limit.
    ///
    /// Reported as soon as an improving column has no positive entry, even if
    /// artificial variables are still basic, so an infeasible program with an
    /// improving ray also lands here.
    Unbounded,
    /// An artificial variable stays positive at the Big-M optimum
    Infeasible,
    /// The iteration budget ran out before a terminal state
    MaxIterations,
}

impl SolutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolutionStatus::Optimal => "optimal",
            SolutionStatus::Unbounded => "unbounded",
            SolutionStatus::Infeasible => "infeasible",
            SolutionStatus::MaxIterations => "max_iterations",
        }
    }
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Solution {
    pub fn optimal(values: Vec<f64>, objective_value: f64, iterations: usize) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            values: Some(values),
            objective_value: Some(objective_value),
            iterations,
        }
    }

    /// A terminal result that carries no solution vector
    pub fn without_values(status: SolutionStatus, iterations: usize) -> Self {
        Self {
            status,
            values: None,
            objective_value: None,
            iterations,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// The `(x, objective, status)` triple
    pub fn into_parts(self) -> (Option<Vec<f64>>, Option<f64>, SolutionStatus) {
        (self.values, self.objective_value, self.status)
    }
}

/// Read the original-variable values out of a terminal tableau through its
/// basis, and price them with the program's objective.
pub fn extract(tableau: &Tableau, program: &LinearProgram) -> (Vec<f64>, f64) {
    let mut values = tableau.column_values();
    values.truncate(tableau.num_original());
    let objective_value = program.objective_at(&values);
    (values, objective_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard_form::{AugmentedSystem, Penalty};

    #[test]
    fn test_into_parts() {
        let (x, obj, status) = Solution::optimal(vec![1.0, 2.0], 3.0, 4).into_parts();
        assert_eq!(x, Some(vec![1.0, 2.0]));
        assert_eq!(obj, Some(3.0));
        assert_eq!(status, SolutionStatus::Optimal);

        let (x, obj, status) = Solution::without_values(SolutionStatus::Unbounded, 1).into_parts();
        assert!(x.is_none());
        assert!(obj.is_none());
        assert_eq!(status.to_string(), "unbounded");
    }

    #[test]
    fn test_status_names() {
        assert_eq!(SolutionStatus::Optimal.as_str(), "optimal");
        assert_eq!(SolutionStatus::Infeasible.as_str(), "infeasible");
        assert_eq!(SolutionStatus::MaxIterations.as_str(), "max_iterations");
    }

    #[test]
    fn test_extract_reads_basis_not_columns() {
        // min -x0 - x1  s.t.  x0 + x1 <= 2
        let lp = LinearProgram::new(vec![-1.0, -1.0]).with_inequalities(vec![vec![1.0, 1.0]], vec![2.0]);
        let system = AugmentedSystem::from_program(&lp, Penalty::Scaled).unwrap();
        let mut tableau = Tableau::big_m(&system);
        tableau.pivot(0, 1);

        let (x, obj) = extract(&tableau, &lp);
        assert_eq!(x, vec![0.0, 2.0]);
        assert_eq!(obj, -2.0);
    }
}
