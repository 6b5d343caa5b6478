use log::{debug, info, warn};

use crate::error::SolverError;
use crate::problem::LinearProgram;
use crate::solution::{self, Solution, SolutionStatus};
use crate::standard_form::{AugmentedSystem, Penalty};
use crate::tableau::Tableau;

pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Structured data for one pivot
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PivotEvent {
    /// 1-based pivot number within the solve call
    pub iteration: usize,
    /// Column entering the basis
    pub entering: usize,
    /// Row whose basic variable leaves
    pub leaving_row: usize,
    /// Column leaving the basis
    pub leaving: usize,
    /// Tableau entry at `(leaving_row, entering)` before normalization
    pub pivot_value: f64,
    /// Penalized objective of the new basis
    pub objective_value: f64,
}

/// Receives every pivot performed by [`SimplexSolver::solve_observed`]
pub trait IterationObserver {
    fn on_pivot(&mut self, event: &PivotEvent);
}

impl IterationObserver for () {
    fn on_pivot(&mut self, _event: &PivotEvent) {}
}

impl IterationObserver for Vec<PivotEvent> {
    fn on_pivot(&mut self, event: &PivotEvent) {
        self.push(event.clone());
    }
}

/// Big-M tableau simplex solver for a single linear program.
///
/// The tableau is built once at construction and mutated by every pivot, so
/// repeated calls to [`solve`](Self::solve) continue from where the previous
/// call stopped.
pub struct SimplexSolver<'a> {
    program: &'a LinearProgram,
    tableau: Tableau,
    /// Maximum pivots per solve call
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl<'a> SimplexSolver<'a> {
    /// Validate `program` and build its initial tableau with a scaled penalty.
    pub fn new(program: &'a LinearProgram) -> Result<Self, SolverError> {
        Self::with_penalty(program, Penalty::default())
    }

    pub fn with_penalty(program: &'a LinearProgram, penalty: Penalty) -> Result<Self, SolverError> {
        let system = AugmentedSystem::from_program(program, penalty)?;
        Ok(Self {
            program,
            tableau: Tableau::big_m(&system),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        })
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Negative or NaN tolerances are clamped to zero.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        if tol.is_nan() || tol < 0.0 {
            warn!("tolerance {} is not a non-negative number, using 0", tol);
        }
        self.tolerance = tol.max(0.0);
        self
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    pub fn solve(&mut self) -> Solution {
        self.solve_observed(&mut ())
    }

    /// Pivot until optimal, unbounded or out of budget, reporting each pivot
    /// to `observer`.
    pub fn solve_observed(&mut self, observer: &mut dyn IterationObserver) -> Solution {
        let mut iterations = 0;

        loop {
            if self.is_optimal() {
                return self.finish(iterations);
            }
            let Some(entering) = self.select_entering() else {
                return self.finish(iterations);
            };

            if iterations >= self.max_iterations {
                warn!(
                    "iteration limit of {} reached before convergence",
                    self.max_iterations
                );
                return Solution::without_values(SolutionStatus::MaxIterations, iterations);
            }

            let Some(leaving_row) = self.select_leaving(entering) else {
                info!("unbounded: column {} has no positive entry", entering);
                if let Some((row, col)) = self.positive_artificial() {
                    warn!(
                        "unbounded ray found while artificial x{} is still basic in row {} with value {}; \
                         the program may also be infeasible",
                        col,
                        row,
                        self.tableau.rhs(row)
                    );
                }
                return Solution::without_values(SolutionStatus::Unbounded, iterations);
            };

            let leaving = self.tableau.basis()[leaving_row];
            let pivot_value = self.tableau.get(leaving_row, entering);
            self.tableau.pivot(leaving_row, entering);
            iterations += 1;

            let event = PivotEvent {
                iteration: iterations,
                entering,
                leaving_row,
                leaving,
                pivot_value,
                objective_value: self.tableau.objective_value(),
            };
            debug!(
                "iteration {}: x{} enters, x{} leaves row {}, pivot {:.6}",
                event.iteration, event.entering, event.leaving, event.leaving_row, event.pivot_value
            );
            observer.on_pivot(&event);
        }
    }

    /// Every reduced cost is `>= -tolerance`
    pub fn is_optimal(&self) -> bool {
        self.tableau
            .reduced_costs()
            .iter()
            .all(|&d| d >= -self.tolerance)
    }

    /// Bland's rule: smallest column index with a negative reduced cost
    fn select_entering(&self) -> Option<usize> {
        self.tableau
            .reduced_costs()
            .iter()
            .position(|&d| d < -self.tolerance)
    }

    /// Minimum ratio test over rows with a positive entry in `col`. Ratios
    /// within tolerance are ties, resolved by the smallest basic column index.
    fn select_leaving(&self, col: usize) -> Option<usize> {
        let basis = self.tableau.basis();
        let mut best: Option<(usize, f64)> = None;

        for row in 0..self.tableau.num_rows() {
            let entry = self.tableau.get(row, col);
            if entry <= self.tolerance {
                continue;
            }
            let ratio = self.tableau.rhs(row) / entry;
            best = match best {
                None => Some((row, ratio)),
                Some((_, min)) if ratio < min - self.tolerance => Some((row, ratio)),
                Some((current, min)) if ratio <= min + self.tolerance && basis[row] < basis[current] => {
                    Some((row, ratio.min(min)))
                }
                keep => keep,
            };
        }

        best.map(|(row, _)| row)
    }

    /// First basic artificial whose value exceeds tolerance scaled by the
    /// right-hand side of the row it was created for
    fn positive_artificial(&self) -> Option<(usize, usize)> {
        self.tableau.basic_artificials().find(|&(row, col)| {
            self.tableau.rhs(row) > self.tolerance * self.tableau.artificial_scale(col)
        })
    }

    fn finish(&self, iterations: usize) -> Solution {
        if let Some((row, col)) = self.positive_artificial() {
            warn!(
                "infeasible: artificial x{} remains basic in row {} with value {}",
                col,
                row,
                self.tableau.rhs(row)
            );
            return Solution::without_values(SolutionStatus::Infeasible, iterations);
        }

        let (values, objective_value) = solution::extract(&self.tableau, self.program);
        info!(
            "optimal after {} iterations, objective {}",
            iterations, objective_value
        );
        Solution::optimal(values, objective_value, iterations)
    }
}
