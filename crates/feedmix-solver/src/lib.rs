mod error;
mod problem;
mod simplex;
mod solution;
mod standard_form;
mod tableau;

pub use error::SolverError;
pub use problem::{Bound, ConstraintBlock, ConstraintViolation, LinearProgram};
pub use simplex::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, IterationObserver, PivotEvent, SimplexSolver,
};
pub use solution::{Solution, SolutionStatus};
pub use standard_form::{AugmentedSystem, BIG_M, Penalty};
pub use tableau::Tableau;
