use log::trace;

use crate::error::SolverError;
use crate::problem::LinearProgram;

/// Base penalty weight for artificial variables
pub const BIG_M: f64 = 1e6;

/// How the Big-M penalty for artificial variables is chosen
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Penalty {
    /// `BIG_M * max(1, max |c_j|)`
    #[default]
    Scaled,
    /// A caller-chosen constant
    Fixed(f64),
}

impl Penalty {
    pub fn value(&self, objective: &[f64]) -> Result<f64, SolverError> {
        let m = match *self {
            Penalty::Scaled => {
                let largest = objective.iter().fold(1.0_f64, |acc, c| acc.max(c.abs()));
                BIG_M * largest
            }
            Penalty::Fixed(m) => m,
        };
        if !m.is_finite() || m <= 0.0 {
            return Err(SolverError::InvalidPenalty(m));
        }
        Ok(m)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Le,
    Eq,
}

struct PendingRow {
    coefficients: Vec<f64>,
    rhs: f64,
    kind: RowKind,
}

/// A linear program rewritten as `A · x = b, x >= 0` with slack, surplus and
/// artificial columns appended after the original variables.
///
/// Column layout: `[original | slack/surplus | artificial]`. Every row has one
/// designated initial basic column with coefficient `1`, and `b >= 0`.
#[derive(Debug, Clone)]
pub struct AugmentedSystem {
    pub matrix: Vec<Vec<f64>>,
    pub rhs: Vec<f64>,
    /// `c ++ zeros(n_slack) ++ [M] * n_artificial`
    pub costs: Vec<f64>,
    /// Initial basic column of each row
    pub basis: Vec<usize>,
    /// Rows carrying an artificial variable
    pub artificial_rows: Vec<usize>,
    pub n_original: usize,
    pub n_slack: usize,
    pub n_artificial: usize,
    pub penalty: f64,
}

impl AugmentedSystem {
    /// Expand `program` into augmented standard form.
    ///
    /// Row order: inequality rows, equality rows, then one row per positive
    /// lower bound and one per finite upper bound. Rows with a negative
    /// right-hand side are negated; a negated `<=` row gets a surplus column
    /// (`-1`) and an artificial column so its initial basis stays feasible.
    pub fn from_program(program: &LinearProgram, penalty: Penalty) -> Result<Self, SolverError> {
        program.validate()?;
        let m_penalty = penalty.value(&program.objective)?;
        let n = program.num_variables();

        let mut rows = Vec::new();
        if let Some(block) = &program.inequalities {
            for (row, &rhs) in block.coefficients.iter().zip(&block.rhs) {
                rows.push(PendingRow {
                    coefficients: row.clone(),
                    rhs,
                    kind: RowKind::Le,
                });
            }
        }
        if let Some(block) = &program.equalities {
            for (row, &rhs) in block.coefficients.iter().zip(&block.rhs) {
                rows.push(PendingRow {
                    coefficients: row.clone(),
                    rhs,
                    kind: RowKind::Eq,
                });
            }
        }
        for (i, bound) in program.bounds.iter().enumerate() {
            // x_i >= lower  =>  -x_i <= -lower
            if bound.lower > 0.0 {
                let mut coefficients = vec![0.0; n];
                coefficients[i] = -1.0;
                rows.push(PendingRow {
                    coefficients,
                    rhs: -bound.lower,
                    kind: RowKind::Le,
                });
            }
            if let Some(upper) = bound.upper.filter(|u| u.is_finite()) {
                let mut coefficients = vec![0.0; n];
                coefficients[i] = 1.0;
                rows.push(PendingRow {
                    coefficients,
                    rhs: upper,
                    kind: RowKind::Le,
                });
            }
        }

        let n_slack = rows.iter().filter(|r| r.kind == RowKind::Le).count();
        let n_artificial = rows
            .iter()
            .filter(|r| r.kind == RowKind::Eq || r.rhs < 0.0)
            .count();
        let n_total = n + n_slack + n_artificial;

        let mut matrix = Vec::with_capacity(rows.len());
        let mut rhs = Vec::with_capacity(rows.len());
        let mut basis = Vec::with_capacity(rows.len());
        let mut artificial_rows = Vec::with_capacity(n_artificial);

        let mut slack_idx = n;
        let mut artificial_idx = n + n_slack;

        for (i, row) in rows.into_iter().enumerate() {
            let sign = if row.rhs < 0.0 { -1.0 } else { 1.0 };
            let mut data = vec![0.0; n_total];
            for (j, coef) in row.coefficients.into_iter().enumerate() {
                data[j] = sign * coef;
            }

            let mut basic = None;
            if row.kind == RowKind::Le {
                data[slack_idx] = sign;
                if sign > 0.0 {
                    basic = Some(slack_idx);
                }
                slack_idx += 1;
            }
            let basic = match basic {
                Some(col) => col,
                None => {
                    data[artificial_idx] = 1.0;
                    artificial_rows.push(i);
                    artificial_idx += 1;
                    artificial_idx - 1
                }
            };

            matrix.push(data);
            rhs.push(sign * row.rhs);
            basis.push(basic);
        }

        let mut costs = program.objective.clone();
        costs.extend(std::iter::repeat_n(0.0, n_slack));
        costs.extend(std::iter::repeat_n(m_penalty, n_artificial));

        trace!(
            "augmented system: {} rows, {} original + {} slack + {} artificial columns, M = {}",
            matrix.len(),
            n,
            n_slack,
            n_artificial,
            m_penalty
        );

        Ok(Self {
            matrix,
            rhs,
            costs,
            basis,
            artificial_rows,
            n_original: n,
            n_slack,
            n_artificial,
            penalty: m_penalty,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.matrix.len()
    }

    pub fn num_columns(&self) -> usize {
        self.n_original + self.n_slack + self.n_artificial
    }
}
