use crate::standard_form::AugmentedSystem;

/// Dense simplex tableau of shape `(m + 1, n_total + 1)`.
///
/// Rows `0..m` are constraints with the right-hand side in the last column.
/// Row `m` holds the reduced costs, and its last column is the negated
/// objective value of the current basis.
#[derive(Debug, Clone)]
pub struct Tableau {
    data: Vec<Vec<f64>>,
    /// Basic column of each constraint row
    basis: Vec<usize>,
    n_original: usize,
    n_slack: usize,
    n_artificial: usize,
    /// `max(1, |b|)` of the row each artificial column was created for,
    /// indexed by artificial ordinal
    artificial_scale: Vec<f64>,
}

impl Tableau {
    /// Build the initial Big-M tableau from an augmented system.
    ///
    /// The objective row starts as `c_extended`; the cost of each initial basic
    /// column is then eliminated by subtracting `cost * row`, so the row holds
    /// true reduced costs for the slack/artificial starting basis.
    pub fn big_m(system: &AugmentedSystem) -> Self {
        let m = system.num_rows();
        let n_total = system.num_columns();

        let mut data = Vec::with_capacity(m + 1);
        for (row, &rhs) in system.matrix.iter().zip(&system.rhs) {
            let mut r = Vec::with_capacity(n_total + 1);
            r.extend_from_slice(row);
            r.push(rhs);
            data.push(r);
        }

        let mut objective = system.costs.clone();
        objective.push(0.0);
        for &i in &system.artificial_rows {
            let factor = system.costs[system.basis[i]];
            for (o, a) in objective.iter_mut().zip(&data[i]) {
                *o -= factor * a;
            }
        }
        data.push(objective);

        let artificial_scale = system
            .artificial_rows
            .iter()
            .map(|&i| system.rhs[i].abs().max(1.0))
            .collect();

        Self {
            data,
            basis: system.basis.clone(),
            n_original: system.n_original,
            n_slack: system.n_slack,
            n_artificial: system.n_artificial,
            artificial_scale,
        }
    }

    /// Number of constraint rows
    pub fn num_rows(&self) -> usize {
        self.data.len() - 1
    }

    /// Number of variable columns, excluding the right-hand side
    pub fn num_columns(&self) -> usize {
        self.n_original + self.n_slack + self.n_artificial
    }

    pub fn num_original(&self) -> usize {
        self.n_original
    }

    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    /// Magnitude of the initial right-hand side behind artificial column
    /// `col`, floor 1
    pub fn artificial_scale(&self, col: usize) -> f64 {
        self.artificial_scale[col - self.n_original - self.n_slack]
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.data[row][self.num_columns()]
    }

    /// Objective row, excluding the right-hand side
    pub fn reduced_costs(&self) -> &[f64] {
        let n = self.num_columns();
        &self.data[self.num_rows()][..n]
    }

    /// `-T[m][n_total]`: the objective of the current basis, penalty included
    pub fn objective_value(&self) -> f64 {
        -self.data[self.num_rows()][self.num_columns()]
    }

    pub fn is_artificial(&self, col: usize) -> bool {
        col >= self.n_original + self.n_slack && col < self.num_columns()
    }

    /// Rows whose basic variable is artificial
    pub fn basic_artificials(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.basis
            .iter()
            .enumerate()
            .filter(|&(_, &col)| self.is_artificial(col))
            .map(|(row, &col)| (row, col))
    }

    /// Gauss-Jordan pivot on `(row, col)`; `col` becomes basic in `row`.
    pub fn pivot(&mut self, row: usize, col: usize) {
        let n_cols = self.data[row].len();
        let pivot_val = self.data[row][col];

        for j in 0..n_cols {
            self.data[row][j] /= pivot_val;
        }
        // exact unit in the pivot position
        self.data[row][col] = 1.0;

        let pivot_row = self.data[row].clone();
        for (i, r) in self.data.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = r[col];
            if factor == 0.0 {
                continue;
            }
            for (v, p) in r.iter_mut().zip(&pivot_row) {
                *v -= factor * p;
            }
            r[col] = 0.0;
        }

        self.basis[row] = col;
    }

    /// Values of all `n_total` columns under the current basis
    pub fn column_values(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.num_columns()];
        for (row, &col) in self.basis.iter().enumerate() {
            values[col] = self.rhs(row);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::LinearProgram;
    use crate::standard_form::Penalty;

    fn tableau_for(lp: &LinearProgram, penalty: f64) -> Tableau {
        let system = AugmentedSystem::from_program(lp, Penalty::Fixed(penalty)).unwrap();
        Tableau::big_m(&system)
    }

    #[test]
    fn test_shape() {
        let lp = LinearProgram::new(vec![1.0, 2.0])
            .with_inequalities(vec![vec![1.0, 1.0]], vec![4.0])
            .with_equalities(vec![vec![1.0, -1.0]], vec![1.0]);
        let t = tableau_for(&lp, 10.0);
        assert_eq!(t.num_rows(), 2);
        assert_eq!(t.num_columns(), 4);
        assert_eq!(t.reduced_costs().len(), 4);
        assert_eq!(t.rhs(0), 4.0);
        assert_eq!(t.rhs(1), 1.0);
    }

    #[test]
    fn test_penalty_eliminated_from_objective_row() {
        // min x0 + 2 x1  s.t.  x0 + x1 = 3,  M = 10
        let lp = LinearProgram::new(vec![1.0, 2.0]).with_equalities(vec![vec![1.0, 1.0]], vec![3.0]);
        let t = tableau_for(&lp, 10.0);

        // reduced costs: c - M * row; artificial column is basic so its cost is 0
        assert_eq!(t.reduced_costs(), &[1.0 - 10.0, 2.0 - 10.0, 0.0]);
        assert_eq!(t.objective_value(), 30.0);
        assert_eq!(t.basic_artificials().collect::<Vec<_>>(), vec![(0, 2)]);
    }

    #[test]
    fn test_artificial_scale_uses_own_row() {
        // x0 = 0.5, x0 = 4, x1 <= 1e7
        let lp = LinearProgram::new(vec![1.0, 0.0])
            .with_equalities(vec![vec![1.0, 0.0], vec![1.0, 0.0]], vec![0.5, 4.0])
            .with_inequalities(vec![vec![0.0, 1.0]], vec![1e7]);
        let t = tableau_for(&lp, 10.0);

        // columns: x0 x1 s0 a0 a1
        assert_eq!(t.artificial_scale(3), 1.0);
        assert_eq!(t.artificial_scale(4), 4.0);
    }

    #[test]
    fn test_slack_only_basis_has_zero_objective() {
        let lp = LinearProgram::new(vec![-3.0, -2.0]).with_inequalities(vec![vec![1.0, 1.0]], vec![4.0]);
        let t = tableau_for(&lp, 10.0);
        assert_eq!(t.reduced_costs(), &[-3.0, -2.0, 0.0]);
        assert_eq!(t.objective_value(), 0.0);
        assert_eq!(t.basis(), &[2]);
    }

    #[test]
    fn test_pivot_updates_basis_and_keeps_unit_columns() {
        let lp = LinearProgram::new(vec![-3.0, -2.0])
            .with_inequalities(vec![vec![1.0, 1.0], vec![2.0, 1.0]], vec![4.0, 6.0]);
        let mut t = tableau_for(&lp, 10.0);

        t.pivot(1, 0);
        assert_eq!(t.basis(), &[2, 0]);
        assert_eq!(t.get(1, 0), 1.0);
        assert_eq!(t.get(0, 0), 0.0);
        assert_eq!(t.reduced_costs()[0], 0.0);
        assert!((t.rhs(1) - 3.0).abs() < 1e-12);
        assert!((t.rhs(0) - 1.0).abs() < 1e-12);
        assert!((t.objective_value() + 9.0).abs() < 1e-12);

        let values = t.column_values();
        assert!((values[0] - 3.0).abs() < 1e-12);
        assert_eq!(values[1], 0.0);
    }
}
