use crate::model::host_virus::{CORE_DIM, STATE_LABELS};

/// Column labels of the tabular view, in order.
pub const TABLE_COLUMNS: [&str; CORE_DIM + 1] = ["Time", "x1", "x2", "ys1", "y1", "y2", "zs", "z"];

/// Rows reserved up front; longer runs grow the buffers as they go.
const PRESIZE_ROW_LIMIT: usize = 1 << 20;

/// Ordered (time, state) samples of one run, starting with the initial condition.
///
/// States are stored row-major in one flat buffer; every row has `dimension()`
/// components. The table view (`column`, `table_row`) exposes `Time` plus the
/// seven core components, so an immune run's `c` is only reachable via `state`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    dim: usize,
    times: Vec<f64>,
    states: Vec<f64>,
}

impl Trajectory {
    pub(crate) fn with_capacity(dim: usize, rows: usize) -> Self {
        let rows = rows.min(PRESIZE_ROW_LIMIT);
        Self {
            dim,
            times: Vec::with_capacity(rows),
            states: Vec::with_capacity(rows.saturating_mul(dim)),
        }
    }

    pub(crate) fn push(&mut self, t: f64, state: &[f64]) {
        debug_assert_eq!(state.len(), self.dim);
        self.times.push(t);
        self.states.extend_from_slice(state);
    }

    /// Number of rows, including the initial one.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of integration steps taken (rows minus the initial condition).
    pub fn steps(&self) -> usize {
        self.len().saturating_sub(1)
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn state(&self, i: usize) -> &[f64] {
        &self.states[i * self.dim..(i + 1) * self.dim]
    }

    pub fn rows(&self) -> impl Iterator<Item = (f64, &[f64])> + '_ {
        self.times.iter().copied().zip(self.states.chunks_exact(self.dim))
    }

    pub fn first(&self) -> Option<(f64, &[f64])> {
        self.rows().next()
    }

    pub fn last(&self) -> Option<(f64, &[f64])> {
        let n = self.len();
        if n == 0 {
            None
        } else {
            Some((self.times[n - 1], self.state(n - 1)))
        }
    }

    /// Row `i` of the table view: `[Time, x1, x2, ys1, y1, y2, zs, z]`.
    pub fn table_row(&self, i: usize) -> [f64; CORE_DIM + 1] {
        let mut row = [0.0; CORE_DIM + 1];
        row[0] = self.times[i];
        row[1..].copy_from_slice(&self.state(i)[..CORE_DIM]);
        row
    }

    /// One column of the table view by label (`Time`, `x1`, ..., `z`).
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        if name == TABLE_COLUMNS[0] {
            return Some(self.times.clone());
        }
        let idx = STATE_LABELS[..CORE_DIM].iter().position(|l| *l == name)?;
        Some(self.states.chunks_exact(self.dim).map(|s| s[idx]).collect())
    }

    /// Several columns at once, e.g. `["Time", "x1", "ys1", "zs"]` for a phase-space projection.
    /// `None` if any label is unknown.
    pub fn components(&self, names: &[&str]) -> Option<Vec<Vec<f64>>> {
        names.iter().map(|n| self.column(n)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(dim: usize) -> Trajectory {
        let mut tr = Trajectory::with_capacity(dim, 3);
        for i in 0..3 {
            let state: Vec<f64> = (0..dim).map(|j| (10 * i + j) as f64).collect();
            tr.push(i as f64 * 0.5, &state);
        }
        tr
    }

    #[test]
    fn columns_by_label() {
        let tr = sample(7);
        assert_eq!(tr.len(), 3);
        assert_eq!(tr.steps(), 2);
        assert_eq!(tr.column("Time").unwrap(), vec![0.0, 0.5, 1.0]);
        assert_eq!(tr.column("ys1").unwrap(), vec![2.0, 12.0, 22.0]);
        assert!(tr.column("c").is_none());
        assert!(tr.components(&["Time", "bogus"]).is_none());
        assert_eq!(tr.last().unwrap().0, 1.0);
    }

    #[test]
    fn reservation_for_huge_runs_is_capped() {
        let mut tr = Trajectory::with_capacity(7, usize::MAX);
        assert!(tr.times.capacity() <= PRESIZE_ROW_LIMIT);
        assert!(tr.states.capacity() <= PRESIZE_ROW_LIMIT * 7);
        tr.push(0.0, &[1.0; 7]);
        assert_eq!(tr.len(), 1);
        assert_eq!(tr.state(0), &[1.0; 7]);
    }

    #[test]
    fn immune_rows_keep_full_state_but_table_drops_c() {
        let tr = sample(8);
        assert_eq!(tr.state(1).len(), 8);
        assert_eq!(tr.state(1)[7], 17.0);
        assert_eq!(tr.table_row(1), [0.5, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
    }
}
