//! Weighted bipartite assignment (Hungarian algorithm)
//!
//! Generic interface: a rectangular cost matrix in, a minimum-cost
//! row→column assignment out. Benchmark numbers must be auditable, so
//! the solver is explicit and self-contained instead of a library black
//! box. O(n² · m) with potentials; costs are plain `f64`.

/// Solve the min-cost assignment for `cost[row][col]`.
///
/// Returns, for each row, the assigned column (`None` when there are
/// more rows than columns and the row stays unassigned). Deterministic:
/// ties are broken by scanning order, so callers that pre-sort their
/// labels get a stable, reproducible assignment.
pub fn solve_assignment(cost: &[Vec<f64>]) -> Vec<Option<usize>> {
    let rows = cost.len();
    if rows == 0 {
        return Vec::new();
    }
    let cols = cost[0].len();
    debug_assert!(cost.iter().all(|r| r.len() == cols));
    if cols == 0 {
        return vec![None; rows];
    }

    if rows > cols {
        // Transpose so the row count never exceeds the column count.
        let transposed: Vec<Vec<f64>> = (0..cols)
            .map(|c| (0..rows).map(|r| cost[r][c]).collect())
            .collect();
        let col_to_row = solve_assignment(&transposed);
        let mut out = vec![None; rows];
        for (col, row) in col_to_row.into_iter().enumerate() {
            if let Some(row) = row {
                out[row] = Some(col);
            }
        }
        return out;
    }

    // Potentials formulation, 1-indexed with a virtual row/column 0.
    let inf = f64::INFINITY;
    let mut u = vec![0.0; rows + 1];
    let mut v = vec![0.0; cols + 1];
    // way[col] = previous column on the augmenting path
    let mut assigned_row = vec![0usize; cols + 1]; // 0 = free

    for row in 1..=rows {
        assigned_row[0] = row;
        let mut current_col = 0usize;
        let mut min_to = vec![inf; cols + 1];
        let mut way = vec![0usize; cols + 1];
        let mut used = vec![false; cols + 1];

        loop {
            used[current_col] = true;
            let here_row = assigned_row[current_col];
            let mut delta = inf;
            let mut next_col = 0usize;

            for col in 1..=cols {
                if used[col] {
                    continue;
                }
                let reduced = cost[here_row - 1][col - 1] - u[here_row] - v[col];
                if reduced < min_to[col] {
                    min_to[col] = reduced;
                    way[col] = current_col;
                }
                if min_to[col] < delta {
                    delta = min_to[col];
                    next_col = col;
                }
            }

            for col in 0..=cols {
                if used[col] {
                    u[assigned_row[col]] += delta;
                    v[col] -= delta;
                } else {
                    min_to[col] -= delta;
                }
            }

            current_col = next_col;
            if assigned_row[current_col] == 0 {
                break;
            }
        }

        // Unwind the augmenting path.
        while current_col != 0 {
            let prev = way[current_col];
            assigned_row[current_col] = assigned_row[prev];
            current_col = prev;
        }
    }

    let mut result = vec![None; rows];
    for col in 1..=cols {
        let row = assigned_row[col];
        if row != 0 {
            result[row - 1] = Some(col - 1);
        }
    }
    result
}

/// Maximize total weight instead of minimizing cost.
pub fn solve_max_assignment(weight: &[Vec<f64>]) -> Vec<Option<usize>> {
    let negated: Vec<Vec<f64>> = weight
        .iter()
        .map(|row| row.iter().map(|w| -w).collect())
        .collect();
    solve_assignment(&negated)
}
