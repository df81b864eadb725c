//! Dense pairwise squared distances and nearest-target assignment.

use crate::core::Point3;

/// Row-major |X| x |Y| matrix of squared Euclidean distances.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    values: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl DistanceMatrix {
    /// Number of rows (|X|)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (|Y|)
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Squared distance between `X[i]` and `Y[j]`
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[i * self.cols + j]
    }

    /// Row `i` as a slice
    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.cols..(i + 1) * self.cols]
    }

    /// Swap the roles of X and Y.
    pub fn transpose(&self) -> DistanceMatrix {
        let mut values = Vec::with_capacity(self.values.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                values.push(self.get(i, j));
            }
        }
        DistanceMatrix {
            values,
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Column of the smallest entry in row `i`; ties go to the lowest column.
    pub fn argmin_row(&self, i: usize) -> Option<usize> {
        first_argmin(self.row(i))
    }

    /// [`argmin_row`](Self::argmin_row) for every row, one entry per row.
    ///
    /// A row with no comparable entry (empty or all NaN) yields `None`.
    pub fn argmin_rows(&self) -> Vec<Option<usize>> {
        (0..self.rows).map(|i| self.argmin_row(i)).collect()
    }
}

/// Squared distances between every pair `(X[i], Y[j])`.
///
/// Each entry is the direct sum of squared coordinate differences, so
/// `pairwise_squared_distance(y, x)` is the exact transpose of
/// `pairwise_squared_distance(x, y)`.
pub fn pairwise_squared_distance(xs: &[Point3], ys: &[Point3]) -> DistanceMatrix {
    let mut values = Vec::with_capacity(xs.len() * ys.len());
    for x in xs {
        for y in ys {
            values.push(x.distance_squared(y));
        }
    }
    DistanceMatrix {
        values,
        rows: xs.len(),
        cols: ys.len(),
    }
}

/// Index of the first minimum. NaN entries never win.
pub fn first_argmin(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v >= b || v.is_nan() => {}
            None if v.is_nan() => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
