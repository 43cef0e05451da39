//! A small dense matrix of `f64` values, stored row-major.
//!
//! This is not a linear algebra library and doesn't try to be one. The
//! equilibrium engine only ever needs to read entries, walk rows, and sum
//! columns, so that's all this type offers. Valuation matrices and
//! allocation matrices are both represented with it.

use crate::error::{Error, Result};
use getset::CopyGetters;

/// A dense row-major matrix. Rows index agents, columns index goods,
/// everywhere this type shows up in the crate.
#[derive(Clone, Debug, PartialEq, CopyGetters)]
#[cfg_attr(feature = "with_serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub struct Matrix {
    /// Number of rows
    #[getset(get_copy = "pub")]
    rows: usize,
    /// Number of columns
    #[getset(get_copy = "pub")]
    cols: usize,
    /// Row-major storage, `data[r * cols + c]`
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix of the given shape, filled with zero.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build a matrix from a list of rows. Every row must have the same
    /// length as the first.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(nrows * ncols);
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != ncols {
                Err(Error::RaggedMatrix(idx, row.len(), ncols))?;
            }
            data.extend(row);
        }
        Ok(Self { rows: nrows, cols: ncols, data })
    }

    /// Grab a single entry.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Set a single entry.
    pub fn set(&mut self, row: usize, col: usize, val: f64) {
        self.data[row * self.cols + col] = val;
    }

    /// A row as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Sum a column over all rows.
    pub fn col_sum(&self, col: usize) -> f64 {
        (0..self.rows).map(|r| self.get(r, col)).sum()
    }

    /// Dot product of a row with some other slice of length `cols`.
    pub fn row_dot(&self, row: usize, other: &[f64]) -> f64 {
        self.row(row).iter().zip(other).map(|(a, b)| a * b).sum()
    }

    /// Clamp every entry to be at least `min`. Used to absorb tiny negative
    /// values a solver can leave behind on non-negative variables.
    pub fn clip_min(&mut self, min: f64) {
        for val in self.data.iter_mut() {
            if *val < min {
                *val = min;
            }
        }
    }
}
