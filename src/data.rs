//! Response matrix: respondents × items.
//!
//! A [`ResponseMatrix`] is an immutable, column-major table of finite scores.
//! Rows are respondents (identified only by position), columns are uniquely
//! named items that the caller has already reverse-scored where needed.
//!
//! # Examples
//!
//! ```
//! use u_reliability::data::ResponseMatrix;
//!
//! let data = ResponseMatrix::new(
//!     ["q1", "q2", "q3"],
//!     vec![
//!         vec![4.0, 5.0, 4.0],
//!         vec![2.0, 1.0, 2.0],
//!         vec![3.0, 3.0, 4.0],
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(data.n_items(), 3);
//! assert_eq!(data.n_respondents(), 3);
//! assert_eq!(data.column("q2").unwrap(), &[5.0, 1.0, 3.0]);
//! ```

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{ReliabilityError, Result};

/// A per-item statistic, keyed by item name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemScore {
    /// Item (column) name.
    pub item: String,
    /// Statistic value for that item.
    pub value: f64,
}

impl ItemScore {
    pub(crate) fn new(item: impl Into<String>, value: f64) -> Self {
        Self {
            item: item.into(),
            value,
        }
    }
}

/// Looks up the value recorded for `name` in a per-item vector.
pub fn lookup(scores: &[ItemScore], name: &str) -> Option<f64> {
    scores.iter().find(|s| s.item == name).map(|s| s.value)
}

/// Immutable table of item responses with named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMatrix {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    n_rows: usize,
}

impl ResponseMatrix {
    /// Builds a matrix from row-major data (one inner vector per respondent).
    ///
    /// # Errors
    ///
    /// `InvalidData` if there are no items or no rows, a column name is empty
    /// or repeated, or any cell is NaN/infinite. `ShapeMismatch` if a row's
    /// length differs from the number of names.
    pub fn new<I, S>(names: I, rows: Vec<Vec<f64>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let k = names.len();

        let mut columns = vec![Vec::with_capacity(rows.len()); k];
        for (r, row) in rows.iter().enumerate() {
            if row.len() != k {
                return Err(ReliabilityError::shape_mismatch(format!(
                    "row {r} has {} cells, expected {k}",
                    row.len()
                )));
            }
            for (c, &v) in row.iter().enumerate() {
                columns[c].push(v);
            }
        }

        Self::from_columns(names, columns)
    }

    /// Builds a matrix from column-major data (one inner vector per item).
    ///
    /// # Errors
    ///
    /// Same conditions as [`ResponseMatrix::new`], with `ShapeMismatch` when
    /// columns differ in length or the name count differs from the column count.
    pub fn from_columns<I, S>(names: I, columns: Vec<Vec<f64>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        if names.is_empty() {
            return Err(ReliabilityError::invalid_data("matrix has no items"));
        }
        if names.len() != columns.len() {
            return Err(ReliabilityError::shape_mismatch(format!(
                "{} item names for {} columns",
                names.len(),
                columns.len()
            )));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if name.is_empty() {
                return Err(ReliabilityError::invalid_data("empty item name"));
            }
            if !seen.insert(name.as_str()) {
                return Err(ReliabilityError::invalid_data(format!(
                    "duplicate item name '{name}'"
                )));
            }
        }

        let n_rows = columns[0].len();
        if n_rows == 0 {
            return Err(ReliabilityError::invalid_data("matrix has no respondents"));
        }
        for (name, col) in names.iter().zip(&columns) {
            if col.len() != n_rows {
                return Err(ReliabilityError::shape_mismatch(format!(
                    "item '{name}' has {} responses, expected {n_rows}",
                    col.len()
                )));
            }
            if let Some(row) = col.iter().position(|v| !v.is_finite()) {
                return Err(ReliabilityError::invalid_data(format!(
                    "non-finite response for item '{name}' at row {row}"
                )));
            }
        }

        Ok(Self {
            names,
            columns,
            n_rows,
        })
    }

    /// Number of items (columns).
    pub fn n_items(&self) -> usize {
        self.names.len()
    }

    /// Number of respondents (rows).
    pub fn n_respondents(&self) -> usize {
        self.n_rows
    }

    /// Item names in column order.
    pub fn item_names(&self) -> &[String] {
        &self.names
    }

    /// All columns in item order.
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// Responses for the named item, or `None` if no such item exists.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.index_of(name).map(|i| self.columns[i].as_slice())
    }

    /// Column position of the named item.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Returns a new matrix holding only the named items, in the given order.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if a name is unknown; `InvalidData` if `names` is
    /// empty or repeats an item.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let mut picked = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let idx = self.index_of(name).ok_or_else(|| {
                ReliabilityError::shape_mismatch(format!("unknown item '{name}'"))
            })?;
            picked.push(idx);
        }
        self.select_indices(&picked)
    }

    /// Returns a new matrix holding the items at the given column positions.
    pub(crate) fn select_indices(&self, indices: &[usize]) -> Result<Self> {
        let names: Vec<String> = indices.iter().map(|&i| self.names[i].clone()).collect();
        let columns: Vec<Vec<f64>> = indices.iter().map(|&i| self.columns[i].clone()).collect();
        Self::from_columns(names, columns)
    }

    /// Returns a copy without the item at position `index`.
    pub(crate) fn without_index(&self, index: usize) -> Result<Self> {
        let keep: Vec<usize> = (0..self.n_items()).filter(|&i| i != index).collect();
        self.select_indices(&keep)
    }

    /// Row-wise arithmetic mean across all items.
    pub fn row_means(&self) -> Vec<f64> {
        let k = self.n_items() as f64;
        self.row_sums().into_iter().map(|s| s / k).collect()
    }

    /// Row-wise sum across all items.
    pub fn row_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.n_rows];
        for col in &self.columns {
            for (s, &v) in sums.iter_mut().zip(col) {
                *s += v;
            }
        }
        sums
    }

    /// Returns a copy with every response multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Result<Self> {
        let columns = self
            .columns
            .iter()
            .map(|c| c.iter().map(|v| v * factor).collect())
            .collect();
        Self::from_columns(self.names.clone(), columns)
    }
}
