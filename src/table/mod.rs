//! # Named-Column Tables
//!
//! A [`Table`] is an insertion-ordered sequence of `(name, values)` columns
//! with uniform length and O(1) lookup by name. It is what the segment
//! selector produces, what derived-column expressions extend, and what the
//! exporters hand on for plotting.
//!
//! Assigning to an existing name replaces its values in place; columns are
//! never removed or reordered.

mod error;
mod export;
mod metadata;


use std::collections::HashMap;

pub use error::TableError;
pub use export::{
    export_file, to_record_batch, write_csv, write_json, write_parquet, CompressionType,
    ExportConfig, ExportFormat,
};
pub use metadata::{
    parse_legends, ExportMetadata, PlotMetadata, KEY_CREATED, KEY_FORMAT_VERSION, KEY_GENERATOR,
    KEY_INDEPENDENT_AXIS, KEY_INSTANCE, KEY_PLOT, KEY_SERIES, KEY_SOURCE_FILE,
    LOGTABLE_FORMAT_VERSION,
};

/// Ordered table of named `f64` columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    independent: String,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
}

impl Table {
    /// Create an empty table whose independent axis is `independent`
    pub fn new(independent: impl Into<String>) -> Self {
        Self::with_capacity(independent, 0)
    }

    /// Create an empty table with room for `columns` columns
    pub fn with_capacity(independent: impl Into<String>, columns: usize) -> Self {
        Self {
            independent: independent.into(),
            names: Vec::with_capacity(columns),
            columns: Vec::with_capacity(columns),
            index: HashMap::with_capacity(columns),
        }
    }

    /// Name of the column plotted on the x axis
    pub fn independent_axis(&self) -> &str {
        &self.independent
    }

    /// Number of rows (0 for a table without columns)
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Returns true if a column with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Values of the named column
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.index.get(name).map(|&i| self.columns[i].as_slice())
    }

    /// Position of the named column
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Iterate over `(name, values)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Values of row `row`, in column order
    pub fn row(&self, row: usize) -> Option<Vec<f64>> {
        if row >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| c[row]).collect())
    }

    /// Add a column, or replace the values of an existing one in place.
    ///
    /// The first column of an empty table fixes the row count; every later
    /// assignment must match it.
    pub fn set_column(&mut self, name: &str, values: Vec<f64>) -> Result<(), TableError> {
        if !self.is_empty() && values.len() != self.row_count() {
            return Err(TableError::LengthMismatch {
                column: name.to_string(),
                expected: self.row_count(),
                actual: values.len(),
            });
        }
        self.insert_column(name, values);
        Ok(())
    }

    /// Insert without the length check, for callers that build columns of
    /// equal length by construction.
    pub(crate) fn insert_column(&mut self, name: &str, values: Vec<f64>) {
        match self.index.get(name) {
            Some(&i) => self.columns[i] = values,
            None => {
                self.index.insert(name.to_string(), self.columns.len());
                self.names.push(name.to_string());
                self.columns.push(values);
            }
        }
    }
}
