//! Location × measure pivot tables.
//!
//! A pivot arranges records into a dense matrix: one row per location and
//! release year, one column per measure id. Several records landing in the
//! same cell are averaged; cells without any record hold NaN.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::record::Record;

/// Geographic level of pivot rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotLevel {
    /// One row per county (FIPS code)
    County,
    /// One row per state; county values are averaged
    State,
}

/// Key of one pivot row
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PivotRow {
    /// County FIPS code or state abbreviation, depending on the level
    pub location: String,
    pub year: String,
}

/// Dense location × measure matrix
#[derive(Debug, Clone)]
pub struct PivotTable {
    level: PivotLevel,
    rows: Vec<PivotRow>,
    columns: Vec<String>,
    values: Array2<f64>,
}

impl PivotTable {
    /// Build a pivot from records, averaging duplicates
    pub fn from_records<'a, I>(records: I, level: PivotLevel) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let records: Vec<&Record> = records.into_iter().collect();

        let row_keys: BTreeSet<PivotRow> = records.iter().map(|r| row_key(r, level)).collect();
        let column_keys: BTreeSet<&str> = records.iter().map(|r| r.measure_id.as_str()).collect();

        let rows: Vec<PivotRow> = row_keys.into_iter().collect();
        let columns: Vec<String> = column_keys.into_iter().map(str::to_string).collect();

        let row_index: BTreeMap<&PivotRow, usize> =
            rows.iter().enumerate().map(|(i, r)| (r, i)).collect();
        let column_index: BTreeMap<&str, usize> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let shape = (rows.len(), columns.len());
        let mut sums = Array2::<f64>::zeros(shape);
        let mut counts = Array2::<u32>::zeros(shape);

        for record in &records {
            let key = row_key(record, level);
            let i = row_index[&key];
            let j = column_index[record.measure_id.as_str()];
            sums[[i, j]] += record.value;
            counts[[i, j]] += 1;
        }

        let values = Array2::from_shape_fn(shape, |(i, j)| match counts[[i, j]] {
            0 => f64::NAN,
            n => sums[[i, j]] / n as f64,
        });

        Self {
            level,
            rows,
            columns,
            values,
        }
    }

    pub fn level(&self) -> PivotLevel {
        self.level
    }

    /// Row keys, sorted by location then year
    pub fn rows(&self) -> &[PivotRow] {
        &self.rows
    }

    /// Measure ids, sorted
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The underlying matrix; missing cells are NaN
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, measure_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == measure_id)
    }

    /// Cell value for a location, year and measure id; `None` when absent
    pub fn get(&self, location: &str, year: &str, measure_id: &str) -> Option<f64> {
        let i = self
            .rows
            .iter()
            .position(|r| r.location == location && r.year == year)?;
        let j = self.column_index(measure_id)?;
        let value = self.values[[i, j]];
        (!value.is_nan()).then_some(value)
    }

    /// Values of two columns over the rows where both are present
    pub fn complete_pairs(&self, column_a: usize, column_b: usize) -> (Vec<f64>, Vec<f64>) {
        self.values
            .column(column_a)
            .iter()
            .zip(self.values.column(column_b).iter())
            .filter(|(a, b)| !a.is_nan() && !b.is_nan())
            .map(|(a, b)| (*a, *b))
            .unzip()
    }
}

fn row_key(record: &Record, level: PivotLevel) -> PivotRow {
    let location = match level {
        PivotLevel::County => record.location_id.clone(),
        PivotLevel::State => record.state_abbr.clone(),
    };
    PivotRow {
        location,
        year: record.year.clone(),
    }
}
