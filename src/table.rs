//! The in-memory measure table and its queries.
//!
//! A [`MeasureTable`] is an immutable snapshot produced by one fetch. Every
//! query borrows it and returns a new table or a computed value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::error::{PlacesError, Result};
use crate::pivot::{PivotLevel, PivotTable};
use crate::record::{Category, Record};
use crate::stats::{self, Summary};

/// Criteria for [`MeasureTable::filter_by`]
///
/// Supplied criteria are combined with AND; several values within one
/// criterion are combined with OR. Category strings are validated when the
/// filter is applied.
#[derive(Debug, Clone, Default)]
pub struct MeasureFilter {
    measures: Vec<String>,
    categories: Vec<String>,
    measure_ids: Vec<String>,
}

impl MeasureFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep records whose measure short name is `measure`
    pub fn measure(mut self, measure: impl Into<String>) -> Self {
        self.measures.push(measure.into());
        self
    }

    /// Keep records whose category is `category` (label or upstream id)
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Keep records whose measure id is `measure_id`
    pub fn measure_id(mut self, measure_id: impl Into<String>) -> Self {
        self.measure_ids.push(measure_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty() && self.categories.is_empty() && self.measure_ids.is_empty()
    }
}

/// Criteria for [`MeasureTable::filter_by_region`]
#[derive(Debug, Clone, Default)]
pub struct RegionFilter {
    states: Vec<String>,
    counties: Vec<String>,
}

impl RegionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep records in the state with this abbreviation
    pub fn state(mut self, state_abbr: impl Into<String>) -> Self {
        self.states.push(state_abbr.into());
        self
    }

    /// Keep records for the county with this FIPS code
    pub fn county(mut self, location_id: impl Into<String>) -> Self {
        self.counties.push(location_id.into());
        self
    }
}

/// Result of correlating two measures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    /// Pearson coefficient, in [-1, 1]
    pub coefficient: f64,
    /// Number of paired county observations
    pub sample_size: usize,
    pub mean_x: f64,
    pub mean_y: f64,
}

/// Records of one or more releases, in the order they were received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureTable {
    records: Vec<Record>,
    fetched_at: DateTime<Utc>,
}

impl MeasureTable {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            fetched_at: Utc::now(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// When the underlying data was retrieved
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Distinct release years present in the table
    pub fn years(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.year.as_str()).collect()
    }

    /// Append the records of another table, e.g. a second release
    pub fn extend(&mut self, other: MeasureTable) {
        self.records.extend(other.records);
        self.fetched_at = self.fetched_at.min(other.fetched_at);
    }

    fn derive(&self, records: Vec<Record>) -> Self {
        Self {
            records,
            fetched_at: self.fetched_at,
        }
    }

    /// Distinct measure short names, sorted
    pub fn list_measures(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.short_name.clone()).collect()
    }

    /// Distinct measure ids, sorted
    pub fn list_measure_ids(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.measure_id.clone()).collect()
    }

    /// Subset of records matching every supplied criterion
    ///
    /// Fails with [`PlacesError::InvalidParameter`] when a category is not
    /// one of the two supported categories. No match yields an empty table.
    pub fn filter_by(&self, filter: &MeasureFilter) -> Result<MeasureTable> {
        let categories = filter
            .categories
            .iter()
            .map(|c| c.parse::<Category>())
            .collect::<Result<Vec<_>>>()?;

        let records: Vec<Record> = self
            .records
            .iter()
            .filter(|r| filter.measures.is_empty() || filter.measures.contains(&r.short_name))
            .filter(|r| categories.is_empty() || categories.contains(&r.category))
            .filter(|r| {
                filter.measure_ids.is_empty() || filter.measure_ids.contains(&r.measure_id)
            })
            .cloned()
            .collect();

        debug!(
            operation = "filter_by",
            input = self.records.len(),
            output = records.len(),
            "Filtered measure table"
        );

        Ok(self.derive(records))
    }

    /// Subset of records in the listed states and counties
    pub fn filter_by_region(&self, filter: &RegionFilter) -> MeasureTable {
        let records = self
            .records
            .iter()
            .filter(|r| filter.states.is_empty() || filter.states.contains(&r.state_abbr))
            .filter(|r| filter.counties.is_empty() || filter.counties.contains(&r.location_id))
            .cloned()
            .collect();
        self.derive(records)
    }

    /// Location × measure matrix of this table
    pub fn pivot(&self, level: PivotLevel) -> PivotTable {
        PivotTable::from_records(&self.records, level)
    }

    /// Count, mean, min, max and standard deviation of one measure
    ///
    /// `measure` is a measure id or short name.
    pub fn summarize_measure(&self, measure: &str) -> Result<Summary> {
        let values: Vec<f64> = self
            .records
            .iter()
            .filter(|r| r.matches_measure(measure))
            .map(|r| r.value)
            .collect();

        if values.is_empty() {
            return Err(PlacesError::InsufficientData {
                message: format!("no values for measure {}", measure),
            });
        }

        stats::summarize(&values)
    }

    /// Pearson correlation between two measures across counties
    ///
    /// Measures are given by id or short name. Observations are paired on
    /// county and release year; repeated observations for the same pair key
    /// are averaged first.
    pub fn correlation(&self, measure_a: &str, measure_b: &str) -> Result<Correlation> {
        for (param, measure) in [("measure_a", measure_a), ("measure_b", measure_b)] {
            if measure.trim().is_empty() {
                return Err(PlacesError::invalid_parameter(
                    param,
                    "measure must not be empty",
                ));
            }
        }

        let id_a = self.resolve_measure_id(measure_a);
        let id_b = self.resolve_measure_id(measure_b);

        let (id_a, id_b) = match (id_a, id_b) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(PlacesError::InsufficientData {
                    message: format!(
                        "no observations for {} and {} in the table",
                        measure_a, measure_b
                    ),
                })
            }
        };

        let subset = self
            .records
            .iter()
            .filter(|r| r.measure_id == id_a || r.measure_id == id_b);
        let pivot = PivotTable::from_records(subset, PivotLevel::County);

        // Both ids resolved from records, so both columns exist
        let (column_a, column_b) = match (pivot.column_index(id_a), pivot.column_index(id_b)) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(PlacesError::InsufficientData {
                    message: format!("no observations for {} and {}", id_a, id_b),
                })
            }
        };

        let (x, y) = pivot.complete_pairs(column_a, column_b);
        let coefficient = stats::pearson(&x, &y, (measure_a, measure_b))?;

        debug!(
            operation = "correlation",
            measure_a = id_a,
            measure_b = id_b,
            sample_size = x.len(),
            coefficient = coefficient,
            "Computed correlation"
        );

        Ok(Correlation {
            coefficient,
            sample_size: x.len(),
            mean_x: stats::mean(&x),
            mean_y: stats::mean(&y),
        })
    }

    fn resolve_measure_id(&self, measure: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.matches_measure(measure))
            .map(|r| r.measure_id.as_str())
    }
}

impl From<Vec<Record>> for MeasureTable {
    fn from(records: Vec<Record>) -> Self {
        MeasureTable::new(records)
    }
}

impl<'a> IntoIterator for &'a MeasureTable {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
