//! Typed PLACES records.
//!
//! The API returns loosely-typed rows where every value, numbers included,
//! may arrive as a string. Rows are deserialized into [`RawRecord`] and then
//! validated into [`Record`], which only exists for the two supported
//! categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PlacesError, Result};

/// Measure category. Only these two categories are ever retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Upstream id `HLTHOUT`
    HealthOutcomes,
    /// Upstream id `RISKBEH`
    HealthRiskBehaviors,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::HealthOutcomes, Category::HealthRiskBehaviors];

    /// Human-readable label used by the API's `category` column
    pub fn label(self) -> &'static str {
        match self {
            Category::HealthOutcomes => "Health Outcomes",
            Category::HealthRiskBehaviors => "Health Risk Behaviors",
        }
    }

    /// Short id used by the API's `categoryid` column
    pub fn upstream_id(self) -> &'static str {
        match self {
            Category::HealthOutcomes => "HLTHOUT",
            Category::HealthRiskBehaviors => "RISKBEH",
        }
    }

    /// Look up a category by label or upstream id, case-insensitively
    pub fn lookup(value: &str) -> Option<Category> {
        let value = value.trim();
        Category::ALL.into_iter().find(|category| {
            category.label().eq_ignore_ascii_case(value)
                || category.upstream_id().eq_ignore_ascii_case(value)
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = PlacesError;

    fn from_str(s: &str) -> Result<Self> {
        Category::lookup(s).ok_or_else(|| {
            PlacesError::invalid_parameter(
                "category",
                format!(
                    "{:?} is not supported; expected \"{}\" or \"{}\"",
                    s,
                    Category::HealthOutcomes.label(),
                    Category::HealthRiskBehaviors.label()
                ),
            )
        })
    }
}

/// A value that may arrive as JSON text or as a JSON number
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Text value (Socrata's usual encoding)
    Text(String),
    /// Numeric value
    Number(f64),
}

impl RawValue {
    fn into_text(self) -> String {
        match self {
            RawValue::Text(text) => text,
            RawValue::Number(n) if n.fract() == 0.0 => format!("{}", n as i64),
            RawValue::Number(n) => n.to_string(),
        }
    }

    /// Parse as a number; blank text is treated as absent
    fn to_number(&self, field: &str) -> Result<Option<f64>> {
        match self {
            RawValue::Number(n) => Ok(Some(*n)),
            RawValue::Text(text) if text.trim().is_empty() => Ok(None),
            RawValue::Text(text) => match text.trim().parse::<f64>() {
                // `parse` also accepts "NaN" and "inf"
                Ok(n) if n.is_finite() => Ok(Some(n)),
                _ => Err(PlacesError::schema(format!(
                    "field {} is not a finite number: {:?}",
                    field, text
                ))),
            },
        }
    }
}

/// One row as returned by the county dataset, before validation
///
/// Unknown columns (`:id`, `geolocation`, footnotes, ...) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    pub year: Option<RawValue>,
    pub stateabbr: Option<String>,
    pub statedesc: Option<String>,
    pub locationname: Option<String>,
    pub locationid: Option<String>,
    pub category: Option<String>,
    pub categoryid: Option<String>,
    pub measure: Option<String>,
    pub measureid: Option<String>,
    pub short_question_text: Option<String>,
    pub data_value_unit: Option<String>,
    pub data_value_type: Option<String>,
    pub data_value: Option<RawValue>,
    pub low_confidence_limit: Option<RawValue>,
    pub high_confidence_limit: Option<RawValue>,
    pub totalpopulation: Option<RawValue>,
}

/// Outcome of validating one raw row
#[derive(Debug, Clone)]
pub enum Ingested {
    /// A valid record in a supported category
    Kept(Record),
    /// The row belongs to a category outside the allow-list
    OutOfScope,
    /// The row has no value (the provider suppresses small-population estimates)
    Suppressed,
}

/// One county/measure observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Release year of the estimate
    pub year: String,
    /// State abbreviation, e.g. `WI`
    pub state_abbr: String,
    /// State name, e.g. `Wisconsin`
    pub state_name: Option<String>,
    /// County FIPS code, e.g. `55039`
    pub location_id: String,
    /// County name, e.g. `Fond du Lac`
    pub location_name: String,
    pub category: Category,
    /// Measure id, e.g. `STROKE`
    pub measure_id: String,
    /// Measure short name, e.g. `Stroke`
    pub short_name: String,
    /// Full measure text, e.g. `Stroke among adults`
    pub measure: String,
    pub value: f64,
    pub value_unit: Option<String>,
    pub value_type: Option<String>,
    pub low_confidence_limit: Option<f64>,
    pub high_confidence_limit: Option<f64>,
    pub total_population: Option<f64>,
}

impl Record {
    /// Whether this record is for `measure`, given either as id or short name
    pub fn matches_measure(&self, measure: &str) -> bool {
        self.measure_id == measure || self.short_name == measure
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PlacesError::schema(format!(
            "missing required field {}",
            field
        ))),
    }
}

fn optional_number(value: &Option<RawValue>, field: &str) -> Result<Option<f64>> {
    match value {
        Some(v) => v.to_number(field),
        None => Ok(None),
    }
}

impl RawRecord {
    /// Resolve the row's category; `None` means a category outside the allow-list
    fn resolve_category(&self) -> Result<Option<Category>> {
        match (&self.categoryid, &self.category) {
            (Some(id), _) => Ok(Category::lookup(id)),
            (None, Some(label)) => Ok(Category::lookup(label)),
            (None, None) => Err(PlacesError::schema(
                "row has neither categoryid nor category",
            )),
        }
    }

    /// Validate this row into a [`Record`]
    pub fn ingest(self) -> Result<Ingested> {
        let category = match self.resolve_category()? {
            Some(category) => category,
            None => return Ok(Ingested::OutOfScope),
        };

        let value = match optional_number(&self.data_value, "data_value")? {
            Some(value) => value,
            None => return Ok(Ingested::Suppressed),
        };

        let low_confidence_limit =
            optional_number(&self.low_confidence_limit, "low_confidence_limit")?;
        let high_confidence_limit =
            optional_number(&self.high_confidence_limit, "high_confidence_limit")?;
        let total_population = optional_number(&self.totalpopulation, "totalpopulation")?;

        let year = required(self.year.map(RawValue::into_text), "year")?;
        let location_id = required(self.locationid, "locationid")?;
        let measure_id = required(self.measureid, "measureid")?;
        let short_name = required(self.short_question_text, "short_question_text")?;
        let state_abbr = required(self.stateabbr, "stateabbr")?;
        let location_name = self.locationname.unwrap_or_else(|| location_id.clone());
        let measure = self.measure.unwrap_or_else(|| short_name.clone());

        Ok(Ingested::Kept(Record {
            year,
            state_abbr,
            state_name: self.statedesc,
            location_id,
            location_name,
            category,
            measure_id,
            short_name,
            measure,
            value,
            value_unit: self.data_value_unit,
            value_type: self.data_value_type,
            low_confidence_limit,
            high_confidence_limit,
            total_population,
        }))
    }
}

/// A measure described by the PLACES data dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureDefinition {
    /// Measure id, e.g. `LPA`
    pub id: String,
    pub short_name: String,
    pub full_name: String,
    pub category: Category,
}

/// One data dictionary row, before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeasureDefinition {
    pub measureid: Option<String>,
    pub measure_short_name: Option<String>,
    pub measure_full_name: Option<String>,
    pub category_name: Option<String>,
    pub categoryid: Option<String>,
}

impl RawMeasureDefinition {
    /// Validate into a [`MeasureDefinition`]; `Ok(None)` for other categories
    pub fn ingest(self) -> Result<Option<MeasureDefinition>> {
        let category = match (&self.categoryid, &self.category_name) {
            (Some(id), _) => Category::lookup(id),
            (None, Some(label)) => Category::lookup(label),
            (None, None) => {
                return Err(PlacesError::schema(
                    "dictionary row has neither categoryid nor category_name",
                ))
            }
        };
        let Some(category) = category else {
            return Ok(None);
        };

        let id = required(self.measureid, "measureid")?;
        let short_name = required(self.measure_short_name, "measure_short_name")?;
        let full_name = self.measure_full_name.unwrap_or_else(|| short_name.clone());

        Ok(Some(MeasureDefinition {
            id,
            short_name,
            full_name,
            category,
        }))
    }
}
