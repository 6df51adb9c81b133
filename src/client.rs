//! The PLACES measures retriever.
//!
//! [`PlacesClient`] fetches one release (or the measure data dictionary),
//! pages through the Socrata endpoint, and validates rows into typed
//! records restricted to the supported categories.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info_span};

use crate::config::{ApiConfig, Config};
use crate::error::{PlacesError, Result};
use crate::logging::{
    generate_request_id, log_error, log_fetch_stats, log_operation_end, log_operation_start,
};
use crate::record::{Ingested, MeasureDefinition, RawMeasureDefinition, RawRecord};
use crate::release::{Release, DATA_DICTIONARY_ID};
use crate::table::MeasureTable;
use crate::transport::{HttpTransport, Transport};

/// Client for the CDC PLACES county datasets
#[derive(Debug)]
pub struct PlacesClient<T: Transport = HttpTransport> {
    config: ApiConfig,
    transport: T,
}

impl PlacesClient<HttpTransport> {
    /// Create a client from a validated configuration
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config.api)?;
        Ok(Self {
            config: config.api.clone(),
            transport,
        })
    }

    /// Create a client with default settings and the given application token
    pub fn with_token(token: impl Into<String>) -> Result<Self> {
        let mut config = Config::default();
        config.api.app_token = Some(token.into());
        Self::new(&config)
    }
}

impl<T: Transport> PlacesClient<T> {
    /// Create a client over a custom transport
    pub fn with_transport(config: ApiConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Query endpoint of a dataset
    pub fn dataset_url(&self, dataset_id: &str) -> String {
        format!("{}{}/query.json", self.config.base_url, dataset_id)
    }

    /// Fetch one release, keeping Health Outcomes and Health Risk Behaviors only
    ///
    /// Rows without a value are dropped. A release with no matching rows
    /// yields an empty table, not an error.
    pub fn fetch_release(&self, release: Release) -> Result<MeasureTable> {
        let request_id = generate_request_id();
        let span = info_span!(
            "fetch_release",
            release = %release,
            dataset_id = release.dataset_id(),
            request_id = %request_id
        );
        let _enter = span.enter();

        let start = Instant::now();
        log_operation_start("fetch_release", Some(release.as_str()));

        let result = self.fetch_county_rows(release.dataset_id());
        if let Err(e) = &result {
            log_error(e, "fetch_release");
        }
        let table = result?;

        log_operation_end("fetch_release", start, !table.is_empty());
        Ok(table)
    }

    /// Fetch several releases into one table, in the order given
    pub fn fetch_releases(&self, releases: &[Release]) -> Result<MeasureTable> {
        let mut combined = MeasureTable::new(Vec::new());
        for release in releases {
            combined.extend(self.fetch_release(*release)?);
        }
        Ok(combined)
    }

    /// Fetch the data dictionary entries of the supported categories
    pub fn fetch_measure_catalog(&self) -> Result<Vec<MeasureDefinition>> {
        let request_id = generate_request_id();
        let span = info_span!(
            "fetch_measure_catalog",
            dataset_id = DATA_DICTIONARY_ID,
            request_id = %request_id
        );
        let _enter = span.enter();

        let start = Instant::now();
        log_operation_start("fetch_measure_catalog", None);

        let result = self.fetch_rows(DATA_DICTIONARY_ID).and_then(|(rows, _)| {
            let mut definitions = Vec::new();
            for row in rows {
                let raw: RawMeasureDefinition = parse_row(row)?;
                if let Some(definition) = raw.ingest()? {
                    definitions.push(definition);
                }
            }
            Ok(definitions)
        });

        match &result {
            Ok(definitions) => {
                debug!(measure_count = definitions.len(), "Measure catalog fetched");
                log_operation_end("fetch_measure_catalog", start, !definitions.is_empty());
            }
            Err(e) => log_error(e, "fetch_measure_catalog"),
        }
        result
    }

    fn fetch_county_rows(&self, dataset_id: &str) -> Result<MeasureTable> {
        let (rows, pages) = self.fetch_rows(dataset_id)?;
        let rows_received = rows.len();

        let mut records = Vec::new();
        let mut suppressed = 0;
        for row in rows {
            let raw: RawRecord = parse_row(row)?;
            match raw.ingest()? {
                Ingested::Kept(record) => records.push(record),
                Ingested::Suppressed => suppressed += 1,
                Ingested::OutOfScope => {}
            }
        }

        log_fetch_stats(dataset_id, rows_received, records.len(), suppressed, pages);
        Ok(MeasureTable::new(records))
    }

    /// Page through a dataset with `$limit`/`$offset`, returning raw rows and the page count
    fn fetch_rows(&self, dataset_id: &str) -> Result<(Vec<Value>, usize)> {
        let url = self.dataset_url(dataset_id);
        let page_size = self.config.page_size;

        let mut rows = Vec::new();
        let mut pages = 0;

        loop {
            let limit = match self.config.max_records {
                Some(max) => page_size.min(max.saturating_sub(rows.len())),
                None => page_size,
            };
            if limit == 0 {
                break;
            }

            let query = vec![
                ("$limit".to_string(), limit.to_string()),
                ("$offset".to_string(), rows.len().to_string()),
                ("$order".to_string(), ":id".to_string()),
            ];

            let page = match self.transport.get_json(&url, &query)? {
                Value::Array(items) => items,
                other => {
                    return Err(PlacesError::schema(format!(
                        "expected a JSON array of rows from {}, got {}",
                        url,
                        json_kind(&other)
                    )))
                }
            };

            pages += 1;
            let received = page.len();
            debug!(page = pages, rows = received, offset = rows.len(), "Received page");
            rows.extend(page);

            if received < limit {
                break;
            }
        }

        Ok((rows, pages))
    }
}

fn parse_row<R: DeserializeOwned>(row: Value) -> Result<R> {
    serde_json::from_value(row).map_err(|e| PlacesError::schema(format!("malformed row: {}", e)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
