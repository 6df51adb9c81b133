//! # places-client
//!
//! A client for the CDC PLACES county-level health measures.
//!
//! This library fetches a PLACES release from the Socrata API, keeps the
//! measures in the "Health Outcomes" and "Health Risk Behaviors" categories,
//! and offers queries over the resulting in-memory table.
//!
//! ## Key Features
//!
//! - **Typed ingestion**: loosely-typed API rows are validated into [`Record`]s
//! - **Category allow-list**: only the two supported categories ever reach a table
//! - **Queries**: list measures, filter by measure, category or region, pivot
//! - **Statistics**: per-measure summaries and Pearson correlation across counties
//!
//! ## Example
//!
//! ```no_run
//! use places_client::{MeasureFilter, PlacesClient, Release};
//!
//! # fn main() -> places_client::Result<()> {
//! let client = PlacesClient::with_token("my-app-token")?;
//! let table = client.fetch_release("2024".parse::<Release>()?)?;
//!
//! let obesity = table.filter_by(&MeasureFilter::new().measure("Obesity"))?;
//! println!("{} obesity records", obesity.len());
//!
//! let r = table.correlation("LPA", "DEPRESSION")?;
//! println!("r = {:.3} over {} counties", r.coefficient, r.sample_size);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod pivot;
pub mod record;
pub mod release;
pub mod stats;
pub mod table;
pub mod transport;

pub use client::PlacesClient;
pub use config::{ApiConfig, Config};
pub use error::{PlacesError, Result};
pub use logging::{
    generate_request_id, init_tracing, log_error, log_fetch_stats, log_operation_end,
    log_operation_start, log_timed_operation,
};
pub use pivot::{PivotLevel, PivotRow, PivotTable};
pub use record::{Category, MeasureDefinition, Record};
pub use release::Release;
pub use stats::Summary;
pub use table::{Correlation, MeasureFilter, MeasureTable, RegionFilter};
pub use transport::{HttpTransport, Transport};
