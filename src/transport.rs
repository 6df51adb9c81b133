//! HTTP transport for the PLACES API.
//!
//! [`Transport`] is the seam between the client and the network. The
//! production implementation, [`HttpTransport`], is a blocking `reqwest`
//! client; tests plug in canned responses.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{PlacesError, Result};

/// Header carrying the Socrata application token
pub const APP_TOKEN_HEADER: &str = "x-app-token";

/// Something that can GET a URL with query parameters and return JSON
pub trait Transport: Send + Sync {
    fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<serde_json::Value>;
}

/// Blocking reqwest transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport from API settings
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.app_token {
            let value = HeaderValue::from_str(token).map_err(|_| PlacesError::Config {
                message: "App token contains characters not allowed in a header".to_string(),
            })?;
            headers.insert(APP_TOKEN_HEADER, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<serde_json::Value> {
        let start = Instant::now();
        let response = self.client.get(url).query(query).send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                url = url,
                status = status.as_u16(),
                "API request failed"
            );
            return Err(PlacesError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes()?;
        debug!(
            url = url,
            status = status.as_u16(),
            bytes = body.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "API request completed"
        );

        Ok(serde_json::from_slice(&body)?)
    }
}
