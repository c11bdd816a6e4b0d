use async_trait::async_trait;

use crate::error::Result;
use crate::query::QueryPayload;
use crate::record::SearchResult;

#[cfg(feature = "api")]
use crate::config::{ApiConfig, API_DOCS_PATH, SEARCH_PATH};
#[cfg(feature = "api")]
use crate::error::RainfallError;
#[cfg(feature = "api")]
use crate::record;
#[cfg(feature = "api")]
use log::{debug, info};
#[cfg(feature = "api")]
use reqwest::Client;
#[cfg(feature = "api")]
use std::time::Duration;

/// Transport over which search traffic travels.
///
/// The dashboard session and the command layer talk to this trait, so
/// tests can substitute a scripted transport for the HTTP client and
/// the choice of transport stays out of the core logic.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// POST a search payload and return the validated result.
    async fn search(&self, payload: &QueryPayload) -> Result<SearchResult>;

    /// Cheap liveness check. The response body is not interpreted.
    async fn ping(&self) -> Result<()>;
}

/// HTTP client for the rainfall-records API.
#[cfg(feature = "api")]
#[derive(Debug, Clone)]
pub struct RainfallClient {
    client: Client,
    base_url: String,
}

#[cfg(feature = "api")]
impl RainfallClient {
    /// Build a client with the configured timeout applied to every
    /// request.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(RainfallClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[cfg(feature = "api")]
#[async_trait]
impl SearchTransport for RainfallClient {
    async fn search(&self, payload: &QueryPayload) -> Result<SearchResult> {
        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        debug!("POST {} page={} size={}", url, payload.page, payload.size);

        let response = self.client.post(&url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RainfallError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let result = record::parse_search_response(&body)?;
        info!(
            "Search returned {} records, statistics {}",
            result.records.len(),
            if result.statistics.is_some() {
                "present"
            } else {
                "absent"
            }
        );
        Ok(result)
    }

    async fn ping(&self) -> Result<()> {
        let url = format!("{}{}", self.base_url, API_DOCS_PATH);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RainfallError::HttpError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
