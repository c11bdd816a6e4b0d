use log::{info, warn};
use std::fmt;

use crate::client::SearchTransport;
use crate::query::QueryPayload;

/// Reachability of the rainfall API.
///
/// `Checking` is the initial state. A successful round trip to the API
/// settles the probe at `Connected`; any failure settles it at
/// `Degraded`, where the caller substitutes sample data until an
/// explicit retry re-enters `Checking`. There is no automatic retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiStatus {
    /// Probe in flight, no verdict yet
    #[default]
    Checking,
    /// The API answered and live queries are enabled
    Connected,
    /// The API could not be reached
    Degraded,
}

impl ApiStatus {
    /// Settle an in-flight probe. A result arriving after the probe has
    /// already settled is stale and leaves the state unchanged.
    pub fn on_probe_result(self, reachable: bool) -> ApiStatus {
        match self {
            ApiStatus::Checking => {
                if reachable {
                    ApiStatus::Connected
                } else {
                    ApiStatus::Degraded
                }
            }
            settled => settled,
        }
    }

    /// Re-enter `Checking` on a caller-initiated retry. Only a degraded
    /// probe can be retried.
    pub fn on_retry(self) -> ApiStatus {
        match self {
            ApiStatus::Degraded => ApiStatus::Checking,
            other => other,
        }
    }

    /// Whether live queries are allowed in this state
    pub fn is_connected(&self) -> bool {
        matches!(self, ApiStatus::Connected)
    }
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ApiStatus::Checking => "checking",
            ApiStatus::Connected => "connected",
            ApiStatus::Degraded => "degraded",
        };
        write!(f, "{}", label)
    }
}

/// Run one probe round trip: a minimal one-row search against the API.
///
/// Any success-range response with a parseable body counts as reachable.
/// Failures settle the probe at `Degraded`; retrying is the caller's
/// decision.
pub async fn run_probe(transport: &dyn SearchTransport) -> ApiStatus {
    let payload = QueryPayload {
        page: 0,
        size: 1,
        agricultural_year: None,
        start_date: None,
        end_date: None,
        min_precipitation: None,
        max_precipitation: None,
        sort_by: Default::default(),
        sort_dir: Default::default(),
    };
    match transport.search(&payload).await {
        Ok(_) => {
            info!("API reachable, live queries enabled");
            ApiStatus::Checking.on_probe_result(true)
        }
        Err(err) => {
            warn!("Connectivity probe failed: {}", err);
            ApiStatus::Checking.on_probe_result(false)
        }
    }
}
