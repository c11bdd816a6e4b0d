//! Connectivity probe command.

use log::{info, warn};

use rrd_api::client::{RainfallClient, SearchTransport};
use rrd_api::config::ApiConfig;
use rrd_api::probe::{self, ApiStatus};

/// Outcome of one probe round: the search-endpoint verdict plus the
/// OpenAPI-document liveness check.
pub(crate) struct ProbeReport {
    pub status: ApiStatus,
    pub docs_reachable: bool,
}

/// Settle the probe with a one-row search, then ping the OpenAPI
/// document. The ping is diagnostic only; the verdict comes from the
/// search probe.
pub(crate) async fn check(transport: &dyn SearchTransport) -> ProbeReport {
    let status = probe::run_probe(transport).await;
    let docs_reachable = match transport.ping().await {
        Ok(()) => true,
        Err(err) => {
            warn!("OpenAPI document ping failed: {}", err);
            false
        }
    };
    ProbeReport {
        status,
        docs_reachable,
    }
}

/// Run one probe round trip against the API and report the verdict.
pub async fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = ApiConfig::load(config_path)?;
    info!(
        "Probing {} with a {}s timeout",
        config.base_url, config.timeout_secs
    );

    let client = RainfallClient::new(&config)?;
    let report = check(&client).await;

    println!("API status: {}", report.status);
    println!(
        "OpenAPI docs: {}",
        if report.docs_reachable {
            "reachable"
        } else {
            "unreachable"
        }
    );
    if report.status == ApiStatus::Degraded {
        println!(
            "The API could not be reached. Check that the server is running at {} and retry.",
            config.base_url
        );
    }
    Ok(())
}
