//! One dashboard session rendered in the terminal.
//!
//! Drives the same transitions the web view would: probe the API, then
//! either fetch live records or fall back to the sample dataset while
//! degraded.

use log::warn;

use rrd_api::client::{RainfallClient, SearchTransport};
use rrd_api::config::ApiConfig;
use rrd_api::error::RainfallError;
use rrd_api::probe::{self, ApiStatus};
use rrd_api::record::SearchResult;
use rrd_dashboard::demo;
use rrd_dashboard::state::{DashboardEvent, DashboardState};
use rrd_data::monthly::aggregate_by_month;
use rrd_data::stats::ReconcileTrigger;

use crate::search::{print_monthly, print_records, print_statistics};
use crate::years::fetch_years;

/// Probe the API, run the initial fetches, and render a snapshot.
pub async fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = ApiConfig::load(config_path)?;
    let client = RainfallClient::new(&config)?;
    let mut state = DashboardState::new(config);

    let status = probe::run_probe(&client).await;
    state = state.apply(DashboardEvent::ProbeSettled {
        reachable: status == ApiStatus::Connected,
    });

    if state.api_status.is_connected() {
        state = fetch_live(state, &client).await;
    }
    render(&state);
    Ok(())
}

/// Load the years dropdown and the first page of records, advancing
/// the session the way the web view does after its probe connects.
async fn fetch_live(mut state: DashboardState, transport: &dyn SearchTransport) -> DashboardState {
    match fetch_years(transport, state.config.max_page_size).await {
        Ok(years) => state = state.apply(DashboardEvent::YearsLoaded(years)),
        Err(err) => {
            warn!("Failed to fetch agricultural years: {}", err);
            state = state.apply(DashboardEvent::YearsFailed);
        }
    }

    state = state.apply(DashboardEvent::SearchIssued {
        trigger: ReconcileTrigger::Reset,
    });
    let seq = state.seq;
    let payload = state.next_query();

    let outcome = match transport.search(&payload).await {
        Ok(result) => Ok(result),
        // A body without the records collection renders as "no data",
        // not as a failed session
        Err(err @ RainfallError::MalformedResponse(_)) => {
            warn!("{}", err);
            Ok(SearchResult {
                records: Vec::new(),
                statistics: None,
                total_records: None,
            })
        }
        Err(err) => Err(err.to_string()),
    };
    state.apply(DashboardEvent::SearchSettled {
        seq,
        trigger: ReconcileTrigger::Reset,
        outcome,
    })
}

/// Print one frame of the dashboard.
fn render(state: &DashboardState) {
    println!("Rainfall Data Dashboard");
    println!("API status: {}", state.api_status);

    // While degraded the display substitutes the sample dataset; the
    // session state itself only ever holds live data.
    let (records, statistics, years) = if state.api_status == ApiStatus::Degraded {
        println!("Demo mode: showing sample data. Start the API server and retry.");
        (demo::records(), Some(demo::statistics()), demo::years())
    } else {
        (
            state.records.clone(),
            state.statistics.clone(),
            state.years.clone(),
        )
    };

    if let Some(notice) = &state.notice {
        println!("[{}] {}", notice.severity, notice.message);
    }
    if let Some(error) = &state.error {
        println!("Error: {}", error);
    }
    if !years.is_empty() {
        println!("Agricultural years: {}", years.join(", "));
    }
    if let Some(stats) = &statistics {
        print_statistics(stats);
    }

    print_records(&records);

    let monthly = aggregate_by_month(&records);
    if !monthly.is_empty() {
        println!();
        print_monthly(&monthly);
    }

    match state.total_pages() {
        Some(pages) => println!("Page {} of {}", state.page + 1, pages),
        None => println!("Page {} of ?", state.page + 1),
    }
}
