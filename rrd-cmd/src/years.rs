//! List the distinct agricultural years on the server.

use rrd_api::client::{RainfallClient, SearchTransport};
use rrd_api::config::ApiConfig;
use rrd_api::error::Result;
use rrd_api::query::{build_query, FilterConfig, PageRequest};
use rrd_data::years::distinct_years;

/// Fetch agricultural-year labels by sampling one large page.
///
/// The API has no dedicated years endpoint, so the labels are
/// extracted from search results.
pub(crate) async fn fetch_years(
    transport: &dyn SearchTransport,
    max_size: u32,
) -> Result<Vec<String>> {
    let payload = build_query(
        &FilterConfig::default(),
        &PageRequest {
            page: 0,
            size: max_size,
        },
        max_size,
    );
    let result = transport.search(&payload).await?;
    Ok(distinct_years(&result.records))
}

/// Print the distinct agricultural years, one per line.
pub async fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = ApiConfig::load(config_path)?;
    let client = RainfallClient::new(&config)?;

    let years = fetch_years(&client, config.max_page_size).await?;
    if years.is_empty() {
        println!("No agricultural years found");
    } else {
        for year in &years {
            println!("{}", year);
        }
    }
    Ok(())
}
