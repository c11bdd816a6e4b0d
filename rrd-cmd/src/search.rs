//! Search command: query daily records and print them as a table.

use chrono::NaiveDate;
use log::info;

use rrd_api::client::{RainfallClient, SearchTransport};
use rrd_api::config::ApiConfig;
use rrd_api::error::RainfallError;
use rrd_api::query::{build_query, FilterConfig, PageRequest, SortBy, SortDir};
use rrd_api::record::{DailyRecord, SummaryStats};
use rrd_data::monthly::{aggregate_by_month, MonthlyAggregate};
use rrd_utils::dates::{month_name, parse_date};

/// Options accepted by the search command.
pub struct SearchOpts {
    pub config: Option<String>,
    pub year: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_mm: Option<f64>,
    pub max_mm: Option<f64>,
    pub sort_by: String,
    pub sort_dir: String,
    pub page: u32,
    pub size: Option<u32>,
    pub monthly: bool,
}

/// Run one search and print the rows, or the monthly aggregates.
pub async fn run(opts: SearchOpts) -> anyhow::Result<()> {
    let config = ApiConfig::load(opts.config.as_deref())?;

    let (start_date, end_date) =
        parse_date_range(opts.start_date.as_deref(), opts.end_date.as_deref())?;
    let filters = FilterConfig {
        agricultural_year: opts.year,
        start_date,
        end_date,
        min_precipitation: opts.min_mm,
        max_precipitation: opts.max_mm,
        sort_by: parse_sort_by(&opts.sort_by)?,
        sort_dir: parse_sort_dir(&opts.sort_dir)?,
    };
    let page = PageRequest {
        page: opts.page,
        size: opts.size.unwrap_or(config.default_page_size),
    };
    let payload = build_query(&filters, &page, config.max_page_size);

    info!(
        "Searching {} page={} size={}",
        config.base_url, payload.page, payload.size
    );
    let client = RainfallClient::new(&config)?;
    let result = client.search(&payload).await?;

    if opts.monthly {
        print_monthly(&aggregate_by_month(&result.records));
    } else {
        print_records(&result.records);
    }
    if let Some(stats) = &result.statistics {
        print_statistics(stats);
    }
    if let Some(total) = result.total_records {
        println!("Total matching records: {}", total);
    }
    Ok(())
}

pub(crate) fn parse_filter_date(s: &str) -> rrd_api::error::Result<NaiveDate> {
    parse_date(s).map_err(|_| RainfallError::DateParse(s.to_string()))
}

/// Parse the optional date bounds, rejecting an inverted range before
/// anything goes on the wire.
pub(crate) fn parse_date_range(
    start: Option<&str>,
    end: Option<&str>,
) -> anyhow::Result<(Option<NaiveDate>, Option<NaiveDate>)> {
    let start = start.map(parse_filter_date).transpose()?;
    let end = end.map(parse_filter_date).transpose()?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            anyhow::bail!("Start date {} is after end date {}", start, end);
        }
    }
    Ok((start, end))
}

pub(crate) fn parse_sort_by(s: &str) -> anyhow::Result<SortBy> {
    match s {
        "date" => Ok(SortBy::Date),
        "precipitationMm" => Ok(SortBy::PrecipitationMm),
        "agriculturalYear" => Ok(SortBy::AgriculturalYear),
        other => anyhow::bail!(
            "Unknown sort field '{}' (expected date, precipitationMm or agriculturalYear)",
            other
        ),
    }
}

pub(crate) fn parse_sort_dir(s: &str) -> anyhow::Result<SortDir> {
    match s {
        "asc" => Ok(SortDir::Asc),
        "desc" => Ok(SortDir::Desc),
        other => anyhow::bail!("Unknown sort direction '{}' (expected asc or desc)", other),
    }
}

pub(crate) fn print_records(records: &[DailyRecord]) {
    if records.is_empty() {
        println!("No records found");
        return;
    }
    println!(
        "{:<10} {:<18} {:<12} {:>18}",
        "ID", "Agricultural Year", "Date", "Precipitation (mm)"
    );
    for record in records {
        println!(
            "{:<10} {:<18} {:<12} {:>18.1}",
            record.id.to_string(),
            record.agricultural_year.as_deref().unwrap_or("-"),
            record.date,
            record.precipitation_mm.unwrap_or(0.0),
        );
    }
    println!("Found {} records", records.len());
}

pub(crate) fn print_monthly(aggregates: &[MonthlyAggregate]) {
    if aggregates.is_empty() {
        println!("No records found");
        return;
    }
    println!(
        "{:<10} {:>12} {:>6} {:>14}",
        "Month", "Total (mm)", "Days", "Average (mm)"
    );
    for aggregate in aggregates {
        let label = format!(
            "{} {}",
            month_name(aggregate.month_key.month()),
            aggregate.month_key.year()
        );
        println!(
            "{:<10} {:>12.1} {:>6} {:>14.2}",
            label, aggregate.total, aggregate.count, aggregate.average
        );
    }
}

pub(crate) fn print_statistics(stats: &SummaryStats) {
    println!(
        "Total: {:.1} mm  Average: {:.1} mm  Min: {:.1} mm  Max: {:.1} mm",
        stats.total_precipitation,
        stats.average_precipitation,
        stats.min_precipitation,
        stats.max_precipitation
    );
}
