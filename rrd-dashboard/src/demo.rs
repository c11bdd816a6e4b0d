//! Fixed sample dataset shown while the API is unreachable.
//!
//! These rows keep the interface inspectable without a live backend.
//! They are display-only: their ids carry no continuity with any real
//! record and must never be treated as live state.

use chrono::NaiveDate;
use rrd_api::record::{DailyRecord, RecordId, SummaryStats};
use rrd_utils::dates::{agricultural_year_for_date, agricultural_year_label, format_date};

/// Five sample records from one October week.
pub fn records() -> Vec<DailyRecord> {
    [25.5, 18.2, 32.1, 12.8, 45.3]
        .iter()
        .enumerate()
        .map(|(i, &mm)| {
            let date = NaiveDate::from_ymd_opt(2024, 10, 15 + i as u32).unwrap();
            DailyRecord {
                id: RecordId::Int(i as i64 + 1),
                agricultural_year: Some(agricultural_year_label(agricultural_year_for_date(
                    &date,
                ))),
                date: format_date(&date),
                precipitation_mm: Some(mm),
            }
        })
        .collect()
}

/// Summary statistics matching the sample records.
pub fn statistics() -> SummaryStats {
    SummaryStats {
        total_precipitation: 133.9,
        average_precipitation: 26.8,
        min_precipitation: 12.8,
        max_precipitation: 45.3,
    }
}

/// Agricultural years offered by the sample filter dropdown.
pub fn years() -> Vec<String> {
    (2023..=2025).map(agricultural_year_label).collect()
}
