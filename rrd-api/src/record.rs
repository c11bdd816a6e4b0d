use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{RainfallError, Result};

/// Server-assigned record identifier. The API emits integer ids for its
/// own rows and string ids for imported datasets, so both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl Default for RecordId {
    fn default() -> Self {
        RecordId::Str(String::new())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Str(s) => write!(f, "{}", s),
        }
    }
}

/// One daily rainfall observation as returned by the search endpoint.
///
/// Fields are accepted permissively: a record with missing fields still
/// deserializes, and unknown extra fields are ignored. A present field
/// of the wrong type fails the whole response as malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    #[serde(default)]
    pub id: RecordId,
    /// Crop-year label such as "2024-25"
    #[serde(default)]
    pub agricultural_year: Option<String>,
    /// Calendar date as "YYYY-MM-DD"
    #[serde(default)]
    pub date: String,
    /// Absent amounts stay absent here; aggregation treats them as zero
    #[serde(default)]
    pub precipitation_mm: Option<f64>,
}

/// Summary statistics computed server-side for the whole query, not just
/// the returned page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_precipitation: f64,
    pub average_precipitation: f64,
    pub min_precipitation: f64,
    pub max_precipitation: f64,
}

/// Statistics as they arrive off the wire, before the all-or-absent rule
/// is applied.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStats {
    total_precipitation: Option<f64>,
    average_precipitation: Option<f64>,
    min_precipitation: Option<f64>,
    max_precipitation: Option<f64>,
}

impl RawStats {
    /// Partial statistics are not a valid state and collapse to absent.
    fn into_stats(self) -> Option<SummaryStats> {
        match (
            self.total_precipitation,
            self.average_precipitation,
            self.min_precipitation,
            self.max_precipitation,
        ) {
            (Some(total), Some(average), Some(min), Some(max)) => Some(SummaryStats {
                total_precipitation: total,
                average_precipitation: average,
                min_precipitation: min,
                max_precipitation: max,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    data: Vec<DailyRecord>,
    #[serde(default)]
    statistics: Option<RawStats>,
    #[serde(default)]
    total_records: Option<u64>,
}

/// Validated result of one search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Records in server order; never re-sorted client-side
    pub records: Vec<DailyRecord>,
    /// Present only when the server summarized the query
    pub statistics: Option<SummaryStats>,
    /// Total matching rows across all pages, when the server supplies it
    pub total_records: Option<u64>,
}

/// Parse a search response body into a validated result.
///
/// Fails with `MalformedResponse` when the records collection is absent
/// or not a sequence. Statistics are preserved as present-or-absent, and
/// a partial statistics object is treated as absent.
pub fn parse_search_response(body: &str) -> Result<SearchResult> {
    let raw: RawResponse =
        serde_json::from_str(body).map_err(|e| RainfallError::MalformedResponse(e.to_string()))?;
    Ok(SearchResult {
        records: raw.data,
        statistics: raw.statistics.and_then(RawStats::into_stats),
        total_records: raw.total_records,
    })
}
