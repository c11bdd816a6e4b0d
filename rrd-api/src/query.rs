use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sort field accepted by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "precipitationMm")]
    PrecipitationMm,
    #[serde(rename = "agriculturalYear")]
    AgriculturalYear,
}

/// Sort direction accepted by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// Active query parameters. Owned by the dashboard session; read-only
/// here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterConfig {
    pub agricultural_year: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_precipitation: Option<f64>,
    pub max_precipitation: Option<f64>,
    pub sort_by: SortBy,
    pub sort_dir: SortDir,
}

/// Zero-based page window combined with the filters to form a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

/// Outbound search request body.
///
/// Unset filter fields are omitted from the serialized payload entirely,
/// never sent as empty strings or nulls. The remote API distinguishes
/// "field absent" from "field = empty string".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPayload {
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agricultural_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_precipitation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_precipitation: Option<f64>,
    pub sort_by: SortBy,
    pub sort_dir: SortDir,
}

/// Build the outbound search payload from the active filters and page
/// window.
///
/// An empty agricultural-year string counts as unset. Dates serialize as
/// zero-padded "YYYY-MM-DD". The page size is clamped to
/// `[1, max_size]` rather than rejected; a zero `max_size` clamps as if
/// it were 1.
pub fn build_query(filters: &FilterConfig, page: &PageRequest, max_size: u32) -> QueryPayload {
    QueryPayload {
        page: page.page,
        size: page.size.clamp(1, max_size.max(1)),
        agricultural_year: filters
            .agricultural_year
            .clone()
            .filter(|year| !year.is_empty()),
        start_date: filters
            .start_date
            .map(|d| d.format(DATE_FORMAT).to_string()),
        end_date: filters.end_date.map(|d| d.format(DATE_FORMAT).to_string()),
        min_precipitation: filters.min_precipitation,
        max_precipitation: filters.max_precipitation,
        sort_by: filters.sort_by,
        sort_dir: filters.sort_dir,
    }
}
