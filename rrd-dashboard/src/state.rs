//! Dashboard session state and its event transitions.
//!
//! `DashboardState` bundles everything the rendering layer displays.
//! It is owned by a single caller and advanced only through `apply`,
//! which is pure given (old state, event), so the whole session can be
//! unit tested without a rendering tree or a live backend.

use log::{info, warn};

use rrd_api::config::ApiConfig;
use rrd_api::probe::ApiStatus;
use rrd_api::query::{build_query, FilterConfig, PageRequest, QueryPayload};
use rrd_api::record::{DailyRecord, SearchResult, SummaryStats};
use rrd_data::monthly::{aggregate_by_month, MonthlyAggregate};
use rrd_data::stats::{reconcile, ReconcileTrigger};

use crate::notice::Notice;

/// Shared session state for the rainfall dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Connectivity verdict driving live-versus-sample display
    pub api_status: ApiStatus,
    /// Active filters, applied by the next search
    pub filters: FilterConfig,
    /// Current zero-based page
    pub page: u32,
    /// Rows per page, kept within the configured maximum
    pub page_size: u32,
    /// Records of the latest completed query, in server order
    pub records: Vec<DailyRecord>,
    /// Summary statistics of the latest completed query
    pub statistics: Option<SummaryStats>,
    /// Total matching rows when the server reports them
    pub total_records: Option<u64>,
    /// Agricultural years offered by the filter dropdown
    pub years: Vec<String>,
    /// Inline error message from the latest failed fetch
    pub error: Option<String>,
    /// Transient notification, replaced on raise, cleared on dismiss
    pub notice: Option<Notice>,
    /// Whether a search is in flight
    pub loading: bool,
    /// Sequence number of the most recently issued search; a settling
    /// event must echo it back or be discarded as stale
    pub seq: u64,
    /// Externally supplied constants the session was started with
    pub config: ApiConfig,
}

/// One user action or completed async operation.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// The connectivity probe settled
    ProbeSettled { reachable: bool },
    /// The user asked to retry a failed probe
    RetryRequested,
    /// Filter inputs were edited; applied by the next search
    FiltersEdited(FilterConfig),
    /// The user moved to a zero-based page
    PageSelected(u32),
    /// The user picked a new rows-per-page value
    PageSizeSelected(u32),
    /// A search was issued toward the API
    SearchIssued { trigger: ReconcileTrigger },
    /// The search tagged with `seq` resolved
    SearchSettled {
        seq: u64,
        trigger: ReconcileTrigger,
        outcome: Result<SearchResult, String>,
    },
    /// Distinct agricultural years arrived
    YearsLoaded(Vec<String>),
    /// The agricultural-years fetch failed; the dropdown keeps its
    /// previous contents
    YearsFailed,
    /// Filters reset to their defaults without a fetch
    FiltersCleared,
    /// The visible notice was dismissed
    NoticeDismissed,
}

impl DashboardState {
    /// Create a fresh session with the probe still checking.
    pub fn new(config: ApiConfig) -> Self {
        DashboardState {
            api_status: ApiStatus::Checking,
            filters: FilterConfig {
                sort_by: config.sort_by,
                sort_dir: config.sort_dir,
                ..FilterConfig::default()
            },
            page: 0,
            page_size: config.initial_page_size.clamp(1, config.max_page_size.max(1)),
            records: Vec::new(),
            statistics: None,
            total_records: None,
            years: Vec::new(),
            error: None,
            notice: None,
            loading: false,
            seq: 0,
            config,
        }
    }

    /// Advance the session by one event.
    pub fn apply(mut self, event: DashboardEvent) -> DashboardState {
        match event {
            DashboardEvent::ProbeSettled { reachable } => {
                // Only a probe that actually settles raises a notice;
                // stale results change nothing.
                if self.api_status == ApiStatus::Checking {
                    self.notice = Some(if reachable {
                        Notice::success("API connected successfully!")
                    } else {
                        Notice::error("API connection failed. Check if the server is running.")
                    });
                }
                self.api_status = self.api_status.on_probe_result(reachable);
                self
            }
            DashboardEvent::RetryRequested => {
                self.api_status = self.api_status.on_retry();
                self
            }
            DashboardEvent::FiltersEdited(filters) => {
                self.filters = filters;
                self
            }
            DashboardEvent::PageSelected(page) => {
                self.page = page;
                self
            }
            DashboardEvent::PageSizeSelected(size) => {
                self.page_size = size.clamp(1, self.config.max_page_size.max(1));
                self.page = 0;
                self
            }
            DashboardEvent::SearchIssued { trigger } => {
                // Data fetches are gated strictly behind a connected
                // probe; a search in any other state is a no-op.
                if !self.api_status.is_connected() {
                    warn!("Search ignored while API status is {}", self.api_status);
                    return self;
                }
                if trigger == ReconcileTrigger::Search {
                    self.page = 0;
                }
                self.seq += 1;
                self.loading = true;
                self.error = None;
                self
            }
            DashboardEvent::SearchSettled {
                seq,
                trigger,
                outcome,
            } => {
                if seq != self.seq {
                    info!("Discarding stale response {} (current is {})", seq, self.seq);
                    return self;
                }
                self.loading = false;
                match outcome {
                    Ok(result) => {
                        self.statistics = reconcile(self.statistics.as_ref(), &result, trigger);
                        self.records = result.records;
                        self.total_records = result.total_records;
                        self.error = None;
                        if trigger == ReconcileTrigger::Search {
                            self.notice = Some(if self.records.is_empty() {
                                Notice::info("No records found")
                            } else {
                                Notice::success(format!("Found {} records", self.records.len()))
                            });
                        }
                        info!("Displaying {} records", self.records.len());
                    }
                    Err(message) => {
                        warn!("Search failed: {}", message);
                        self.error = Some(message);
                        // Never show stale aggregates next to an error
                        self.statistics = None;
                        self.notice = Some(match trigger {
                            ReconcileTrigger::Search => Notice::error("Search failed"),
                            _ => Notice::error("Failed to fetch rainfall data"),
                        });
                    }
                }
                self
            }
            DashboardEvent::YearsLoaded(years) => {
                self.years = years;
                self
            }
            DashboardEvent::YearsFailed => {
                self.notice = Some(Notice::warning("Failed to fetch agricultural years"));
                self
            }
            DashboardEvent::FiltersCleared => {
                self.filters = FilterConfig {
                    sort_by: self.config.sort_by,
                    sort_dir: self.config.sort_dir,
                    ..FilterConfig::default()
                };
                self.statistics = None;
                self.notice = Some(Notice::info("Filters cleared"));
                self
            }
            DashboardEvent::NoticeDismissed => {
                self.notice = None;
                self
            }
        }
    }

    /// Payload for the next search under the current filters and page
    /// window.
    pub fn next_query(&self) -> QueryPayload {
        build_query(
            &self.filters,
            &PageRequest {
                page: self.page,
                size: self.page_size,
            },
            self.config.max_page_size,
        )
    }

    /// Monthly series for the chart, recomputed from the current
    /// records on every call.
    pub fn monthly_series(&self) -> Vec<MonthlyAggregate> {
        aggregate_by_month(&self.records)
    }

    /// Total pages, available only when the server reported a total
    /// row count. The current page's record count says nothing about
    /// other pages, so no page count is derived from it.
    pub fn total_pages(&self) -> Option<u64> {
        self.total_records
            .map(|total| total.div_ceil(self.page_size as u64))
    }

    /// Number of records currently displayed
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::Severity;
    use rrd_api::query::{SortBy, SortDir};
    use rrd_api::record::RecordId;

    fn connected_state() -> DashboardState {
        DashboardState::new(ApiConfig::default()).apply(DashboardEvent::ProbeSettled {
            reachable: true,
        })
    }

    fn record(date: &str, mm: f64) -> DailyRecord {
        DailyRecord {
            id: RecordId::Int(1),
            agricultural_year: Some("2024-25".to_string()),
            date: date.to_string(),
            precipitation_mm: Some(mm),
        }
    }

    fn stats(total: f64) -> SummaryStats {
        SummaryStats {
            total_precipitation: total,
            average_precipitation: total,
            min_precipitation: total,
            max_precipitation: total,
        }
    }

    fn ok_result(records: Vec<DailyRecord>, statistics: Option<SummaryStats>) -> SearchResult {
        SearchResult {
            records,
            statistics,
            total_records: None,
        }
    }

    #[test]
    fn test_fresh_session_defaults() {
        let state = DashboardState::new(ApiConfig::default());
        assert_eq!(state.api_status, ApiStatus::Checking);
        assert_eq!(state.page, 0);
        assert_eq!(state.page_size, 365);
        assert_eq!(state.filters.sort_by, SortBy::Date);
        assert_eq!(state.filters.sort_dir, SortDir::Asc);
        assert!(state.records.is_empty());
        assert!(state.statistics.is_none());
        assert!(state.notice.is_none());
        assert!(!state.loading);
    }

    #[test]
    fn test_probe_drives_connectivity() {
        let state = DashboardState::new(ApiConfig::default());
        let degraded = state
            .clone()
            .apply(DashboardEvent::ProbeSettled { reachable: false });
        assert_eq!(degraded.api_status, ApiStatus::Degraded);
        let notice = degraded.notice.clone().expect("failure notice");
        assert_eq!(notice.severity, Severity::Error);

        let retried = degraded.apply(DashboardEvent::RetryRequested);
        assert_eq!(retried.api_status, ApiStatus::Checking);

        let connected = retried.apply(DashboardEvent::ProbeSettled { reachable: true });
        assert_eq!(connected.api_status, ApiStatus::Connected);
        assert_eq!(
            connected.notice,
            Some(Notice::success("API connected successfully!"))
        );
    }

    #[test]
    fn test_stale_probe_result_raises_no_notice() {
        let state = connected_state().apply(DashboardEvent::NoticeDismissed);
        let state = state.apply(DashboardEvent::ProbeSettled { reachable: false });
        assert_eq!(state.api_status, ApiStatus::Connected);
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_search_requires_connected() {
        let checking = DashboardState::new(ApiConfig::default());
        let after = checking.apply(DashboardEvent::SearchIssued {
            trigger: ReconcileTrigger::Reset,
        });
        assert_eq!(after.seq, 0);
        assert!(!after.loading);

        let degraded = DashboardState::new(ApiConfig::default())
            .apply(DashboardEvent::ProbeSettled { reachable: false });
        let after = degraded.apply(DashboardEvent::SearchIssued {
            trigger: ReconcileTrigger::Search,
        });
        assert_eq!(after.seq, 0);
        assert!(!after.loading);
    }

    #[test]
    fn test_search_trigger_resets_page() {
        let state = connected_state()
            .apply(DashboardEvent::PageSelected(4))
            .apply(DashboardEvent::SearchIssued {
                trigger: ReconcileTrigger::Search,
            });
        assert_eq!(state.page, 0);
        assert_eq!(state.seq, 1);
        assert!(state.loading);

        let state = connected_state()
            .apply(DashboardEvent::PageSelected(4))
            .apply(DashboardEvent::SearchIssued {
                trigger: ReconcileTrigger::Reset,
            });
        assert_eq!(state.page, 4);
    }

    #[test]
    fn test_settle_adopts_records_and_statistics() {
        let state = connected_state().apply(DashboardEvent::SearchIssued {
            trigger: ReconcileTrigger::Search,
        });
        let seq = state.seq;
        let state = state.apply(DashboardEvent::SearchSettled {
            seq,
            trigger: ReconcileTrigger::Search,
            outcome: Ok(ok_result(
                vec![record("2024-10-15", 25.5)],
                Some(stats(25.5)),
            )),
        });
        assert!(!state.loading);
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.statistics, Some(stats(25.5)));
        assert!(state.error.is_none());
        assert_eq!(state.notice, Some(Notice::success("Found 1 records")));
    }

    #[test]
    fn test_empty_search_raises_info_notice() {
        let state = connected_state().apply(DashboardEvent::SearchIssued {
            trigger: ReconcileTrigger::Search,
        });
        let seq = state.seq;
        let state = state.apply(DashboardEvent::SearchSettled {
            seq,
            trigger: ReconcileTrigger::Search,
            outcome: Ok(ok_result(Vec::new(), None)),
        });
        assert_eq!(state.notice, Some(Notice::info("No records found")));
    }

    #[test]
    fn test_reset_fetch_success_keeps_notice_quiet() {
        let state = connected_state()
            .apply(DashboardEvent::NoticeDismissed)
            .apply(DashboardEvent::SearchIssued {
                trigger: ReconcileTrigger::Reset,
            });
        let seq = state.seq;
        let state = state.apply(DashboardEvent::SearchSettled {
            seq,
            trigger: ReconcileTrigger::Reset,
            outcome: Ok(ok_result(vec![record("2024-10-15", 25.5)], None)),
        });
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_settle_demotes_absent_statistics() {
        let mut state = connected_state().apply(DashboardEvent::SearchIssued {
            trigger: ReconcileTrigger::Search,
        });
        let seq = state.seq;
        state.statistics = Some(stats(99.0));
        let state = state.apply(DashboardEvent::SearchSettled {
            seq,
            trigger: ReconcileTrigger::Search,
            outcome: Ok(ok_result(vec![record("2024-10-15", 25.5)], None)),
        });
        assert!(state.statistics.is_none());
        assert_eq!(state.records.len(), 1);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let state = connected_state()
            .apply(DashboardEvent::SearchIssued {
                trigger: ReconcileTrigger::Reset,
            })
            .apply(DashboardEvent::SearchIssued {
                trigger: ReconcileTrigger::Reset,
            });
        assert_eq!(state.seq, 2);

        // The first request resolves late; the session ignores it.
        let state = state.apply(DashboardEvent::SearchSettled {
            seq: 1,
            trigger: ReconcileTrigger::Reset,
            outcome: Ok(ok_result(
                vec![record("1999-01-01", 1.0)],
                Some(stats(1.0)),
            )),
        });
        assert!(state.records.is_empty());
        assert!(state.statistics.is_none());
        assert!(state.loading);

        // The most recently issued request still applies.
        let state = state.apply(DashboardEvent::SearchSettled {
            seq: 2,
            trigger: ReconcileTrigger::Reset,
            outcome: Ok(ok_result(
                vec![record("2024-10-15", 25.5)],
                Some(stats(25.5)),
            )),
        });
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.statistics, Some(stats(25.5)));
        assert!(!state.loading);
    }

    #[test]
    fn test_failed_fetch_keeps_records_but_clears_statistics() {
        let state = connected_state().apply(DashboardEvent::SearchIssued {
            trigger: ReconcileTrigger::Reset,
        });
        let seq = state.seq;
        let state = state.apply(DashboardEvent::SearchSettled {
            seq,
            trigger: ReconcileTrigger::Reset,
            outcome: Ok(ok_result(
                vec![record("2024-10-15", 25.5)],
                Some(stats(25.5)),
            )),
        });

        let state = state.apply(DashboardEvent::SearchIssued {
            trigger: ReconcileTrigger::Reset,
        });
        let seq = state.seq;
        let state = state.apply(DashboardEvent::SearchSettled {
            seq,
            trigger: ReconcileTrigger::Reset,
            outcome: Err("Request timed out".to_string()),
        });
        assert_eq!(state.error.as_deref(), Some("Request timed out"));
        assert!(state.statistics.is_none());
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.api_status, ApiStatus::Connected);
        assert_eq!(
            state.notice,
            Some(Notice::error("Failed to fetch rainfall data"))
        );
    }

    #[test]
    fn test_failed_search_notice_names_the_search() {
        let state = connected_state().apply(DashboardEvent::SearchIssued {
            trigger: ReconcileTrigger::Search,
        });
        let seq = state.seq;
        let state = state.apply(DashboardEvent::SearchSettled {
            seq,
            trigger: ReconcileTrigger::Search,
            outcome: Err("HTTP error 500: boom".to_string()),
        });
        assert_eq!(state.notice, Some(Notice::error("Search failed")));
    }

    #[test]
    fn test_clear_filters_resets_without_fetch() {
        let mut state = connected_state();
        state.filters.agricultural_year = Some("2024-25".to_string());
        state.filters.sort_dir = SortDir::Desc;
        state.statistics = Some(stats(10.0));
        state.records = vec![record("2024-10-15", 25.5)];

        let state = state.apply(DashboardEvent::FiltersCleared);
        assert_eq!(state.filters, FilterConfig::default());
        assert!(state.statistics.is_none());
        assert_eq!(state.notice, Some(Notice::info("Filters cleared")));
        // Clearing filters does not discard the displayed records
        assert_eq!(state.records.len(), 1);
        assert!(!state.loading);

        let state = state.apply(DashboardEvent::NoticeDismissed);
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_years_failure_raises_warning() {
        let state = connected_state().apply(DashboardEvent::YearsFailed);
        assert_eq!(
            state.notice,
            Some(Notice::warning("Failed to fetch agricultural years"))
        );
        assert!(state.years.is_empty());
    }

    #[test]
    fn test_empty_search_after_clear_filters() {
        let state = connected_state()
            .apply(DashboardEvent::FiltersCleared)
            .apply(DashboardEvent::SearchIssued {
                trigger: ReconcileTrigger::Search,
            });
        let seq = state.seq;
        let state = state.apply(DashboardEvent::SearchSettled {
            seq,
            trigger: ReconcileTrigger::Search,
            outcome: Ok(ok_result(Vec::new(), None)),
        });
        assert_eq!(state.record_count(), 0);
        assert!(state.statistics.is_none());
    }

    #[test]
    fn test_page_size_selection_clamps_and_resets_page() {
        let state = connected_state()
            .apply(DashboardEvent::PageSelected(3))
            .apply(DashboardEvent::PageSizeSelected(5000));
        assert_eq!(state.page_size, 1000);
        assert_eq!(state.page, 0);

        let state = state.apply(DashboardEvent::PageSizeSelected(0));
        assert_eq!(state.page_size, 1);
    }

    #[test]
    fn test_zero_max_page_size_still_clamps() {
        let config = ApiConfig {
            max_page_size: 0,
            ..ApiConfig::default()
        };
        let state = DashboardState::new(config);
        assert_eq!(state.page_size, 1);

        let state = state.apply(DashboardEvent::PageSizeSelected(50));
        assert_eq!(state.page_size, 1);
        assert_eq!(state.next_query().size, 1);
    }

    #[test]
    fn test_filters_edited_apply_to_next_query() {
        let filters = FilterConfig {
            agricultural_year: Some("2023-24".to_string()),
            min_precipitation: Some(2.5),
            ..FilterConfig::default()
        };

        let state = connected_state().apply(DashboardEvent::FiltersEdited(filters.clone()));
        assert_eq!(state.filters, filters);

        let payload = state.next_query();
        assert_eq!(payload.agricultural_year.as_deref(), Some("2023-24"));
        assert_eq!(payload.min_precipitation, Some(2.5));
        assert_eq!(payload.page, 0);
        assert_eq!(payload.size, 365);
    }

    #[test]
    fn test_years_loaded() {
        let state = connected_state().apply(DashboardEvent::YearsLoaded(vec![
            "2023-24".to_string(),
            "2024-25".to_string(),
        ]));
        assert_eq!(state.years, ["2023-24", "2024-25"]);
    }

    #[test]
    fn test_monthly_series_follows_records() {
        let mut state = connected_state();
        assert!(state.monthly_series().is_empty());

        state.records = vec![
            record("2024-10-15", 25.5),
            record("2024-10-16", 18.2),
            record("2024-11-01", 5.0),
        ];
        let series = state.monthly_series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].month_key.to_string(), "2024-10");
        assert_eq!(series[0].count, 2);
        assert_eq!(series[1].month_key.to_string(), "2024-11");
    }

    #[test]
    fn test_total_pages_needs_server_total() {
        let mut state = connected_state();
        state.page_size = 100;
        assert_eq!(state.total_pages(), None);

        state.total_records = Some(731);
        assert_eq!(state.total_pages(), Some(8));

        state.total_records = Some(0);
        assert_eq!(state.total_pages(), Some(0));
    }
}
