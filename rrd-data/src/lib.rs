//! Monthly aggregation and derived view-state for rainfall records.
//!
//! This crate turns the flat record set of the latest query into
//! chart-ready monthly series and keeps the displayed summary
//! statistics consistent with that query.

/// Grouping of daily records into per-month summaries.
pub mod monthly {
    use chrono::{Datelike, NaiveDate};
    use log::debug;
    use rrd_api::record::DailyRecord;
    use serde::{Serialize, Serializer};
    use std::collections::BTreeMap;
    use std::fmt;

    const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Calendar year and month of a group of records.
    ///
    /// Field order makes the derived ordering chronological, and the
    /// zero-padded rendering keeps lexicographic string order in
    /// agreement with it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct MonthKey(i32, u32);

    impl MonthKey {
        pub fn from(date: NaiveDate) -> MonthKey {
            MonthKey(date.year(), date.month())
        }

        pub fn new(year: i32, month: u32) -> MonthKey {
            MonthKey(year, month)
        }

        pub fn year(&self) -> i32 {
            self.0
        }

        pub fn month(&self) -> u32 {
            self.1
        }
    }

    impl fmt::Display for MonthKey {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:04}-{:02}", self.0, self.1)
        }
    }

    impl Serialize for MonthKey {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    /// Derived per-month summary, recomputed from scratch on every
    /// change to the current record set.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MonthlyAggregate {
        pub month_key: MonthKey,
        pub total: f64,
        pub count: u32,
        pub average: f64,
    }

    /// Group records by calendar month, ascending.
    ///
    /// A record whose date fails to parse is excluded without aborting
    /// the whole computation, and a record with no precipitation amount
    /// contributes zero. Groups only exist once a record maps to them,
    /// so every group has `count >= 1` and the average is always
    /// well-defined.
    pub fn aggregate_by_month(records: &[DailyRecord]) -> Vec<MonthlyAggregate> {
        let mut groups: BTreeMap<MonthKey, (f64, u32)> = BTreeMap::new();

        for record in records {
            let date = match NaiveDate::parse_from_str(&record.date, DATE_FORMAT) {
                Ok(d) => d,
                Err(_) => {
                    debug!("Skipping record {} with bad date {:?}", record.id, record.date);
                    continue;
                }
            };
            let entry = groups.entry(MonthKey::from(date)).or_insert((0.0, 0));
            entry.0 += record.precipitation_mm.unwrap_or(0.0);
            entry.1 += 1;
        }

        groups
            .into_iter()
            .map(|(month_key, (total, count))| MonthlyAggregate {
                month_key,
                total,
                count,
                average: total / count as f64,
            })
            .collect()
    }

}

/// Reconciliation of server statistics with displayed state.
pub mod stats {
    use rrd_api::record::{SearchResult, SummaryStats};

    /// The action that produced the result being reconciled
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ReconcileTrigger {
        Search,
        Reset,
        ClearFilters,
    }

    /// Decide the summary statistics to display after a completed
    /// query.
    ///
    /// Server statistics are adopted verbatim when present. Clearing
    /// filters or receiving an empty record set forces the displayed
    /// statistics to absent, and the previous value is never carried
    /// forward, so stale numbers cannot outlive the query that
    /// produced them. Pure: no I/O, output depends only on arguments.
    pub fn reconcile(
        _previous: Option<&SummaryStats>,
        result: &SearchResult,
        trigger: ReconcileTrigger,
    ) -> Option<SummaryStats> {
        if trigger == ReconcileTrigger::ClearFilters || result.records.is_empty() {
            return None;
        }
        result.statistics.clone()
    }

}

/// Distinct agricultural years present in a record set.
pub mod years {
    use rrd_api::record::DailyRecord;
    use std::collections::BTreeSet;

    /// Collect the distinct agricultural-year labels, sorted ascending.
    /// Labels of the form "2024-25" sort chronologically as strings.
    pub fn distinct_years(records: &[DailyRecord]) -> Vec<String> {
        let years: BTreeSet<String> = records
            .iter()
            .filter_map(|r| r.agricultural_year.clone())
            .filter(|year| !year.is_empty())
            .collect();
        years.into_iter().collect()
    }

}
