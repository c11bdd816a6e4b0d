//! Shared utility functions for RRD crates.

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Get the agricultural year for a given date.
    /// Agricultural year runs Jul 1 to Jun 30.
    /// e.g., Jul 1 2024 -> agricultural year 2024, Jun 30 2025 -> agricultural year 2024
    pub fn agricultural_year_for_date(date: &NaiveDate) -> i32 {
        use chrono::Datelike;
        let month = date.month();
        let year = date.year();
        if month >= 7 {
            year
        } else {
            year - 1
        }
    }

    /// Label for an agricultural year, e.g. 2024 -> "2024-25"
    pub fn agricultural_year_label(start_year: i32) -> String {
        format!("{}-{:02}", start_year, (start_year + 1) % 100)
    }

    /// Short month name for a 1-based month number, "???" out of range
    pub fn month_name(month: u32) -> &'static str {
        match month {
            1 => "Jan",
            2 => "Feb",
            3 => "Mar",
            4 => "Apr",
            5 => "May",
            6 => "Jun",
            7 => "Jul",
            8 => "Aug",
            9 => "Sep",
            10 => "Oct",
            11 => "Nov",
            12 => "Dec",
            _ => "???",
        }
    }

}
