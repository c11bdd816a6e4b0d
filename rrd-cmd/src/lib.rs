//! Command implementations for the RRD CLI.
//!
//! Provides subcommands for probing the rainfall API, searching daily
//! records, listing agricultural years, and rendering one dashboard
//! session in the terminal.

use clap::Subcommand;

pub mod dashboard;
pub mod probe;
pub mod search;
pub mod years;

#[derive(Subcommand)]
pub enum Command {
    /// Check whether the rainfall API is reachable
    Probe {
        /// Path to a config file (RRD_* environment variables overlay it)
        #[arg(short = 'c', long)]
        config: Option<String>,
    },

    /// Search daily rainfall records
    Search {
        /// Path to a config file (RRD_* environment variables overlay it)
        #[arg(short = 'c', long)]
        config: Option<String>,

        /// Agricultural year label, e.g. 2024-25
        #[arg(long)]
        year: Option<String>,

        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,

        /// Minimum daily precipitation in mm
        #[arg(long)]
        min_mm: Option<f64>,

        /// Maximum daily precipitation in mm
        #[arg(long)]
        max_mm: Option<f64>,

        /// Sort field: date, precipitationMm or agriculturalYear
        #[arg(long, default_value = "date")]
        sort_by: String,

        /// Sort direction: asc or desc
        #[arg(long, default_value = "asc")]
        sort_dir: String,

        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Rows per page (defaults to the configured page size)
        #[arg(long)]
        size: Option<u32>,

        /// Print per-month aggregates instead of raw rows
        #[arg(long)]
        monthly: bool,
    },

    /// List the distinct agricultural years on the server
    Years {
        /// Path to a config file (RRD_* environment variables overlay it)
        #[arg(short = 'c', long)]
        config: Option<String>,
    },

    /// Render one dashboard session in the terminal
    Dashboard {
        /// Path to a config file (RRD_* environment variables overlay it)
        #[arg(short = 'c', long)]
        config: Option<String>,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Probe { config } => probe::run(config.as_deref()).await,
        Command::Search {
            config,
            year,
            start_date,
            end_date,
            min_mm,
            max_mm,
            sort_by,
            sort_dir,
            page,
            size,
            monthly,
        } => {
            search::run(search::SearchOpts {
                config,
                year,
                start_date,
                end_date,
                min_mm,
                max_mm,
                sort_by,
                sort_dir,
                page,
                size,
                monthly,
            })
            .await
        }
        Command::Years { config } => years::run(config.as_deref()).await,
        Command::Dashboard { config } => dashboard::run(config.as_deref()).await,
    }
}
