//! RRD CLI - Command line tool for querying the rainfall-records API.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "rrd-cli",
    version,
    about = "Rainfall records dashboard toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: rrd_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    rrd_cmd::run(cli.command).await
}
