//! Prints FIFO realized lots and the total profit for one trade export file.

use anyhow::Context;
use clap::Parser;
use fifogains::{match_fifo, read_file_entries, report, EntryFormat};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about)]
struct Args {
    /// Trade export to read (time in column 3, buy/sell in 4, price in 6, fee in 8, volume in 9)
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let f = File::open(&args.path)
        .with_context(|| format!("could not open {}", args.path.display()))?;
    let mut entries = read_file_entries(BufReader::new(f), &EntryFormat::default())
        .with_context(|| format!("could not read entries from {}", args.path.display()))?;

    if !entries.is_time_ordered() {
        info!("entries are not in time order, sorting");
        entries.sort_by_time();
    }

    let outcome = match_fifo(&entries.buy_entries, &entries.sell_entries);
    if !outcome.unmatched_sells.is_empty() {
        warn!(
            volume = outcome.unmatched_sell_volume(),
            "sell volume exceeds bought volume, remainder not matched"
        );
    }
    info!(
        volume = outcome.unmatched_buy_volume(),
        "open inventory left after matching"
    );

    report::write_plain(io::stdout().lock(), &outcome.realized)?;
    Ok(())
}
