// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Command-line entry point: solve a MAJORITY instance and print the
//! decision tree.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use balance_search::problem::majority::{JoinStrategy, MajorityProblem};
use balance_search::report::{write_report, Report};
use balance_search::search::Search;

#[derive(Parser)]
#[command(name = "balance-search")]
#[command(about = "Find a minimum-depth weighing strategy for the coin majority puzzle")]
struct Args {
    /// Number of coins; must be odd and at least 3.
    coin_count: u8,

    /// Stop deepening once the lower bound reaches this depth.
    #[arg(long)]
    stop_depth: Option<u8>,

    /// Write the report to this file instead of standard output.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Only print one optimal weighing per state.
    #[arg(long)]
    happy_path: bool,

    /// Part-joining strategy used while canonicalizing states.
    #[arg(long, value_enum, default_value = "same-variety")]
    join: JoinArg,

    /// Allow any variety split instead of the almost-balanced instance.
    #[arg(long)]
    any_split: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum JoinArg {
    None,
    SameVariety,
    All,
    Validate,
}

impl From<JoinArg> for JoinStrategy {
    fn from(value: JoinArg) -> JoinStrategy {
        match value {
            JoinArg::None => JoinStrategy::None,
            JoinArg::SameVariety => JoinStrategy::SameVariety,
            JoinArg::All => JoinStrategy::All,
            JoinArg::Validate => JoinStrategy::Validate,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let problem = MajorityProblem::new(args.coin_count, !args.any_split)?
        .with_join_strategy(args.join.into());
    let mut search = Search::new(problem);

    let stop_depth = args.stop_depth.unwrap_or(args.coin_count);
    let (depth_min, depth_max) = search.solve(stop_depth);
    info!(
        permutation_peak = search.problem().permutation_peak(),
        "canonicalization complete"
    );
    match depth_max {
        Some(max) if max == depth_min => {
            info!(depth = depth_min, "optimal depth found");
        }
        _ => info!(
            depth_min,
            stop_depth, "unresolved at the depth cap; report shows current bounds"
        ),
    }

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("creating report file {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut report = Report::new(BufWriter::new(out)).with_happy_path(args.happy_path);
    write_report(&search, &mut report).context("writing report")?;
    Ok(())
}
