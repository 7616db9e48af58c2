use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dartboard::stream;
use dartboard::Coordinator;

/// Estimates the area of a circle by parallel Monte Carlo sampling.
///
/// Reads `<radius> <threads>` query pairs from standard input until
/// end-of-stream and prints `elapsed_ms  area` for each, both fixed-point
/// with three decimal places.
#[derive(Parser)]
#[command(name = "dartboard", version)]
struct Cli {
    /// Number of sample points per query, split across worker threads
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    tries: u64,

    /// Base seed; worker i samples with seed + i
    #[arg(default_value_t = 0)]
    seed: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let coordinator = Coordinator::new();
    tracing::info!(
        tries = cli.tries,
        seed = cli.seed,
        max_parallelism = coordinator.max_parallelism(),
        "reading <radius> <threads> queries from stdin"
    );

    let mut stdout = io::stdout().lock();
    let summary = stream::process_queries(
        io::stdin().lock(),
        &mut stdout,
        &coordinator,
        cli.tries,
        cli.seed,
    )?;

    tracing::info!(
        answered = summary.answered,
        rejected = summary.rejected,
        "end of stream"
    );
    if summary.rejected > 0 {
        anyhow::bail!(
            "rejected {} of {} queries",
            summary.rejected,
            summary.answered + summary.rejected
        );
    }
    Ok(())
}

fn setup_tracing(verbose: bool) {
    let default_filter = if verbose {
        "dartboard=debug"
    } else {
        "dartboard=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Results go to stdout; keep every diagnostic on stderr.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
