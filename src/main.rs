use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tripowe::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise -v turns on debug output for this crate
    let default_level = if cli.verbose { "tripowe=debug" } else { "tripowe=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    cli.run()
}
