use anyhow::Result;
use clap::Parser;
use fortimap::cli::{Cli, Commands};
use fortimap::commands::{self, ScoreConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match cli.command {
        Commands::Score {
            snapshot,
            cycle,
            format,
            output,
            table,
            config,
            include_inactive,
            plain,
        } => commands::handle_score(ScoreConfig {
            snapshot,
            cycle,
            format,
            output,
            table: table.map(Into::into),
            config,
            include_inactive,
            plain,
        }),
        Commands::Band { value, scale } => commands::handle_band(value, scale),
        Commands::Init { force } => commands::init_config(force),
    }
}

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

// RUST_LOG wins over -v. Logs go to stderr so reports on stdout stay clean.
fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
