use advance_ledger::cli::{self, Cli, Command};
use advance_ledger::config::Config;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.debug {
        LevelFilter::DEBUG
    } else if matches!(cli.command, Command::Serve { .. }) {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };

    // Logs go to stderr so reports on stdout stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cli.config(cfg),
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    tracing::debug!(?config, "debug mode is on");

    let mut stdout = std::io::stdout();
    if let Err(e) = cli::run(cli.command, &config, &mut stdout).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
