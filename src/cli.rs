//! Command-line surface: store management, CSV loading, reports, HTTP server.

use crate::api::{self, AppState};
use crate::config::{parse_interest_rate, Config};
use crate::db::{database_exists, init_db, remove_db_files, Repository};
use crate::domain::{parse_date, Decimal};
use crate::orchestration::{BalanceService, Ingestor};
use crate::report::render_balances;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "advance-ledger", version, about = "Cash advance ledger calculator")]
pub struct Cli {
    /// Debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Event store file (overrides DATABASE_PATH)
    #[arg(long = "db", global = true)]
    pub database_path: Option<String>,

    /// Daily interest rate (overrides INTEREST_RATE)
    #[arg(long = "rate", global = true, value_parser = parse_interest_rate)]
    pub interest_rate: Option<Decimal>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the SQLite event store
    CreateDb,
    /// Delete the SQLite event store
    DropDb,
    /// Load events from a headerless `type,date,amount` CSV file
    Load { filename: PathBuf },
    /// Display balance statistics as of END_DATE (default: today)
    Balances { end_date: Option<String> },
    /// Serve balances over HTTP
    Serve {
        /// Listen port (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Effective configuration: environment first, then flags.
    pub fn config(&self, env: Config) -> Config {
        env.with_overrides(self.database_path.clone(), self.interest_rate)
    }
}

/// Run one command, writing user-facing output to `out`.
pub async fn run<W: Write>(command: Command, config: &Config, out: &mut W) -> anyhow::Result<()> {
    match command {
        Command::CreateDb => create_db(config, out).await,
        Command::DropDb => drop_db(config, out),
        Command::Load { filename } => load(config, &filename, out).await,
        Command::Balances { end_date } => balances(config, end_date.as_deref(), out).await,
        Command::Serve { port } => serve(config, port.unwrap_or(config.port)).await,
    }
}

async fn create_db<W: Write>(config: &Config, out: &mut W) -> anyhow::Result<()> {
    if database_exists(&config.database_path) {
        writeln!(out, "Database already exists")?;
        return Ok(());
    }

    let pool = init_db(&config.database_path)
        .await
        .with_context(|| format!("unable to create database at {}", config.database_path))?;
    pool.close().await;

    writeln!(out, "Initialized database at {}", config.database_path)?;
    Ok(())
}

fn drop_db<W: Write>(config: &Config, out: &mut W) -> anyhow::Result<()> {
    let removed = remove_db_files(&config.database_path)
        .with_context(|| format!("unable to delete database at {}", config.database_path))?;

    if removed {
        writeln!(out, "Deleted SQLite database at {}", config.database_path)?;
    } else {
        writeln!(out, "SQLite database does not exist at {}", config.database_path)?;
    }
    Ok(())
}

async fn load<W: Write>(config: &Config, filename: &Path, out: &mut W) -> anyhow::Result<()> {
    if !database_exists(&config.database_path) {
        writeln!(
            out,
            "Database does not exist at {}, please create it using `create-db` command",
            config.database_path
        )?;
        return Ok(());
    }

    let repo = open_repo(config).await?;
    let result = Ingestor::new(repo.clone())
        .load_file(filename)
        .await
        .with_context(|| format!("failed to load events from {}", filename.display()))?;
    repo.pool().close().await;

    writeln!(
        out,
        "Loaded {} events from {}",
        result.events_loaded,
        filename.display()
    )?;
    Ok(())
}

async fn balances<W: Write>(
    config: &Config,
    end_date: Option<&str>,
    out: &mut W,
) -> anyhow::Result<()> {
    let as_of = match end_date {
        Some(raw) => parse_date(raw)?,
        None => chrono::Local::now().date_naive(),
    };

    if !database_exists(&config.database_path) {
        anyhow::bail!(
            "Database does not exist at {}, please create it using `create-db` command",
            config.database_path
        );
    }

    let repo = open_repo(config).await?;
    let snapshot = BalanceService::new(repo.clone(), config.interest_rate)
        .balances_as_of(as_of)
        .await
        .with_context(|| format!("failed to compute balances as of {}", as_of))?;
    repo.pool().close().await;

    write!(out, "{}", render_balances(&snapshot))?;
    Ok(())
}

async fn serve(config: &Config, port: u16) -> anyhow::Result<()> {
    let repo = open_repo(config).await?;
    let app = api::create_router(AppState::new(repo, config.interest_rate));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    info!("Server listening on {}", addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn open_repo(config: &Config) -> anyhow::Result<Arc<Repository>> {
    let pool = init_db(&config.database_path)
        .await
        .with_context(|| format!("unable to open database at {}", config.database_path))?;
    Ok(Arc::new(Repository::new(pool)))
}
