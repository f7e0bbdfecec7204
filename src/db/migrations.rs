//! Event store initialization and migrations.

use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// SQLite side files that belong to a database running in WAL mode.
const SIDE_FILE_SUFFIXES: [&str; 2] = ["-wal", "-shm"];

/// Whether the event store file exists at `db_path`.
pub fn database_exists(db_path: &str) -> bool {
    Path::new(db_path).is_file()
}

/// Delete the event store and its WAL side files.
///
/// Returns false when there was nothing to delete.
pub fn remove_db_files(db_path: &str) -> std::io::Result<bool> {
    if !database_exists(db_path) {
        return Ok(false);
    }
    std::fs::remove_file(db_path)?;
    for suffix in SIDE_FILE_SUFFIXES {
        let side = PathBuf::from(format!("{}{}", db_path, suffix));
        if side.exists() {
            std::fs::remove_file(&side)?;
        }
    }
    info!(path = db_path, "event store removed");
    Ok(true)
}

/// Open (creating if needed) the SQLite event store and apply the schema.
pub async fn init_db(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _meta| Box::pin(async move { configure_pragmas_conn(conn).await }))
        .connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await?;

    run_migrations(&pool).await?;

    info!(path = db_path, "event store ready");
    Ok(pool)
}

/// Apply `schema.sql`. Every statement is idempotent.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("running event store migrations");
    let schema_sql = include_str!("schema.sql");

    for statement in schema_sql.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }

    info!("event store migrations complete");
    Ok(())
}

/// Per-connection pragmas: WAL journal, busy timeout, relaxed fsync.
async fn configure_pragmas_conn(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    use sqlx::Row;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&mut *conn)
        .await?;

    // journal_mode reports the mode actually in effect
    let row = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?;
    let journal_mode: String = row.get(0);
    debug!(journal_mode = %journal_mode, "sqlite journal mode");

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&mut *conn)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&mut *conn)
        .await?;
    Ok(())
}
