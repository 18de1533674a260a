//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas and the caller-supplied busy timeout.
//! - Trigger schema migrations before returning a usable connection.
//! - Provide the startup liveness probe.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.
//! - Driver failures anywhere during open surface as `DbError::Connection`;
//!   only `UnsupportedSchemaVersion` keeps its own kind.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{debug, error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-connection settings applied during bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbOptions {
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Default for DbOptions {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

/// Opens a SQLite database file with default options and applies all pending
/// migrations.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_db_with_options(path, &DbOptions::default())
}

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Side effects
/// - Creates the database file when it does not exist yet.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_with_options(path: impl AsRef<Path>, options: &DbOptions) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let conn = Connection::open(path).map_err(DbError::Connection);
    finish_open(conn, options, "file", started_at)
}

/// Opens an in-memory SQLite database and applies all pending migrations.
///
/// Every call yields an independent, empty database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = Connection::open_in_memory().map_err(DbError::Connection);
    finish_open(conn, &DbOptions::default(), "memory", started_at)
}

/// Liveness check: round-trips a trivial statement through the connection.
///
/// # Errors
/// - Returns `DbError::Connection` when the database cannot answer.
pub fn ping(conn: &Connection) -> DbResult<()> {
    let started_at = Instant::now();
    let answer = conn
        .query_row("SELECT 1;", [], |row| row.get::<_, i64>(0))
        .map_err(|err| {
            error!(
                "event=db_ping module=db status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            DbError::Connection(err)
        })?;

    debug!(
        "event=db_ping module=db status=ok answer={} duration_ms={}",
        answer,
        started_at.elapsed().as_millis()
    );
    Ok(())
}

fn finish_open(
    conn: DbResult<Connection>,
    options: &DbOptions,
    mode: &str,
    started_at: Instant,
) -> DbResult<Connection> {
    let mut conn = match conn {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }
    };

    match bootstrap_connection(&mut conn, options).map_err(as_connection_error) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

// A file that is not a database only fails on first use, inside bootstrap.
fn as_connection_error(err: DbError) -> DbError {
    match err {
        DbError::Sqlite(err) => DbError::Connection(err),
        other => other,
    }
}

fn bootstrap_connection(conn: &mut Connection, options: &DbOptions) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(options.busy_timeout)?;
    apply_migrations(conn)?;
    Ok(())
}
