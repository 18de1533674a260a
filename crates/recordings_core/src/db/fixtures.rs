//! Sample catalog used by the demo binary and tests.
//!
//! # Invariants
//! - Seeding only touches an empty `album` table.
//! - All sample rows are inserted in one transaction.

use super::DbResult;
use log::info;
use rusqlite::{params, Connection};

/// `(title, artist, price)` rows of the sample catalog, in insertion order.
///
/// On a fresh database they receive ids 1 through 4.
pub const SAMPLE_ALBUMS: &[(&str, &str, f64)] = &[
    ("Blue Train", "John Coltrane", 56.99),
    ("Giant Steps", "John Coltrane", 63.99),
    ("Jeru", "Gerry Mulligan", 17.99),
    ("Sarah Vaughan", "Sarah Vaughan", 34.98),
];

/// Inserts [`SAMPLE_ALBUMS`] when the `album` table is empty.
///
/// Returns the number of inserted rows; `0` means the table already held data.
pub fn seed_sample_albums(conn: &mut Connection) -> DbResult<usize> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM album;", [], |row| row.get(0))?;
    if existing > 0 {
        info!(
            "event=db_seed module=db status=skipped existing_rows={}",
            existing
        );
        return Ok(0);
    }

    let tx = conn.transaction()?;
    {
        let mut stmt =
            tx.prepare("INSERT INTO album (title, artist, price) VALUES (?1, ?2, ?3);")?;
        for (title, artist, price) in SAMPLE_ALBUMS {
            stmt.execute(params![title, artist, price])?;
        }
    }
    tx.commit()?;

    info!(
        "event=db_seed module=db status=ok inserted_rows={}",
        SAMPLE_ALBUMS.len()
    );
    Ok(SAMPLE_ALBUMS.len())
}
