//! Album repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Map the three album use-cases onto parameterized SQL over `album`.
//! - Classify driver failures into operation-tagged error kinds.
//!
//! # Invariants
//! - Callers never choose an album id; inserts report the store-assigned one.
//! - Row cursors live only inside one operation call and are released on
//!   every return path, including early errors.
//! - List results carry no ordering guarantee.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::album::{Album, AlbumId, NewAlbum};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ALBUM_TABLE: &str = "album";
const ALBUM_COLUMNS: &[&str] = &["id", "title", "artist", "price"];

const ALBUM_SELECT_SQL: &str = "SELECT
    id,
    title,
    artist,
    price
FROM album";

pub type RepoResult<T> = Result<T, RepoError>;

/// Store operation an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumOp {
    ListByArtist,
    GetById,
    Insert,
}

impl AlbumOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListByArtist => "albums_by_artist",
            Self::GetById => "album_by_id",
            Self::Insert => "add_album",
        }
    }
}

impl Display for AlbumOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository error for album persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Statement preparation, execution or cursor stepping failed.
    Query {
        op: AlbumOp,
        source: rusqlite::Error,
    },
    /// No row carries the requested id.
    NotFound(AlbumId),
    /// A row was returned but its columns do not map onto `Album`.
    RowScan {
        op: AlbumOp,
        source: rusqlite::Error,
    },
    /// The insert statement was rejected.
    Write { source: rusqlite::Error },
    /// The insert ran but the store did not report a usable row id.
    IdentityRetrieval { rowid: i64 },
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Returns the store operation this error is tagged with, if any.
    pub fn op(&self) -> Option<AlbumOp> {
        match self {
            Self::Query { op, .. } | Self::RowScan { op, .. } => Some(*op),
            Self::NotFound(_) => Some(AlbumOp::GetById),
            Self::Write { .. } | Self::IdentityRetrieval { .. } => Some(AlbumOp::Insert),
            Self::Db(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query { op, source } => write!(f, "{op}: query failed: {source}"),
            Self::NotFound(id) => write!(f, "album_by_id: no album with id {id}"),
            Self::RowScan { op, source } => write!(f, "{op}: cannot scan album row: {source}"),
            Self::Write { source } => write!(f, "add_album: insert failed: {source}"),
            Self::IdentityRetrieval { rowid } => write!(
                f,
                "add_album: store did not report a generated id (last rowid {rowid})"
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Query { source, .. } => Some(source),
            Self::RowScan { source, .. } => Some(source),
            Self::Write { source } => Some(source),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::IdentityRetrieval { .. }
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the album store.
pub trait AlbumRepository {
    /// Lists every album whose artist equals `artist`, in unspecified order.
    fn albums_by_artist(&self, artist: &str) -> RepoResult<Vec<Album>>;
    /// Fetches one album; `RepoError::NotFound` when the id is unknown.
    fn album_by_id(&self, id: AlbumId) -> RepoResult<Album>;
    /// Inserts a new album and returns its store-assigned id.
    fn add_album(&self, album: &NewAlbum) -> RepoResult<AlbumId>;
}

/// SQLite-backed album repository.
pub struct SqliteAlbumRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAlbumRepository<'conn> {
    /// Wraps a connection after checking it carries the current album schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema was
    ///   altered behind the migration registry's back.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_album_schema(conn)?;
        Ok(Self { conn })
    }
}

impl AlbumRepository for SqliteAlbumRepository<'_> {
    fn albums_by_artist(&self, artist: &str) -> RepoResult<Vec<Album>> {
        let op = AlbumOp::ListByArtist;
        let mut stmt = self
            .conn
            .prepare(&format!("{ALBUM_SELECT_SQL} WHERE artist = ?1;"))
            .map_err(query_error(op))?;

        let mut rows = stmt.query([artist]).map_err(query_error(op))?;
        let mut albums = Vec::new();

        while let Some(row) = rows.next().map_err(query_error(op))? {
            albums.push(parse_album_row(row).map_err(scan_error(op))?);
        }

        Ok(albums)
    }

    fn album_by_id(&self, id: AlbumId) -> RepoResult<Album> {
        let op = AlbumOp::GetById;
        let mut stmt = self
            .conn
            .prepare(&format!("{ALBUM_SELECT_SQL} WHERE id = ?1;"))
            .map_err(query_error(op))?;

        let mut rows = stmt.query([id]).map_err(query_error(op))?;
        match rows.next().map_err(query_error(op))? {
            Some(row) => parse_album_row(row).map_err(scan_error(op)),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn add_album(&self, album: &NewAlbum) -> RepoResult<AlbumId> {
        let changed = self
            .conn
            .execute(
                "INSERT INTO album (title, artist, price) VALUES (?1, ?2, ?3);",
                params![album.title.as_str(), album.artist.as_str(), album.price],
            )
            .map_err(|source| RepoError::Write { source })?;

        // A trigger can swallow the row, leaving last_insert_rowid stale.
        let rowid = self.conn.last_insert_rowid();
        if changed != 1 || rowid <= 0 {
            return Err(RepoError::IdentityRetrieval { rowid });
        }

        Ok(rowid)
    }
}

fn parse_album_row(row: &Row<'_>) -> rusqlite::Result<Album> {
    Ok(Album {
        id: row.get("id")?,
        title: row.get("title")?,
        artist: row.get("artist")?,
        price: row.get("price")?,
    })
}

fn query_error(op: AlbumOp) -> impl Fn(rusqlite::Error) -> RepoError {
    move |source| RepoError::Query { op, source }
}

fn scan_error(op: AlbumOp) -> impl Fn(rusqlite::Error) -> RepoError {
    move |source| RepoError::RowScan { op, source }
}

fn ensure_album_schema(conn: &Connection) -> RepoResult<()> {
    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [ALBUM_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable(ALBUM_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({ALBUM_TABLE});"))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    for &column in ALBUM_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: ALBUM_TABLE,
                column,
            });
        }
    }

    Ok(())
}
