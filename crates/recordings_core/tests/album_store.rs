use recordings_core::db::fixtures::seed_sample_albums;
use recordings_core::db::migrations::latest_version;
use recordings_core::db::open_db_in_memory;
use recordings_core::{
    Album, AlbumOp, AlbumRepository, AlbumService, NewAlbum, RepoError, SqliteAlbumRepository,
};
use rusqlite::Connection;
use std::collections::HashSet;
use std::error::Error;

fn seeded_connection() -> Connection {
    let mut conn = open_db_in_memory().unwrap();
    seed_sample_albums(&mut conn).unwrap();
    conn
}

#[test]
fn albums_by_artist_returns_only_matching_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let blue_train = repo
        .add_album(&NewAlbum::new("Blue Train", "John Coltrane", 56.99))
        .unwrap();
    let giant_steps = repo
        .add_album(&NewAlbum::new("Giant Steps", "John Coltrane", 63.99))
        .unwrap();
    repo.add_album(&NewAlbum::new("Jeru", "Gerry Mulligan", 17.99))
        .unwrap();

    let albums = repo.albums_by_artist("John Coltrane").unwrap();
    assert_eq!(albums.len(), 2);

    let ids: HashSet<_> = albums.iter().map(|album| album.id).collect();
    assert_eq!(ids, HashSet::from([blue_train, giant_steps]));
    assert!(albums.iter().all(|album| album.artist == "John Coltrane"));
}

#[test]
fn albums_by_artist_without_matches_is_empty_not_error() {
    let conn = seeded_connection();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    for artist in ["Betty Carter", "", "john coltrane", "John Coltrane "] {
        let albums = repo.albums_by_artist(artist).unwrap();
        assert!(albums.is_empty(), "expected no rows for {artist:?}");
    }
}

#[test]
fn album_by_id_returns_exact_sample_record() {
    let conn = seeded_connection();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let album = repo.album_by_id(2).unwrap();
    assert_eq!(
        album,
        Album {
            id: 2,
            title: "Giant Steps".to_string(),
            artist: "John Coltrane".to_string(),
            price: 63.99,
        }
    );
}

#[test]
fn album_by_id_unknown_returns_not_found() {
    let conn = seeded_connection();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    for id in [0, -1, 5, 999, i64::MAX] {
        let err = repo.album_by_id(id).unwrap_err();
        assert!(
            matches!(err, RepoError::NotFound(missing) if missing == id),
            "unexpected error for id {id}: {err}"
        );
        assert_eq!(err.op(), Some(AlbumOp::GetById));
    }
}

#[test]
fn add_album_then_get_roundtrips_fields() {
    let conn = seeded_connection();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let payload = NewAlbum::new("The Modern Sound of Betty Carter", "Betty Carter", 49.99);
    let id = repo.add_album(&payload).unwrap();

    let loaded = repo.album_by_id(id).unwrap();
    assert_eq!(loaded, payload.with_id(id));
}

#[test]
fn add_album_returns_fresh_positive_ids() {
    let conn = seeded_connection();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let mut seen: HashSet<i64> = conn
        .prepare("SELECT id FROM album;")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<rusqlite::Result<_>>()
        .unwrap();

    for n in 0..10 {
        let id = repo
            .add_album(&NewAlbum::new(format!("Take {n}"), "Betty Carter", 49.99))
            .unwrap();
        assert!(id > 0);
        assert!(seen.insert(id), "id {id} was handed out twice");
    }
}

#[test]
fn add_album_never_reuses_id_of_removed_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let first = repo
        .add_album(&NewAlbum::new("Jeru", "Gerry Mulligan", 17.99))
        .unwrap();
    conn.execute("DELETE FROM album WHERE id = ?1;", [first])
        .unwrap();

    let second = repo
        .add_album(&NewAlbum::new("Jeru", "Gerry Mulligan", 17.99))
        .unwrap();
    assert!(second > first);
}

#[test]
fn add_album_accepts_negative_price_unvalidated() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let id = repo
        .add_album(&NewAlbum::new("Refund", "Nobody", -1.5))
        .unwrap();
    assert_eq!(repo.album_by_id(id).unwrap().price, -1.5);
}

#[test]
fn mismatched_column_type_surfaces_as_row_scan_error() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO album (title, artist, price) VALUES ('Broken', 'Glitch', 'not a number');",
        [],
    )
    .unwrap();
    let id = conn.last_insert_rowid();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let list_err = repo.albums_by_artist("Glitch").unwrap_err();
    assert!(
        matches!(list_err, RepoError::RowScan { op: AlbumOp::ListByArtist, .. }),
        "unexpected error: {list_err}"
    );

    let get_err = repo.album_by_id(id).unwrap_err();
    assert!(
        matches!(get_err, RepoError::RowScan { op: AlbumOp::GetById, .. }),
        "unexpected error: {get_err}"
    );
    assert!(get_err.source().is_some());
}

#[test]
fn dropped_table_surfaces_as_query_and_write_errors() {
    let conn = seeded_connection();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();
    conn.execute_batch("DROP TABLE album;").unwrap();

    let list_err = repo.albums_by_artist("John Coltrane").unwrap_err();
    assert!(matches!(
        list_err,
        RepoError::Query { op: AlbumOp::ListByArtist, .. }
    ));
    assert!(list_err.to_string().starts_with("albums_by_artist:"));

    let get_err = repo.album_by_id(2).unwrap_err();
    assert!(matches!(get_err, RepoError::Query { op: AlbumOp::GetById, .. }));

    let add_err = repo
        .add_album(&NewAlbum::new("Jeru", "Gerry Mulligan", 17.99))
        .unwrap_err();
    assert!(matches!(add_err, RepoError::Write { .. }));
}

#[test]
fn read_only_connection_rejects_insert_with_write_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();
    conn.execute_batch("PRAGMA query_only = ON;").unwrap();

    let err = repo
        .add_album(&NewAlbum::new("Jeru", "Gerry Mulligan", 17.99))
        .unwrap_err();
    assert!(matches!(err, RepoError::Write { .. }), "unexpected error: {err}");
    assert_eq!(err.op(), Some(AlbumOp::Insert));
    assert!(err.source().is_some());
}

#[test]
fn swallowed_insert_surfaces_as_identity_retrieval_error() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER album_discard_inserts BEFORE INSERT ON album
         BEGIN
             SELECT RAISE(IGNORE);
         END;",
    )
    .unwrap();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let err = repo
        .add_album(&NewAlbum::new("Ghost", "Nobody", 1.0))
        .unwrap_err();
    assert!(
        matches!(err, RepoError::IdentityRetrieval { rowid: 0 }),
        "unexpected error: {err}"
    );
}

#[test]
fn service_wraps_repository_calls() {
    let conn = seeded_connection();
    let service = AlbumService::new(SqliteAlbumRepository::try_new(&conn).unwrap());

    assert_eq!(service.albums_by_artist("John Coltrane").unwrap().len(), 2);
    assert_eq!(service.album_by_id(3).unwrap().title, "Jeru");

    let id = service
        .add_album(&NewAlbum::new("The Modern Sound of Betty Carter", "Betty Carter", 49.99))
        .unwrap();
    assert_eq!(id, 5);
    assert!(matches!(
        service.album_by_id(404).unwrap_err(),
        RepoError::NotFound(404)
    ));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteAlbumRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_album_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteAlbumRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("album"))));
}

#[test]
fn repository_rejects_album_table_missing_price_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE album (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            artist TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteAlbumRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "album",
            column: "price"
        })
    ));
}
