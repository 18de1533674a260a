//! One-shot demo over the album store.
//!
//! # Responsibility
//! - Open and probe the configured database, then run list/get/add once.
//! - Abort with a non-zero exit code on the first error.

use log::{error, info};
use recordings_core::db::fixtures::seed_sample_albums;
use recordings_core::{
    core_version, init_logging, open_db_with_options, ping, AlbumService, AppConfig, NewAlbum,
    SqliteAlbumRepository,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_abort module=cli status=error error={}", err);
            eprintln!("fatal: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );

    let mut conn = open_db_with_options(&config.db_path, &config.db_options)?;
    ping(&conn)?;
    println!("Connected!");

    if config.seed_sample_data {
        let inserted = seed_sample_albums(&mut conn)?;
        if inserted > 0 {
            println!("Seeded {inserted} sample albums.");
        }
    }

    let service = AlbumService::new(SqliteAlbumRepository::try_new(&conn)?);

    let albums = service.albums_by_artist("John Coltrane")?;
    let listed = albums
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    println!("Albums found: [{listed}]");

    let album = service.album_by_id(2)?;
    println!("Album found: {album}");

    let album_id = service.add_album(&NewAlbum::new(
        "The Modern Sound of Betty Carter",
        "Betty Carter",
        49.99,
    ))?;
    println!("New album ID: {album_id}");

    Ok(())
}
