use crate::core::inventory::Inventory;
use crate::domain::model::{InventoryRecord, ItemDetails, ItemKind};
use crate::utils::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct BookRow<'a> {
    title: &'a str,
    cost: Decimal,
    genre: &'a str,
    platform: &'a str,
    release_year: u32,
    author: &'a str,
    publisher: &'a str,
}

#[derive(Serialize)]
struct MovieRow<'a> {
    title: &'a str,
    cost: Decimal,
    genre: &'a str,
    platform: &'a str,
    release_year: u32,
    director: &'a str,
    duration_minutes: i64,
}

#[derive(Serialize)]
struct GameRow<'a> {
    title: &'a str,
    cost: Decimal,
    genre: &'a str,
    platform: &'a str,
    release_year: u32,
    developer: &'a str,
    rating: f32,
}

const COMMON_HEADERS: [&str; 5] = ["title", "cost", "genre", "platform", "release_year"];

fn file_name(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Book => "books.csv",
        ItemKind::Movie => "movies.csv",
        ItemKind::VideoGame => "games.csv",
    }
}

fn extra_headers(kind: ItemKind) -> [&'static str; 2] {
    match kind {
        ItemKind::Book => ["author", "publisher"],
        ItemKind::Movie => ["director", "duration_minutes"],
        ItemKind::VideoGame => ["developer", "rating"],
    }
}

fn write_row<W: Write>(writer: &mut csv::Writer<W>, record: &InventoryRecord) -> Result<()> {
    let info = record.info();
    match record.details() {
        ItemDetails::Book { author, publisher } => writer.serialize(BookRow {
            title: &info.title,
            cost: info.cost,
            genre: &info.genre,
            platform: &info.platform,
            release_year: info.release_year,
            author: author.as_str(),
            publisher: publisher.as_str(),
        })?,
        ItemDetails::Movie { director, duration } => writer.serialize(MovieRow {
            title: &info.title,
            cost: info.cost,
            genre: &info.genre,
            platform: &info.platform,
            release_year: info.release_year,
            director: director.as_str(),
            duration_minutes: duration.num_minutes(),
        })?,
        ItemDetails::VideoGame { developer, rating } => writer.serialize(GameRow {
            title: &info.title,
            cost: info.cost,
            genre: &info.genre,
            platform: &info.platform,
            release_year: info.release_year,
            developer: developer.as_str(),
            rating: *rating,
        })?,
    }
    Ok(())
}

/// Writes one quoted CSV file with a header row per item kind into `dir`.
/// Returns the written paths in book, movie, game order.
pub fn export_csv(inventory: &Inventory, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(ItemKind::ALL.len());
    for kind in ItemKind::ALL {
        let path = dir.join(file_name(kind));
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;

        let extra = extra_headers(kind);
        writer.write_record(COMMON_HEADERS.iter().chain(extra.iter()))?;

        for record in inventory.records(kind) {
            write_row(&mut writer, record)?;
        }
        writer.flush()?;

        tracing::debug!(
            path = %path.display(),
            rows = inventory.records(kind).len(),
            "Exported {}s",
            kind
        );
        written.push(path);
    }

    Ok(written)
}

/// Writes every record as a pretty-printed JSON array tagged by `kind`.
pub fn export_json(inventory: &Inventory, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &inventory.to_records())?;
    writer.flush()?;

    tracing::debug!(path = %path.display(), records = inventory.len(), "Exported JSON");
    Ok(())
}
