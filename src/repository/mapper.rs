//! Row-to-domain mapping for the manga tables.

use rusqlite::{Row, types::Type};

use crate::{
    manga::{LibraryManga, Manga, MangaWithChapterCount},
    types::{MangaStatus, UpdateStrategy},
};

/// Maps a row containing every `mangas` column, addressed by name.
pub fn map_manga(row: &Row<'_>) -> rusqlite::Result<Manga> {
    Ok(Manga {
        id: row.get("_id")?,
        source: row.get("source")?,
        favorite: row.get("favorite")?,
        last_update: row.get("last_update")?,
        next_update: row.get("next_update")?,
        fetch_interval: row.get("calculate_interval")?,
        date_added: row.get("date_added")?,
        viewer_flags: row.get("viewer")?,
        chapter_flags: row.get("chapter_flags")?,
        cover_last_modified: row.get("cover_last_modified")?,
        url: row.get("url")?,
        title: row.get("title")?,
        artist: row.get("artist")?,
        author: row.get("author")?,
        description: row.get("description")?,
        genre: decode_genre(row)?,
        status: MangaStatus::from_code(row.get("status")?),
        thumbnail_url: row.get("thumbnail_url")?,
        update_strategy: UpdateStrategy::from_code(row.get("update_strategy")?),
        initialized: row.get("initialized")?,
        last_modified_at: row.get("last_modified_at")?,
        favorite_modified_at: row.get("favorite_modified_at")?,
        version: row.get("version")?,
        is_syncing: row.get("is_syncing")?,
        notes: row.get("notes")?,
        excluded: row.get("excluded")?,
    })
}

/// Maps a library view row.
pub fn map_library_manga(row: &Row<'_>) -> rusqlite::Result<LibraryManga> {
    Ok(LibraryManga {
        manga: map_manga(row)?,
        category: row.get("category")?,
        total_chapters: row.get("total_count")?,
        read_count: row.get("read_count")?,
        bookmark_count: row.get("bookmark_count")?,
        latest_upload: row.get("latest_upload")?,
        chapter_fetched_at: row.get("chapter_fetched_at")?,
    })
}

/// Maps a manga row carrying a `chapter_count` column.
pub fn map_manga_with_chapter_count(row: &Row<'_>) -> rusqlite::Result<MangaWithChapterCount> {
    Ok(MangaWithChapterCount {
        manga: map_manga(row)?,
        chapter_count: row.get("chapter_count")?,
    })
}

/// Encodes a genre list as the JSON array stored in `mangas.genre`.
pub fn encode_genre(genre: Option<&[String]>) -> serde_json::Result<Option<String>> {
    genre.map(serde_json::to_string).transpose()
}

fn decode_genre(row: &Row<'_>) -> rusqlite::Result<Option<Vec<String>>> {
    let raw: Option<String> = row.get("genre")?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    serde_json::from_str(&raw).map(Some).map_err(|err| {
        let idx = row.as_ref().column_index("genre").unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
    })
}
