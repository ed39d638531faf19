//! Manga domain record, sparse update patch, and library aggregates.

use serde::{Deserialize, Serialize};

use crate::{
    reader::{mode::ReadingMode, orientation::ReaderOrientation},
    types::{CategoryId, MangaId, MangaStatus, SourceId, UpdateStrategy},
};

/// Fully materialized manga row.
///
/// `id` is assigned by the store; a value of `0` marks a record that has not
/// been persisted yet. Millisecond timestamps are used for `last_update`,
/// `next_update`, `date_added` and `cover_last_modified`; the store-maintained
/// `last_modified_at` and `favorite_modified_at` are in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manga {
    /// Store-assigned identifier.
    pub id: MangaId,
    /// Source the manga belongs to.
    pub source: SourceId,
    /// Library membership.
    pub favorite: bool,
    /// Last time new chapters were found, in milliseconds.
    pub last_update: i64,
    /// Next scheduled library refresh, in milliseconds.
    pub next_update: i64,
    /// Refresh interval in days.
    pub fetch_interval: i32,
    /// When the manga was added to the library, in milliseconds.
    pub date_added: i64,
    /// Packed reading mode and orientation bits.
    pub viewer_flags: i64,
    /// Packed chapter list display flags.
    pub chapter_flags: i64,
    /// Cover cache key, in milliseconds.
    pub cover_last_modified: i64,
    /// Source-relative URL.
    pub url: String,
    /// Display title.
    pub title: String,
    /// Artist credit.
    pub artist: Option<String>,
    /// Author credit.
    pub author: Option<String>,
    /// Synopsis.
    pub description: Option<String>,
    /// Genre tags.
    pub genre: Option<Vec<String>>,
    /// Publication status.
    pub status: MangaStatus,
    /// Cover URL.
    pub thumbnail_url: Option<String>,
    /// Library refresh policy.
    pub update_strategy: UpdateStrategy,
    /// True once details were fetched from the source.
    pub initialized: bool,
    /// Store-maintained modification time, in seconds.
    pub last_modified_at: i64,
    /// Store-maintained time of the last favorite toggle, in seconds.
    pub favorite_modified_at: Option<i64>,
    /// Store-maintained sync version.
    pub version: i64,
    /// True while a sync is writing the row.
    pub is_syncing: bool,
    /// Free-form user notes.
    pub notes: String,
    /// Hidden from browse results of its source.
    pub excluded: bool,
}

impl Manga {
    /// Unsaved manga with the identifying fields filled in.
    pub fn create(source: SourceId, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source,
            url: url.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Reading-mode bits of [`Manga::viewer_flags`].
    pub fn reading_mode(&self) -> i64 {
        self.viewer_flags & ReadingMode::MASK
    }

    /// Orientation bits of [`Manga::viewer_flags`].
    pub fn orientation(&self) -> i64 {
        self.viewer_flags & ReaderOrientation::MASK
    }
}

/// Sparse patch where each `Some` field overwrites the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MangaUpdate {
    /// Row to patch.
    pub id: MangaId,
    /// Optional replacement for source.
    pub source: Option<SourceId>,
    /// Optional replacement for favorite.
    pub favorite: Option<bool>,
    /// Optional replacement for last update.
    pub last_update: Option<i64>,
    /// Optional replacement for next update.
    pub next_update: Option<i64>,
    /// Optional replacement for fetch interval.
    pub fetch_interval: Option<i32>,
    /// Optional replacement for date added.
    pub date_added: Option<i64>,
    /// Optional replacement for viewer flags.
    pub viewer_flags: Option<i64>,
    /// Optional replacement for chapter flags.
    pub chapter_flags: Option<i64>,
    /// Optional replacement for cover modification time.
    pub cover_last_modified: Option<i64>,
    /// Optional replacement for url.
    pub url: Option<String>,
    /// Optional replacement for title.
    pub title: Option<String>,
    /// Optional replacement for artist.
    pub artist: Option<String>,
    /// Optional replacement for author.
    pub author: Option<String>,
    /// Optional replacement for description.
    pub description: Option<String>,
    /// Optional replacement for genre.
    pub genre: Option<Vec<String>>,
    /// Optional replacement for status.
    pub status: Option<MangaStatus>,
    /// Optional replacement for thumbnail url.
    pub thumbnail_url: Option<String>,
    /// Optional replacement for update strategy.
    pub update_strategy: Option<UpdateStrategy>,
    /// Optional replacement for initialized.
    pub initialized: Option<bool>,
    /// Optional replacement for version.
    pub version: Option<i64>,
    /// Optional replacement for notes.
    pub notes: Option<String>,
    /// Optional replacement for excluded.
    pub excluded: Option<bool>,
}

impl MangaUpdate {
    /// Empty patch targeting `id`.
    pub fn new(id: MangaId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Returns true when no fields besides `id` are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::new(self.id)
    }

    /// Applies this patch in place to `manga`, mirroring the stored update.
    pub fn apply_to(&self, manga: &mut Manga) {
        if let Some(v) = self.source {
            manga.source = v;
        }
        if let Some(v) = self.favorite {
            manga.favorite = v;
        }
        if let Some(v) = self.last_update {
            manga.last_update = v;
        }
        if let Some(v) = self.next_update {
            manga.next_update = v;
        }
        if let Some(v) = self.fetch_interval {
            manga.fetch_interval = v;
        }
        if let Some(v) = self.date_added {
            manga.date_added = v;
        }
        if let Some(v) = self.viewer_flags {
            manga.viewer_flags = v;
        }
        if let Some(v) = self.chapter_flags {
            manga.chapter_flags = v;
        }
        if let Some(v) = self.cover_last_modified {
            manga.cover_last_modified = v;
        }
        if let Some(v) = &self.url {
            manga.url = v.clone();
        }
        if let Some(v) = &self.title {
            manga.title = v.clone();
        }
        if let Some(v) = &self.artist {
            manga.artist = Some(v.clone());
        }
        if let Some(v) = &self.author {
            manga.author = Some(v.clone());
        }
        if let Some(v) = &self.description {
            manga.description = Some(v.clone());
        }
        if let Some(v) = &self.genre {
            manga.genre = Some(v.clone());
        }
        if let Some(v) = self.status {
            manga.status = v;
        }
        if let Some(v) = &self.thumbnail_url {
            manga.thumbnail_url = Some(v.clone());
        }
        if let Some(v) = self.update_strategy {
            manga.update_strategy = v;
        }
        if let Some(v) = self.initialized {
            manga.initialized = v;
        }
        if let Some(v) = self.version {
            manga.version = v;
        }
        if let Some(v) = &self.notes {
            manga.notes = v.clone();
        }
        if let Some(v) = self.excluded {
            manga.excluded = v;
        }
        manga.is_syncing = false;
    }
}

/// Library row: a favorite manga in one of its categories plus chapter aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryManga {
    /// The manga.
    pub manga: Manga,
    /// Category of this row, `0` when the manga is uncategorized.
    pub category: CategoryId,
    /// Number of chapters.
    pub total_chapters: i64,
    /// Number of read chapters.
    pub read_count: i64,
    /// Number of bookmarked chapters.
    pub bookmark_count: i64,
    /// Newest chapter upload time, in milliseconds.
    pub latest_upload: i64,
    /// Newest chapter fetch time, in milliseconds.
    pub chapter_fetched_at: i64,
}

impl LibraryManga {
    /// Chapters not read yet.
    pub fn unread_count(&self) -> i64 {
        self.total_chapters - self.read_count
    }

    /// True when at least one chapter was read.
    pub fn has_started(&self) -> bool {
        self.read_count > 0
    }

    /// True when at least one chapter is bookmarked.
    pub fn has_bookmarks(&self) -> bool {
        self.bookmark_count > 0
    }
}

/// Manga paired with its chapter count, used by duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MangaWithChapterCount {
    /// The manga.
    pub manga: Manga,
    /// Number of stored chapters.
    pub chapter_count: i64,
}
