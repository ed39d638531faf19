//! Duplicate detection against the library.

use crate::{
    db::DbResult,
    manga::{Manga, MangaWithChapterCount},
    repository::MangaRepository,
};

/// Finds library entries that look like `manga` under another id.
pub struct GetDuplicateLibraryManga<R> {
    manga_repository: R,
}

impl<R: MangaRepository> GetDuplicateLibraryManga<R> {
    /// Wraps `manga_repository`.
    pub fn new(manga_repository: R) -> Self {
        Self { manga_repository }
    }

    /// Library members whose title contains the trimmed title of `manga`.
    /// A blank title matches nothing.
    pub async fn invoke(&self, manga: &Manga) -> DbResult<Vec<MangaWithChapterCount>> {
        let title = manga.title.trim();
        if title.is_empty() {
            return Ok(Vec::new());
        }
        self.manga_repository
            .get_duplicate_library_manga(manga.id, title)
            .await
    }
}
