//! Library listing.

use crate::{
    db::{DbResult, subscription::QuerySubscription},
    manga::LibraryManga,
    repository::MangaRepository,
};

/// Library rows with their chapter aggregates, one per category membership.
pub struct GetLibraryManga<R> {
    manga_repository: R,
}

impl<R: MangaRepository> GetLibraryManga<R> {
    /// Wraps `manga_repository`.
    pub fn new(manga_repository: R) -> Self {
        Self { manga_repository }
    }

    /// Current library rows.
    pub async fn await_all(&self) -> DbResult<Vec<LibraryManga>> {
        self.manga_repository.get_library_manga().await
    }

    /// Library rows, re-delivered after chapter, category or manga writes.
    pub fn subscribe(&self) -> QuerySubscription<Vec<LibraryManga>> {
        self.manga_repository.get_library_manga_as_flow()
    }
}
