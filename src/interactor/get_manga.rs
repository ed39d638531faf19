//! Single manga lookups.

use crate::{
    db::{DbResult, subscription::QuerySubscription},
    manga::Manga,
    repository::MangaRepository,
    types::{MangaId, SourceId},
};

/// Lookups of a single manga.
pub struct GetManga<R> {
    manga_repository: R,
}

impl<R: MangaRepository> GetManga<R> {
    /// Wraps `manga_repository`.
    pub fn new(manga_repository: R) -> Self {
        Self { manga_repository }
    }

    /// `None` when the manga is missing or the read fails.
    pub async fn await_by_id(&self, id: MangaId) -> Option<Manga> {
        match self.manga_repository.get_manga_by_id(id).await {
            Ok(manga) => Some(manga),
            Err(err) => {
                tracing::error!(id, error = %err, "failed to load manga");
                None
            }
        }
    }

    pub async fn await_by_url(&self, url: &str, source_id: SourceId) -> DbResult<Option<Manga>> {
        self.manga_repository
            .get_manga_by_url_and_source_id(url, source_id)
            .await
    }

    pub fn subscribe(&self, id: MangaId) -> QuerySubscription<Manga> {
        self.manga_repository.get_manga_by_id_as_flow(id)
    }

    pub fn subscribe_by_url(
        &self,
        url: &str,
        source_id: SourceId,
    ) -> QuerySubscription<Option<Manga>> {
        self.manga_repository
            .get_manga_by_url_and_source_id_as_flow(url, source_id)
    }
}
