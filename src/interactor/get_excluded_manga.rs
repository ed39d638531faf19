//! Live excluded manga of a source.

use crate::{
    db::subscription::QuerySubscription,
    manga::Manga,
    repository::MangaRepository,
    types::SourceId,
};

/// Live list of manga hidden from a source's browse results.
pub struct GetExcludedManga<R> {
    manga_repository: R,
}

impl<R: MangaRepository> GetExcludedManga<R> {
    pub fn new(manga_repository: R) -> Self {
        Self { manga_repository }
    }

    pub fn subscribe(&self, source_id: SourceId) -> QuerySubscription<Vec<Manga>> {
        self.manga_repository.get_excluded_by_source_id(source_id)
    }
}
