//! Category membership replacement.

use crate::{
    repository::MangaRepository,
    types::{CategoryId, MangaId},
};

/// Moves a manga into an exact set of categories.
pub struct SetMangaCategories<R> {
    manga_repository: R,
}

impl<R: MangaRepository> SetMangaCategories<R> {
    /// Wraps `manga_repository`.
    pub fn new(manga_repository: R) -> Self {
        Self { manga_repository }
    }

    /// Replaces every membership of `manga_id`; duplicates in `category_ids` are dropped.
    pub async fn invoke(&self, manga_id: MangaId, category_ids: &[CategoryId]) -> bool {
        let mut ids = category_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        self.manga_repository.set_manga_categories(manga_id, &ids).await
    }
}
