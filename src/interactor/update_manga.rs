//! Sparse manga updates.

use crate::{
    manga::{Manga, MangaUpdate},
    repository::MangaRepository,
};

/// Applies [`MangaUpdate`] patches.
pub struct UpdateManga<R> {
    manga_repository: R,
}

impl<R: MangaRepository> UpdateManga<R> {
    /// Wraps `manga_repository`.
    pub fn new(manga_repository: R) -> Self {
        Self { manga_repository }
    }

    pub async fn await_update(&self, update: &MangaUpdate) -> bool {
        self.manga_repository.update(update).await
    }

    /// All patches or none.
    pub async fn await_all(&self, updates: &[MangaUpdate]) -> bool {
        self.manga_repository.update_all(updates).await
    }

    /// Toggles library membership, stamping `date_added` when adding.
    pub async fn await_set_favorite(&self, manga: &Manga, favorite: bool, now_ms: i64) -> bool {
        let update = MangaUpdate {
            favorite: Some(favorite),
            date_added: Some(if favorite { now_ms } else { 0 }),
            ..MangaUpdate::new(manga.id)
        };
        self.manga_repository.update(&update).await
    }
}
