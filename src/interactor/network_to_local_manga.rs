//! Storing manga discovered on a source.

use crate::{
    db::{DbError, DbResult},
    manga::Manga,
    repository::MangaRepository,
};

/// Persists manga seen on a source and hands back the stored rows.
pub struct NetworkToLocalManga<R> {
    manga_repository: R,
}

impl<R: MangaRepository> NetworkToLocalManga<R> {
    /// Wraps `manga_repository`.
    pub fn new(manga_repository: R) -> Self {
        Self { manga_repository }
    }

    /// Stores one manga and returns its row.
    pub async fn invoke(&self, manga: Manga) -> DbResult<Manga> {
        let mut stored = self.invoke_all(std::slice::from_ref(&manga)).await?;
        stored.pop().ok_or(DbError::NotFound)
    }

    /// Stores `manga` in one transaction; rows come back in input order.
    pub async fn invoke_all(&self, manga: &[Manga]) -> DbResult<Vec<Manga>> {
        if manga.is_empty() {
            return Ok(Vec::new());
        }
        self.manga_repository.insert_network_manga(manga).await
    }
}
