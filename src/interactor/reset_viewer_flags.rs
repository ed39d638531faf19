//! Bulk reset of per-manga reader settings.

use crate::repository::MangaRepository;

/// Returns every manga to the global reading mode and orientation.
pub struct ResetViewerFlags<R> {
    manga_repository: R,
}

impl<R: MangaRepository> ResetViewerFlags<R> {
    /// Wraps `manga_repository`.
    pub fn new(manga_repository: R) -> Self {
        Self { manga_repository }
    }

    /// `false` when the write failed.
    pub async fn invoke(&self) -> bool {
        self.manga_repository.reset_viewer_flags().await
    }
}
