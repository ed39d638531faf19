//! Per-manga reading mode and orientation.

use crate::{
    reader::{mode::ReadingMode, orientation::ReaderOrientation},
    repository::MangaRepository,
    types::MangaId,
};

/// Writes one of the bit-fields packed into a manga's viewer flags,
/// preserving the others.
pub struct SetMangaViewerFlags<R> {
    manga_repository: R,
}

impl<R: MangaRepository> SetMangaViewerFlags<R> {
    /// Wraps `manga_repository`.
    pub fn new(manga_repository: R) -> Self {
        Self { manga_repository }
    }

    /// Stores `mode` in the reading-mode bits; `false` when `id` is missing.
    pub async fn await_set_reading_mode(&self, id: MangaId, mode: ReadingMode) -> bool {
        self.manga_repository
            .set_viewer_flags(id, mode.flag_value(), ReadingMode::MASK)
            .await
    }

    /// Stores `orientation` in the orientation bits; `false` when `id` is missing.
    pub async fn await_set_orientation(&self, id: MangaId, orientation: ReaderOrientation) -> bool {
        self.manga_repository
            .set_viewer_flags(id, orientation.flag_value(), ReaderOrientation::MASK)
            .await
    }
}
