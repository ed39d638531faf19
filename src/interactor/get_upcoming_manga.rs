//! Library refresh schedule.

use hashbrown::HashSet;

use crate::{
    db::subscription::QuerySubscription,
    manga::Manga,
    repository::MangaRepository,
    types::MangaStatus,
};

/// Statuses that can still produce chapters.
pub const UPCOMING_STATUSES: [MangaStatus; 2] =
    [MangaStatus::Ongoing, MangaStatus::PublishingFinished];

/// Library members expected to receive new chapters, soonest first.
pub struct GetUpcomingManga<R> {
    manga_repository: R,
}

impl<R: MangaRepository> GetUpcomingManga<R> {
    /// Wraps `manga_repository`.
    pub fn new(manga_repository: R) -> Self {
        Self { manga_repository }
    }

    /// Live schedule limited to [`UPCOMING_STATUSES`].
    pub fn subscribe(&self) -> QuerySubscription<Vec<Manga>> {
        let statuses: HashSet<MangaStatus> = UPCOMING_STATUSES.into_iter().collect();
        self.manga_repository.get_upcoming_manga(&statuses)
    }
}
