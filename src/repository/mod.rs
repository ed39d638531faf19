//! Manga data gateway: the repository contract and its SQLite implementation.

/// Row-to-domain mapping.
pub mod mapper;
/// SQLite-backed [`MangaRepository`].
pub mod manga;

use hashbrown::HashSet;

use crate::{
    db::{DbResult, subscription::QuerySubscription},
    manga::{LibraryManga, Manga, MangaUpdate, MangaWithChapterCount},
    types::{CategoryId, MangaId, MangaStatus, SourceId},
};

/// Read and write access to persisted manga.
///
/// Every read comes as a one-shot `async fn` and, where presentation code
/// observes it, as a live [`QuerySubscription`] that re-delivers the full
/// result after each relevant write. Boolean writes log failures and report
/// `false`; their `try_*` counterparts return the error instead.
#[allow(async_fn_in_trait)]
pub trait MangaRepository {
    /// Strict lookup; fails with [`crate::db::DbError::NotFound`] when missing.
    async fn get_manga_by_id(&self, id: MangaId) -> DbResult<Manga>;

    /// Live strict lookup.
    fn get_manga_by_id_as_flow(&self, id: MangaId) -> QuerySubscription<Manga>;

    /// Lookup by source identity, `None` when missing.
    async fn get_manga_by_url_and_source_id(
        &self,
        url: &str,
        source_id: SourceId,
    ) -> DbResult<Option<Manga>>;

    /// Live lookup by source identity.
    fn get_manga_by_url_and_source_id_as_flow(
        &self,
        url: &str,
        source_id: SourceId,
    ) -> QuerySubscription<Option<Manga>>;

    /// All library members.
    async fn get_favorites(&self) -> DbResult<Vec<Manga>>;

    /// Non-library manga with reading progress.
    async fn get_read_manga_not_in_library(&self) -> DbResult<Vec<Manga>>;

    /// Library rows with chapter aggregates, one per category membership.
    async fn get_library_manga(&self) -> DbResult<Vec<LibraryManga>>;

    /// Live library rows.
    fn get_library_manga_as_flow(&self) -> QuerySubscription<Vec<LibraryManga>>;

    /// Live library members of one source.
    fn get_favorites_by_source_id(&self, source_id: SourceId) -> QuerySubscription<Vec<Manga>>;

    /// Live excluded manga of one source.
    fn get_excluded_by_source_id(&self, source_id: SourceId) -> QuerySubscription<Vec<Manga>>;

    /// Library members whose title contains `title`, other than `id`.
    async fn get_duplicate_library_manga(
        &self,
        id: MangaId,
        title: &str,
    ) -> DbResult<Vec<MangaWithChapterCount>>;

    /// Live library members due for refresh from the start of today, with a
    /// status in `statuses`.
    fn get_upcoming_manga(&self, statuses: &HashSet<MangaStatus>) -> QuerySubscription<Vec<Manga>>;

    /// Category memberships of a manga.
    async fn get_manga_category_ids(&self, manga_id: MangaId) -> DbResult<Vec<CategoryId>>;

    /// Clears the viewer flags of every manga.
    async fn try_reset_viewer_flags(&self) -> DbResult<()>;

    /// Boolean form of [`MangaRepository::try_reset_viewer_flags`].
    async fn reset_viewer_flags(&self) -> bool;

    /// Replaces the `mask` bits of one manga's viewer flags with those of
    /// `value` in a single write, leaving every other bit as stored.
    /// Fails with [`crate::db::DbError::NotFound`] when `id` is missing.
    async fn try_set_viewer_flags(&self, id: MangaId, value: i64, mask: i64) -> DbResult<()>;

    /// Boolean form of [`MangaRepository::try_set_viewer_flags`].
    async fn set_viewer_flags(&self, id: MangaId, value: i64, mask: i64) -> bool;

    /// Atomically replaces the category memberships of a manga.
    async fn try_set_manga_categories(
        &self,
        manga_id: MangaId,
        category_ids: &[CategoryId],
    ) -> DbResult<()>;

    /// Boolean form of [`MangaRepository::try_set_manga_categories`].
    async fn set_manga_categories(&self, manga_id: MangaId, category_ids: &[CategoryId]) -> bool;

    /// Applies one sparse patch.
    async fn try_update(&self, update: &MangaUpdate) -> DbResult<()>;

    /// Boolean form of [`MangaRepository::try_update`].
    async fn update(&self, update: &MangaUpdate) -> bool;

    /// Applies several sparse patches in one transaction.
    async fn try_update_all(&self, updates: &[MangaUpdate]) -> DbResult<()>;

    /// Boolean form of [`MangaRepository::try_update_all`].
    async fn update_all(&self, updates: &[MangaUpdate]) -> bool;

    /// Stores manga discovered on a source and returns the stored rows.
    async fn insert_network_manga(&self, manga: &[Manga]) -> DbResult<Vec<Manga>>;
}
