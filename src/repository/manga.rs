//! SQLite implementation of [`MangaRepository`].

use chrono::{Local, NaiveTime};
use hashbrown::HashSet;
use rusqlite::{Connection, OptionalExtension, Params, Row, named_params, params};
use tracing::{debug, error};

use crate::{
    db::{DbError, DbResult, Table, handler::DatabaseHandler, subscription::QuerySubscription},
    manga::{LibraryManga, Manga, MangaUpdate, MangaWithChapterCount},
    types::{CategoryId, MangaId, MangaStatus, SourceId},
};

use super::{
    MangaRepository,
    mapper::{encode_genre, map_library_manga, map_manga, map_manga_with_chapter_count},
};

const GET_MANGA_BY_ID: &str = "SELECT * FROM mangas WHERE _id = ?1";

const GET_MANGA_BY_URL_AND_SOURCE: &str =
    "SELECT * FROM mangas WHERE url = ?1 AND source = ?2 LIMIT 1";

const GET_FAVORITES: &str = "SELECT * FROM mangas WHERE favorite = 1 ORDER BY title";

const GET_READ_MANGA_NOT_IN_LIBRARY: &str = "SELECT * FROM mangas WHERE favorite = 0 AND _id IN (
    SELECT DISTINCT manga_id FROM chapters WHERE read = 1 OR last_page_read != 0
)";

const GET_FAVORITES_BY_SOURCE: &str =
    "SELECT * FROM mangas WHERE favorite = 1 AND source = ?1 ORDER BY title";

const GET_EXCLUDED_BY_SOURCE: &str =
    "SELECT * FROM mangas WHERE excluded = 1 AND source = ?1 ORDER BY title";

const LIBRARY: &str = "SELECT M.*,
    coalesce(MC.category_id, 0) AS category,
    coalesce(C.total_count, 0) AS total_count,
    coalesce(C.read_count, 0) AS read_count,
    coalesce(C.bookmark_count, 0) AS bookmark_count,
    coalesce(C.latest_upload, 0) AS latest_upload,
    coalesce(C.chapter_fetched_at, 0) AS chapter_fetched_at
FROM mangas M
LEFT JOIN (
    SELECT manga_id,
        count(*) AS total_count,
        sum(read) AS read_count,
        sum(bookmark) AS bookmark_count,
        max(date_upload) AS latest_upload,
        max(date_fetch) AS chapter_fetched_at
    FROM chapters
    GROUP BY manga_id
) C ON M._id = C.manga_id
LEFT JOIN mangas_categories MC ON MC.manga_id = M._id
WHERE M.favorite = 1
ORDER BY M.title, category";

const GET_DUPLICATE_LIBRARY_MANGA: &str = "SELECT M.*, coalesce(C.chapter_count, 0) AS chapter_count
FROM mangas M
LEFT JOIN (
    SELECT manga_id, count(*) AS chapter_count FROM chapters GROUP BY manga_id
) C ON M._id = C.manga_id
WHERE M.favorite = 1 AND M._id != ?1 AND instr(lower(M.title), lower(?2)) > 0
ORDER BY M.title";

const GET_UPCOMING_MANGA: &str = "SELECT * FROM mangas
WHERE favorite = 1
    AND next_update >= ?1
    AND status IN (SELECT value FROM json_each(?2))
ORDER BY next_update ASC";

const GET_MANGA_CATEGORY_IDS: &str =
    "SELECT category_id FROM mangas_categories WHERE manga_id = ?1 ORDER BY category_id";

const RESET_VIEWER_FLAGS: &str = "UPDATE mangas SET viewer = 0";

const SET_VIEWER_FLAGS: &str = "UPDATE mangas SET
    viewer = (viewer & ~:mask) | (:value & :mask),
    is_syncing = 0
WHERE _id = :id";

const DELETE_MANGA_CATEGORIES: &str = "DELETE FROM mangas_categories WHERE manga_id = ?1";

const INSERT_MANGA_CATEGORY: &str =
    "INSERT INTO mangas_categories(manga_id, category_id) VALUES (?1, ?2)";

const PARTIAL_UPDATE: &str = "UPDATE mangas SET
    source = coalesce(:source, source),
    url = coalesce(:url, url),
    artist = coalesce(:artist, artist),
    author = coalesce(:author, author),
    description = coalesce(:description, description),
    genre = coalesce(:genre, genre),
    title = coalesce(:title, title),
    status = coalesce(:status, status),
    thumbnail_url = coalesce(:thumbnail_url, thumbnail_url),
    favorite = coalesce(:favorite, favorite),
    last_update = coalesce(:last_update, last_update),
    next_update = coalesce(:next_update, next_update),
    calculate_interval = coalesce(:fetch_interval, calculate_interval),
    initialized = coalesce(:initialized, initialized),
    viewer = coalesce(:viewer, viewer),
    chapter_flags = coalesce(:chapter_flags, chapter_flags),
    cover_last_modified = coalesce(:cover_last_modified, cover_last_modified),
    date_added = coalesce(:date_added, date_added),
    update_strategy = coalesce(:update_strategy, update_strategy),
    version = coalesce(:version, version),
    is_syncing = 0,
    notes = coalesce(:notes, notes),
    excluded = coalesce(:excluded, excluded)
WHERE _id = :id";

const INSERT_NETWORK_MANGA: &str = "INSERT INTO mangas(
    source, url, artist, author, description, genre, title, status, thumbnail_url,
    favorite, last_update, next_update, calculate_interval, initialized, viewer,
    chapter_flags, cover_last_modified, date_added, update_strategy, version, notes, excluded
)
SELECT :source, :url, :artist, :author, :description, :genre, :title, :status, :thumbnail_url,
    :favorite, :last_update, :next_update, :fetch_interval, :initialized, :viewer,
    :chapter_flags, :cover_last_modified, :date_added, :update_strategy, :version, :notes, :excluded
WHERE NOT EXISTS (SELECT 0 FROM mangas WHERE source = :source AND url = :url)";

const REFRESH_NETWORK_MANGA: &str = "UPDATE mangas SET
    title = CASE WHEN :update_title THEN :title ELSE title END,
    thumbnail_url = CASE WHEN :update_cover THEN :thumbnail_url ELSE thumbnail_url END,
    author = CASE WHEN :update_details THEN :author ELSE author END,
    artist = CASE WHEN :update_details THEN :artist ELSE artist END,
    description = CASE WHEN :update_details THEN :description ELSE description END,
    genre = CASE WHEN :update_details THEN :genre ELSE genre END,
    status = CASE WHEN :update_details THEN :status ELSE status END,
    update_strategy = CASE WHEN :update_details THEN :update_strategy ELSE update_strategy END,
    initialized = CASE WHEN :update_details THEN :initialized ELSE initialized END
WHERE source = :source AND url = :url AND favorite = 0";

const MANGA_TABLES: &[Table] = &[Table::Mangas];
const LIBRARY_TABLES: &[Table] = &[Table::Mangas, Table::Chapters, Table::MangasCategories];

/// [`MangaRepository`] over a [`DatabaseHandler`].
#[derive(Clone)]
pub struct SqlMangaRepository {
    handler: DatabaseHandler,
}

impl SqlMangaRepository {
    /// Wraps `handler`.
    pub fn new(handler: DatabaseHandler) -> Self {
        Self { handler }
    }
}

impl MangaRepository for SqlMangaRepository {
    async fn get_manga_by_id(&self, id: MangaId) -> DbResult<Manga> {
        self.handler
            .await_one(move |conn| query_one(conn, GET_MANGA_BY_ID, params![id], map_manga))
            .await
    }

    fn get_manga_by_id_as_flow(&self, id: MangaId) -> QuerySubscription<Manga> {
        self.handler.subscribe_to_one(MANGA_TABLES, move |conn| {
            query_one(conn, GET_MANGA_BY_ID, params![id], map_manga)
        })
    }

    async fn get_manga_by_url_and_source_id(
        &self,
        url: &str,
        source_id: SourceId,
    ) -> DbResult<Option<Manga>> {
        let url = url.to_string();
        self.handler
            .await_one_or_null(move |conn| {
                query_one(conn, GET_MANGA_BY_URL_AND_SOURCE, params![url, source_id], map_manga)
            })
            .await
    }

    fn get_manga_by_url_and_source_id_as_flow(
        &self,
        url: &str,
        source_id: SourceId,
    ) -> QuerySubscription<Option<Manga>> {
        let url = url.to_string();
        self.handler.subscribe_to_one_or_null(MANGA_TABLES, move |conn| {
            query_one(conn, GET_MANGA_BY_URL_AND_SOURCE, params![url, source_id], map_manga)
        })
    }

    async fn get_favorites(&self) -> DbResult<Vec<Manga>> {
        self.handler
            .await_list(|conn| query_list(conn, GET_FAVORITES, [], map_manga))
            .await
    }

    async fn get_read_manga_not_in_library(&self) -> DbResult<Vec<Manga>> {
        self.handler
            .await_list(|conn| query_list(conn, GET_READ_MANGA_NOT_IN_LIBRARY, [], map_manga))
            .await
    }

    async fn get_library_manga(&self) -> DbResult<Vec<LibraryManga>> {
        self.handler
            .await_list(|conn| query_list(conn, LIBRARY, [], map_library_manga))
            .await
    }

    fn get_library_manga_as_flow(&self) -> QuerySubscription<Vec<LibraryManga>> {
        self.handler.subscribe_to_list(LIBRARY_TABLES, |conn| {
            query_list(conn, LIBRARY, [], map_library_manga)
        })
    }

    fn get_favorites_by_source_id(&self, source_id: SourceId) -> QuerySubscription<Vec<Manga>> {
        self.handler.subscribe_to_list(MANGA_TABLES, move |conn| {
            query_list(conn, GET_FAVORITES_BY_SOURCE, params![source_id], map_manga)
        })
    }

    fn get_excluded_by_source_id(&self, source_id: SourceId) -> QuerySubscription<Vec<Manga>> {
        self.handler.subscribe_to_list(MANGA_TABLES, move |conn| {
            query_list(conn, GET_EXCLUDED_BY_SOURCE, params![source_id], map_manga)
        })
    }

    async fn get_duplicate_library_manga(
        &self,
        id: MangaId,
        title: &str,
    ) -> DbResult<Vec<MangaWithChapterCount>> {
        let title = title.to_string();
        self.handler
            .await_list(move |conn| {
                query_list(
                    conn,
                    GET_DUPLICATE_LIBRARY_MANGA,
                    params![id, title],
                    map_manga_with_chapter_count,
                )
            })
            .await
    }

    fn get_upcoming_manga(&self, statuses: &HashSet<MangaStatus>) -> QuerySubscription<Vec<Manga>> {
        let mut codes: Vec<i64> = statuses.iter().map(|s| s.code()).collect();
        codes.sort_unstable();
        self.handler.subscribe_to_list(MANGA_TABLES, move |conn| {
            let codes = serde_json::to_string(&codes)?;
            let start = start_of_local_day_ms();
            query_list(conn, GET_UPCOMING_MANGA, params![start, codes], map_manga)
        })
    }

    async fn get_manga_category_ids(&self, manga_id: MangaId) -> DbResult<Vec<CategoryId>> {
        self.handler
            .await_list(move |conn| {
                query_list(conn, GET_MANGA_CATEGORY_IDS, params![manga_id], |row| row.get(0))
            })
            .await
    }

    async fn try_reset_viewer_flags(&self) -> DbResult<()> {
        let reset = self
            .handler
            .await_write(MANGA_TABLES, false, |conn| {
                Ok(conn.execute(RESET_VIEWER_FLAGS, [])?)
            })
            .await?;
        debug!(rows = reset, "viewer flags reset");
        Ok(())
    }

    async fn reset_viewer_flags(&self) -> bool {
        report("reset_viewer_flags", self.try_reset_viewer_flags().await)
    }

    async fn try_set_viewer_flags(&self, id: MangaId, value: i64, mask: i64) -> DbResult<()> {
        self.handler
            .await_write(MANGA_TABLES, false, move |conn| {
                let changed = conn.prepare_cached(SET_VIEWER_FLAGS)?.execute(named_params! {
                    ":id": id,
                    ":value": value,
                    ":mask": mask,
                })?;
                if changed == 0 {
                    return Err(DbError::NotFound);
                }
                Ok(())
            })
            .await
    }

    async fn set_viewer_flags(&self, id: MangaId, value: i64, mask: i64) -> bool {
        report("set_viewer_flags", self.try_set_viewer_flags(id, value, mask).await)
    }

    async fn try_set_manga_categories(
        &self,
        manga_id: MangaId,
        category_ids: &[CategoryId],
    ) -> DbResult<()> {
        let category_ids = category_ids.to_vec();
        self.handler
            .await_write(&[Table::MangasCategories], true, move |conn| {
                conn.execute(DELETE_MANGA_CATEGORIES, params![manga_id])?;
                let mut insert = conn.prepare_cached(INSERT_MANGA_CATEGORY)?;
                for category_id in category_ids {
                    insert.execute(params![manga_id, category_id])?;
                }
                Ok(())
            })
            .await
    }

    async fn set_manga_categories(&self, manga_id: MangaId, category_ids: &[CategoryId]) -> bool {
        report(
            "set_manga_categories",
            self.try_set_manga_categories(manga_id, category_ids).await,
        )
    }

    async fn try_update(&self, update: &MangaUpdate) -> DbResult<()> {
        self.try_update_all(std::slice::from_ref(update)).await
    }

    async fn update(&self, update: &MangaUpdate) -> bool {
        report("update", self.try_update(update).await)
    }

    async fn try_update_all(&self, updates: &[MangaUpdate]) -> DbResult<()> {
        let updates = updates.to_vec();
        self.handler
            .await_write(MANGA_TABLES, true, move |conn| {
                for update in &updates {
                    partial_update(conn, update)?;
                }
                Ok(())
            })
            .await
    }

    async fn update_all(&self, updates: &[MangaUpdate]) -> bool {
        report("update_all", self.try_update_all(updates).await)
    }

    async fn insert_network_manga(&self, manga: &[Manga]) -> DbResult<Vec<Manga>> {
        let manga = manga.to_vec();
        self.handler
            .await_write(MANGA_TABLES, true, move |conn| {
                manga.iter().map(|m| insert_network(conn, m)).collect()
            })
            .await
    }
}

fn partial_update(conn: &Connection, value: &MangaUpdate) -> DbResult<()> {
    let genre = encode_genre(value.genre.as_deref())?;
    let mut stmt = conn.prepare_cached(PARTIAL_UPDATE)?;
    stmt.execute(named_params! {
        ":source": value.source,
        ":url": value.url,
        ":artist": value.artist,
        ":author": value.author,
        ":description": value.description,
        ":genre": genre,
        ":title": value.title,
        ":status": value.status.map(|s| s.code()),
        ":thumbnail_url": value.thumbnail_url,
        ":favorite": value.favorite,
        ":last_update": value.last_update,
        ":next_update": value.next_update,
        ":fetch_interval": value.fetch_interval,
        ":initialized": value.initialized,
        ":viewer": value.viewer_flags,
        ":chapter_flags": value.chapter_flags,
        ":cover_last_modified": value.cover_last_modified,
        ":date_added": value.date_added,
        ":update_strategy": value.update_strategy.map(|s| s.code()),
        ":version": value.version,
        ":notes": value.notes,
        ":excluded": value.excluded,
        ":id": value.id,
    })?;
    Ok(())
}

fn insert_network(conn: &Connection, m: &Manga) -> DbResult<Manga> {
    let genre = encode_genre(m.genre.as_deref())?;
    let inserted = conn.prepare_cached(INSERT_NETWORK_MANGA)?.execute(named_params! {
        ":source": m.source,
        ":url": m.url,
        ":artist": m.artist,
        ":author": m.author,
        ":description": m.description,
        ":genre": genre,
        ":title": m.title,
        ":status": m.status.code(),
        ":thumbnail_url": m.thumbnail_url,
        ":favorite": m.favorite,
        ":last_update": m.last_update,
        ":next_update": m.next_update,
        ":fetch_interval": m.fetch_interval,
        ":initialized": m.initialized,
        ":viewer": m.viewer_flags,
        ":chapter_flags": m.chapter_flags,
        ":cover_last_modified": m.cover_last_modified,
        ":date_added": m.date_added,
        ":update_strategy": m.update_strategy.code(),
        ":version": m.version,
        ":notes": m.notes,
        ":excluded": m.excluded,
    })?;

    if inserted == 0 {
        let update_cover = m.thumbnail_url.as_deref().is_some_and(|t| !t.trim().is_empty());
        conn.prepare_cached(REFRESH_NETWORK_MANGA)?.execute(named_params! {
            ":update_title": !m.title.trim().is_empty(),
            ":update_cover": update_cover,
            ":update_details": m.initialized,
            ":title": m.title,
            ":thumbnail_url": m.thumbnail_url,
            ":author": m.author,
            ":artist": m.artist,
            ":description": m.description,
            ":genre": genre,
            ":status": m.status.code(),
            ":update_strategy": m.update_strategy.code(),
            ":initialized": m.initialized,
            ":source": m.source,
            ":url": m.url,
        })?;
    }

    query_one(conn, GET_MANGA_BY_URL_AND_SOURCE, params![m.url, m.source], map_manga)?
        .ok_or(DbError::NotFound)
}

fn query_one<T, P, F>(conn: &Connection, sql: &str, params: P, map: F) -> DbResult<Option<T>>
where
    P: Params,
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
{
    Ok(conn.prepare_cached(sql)?.query_row(params, map).optional()?)
}

fn query_list<T, P, F>(conn: &Connection, sql: &str, params: P, map: F) -> DbResult<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map(params, map)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn report(operation: &'static str, result: DbResult<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            error!(operation, error = %err, "manga write failed");
            false
        }
    }
}

fn start_of_local_day_ms() -> i64 {
    let today = Local::now().date_naive();
    let midnight = today.and_time(NaiveTime::MIN);
    midnight
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| midnight.and_utc().timestamp_millis())
}
