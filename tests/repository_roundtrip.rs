use rusqlite::params;
use tempfile::TempDir;

use mangashelf::{
    db::{
        DbError, Table,
        handler::{DatabaseConfig, DatabaseHandler},
    },
    manga::{Manga, MangaUpdate},
    repository::{MangaRepository, manga::SqlMangaRepository},
    types::{MangaId, MangaStatus, UpdateStrategy},
};

fn network_manga(url: &str, title: &str) -> Manga {
    Manga {
        source: 7,
        url: url.to_string(),
        title: title.to_string(),
        artist: Some("Artist".to_string()),
        author: Some("Author".to_string()),
        description: Some("A long story.".to_string()),
        genre: Some(vec!["Action".to_string(), "Drama, Slice of Life".to_string()]),
        status: MangaStatus::Ongoing,
        thumbnail_url: Some("https://cdn.example/cover.jpg".to_string()),
        update_strategy: UpdateStrategy::OnlyFetchOnce,
        initialized: true,
        fetch_interval: 3,
        last_update: 1_700_000_000_000,
        next_update: 1_700_086_400_000,
        date_added: 0,
        viewer_flags: 0x10 | 0x4,
        chapter_flags: 0x2,
        cover_last_modified: 1_699_000_000_000,
        notes: "bought volume 3".to_string(),
        ..Manga::default()
    }
}

fn open_repo() -> (DatabaseHandler, SqlMangaRepository) {
    let handler = DatabaseHandler::open_in_memory(DatabaseConfig::default()).expect("open");
    let repo = SqlMangaRepository::new(handler.clone());
    (handler, repo)
}

async fn insert_one(repo: &SqlMangaRepository, manga: Manga) -> Manga {
    repo.insert_network_manga(&[manga])
        .await
        .expect("insert")
        .pop()
        .expect("stored row")
}

async fn add_chapter(handler: &DatabaseHandler, manga_id: MangaId, read: bool, last_page: i64) {
    handler
        .await_write(&[Table::Chapters], false, move |conn| {
            conn.execute(
                "INSERT INTO chapters(
                    manga_id, url, name, read, bookmark, last_page_read, date_upload, date_fetch
                 )
                 VALUES (?1, 'c', 'Chapter', ?2, 0, ?3, 100, 200)",
                params![manga_id, read, last_page],
            )?;
            Ok(())
        })
        .await
        .expect("insert chapter");
}

/// Copies the columns the store maintains itself.
fn with_store_fields(mut expected: Manga, stored: &Manga) -> Manga {
    expected.id = stored.id;
    expected.last_modified_at = stored.last_modified_at;
    expected.favorite_modified_at = stored.favorite_modified_at;
    expected.version = stored.version;
    expected
}

#[tokio::test]
async fn network_insert_then_fetch_round_trips_fields() {
    let (handler, repo) = open_repo();
    let input = network_manga("/series/1", "Blue Period");

    let stored = insert_one(&repo, input.clone()).await;
    assert!(stored.id > 0);
    assert_eq!(stored, with_store_fields(input.clone(), &stored));

    let fetched = repo.get_manga_by_id(stored.id).await.expect("get");
    assert_eq!(fetched, stored);
    assert_eq!(fetched.version, input.version);
    assert_eq!(fetched.favorite_modified_at, None);
    assert_eq!(fetched.reading_mode(), 0x4);
    assert_eq!(fetched.orientation(), 0x10);

    handler.close().await.expect("close");
}

#[tokio::test]
async fn strict_lookup_fails_and_lenient_lookup_returns_none() {
    let (_handler, repo) = open_repo();

    let err = repo.get_manga_by_id(404).await.expect_err("missing");
    assert!(matches!(err, DbError::NotFound));

    let none = repo
        .get_manga_by_url_and_source_id("/nope", 7)
        .await
        .expect("query");
    assert!(none.is_none());

    let stored = insert_one(&repo, network_manga("/series/2", "Dandadan")).await;
    let found = repo
        .get_manga_by_url_and_source_id("/series/2", 7)
        .await
        .expect("query")
        .expect("present");
    assert_eq!(found.id, stored.id);
    assert!(
        repo.get_manga_by_url_and_source_id("/series/2", 8)
            .await
            .expect("query")
            .is_none()
    );
}

#[tokio::test]
async fn partial_update_leaves_unset_fields_unchanged() {
    let (_handler, repo) = open_repo();
    let before = insert_one(&repo, network_manga("/series/3", "Frieren")).await;

    let update = MangaUpdate {
        title: Some("Frieren: Beyond Journey's End".to_string()),
        chapter_flags: Some(0x8),
        ..MangaUpdate::new(before.id)
    };
    assert!(repo.update(&update).await);

    let after = repo.get_manga_by_id(before.id).await.expect("get");
    let mut expected = before.clone();
    update.apply_to(&mut expected);
    expected.last_modified_at = after.last_modified_at;
    assert_eq!(after, expected);
    assert_eq!(after.version, before.version);
}

#[tokio::test]
async fn favorite_toggle_bumps_version_and_stamps_time() {
    let (_handler, repo) = open_repo();
    let before = insert_one(&repo, network_manga("/series/4", "Vinland Saga")).await;

    assert!(
        repo.update(&MangaUpdate {
            favorite: Some(true),
            ..MangaUpdate::new(before.id)
        })
        .await
    );

    let after = repo.get_manga_by_id(before.id).await.expect("get");
    assert!(after.favorite);
    assert!(after.version > before.version);
    assert!(after.favorite_modified_at.is_some());
}

#[tokio::test]
async fn update_all_applies_every_patch() {
    let (_handler, repo) = open_repo();
    let a = insert_one(&repo, network_manga("/series/5", "A")).await;
    let b = insert_one(&repo, network_manga("/series/6", "B")).await;

    let ok = repo
        .update_all(&[
            MangaUpdate {
                notes: Some("first".to_string()),
                ..MangaUpdate::new(a.id)
            },
            MangaUpdate {
                excluded: Some(true),
                ..MangaUpdate::new(b.id)
            },
        ])
        .await;
    assert!(ok);
    assert_eq!(repo.get_manga_by_id(a.id).await.expect("a").notes, "first");
    assert!(repo.get_manga_by_id(b.id).await.expect("b").excluded);
    assert!(repo.update_all(&[]).await);
}

#[tokio::test]
async fn update_all_rolls_back_when_a_later_patch_fails() {
    let (handler, repo) = open_repo();
    let a = insert_one(&repo, network_manga("/series/8", "A")).await;
    let b = insert_one(&repo, network_manga("/series/9", "B")).await;

    let rejected = b.id;
    handler
        .await_write(&[], false, move |conn| {
            conn.execute_batch(&format!(
                "CREATE TRIGGER reject_b BEFORE UPDATE ON mangas
                 WHEN old._id = {rejected}
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;"
            ))?;
            Ok(())
        })
        .await
        .expect("trigger");

    let patches = [
        MangaUpdate {
            notes: Some("first".to_string()),
            ..MangaUpdate::new(a.id)
        },
        MangaUpdate {
            excluded: Some(true),
            ..MangaUpdate::new(b.id)
        },
    ];
    assert!(!repo.update_all(&patches).await);
    assert!(matches!(
        repo.try_update_all(&patches).await,
        Err(DbError::Sqlite(_))
    ));

    let after = repo.get_manga_by_id(a.id).await.expect("a");
    assert_eq!(after.notes, a.notes);
    assert_eq!(after.version, a.version);
}

#[tokio::test]
async fn masked_viewer_write_keeps_other_bits() {
    let (_handler, repo) = open_repo();
    let stored = insert_one(&repo, network_manga("/series/10", "Flags")).await;
    assert_eq!(stored.viewer_flags, 0x10 | 0x4);

    assert!(repo.set_viewer_flags(stored.id, 0x5, 0x7).await);
    let after = repo.get_manga_by_id(stored.id).await.expect("get");
    assert_eq!(after.viewer_flags, 0x10 | 0x5);

    // Bits outside the mask in `value` are ignored.
    assert!(repo.set_viewer_flags(stored.id, 0xff, 0x38).await);
    let after = repo.get_manga_by_id(stored.id).await.expect("get");
    assert_eq!(after.viewer_flags, 0x38 | 0x5);

    assert!(matches!(
        repo.try_set_viewer_flags(9_999, 0x4, 0x7).await,
        Err(DbError::NotFound)
    ));
}

#[tokio::test]
async fn writes_report_false_after_close() {
    let (handler, repo) = open_repo();
    let stored = insert_one(&repo, network_manga("/series/7", "Closed")).await;
    handler.close().await.expect("close");

    assert!(!repo.update(&MangaUpdate::new(stored.id)).await);
    assert!(!repo.reset_viewer_flags().await);
    assert!(matches!(
        repo.try_update(&MangaUpdate::new(stored.id)).await,
        Err(DbError::ChannelClosed)
    ));
}

#[tokio::test]
async fn reset_viewer_flags_clears_every_row() {
    let (_handler, repo) = open_repo();
    let a = insert_one(&repo, network_manga("/series/8", "A")).await;
    let b = insert_one(&repo, network_manga("/series/9", "B")).await;
    assert_ne!(a.viewer_flags, 0);

    assert!(repo.reset_viewer_flags().await);
    assert_eq!(repo.get_manga_by_id(a.id).await.expect("a").viewer_flags, 0);
    assert_eq!(repo.get_manga_by_id(b.id).await.expect("b").viewer_flags, 0);
}

#[tokio::test]
async fn network_insert_refreshes_only_non_favorites() {
    let (_handler, repo) = open_repo();
    let browsing = insert_one(&repo, network_manga("/series/10", "Old Title")).await;
    let library = insert_one(&repo, network_manga("/series/11", "Kept Title")).await;
    assert!(
        repo.update(&MangaUpdate {
            favorite: Some(true),
            ..MangaUpdate::new(library.id)
        })
        .await
    );

    let mut refreshed = network_manga("/series/10", "New Title");
    refreshed.thumbnail_url = Some("  ".to_string());
    refreshed.description = Some("Rewritten".to_string());
    let mut ignored = network_manga("/series/11", "Renamed");
    ignored.description = Some("Rewritten".to_string());

    let stored = repo
        .insert_network_manga(&[refreshed, ignored])
        .await
        .expect("insert");
    assert_eq!(stored.len(), 2);

    assert_eq!(stored[0].id, browsing.id);
    assert_eq!(stored[0].title, "New Title");
    assert_eq!(stored[0].thumbnail_url, browsing.thumbnail_url);
    assert_eq!(stored[0].description.as_deref(), Some("Rewritten"));

    assert_eq!(stored[1].id, library.id);
    assert_eq!(stored[1].title, "Kept Title");
    assert_eq!(stored[1].description, library.description);
}

#[tokio::test]
async fn blank_title_and_uninitialized_details_are_not_applied() {
    let (_handler, repo) = open_repo();
    let first = insert_one(&repo, network_manga("/series/12", "Title")).await;

    let mut stub = Manga::create(7, "/series/12", " ");
    stub.initialized = false;
    let stored = insert_one(&repo, stub).await;

    assert_eq!(stored.id, first.id);
    assert_eq!(stored.title, "Title");
    assert_eq!(stored.author, first.author);
    assert!(stored.initialized);
}

#[tokio::test]
async fn duplicates_match_library_titles_case_insensitively() {
    let (handler, repo) = open_repo();
    let original = insert_one(&repo, network_manga("/a/1", "One Piece")).await;
    let colored = insert_one(&repo, network_manga("/b/1", "One Piece (Official Colored)")).await;
    let unrelated = insert_one(&repo, network_manga("/c/1", "Two Pieces")).await;
    let browsing = insert_one(&repo, network_manga("/d/1", "one piece")).await;
    for id in [original.id, colored.id, unrelated.id] {
        assert!(
            repo.update(&MangaUpdate {
                favorite: Some(true),
                ..MangaUpdate::new(id)
            })
            .await
        );
    }
    add_chapter(&handler, colored.id, false, 0).await;
    add_chapter(&handler, colored.id, true, 0).await;

    let dupes = repo
        .get_duplicate_library_manga(browsing.id, "ONE PIECE")
        .await
        .expect("dupes");
    let ids: Vec<_> = dupes.iter().map(|d| d.manga.id).collect();
    assert_eq!(ids, vec![original.id, colored.id]);
    assert_eq!(dupes[0].chapter_count, 0);
    assert_eq!(dupes[1].chapter_count, 2);

    let excluding_self = repo
        .get_duplicate_library_manga(original.id, "One Piece")
        .await
        .expect("dupes");
    assert_eq!(excluding_self.len(), 1);
    assert_eq!(excluding_self[0].manga.id, colored.id);
}

#[tokio::test]
async fn library_rows_carry_chapter_aggregates() {
    let (handler, repo) = open_repo();
    let fav = insert_one(&repo, network_manga("/lib/1", "Berserk")).await;
    let other = insert_one(&repo, network_manga("/lib/2", "Monster")).await;
    assert!(
        repo.update(&MangaUpdate {
            favorite: Some(true),
            ..MangaUpdate::new(fav.id)
        })
        .await
    );
    add_chapter(&handler, fav.id, true, 0).await;
    add_chapter(&handler, fav.id, false, 0).await;
    add_chapter(&handler, fav.id, false, 0).await;
    add_chapter(&handler, other.id, false, 5).await;

    let library = repo.get_library_manga().await.expect("library");
    assert_eq!(library.len(), 1);
    let row = &library[0];
    assert_eq!(row.manga.id, fav.id);
    assert_eq!(row.category, 0);
    assert_eq!(row.total_chapters, 3);
    assert_eq!(row.read_count, 1);
    assert_eq!(row.unread_count(), 2);
    assert!(row.has_started());
    assert!(!row.has_bookmarks());
    assert_eq!(row.latest_upload, 100);
    assert_eq!(row.chapter_fetched_at, 200);

    let favorites = repo.get_favorites().await.expect("favorites");
    assert_eq!(favorites.len(), 1);

    let read_elsewhere = repo.get_read_manga_not_in_library().await.expect("read");
    assert_eq!(read_elsewhere.len(), 1);
    assert_eq!(read_elsewhere[0].id, other.id);
}

#[tokio::test]
async fn file_backed_database_survives_reopen() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("library.db");

    let handler = DatabaseHandler::open(&db_path, DatabaseConfig::default()).expect("open");
    let repo = SqlMangaRepository::new(handler.clone());
    let stored = insert_one(&repo, network_manga("/disk/1", "Persisted")).await;
    handler.close().await.expect("close");

    let reopened = DatabaseHandler::open(&db_path, DatabaseConfig::default()).expect("reopen");
    let repo = SqlMangaRepository::new(reopened.clone());
    let fetched = repo.get_manga_by_id(stored.id).await.expect("get");
    assert_eq!(fetched, stored);
    reopened.close().await.expect("close");
}
