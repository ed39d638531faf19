//! Manga library storage and reader-mode resolution for a manga reader client.
//!
//! # Examples
//!
//! Decoding a stored viewer preference:
//! ```
//! use mangashelf::reader::mode::ReadingMode;
//!
//! // Orientation bits (0x18) are ignored by reading-mode lookup.
//! assert_eq!(ReadingMode::from_preference(Some(0x18 | 0x5)), ReadingMode::ContinuousVertical);
//! assert_eq!(ReadingMode::from_preference(None), ReadingMode::Default);
//! ```
//!
//! Storing a manga found on a source and watching a source's excluded list:
//! ```no_run
//! use mangashelf::{
//!     db::handler::{DatabaseConfig, DatabaseHandler},
//!     interactor::get_excluded_manga::GetExcludedManga,
//!     manga::Manga,
//!     repository::{MangaRepository, manga::SqlMangaRepository},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handler = DatabaseHandler::open("library.db", DatabaseConfig::default()).expect("open");
//! let repo = SqlMangaRepository::new(handler.clone());
//! let stored = repo
//!     .insert_network_manga(&[Manga::create(1, "/title/1", "Title")])
//!     .await
//!     .expect("insert");
//! assert!(stored[0].id > 0);
//!
//! let mut excluded = GetExcludedManga::new(repo).subscribe(1);
//! let current = excluded.next().await.expect("open").expect("query");
//! assert!(current.is_empty());
//! handler.close().await.expect("close");
//! # }
//! ```

/// SQLite handler, live queries, and storage errors.
pub mod db;
/// Domain interactors used by presentation code.
pub mod interactor;
/// Manga records, patches, and library aggregates.
pub mod manga;
/// Reading modes, orientation bits, and viewers.
pub mod reader;
/// Manga data gateway.
pub mod repository;
/// Shared primitive types and enums.
pub mod types;
