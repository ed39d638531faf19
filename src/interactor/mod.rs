//! Named, single-purpose operations exposed to presentation code.

/// Live excluded manga of a source.
pub mod get_excluded_manga;
/// Duplicate detection against the library.
pub mod get_duplicate_library_manga;
/// Library listing.
pub mod get_library_manga;
/// Single manga lookups.
pub mod get_manga;
/// Library refresh schedule.
pub mod get_upcoming_manga;
/// Storing manga discovered on a source.
pub mod network_to_local_manga;
/// Bulk reset of per-manga reader settings.
pub mod reset_viewer_flags;
/// Category membership replacement.
pub mod set_manga_categories;
/// Per-manga reading mode and orientation.
pub mod set_manga_viewer_flags;
/// Sparse manga updates.
pub mod update_manga;
