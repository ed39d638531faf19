//! Shared primitive IDs and manga-related enums.

use serde::{Deserialize, Serialize};

/// Row identifier of a stored manga.
pub type MangaId = i64;
/// Identifier of the source (catalogue) a manga was discovered in.
pub type SourceId = i64;
/// Row identifier of a library category.
pub type CategoryId = i64;

/// Publication status reported by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MangaStatus {
    /// Source did not report a status.
    #[default]
    Unknown,
    /// Still being published.
    Ongoing,
    /// Publication completed.
    Completed,
    /// Licensed and removed from the source.
    Licensed,
    /// Publishing finished, scanlation may be ongoing.
    PublishingFinished,
    /// Cancelled by the publisher.
    Cancelled,
    /// Temporarily paused.
    OnHiatus,
}

impl MangaStatus {
    /// Stored integer code.
    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Ongoing => 1,
            Self::Completed => 2,
            Self::Licensed => 3,
            Self::PublishingFinished => 4,
            Self::Cancelled => 5,
            Self::OnHiatus => 6,
        }
    }

    /// Decodes a stored code. Unrecognized codes map to [`MangaStatus::Unknown`].
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Ongoing,
            2 => Self::Completed,
            3 => Self::Licensed,
            4 => Self::PublishingFinished,
            5 => Self::Cancelled,
            6 => Self::OnHiatus,
            _ => Self::Unknown,
        }
    }
}

/// Whether library refreshes keep fetching details for a manga.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UpdateStrategy {
    /// Refresh on every library update.
    #[default]
    AlwaysUpdate,
    /// Fetch details once, then skip.
    OnlyFetchOnce,
}

impl UpdateStrategy {
    /// Stored integer code.
    pub fn code(self) -> i64 {
        match self {
            Self::AlwaysUpdate => 0,
            Self::OnlyFetchOnce => 1,
        }
    }

    /// Decodes a stored code, falling back to [`UpdateStrategy::AlwaysUpdate`].
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::OnlyFetchOnce,
            _ => Self::AlwaysUpdate,
        }
    }
}
