//! Global reader preferences used to resolve per-manga defaults.

use serde::{Deserialize, Serialize};

use crate::manga::Manga;

use super::{mode::ReadingMode, orientation::ReaderOrientation};

/// Global reader defaults applied when a manga stores [`ReadingMode::Default`]
/// or [`ReaderOrientation::Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderPreferences {
    /// Flag value of the global reading mode.
    pub default_reading_mode: i64,
    /// Flag value of the global orientation.
    pub default_orientation: i64,
}

impl Default for ReaderPreferences {
    fn default() -> Self {
        Self {
            default_reading_mode: ReadingMode::Webtoon.flag_value(),
            default_orientation: ReaderOrientation::Free.flag_value(),
        }
    }
}

impl ReaderPreferences {
    /// Parses preferences from JSON; missing keys keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Serializes preferences to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Flag value to hand to [`ReadingMode::to_viewer`] for `manga`.
    pub fn resolve_reading_mode(&self, manga: &Manga) -> i64 {
        match ReadingMode::from_preference(Some(manga.reading_mode())) {
            ReadingMode::Default => self.default_reading_mode,
            mode => mode.flag_value(),
        }
    }

    /// Orientation flag value for `manga`.
    pub fn resolve_orientation(&self, manga: &Manga) -> i64 {
        match ReaderOrientation::from_preference(Some(manga.orientation())) {
            ReaderOrientation::Default => self.default_orientation,
            orientation => orientation.flag_value(),
        }
    }
}
