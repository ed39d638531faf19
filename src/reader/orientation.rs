//! Screen orientation bits stored next to the reading mode.

use serde::{Deserialize, Serialize};

/// Orientation lock applied while reading a manga.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReaderOrientation {
    /// Defer to the global default orientation.
    #[default]
    Default,
    /// Follow the device sensor.
    Free,
    /// Portrait, either way up.
    Portrait,
    /// Landscape, either way up.
    Landscape,
    /// Portrait, upright only.
    LockedPortrait,
    /// Landscape, one side only.
    LockedLandscape,
    /// Upside-down portrait.
    ReversePortrait,
}

impl ReaderOrientation {
    /// Bits of the viewer flags owned by the orientation.
    pub const MASK: i64 = 0x0000_0038;

    /// All variants, in display order.
    pub const ALL: [ReaderOrientation; 7] = [
        Self::Default,
        Self::Free,
        Self::Portrait,
        Self::Landscape,
        Self::LockedPortrait,
        Self::LockedLandscape,
        Self::ReversePortrait,
    ];

    /// Stored flag value.
    pub const fn flag_value(self) -> i64 {
        match self {
            Self::Default => 0x0000_0000,
            Self::Free => 0x0000_0008,
            Self::Portrait => 0x0000_0010,
            Self::Landscape => 0x0000_0018,
            Self::LockedPortrait => 0x0000_0020,
            Self::LockedLandscape => 0x0000_0028,
            Self::ReversePortrait => 0x0000_0030,
        }
    }

    /// Decodes the masked bits of `preference`, yielding
    /// [`ReaderOrientation::Default`] when absent or unknown.
    pub fn from_preference(preference: Option<i64>) -> Self {
        let Some(raw) = preference else {
            return Self::Default;
        };
        let masked = raw & Self::MASK;
        Self::ALL
            .into_iter()
            .find(|o| o.flag_value() == masked)
            .unwrap_or(Self::Default)
    }
}
