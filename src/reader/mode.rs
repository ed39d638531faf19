//! Reading-mode codec and viewer resolution.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::viewer::{ReaderHost, Viewer, WebtoonViewer};

/// Page progression axis of a reading mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Pages advance sideways.
    Horizontal,
    /// Pages advance downwards.
    Vertical,
}

/// Viewer family a reading mode is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewerType {
    /// One page at a time.
    Pager,
    /// Pages stitched into a scrolling strip.
    Webtoon,
}

/// Raised when a viewer is requested for a preference that was never resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadingModeError {
    /// The preference decoded to [`ReadingMode::Default`].
    #[error("preference value must be resolved: {preference:?}")]
    Unresolved {
        /// Raw preference passed in.
        preference: Option<i64>,
    },
}

/// Reading behaviour stored in the low bits of a manga's viewer flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReadingMode {
    /// Defer to the global default reading mode.
    #[default]
    Default,
    /// Continuous vertical strip.
    Webtoon,
    /// Vertical strip with gaps between pages.
    ContinuousVertical,
}

impl ReadingMode {
    /// Bits of the viewer flags owned by the reading mode.
    pub const MASK: i64 = 0x0000_0007;

    /// All variants, in display order.
    pub const ALL: [ReadingMode; 3] = [Self::Default, Self::Webtoon, Self::ContinuousVertical];

    /// Stored flag value.
    pub const fn flag_value(self) -> i64 {
        match self {
            Self::Default => 0x0000_0000,
            Self::Webtoon => 0x0000_0004,
            Self::ContinuousVertical => 0x0000_0005,
        }
    }

    /// Label resource key.
    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Default => "label_default",
            Self::Webtoon => "webtoon_viewer",
            Self::ContinuousVertical => "vertical_plus_viewer",
        }
    }

    /// Icon resource key.
    pub const fn icon_key(self) -> &'static str {
        match self {
            Self::Default => "ic_reader_default_24dp",
            Self::Webtoon => "ic_reader_webtoon_24dp",
            Self::ContinuousVertical => "ic_reader_continuous_vertical_24dp",
        }
    }

    /// Page direction, `None` for [`ReadingMode::Default`].
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Default => None,
            Self::Webtoon | Self::ContinuousVertical => Some(Direction::Vertical),
        }
    }

    /// Viewer family, `None` for [`ReadingMode::Default`].
    pub const fn viewer_type(self) -> Option<ViewerType> {
        match self {
            Self::Default => None,
            Self::Webtoon | Self::ContinuousVertical => Some(ViewerType::Webtoon),
        }
    }

    /// Decodes the masked bits of `preference`. Absent or unknown values yield
    /// [`ReadingMode::Default`].
    pub fn from_preference(preference: Option<i64>) -> Self {
        let Some(raw) = preference else {
            return Self::Default;
        };
        let masked = raw & Self::MASK;
        Self::ALL
            .into_iter()
            .find(|mode| mode.flag_value() == masked)
            .unwrap_or(Self::Default)
    }

    /// Builds the viewer for `preference`, bound to `host`.
    ///
    /// The preference must already be resolved against the global default;
    /// a value decoding to [`ReadingMode::Default`] is rejected.
    pub fn to_viewer<H>(
        preference: Option<i64>,
        host: Arc<H>,
    ) -> Result<Box<dyn Viewer>, ReadingModeError>
    where
        H: ReaderHost + 'static,
    {
        let mode = Self::from_preference(preference);
        match (mode, mode.viewer_type()) {
            (_, None) => Err(ReadingModeError::Unresolved { preference }),
            (Self::ContinuousVertical, _) => Ok(Box::new(WebtoonViewer::new(host, false))),
            (Self::Webtoon, _) => Ok(Box::new(WebtoonViewer::new(host, true))),
            // No dedicated viewer for this family yet; render as a strip.
            (_, Some(ViewerType::Pager | ViewerType::Webtoon)) => {
                Ok(Box::new(WebtoonViewer::new(host, true)))
            }
        }
    }
}

/// Replaces the bits of `flags` selected by `mask` with those of `value`.
pub fn set_flag(flags: i64, value: i64, mask: i64) -> i64 {
    (flags & !mask) | (value & mask)
}
