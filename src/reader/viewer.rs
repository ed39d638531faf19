//! Viewer abstraction and the vertical strip viewer.

use std::sync::Arc;

use super::mode::{Direction, ViewerType};

/// Display context a viewer is attached to.
pub trait ReaderHost: Send + Sync {
    /// Height of the visible area in pixels.
    fn viewport_height(&self) -> u32;
}

/// Stateful page viewer created per reading session.
pub trait Viewer: Send {
    /// Viewer family.
    fn viewer_type(&self) -> ViewerType;
    /// Page progression axis.
    fn direction(&self) -> Direction;
    /// True when pages are stitched without gaps.
    fn is_continuous(&self) -> bool;
    /// Zero-based index of the page in view.
    fn current_page(&self) -> usize;
    /// Moves the viewport to `page`.
    fn move_to_page(&mut self, page: usize);
}

/// Vertical strip viewer used by both webtoon reading modes.
pub struct WebtoonViewer<H> {
    host: Arc<H>,
    is_continuous: bool,
    current_page: usize,
}

impl<H: ReaderHost> WebtoonViewer<H> {
    /// Creates a viewer on `host`; `is_continuous = false` keeps gaps between pages.
    pub fn new(host: Arc<H>, is_continuous: bool) -> Self {
        Self {
            host,
            is_continuous,
            current_page: 0,
        }
    }

    /// Host the viewer renders into.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Pixels scrolled per navigation tap.
    pub fn scroll_distance(&self) -> u32 {
        let height = u64::from(self.host.viewport_height());
        // At most three quarters of u32::MAX, so the narrowing is lossless.
        (height * 3 / 4) as u32
    }
}

impl<H: ReaderHost> Viewer for WebtoonViewer<H> {
    fn viewer_type(&self) -> ViewerType {
        ViewerType::Webtoon
    }

    fn direction(&self) -> Direction {
        Direction::Vertical
    }

    fn is_continuous(&self) -> bool {
        self.is_continuous
    }

    fn current_page(&self) -> usize {
        self.current_page
    }

    fn move_to_page(&mut self, page: usize) {
        self.current_page = page;
    }
}
