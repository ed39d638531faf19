use std::sync::Arc;

use proptest::prelude::*;

use mangashelf::reader::{
    mode::{Direction, ReadingMode, ReadingModeError, ViewerType},
    orientation::ReaderOrientation,
    viewer::{ReaderHost, Viewer, WebtoonViewer},
};

struct Screen {
    height: u32,
}

impl ReaderHost for Screen {
    fn viewport_height(&self) -> u32 {
        self.height
    }
}

fn screen() -> Arc<Screen> {
    Arc::new(Screen { height: 2000 })
}

#[test]
fn absent_preference_is_default() {
    assert_eq!(ReadingMode::from_preference(None), ReadingMode::Default);
    assert_eq!(ReaderOrientation::from_preference(None), ReaderOrientation::Default);
}

#[test]
fn known_flags_decode_and_unknown_fall_back() {
    assert_eq!(ReadingMode::from_preference(Some(0x4)), ReadingMode::Webtoon);
    assert_eq!(ReadingMode::from_preference(Some(0x5)), ReadingMode::ContinuousVertical);
    assert_eq!(ReadingMode::from_preference(Some(0x3)), ReadingMode::Default);
    assert_eq!(ReadingMode::from_preference(Some(0x7)), ReadingMode::Default);
    assert_eq!(ReadingMode::from_preference(Some(0x28 | 0x4)), ReadingMode::Webtoon);
    assert_eq!(
        ReaderOrientation::from_preference(Some(0x28 | 0x4)),
        ReaderOrientation::LockedLandscape
    );
}

#[test]
fn webtoon_preference_yields_continuous_viewer() {
    let viewer = ReadingMode::to_viewer(Some(0x4), screen()).expect("viewer");
    assert!(viewer.is_continuous());
    assert_eq!(viewer.viewer_type(), ViewerType::Webtoon);
    assert_eq!(viewer.direction(), Direction::Vertical);
}

#[test]
fn continuous_vertical_preference_yields_paged_viewer_of_same_type() {
    let paged = ReadingMode::to_viewer(Some(0x5), screen()).expect("viewer");
    let strip = ReadingMode::to_viewer(Some(0x4), screen()).expect("viewer");
    assert!(!paged.is_continuous());
    assert_eq!(paged.viewer_type(), strip.viewer_type());
    assert_eq!(paged.direction(), strip.direction());
}

#[test]
fn orientation_bits_do_not_affect_viewer_choice() {
    let viewer = ReadingMode::to_viewer(Some(0x10 | 0x5), screen()).expect("viewer");
    assert!(!viewer.is_continuous());
}

#[test]
fn unresolved_preference_is_rejected() {
    for preference in [None, Some(0x0), Some(0x8), Some(0x3)] {
        let err = ReadingMode::to_viewer(preference, screen())
            .err()
            .expect("default must not resolve to a viewer");
        assert_eq!(err, ReadingModeError::Unresolved { preference });
    }
}

#[test]
fn webtoon_viewer_tracks_pages_and_scroll_distance() {
    let mut viewer = WebtoonViewer::new(screen(), true);
    assert_eq!(viewer.scroll_distance(), 1500);
    assert_eq!(viewer.host().viewport_height(), 2000);
    assert_eq!(viewer.current_page(), 0);
    viewer.move_to_page(12);
    assert_eq!(viewer.current_page(), 12);
}

#[test]
fn scroll_distance_handles_tallest_viewport() {
    let viewer = WebtoonViewer::new(Arc::new(Screen { height: u32::MAX }), true);
    assert_eq!(viewer.scroll_distance(), 3_221_225_471);
}

proptest! {
    #[test]
    fn reading_mode_lookup_only_sees_masked_bits(raw in any::<i64>()) {
        let masked = raw & ReadingMode::MASK;
        let mode = ReadingMode::from_preference(Some(raw));
        prop_assert_eq!(mode, ReadingMode::from_preference(Some(masked)));

        let known = ReadingMode::ALL.iter().any(|m| m.flag_value() == masked);
        if known {
            prop_assert_eq!(mode.flag_value(), masked);
        } else {
            prop_assert_eq!(mode, ReadingMode::Default);
        }
    }

    #[test]
    fn orientation_lookup_only_sees_masked_bits(raw in any::<i64>()) {
        let masked = raw & ReaderOrientation::MASK;
        let orientation = ReaderOrientation::from_preference(Some(raw));
        if ReaderOrientation::ALL.iter().any(|o| o.flag_value() == masked) {
            prop_assert_eq!(orientation.flag_value(), masked);
        } else {
            prop_assert_eq!(orientation, ReaderOrientation::Default);
        }
    }
}
