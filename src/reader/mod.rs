//! Reading-mode codec, orientation bits, and viewer resolution.

/// Reading modes and the preference-to-viewer resolver.
pub mod mode;
/// Orientation bits packed next to the reading mode.
pub mod orientation;
/// Global reader defaults.
pub mod preferences;
/// Viewer trait and implementations.
pub mod viewer;
