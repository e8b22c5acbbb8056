//! Easing, the preset registry and the tween runner.

/// Easing curves.
pub mod ease;
/// Setup and playback of a preset against a node.
pub mod playback;
/// Static preset table.
pub mod preset;
/// Frame-driven property tweens and the typewriter procedure.
pub mod tween;
