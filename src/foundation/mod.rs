//! Shared value types and the crate error taxonomy.

/// Node properties, poses and element kinds.
pub mod core;
/// `MotionError` and the crate result alias.
pub mod error;
