pub type MotionResult<T> = Result<T, MotionError>;

/// Errors raised by the animation engine.
///
/// Every engine entry point is fail-soft: errors are logged and returned, never panicked.
/// Only [`MotionError::PresetNotApplicable`] is meant to reach the end user.
#[derive(thiserror::Error, Debug)]
pub enum MotionError {
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    #[error("preset not applicable: '{preset}' cannot animate a {kind} element")]
    PresetNotApplicable { preset: String, kind: String },

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("slide out of range: {index} (deck has {len} slides)")]
    SlideOutOfRange { index: usize, len: usize },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MotionError {
    pub fn preset_not_found(id: impl Into<String>) -> Self {
        Self::PresetNotFound(id.into())
    }

    pub fn not_applicable(preset: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::PresetNotApplicable {
            preset: preset.into(),
            kind: kind.into(),
        }
    }

    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound(id.into())
    }

    pub fn element_not_found(id: impl Into<String>) -> Self {
        Self::ElementNotFound(id.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` when the editor should show a notice instead of failing silently.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::PresetNotApplicable { .. })
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
