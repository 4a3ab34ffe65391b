/// Crate-wide result alias.
pub type ScrollweaveResult<T> = Result<T, ScrollweaveError>;

/// Error taxonomy for timeline construction, trigger resolution and lifecycle plumbing.
///
/// None of these are surfaced to page users: the [`Engine`](crate::Engine) logs them and falls
/// back to a no-op composition or a dropped write.
#[derive(thiserror::Error, Debug)]
pub enum ScrollweaveError {
    /// Invalid configuration or scene input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Timeline construction failure (labels, collisions, unresolved base values).
    #[error("timeline error: {0}")]
    Timeline(String),

    /// Scroll trigger could not be resolved.
    #[error("trigger error: {0}")]
    Trigger(String),

    /// A required element is not mounted yet.
    #[error("missing element ref: {0}")]
    MissingRef(String),

    /// An element was removed from the render tree mid-animation.
    #[error("detached element: {0}")]
    Detached(String),

    /// Media start was refused by the runtime.
    #[error("media error: {0}")]
    Media(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollweaveError {
    /// Build a [`ScrollweaveError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrollweaveError::Timeline`].
    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline(msg.into())
    }

    /// Build a [`ScrollweaveError::Trigger`].
    pub fn trigger(msg: impl Into<String>) -> Self {
        Self::Trigger(msg.into())
    }

    /// Build a [`ScrollweaveError::MissingRef`].
    pub fn missing_ref(msg: impl Into<String>) -> Self {
        Self::MissingRef(msg.into())
    }

    /// Build a [`ScrollweaveError::Detached`].
    pub fn detached(msg: impl Into<String>) -> Self {
        Self::Detached(msg.into())
    }

    /// Build a [`ScrollweaveError::Media`].
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`ScrollweaveError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ScrollweaveError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
