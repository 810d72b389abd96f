/// Convenience result type used across Waypost.
pub type WaypostResult<T> = Result<T, WaypostError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum WaypostError {
    /// Invalid user-provided step or sequence data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown configuration key, mistyped value, or mutation during a run.
    #[error("configuration error: {0}")]
    Config(String),

    /// No stored sequence exists for the requested mission/site.
    #[error("no sequence found: {0}")]
    MissingSequence(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WaypostError {
    /// Build a [`WaypostError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WaypostError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`WaypostError::MissingSequence`] value.
    pub fn missing_sequence(msg: impl Into<String>) -> Self {
        Self::MissingSequence(msg.into())
    }

    /// Build a [`WaypostError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
