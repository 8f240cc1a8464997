/// Convenience result type used across wipeview.
pub type WipeviewResult<T> = Result<T, WipeviewError>;

/// Top-level error taxonomy used by the renderer and viewer APIs.
///
/// Geometric degeneracies and missing images are not errors; they are handled where they
/// occur and never surface through this type.
#[derive(thiserror::Error, Debug)]
pub enum WipeviewError {
    /// Invalid host-provided input (scale, buffer sizes, config values).
    #[error("validation error: {0}")]
    Validation(String),

    /// Drawing surface could not be created or read back.
    #[error("surface error: {0}")]
    Surface(String),

    /// Raster image could not be decoded or converted.
    #[error("image error: {0}")]
    Image(String),

    /// Errors when serializing or deserializing configuration or view state.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WipeviewError {
    /// Build a [`WipeviewError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WipeviewError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`WipeviewError::Image`] value.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    /// Build a [`WipeviewError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
