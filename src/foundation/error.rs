/// Result alias used across the crate.
pub type PosterResult<T> = Result<T, PosterError>;

/// Errors surfaced by configuration, composition and encoding.
#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    /// Configuration values that cannot produce a poster (zero sizes, bad anchors).
    #[error("validation error: {0}")]
    Validation(String),

    /// A request rejected before composition starts, such as one with no images or blank text.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Rasterization or canvas failure.
    #[error("render error: {0}")]
    Render(String),

    /// PNG encoding failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Anything else, with its context chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    /// Build a [`PosterError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PosterError::InvalidRequest`].
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Build a [`PosterError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PosterError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
