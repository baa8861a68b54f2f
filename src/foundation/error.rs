/// Convenience result type used across reelforge.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy for a reel run.
///
/// Configuration errors (`InvalidDuration`, `InvalidOverlap`, `Validation`) are raised before any
/// rendering work begins. `EngineUnavailable` is the only recoverable variant: the narration stage
/// absorbs it and falls back to a heuristic duration.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// The narration engine is missing, timed out, or failed.
    #[error("narration engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The visual pool holds no usable images but slots need filling.
    #[error("empty asset pool: {0}")]
    EmptyAssetPool(String),

    /// A narration or clip duration is zero, negative, or not finite.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// The crossfade overlap fraction would consume a whole clip.
    #[error("invalid overlap: {0}")]
    InvalidOverlap(String),

    /// Invalid user-provided configuration or input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Encoding or muxing of the output video failed.
    #[error("render error: {0}")]
    Render(String),

    /// Cover frame extraction failed.
    #[error("thumbnail error: {0}")]
    Thumbnail(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::EngineUnavailable`] value.
    pub fn engine_unavailable(msg: impl Into<String>) -> Self {
        Self::EngineUnavailable(msg.into())
    }

    /// Build a [`ReelError::EmptyAssetPool`] value.
    pub fn empty_asset_pool(msg: impl Into<String>) -> Self {
        Self::EmptyAssetPool(msg.into())
    }

    /// Build a [`ReelError::InvalidDuration`] value.
    pub fn invalid_duration(msg: impl Into<String>) -> Self {
        Self::InvalidDuration(msg.into())
    }

    /// Build a [`ReelError::InvalidOverlap`] value.
    pub fn invalid_overlap(msg: impl Into<String>) -> Self {
        Self::InvalidOverlap(msg.into())
    }

    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ReelError::Thumbnail`] value.
    pub fn thumbnail(msg: impl Into<String>) -> Self {
        Self::Thumbnail(msg.into())
    }

    /// `true` for errors caused by configuration rather than by the run itself.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDuration(_) | Self::InvalidOverlap(_) | Self::Validation(_)
        )
    }

    /// `true` for conditions the pipeline absorbs locally.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::EngineUnavailable(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
