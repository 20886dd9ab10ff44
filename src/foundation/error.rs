/// Convenience result type used across qrstyle.
pub type QrStyleResult<T> = Result<T, QrStyleError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Propagation policy: planner and encoder failures abort the render and
/// surface to the caller; font-resource failures are recovered inside the
/// compositor (fallback font) and never reach this enum from the pipeline
/// entry points.
#[derive(thiserror::Error, Debug)]
pub enum QrStyleError {
    /// Invalid user-provided styling or overlay data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Blank content after trimming; user-correctable, blocks the render.
    #[error("content must not be empty")]
    EmptyContent,

    /// Propagated from the symbol encoder (content/version mismatch etc.).
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Unsupported or corrupt uploaded image.
    #[error("asset decode error: {0}")]
    AssetDecode(String),

    /// Missing or unusable font resource.
    #[error("font resource error: {0}")]
    FontResource(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QrStyleError {
    /// Build a [`QrStyleError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QrStyleError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`QrStyleError::AssetDecode`] value.
    pub fn asset_decode(msg: impl Into<String>) -> Self {
        Self::AssetDecode(msg.into())
    }

    /// Build a [`QrStyleError::FontResource`] value.
    pub fn font_resource(msg: impl Into<String>) -> Self {
        Self::FontResource(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
