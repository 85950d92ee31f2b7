//! Error types for streamforge parsers.
//!
//! Malformed manifests never produce an [`Error`]; they produce
//! [`Diagnostic`](crate::Diagnostic)s. The only fatal path is a caller hook
//! that fails.

use thiserror::Error;

/// Error returned by caller-supplied hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for streamforge parser operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for streamforge parser operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A custom tag handler returned an error.
    #[error("Custom handler for tag \"{tag}\" failed: {source}")]
    CustomTag {
        /// The tag being handled.
        tag: String,
        /// The error returned by the handler.
        source: HookError,
    },

    /// A value or attribute transform hook returned an error.
    #[error("Transform hook for tag \"{tag}\" failed: {source}")]
    Transform {
        /// The tag being transformed.
        tag: String,
        /// The error returned by the hook.
        source: HookError,
    },
}

impl Error {
    /// Create a custom tag handler error.
    pub fn custom_tag(tag: impl Into<String>, source: HookError) -> Self {
        Self::CustomTag {
            tag: tag.into(),
            source,
        }
    }

    /// Create a transform hook error.
    pub fn transform(tag: impl Into<String>, source: HookError) -> Self {
        Self::Transform {
            tag: tag.into(),
            source,
        }
    }

    /// The tag whose hook failed.
    pub fn tag(&self) -> &str {
        match self {
            Error::CustomTag { tag, .. } | Error::Transform { tag, .. } => tag,
        }
    }
}
