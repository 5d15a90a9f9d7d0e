//! Image errors

use replay_core::{ContentId, ContentIdError};

/// Errors from resizing or resolving images
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    /// The store has no content for the id
    #[error("content {0} not found")]
    NotFound(ContentId),

    /// The store failed to answer
    #[error("content store error: {0}")]
    Store(String),

    /// Pixel data does not match the declared dimensions
    #[error("expected {expected} bytes of pixel data, got {actual}")]
    SizeMismatch {
        /// Bytes implied by format and dimensions
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },

    /// A zero-sized source cannot be resized into a non-empty image
    #[error("cannot resize an empty {width}x{height} image")]
    EmptySource {
        /// Source width
        width: u32,
        /// Source height
        height: u32,
    },

    /// Dimensions overflow the addressable size
    #[error("image dimensions {width}x{height} are too large")]
    TooLarge {
        /// Width
        width: u32,
        /// Height
        height: u32,
    },

    /// Request could not be content-addressed
    #[error("failed to hash resize request: {0}")]
    Hash(String),
}

impl From<ContentIdError> for ImageError {
    fn from(err: ContentIdError) -> Self {
        ImageError::Hash(err.to_string())
    }
}
