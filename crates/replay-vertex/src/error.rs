//! Conversion errors

/// Failure re-encoding a single stream
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// Component count outside `1..=4`
    #[error("invalid component count {0}, expected 1..=4")]
    InvalidComponents(u8),

    /// Data length is not a whole number of elements
    #[error("data length {len} is not a multiple of the element stride {stride}")]
    Misaligned {
        /// Data length in bytes
        len: usize,
        /// Source element stride in bytes
        stride: usize,
    },
}

/// Failure converting a buffer; names the offending stream
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VertexError {
    /// One stream could not be converted, aborting the whole buffer
    #[error("failed to convert stream '{channel}': {source}")]
    Convert {
        /// Name of the stream that failed
        channel: String,
        /// Underlying error
        #[source]
        source: ConvertError,
    },
}

impl VertexError {
    /// Name of the stream that failed
    #[must_use]
    pub fn channel(&self) -> &str {
        match self {
            VertexError::Convert { channel, .. } => channel,
        }
    }
}
