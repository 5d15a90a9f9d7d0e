//! Streams and buffers

use crate::convert::convert;
use crate::error::{ConvertError, VertexError};
use crate::format::StreamFormat;
use crate::semantic::Semantic;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named channel of packed vertex elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    /// Channel name, used in error reports
    pub name: String,
    /// What the channel carries
    pub semantic: Semantic,
    /// Element layout of `data`
    pub format: StreamFormat,
    /// Packed little-endian elements
    pub data: Vec<u8>,
}

impl Stream {
    /// Create a stream
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        semantic: Semantic,
        format: StreamFormat,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            semantic,
            format,
            data,
        }
    }

    /// Number of whole elements in `data`
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        match self.format.stride() {
            0 => 0,
            stride => self.data.len() / stride,
        }
    }

    /// Re-encode into `format`, keeping name and semantic
    ///
    /// # Errors
    /// Returns [`ConvertError`] for invalid formats or misaligned data.
    pub fn convert_to(&self, format: &StreamFormat) -> Result<Stream, ConvertError> {
        let data = convert(&self.data, &self.format, format)?;
        Ok(Stream {
            name: self.name.clone(),
            semantic: self.semantic,
            format: *format,
            data,
        })
    }
}

/// One requested stream of a [`BufferFormat`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetStream {
    /// Semantic to match against source streams
    pub semantic: Semantic,
    /// Requested layout
    pub format: StreamFormat,
}

/// Requested buffer layout: an ordered list of target streams
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferFormat {
    /// Target streams, in output order
    pub streams: Vec<TargetStream>,
}

impl BufferFormat {
    /// Empty layout
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a target stream
    #[must_use]
    pub fn with(mut self, semantic: Semantic, format: StreamFormat) -> Self {
        self.streams.push(TargetStream { semantic, format });
        self
    }
}

/// A set of vertex streams
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buffer {
    /// Streams in declaration order
    pub streams: Vec<Stream>,
}

impl Buffer {
    /// Create a buffer from streams
    #[must_use]
    pub fn new(streams: Vec<Stream>) -> Self {
        Self { streams }
    }

    /// Append a stream
    #[must_use]
    pub fn with(mut self, stream: Stream) -> Self {
        self.streams.push(stream);
        self
    }

    /// Find a stream by semantic
    #[must_use]
    pub fn get(&self, semantic: &Semantic) -> Option<&Stream> {
        self.streams.iter().find(|s| &s.semantic == semantic)
    }

    /// Convert to the requested layout
    ///
    /// Output streams follow the order of `format`. Target streams whose
    /// semantic matches no source stream are left out. When several source
    /// streams share a semantic, the last one is used.
    ///
    /// # Errors
    /// The first stream that fails to convert aborts the whole conversion
    /// with a [`VertexError`] naming it.
    pub fn convert_to(&self, format: &BufferFormat) -> Result<Buffer, VertexError> {
        let by_semantic: HashMap<Semantic, &Stream> =
            self.streams.iter().map(|s| (s.semantic, s)).collect();

        let mut streams = Vec::with_capacity(format.streams.len());
        for target in &format.streams {
            let Some(source) = by_semantic.get(&target.semantic) else {
                tracing::trace!(semantic = %target.semantic, "no source stream");
                continue;
            };
            let converted =
                source
                    .convert_to(&target.format)
                    .map_err(|source_error| VertexError::Convert {
                        channel: source.name.clone(),
                        source: source_error,
                    })?;
            streams.push(converted);
        }

        tracing::debug!(
            requested = format.streams.len(),
            produced = streams.len(),
            "converted vertex buffer"
        );
        Ok(Buffer { streams })
    }
}
