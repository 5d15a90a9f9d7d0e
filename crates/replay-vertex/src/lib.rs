//! Replay Vertex
//!
//! Re-encodes vertex streams into the layout a consumer asks for.
//!
//! # Core Concepts
//!
//! - [`Semantic`]: What a stream carries (position, normal, texcoord 1, ...)
//! - [`StreamFormat`]: Binary layout of one element (data type, component count, normalization)
//! - [`Stream`]: A named, tagged channel of packed elements
//! - [`Buffer`]: A set of streams; [`Buffer::convert_to`] matches target
//!   streams by semantic and re-encodes each one
//!
//! # Example
//!
//! ```rust,ignore
//! use replay_vertex::{BufferFormat, DataType, Semantic, StreamFormat};
//!
//! let target = BufferFormat::new()
//!     .with(Semantic::position(), StreamFormat::new(DataType::F32, 3))
//!     .with(Semantic::color(0), StreamFormat::normalized(DataType::U8, 4));
//!
//! let converted = buffer.convert_to(&target)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod buffer;
mod convert;
mod error;
mod format;
mod semantic;

// Re-exports
pub use buffer::{Buffer, BufferFormat, Stream, TargetStream};
pub use error::{ConvertError, VertexError};
pub use format::{DataType, StreamFormat};
pub use semantic::{Semantic, SemanticKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
