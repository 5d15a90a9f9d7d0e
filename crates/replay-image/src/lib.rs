//! Replay Image
//!
//! Image resources referenced by content id and resized on demand.
//!
//! # Core Concepts
//!
//! - [`ImageFormat`]: Packed pixel layouts with a bilinear [`ImageFormat::resize`]
//! - [`ContentStore`]: Async lookup of byte buffers by [`ContentId`](replay_core::ContentId)
//! - [`ResizeRequest`]: A content reference plus source and destination dimensions
//! - [`ResizeResolver`]: Resolves requests against a store, caching the results
//!
//! # Example
//!
//! ```rust,ignore
//! use replay_image::{ImageFormat, MemoryStore, ResizeRequest, ResizeResolver};
//!
//! let store = MemoryStore::new();
//! let id = store.insert(pixels);
//! let request = ResizeRequest::new(id, ImageFormat::Rgba8, (64, 64), (16, 16));
//!
//! let resolver = ResizeResolver::new(store, 128);
//! let thumbnail = resolver.resolve(&request).await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod format;
mod request;
mod resize;
mod resolver;
mod store;

// Re-exports
pub use error::ImageError;
pub use format::ImageFormat;
pub use request::ResizeRequest;
pub use resolver::{ResizeResolver, ResolverStats};
pub use store::{ContentStore, MemoryStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
