//! Resize-on-resolve

use crate::error::ImageError;
use crate::format::ImageFormat;
use crate::store::ContentStore;
use replay_core::ContentId;
use serde::{Deserialize, Serialize};

/// A stored image together with the size it should be delivered at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResizeRequest {
    /// Content id of the source pixels
    pub data: ContentId,
    /// Pixel layout of source and result
    pub format: ImageFormat,
    /// Source width
    pub src_width: u32,
    /// Source height
    pub src_height: u32,
    /// Destination width
    pub dst_width: u32,
    /// Destination height
    pub dst_height: u32,
}

impl ResizeRequest {
    /// Create a request from `(width, height)` pairs
    #[must_use]
    pub const fn new(
        data: ContentId,
        format: ImageFormat,
        src: (u32, u32),
        dst: (u32, u32),
    ) -> Self {
        Self {
            data,
            format,
            src_width: src.0,
            src_height: src.1,
            dst_width: dst.0,
            dst_height: dst.1,
        }
    }

    /// Content id of the request itself, used as a cache key
    ///
    /// # Errors
    /// Returns [`ImageError::Hash`] if the request cannot be serialized.
    pub fn id(&self) -> Result<ContentId, ImageError> {
        Ok(ContentId::of_serializable(self)?)
    }

    /// Fetch the source pixels and resize them
    ///
    /// # Errors
    /// Propagates store failures and [`ImageFormat::resize`] errors.
    pub async fn resolve<S>(&self, store: &S) -> Result<Vec<u8>, ImageError>
    where
        S: ContentStore + ?Sized,
    {
        let data = store.resolve(&self.data).await?;
        tracing::debug!(
            content = %self.data.short(),
            src = ?(self.src_width, self.src_height),
            dst = ?(self.dst_width, self.dst_height),
            "resizing image"
        );
        self.format.resize(
            &data,
            self.src_width,
            self.src_height,
            self.dst_width,
            self.dst_height,
        )
    }
}
