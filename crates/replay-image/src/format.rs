//! Pixel formats

use crate::error::ImageError;
use crate::resize;
use serde::{Deserialize, Serialize};

/// Packed pixel layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// One 8-bit channel
    R8,
    /// Two 8-bit channels
    Rg8,
    /// Three 8-bit channels
    Rgb8,
    /// Four 8-bit channels
    Rgba8,
    /// Four little-endian 32-bit float channels
    #[serde(rename = "rgba32f")]
    Rgba32F,
}

impl ImageFormat {
    /// Channels per pixel
    #[inline]
    #[must_use]
    pub const fn channels(self) -> usize {
        match self {
            ImageFormat::R8 => 1,
            ImageFormat::Rg8 => 2,
            ImageFormat::Rgb8 => 3,
            ImageFormat::Rgba8 | ImageFormat::Rgba32F => 4,
        }
    }

    /// Bytes per channel
    #[inline]
    #[must_use]
    pub const fn channel_size(self) -> usize {
        match self {
            ImageFormat::Rgba32F => 4,
            _ => 1,
        }
    }

    /// Bytes per pixel
    #[inline]
    #[must_use]
    pub const fn pixel_size(self) -> usize {
        self.channels() * self.channel_size()
    }

    /// Bytes of a `width` x `height` image
    ///
    /// # Errors
    /// Returns [`ImageError::TooLarge`] on overflow.
    pub fn size(self, width: u32, height: u32) -> Result<usize, ImageError> {
        let too_large = || ImageError::TooLarge { width, height };
        let w = usize::try_from(width).map_err(|_| too_large())?;
        let h = usize::try_from(height).map_err(|_| too_large())?;
        w.checked_mul(h)
            .and_then(|px| px.checked_mul(self.pixel_size()))
            .ok_or_else(too_large)
    }

    /// Resize `data` from `src_width` x `src_height` to `dst_width` x `dst_height`
    ///
    /// Uses bilinear filtering with pixel-center alignment. 8-bit channels
    /// round to nearest.
    ///
    /// # Errors
    /// - [`ImageError::SizeMismatch`] if `data` does not hold the source image
    /// - [`ImageError::EmptySource`] if the source is empty but the destination is not
    /// - [`ImageError::TooLarge`] if a size overflows
    pub fn resize(
        self,
        data: &[u8],
        src_width: u32,
        src_height: u32,
        dst_width: u32,
        dst_height: u32,
    ) -> Result<Vec<u8>, ImageError> {
        let expected = self.size(src_width, src_height)?;
        if data.len() != expected {
            return Err(ImageError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        let out_len = self.size(dst_width, dst_height)?;
        if out_len == 0 {
            return Ok(Vec::new());
        }
        if expected == 0 {
            return Err(ImageError::EmptySource {
                width: src_width,
                height: src_height,
            });
        }
        if (src_width, src_height) == (dst_width, dst_height) {
            return Ok(data.to_vec());
        }

        let src = resize::Plane::decode(self, data, src_width, src_height);
        let out = src.bilinear(dst_width, dst_height);
        Ok(out.encode(self, out_len))
    }
}
