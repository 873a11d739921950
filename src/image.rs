//! Owned pixel buffers with row-major storage.
//!
//! # Memory Layout
//!
//! Pixels are stored in a flat byte buffer in row-major order:
//!
//! ```text
//! data[y * stride + x * channels + c]
//! ```
//!
//! where `stride = width * channels`.

use crate::error::{Error, Result};

/// Pixel format describing the number and order of channels.
///
/// Channel counts: `Gray`=1, `Bgr`=3, `Bgra`=4. Channels are opaque to the
/// rotator, so an RGB buffer can be tagged `Bgr` without any conversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Gray,
    Bgr,
    Bgra,
}

impl ImageFormat {
    /// Returns the number of channels for this format.
    pub fn channel_count(self) -> usize {
        match self {
            ImageFormat::Gray => 1,
            ImageFormat::Bgr => 3,
            ImageFormat::Bgra => 4,
        }
    }

    /// Returns true if this format includes an alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(self, ImageFormat::Bgra)
    }

    pub fn from_channel_count(channels: usize) -> Result<Self> {
        match channels {
            1 => Ok(ImageFormat::Gray),
            3 => Ok(ImageFormat::Bgr),
            4 => Ok(ImageFormat::Bgra),
            _ => Err(Error::UnsupportedChannelCount { channels }),
        }
    }

    /// Bytes needed for a `width × height` buffer, or `None` on overflow.
    pub fn buffer_len(self, width: usize, height: usize) -> Option<usize> {
        width
            .checked_mul(height)?
            .checked_mul(self.channel_count())
    }
}

/// A 2D image stored as a flat array of 8-bit samples in row-major order.
///
/// Pixel data is stored contiguously: `data[y * stride + x * channels + c]` where
/// `stride = width * channels`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    format: ImageFormat,
    data: Vec<u8>,
}

impl Image {
    /// Creates a zero-filled image with the given dimensions and format.
    ///
    /// # Panics
    ///
    /// Panics if the buffer size overflows `isize::MAX` bytes; use
    /// [`Image::try_new`] for untrusted dimensions.
    pub fn new(width: usize, height: usize, format: ImageFormat) -> Self {
        Self::try_new(width, height, format).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Creates a zero-filled image, failing if the buffer size is not addressable.
    pub fn try_new(width: usize, height: usize, format: ImageFormat) -> Result<Self> {
        let len = format
            .buffer_len(width, height)
            .filter(|&len| len <= isize::MAX as usize)
            .ok_or_else(|| Error::DimensionMismatch {
                expected: "a buffer of at most isize::MAX bytes".to_string(),
                actual: format!("{width}x{height} {format:?}"),
            })?;
        Ok(Self {
            width,
            height,
            format,
            data: vec![0; len],
        })
    }

    /// Wraps an existing buffer, which must hold exactly `width × height` pixels.
    pub fn from_raw(
        width: usize,
        height: usize,
        format: ImageFormat,
        data: Vec<u8>,
    ) -> Result<Self> {
        if format.buffer_len(width, height) != Some(data.len()) {
            return Err(Error::DimensionMismatch {
                expected: format!("{width}x{height} {format:?}"),
                actual: format!("{} bytes", data.len()),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Returns the pixel format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of channels per pixel.
    pub fn channels(&self) -> usize {
        self.format.channel_count()
    }

    /// Returns the row stride in bytes (width * channels).
    pub fn stride(&self) -> usize {
        self.width * self.channels()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns the samples for row `y`.
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.stride();
        let start = y * stride;
        &self.data[start..start + stride]
    }

    /// Returns mutable samples for row `y`.
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let stride = self.stride();
        let start = y * stride;
        &mut self.data[start..start + stride]
    }

    /// Returns the samples for the pixel at (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let channels = self.channels();
        let start = y * self.stride() + x * channels;
        &self.data[start..start + channels]
    }

    /// Returns mutable samples for the pixel at (x, y).
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let channels = self.channels();
        let start = y * self.stride() + x * channels;
        &mut self.data[start..start + channels]
    }
}
