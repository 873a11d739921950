//! Byte-buffer transforms: a base64 codec and axis-aligned pixel rotation.
//!
//! # Components
//!
//! - **[`base64`]**: standard-alphabet base64 with `=` padding and optional
//!   line wrapping every 76 symbols. Every write has a dry-run size query
//!   ([`base64::encoded_len`], [`base64::decoded_len`]) and fails with
//!   [`Error::BufferTooSmall`] instead of writing past the destination.
//! - **Rotation** ([`rotate_buffer`], [`OpRotate90`]): 0/90/180/270 degree
//!   rotation and EXIF orientation of row-major pixel buffers with 1, 3 or 4
//!   channels per pixel. One routine generic over the channel count does the
//!   remapping; [`ImageFormat`] selects the instance.
//!
//! Both components are stateless and safe to call concurrently on independent
//! buffers.
//!
//! # Example
//!
//! ```
//! use rusty_codec::{Image, ImageFormat, OpRotate90, Rotation, base64};
//!
//! // Create a 100x50 BGR image and rotate it a quarter turn clockwise.
//! let src = Image::new(100, 50, ImageFormat::Bgr);
//! let rotated = OpRotate90::new(Rotation::Deg90).apply(&src);
//! assert_eq!((rotated.width(), rotated.height()), (50, 100));
//!
//! // Ship the raw pixels as text.
//! let text = base64::encode(rotated.as_bytes(), true);
//! assert_eq!(base64::decode(text.as_bytes()).unwrap(), rotated.as_bytes());
//! ```

pub mod base64;
#[doc(hidden)]
pub mod bench_utils;
mod error;
mod image;
mod rotate;

pub use crate::error::{Error, Result};
pub use crate::image::{Image, ImageFormat};
pub use crate::rotate::{
    OpRotate90, Orientation, Rotation, orient_buffer, orient_pixels, rotate_buffer, rotate_pixels,
};
