//! Error type shared by the codec and the rotator.

use thiserror::Error;

/// Failures surfaced by every fallible operation in this crate.
///
/// None of these are retried internally; the destination buffer is never
/// written to when one of them is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Base64 text whose length, ignoring line breaks, is not a multiple of 4.
    #[error("invalid base64 length {len}: not a multiple of 4")]
    InvalidLength { len: usize },

    /// A byte outside the base64 alphabet, padding and line breaks.
    #[error("invalid base64 byte 0x{byte:02x} at offset {offset}")]
    InvalidByte { offset: usize, byte: u8 },

    /// Padding in a position other than the end of the final group.
    #[error("misplaced base64 padding at offset {offset}")]
    InvalidPadding { offset: usize },

    /// Rotation angle that is not a multiple of 90 degrees.
    #[error("unsupported rotation angle {degrees}: only multiples of 90 degrees are allowed")]
    UnsupportedAngle { degrees: f32 },

    /// A buffer shorter than the operation requires.
    #[error("buffer too small: need {need} bytes, have {have}")]
    BufferTooSmall { need: usize, have: usize },

    /// Preallocated output image with the wrong geometry or format.
    #[error("image dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// Channel count with no matching pixel format.
    #[error("unsupported channel count {channels}")]
    UnsupportedChannelCount { channels: usize },
}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;
