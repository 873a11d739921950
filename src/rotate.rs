//! Axis-aligned rotation and EXIF orientation correction.
//!
//! Rotations by multiples of 90° and the EXIF mirror variants are exact index
//! permutations: every destination pixel is fetched from one source pixel, no
//! interpolation is performed. All eight orientations share a single remapping
//! routine, generic over the channel count, so a pixel is always copied as one
//! `C`-byte tuple and its channels are never reordered.
//!
//! # Convention
//!
//! Rotations are clockwise. For a `W × H` source:
//!
//! ```text
//! angle   output   source (x, y) lands at
//!   0     W × H    (x, y)
//!  90     H × W    (H-1-y, x)
//! 180     W × H    (W-1-x, H-1-y)
//! 270     H × W    (y, W-1-x)
//! ```
//!
//! so a 90° rotation followed by a 270° rotation is the identity.

use crate::error::{Error, Result};
use crate::image::{Image, ImageFormat};

/// EXIF orientation codes for 90-degree rotations and mirrors.
///
/// Values match the EXIF Orientation tag (0x0112). The enum discriminants
/// correspond directly to EXIF codes 1-8.
///
/// ```text
/// Up (1)           UpMirrored (2)    Down (3)         DownMirrored (4)
/// ┌───────┐        ┌───────┐         ┌───────┐        ┌───────┐
/// │ 1   2 │        │ 2   1 │         │ 4   3 │        │ 3   4 │
/// │       │        │       │         │       │        │       │
/// │ 3   4 │        │ 4   3 │         │ 2   1 │        │ 1   2 │
/// └───────┘        └───────┘         └───────┘        └───────┘
///
/// LeftMirrored (5) Right (6)         RightMirrored (7) Left (8)
/// ┌───────┐        ┌───────┐         ┌───────┐         ┌───────┐
/// │ 1   3 │        │ 3   1 │         │ 4   2 │         │ 2   4 │
/// │       │        │       │         │       │         │       │
/// │ 2   4 │        │ 4   2 │         │ 3   1 │         │ 1   3 │
/// └───────┘        └───────┘         └───────┘         └───────┘
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Up = 1,
    UpMirrored = 2,
    Down = 3,
    DownMirrored = 4,
    LeftMirrored = 5,
    Right = 6,
    RightMirrored = 7,
    Left = 8,
}

impl Orientation {
    pub fn from_exif(code: u16) -> Option<Orientation> {
        match code {
            1 => Some(Orientation::Up),
            2 => Some(Orientation::UpMirrored),
            3 => Some(Orientation::Down),
            4 => Some(Orientation::DownMirrored),
            5 => Some(Orientation::LeftMirrored),
            6 => Some(Orientation::Right),
            7 => Some(Orientation::RightMirrored),
            8 => Some(Orientation::Left),
            _ => None,
        }
    }

    pub fn exif_code(self) -> u16 {
        self as u16
    }

    /// True for the orientations that transpose the image (codes 5-8).
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::LeftMirrored
                | Orientation::Right
                | Orientation::RightMirrored
                | Orientation::Left
        )
    }

    pub fn output_dimensions(self, width: usize, height: usize) -> (usize, usize) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

/// Clockwise rotation by a multiple of 90 degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Parses an angle in degrees.
    ///
    /// Any finite multiple of 90 is accepted and reduced modulo 360, so `-90`
    /// and `630` both give [`Rotation::Deg270`]. Every other value fails with
    /// [`Error::UnsupportedAngle`].
    pub fn from_degrees(degrees: f32) -> Result<Rotation> {
        let normalized = degrees.rem_euclid(360.0);
        if normalized == 0.0 {
            Ok(Rotation::Deg0)
        } else if normalized == 90.0 {
            Ok(Rotation::Deg90)
        } else if normalized == 180.0 {
            Ok(Rotation::Deg180)
        } else if normalized == 270.0 {
            Ok(Rotation::Deg270)
        } else {
            tracing::debug!(degrees, "rejected rotation angle");
            Err(Error::UnsupportedAngle { degrees })
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// The rotation that undoes this one.
    pub fn inverse(self) -> Rotation {
        match self {
            Rotation::Deg0 => Rotation::Deg0,
            Rotation::Deg90 => Rotation::Deg270,
            Rotation::Deg180 => Rotation::Deg180,
            Rotation::Deg270 => Rotation::Deg90,
        }
    }

    pub fn orientation(self) -> Orientation {
        match self {
            Rotation::Deg0 => Orientation::Up,
            Rotation::Deg90 => Orientation::Right,
            Rotation::Deg180 => Orientation::Down,
            Rotation::Deg270 => Orientation::Left,
        }
    }

    pub fn swaps_dimensions(self) -> bool {
        self.orientation().swaps_dimensions()
    }

    pub fn output_dimensions(self, width: usize, height: usize) -> (usize, usize) {
        self.orientation().output_dimensions(width, height)
    }
}

/// Rotates a `width × height` buffer of `C`-channel pixels into `dst`.
///
/// Both buffers must hold at least `width * height * C` bytes; extra bytes
/// are left untouched. Returns the output `(width, height)`.
pub fn rotate_pixels<const C: usize>(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    rotation: Rotation,
) -> Result<(usize, usize)> {
    orient_pixels::<C>(src, dst, width, height, rotation.orientation())
}

/// Applies an EXIF orientation to a buffer of `C`-channel pixels.
pub fn orient_pixels<const C: usize>(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    orientation: Orientation,
) -> Result<(usize, usize)> {
    let len = checked_buffers(src, dst, width.saturating_mul(height).saturating_mul(C))?;
    remap::<C>(&src[..len], &mut dst[..len], width, height, orientation);
    Ok(orientation.output_dimensions(width, height))
}

/// Rotates a pixel buffer whose layout is described by `format`.
///
/// `degrees` must be a multiple of 90; see [`Rotation::from_degrees`].
pub fn rotate_buffer(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    format: ImageFormat,
    degrees: f32,
) -> Result<(usize, usize)> {
    let rotation = Rotation::from_degrees(degrees)?;
    orient_buffer(src, dst, width, height, format, rotation.orientation())
}

/// Applies an EXIF orientation to a pixel buffer whose layout is described by `format`.
pub fn orient_buffer(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    format: ImageFormat,
    orientation: Orientation,
) -> Result<(usize, usize)> {
    let need = format.buffer_len(width, height).unwrap_or(usize::MAX);
    let len = checked_buffers(src, dst, need)?;
    tracing::trace!(width, height, ?format, ?orientation, "orient buffer");
    remap_format(format, &src[..len], &mut dst[..len], width, height, orientation);
    Ok(orientation.output_dimensions(width, height))
}

fn checked_buffers(src: &[u8], dst: &[u8], need: usize) -> Result<usize> {
    for have in [src.len(), dst.len()] {
        if have < need {
            tracing::debug!(need, have, "pixel buffer too small");
            return Err(Error::BufferTooSmall { need, have });
        }
    }
    Ok(need)
}

fn remap_format(
    format: ImageFormat,
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    orientation: Orientation,
) {
    match format {
        ImageFormat::Gray => remap::<1>(src, dst, width, height, orientation),
        ImageFormat::Bgr => remap::<3>(src, dst, width, height, orientation),
        ImageFormat::Bgra => remap::<4>(src, dst, width, height, orientation),
    }
}

// `src` and `dst` are exactly `width * height * C` bytes long.
fn remap<const C: usize>(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    orientation: Orientation,
) {
    const { assert!(C > 0) };

    if orientation == Orientation::Up || src.is_empty() {
        dst.copy_from_slice(src);
        return;
    }

    let (out_w, out_h) = orientation.output_dimensions(width, height);
    let max_x = out_w - 1;
    let max_y = out_h - 1;

    for (y, row) in dst.chunks_exact_mut(out_w * C).enumerate() {
        for (x, pixel) in row.chunks_exact_mut(C).enumerate() {
            let (src_x, src_y) = source_coordinates(x, y, max_x, max_y, orientation);
            let start = (src_y * width + src_x) * C;
            pixel.copy_from_slice(&src[start..start + C]);
        }
    }
}

/// Maps destination `(x, y)` back to the source pixel it is copied from.
fn source_coordinates(
    x: usize,
    y: usize,
    max_x: usize,
    max_y: usize,
    orientation: Orientation,
) -> (usize, usize) {
    match orientation {
        Orientation::Up => (x, y),
        Orientation::UpMirrored => (max_x - x, y),
        Orientation::Down => (max_x - x, max_y - y),
        Orientation::DownMirrored => (x, max_y - y),
        Orientation::LeftMirrored => (y, x),
        Orientation::Right => (y, max_x - x),
        Orientation::RightMirrored => (max_y - y, max_x - x),
        Orientation::Left => (max_y - y, x),
    }
}

/// Image-level rotation operator.
///
/// Wraps the buffer routines for callers holding an [`Image`]; rotation and
/// mirroring are both expressed as an [`Orientation`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OpRotate90 {
    orientation: Orientation,
}

impl OpRotate90 {
    pub fn new(rotation: Rotation) -> Self {
        Self {
            orientation: rotation.orientation(),
        }
    }

    pub fn from_degrees(degrees: f32) -> Result<Self> {
        Rotation::from_degrees(degrees).map(Self::new)
    }

    pub fn from_orientation(orientation: Orientation) -> Self {
        Self { orientation }
    }

    pub fn set_rotation(&mut self, rotation: Rotation) -> &mut Self {
        self.orientation = rotation.orientation();
        self
    }

    pub fn set_orientation(&mut self, orientation: Orientation) -> &mut Self {
        self.orientation = orientation;
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn compute_output_dimensions(&self, src: &Image) -> (usize, usize) {
        self.orientation.output_dimensions(src.width(), src.height())
    }

    pub fn apply(&self, src: &Image) -> Image {
        if self.orientation == Orientation::Up {
            return src.clone();
        }

        let (out_w, out_h) = self.compute_output_dimensions(src);
        let mut result = Image::new(out_w, out_h, src.format());
        remap_format(
            src.format(),
            src.as_bytes(),
            result.as_bytes_mut(),
            src.width(),
            src.height(),
            self.orientation,
        );
        result
    }

    /// Writes the result into `dst`, which must already have the output
    /// dimensions and the source format.
    pub fn apply_to_preallocated(&self, src: &Image, dst: &mut Image) -> Result<()> {
        let (out_w, out_h) = self.compute_output_dimensions(src);
        if dst.width() != out_w || dst.height() != out_h || dst.format() != src.format() {
            return Err(Error::DimensionMismatch {
                expected: format!("{out_w}x{out_h} {:?}", src.format()),
                actual: format!("{}x{} {:?}", dst.width(), dst.height(), dst.format()),
            });
        }

        remap_format(
            src.format(),
            src.as_bytes(),
            dst.as_bytes_mut(),
            src.width(),
            src.height(),
            self.orientation,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 3x2 gray image:
    // 1 2 3
    // 4 5 6
    const SRC: [u8; 6] = [1, 2, 3, 4, 5, 6];

    fn orient_gray(orientation: Orientation) -> (Vec<u8>, (usize, usize)) {
        let mut dst = vec![0u8; SRC.len()];
        let dims = orient_pixels::<1>(&SRC, &mut dst, 3, 2, orientation).unwrap();
        (dst, dims)
    }

    #[test]
    fn test_from_degrees() {
        assert_eq!(Rotation::from_degrees(0.0), Ok(Rotation::Deg0));
        assert_eq!(Rotation::from_degrees(-0.0), Ok(Rotation::Deg0));
        assert_eq!(Rotation::from_degrees(90.0), Ok(Rotation::Deg90));
        assert_eq!(Rotation::from_degrees(180.0), Ok(Rotation::Deg180));
        assert_eq!(Rotation::from_degrees(270.0), Ok(Rotation::Deg270));
        assert_eq!(Rotation::from_degrees(360.0), Ok(Rotation::Deg0));
        assert_eq!(Rotation::from_degrees(-90.0), Ok(Rotation::Deg270));
        assert_eq!(Rotation::from_degrees(630.0), Ok(Rotation::Deg270));
    }

    #[test]
    fn test_from_degrees_rejects_other_angles() {
        for degrees in [45.0, 89.999, 1.0, -30.0, f32::INFINITY] {
            assert!(matches!(
                Rotation::from_degrees(degrees),
                Err(Error::UnsupportedAngle { .. })
            ));
        }
        assert!(Rotation::from_degrees(f32::NAN).is_err());
    }

    #[test]
    fn test_rotation_inverse_and_degrees() {
        for rotation in [
            Rotation::Deg0,
            Rotation::Deg90,
            Rotation::Deg180,
            Rotation::Deg270,
        ] {
            let sum = rotation.degrees() + rotation.inverse().degrees();
            assert_eq!(sum % 360, 0);
        }
    }

    #[test]
    fn test_exif_codes() {
        for code in 1..=8 {
            let orientation = Orientation::from_exif(code).unwrap();
            assert_eq!(orientation.exif_code(), code);
        }
        assert_eq!(Orientation::from_exif(0), None);
        assert_eq!(Orientation::from_exif(9), None);
    }

    #[test]
    fn test_rotations_of_known_image() {
        assert_eq!(orient_gray(Orientation::Up), (SRC.to_vec(), (3, 2)));
        assert_eq!(
            orient_gray(Orientation::Right),
            (vec![4, 1, 5, 2, 6, 3], (2, 3))
        );
        assert_eq!(
            orient_gray(Orientation::Down),
            (vec![6, 5, 4, 3, 2, 1], (3, 2))
        );
        assert_eq!(
            orient_gray(Orientation::Left),
            (vec![3, 6, 2, 5, 1, 4], (2, 3))
        );
    }

    #[test]
    fn test_mirrors_of_known_image() {
        assert_eq!(
            orient_gray(Orientation::UpMirrored),
            (vec![3, 2, 1, 6, 5, 4], (3, 2))
        );
        assert_eq!(
            orient_gray(Orientation::DownMirrored),
            (vec![4, 5, 6, 1, 2, 3], (3, 2))
        );
        assert_eq!(
            orient_gray(Orientation::LeftMirrored),
            (vec![1, 4, 2, 5, 3, 6], (2, 3))
        );
        assert_eq!(
            orient_gray(Orientation::RightMirrored),
            (vec![6, 3, 5, 2, 4, 1], (2, 3))
        );
    }

    #[test]
    fn test_rotate_buffer_dispatches_on_format() {
        // 2x1 BGR: two distinct pixels.
        let src = [1, 2, 3, 4, 5, 6];
        let mut dst = [0u8; 6];
        let dims = rotate_buffer(&src, &mut dst, 2, 1, ImageFormat::Bgr, 90.0).unwrap();
        assert_eq!(dims, (1, 2));
        assert_eq!(dst, [1, 2, 3, 4, 5, 6]);

        let dims = rotate_buffer(&src, &mut dst, 2, 1, ImageFormat::Bgr, 180.0).unwrap();
        assert_eq!(dims, (2, 1));
        assert_eq!(dst, [4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_rotate_buffer_rejects_short_buffers() {
        let src = [0u8; 12];
        let mut dst = [7u8; 11];
        assert_eq!(
            rotate_buffer(&src, &mut dst, 2, 2, ImageFormat::Bgr, 90.0),
            Err(Error::BufferTooSmall { need: 12, have: 11 })
        );
        assert_eq!(dst, [7u8; 11]);

        let mut dst = [0u8; 12];
        assert_eq!(
            rotate_buffer(&src[..8], &mut dst, 2, 2, ImageFormat::Bgr, 90.0),
            Err(Error::BufferTooSmall { need: 12, have: 8 })
        );
    }

    #[test]
    fn test_rotate_pixels_rejects_short_buffers() {
        let src = [1u8; 16];
        let mut dst = [7u8; 15];
        assert_eq!(
            rotate_pixels::<4>(&src, &mut dst, 2, 2, Rotation::Deg90),
            Err(Error::BufferTooSmall { need: 16, have: 15 })
        );
        assert_eq!(dst, [7u8; 15]);

        let mut dst = [7u8; 16];
        assert_eq!(
            orient_pixels::<4>(&src[..12], &mut dst, 2, 2, Orientation::Left),
            Err(Error::BufferTooSmall { need: 16, have: 12 })
        );
        assert_eq!(dst, [7u8; 16]);
    }

    #[test]
    fn test_rotate_buffer_rejects_angle_before_touching_dst() {
        let src = [1u8; 4];
        let mut dst = [0u8; 4];
        assert!(rotate_buffer(&src, &mut dst, 2, 2, ImageFormat::Gray, 45.0).is_err());
        assert_eq!(dst, [0u8; 4]);
    }

    #[test]
    fn test_rotate_oversized_dst_keeps_tail() {
        let mut dst = [9u8; 8];
        rotate_pixels::<1>(&SRC, &mut dst, 3, 2, Rotation::Deg90).unwrap();
        assert_eq!(dst, [4, 1, 5, 2, 6, 3, 9, 9]);
    }

    #[test]
    fn test_empty_image() {
        let src: [u8; 0] = [];
        let mut dst: [u8; 0] = [];
        assert_eq!(
            rotate_pixels::<4>(&src, &mut dst, 0, 5, Rotation::Deg90),
            Ok((5, 0))
        );
    }

    #[test]
    fn test_op_apply_to_preallocated_checks_geometry() {
        let src = Image::from_raw(3, 2, ImageFormat::Gray, SRC.to_vec()).unwrap();
        let op = OpRotate90::new(Rotation::Deg90);

        let mut wrong = Image::new(3, 2, ImageFormat::Gray);
        assert!(matches!(
            op.apply_to_preallocated(&src, &mut wrong),
            Err(Error::DimensionMismatch { .. })
        ));

        let mut dst = Image::new(2, 3, ImageFormat::Gray);
        op.apply_to_preallocated(&src, &mut dst).unwrap();
        assert_eq!(dst, op.apply(&src));
        assert_eq!(dst.as_bytes(), &[4u8, 1, 5, 2, 6, 3]);
    }

    #[test]
    fn test_op_setters() {
        let mut op = OpRotate90::default();
        assert_eq!(op.orientation(), Orientation::Up);
        op.set_rotation(Rotation::Deg270);
        assert_eq!(op.orientation(), Orientation::Left);
        op.set_orientation(Orientation::UpMirrored);
        assert_eq!(op.orientation(), Orientation::UpMirrored);
        assert_eq!(
            OpRotate90::from_degrees(-180.0).unwrap().orientation(),
            Orientation::Down
        );
    }
}
