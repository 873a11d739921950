//! Shared helpers for benchmark drivers and tests.

use crate::{Image, ImageFormat};

pub const BENCH_SIZES: [usize; 4] = [256, 512, 1024, 2048];
pub const BENCH_FORMATS: [ImageFormat; 3] =
    [ImageFormat::Gray, ImageFormat::Bgr, ImageFormat::Bgra];
pub const BENCH_ANGLES: [f32; 4] = [0.0, 90.0, 180.0, 270.0];
pub const BENCH_PAYLOADS: [usize; 4] = [64, 4096, 65536, 1 << 20];

/// Gradient image where every channel of every pixel depends on its position.
pub fn create_test_image(width: usize, height: usize, format: ImageFormat) -> Image {
    let mut img = Image::new(width, height, format);
    let channels = img.channels();
    for y in 0..height {
        let row = img.row_mut(y);
        for x in 0..width {
            for c in 0..channels {
                row[x * channels + c] = (x * 7 + y * 13 + c * 61) as u8;
            }
        }
    }
    img
}

/// Deterministic pseudo-random payload for codec benchmarks.
pub fn create_payload(len: usize) -> Vec<u8> {
    let mut state = 0x2545_f491_u32;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

pub fn format_to_string(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Gray => "GRAY",
        ImageFormat::Bgr => "BGR",
        ImageFormat::Bgra => "BGRA",
    }
}
