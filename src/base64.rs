//! Standard base64 (RFC 4648) with optional MIME-style line wrapping.
//!
//! # Two-phase API
//!
//! Every write has a matching size query, so callers can size a buffer
//! before allocating it:
//!
//! ```
//! use rusty_codec::base64;
//!
//! let data = b"any carnal pleas";
//! let mut out = vec![0u8; base64::encoded_len(data.len(), false)];
//! let written = base64::encode_into(data, &mut out, false).unwrap();
//! assert_eq!(&out[..written], b"YW55IGNhcm5hbCBwbGVhcw==");
//!
//! let mut back = vec![0u8; base64::decoded_len(&out).unwrap()];
//! base64::decode_into(&out, &mut back).unwrap();
//! assert_eq!(back, data);
//! ```
//!
//! The writes check the destination length up front and fail with
//! [`Error::BufferTooSmall`] without touching it.
//!
//! # Decoding policy
//!
//! The decoder is strict. ASCII whitespace (space, tab, `\r`, `\n`, form
//! feed) is skipped wherever it appears; anything else outside the alphabet,
//! misplaced `=` padding, or an effective length that is not a multiple of 4
//! is rejected. Unused low bits of the last
//! symbol before padding are discarded rather than checked.

use crate::error::{Error, Result};

/// The 64 symbols of the standard alphabet, indexed by sextet value.
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Padding symbol for incomplete trailing groups.
pub const PAD: u8 = b'=';

/// Line width used by MIME and PEM style wrapping.
pub const MIME_LINE_WIDTH: usize = 76;

const INVALID: u8 = 0xff;

const DECODE_TABLE: [u8; 256] = build_decode_table(ALPHABET);

const fn build_decode_table(alphabet: &[u8; 64]) -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < alphabet.len() {
        table[alphabet[i] as usize] = i as u8;
        i += 1;
    }
    table
}

#[inline]
fn is_skipped(byte: u8) -> bool {
    byte.is_ascii_whitespace()
}

/// Line terminator inserted between wrapped lines.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }
}

/// Base64 encoder configuration.
///
/// A line break is placed between consecutive lines of `line_width` symbols.
/// The final line is never terminated, so the output of an encoding that fits
/// on one line is identical with and without wrapping.
///
/// Decoding ignores this configuration: line breaks of either style, and any
/// other ASCII whitespace, are always skipped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Base64 {
    line_width: Option<usize>,
    line_ending: LineEnding,
}

impl Default for Base64 {
    fn default() -> Self {
        Self::new()
    }
}

impl Base64 {
    /// Unwrapped encoder: the whole encoding on a single line.
    pub fn new() -> Self {
        Self {
            line_width: None,
            line_ending: LineEnding::Lf,
        }
    }

    /// Encoder wrapping at [`MIME_LINE_WIDTH`] with `\n` line breaks.
    pub fn mime() -> Self {
        Self {
            line_width: Some(MIME_LINE_WIDTH),
            line_ending: LineEnding::Lf,
        }
    }

    /// Sets the wrapping width in symbols. `None` or `Some(0)` disables wrapping.
    pub fn set_line_width(&mut self, line_width: Option<usize>) -> &mut Self {
        self.line_width = line_width.filter(|&width| width > 0);
        self
    }

    pub fn set_line_ending(&mut self, line_ending: LineEnding) -> &mut Self {
        self.line_ending = line_ending;
        self
    }

    pub fn line_width(&self) -> Option<usize> {
        self.line_width
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Exact number of bytes [`encode_into`](Self::encode_into) writes for
    /// `input_len` input bytes.
    pub fn encoded_len(&self, input_len: usize) -> usize {
        let symbols = input_len.div_ceil(3).saturating_mul(4);
        match self.line_width {
            Some(width) if symbols > 0 => {
                let breaks = (symbols - 1) / width;
                symbols.saturating_add(breaks.saturating_mul(self.line_ending.as_bytes().len()))
            }
            _ => symbols,
        }
    }

    /// Encodes `input` into the front of `output`, returning the bytes written.
    pub fn encode_into(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let need = self.encoded_len(input.len());
        if output.len() < need {
            tracing::debug!(need, have = output.len(), "base64 encode destination too small");
            return Err(Error::BufferTooSmall {
                need,
                have: output.len(),
            });
        }
        tracing::trace!(input_len = input.len(), need, "base64 encode");
        let written = self.encode_unchecked(input, output);
        debug_assert_eq!(written, need);
        Ok(written)
    }

    /// Encodes `input` into a freshly allocated string.
    pub fn encode(&self, input: &[u8]) -> String {
        let mut output = vec![0u8; self.encoded_len(input.len())];
        let written = self.encode_unchecked(input, &mut output);
        output.truncate(written);
        output.into_iter().map(char::from).collect()
    }

    // Caller guarantees `output.len() >= self.encoded_len(input.len())`.
    fn encode_unchecked(&self, input: &[u8], output: &mut [u8]) -> usize {
        let mut writer = SymbolWriter {
            output,
            pos: 0,
            column: 0,
            line_width: self.line_width,
            line_ending: self.line_ending.as_bytes(),
        };

        let mut groups = input.chunks_exact(3);
        for group in &mut groups {
            writer.push_all(&encode_group(group[0], group[1], group[2]));
        }

        match *groups.remainder() {
            [a] => {
                let symbols = encode_group(a, 0, 0);
                writer.push_all(&[symbols[0], symbols[1], PAD, PAD]);
            }
            [a, b] => {
                let symbols = encode_group(a, b, 0);
                writer.push_all(&[symbols[0], symbols[1], symbols[2], PAD]);
            }
            _ => {}
        }

        writer.pos
    }
}

struct SymbolWriter<'a> {
    output: &'a mut [u8],
    pos: usize,
    column: usize,
    line_width: Option<usize>,
    line_ending: &'static [u8],
}

impl SymbolWriter<'_> {
    #[inline]
    fn push(&mut self, symbol: u8) {
        if let Some(width) = self.line_width {
            if self.column == width {
                let end = self.pos + self.line_ending.len();
                self.output[self.pos..end].copy_from_slice(self.line_ending);
                self.pos = end;
                self.column = 0;
            }
        }
        self.output[self.pos] = symbol;
        self.pos += 1;
        self.column += 1;
    }

    #[inline]
    fn push_all(&mut self, symbols: &[u8; 4]) {
        for &symbol in symbols {
            self.push(symbol);
        }
    }
}

#[inline]
fn encode_group(a: u8, b: u8, c: u8) -> [u8; 4] {
    let bits = (u32::from(a) << 16) | (u32::from(b) << 8) | u32::from(c);
    [
        ALPHABET[(bits >> 18) as usize & 0x3f],
        ALPHABET[(bits >> 12) as usize & 0x3f],
        ALPHABET[(bits >> 6) as usize & 0x3f],
        ALPHABET[bits as usize & 0x3f],
    ]
}

#[inline]
fn decode_group(sextets: [u8; 4]) -> [u8; 3] {
    let bits = (u32::from(sextets[0]) << 18)
        | (u32::from(sextets[1]) << 12)
        | (u32::from(sextets[2]) << 6)
        | u32::from(sextets[3]);
    [(bits >> 16) as u8, (bits >> 8) as u8, bits as u8]
}

/// Shape of a validated encoding, line breaks excluded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Layout {
    symbols: usize,
    padding: usize,
}

impl Layout {
    fn decoded_len(self) -> usize {
        self.symbols / 4 * 3 - self.padding
    }
}

fn scan(input: &[u8]) -> Result<Layout> {
    let mut symbols = 0usize;
    let mut padding = 0usize;

    for (offset, &byte) in input.iter().enumerate() {
        if is_skipped(byte) {
            continue;
        }
        if byte == PAD {
            // Padding may only fill the third and fourth slot of a group.
            if symbols % 4 < 2 || padding == 2 {
                return Err(Error::InvalidPadding { offset });
            }
            padding += 1;
        } else if DECODE_TABLE[byte as usize] == INVALID {
            return Err(Error::InvalidByte { offset, byte });
        } else if padding > 0 {
            return Err(Error::InvalidPadding { offset });
        }
        symbols += 1;
    }

    if symbols % 4 != 0 {
        return Err(Error::InvalidLength { len: symbols });
    }
    Ok(Layout { symbols, padding })
}

/// Returns the number of bytes [`decode_into`] produces for `input`.
///
/// Performs the full validation pass, so a successful result guarantees
/// `decode_into` succeeds given enough room.
pub fn decoded_len(input: &[u8]) -> Result<usize> {
    scan(input)
        .map(Layout::decoded_len)
        .inspect_err(|err| tracing::debug!(%err, "rejected base64 input"))
}

/// Decodes `input` into the front of `output`, returning the bytes written.
pub fn decode_into(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let layout = scan(input).inspect_err(|err| tracing::debug!(%err, "rejected base64 input"))?;
    let need = layout.decoded_len();
    if output.len() < need {
        tracing::debug!(need, have = output.len(), "base64 decode destination too small");
        return Err(Error::BufferTooSmall {
            need,
            have: output.len(),
        });
    }
    tracing::trace!(input_len = input.len(), need, "base64 decode");

    let mut sextets = [0u8; 4];
    let mut filled = 0;
    let mut pos = 0;
    for &byte in input {
        if is_skipped(byte) || byte == PAD {
            continue;
        }
        sextets[filled] = DECODE_TABLE[byte as usize];
        filled += 1;
        if filled == 4 {
            output[pos..pos + 3].copy_from_slice(&decode_group(sextets));
            pos += 3;
            filled = 0;
        }
    }

    // A padded final group leaves 2 or 3 sextets behind.
    if filled > 0 {
        sextets[filled..].fill(0);
        let tail = filled - 1;
        output[pos..pos + tail].copy_from_slice(&decode_group(sextets)[..tail]);
        pos += tail;
    }

    debug_assert_eq!(pos, need);
    Ok(pos)
}

/// Decodes `input` into a freshly allocated buffer.
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = vec![0u8; decoded_len(input)?];
    let written = decode_into(input, &mut output)?;
    output.truncate(written);
    Ok(output)
}

fn codec(wrap: bool) -> Base64 {
    if wrap { Base64::mime() } else { Base64::new() }
}

/// Dry run of [`encode_into`]: the bytes it would write for `input_len` bytes.
pub fn encoded_len(input_len: usize, wrap: bool) -> usize {
    codec(wrap).encoded_len(input_len)
}

/// Encodes `input`, breaking lines every [`MIME_LINE_WIDTH`] symbols when `wrap` is set.
pub fn encode_into(input: &[u8], output: &mut [u8], wrap: bool) -> Result<usize> {
    codec(wrap).encode_into(input, output)
}

pub fn encode(input: &[u8], wrap: bool) -> String {
    codec(wrap).encode(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc4648_vectors() {
        let cases: [(&[u8], &str); 7] = [
            (b"", ""),
            (b"f", "Zg=="),
            (b"fo", "Zm8="),
            (b"foo", "Zm9v"),
            (b"foob", "Zm9vYg=="),
            (b"fooba", "Zm9vYmE="),
            (b"foobar", "Zm9vYmFy"),
        ];
        for (raw, encoded) in cases {
            assert_eq!(encode(raw, false), encoded);
            assert_eq!(decode(encoded.as_bytes()).unwrap(), raw);
        }
    }

    #[test]
    fn test_padding_shape() {
        let one = encode(&[0xff], false);
        assert_eq!(one.len(), 4);
        assert!(one.ends_with("==") && !one[..2].contains('='));

        let two = encode(&[0xff, 0xee], false);
        assert_eq!(two.len(), 4);
        assert!(two.ends_with('=') && !two[..3].contains('='));

        let three = encode(&[0xff, 0xee, 0xdd], false);
        assert_eq!(three, "/+7d");
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(encoded_len(0, false), 0);
        assert_eq!(encoded_len(0, true), 0);
        assert_eq!(encoded_len(1, false), 4);
        assert_eq!(encoded_len(57, true), 76);
        assert_eq!(encoded_len(58, true), 76 + 1 + 4);
        assert_eq!(encoded_len(114, true), 152 + 1);
        assert_eq!(encoded_len(200, true), 268 + 3);
    }

    #[test]
    fn test_wrap_places_breaks_between_lines() {
        let data: Vec<u8> = (0..200u8).collect();
        let text = encode(&data, true);
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[..3].iter().all(|line| line.len() == MIME_LINE_WIDTH));
        assert_eq!(lines[3].len(), 268 - 3 * MIME_LINE_WIDTH);
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_crlf_and_custom_width() {
        let mut codec = Base64::new();
        codec
            .set_line_width(Some(4))
            .set_line_ending(LineEnding::CrLf);
        let text = codec.encode(b"foobar!");
        assert_eq!(text, "Zm9v\r\nYmFy\r\nIQ==");
        assert_eq!(codec.encoded_len(7), text.len());
        assert_eq!(decode(text.as_bytes()).unwrap(), b"foobar!");
    }

    #[test]
    fn test_zero_width_disables_wrapping() {
        let mut codec = Base64::mime();
        codec.set_line_width(Some(0));
        assert_eq!(codec.line_width(), None);
        assert!(!codec.encode(&[7u8; 300]).contains('\n'));
    }

    #[test]
    fn test_encode_into_too_small_is_untouched() {
        let mut out = [0xaau8; 7];
        let err = encode_into(b"foobar", &mut out, false).unwrap_err();
        assert_eq!(err, Error::BufferTooSmall { need: 8, have: 7 });
        assert_eq!(out, [0xaa; 7]);
    }

    #[test]
    fn test_decode_into_too_small_is_untouched() {
        let mut out = [0u8; 5];
        let err = decode_into(b"Zm9vYmFy", &mut out).unwrap_err();
        assert_eq!(err, Error::BufferTooSmall { need: 6, have: 5 });
        assert_eq!(out, [0; 5]);
    }

    #[test]
    fn test_decode_into_larger_buffer() {
        let mut out = [0u8; 16];
        let written = decode_into(b"Zm9vYg==", &mut out).unwrap();
        assert_eq!(&out[..written], b"foob");
    }

    #[test]
    fn test_decode_rejects_bad_length() {
        assert_eq!(decoded_len(b"Zm9"), Err(Error::InvalidLength { len: 3 }));
        assert_eq!(decode(b"Zm9vY"), Err(Error::InvalidLength { len: 5 }));
        assert_eq!(decode(b"Zg="), Err(Error::InvalidLength { len: 3 }));
    }

    #[test]
    fn test_decode_rejects_bad_bytes() {
        assert_eq!(
            decode(b"Zm9v-YmFy"),
            Err(Error::InvalidByte {
                offset: 4,
                byte: b'-'
            })
        );
        assert_eq!(
            decode(b"Zm\0v"),
            Err(Error::InvalidByte {
                offset: 2,
                byte: 0
            })
        );
    }

    #[test]
    fn test_decode_skips_whitespace() {
        assert_eq!(decode(b"Zm9v YmFy").unwrap(), b"foobar");
        assert_eq!(decode(b"Zm9v\tYmFy").unwrap(), b"foobar");
        assert_eq!(decode(b"Zm9v \nYmFy\n").unwrap(), b"foobar");
        assert_eq!(decode(b" Z g = = \x0c").unwrap(), b"f");
        assert_eq!(decoded_len(b"Zm 9v\t").unwrap(), 3);
    }

    #[test]
    fn test_decode_rejects_misplaced_padding() {
        assert_eq!(decode(b"===="), Err(Error::InvalidPadding { offset: 0 }));
        assert_eq!(decode(b"Z==="), Err(Error::InvalidPadding { offset: 1 }));
        assert_eq!(decode(b"Zg==Zg=="), Err(Error::InvalidPadding { offset: 4 }));
        assert_eq!(decode(b"Zg=a"), Err(Error::InvalidPadding { offset: 3 }));
    }

    #[test]
    fn test_decode_skips_line_breaks() {
        assert_eq!(decode(b"Zm9v\r\nYmFy\n").unwrap(), b"foobar");
        assert_eq!(decode(b"Zg=\n=").unwrap(), b"f");
        assert_eq!(decode(b"\n\n").unwrap(), b"");
    }

    #[test]
    fn test_decode_discards_trailing_bits() {
        // "Zh==" carries non-zero bits past the single decoded byte.
        assert_eq!(decode(b"Zh==").unwrap(), b"f");
    }
}
