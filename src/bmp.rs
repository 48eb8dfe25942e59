//! Uncompressed 24-bit BMP container.
//!
//! ## Layout
//!
//! ```text
//! offset  size  field
//!      0     2  signature "BM"
//!      2     4  file size
//!      6     2  reserved 1
//!      8     2  reserved 2
//!     10     4  pixel data offset
//!     14     4  info header size (>= 40)
//!     18     4  width (i32, > 0)
//!     22     4  height (i32, != 0; negative means top-down rows)
//!     26     2  planes
//!     28     2  bits per pixel (must be 24)
//!     30     4  compression (must be 0)
//!     34     4  image size
//!     38     4  x pixels per meter (i32)
//!     42     4  y pixels per meter (i32)
//!     46     4  colors used
//!     50     4  colors important
//! ```
//!
//! Pixel rows hold B, G, R bytes and are padded to a multiple of 4 bytes.
//! Decoding always yields bottom-up storage; encoding always writes a
//! 54-byte header, offset 54, positive height.

use std::fs;
use std::mem::size_of;
use std::path::Path;

use log::debug;

use crate::buffer::{quantize, PixelBuffer, CHANNELS};
use crate::error::{Error, Result};

/// File header plus BITMAPINFOHEADER.
pub const HEADER_LEN: usize = 54;
const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: u32 = 40;
const SIGNATURE: &[u8; 2] = b"BM";
const BITS_PER_PIXEL: u16 = 24;
const BI_RGB: u32 = 0;

/// Header fields that carry over unchanged from decode to encode.
///
/// Geometry, sizes and offsets are not stored here; the encoder derives them
/// from the pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    pub reserved1: u16,
    pub reserved2: u16,
    pub planes: u16,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

impl Default for BmpHeader {
    /// 72 DPI, single plane.
    fn default() -> Self {
        BmpHeader {
            reserved1: 0,
            reserved2: 0,
            planes: 1,
            x_pixels_per_meter: 2835,
            y_pixels_per_meter: 2835,
            colors_used: 0,
            colors_important: 0,
        }
    }
}

/// A decoded image with the header fields needed to write it back.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub header: BmpHeader,
    pub pixels: PixelBuffer,
}

impl Bitmap {
    /// Wrap `pixels` with a default header.
    pub fn new(pixels: PixelBuffer) -> Self {
        Bitmap {
            header: BmpHeader::default(),
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }
}

/// Bytes per stored row, padded to 4.
#[inline]
pub fn row_stride(width: usize) -> usize {
    (width * CHANNELS + 3) & !3
}

// ============================================================================
// Decode
// ============================================================================

/// Parse a BMP file held in memory.
pub fn decode(bytes: &[u8]) -> Result<Bitmap> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::Format(format!(
            "{} bytes is shorter than the {HEADER_LEN}-byte header",
            bytes.len()
        )));
    }
    if &bytes[0..2] != SIGNATURE {
        return Err(Error::Format(format!(
            "bad signature {:02x} {:02x}, expected \"BM\"",
            bytes[0], bytes[1]
        )));
    }

    let offset = read_u32(bytes, 10) as usize;
    let info_len = read_u32(bytes, 14);
    let width = read_i32(bytes, 18);
    let height = read_i32(bytes, 22);
    let bit_count = read_u16(bytes, 28);
    let compression = read_u32(bytes, 30);

    if info_len < INFO_HEADER_LEN {
        return Err(Error::Format(format!(
            "info header of {info_len} bytes is not supported, need at least {INFO_HEADER_LEN}"
        )));
    }
    if bit_count != BITS_PER_PIXEL {
        return Err(Error::Format(format!(
            "{bit_count} bits per pixel is not supported, only {BITS_PER_PIXEL}"
        )));
    }
    if compression != BI_RGB {
        return Err(Error::Format(format!(
            "compression type {compression} is not supported, only uncompressed"
        )));
    }
    if width <= 0 || height == 0 {
        return Err(Error::Format(format!("invalid dimensions {width}x{height}")));
    }
    if (offset as u64) < FILE_HEADER_LEN as u64 + info_len as u64 {
        return Err(Error::Format(format!(
            "pixel data offset {offset} lies inside the headers"
        )));
    }

    let header = BmpHeader {
        reserved1: read_u16(bytes, 6),
        reserved2: read_u16(bytes, 8),
        planes: read_u16(bytes, 26),
        x_pixels_per_meter: read_i32(bytes, 38),
        y_pixels_per_meter: read_i32(bytes, 42),
        colors_used: read_u32(bytes, 46),
        colors_important: read_u32(bytes, 50),
    };

    let top_down = height < 0;
    let width = width as usize;
    let rows = height.unsigned_abs() as usize;
    let stride = row_stride(width);

    let needed = stride
        .checked_mul(rows)
        .and_then(|n| n.checked_add(offset))
        .ok_or_else(|| Error::Format(format!("dimensions {width}x{rows} overflow")))?;
    if bytes.len() < needed {
        return Err(Error::Format(format!(
            "truncated pixel data: need {needed} bytes, have {}",
            bytes.len()
        )));
    }

    let count = width * rows * CHANNELS;
    let mut samples: Vec<f32> = Vec::new();
    samples
        .try_reserve_exact(count)
        .map_err(|_| Error::Allocation(count * size_of::<f32>()))?;

    // Storage is bottom-up; a top-down file is read back to front.
    for row in 0..rows {
        let src_row = if top_down { rows - 1 - row } else { row };
        let start = offset + src_row * stride;
        let line = &bytes[start..start + width * CHANNELS];
        samples.extend(line.iter().map(|&b| b as f32));
    }

    debug!(
        "decoded {width}x{rows} bitmap, stride {stride}, offset {offset}{}",
        if top_down { ", top-down" } else { "" }
    );

    Ok(Bitmap {
        header,
        pixels: PixelBuffer::from_bgr_samples(width, rows, samples)?,
    })
}

// ============================================================================
// Encode
// ============================================================================

/// Serialize to a complete BMP file.
///
/// Channel values are rounded to the nearest byte and clamped to `[0, 255]`.
pub fn encode(bitmap: &Bitmap) -> Result<Vec<u8>> {
    let (width, height) = bitmap.pixels.dimensions();
    if bitmap.pixels.is_empty() {
        return Err(Error::Format(format!("cannot encode an empty {width}x{height} image")));
    }

    let stride = row_stride(width);
    let image_size = stride
        .checked_mul(height)
        .filter(|&n| n <= (u32::MAX as usize - HEADER_LEN))
        .ok_or_else(|| Error::Format(format!("{width}x{height} is too large for a bitmap")))?;
    let (w, h) = match (i32::try_from(width), i32::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(Error::Format(format!("{width}x{height} is too large for a bitmap"))),
    };
    let file_size = HEADER_LEN + image_size;

    let mut out: Vec<u8> = Vec::new();
    out.try_reserve_exact(file_size)
        .map_err(|_| Error::Allocation(file_size))?;

    let hdr = &bitmap.header;
    out.extend_from_slice(SIGNATURE);
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&hdr.reserved1.to_le_bytes());
    out.extend_from_slice(&hdr.reserved2.to_le_bytes());
    out.extend_from_slice(&(HEADER_LEN as u32).to_le_bytes());

    out.extend_from_slice(&INFO_HEADER_LEN.to_le_bytes());
    out.extend_from_slice(&w.to_le_bytes());
    out.extend_from_slice(&h.to_le_bytes());
    out.extend_from_slice(&hdr.planes.to_le_bytes());
    out.extend_from_slice(&BITS_PER_PIXEL.to_le_bytes());
    out.extend_from_slice(&BI_RGB.to_le_bytes());
    out.extend_from_slice(&(image_size as u32).to_le_bytes());
    out.extend_from_slice(&hdr.x_pixels_per_meter.to_le_bytes());
    out.extend_from_slice(&hdr.y_pixels_per_meter.to_le_bytes());
    out.extend_from_slice(&hdr.colors_used.to_le_bytes());
    out.extend_from_slice(&hdr.colors_important.to_le_bytes());

    let padding = stride - width * CHANNELS;
    for row in 0..height {
        for col in 0..width {
            let px = bitmap.pixels.get(row, col);
            out.extend_from_slice(&[quantize(px.b), quantize(px.g), quantize(px.r)]);
        }
        out.resize(out.len() + padding, 0);
    }

    debug!("encoded {width}x{height} bitmap, {file_size} bytes");
    Ok(out)
}

/// Read and decode a BMP file.
pub fn read_file(path: impl AsRef<Path>) -> Result<Bitmap> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}

/// Encode fully in memory, then write. Nothing is written if encoding fails.
pub fn write_file(path: impl AsRef<Path>, bitmap: &Bitmap) -> Result<()> {
    let bytes = encode(bitmap)?;
    fs::write(path, bytes)?;
    Ok(())
}

#[inline]
fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

#[inline]
fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[inline]
fn read_i32(bytes: &[u8], at: usize) -> i32 {
    read_u32(bytes, at) as i32
}
