/// Builds a 24-bit BMP file byte by byte, independent of the library encoder.
///
/// `rgb(x, y)` gives the color at column `x` of display row `y` (row 0 at the
/// top). Rows are written bottom-up with 4-byte padding.
pub fn bmp_from_fn(width: usize, height: usize, rgb: impl Fn(usize, usize) -> [u8; 3]) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");

    let stride = (width * 3 + 3) & !3;
    let image_size = stride * height;
    let mut out = Vec::with_capacity(54 + image_size);

    out.extend_from_slice(b"BM");
    out.extend_from_slice(&((54 + image_size) as u32).to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&54u32.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(image_size as u32).to_le_bytes());
    out.extend_from_slice(&2835i32.to_le_bytes());
    out.extend_from_slice(&2835i32.to_le_bytes());
    out.extend_from_slice(&[0; 8]);

    for y in (0..height).rev() {
        for x in 0..width {
            let [r, g, b] = rgb(x, y);
            out.extend_from_slice(&[b, g, r]);
        }
        out.resize(out.len() + stride - width * 3, 0);
    }
    out
}

pub fn solid_bmp(width: usize, height: usize, rgb: [u8; 3]) -> Vec<u8> {
    bmp_from_fn(width, height, |_, _| rgb)
}

/// Smooth color ramp with some structure in every channel.
pub fn gradient_bmp(width: usize, height: usize) -> Vec<u8> {
    bmp_from_fn(width, height, |x, y| {
        [
            (x * 255 / (width - 1).max(1)) as u8,
            (y * 255 / (height - 1).max(1)) as u8,
            ((x + y) * 7 % 256) as u8,
        ]
    })
}

/// `(width, height)` from the header, height as stored (may be negative).
pub fn dimensions(bytes: &[u8]) -> (i32, i32) {
    let w = i32::from_le_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]);
    let h = i32::from_le_bytes([bytes[22], bytes[23], bytes[24], bytes[25]]);
    (w, h)
}

/// RGB at column `x` of display row `y` in a bottom-up file with offset 54.
pub fn rgb_at(bytes: &[u8], x: usize, y: usize) -> [u8; 3] {
    let (w, h) = dimensions(bytes);
    let (w, h) = (w as usize, h as usize);
    let stride = (w * 3 + 3) & !3;
    let at = 54 + (h - 1 - y) * stride + x * 3;
    [bytes[at + 2], bytes[at + 1], bytes[at]]
}

/// Every pixel of the file as RGB, display order.
pub fn all_pixels(bytes: &[u8]) -> Vec<[u8; 3]> {
    let (w, h) = dimensions(bytes);
    let mut px = Vec::new();
    for y in 0..h as usize {
        for x in 0..w as usize {
            px.push(rgb_at(bytes, x, y));
        }
    }
    px
}
