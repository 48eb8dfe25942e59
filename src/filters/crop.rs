//! Crop filter.
//!
//! Keeps the top-left corner of the picture as it is displayed. With
//! bottom-up storage those are the *last* stored rows, so the kept rows are
//! `height - h'..height` and column range `0..w'`.

use log::info;

use crate::buffer::PixelBuffer;

/// Crop to at most `width x height` pixels.
///
/// Returns the buffer untouched when both targets already cover the image.
pub fn crop(buffer: PixelBuffer, width: usize, height: usize) -> PixelBuffer {
    let (cur_width, cur_height) = buffer.dimensions();
    if width >= cur_width && height >= cur_height {
        info!("crop to {width}x{height} leaves {cur_width}x{cur_height} image unchanged");
        return buffer;
    }

    buffer.resize(width.min(cur_width), height.min(cur_height))
}
