use image::RgbaImage;
use resvg::tiny_skia::{IntSize, Pixmap};

use crate::foundation::error::{LayercardError, LayercardResult};

pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

/// Copy a straight-alpha image into a premultiplied pixmap.
pub fn to_pixmap(image: &RgbaImage) -> LayercardResult<Pixmap> {
    let (width, height) = image.dimensions();
    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| LayercardError::raster(format!("invalid pixmap size {width}x{height}")))?;
    let mut data = image.as_raw().clone();
    premultiply_rgba8_in_place(&mut data);
    Pixmap::from_vec(data, size)
        .ok_or_else(|| LayercardError::raster("failed to build pixmap from image buffer"))
}

pub fn from_pixmap(pixmap: Pixmap) -> LayercardResult<RgbaImage> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut data = pixmap.take();
    demultiply_rgba8_in_place(&mut data);
    RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| LayercardError::raster("pixmap buffer does not match its dimensions"))
}
