use std::{io::Cursor, path::PathBuf, sync::Arc};

use image::{DynamicImage, RgbaImage, imageops::FilterType};
use kurbo::{Affine, Rect};
use resvg::tiny_skia::{Color, FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::{
    foundation::core::{Rgba8, Size},
    foundation::error::{LayercardError, LayercardResult},
    raster::{
        DecodedImage, FitMode, RasterEngine, fit_cover, fit_inside,
        fonts::{build_fontdb, make_font_resolver},
        pixels::{from_pixmap, to_pixmap},
    },
    render::instruction::Instruction,
    scene::model::OutputFormat,
};

// Refuse pathological allocations from bad dimensions.
const MAX_DIM: u32 = 16_384;

/// Options for [`ImageEngine`].
#[derive(Clone, Debug)]
pub struct EngineOpts {
    /// Extra directories scanned for `.ttf`/`.otf`/`.ttc` files.
    pub font_dirs: Vec<PathBuf>,
    pub system_fonts: bool,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            font_dirs: Vec::new(),
            system_fonts: true,
        }
    }
}

/// Default raster engine: `image` for codecs and resampling, `tiny_skia` for rotation and
/// alpha compositing, `resvg` for markup overlays.
pub struct ImageEngine {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for ImageEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageEngine")
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

impl Default for ImageEngine {
    fn default() -> Self {
        Self::new(EngineOpts::default())
    }
}

impl ImageEngine {
    pub fn new(opts: EngineOpts) -> Self {
        Self {
            fontdb: build_fontdb(&opts.font_dirs, opts.system_fonts),
        }
    }

    fn render_markup(&self, pixmap: &mut Pixmap, fragment: &str) -> LayercardResult<()> {
        let doc = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{fragment}</svg>"#,
            w = pixmap.width(),
            h = pixmap.height(),
        );
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: make_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&doc, &opts)
            .map_err(|e| LayercardError::raster(format!("parse markup overlay: {e}")))?;
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        Ok(())
    }
}

fn check_dims(width: u32, height: u32) -> LayercardResult<()> {
    if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
        return Err(LayercardError::raster(format!(
            "invalid raster size {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok(())
}

/// Bounding box size of a `size` rectangle rotated by `degrees`.
pub fn rotated_size(size: Size, degrees: f64) -> Size {
    let rect = Rect::new(0.0, 0.0, f64::from(size.width), f64::from(size.height));
    let bbox = Affine::rotate(degrees.to_radians()).transform_rect_bbox(rect);
    // Absorb float noise so a 90 degree turn of 100x50 stays 50x100.
    let px = |v: f64| ((v - 1e-6).ceil().max(1.0)) as u32;
    Size {
        width: px(bbox.width()),
        height: px(bbox.height()),
    }
}

impl RasterEngine for ImageEngine {
    fn decode(&self, bytes: &[u8]) -> LayercardResult<DecodedImage> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| LayercardError::raster(format!("sniff image format: {e}")))?;
        let format = reader.format();
        let image = reader
            .decode()
            .map_err(|e| LayercardError::raster(format!("decode image: {e}")))?
            .to_rgba8();
        Ok(DecodedImage { image, format })
    }

    fn blank(&self, width: u32, height: u32, color: Rgba8) -> LayercardResult<RgbaImage> {
        check_dims(width, height)?;
        Ok(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba(color.to_array()),
        ))
    }

    fn resize(
        &self,
        image: &RgbaImage,
        width: u32,
        height: u32,
        fit: FitMode,
    ) -> LayercardResult<RgbaImage> {
        check_dims(width, height)?;
        let (src_w, src_h) = image.dimensions();
        let src = Size::new(src_w, src_h);
        let target = Size::new(width, height);

        match fit {
            FitMode::Inside => {
                let out = fit_inside(src, target);
                if out == src {
                    return Ok(image.clone());
                }
                Ok(image::imageops::resize(
                    image,
                    out.width,
                    out.height,
                    FilterType::Lanczos3,
                ))
            }
            FitMode::Cover => {
                let (scaled, (x, y)) = fit_cover(src, target);
                let resized = if scaled == src {
                    image.clone()
                } else {
                    image::imageops::resize(
                        image,
                        scaled.width,
                        scaled.height,
                        FilterType::Lanczos3,
                    )
                };
                Ok(image::imageops::crop_imm(&resized, x, y, width, height).to_image())
            }
        }
    }

    fn rotate(&self, image: &RgbaImage, degrees: f64, fill: Rgba8) -> LayercardResult<RgbaImage> {
        let (w, h) = image.dimensions();
        let out = rotated_size(Size::new(w, h), degrees);
        check_dims(out.width, out.height)?;

        let src = to_pixmap(image)?;
        let mut dst = Pixmap::new(out.width, out.height)
            .ok_or_else(|| LayercardError::raster("failed to allocate rotation pixmap"))?;
        dst.fill(Color::from_rgba8(fill.r, fill.g, fill.b, fill.a));

        let xf = Affine::translate((f64::from(out.width) / 2.0, f64::from(out.height) / 2.0))
            * Affine::rotate(degrees.to_radians())
            * Affine::translate((-f64::from(w) / 2.0, -f64::from(h) / 2.0));
        let [a, b, c, d, e, f] = xf.as_coeffs().map(|v| v as f32);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        dst.draw_pixmap(
            0,
            0,
            src.as_ref(),
            &paint,
            Transform::from_row(a, b, c, d, e, f),
            None,
        );

        from_pixmap(dst)
    }

    fn flatten(
        &self,
        base: RgbaImage,
        instructions: &[Instruction],
    ) -> LayercardResult<RgbaImage> {
        let mut canvas = to_pixmap(&base)?;
        for instruction in instructions {
            match instruction {
                Instruction::Raster { image, left, top } => {
                    let layer = to_pixmap(image)?;
                    canvas.draw_pixmap(
                        *left,
                        *top,
                        layer.as_ref(),
                        &PixmapPaint::default(),
                        Transform::identity(),
                        None,
                    );
                }
                Instruction::Markup(markup) => self.render_markup(&mut canvas, &markup.fragment)?,
            }
        }
        from_pixmap(canvas)
    }

    fn encode(&self, image: &RgbaImage, format: OutputFormat) -> LayercardResult<Vec<u8>> {
        let dyn_img = match format {
            // No alpha channel in JPEG.
            OutputFormat::Jpeg => {
                DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image.clone()).to_rgb8())
            }
            OutputFormat::Png | OutputFormat::Webp => DynamicImage::ImageRgba8(image.clone()),
        };
        let mut buf = Vec::new();
        dyn_img
            .write_to(&mut Cursor::new(&mut buf), format.image_format())
            .map_err(|e| LayercardError::raster(format!("encode {format:?}: {e}")))?;
        Ok(buf)
    }

    fn trim(&self, image: &RgbaImage) -> LayercardResult<RgbaImage> {
        let (w, h) = image.dimensions();
        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0u32;
        let mut max_y = 0u32;
        for (x, y, px) in image.enumerate_pixels() {
            if px.0[3] == 0 {
                continue;
            }
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        if min_x == u32::MAX {
            return Err(LayercardError::raster(format!(
                "cannot trim a fully transparent {w}x{h} image"
            )));
        }
        Ok(
            image::imageops::crop_imm(image, min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
                .to_image(),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/engine.rs"]
mod tests;
