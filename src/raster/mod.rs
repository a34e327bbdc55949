//! Pixel operations behind a trait so the pipeline never touches pixels directly.

use image::RgbaImage;

use crate::{
    foundation::core::{Rgba8, Size},
    foundation::error::LayercardResult,
    render::instruction::Instruction,
    scene::model::OutputFormat,
};

pub(crate) mod engine;
pub(crate) mod fonts;
pub(crate) mod pixels;

/// Decoded asset plus what the decoder learned about it.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pub image: RgbaImage,
    /// Container format sniffed from the bytes, if recognised.
    pub format: Option<image::ImageFormat>,
}

impl DecodedImage {
    pub fn size(&self) -> Size {
        let (width, height) = self.image.dimensions();
        Size { width, height }
    }
}

/// How a resize maps the source onto the target box. Both preserve aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitMode {
    /// Scale so the whole image fits inside the box. No cropping, no letterboxing.
    Inside,
    /// Scale so the box is fully covered, cropping the centered overflow.
    Cover,
}

/// Raster-image engine used by the pipeline.
///
/// Implementations are shared across concurrent runs and must not keep per-run state.
pub trait RasterEngine: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> LayercardResult<DecodedImage>;

    /// Solid-color surface.
    fn blank(&self, width: u32, height: u32, color: Rgba8) -> LayercardResult<RgbaImage>;

    fn resize(
        &self,
        image: &RgbaImage,
        width: u32,
        height: u32,
        fit: FitMode,
    ) -> LayercardResult<RgbaImage>;

    /// Rotate clockwise by `degrees`, growing the surface to fit and filling the new area.
    fn rotate(&self, image: &RgbaImage, degrees: f64, fill: Rgba8) -> LayercardResult<RgbaImage>;

    /// Draw `instructions` onto `base` in order. Markup and raster layers interleave.
    fn flatten(&self, base: RgbaImage, instructions: &[Instruction])
    -> LayercardResult<RgbaImage>;

    fn encode(&self, image: &RgbaImage, format: OutputFormat) -> LayercardResult<Vec<u8>>;

    /// Crop away fully transparent borders.
    fn trim(&self, image: &RgbaImage) -> LayercardResult<RgbaImage>;
}

/// Output size of an aspect-preserving "fit inside" resize of `src` into `target`.
pub fn fit_inside(src: Size, target: Size) -> Size {
    if src.width == 0 || src.height == 0 {
        return target;
    }
    let sx = f64::from(target.width) / f64::from(src.width);
    let sy = f64::from(target.height) / f64::from(src.height);
    let scale = sx.min(sy);
    Size {
        width: ((f64::from(src.width) * scale).round() as u32).clamp(1, target.width.max(1)),
        height: ((f64::from(src.height) * scale).round() as u32).clamp(1, target.height.max(1)),
    }
}

/// Scaled size and crop offset of a centered "cover" resize of `src` onto `target`.
pub fn fit_cover(src: Size, target: Size) -> (Size, (u32, u32)) {
    if src.width == 0 || src.height == 0 {
        return (target, (0, 0));
    }
    let sx = f64::from(target.width) / f64::from(src.width);
    let sy = f64::from(target.height) / f64::from(src.height);
    let scale = sx.max(sy);
    let scaled = Size {
        width: ((f64::from(src.width) * scale).round() as u32).max(target.width),
        height: ((f64::from(src.height) * scale).round() as u32).max(target.height),
    };
    let offset = (
        (scaled.width - target.width) / 2,
        (scaled.height - target.height) / 2,
    );
    (scaled, offset)
}
