use image::RgbaImage;

use crate::{
    assets::fetch::AssetFetcher,
    foundation::core::Canvas,
    foundation::error::{LayercardError, LayercardResult},
    raster::{FitMode, RasterEngine},
    scene::model::RenderConfig,
};

/// Base surface for a run: the configured background cover-fitted to the canvas, or a blank
/// surface in `defaultBackground`.
///
/// A background that cannot be fetched fails the whole run with
/// [`LayercardError::BackgroundLoad`].
pub fn build_canvas(
    config: &RenderConfig,
    canvas: Canvas,
    fetcher: &dyn AssetFetcher,
    engine: &dyn RasterEngine,
) -> LayercardResult<RgbaImage> {
    match config.background.as_deref() {
        Some(locator) => {
            tracing::info!(locator, "using background");
            let bytes = fetcher
                .fetch_bytes(locator)
                .map_err(|e| LayercardError::background(format!("'{locator}': {e}")))?;
            let decoded = engine.decode(&bytes)?;
            engine.resize(&decoded.image, canvas.width, canvas.height, FitMode::Cover)
        }
        None => {
            tracing::info!("creating blank background");
            engine.blank(
                canvas.width,
                canvas.height,
                config.default_background.to_rgba8(),
            )
        }
    }
}
