use crate::{
    foundation::error::LayercardResult, raster::RasterEngine, scene::model::OutputFormat,
};

/// Crop the transparent border off an encoded image and re-encode it.
///
/// Independent of the generation pipeline; typically applied to its output.
pub fn trim_output(
    engine: &dyn RasterEngine,
    bytes: &[u8],
    format: OutputFormat,
) -> LayercardResult<Vec<u8>> {
    let decoded = engine.decode(bytes)?;
    let (width, height) = decoded.image.dimensions();
    tracing::info!(width, height, "trimming image");

    let trimmed = engine.trim(&decoded.image)?;
    let (width, height) = trimmed.dimensions();
    tracing::info!(width, height, "trimmed dimensions");

    engine.encode(&trimmed, format)
}
