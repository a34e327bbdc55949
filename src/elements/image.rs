use crate::{
    elements::{ElementContext, Placed},
    foundation::core::{Geometry, Rgba8, Size, round_half_up},
    foundation::error::{LayercardError, LayercardResult},
    layout::resolve::resolve_position,
    raster::FitMode,
    render::instruction::Instruction,
    scene::model::{ImageElement, Placement},
};

/// Target box for an image with at most one unset dimension.
///
/// The unset side is inferred from the source aspect ratio: `round(orig * set / orig_other)`.
pub fn target_size(
    original: Size,
    width: Option<u32>,
    height: Option<u32>,
) -> LayercardResult<Size> {
    let scaled = |orig: u32, set: u32, orig_other: u32| -> u32 {
        if orig_other == 0 {
            return orig.max(1);
        }
        let v = f64::from(orig) * (f64::from(set) / f64::from(orig_other));
        round_half_up(v).max(1) as u32
    };

    match (width, height) {
        (Some(w), Some(h)) => Ok(Size::new(w, h)),
        (Some(w), None) => Ok(Size::new(w, scaled(original.height, w, original.width))),
        (None, Some(h)) => Ok(Size::new(scaled(original.width, h, original.height), h)),
        (None, None) => Err(LayercardError::element_config(
            "image needs at least one of 'width'/'height'",
        )),
    }
}

/// Requested dimension in whole pixels. Fractions round half up; the result must be at least 1.
pub fn pixel_dimension(id: &str, name: &str, value: Option<f64>) -> LayercardResult<Option<u32>> {
    let Some(v) = value else {
        return Ok(None);
    };
    if !v.is_finite() {
        return Err(LayercardError::element_config(format!(
            "image '{id}': '{name}' must be a finite number (got {v})"
        )));
    }
    let px = round_half_up(v);
    if px < 1 {
        return Err(LayercardError::element_config(format!(
            "image '{id}': '{name}' must be > 0 (got {v})"
        )));
    }
    Ok(Some(px as u32))
}

/// Load, resize, optionally rotate and place one image element.
///
/// Layout uses the final rendered dimensions (after fit and rotation), not the requested ones.
pub fn process_image(
    id: &str,
    placement: &Placement,
    element: &ImageElement,
    ctx: &ElementContext<'_>,
) -> LayercardResult<Placed> {
    let src = element
        .src
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| LayercardError::element_config(format!("image '{id}': missing 'src'")))?;
    let width = pixel_dimension(id, "width", element.width)?;
    let height = pixel_dimension(id, "height", element.height)?;
    if width.is_none() && height.is_none() {
        return Err(LayercardError::element_config(format!(
            "image '{id}': missing both 'width' and 'height'"
        )));
    }

    tracing::debug!(element_id = id, src, "processing image element");
    let bytes = ctx.loader.load(src)?;
    let decoded = ctx.engine.decode(&bytes)?;
    let target = target_size(decoded.size(), width, height)?;
    let mut image = ctx
        .engine
        .resize(&decoded.image, target.width, target.height, FitMode::Inside)?;

    if let Some(degrees) = element.rotation.filter(|d| d.is_finite() && *d != 0.0) {
        image = ctx.engine.rotate(&image, degrees, Rgba8::TRANSPARENT)?;
    }

    let (width, height) = image.dimensions();
    let (left, top) = resolve_position(
        placement,
        ctx.canvas,
        ctx.registry,
        Size::new(width, height),
    );
    tracing::debug!(element_id = id, left, top, width, height, "image placed");

    Ok(Placed {
        instruction: Instruction::Raster { image, left, top },
        geometry: Geometry {
            left,
            top,
            width,
            height,
        },
    })
}

#[cfg(test)]
#[path = "../../tests/unit/elements/image.rs"]
mod tests;
