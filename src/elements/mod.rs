//! Per-element processing. Each processor turns one declared element into a draw instruction and
//! the geometry later elements can anchor to.

use crate::{
    assets::loader::AssetLoader,
    foundation::core::{Canvas, Geometry},
    layout::registry::Registry,
    raster::RasterEngine,
    render::instruction::Instruction,
};

pub(crate) mod image;
pub(crate) mod text;

/// Everything a processor may read while handling one element.
pub struct ElementContext<'a> {
    pub canvas: Canvas,
    pub registry: &'a Registry,
    pub loader: &'a AssetLoader<'a>,
    pub engine: &'a dyn RasterEngine,
}

/// Successful output of a processor.
#[derive(Clone, Debug)]
pub struct Placed {
    pub instruction: Instruction,
    pub geometry: Geometry,
}
