//! Layercard composes templated graphics from a JSON list of image and text elements.
//!
//! A run is a single pass over a [`RenderConfig`]:
//!
//! - Build the base canvas from a background asset or a solid color
//! - Place each element in declared order, optionally relative to an earlier one
//! - Flatten every layer onto the canvas and encode the result
//!
//! [`Generator`] drives the pass. Asset bytes come from an [`AssetFetcher`] and all pixel work
//! goes through a [`RasterEngine`], so both can be swapped out.
#![forbid(unsafe_code)]

mod assets;
mod elements;
mod foundation;
mod layout;
mod raster;
mod render;
mod scene;

pub use crate::foundation::core::{Canvas, Geometry, Rgba8, Size, round_half_up};
pub use crate::foundation::error::{LayercardError, LayercardResult};

pub use crate::assets::color::ColorDef;
pub use crate::assets::fetch::{AssetFetcher, FetchOpts, LocatorFetcher, MemoryFetcher};
pub use crate::assets::loader::AssetLoader;
pub use crate::assets::locator::Locator;
pub use crate::elements::image::target_size;
pub use crate::elements::text::{arc_path, escape_text, text_alignment};
pub use crate::layout::registry::Registry;
pub use crate::layout::resolve::{BaseKind, BasePoint, base_point, resolve_position};
pub use crate::raster::engine::{EngineOpts, ImageEngine, rotated_size};
pub use crate::raster::{DecodedImage, FitMode, RasterEngine, fit_cover, fit_inside};
pub use crate::render::canvas::build_canvas;
pub use crate::render::instruction::{Instruction, Markup, TextAnchor, TextBaseline};
pub use crate::render::pipeline::{Generator, RenderPlan};
pub use crate::render::trim::trim_output;
pub use crate::scene::model::{
    CssValue, Element, ElementKind, ImageElement, Origin, OutputFormat, Placement, RenderConfig,
    Setting, TextCurve, TextElement, TextShadow,
};
