use std::sync::Arc;

use image::RgbaImage;

use crate::{
    assets::{
        fetch::{AssetFetcher, FetchOpts, LocatorFetcher},
        loader::AssetLoader,
    },
    elements::{ElementContext, Placed, image::process_image, text::process_text},
    foundation::core::Canvas,
    foundation::error::LayercardResult,
    layout::registry::Registry,
    raster::{
        RasterEngine,
        engine::{EngineOpts, ImageEngine},
    },
    render::{canvas::build_canvas, instruction::Instruction, trim::trim_output},
    scene::model::{Element, ElementKind, OutputFormat, RenderConfig},
};

/// Output of the layout pass, ready to flatten.
#[derive(Clone, Debug)]
pub struct RenderPlan {
    /// Base surface from the canvas initializer.
    pub canvas: RgbaImage,
    /// Geometry of every placed element, in declared order.
    pub registry: Registry,
    /// One instruction per placed element, in declared order.
    pub instructions: Vec<Instruction>,
}

/// Turns a [`RenderConfig`] into an encoded image.
///
/// A generator holds no per-run state and can serve concurrent runs; each call owns its
/// registry and instruction list.
#[derive(Clone)]
pub struct Generator {
    fetcher: Arc<dyn AssetFetcher>,
    engine: Arc<dyn RasterEngine>,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator").finish_non_exhaustive()
    }
}

impl Generator {
    pub fn new(fetcher: Arc<dyn AssetFetcher>, engine: Arc<dyn RasterEngine>) -> Self {
        Self { fetcher, engine }
    }

    /// Generator backed by [`LocatorFetcher`] and [`ImageEngine`].
    ///
    /// Object storage reads through [`LocatorFetcher`] are unsigned, so only public objects or
    /// an endpoint without auth are reachable. Use [`Generator::new`] with a signing
    /// [`AssetFetcher`] for private buckets.
    pub fn with_defaults(fetch: FetchOpts, engine: EngineOpts) -> Self {
        Self::new(
            Arc::new(LocatorFetcher::new(fetch)),
            Arc::new(ImageEngine::new(engine)),
        )
    }

    pub fn engine(&self) -> &dyn RasterEngine {
        self.engine.as_ref()
    }

    /// Build the canvas and place every element in declared order.
    ///
    /// Element failures are logged and the element is skipped: it emits no instruction and
    /// writes no registry entry. Only canvas construction can fail the plan.
    #[tracing::instrument(
        skip_all,
        fields(
            width = config.image_width,
            height = config.image_height,
            elements = config.elements.len()
        )
    )]
    pub fn plan(&self, config: &RenderConfig) -> LayercardResult<RenderPlan> {
        config.validate()?;
        let canvas = config.canvas()?;
        let base = build_canvas(config, canvas, self.fetcher.as_ref(), self.engine.as_ref())?;

        let loader = if config.prefetch {
            let locators = config.elements.iter().filter_map(|el| match &el.kind {
                ElementKind::Image(img) => img.src.as_deref().filter(|s| !s.trim().is_empty()),
                ElementKind::Text(_) | ElementKind::Invalid(_) | ElementKind::Unsupported => None,
            });
            AssetLoader::prefetch(self.fetcher.as_ref(), locators)
        } else {
            AssetLoader::new(self.fetcher.as_ref())
        };

        let (registry, instructions) = config.elements.iter().fold(
            (Registry::new(), Vec::with_capacity(config.elements.len())),
            |(mut registry, mut instructions), element| {
                if let Some(placed) = self.step(element, canvas, &registry, &loader) {
                    if !registry.insert(&element.id, placed.geometry) {
                        tracing::warn!(
                            element_id = %element.id,
                            "duplicate element id; keeping the first recorded geometry"
                        );
                    }
                    instructions.push(placed.instruction);
                }
                (registry, instructions)
            },
        );

        tracing::info!(
            placed = instructions.len(),
            skipped = config.elements.len() - instructions.len(),
            "layout pass done"
        );

        Ok(RenderPlan {
            canvas: base,
            registry,
            instructions,
        })
    }

    fn step(
        &self,
        element: &Element,
        canvas: Canvas,
        registry: &Registry,
        loader: &AssetLoader<'_>,
    ) -> Option<Placed> {
        let ctx = ElementContext {
            canvas,
            registry,
            loader,
            engine: self.engine.as_ref(),
        };

        match &element.kind {
            ElementKind::Image(img) => {
                match process_image(&element.id, &element.placement, img, &ctx) {
                    Ok(placed) => Some(placed),
                    Err(e) => {
                        tracing::error!(
                            element_id = %element.id,
                            error = %e,
                            "skipping image element"
                        );
                        None
                    }
                }
            }
            ElementKind::Text(text) => process_text(&element.id, &element.placement, text, &ctx),
            ElementKind::Invalid(reason) => {
                tracing::error!(
                    element_id = %element.id,
                    error = %reason,
                    "skipping malformed element"
                );
                None
            }
            ElementKind::Unsupported => {
                tracing::warn!(element_id = %element.id, "skipping element of unsupported type");
                None
            }
        }
    }

    /// Generate the final encoded image.
    ///
    /// Pipeline:
    /// 1. [`Generator::plan`]: canvas, then every element in declared order
    /// 2. [`RasterEngine::flatten`]: all instructions onto the canvas, later ones on top
    /// 3. [`RasterEngine::encode`] in `config.format`
    ///
    /// Fails only if the canvas cannot be built or the flatten/encode step fails.
    #[tracing::instrument(skip_all, fields(format = ?config.format))]
    pub fn generate(&self, config: &RenderConfig) -> LayercardResult<Vec<u8>> {
        let plan = self.plan(config)?;
        tracing::info!(instructions = plan.instructions.len(), "flattening");
        let flattened = self.engine.flatten(plan.canvas, &plan.instructions)?;
        self.engine.encode(&flattened, config.format)
    }

    /// Crop the transparent border off an encoded image. See [`trim_output`].
    pub fn trim(&self, bytes: &[u8], format: OutputFormat) -> LayercardResult<Vec<u8>> {
        trim_output(self.engine.as_ref(), bytes, format)
    }
}
