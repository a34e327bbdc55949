use std::io::Cursor;

use crate::{
    assets::{fetch::MemoryFetcher, loader::AssetLoader},
    foundation::core::Canvas,
    layout::registry::Registry,
    raster::engine::{EngineOpts, ImageEngine},
    scene::model::{Origin, Setting},
};

use super::*;

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = ::image::RgbaImage::from_pixel(w, h, ::image::Rgba([200, 10, 10, 255]));
    let mut buf = Vec::new();
    ::image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ::image::ImageFormat::Png)
        .unwrap();
    buf
}

fn engine() -> ImageEngine {
    ImageEngine::new(EngineOpts {
        font_dirs: vec![],
        system_fonts: false,
    })
}

fn image_el(src: Option<&str>, width: Option<u32>, height: Option<u32>) -> ImageElement {
    ImageElement {
        src: src.map(str::to_owned),
        width: width.map(f64::from),
        height: height.map(f64::from),
        rotation: None,
    }
}

#[test]
fn target_size_infers_missing_dimension() {
    let orig = Size::new(1000, 800);
    assert_eq!(
        target_size(orig, Some(410), None).unwrap(),
        Size::new(410, 328)
    );
    assert_eq!(
        target_size(orig, None, Some(100)).unwrap(),
        Size::new(125, 100)
    );
    assert_eq!(
        target_size(orig, Some(10), Some(20)).unwrap(),
        Size::new(10, 20)
    );
    assert!(matches!(
        target_size(orig, None, None),
        Err(LayercardError::ElementConfig(_))
    ));
}

#[test]
fn inferred_dimension_keeps_aspect_within_a_pixel() {
    let orig = Size::new(333, 127);
    let t = target_size(orig, Some(410), None).unwrap();
    let exact = 127.0 * 410.0 / 333.0;
    assert!((f64::from(t.height) - exact).abs() <= 1.0);
}

#[test]
fn missing_src_or_dimensions_is_element_config_error() {
    let fetcher = MemoryFetcher::new();
    let loader = AssetLoader::new(&fetcher);
    let engine = engine();
    let registry = Registry::new();
    let ctx = ElementContext {
        canvas: Canvas::new(100, 100).unwrap(),
        registry: &registry,
        loader: &loader,
        engine: &engine,
    };
    let p = Placement::default();

    let err = process_image("a", &p, &image_el(None, Some(10), None), &ctx).unwrap_err();
    assert!(matches!(err, LayercardError::ElementConfig(_)));

    let err = process_image("a", &p, &image_el(Some("x.png"), None, None), &ctx).unwrap_err();
    assert!(matches!(err, LayercardError::ElementConfig(_)));
}

#[test]
fn pixel_dimension_rounds_fractions_and_rejects_non_positive() {
    assert_eq!(pixel_dimension("a", "width", None).unwrap(), None);
    assert_eq!(pixel_dimension("a", "width", Some(410.0)).unwrap(), Some(410));
    assert_eq!(pixel_dimension("a", "width", Some(410.5)).unwrap(), Some(411));
    assert_eq!(pixel_dimension("a", "width", Some(0.6)).unwrap(), Some(1));
    for bad in [0.0, 0.4, -5.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            pixel_dimension("a", "width", Some(bad)),
            Err(LayercardError::ElementConfig(_))
        ));
    }
}

#[test]
fn negative_width_is_element_config_error() {
    let fetcher = MemoryFetcher::new().with("a.png", png(20, 10));
    let loader = AssetLoader::new(&fetcher);
    let engine = engine();
    let registry = Registry::new();
    let ctx = ElementContext {
        canvas: Canvas::new(100, 100).unwrap(),
        registry: &registry,
        loader: &loader,
        engine: &engine,
    };
    let el = ImageElement {
        width: Some(-5.0),
        ..image_el(Some("a.png"), None, None)
    };
    let err = process_image("a", &Placement::default(), &el, &ctx).unwrap_err();
    assert!(matches!(err, LayercardError::ElementConfig(_)));
}

#[test]
fn fetch_failure_is_reported_as_asset_fetch() {
    let fetcher = MemoryFetcher::new();
    let loader = AssetLoader::new(&fetcher);
    let engine = engine();
    let registry = Registry::new();
    let ctx = ElementContext {
        canvas: Canvas::new(100, 100).unwrap(),
        registry: &registry,
        loader: &loader,
        engine: &engine,
    };
    let err = process_image(
        "a",
        &Placement::default(),
        &image_el(Some("broken.png"), Some(10), None),
        &ctx,
    )
    .unwrap_err();
    assert!(matches!(err, LayercardError::AssetFetch(_)));
}

#[test]
fn centered_image_uses_rendered_size() {
    let fetcher = MemoryFetcher::new().with("avatar.png", png(200, 100));
    let loader = AssetLoader::new(&fetcher);
    let engine = engine();
    let registry = Registry::new();
    let ctx = ElementContext {
        canvas: Canvas::new(800, 1422).unwrap(),
        registry: &registry,
        loader: &loader,
        engine: &engine,
    };
    let placement = Placement {
        x: Setting::Null,
        y: Setting::Value(-300.0),
        origin: Some(Origin::Center),
    };
    let placed = process_image(
        "avatar",
        &placement,
        &image_el(Some("avatar.png"), Some(410), None),
        &ctx,
    )
    .unwrap();

    assert_eq!(
        placed.geometry,
        Geometry {
            left: 400 - 205,
            top: 711 - 300,
            width: 410,
            height: 205,
        }
    );
    let Instruction::Raster { image, left, top } = placed.instruction else {
        panic!("expected raster instruction");
    };
    assert_eq!(image.dimensions(), (410, 205));
    assert_eq!((left, top), (195, 411));
}

#[test]
fn rotation_changes_rendered_box_used_for_layout() {
    let fetcher = MemoryFetcher::new().with("logo.png", png(100, 50));
    let loader = AssetLoader::new(&fetcher);
    let engine = engine();
    let registry = Registry::new();
    let ctx = ElementContext {
        canvas: Canvas::new(400, 400).unwrap(),
        registry: &registry,
        loader: &loader,
        engine: &engine,
    };
    let mut el = image_el(Some("logo.png"), Some(100), None);
    el.rotation = Some(90.0);
    let placement = Placement {
        x: Setting::Null,
        y: Setting::Null,
        origin: Some(Origin::Center),
    };
    let placed = process_image("logo", &placement, &el, &ctx).unwrap();
    assert_eq!(placed.geometry.width, 50);
    assert_eq!(placed.geometry.height, 100);
    assert_eq!((placed.geometry.left, placed.geometry.top), (175, 150));
}
