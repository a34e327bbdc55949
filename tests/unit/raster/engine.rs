use crate::render::instruction::{Markup, TextAnchor, TextBaseline};

use super::*;

fn engine() -> ImageEngine {
    ImageEngine::new(EngineOpts {
        font_dirs: vec![],
        system_fonts: false,
    })
}

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, image::Rgba(rgba))
}

#[test]
fn encode_decode_round_trip_reports_dimensions() {
    let e = engine();
    let img = solid(7, 5, [1, 2, 3, 255]);
    let png = e.encode(&img, OutputFormat::Png).unwrap();
    let decoded = e.decode(&png).unwrap();
    assert_eq!(decoded.size(), Size::new(7, 5));
    assert_eq!(decoded.format, Some(image::ImageFormat::Png));

    let jpeg = e.encode(&img, OutputFormat::Jpeg).unwrap();
    assert_eq!(e.decode(&jpeg).unwrap().size(), Size::new(7, 5));
}

#[test]
fn decode_garbage_is_raster_error() {
    assert!(matches!(
        engine().decode(b"definitely not an image"),
        Err(LayercardError::RasterEngine(_))
    ));
}

#[test]
fn resize_inside_and_cover() {
    let e = engine();
    let img = solid(200, 100, [0, 0, 255, 255]);

    let inside = e.resize(&img, 100, 100, FitMode::Inside).unwrap();
    assert_eq!(inside.dimensions(), (100, 50));

    let cover = e.resize(&img, 100, 100, FitMode::Cover).unwrap();
    assert_eq!(cover.dimensions(), (100, 100));

    assert!(e.resize(&img, 0, 10, FitMode::Inside).is_err());
}

#[test]
fn rotation_expands_and_fills_transparent() {
    let e = engine();
    let img = solid(100, 50, [255, 0, 0, 255]);

    let quarter = e.rotate(&img, 90.0, Rgba8::TRANSPARENT).unwrap();
    assert_eq!(quarter.dimensions(), (50, 100));

    let tilted = e.rotate(&img, 45.0, Rgba8::TRANSPARENT).unwrap();
    let expected = rotated_size(Size::new(100, 50), 45.0);
    assert_eq!(tilted.dimensions(), (expected.width, expected.height));
    assert!(tilted.width() > 100);
    assert_eq!(tilted.get_pixel(0, 0).0[3], 0);
    let (cx, cy) = (tilted.width() / 2, tilted.height() / 2);
    assert_eq!(tilted.get_pixel(cx, cy).0, [255, 0, 0, 255]);
}

#[test]
fn flatten_draws_in_order_and_clips_off_canvas() {
    let e = engine();
    let base = solid(10, 10, [255, 255, 255, 255]);
    let instructions = vec![
        Instruction::Raster {
            image: solid(4, 4, [255, 0, 0, 255]),
            left: 0,
            top: 0,
        },
        Instruction::Raster {
            image: solid(4, 4, [0, 255, 0, 255]),
            left: 2,
            top: 2,
        },
        Instruction::Raster {
            image: solid(4, 4, [0, 0, 255, 255]),
            left: -2,
            top: 8,
        },
    ];
    let out = e.flatten(base, &instructions).unwrap();
    assert_eq!(out.dimensions(), (10, 10));
    assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(out.get_pixel(3, 3).0, [0, 255, 0, 255]);
    assert_eq!(out.get_pixel(1, 9).0, [0, 0, 255, 255]);
    assert_eq!(out.get_pixel(9, 0).0, [255, 255, 255, 255]);
}

#[test]
fn flatten_renders_markup_between_raster_layers() {
    let e = engine();
    let base = solid(20, 20, [255, 255, 255, 255]);
    let markup = Markup {
        fragment: r##"<rect x="0" y="0" width="10" height="10" fill="#000000"/>"##.to_owned(),
        x: 0,
        y: 0,
        anchor: TextAnchor::Start,
        baseline: TextBaseline::Auto,
    };
    let instructions = vec![
        Instruction::Markup(markup.clone()),
        Instruction::Raster {
            image: solid(5, 5, [255, 0, 0, 255]),
            left: 0,
            top: 0,
        },
    ];
    let out = e.flatten(base, &instructions).unwrap();
    assert_eq!(out.get_pixel(2, 2).0, [255, 0, 0, 255]);
    assert_eq!(out.get_pixel(7, 7).0, [0, 0, 0, 255]);
    assert_eq!(out.get_pixel(15, 15).0, [255, 255, 255, 255]);

    let broken = Markup {
        fragment: "<text".to_owned(),
        ..markup
    };
    assert!(e
        .flatten(solid(4, 4, [0, 0, 0, 255]), &[Instruction::Markup(broken)])
        .is_err());
}

#[test]
fn trim_crops_transparent_border() {
    let e = engine();
    let mut img = solid(10, 8, [0, 0, 0, 0]);
    img.put_pixel(2, 3, image::Rgba([9, 9, 9, 255]));
    img.put_pixel(6, 4, image::Rgba([9, 9, 9, 10]));
    let trimmed = e.trim(&img).unwrap();
    assert_eq!(trimmed.dimensions(), (5, 2));

    assert!(e.trim(&solid(3, 3, [0, 0, 0, 0])).is_err());
}
