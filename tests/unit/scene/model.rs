use serde_json::json;

use super::*;

fn element(v: serde_json::Value) -> Element {
    serde_json::from_value(v).unwrap()
}

#[test]
fn offsets_keep_absent_null_and_value_apart() {
    let el = element(json!({"id": "a", "type": "image", "src": "a.png", "width": 10, "x": null}));
    assert_eq!(el.placement.x, Setting::Null);
    assert_eq!(el.placement.y, Setting::Absent);

    let el = element(json!({"id": "a", "type": "image", "src": "a.png", "width": 10, "x": -80, "y": 12.5}));
    assert_eq!(el.placement.x, Setting::Value(-80.0));
    assert_eq!(el.placement.y.value(), Some(12.5));
}

#[test]
fn origin_variants() {
    let el = element(json!({"id": "a", "type": "text", "text": "t", "origin": "center"}));
    assert_eq!(el.placement.origin, Some(Origin::Center));

    let el = element(json!({"id": "b", "type": "text", "text": "t", "origin": "avatar"}));
    assert_eq!(el.placement.origin, Some(Origin::Element("avatar".to_owned())));

    let el = element(json!({"id": "c", "type": "text", "text": "t", "origin": null}));
    assert_eq!(el.placement.origin, None);

    let el = element(json!({"id": "d", "type": "text", "text": "t", "origin": ""}));
    assert_eq!(el.placement.origin, None);
}

#[test]
fn image_payload_fields() {
    let el = element(json!({
        "id": "logo", "type": "image", "src": "assets/logo.png",
        "width": 300, "height": null, "rotation": -10, "origin": null, "x": 480, "y": 1252
    }));
    let ElementKind::Image(img) = el.kind else {
        panic!("expected image element");
    };
    assert_eq!(img.src.as_deref(), Some("assets/logo.png"));
    assert_eq!(img.width, Some(300.0));
    assert_eq!(img.height, None);
    assert_eq!(img.rotation, Some(-10.0));
}

#[test]
fn text_payload_accepts_string_or_number_font_values() {
    let el = element(json!({
        "id": "title", "type": "text", "text": "Sam",
        "fontFamily": "sans-serif", "fontSize": "180px", "fontWeight": 800,
        "curve": {"radius": 150}
    }));
    let ElementKind::Text(t) = el.kind else {
        panic!("expected text element");
    };
    assert_eq!(t.font_size.unwrap().to_string(), "180px");
    assert_eq!(t.font_weight.unwrap().to_string(), "800");
    let curve = t.curve.unwrap();
    assert_eq!(curve.start_angle, -90.0);
    assert_eq!(curve.end_angle, 90.0);
}

#[test]
fn unknown_type_is_unsupported_not_an_error() {
    let el = element(json!({"id": "v", "type": "video", "src": "clip.mp4"}));
    assert_eq!(el.kind, ElementKind::Unsupported);
}

#[test]
fn malformed_element_is_kept_as_invalid() {
    let cfg = RenderConfig::from_json(
        &json!({
            "elements": [
                {"id": "bad", "type": "image", "src": "a.png", "width": "410"},
                {"id": "shifted", "type": "text", "text": "t", "x": "left"},
                {"id": "ok", "type": "image", "src": "a.png", "width": 410.5}
            ]
        })
        .to_string(),
    )
    .unwrap();

    assert_eq!(cfg.elements.len(), 3);
    assert_eq!(cfg.elements[0].id, "bad");
    assert!(matches!(cfg.elements[0].kind, ElementKind::Invalid(_)));
    assert_eq!(cfg.elements[1].id, "shifted");
    assert!(matches!(cfg.elements[1].kind, ElementKind::Invalid(_)));
    let ElementKind::Image(img) = &cfg.elements[2].kind else {
        panic!("expected image element");
    };
    assert_eq!(img.width, Some(410.5));
    cfg.validate().unwrap();
}

#[test]
fn element_without_id_does_not_fail_validation_when_invalid() {
    let cfg = RenderConfig::from_json(r#"{"elements": [42]}"#).unwrap();
    assert!(matches!(cfg.elements[0].kind, ElementKind::Invalid(_)));
    cfg.validate().unwrap();

    let cfg = RenderConfig::from_json(r#"{"elements": [{"id": "", "type": "text"}]}"#).unwrap();
    assert!(matches!(cfg.validate(), Err(LayercardError::Validation(_))));
}

#[test]
fn run_config_defaults() {
    let cfg = RenderConfig::from_json(r#"{"elements": []}"#).unwrap();
    assert_eq!(cfg.image_width, 800);
    assert_eq!(cfg.image_height, 1422);
    assert_eq!(cfg.format, OutputFormat::Png);
    assert!(!cfg.prefetch);
    assert_eq!(cfg.default_background.to_rgba8(), crate::Rgba8::WHITE);
    cfg.validate().unwrap();
}

#[test]
fn run_config_validation() {
    let cfg = RenderConfig::from_json(r#"{"imageWidth": 0, "imageHeight": 10}"#).unwrap();
    assert!(matches!(cfg.validate(), Err(LayercardError::Validation(_))));

    let cfg = RenderConfig::from_json(r#"{"background": "  "}"#).unwrap();
    assert!(cfg.validate().is_err());

    assert!(matches!(
        RenderConfig::from_json("{not json"),
        Err(LayercardError::Serde(_))
    ));
}
