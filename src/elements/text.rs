use std::fmt::Write as _;

use crate::{
    elements::{ElementContext, Placed},
    foundation::core::{Geometry, Size},
    layout::resolve::{BaseKind, base_point, resolve_position},
    render::instruction::{Instruction, Markup, TextAnchor, TextBaseline},
    scene::model::{Placement, TextCurve, TextElement, TextShadow},
};

const DEFAULT_FONT_FAMILY: &str = "Arial";
const DEFAULT_FONT_SIZE: &str = "30px";
const DEFAULT_FONT_WEIGHT: &str = "normal";
const DEFAULT_FONT_STYLE: &str = "normal";
const DEFAULT_COLOR: &str = "#000000";

/// Anchor and baseline for a text element.
///
/// Under `origin: "center"` an explicit `null` offset centers on that axis. Text hangs from the
/// canvas origin when no origin resolves, and uses the font's own baseline when anchored to
/// another element. Curved text always centers on its arc center.
pub fn text_alignment(
    placement: &Placement,
    base: BaseKind,
    curved: bool,
) -> (TextAnchor, TextBaseline) {
    if curved {
        return (TextAnchor::Middle, TextBaseline::Middle);
    }
    match base {
        BaseKind::CanvasCenter => (
            if placement.x.is_null() {
                TextAnchor::Middle
            } else {
                TextAnchor::Start
            },
            if placement.y.is_null() {
                TextBaseline::Middle
            } else {
                TextBaseline::Auto
            },
        ),
        BaseKind::Element => (TextAnchor::Start, TextBaseline::Auto),
        BaseKind::CanvasOrigin => (TextAnchor::Start, TextBaseline::Hanging),
    }
}

/// Place one text element and emit its markup fragment.
///
/// Returns `None` (after a warning) when the element has no text. Text is not measured: the
/// registry entry is the anchor point with a zero-sized box.
pub fn process_text(
    id: &str,
    placement: &Placement,
    element: &TextElement,
    ctx: &ElementContext<'_>,
) -> Option<Placed> {
    let Some(text) = element.text.as_deref().filter(|t| !t.is_empty()) else {
        tracing::warn!(element_id = id, "skipping text element: missing 'text'");
        return None;
    };

    let base = base_point(placement.origin.as_ref(), ctx.canvas, ctx.registry);
    let (anchor, baseline) = text_alignment(placement, base.kind, element.curve.is_some());
    // Zero size: text centering is expressed through anchor/baseline, not a numeric offset.
    let (x, y) = resolve_position(placement, ctx.canvas, ctx.registry, Size::ZERO);

    let fragment = text_fragment(id, element, text, x, y, anchor, baseline);
    tracing::debug!(
        element_id = id,
        x,
        y,
        anchor = anchor.as_svg(),
        baseline = baseline.as_svg(),
        "text placed"
    );

    Some(Placed {
        instruction: Instruction::Markup(Markup {
            fragment,
            x,
            y,
            anchor,
            baseline,
        }),
        geometry: Geometry {
            left: x,
            top: y,
            width: 0,
            height: 0,
        },
    })
}

fn text_fragment(
    id: &str,
    element: &TextElement,
    text: &str,
    x: i32,
    y: i32,
    anchor: TextAnchor,
    baseline: TextBaseline,
) -> String {
    let slug = slug(id);
    let font_size = element
        .font_size
        .as_ref()
        .map_or_else(|| DEFAULT_FONT_SIZE.to_owned(), ToString::to_string);
    let font_weight = element
        .font_weight
        .as_ref()
        .map_or_else(|| DEFAULT_FONT_WEIGHT.to_owned(), ToString::to_string);

    let mut defs = String::new();
    let mut attrs = String::new();
    let mut attr = |name: &str, value: &str| {
        let _ = write!(attrs, r#" {name}="{}""#, escape_attr(value));
    };

    if element.curve.is_none() {
        attr("x", &x.to_string());
        attr("y", &y.to_string());
    }
    attr(
        "font-family",
        element.font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY),
    );
    attr("font-size", &font_size);
    attr("font-weight", &font_weight);
    attr(
        "font-style",
        element.font_style.as_deref().unwrap_or(DEFAULT_FONT_STYLE),
    );
    attr("fill", element.color.as_deref().unwrap_or(DEFAULT_COLOR));
    attr("text-anchor", anchor.as_svg());
    attr("dominant-baseline", baseline.as_svg());

    if let Some(stroke) = element.stroke_color.as_deref() {
        let width = element
            .stroke_width
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(1.0);
        attr("stroke", stroke);
        attr("stroke-width", &width.to_string());
        attr("paint-order", "stroke");
    }

    if let Some(shadow) = &element.shadow {
        let filter_id = format!("lc-{slug}-shadow");
        defs.push_str(&shadow_filter(&filter_id, shadow));
        attr("filter", &format!("url(#{filter_id})"));
    }

    if let Some(rotation) = element.rotation.filter(|r| r.is_finite() && *r != 0.0) {
        attr("transform", &format!("rotate({rotation}, {x}, {y})"));
    }

    let body = match &element.curve {
        Some(curve) => {
            let path_id = format!("lc-{slug}-curve");
            let _ = write!(
                defs,
                r#"<path id="{path_id}" d="{}" fill="none"/>"#,
                arc_path(curve, f64::from(x), f64::from(y))
            );
            format!(
                r##"<textPath xlink:href="#{path_id}" startOffset="50%">{}</textPath>"##,
                escape_text(text)
            )
        }
        None => escape_text(text),
    };

    let mut out = String::new();
    if !defs.is_empty() {
        let _ = write!(out, "<defs>{defs}</defs>");
    }
    let _ = write!(out, "<text{attrs}>{body}</text>");
    out
}

fn shadow_filter(filter_id: &str, shadow: &TextShadow) -> String {
    format!(
        r#"<filter id="{filter_id}" x="-50%" y="-50%" width="200%" height="200%"><feDropShadow dx="{}" dy="{}" stdDeviation="{}" flood-color="{}"/></filter>"#,
        shadow.offset_x,
        shadow.offset_y,
        shadow.blur.max(0.0),
        escape_attr(&shadow.color),
    )
}

/// SVG path for an arc of `curve.radius` around `(cx, cy)`.
///
/// Angles are degrees clockwise from 12 o'clock. Sweeps of a full turn or more are shortened
/// slightly so the arc stays drawable.
pub fn arc_path(curve: &TextCurve, cx: f64, cy: f64) -> String {
    let r = curve.radius.abs();
    let mut sweep = curve.end_angle - curve.start_angle;
    if sweep.abs() >= 360.0 {
        sweep = 359.9 * sweep.signum();
    }
    let start = curve.start_angle;
    let end = start + sweep;
    let point = |deg: f64| {
        let rad = deg.to_radians();
        (cx + r * rad.sin(), cy - r * rad.cos())
    };
    let (sx, sy) = point(start);
    let (ex, ey) = point(end);
    let large_arc = u8::from(sweep.abs() > 180.0);
    let sweep_flag = u8::from(sweep >= 0.0);
    format!(
        "M {} {} A {r} {r} 0 {large_arc} {sweep_flag} {} {}",
        fmt_coord(sx),
        fmt_coord(sy),
        fmt_coord(ex),
        fmt_coord(ey)
    )
}

fn fmt_coord(v: f64) -> String {
    let v = (v * 1000.0).round() / 1000.0;
    // Avoid "-0".
    if v == 0.0 { "0".to_owned() } else { v.to_string() }
}

/// Escape text content so it cannot break out of the `<text>` element.
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

fn slug(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/elements/text.rs"]
mod tests;
