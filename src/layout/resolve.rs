use crate::{
    foundation::core::{Canvas, Size, round_half_up},
    layout::registry::Registry,
    scene::model::{Origin, Placement},
};

/// Which rule produced an element's base point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaseKind {
    /// `origin: "center"`.
    CanvasCenter,
    /// `origin` named an element already present in the registry.
    Element,
    /// No origin, or an origin id that is not (yet) in the registry.
    CanvasOrigin,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BasePoint {
    pub x: f64,
    pub y: f64,
    pub kind: BaseKind,
}

/// Base point an element's offsets are measured from.
///
/// A referenced element contributes its top-left corner, not its center. Forward, self and
/// cyclic references are never in the registry at lookup time and fall back to `(0, 0)`.
pub fn base_point(origin: Option<&Origin>, canvas: Canvas, registry: &Registry) -> BasePoint {
    match origin {
        Some(Origin::Center) => {
            let (x, y) = canvas.center();
            BasePoint {
                x,
                y,
                kind: BaseKind::CanvasCenter,
            }
        }
        Some(Origin::Element(id)) => match registry.get(id) {
            Some(g) => BasePoint {
                x: f64::from(g.left),
                y: f64::from(g.top),
                kind: BaseKind::Element,
            },
            None => canvas_origin(),
        },
        None => canvas_origin(),
    }
}

fn canvas_origin() -> BasePoint {
    BasePoint {
        x: 0.0,
        y: 0.0,
        kind: BaseKind::CanvasOrigin,
    }
}

/// Absolute top-left position of an element with rendered size `rendered`.
///
/// An explicit `null` offset under `origin: "center"` centers the rendered box on the base point.
/// No clamping: positions may fall partly or fully off-canvas.
pub fn resolve_position(
    placement: &Placement,
    canvas: Canvas,
    registry: &Registry,
    rendered: Size,
) -> (i32, i32) {
    let base = base_point(placement.origin.as_ref(), canvas, registry);
    let centered = base.kind == BaseKind::CanvasCenter;

    let offset_x = match placement.x.value() {
        Some(x) => x,
        None if centered && placement.x.is_null() => -f64::from(rendered.width) / 2.0,
        None => 0.0,
    };
    let offset_y = match placement.y.value() {
        Some(y) => y,
        None if centered && placement.y.is_null() => -f64::from(rendered.height) / 2.0,
        None => 0.0,
    };

    (
        round_half_up(base.x + offset_x),
        round_half_up(base.y + offset_y),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/layout/resolve.rs"]
mod tests;
