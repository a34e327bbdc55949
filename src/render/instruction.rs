use image::RgbaImage;

/// Horizontal text anchor written into a markup fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
}

impl TextAnchor {
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
        }
    }
}

/// Vertical text baseline written into a markup fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    Auto,
    Middle,
    Hanging,
}

impl TextBaseline {
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Middle => "middle",
            Self::Hanging => "hanging",
        }
    }
}

/// Vector overlay produced by a text element.
#[derive(Clone, Debug, PartialEq)]
pub struct Markup {
    /// SVG fragment, rendered inside a canvas-sized `<svg>` root.
    pub fragment: String,
    pub x: i32,
    pub y: i32,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
}

/// One unit of work for the final flatten, drawn in list order (later on top).
#[derive(Clone, Debug)]
pub enum Instruction {
    /// Composite a rendered element buffer with its top-left at `(left, top)`.
    Raster {
        image: RgbaImage,
        left: i32,
        top: i32,
    },
    Markup(Markup),
}

impl Instruction {
    pub fn as_markup(&self) -> Option<&Markup> {
        match self {
            Self::Markup(m) => Some(m),
            Self::Raster { .. } => None,
        }
    }
}
