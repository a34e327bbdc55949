use serde::{Deserialize, Serialize};

use crate::assets::color::ColorDef;
use crate::foundation::core::Canvas;
use crate::foundation::error::{LayercardError, LayercardResult};

/// Three-state JSON field: key missing, explicit `null`, or a value.
///
/// Layout treats `null` as "derive from context" (centering under `origin: "center"`), while a
/// missing key means the plain default (`0`). Use with `#[serde(default)]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setting<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T: Copy> Setting<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Absent | Self::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Setting<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Self::Value(v),
            None => Self::Null,
        })
    }
}

impl<T: Serialize> Serialize for Setting<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Value(v) => serializer.serialize_some(v),
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}

/// Positioning origin of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Canvas center.
    Center,
    /// Top-left corner of a previously placed element.
    Element(String),
}

impl<'de> Deserialize<'de> for Origin {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(if s == "center" {
            Self::Center
        } else {
            Self::Element(s)
        })
    }
}

impl Serialize for Origin {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Center => serializer.serialize_str("center"),
            Self::Element(id) => serializer.serialize_str(id),
        }
    }
}

/// Declared placement shared by every element kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default)]
    pub x: Setting<f64>,
    #[serde(default)]
    pub y: Setting<f64>,
    #[serde(default, deserialize_with = "de_origin")]
    pub origin: Option<Origin>,
}

// An empty origin string behaves like a missing one.
fn de_origin<'de, D>(deserializer: D) -> Result<Option<Origin>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let origin = Option::<Origin>::deserialize(deserializer)?;
    Ok(match origin {
        Some(Origin::Element(id)) if id.is_empty() => None,
        other => other,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub id: String,
    #[serde(flatten)]
    pub placement: Placement,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr {
            id: String,
            #[serde(flatten)]
            placement: Placement,
            #[serde(flatten)]
            kind: ElementKind,
        }

        // Parse failures stay local to the element: it becomes `Invalid` and is skipped later.
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match Repr::deserialize(&value) {
            Ok(Repr {
                id,
                placement,
                kind,
            }) => Self {
                id,
                placement,
                kind,
            },
            Err(e) => Self {
                id: value
                    .get("id")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default()
                    .to_owned(),
                placement: Placement::default(),
                kind: ElementKind::Invalid(e.to_string()),
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Image(ImageElement),
    Text(TextElement),
    /// Element whose fields did not parse; holds the reason. Skipped by the pipeline.
    #[serde(skip)]
    Invalid(String),
    /// Any other `type` tag. Skipped by the pipeline.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    #[serde(default)]
    pub src: Option<String>,
    /// Missing and `null` both mean "infer from the other dimension". Range and rounding are
    /// checked when the element is processed.
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub rotation: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_size: Option<CssValue>,
    #[serde(default)]
    pub font_weight: Option<CssValue>,
    #[serde(default)]
    pub font_style: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub rotation: Option<f64>,
    #[serde(default)]
    pub stroke_color: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub shadow: Option<TextShadow>,
    #[serde(default)]
    pub curve: Option<TextCurve>,
}

/// Drop shadow behind text glyphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShadow {
    #[serde(default = "default_shadow_color")]
    pub color: String,
    #[serde(default = "default_shadow_offset")]
    pub offset_x: f64,
    #[serde(default = "default_shadow_offset")]
    pub offset_y: f64,
    #[serde(default)]
    pub blur: f64,
}

fn default_shadow_color() -> String {
    "#000000".to_owned()
}

fn default_shadow_offset() -> f64 {
    2.0
}

/// Circular arc the text is laid along. Angles are degrees clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextCurve {
    pub radius: f64,
    #[serde(default = "default_start_angle")]
    pub start_angle: f64,
    #[serde(default = "default_end_angle")]
    pub end_angle: f64,
}

fn default_start_angle() -> f64 {
    -90.0
}

fn default_end_angle() -> f64 {
    90.0
}

/// A CSS-ish value that may be written as a string (`"30px"`, `"bold"`) or a number (`800`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for CssValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Encoding of the final image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    Webp,
}

impl OutputFormat {
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}

/// One generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    #[serde(default = "default_image_height")]
    pub image_height: u32,
    /// Locator of a background image, resized with cover fit.
    #[serde(default)]
    pub background: Option<String>,
    /// Fill color of the blank canvas when no background is configured.
    #[serde(default)]
    pub default_background: ColorDef,
    #[serde(default)]
    pub format: OutputFormat,
    /// Fetch every image element's bytes in parallel before the layout pass.
    #[serde(default)]
    pub prefetch: bool,
    #[serde(default)]
    pub elements: Vec<Element>,
}

fn default_image_width() -> u32 {
    800
}

fn default_image_height() -> u32 {
    1422
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: default_image_width(),
            image_height: default_image_height(),
            background: None,
            default_background: ColorDef::default(),
            format: OutputFormat::default(),
            prefetch: false,
            elements: Vec::new(),
        }
    }
}

impl RenderConfig {
    pub fn from_json(json: &str) -> LayercardResult<Self> {
        serde_json::from_str(json).map_err(|e| LayercardError::serde(format!("run config: {e}")))
    }

    /// Validated canvas for this run.
    pub fn canvas(&self) -> LayercardResult<Canvas> {
        Canvas::new(self.image_width, self.image_height)
    }

    pub fn validate(&self) -> LayercardResult<()> {
        self.canvas()?;
        if let Some(bg) = &self.background
            && bg.trim().is_empty()
        {
            return Err(LayercardError::validation("background locator must be non-empty"));
        }
        for el in &self.elements {
            if el.id.is_empty() && !matches!(el.kind, ElementKind::Invalid(_)) {
                return Err(LayercardError::validation("element id must be non-empty"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
