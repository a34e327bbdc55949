use crate::foundation::core::Rgba8;
use serde::{Deserialize, Serialize};

/// Background color as written in run configuration.
///
/// Channels are 0..=255, `alpha` is a 0..=1 fraction (the same convention raster tools use for
/// `{ r, g, b, alpha }` objects).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorDef {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub alpha: f64,
}

impl ColorDef {
    pub fn rgba(r: f64, g: f64, b: f64, alpha: f64) -> Self {
        Self { r, g, b, alpha }
    }

    pub fn to_rgba8(self) -> Rgba8 {
        fn channel(x: f64) -> u8 {
            x.clamp(0.0, 255.0).round() as u8
        }

        Rgba8 {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: (self.alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }
}

impl Default for ColorDef {
    fn default() -> Self {
        Self::rgba(255.0, 255.0, 255.0, 1.0)
    }
}

impl<'de> Deserialize<'de> for ColorDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one", alias = "a")]
                alpha: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, alpha } => Ok(Self::rgba(r, g, b, alpha)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgba(*r, *g, *b, 1.0)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,alpha])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<ColorDef, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }

    let (r, g, b, a) = match s.len() {
        6 => (hex_byte(&s[0..2])?, hex_byte(&s[2..4])?, hex_byte(&s[4..6])?, 255),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
        }
    };

    Ok(ColorDef::rgba(
        f64::from(r),
        f64::from(g),
        f64::from(b),
        f64::from(a) / 255.0,
    ))
}
