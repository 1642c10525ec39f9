use serde::Serialize;
use std::fmt;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` notation.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation towards `other`. `t` is clamped to `[0, 1]`.
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let channel = |a: u8, b: u8| {
            let v = a as f64 + (b as f64 - a as f64) * t;
            // Halves round up.
            (v + 0.5).floor().clamp(0.0, 255.0) as u8
        };
        Rgb::new(channel(self.r, other.r), channel(self.g, other.g), channel(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Fallback for missing values and degenerate scales (`#e2e8f0`).
pub const NEUTRAL: Rgb = Rgb::new(226, 232, 240);
/// Worst end of the diverging scale.
pub const RED: Rgb = Rgb::new(200, 29, 37);
/// The pivot color.
pub const YELLOW: Rgb = Rgb::new(241, 196, 83);
/// Best end of the diverging scale.
pub const GREEN: Rgb = Rgb::new(42, 157, 143);

/// A CSS color used as a card background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Fill {
    Rgb(Rgb),
    Hsl { hue: u32, saturation: u8, lightness: u8 },
    /// A color given verbatim by the asset registry.
    Css(String),
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fill::Rgb(rgb) => write!(f, "{rgb}"),
            Fill::Hsl { hue, saturation, lightness } => {
                write!(f, "hsl({hue} {saturation}% {lightness}%)")
            }
            Fill::Css(css) => f.write_str(css),
        }
    }
}

impl From<Fill> for String {
    fn from(fill: Fill) -> Self {
        fill.to_string()
    }
}

impl From<Rgb> for Fill {
    fn from(rgb: Rgb) -> Self {
        Fill::Rgb(rgb)
    }
}

/// A stable pastel color for a category label.
///
/// The hue is a base-31 polynomial hash of the label's UTF-16 code units,
/// wrapping at 32 bits, taken modulo 360.
pub fn class_color(label: &str) -> Fill {
    let hash = label
        .encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as u32));

    Fill::Hsl {
        hue: hash % 360,
        saturation: 55,
        lightness: 68,
    }
}
