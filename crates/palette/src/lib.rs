//! # Return Map Palette
//!
//! Colors for the cards of the map.
//!
//! - `ColorScale` maps a column value onto a diverging red-yellow-green scale
//!   anchored at a pivot, optionally quantized into bands.
//! - `class_color` derives a stable pastel hue from a category label.
//! - `card_fill` picks the background of a card for a highlight mode.

pub mod color;
pub mod highlight;
pub mod scale;

pub use color::{class_color, Fill, Rgb, GREEN, NEUTRAL, RED, YELLOW};
pub use highlight::{card_fill, class_label, ClassColors, UNCLASSIFIED};
pub use scale::{band_policy, build_scales, scale_for_column, Bands, ColorScale};
