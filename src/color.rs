use std::str::FromStr;

use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Chart palette
// ---------------------------------------------------------------------------

/// Default pie slice colours.
const DEFAULT_HEX: [&str; 3] = ["#8884d8", "#82ca9d", "#ffc658"];

/// Fixed, finite list of colours assigned cyclically to chart points.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPalette {
    colors: Vec<Srgb<u8>>,
}

impl Default for ChartPalette {
    fn default() -> Self {
        let colors = DEFAULT_HEX
            .iter()
            .filter_map(|hex| Srgb::<u8>::from_str(hex).ok())
            .collect();
        ChartPalette { colors }
    }
}

impl ChartPalette {
    /// `n` visually distinct colours using evenly spaced hues (at least one).
    pub fn evenly_spaced(n: usize) -> Self {
        let n = n.max(1);
        let colors = (0..n)
            .map(|i| {
                let hue = (i as f32 / n as f32) * 360.0;
                let hsl = Hsl::new(hue, 0.75, 0.55);
                let rgb: Srgb = hsl.into_color();
                rgb.into_format::<u8>()
            })
            .collect();
        ChartPalette { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Palette slot for the point at `position`.
    pub fn index_for(&self, position: usize) -> usize {
        position % self.colors.len().max(1)
    }

    /// `#rrggbb` for a palette slot, wrapping around like [`Self::index_for`].
    pub fn hex(&self, index: usize) -> String {
        match self.colors.get(self.index_for(index)) {
            Some(c) => format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue),
            None => "#808080".to_string(),
        }
    }
}
