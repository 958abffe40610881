use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.45);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Letter tiles: stand-ins for contact photos
// ---------------------------------------------------------------------------

/// Picks a stable tile colour for each contact from a fixed palette.
#[derive(Debug, Clone)]
pub struct LetterTilePalette {
    colors: Vec<Color32>,
    default_color: Color32,
}

impl Default for LetterTilePalette {
    fn default() -> Self {
        Self::new(12)
    }
}

impl LetterTilePalette {
    pub fn new(size: usize) -> Self {
        LetterTilePalette {
            colors: generate_palette(size),
            default_color: Color32::GRAY,
        }
    }

    /// Colour for a contact, keyed by lookup key (or display name when the
    /// contact has none). The same key always maps to the same colour.
    pub fn color_for(&self, key: Option<&str>) -> Color32 {
        let Some(key) = key.filter(|k| !k.is_empty()) else {
            return self.default_color;
        };
        if self.colors.is_empty() {
            return self.default_color;
        }
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let slot = (hasher.finish() % self.colors.len() as u64) as usize;
        self.colors[slot]
    }
}

/// Uppercase initial shown on a tile; `#` for names not starting with a letter.
pub fn tile_letter(name: Option<&str>) -> char {
    name.and_then(|n| n.trim_start().chars().next())
        .filter(|c| c.is_alphabetic())
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert_eq!(generate_palette(0).len(), 0);
        assert_eq!(generate_palette(5).len(), 5);
    }

    #[test]
    fn tile_colors_are_stable_per_key() {
        let palette = LetterTilePalette::default();
        assert_eq!(palette.color_for(Some("abc")), palette.color_for(Some("abc")));
        assert_eq!(palette.color_for(None), Color32::GRAY);
        assert_eq!(palette.color_for(Some("")), Color32::GRAY);
    }

    #[test]
    fn tile_letters() {
        assert_eq!(tile_letter(Some("  ada")), 'A');
        assert_eq!(tile_letter(Some("élodie")), 'É');
        assert_eq!(tile_letter(Some("42 Street")), '#');
        assert_eq!(tile_letter(None), '#');
    }
}
