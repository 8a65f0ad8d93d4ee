use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use quantum_dash::data::model::Technology;

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
            let hue = 210.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.55);
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
// Fixed dashboard colours
// ---------------------------------------------------------------------------

pub const BLUE: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);
pub const GREEN: Color32 = Color32::from_rgb(0x10, 0xb9, 0x81);
pub const RED: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);
pub const YELLOW: Color32 = Color32::from_rgb(0xfa, 0xcc, 0x15);
pub const SLATE: Color32 = Color32::from_rgb(0x94, 0xa3, 0xb8);
/// Border of panels while a filter is active.
pub const WARNING: Color32 = Color32::from_rgb(0xf5, 0x9e, 0x0b);

pub fn technology_color(technology: Technology) -> Color32 {
    match technology {
        Technology::Superconducting => BLUE,
        Technology::TrappedIon => RED,
        Technology::Topological => GREEN,
        Technology::Annealing => YELLOW,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }
}
