//! Hue/saturation/brightness colours and the triadic palette.

use image::Rgba;

/// Colour on the HSB cylinder: hue in degrees, saturation and brightness in 0..=100
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsb {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
}

impl Hsb {
    /// Fully saturated, full brightness colour of the given hue
    pub fn vivid(hue: f32) -> Self {
        Self {
            hue: hue.rem_euclid(360.0),
            saturation: 100.0,
            brightness: 100.0,
        }
    }

    /// Convert to 8-bit RGBA with `alpha` in 0..=1
    pub fn to_rgba(self, alpha: f32) -> Rgba<u8> {
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let v = (self.brightness / 100.0).clamp(0.0, 1.0);
        let h = self.hue.rem_euclid(360.0) / 60.0;

        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = v - c;
        let to_u8 = |f: f32| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;

        Rgba([
            to_u8(r),
            to_u8(g),
            to_u8(b),
            (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        ])
    }
}

/// Three hues spaced 120° apart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriadicColours(pub [Hsb; 3]);

impl TriadicColours {
    pub fn from_hue(hue: f32) -> Self {
        Self([
            Hsb::vivid(hue),
            Hsb::vivid(hue + 120.0),
            Hsb::vivid(hue + 240.0),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triad_offsets() {
        let triad = TriadicColours::from_hue(300.0);
        let hues: Vec<f32> = triad.0.iter().map(|c| c.hue).collect();
        assert_eq!(hues, vec![300.0, 60.0, 180.0]);
    }

    #[test]
    fn test_triad_is_a_pure_function_of_hue() {
        assert_eq!(TriadicColours::from_hue(42.5), TriadicColours::from_hue(42.5));
    }

    #[test]
    fn test_primary_hues_to_rgb() {
        assert_eq!(Hsb::vivid(0.0).to_rgba(1.0), Rgba([255, 0, 0, 255]));
        assert_eq!(Hsb::vivid(120.0).to_rgba(1.0), Rgba([0, 255, 0, 255]));
        assert_eq!(Hsb::vivid(240.0).to_rgba(0.5), Rgba([0, 0, 255, 128]));
        assert_eq!(Hsb::vivid(60.0).to_rgba(1.0), Rgba([255, 255, 0, 255]));
    }

    #[test]
    fn test_zero_brightness_is_black() {
        let black = Hsb {
            hue: 200.0,
            saturation: 100.0,
            brightness: 0.0,
        };
        assert_eq!(black.to_rgba(1.0), Rgba([0, 0, 0, 255]));
    }
}
