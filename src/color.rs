use std::fmt;

/// Color in hue/saturation/luminance space. Hue is in degrees `[0, 360)`,
/// saturation and luminance are percentages `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub luminance: f32,
}

impl Hsl {
    pub fn new(hue: f32, saturation: f32, luminance: f32) -> Self {
        Self {
            hue,
            saturation,
            luminance,
        }
    }

    /// Parse a `#rgb` or `#rrggbb` hex color.
    ///
    /// Malformed input is a contract violation on the caller's side and is
    /// reported as an error rather than patched over.
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| format!("Hexadecimal color must start with '#': {}", hex))?;

        let channel = |s: &str| {
            u8::from_str_radix(s, 16)
                .map_err(|_| format!("Invalid hexadecimal digit in color: {}", hex))
        };

        let (r, g, b) = match digits.len() {
            3 => (
                channel(&digits[0..1].repeat(2))?,
                channel(&digits[1..2].repeat(2))?,
                channel(&digits[2..3].repeat(2))?,
            ),
            6 => (
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ),
            _ => return Err(format!("Hexadecimal color not properly formatted: {}", hex)),
        };

        let r = r as f32 / 255.0;
        let g = g as f32 / 255.0;
        let b = b as f32 / 255.0;

        let cmin = r.min(g).min(b);
        let cmax = r.max(g).max(b);
        let delta = cmax - cmin;

        let mut h = if delta == 0.0 {
            0.0
        } else if cmax == r {
            ((g - b) / delta) % 6.0
        } else if cmax == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        h = (h * 60.0).round();
        if h < 0.0 {
            h += 360.0;
        }

        let l = (cmax + cmin) / 2.0;
        let s = if delta == 0.0 {
            0.0
        } else {
            delta / (1.0 - (2.0 * l - 1.0).abs())
        };

        Ok(Self {
            hue: h,
            saturation: (s * 1000.0).round() / 10.0,
            luminance: (l * 1000.0).round() / 10.0,
        })
    }

    pub fn to_hex(&self) -> String {
        let h = self.hue;
        let s = self.saturation / 100.0;
        let l = self.luminance / 100.0;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match h {
            h if h < 60.0 => (c, x, 0.0),
            h if h < 120.0 => (x, c, 0.0),
            h if h < 180.0 => (0.0, c, x),
            h if h < 240.0 => (0.0, x, c),
            h if h < 300.0 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        format!(
            "#{:02x}{:02x}{:02x}",
            ((r + m) * 255.0).round() as u8,
            ((g + m) * 255.0).round() as u8,
            ((b + m) * 255.0).round() as u8
        )
    }

    pub fn invert_luminance(mut self) -> Self {
        self.luminance = 100.0 - self.luminance;
        self
    }

    pub fn invert_saturation(mut self) -> Self {
        self.saturation = 100.0 - self.saturation;
        self
    }

    pub fn invert_hue(mut self) -> Self {
        self.hue = (360.0 - self.hue) % 360.0;
        self
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({},{},{})", self.hue, self.saturation, self.luminance)
    }
}

/// Evenly hue-spaced fully saturated palette, used to give each subpathway a
/// distinguishable color.
pub fn spaced_palette(count: usize, luminance: f32) -> Vec<Hsl> {
    if count == 0 {
        return Vec::new();
    }
    let step = 360.0 / count as f32;
    (0..count)
        .map(|i| Hsl::new(step * i as f32, 100.0, luminance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Hsl, spaced_palette};
    use proptest::prelude::*;

    #[test]
    fn parses_short_and_long_forms() {
        let short = Hsl::from_hex("#f80").expect("short form");
        let long = Hsl::from_hex("#ff8800").expect("long form");
        assert_eq!(short, long);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(Hsl::from_hex("ff8800").is_err());
        assert!(Hsl::from_hex("#ff88").is_err());
        assert!(Hsl::from_hex("#ggg").is_err());
    }

    #[test]
    fn known_round_trips() {
        for hex in ["#000000", "#ffffff", "#ba1a1a", "#006782", "#78e076"] {
            let hsl = Hsl::from_hex(hex).expect("valid hex");
            assert_eq!(hsl.to_hex(), hex);
        }
    }

    #[test]
    fn inversions() {
        let c = Hsl::new(90.0, 30.0, 40.0);
        assert_eq!(c.invert_luminance().luminance, 60.0);
        assert_eq!(c.invert_saturation().saturation, 70.0);
        assert_eq!(c.invert_hue().hue, 270.0);
        assert_eq!(Hsl::new(0.0, 0.0, 0.0).invert_hue().hue, 0.0);
    }

    #[test]
    fn palette_is_evenly_spaced() {
        let palette = spaced_palette(4, 40.0);
        let hues: Vec<f32> = palette.iter().map(|c| c.hue).collect();
        assert_eq!(hues, vec![0.0, 90.0, 180.0, 270.0]);
        assert!(palette.iter().all(|c| c.luminance == 40.0));
        assert!(spaced_palette(0, 40.0).is_empty());
    }

    proptest! {
        // Round trip is lossy through 8-bit RGB; hue/saturation/luminance must
        // each come back within one unit for non-degenerate colors.
        #[test]
        fn hsl_hex_round_trip(
            hue in 0.0f32..359.0,
            saturation in 50.0f32..95.0,
            luminance in 35.0f32..65.0,
        ) {
            let original = Hsl::new(hue.round(), saturation.round(), luminance.round());
            let recovered = Hsl::from_hex(&original.to_hex()).unwrap();
            prop_assert!((recovered.hue - original.hue).abs() <= 1.0 ||
                (360.0 - (recovered.hue - original.hue).abs()) <= 1.0);
            prop_assert!((recovered.saturation - original.saturation).abs() <= 1.0);
            prop_assert!((recovered.luminance - original.luminance).abs() <= 1.0);
        }

        #[test]
        fn hex_parse_never_panics(s in "\\PC*") {
            let _ = Hsl::from_hex(&s);
        }
    }
}
