use serde::{Deserialize, Serialize};

/// Brightness and saturation multipliers applied to point colors for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorEnhancement {
    /// Multiplier of the HSL lightness.
    pub brightness: f64,
    /// Multiplier of the HSL saturation.
    pub saturation: f64,
}

impl ColorEnhancement {
    /// Enhancement that leaves colors untouched.
    pub const IDENTITY: Self = Self {
        brightness: 1.0,
        saturation: 1.0,
    };

    /// Create a new enhancement from its multipliers.
    pub fn new(brightness: f64, saturation: f64) -> Self {
        Self {
            brightness,
            saturation,
        }
    }

    /// Apply the enhancement to an rgb triple.
    #[inline]
    pub fn apply(&self, rgb: [u8; 3]) -> [u8; 3] {
        enhance_color(rgb, self.brightness, self.saturation)
    }
}

impl Default for ColorEnhancement {
    fn default() -> Self {
        Self::new(1.5, 1.5)
    }
}

/// Scale the lightness and saturation of an rgb color.
///
/// The color is converted to HSL, the lightness and saturation are multiplied
/// by the given factors and clamped to 1.0, and the result is converted back.
///
/// # Arguments
///
/// * `rgb` - The input color with channels in [0, 255].
/// * `brightness` - Multiplier of the lightness.
/// * `saturation` - Multiplier of the saturation.
///
/// # Returns
///
/// A new rgb triple, rounded to the nearest integer.
///
/// Example:
///
/// ```
/// use sfmview_colmap::color::enhance_color;
///
/// assert_eq!(enhance_color([12, 200, 87], 1.0, 1.0), [12, 200, 87]);
/// assert_eq!(enhance_color([0, 0, 0], 1.5, 1.5), [0, 0, 0]);
/// ```
pub fn enhance_color(rgb: [u8; 3], brightness: f64, saturation: f64) -> [u8; 3] {
    let [h, s, l] = hsl_from_rgb([
        rgb[0] as f64 / 255.0,
        rgb[1] as f64 / 255.0,
        rgb[2] as f64 / 255.0,
    ]);

    let l = (l * brightness).min(1.0);
    let s = (s * saturation).min(1.0);

    let [r, g, b] = rgb_from_hsl([h, s, l]);

    [to_u8(r), to_u8(g), to_u8(b)]
}

#[inline]
fn to_u8(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Convert a normalized rgb color to HSL.
///
/// All channels, input and output, are in the range [0, 1].
pub fn hsl_from_rgb(rgb: [f64; 3]) -> [f64; 3] {
    let [r, g, b] = rgb;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (min + max) / 2.0;

    if min == max {
        return [0.0, 0.0, lightness];
    }

    let delta = max - min;

    let saturation = if lightness <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    let hue = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    [hue / 6.0, saturation, lightness]
}

/// Convert an HSL color to normalized rgb.
///
/// The hue wraps around; saturation and lightness are clamped to [0, 1].
pub fn rgb_from_hsl(hsl: [f64; 3]) -> [f64; 3] {
    let h = hsl[0].rem_euclid(1.0);
    let s = hsl[1].clamp(0.0, 1.0);
    let l = hsl[2].clamp(0.0, 1.0);

    if s == 0.0 {
        return [l, l, l];
    }

    let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let q = 2.0 * l - p;

    [
        hue_to_channel(q, p, h + 1.0 / 3.0),
        hue_to_channel(q, p, h),
        hue_to_channel(q, p, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}
