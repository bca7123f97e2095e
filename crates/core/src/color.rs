//! Color types and conversion functions.
//!
//! [`Srgb`] is the palette-facing color (parsed from and serialized to hex).
//! [`Rgba`] adds straight (non-premultiplied) alpha and is what the renderer
//! hands to a drawing surface. `OkLab`/`OkLch` exist so palettes can
//! interpolate perceptually; all conversions are pure functions over `f64`.

use crate::error::EngineError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as `"#rrggbb"`; the hex round-trip quantizes to 8 bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// sRGB color with straight alpha, every component in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Linear RGB color (gamma-decoded).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// OKLab perceptual color space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OkLab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// OKLCh, the cylindrical form of OKLab. Hue is in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OkLch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Parses `"#rrggbb"` or `"rrggbb"`, case insensitive.
    pub fn from_hex(hex: &str) -> Result<Srgb, EngineError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(EngineError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|e| EngineError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// Formats as `"#rrggbb"`, rounding each channel to 8 bits.
    pub fn to_hex(self) -> String {
        let [r, g, b] = [self.r, self.g, self.b].map(to_u8);
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Attaches an alpha channel (clamped to [0, 1]).
    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a: clamp_unit(alpha),
        }
    }

    /// Multiplies every channel by `factor`, clamped. Used for face shading.
    pub fn shade(self, factor: f64) -> Srgb {
        Srgb {
            r: clamp_unit(self.r * factor),
            g: clamp_unit(self.g * factor),
            b: clamp_unit(self.b * factor),
        }
    }
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Same color with alpha scaled by `factor`.
    pub fn fade(self, factor: f64) -> Rgba {
        Rgba {
            a: clamp_unit(self.a * factor),
            ..self
        }
    }

    /// Component-wise linear interpolation, `t` clamped to [0, 1].
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = clamp_unit(t);
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Source-over compositing of `self` onto `dst`, both straight alpha.
    pub fn over(self, dst: Rgba) -> Rgba {
        let a = self.a + dst.a * (1.0 - self.a);
        if a <= f64::EPSILON {
            return Rgba::TRANSPARENT;
        }
        let blend = |s: f64, d: f64| (s * self.a + d * dst.a * (1.0 - self.a)) / a;
        Rgba {
            r: blend(self.r, dst.r),
            g: blend(self.g, dst.g),
            b: blend(self.b, dst.b),
            a,
        }
    }

    /// CSS `rgba()` notation, the form a 2D canvas context accepts as a style.
    pub fn to_css(self) -> String {
        let [r, g, b] = [self.r, self.g, self.b].map(to_u8);
        format!("rgba({r}, {g}, {b}, {:.3})", clamp_unit(self.a))
    }

    /// Quantizes to four 8-bit channels.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(to_u8)
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

fn to_u8(v: f64) -> u8 {
    (clamp_unit(v) * 255.0).round() as u8
}

fn srgb_component_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_component_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Converts sRGB to linear RGB.
pub fn srgb_to_linear(c: Srgb) -> LinearRgb {
    LinearRgb {
        r: srgb_component_to_linear(c.r),
        g: srgb_component_to_linear(c.g),
        b: srgb_component_to_linear(c.b),
    }
}

/// Converts linear RGB to sRGB.
pub fn linear_to_srgb(c: LinearRgb) -> Srgb {
    Srgb {
        r: linear_component_to_srgb(c.r),
        g: linear_component_to_srgb(c.g),
        b: linear_component_to_srgb(c.b),
    }
}

/// Linear RGB to OKLab (Björn Ottosson's matrices).
pub fn linear_to_oklab(c: LinearRgb) -> OkLab {
    let l = (0.4122214708 * c.r + 0.5363325363 * c.g + 0.0514459929 * c.b).cbrt();
    let m = (0.2119034982 * c.r + 0.6806995451 * c.g + 0.1073969566 * c.b).cbrt();
    let s = (0.0883024619 * c.r + 0.2817188376 * c.g + 0.6299787005 * c.b).cbrt();
    OkLab {
        l: 0.2104542553 * l + 0.7936177850 * m - 0.0040720468 * s,
        a: 1.9779984951 * l - 2.4285922050 * m + 0.4505937099 * s,
        b: 0.0259040371 * l + 0.7827717662 * m - 0.8086757660 * s,
    }
}

/// OKLab to linear RGB.
pub fn oklab_to_linear(c: OkLab) -> LinearRgb {
    let l = (c.l + 0.3963377774 * c.a + 0.2158037573 * c.b).powi(3);
    let m = (c.l - 0.1055613458 * c.a - 0.0638541728 * c.b).powi(3);
    let s = (c.l - 0.0894841775 * c.a - 1.2914855480 * c.b).powi(3);
    LinearRgb {
        r: 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s,
        g: -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s,
        b: -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s,
    }
}

/// OKLab to OKLCh. Achromatic colors (chroma below 1e-10) get hue 0.
pub fn oklab_to_oklch(c: OkLab) -> OkLch {
    let chroma = c.a.hypot(c.b);
    let h = if chroma < 1e-10 {
        0.0
    } else {
        c.b.atan2(c.a).to_degrees().rem_euclid(360.0)
    };
    OkLch { l: c.l, c: chroma, h }
}

/// OKLCh to OKLab.
pub fn oklch_to_oklab(c: OkLch) -> OkLab {
    let (sin, cos) = c.h.to_radians().sin_cos();
    OkLab {
        l: c.l,
        a: c.c * cos,
        b: c.c * sin,
    }
}

/// sRGB → linear → OKLab → OKLCh.
pub fn srgb_to_oklch(c: Srgb) -> OkLch {
    oklab_to_oklch(linear_to_oklab(srgb_to_linear(c)))
}

/// OKLCh → OKLab → linear → sRGB, clamped into gamut.
pub fn oklch_to_srgb(c: OkLch) -> Srgb {
    let srgb = linear_to_srgb(oklab_to_linear(oklch_to_oklab(c)));
    Srgb {
        r: clamp_unit(srgb.r),
        g: clamp_unit(srgb.g),
        b: clamp_unit(srgb.b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn from_hex_accepts_with_and_without_hash() {
        let a = Srgb::from_hex("#6366f1").unwrap();
        let b = Srgb::from_hex("6366F1").unwrap();
        assert_eq!(a, b);
        assert!(close(a.r, 0x63 as f64 / 255.0));
    }

    #[test]
    fn from_hex_rejects_short_and_non_hex_input() {
        assert!(Srgb::from_hex("#fff").is_err());
        assert!(Srgb::from_hex("#gg0000").is_err());
        assert!(Srgb::from_hex("#ééé").is_err());
    }

    #[test]
    fn hex_round_trip_is_stable() {
        for hex in ["#000000", "#ffffff", "#0ea5e9", "#8b5cf6"] {
            assert_eq!(Srgb::from_hex(hex).unwrap().to_hex(), hex);
        }
    }

    #[test]
    fn serde_uses_hex_strings() {
        let c = Srgb::from_hex("#ec4899").unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#ec4899\"");
        let back: Srgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_hex(), "#ec4899");
    }

    #[test]
    fn with_alpha_clamps() {
        assert_eq!(Srgb::BLACK.with_alpha(1.7).a, 1.0);
        assert_eq!(Srgb::BLACK.with_alpha(-0.2).a, 0.0);
        assert_eq!(Srgb::BLACK.with_alpha(f64::NAN).a, 0.0);
    }

    #[test]
    fn over_with_opaque_source_replaces_destination() {
        let src = Srgb { r: 1.0, g: 0.0, b: 0.0 }.with_alpha(1.0);
        let dst = Srgb { r: 0.0, g: 0.0, b: 1.0 }.with_alpha(1.0);
        assert_eq!(src.over(dst), src);
    }

    #[test]
    fn over_with_transparent_source_keeps_destination() {
        let dst = Srgb { r: 0.2, g: 0.4, b: 0.6 }.with_alpha(0.5);
        let out = Rgba::TRANSPARENT.over(dst);
        assert!(close(out.r, 0.2) && close(out.g, 0.4) && close(out.b, 0.6));
        assert!(close(out.a, 0.5));
    }

    #[test]
    fn half_alpha_over_opaque_mixes_evenly() {
        let src = Srgb { r: 1.0, g: 1.0, b: 1.0 }.with_alpha(0.5);
        let dst = Srgb::BLACK.with_alpha(1.0);
        let out = src.over(dst);
        assert!(close(out.r, 0.5));
        assert!(close(out.a, 1.0));
    }

    #[test]
    fn to_css_formats_rgba() {
        let c = Srgb::from_hex("#ff8000").unwrap().with_alpha(0.25);
        assert_eq!(c.to_css(), "rgba(255, 128, 0, 0.250)");
    }

    #[test]
    fn shade_darkens_without_leaving_gamut() {
        let c = Srgb { r: 0.8, g: 0.5, b: 0.1 };
        let dark = c.shade(0.5);
        assert!(close(dark.r, 0.4) && close(dark.g, 0.25) && close(dark.b, 0.05));
        assert_eq!(c.shade(3.0).r, 1.0);
    }

    #[test]
    fn oklch_round_trip_preserves_saturated_colors() {
        for hex in ["#6366f1", "#06b6d4", "#f97316", "#22c55e"] {
            let c = Srgb::from_hex(hex).unwrap();
            let back = oklch_to_srgb(srgb_to_oklch(c));
            let near = |a: f64, b: f64| (a - b).abs() < 1e-4;
            assert!(
                near(c.r, back.r) && near(c.g, back.g) && near(c.b, back.b),
                "{hex} drifted to {back:?}"
            );
        }
    }

    #[test]
    fn zero_chroma_lab_has_zero_hue() {
        let lch = oklab_to_oklch(OkLab {
            l: 0.6,
            a: 0.0,
            b: 0.0,
        });
        assert_eq!(lch.c, 0.0);
        assert_eq!(lch.h, 0.0);
    }
}
