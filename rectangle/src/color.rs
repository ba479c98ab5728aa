use cgmath::Vector3;
use thiserror::Error;

use crate::math::Lerpable;

/// Color in normalized RGB, the representation colors are stored and uploaded in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);

        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex(hex.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorError::InvalidHex(hex.to_string()))
        };

        Ok(Self::from_u8(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hsv(&self) -> Hsv {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;

        let s = if max > 0.0 { delta / max } else { 0.0 };

        let h = if delta == 0.0 {
            0.0
        } else if max == self.r {
            60.0 * ((self.g - self.b) / delta)
        } else if max == self.g {
            60.0 * ((self.b - self.r) / delta + 2.0)
        } else {
            60.0 * ((self.r - self.g) / delta + 4.0)
        };

        Hsv {
            h: wrap_hue(h),
            s,
            v: max,
        }
    }

    pub fn to_f32_array(&self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }
}

/// Hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
///
/// Achromatic colors report a hue of 0.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub fn to_rgb(&self) -> Rgb {
        let h = wrap_hue(self.h);
        let c = self.v * self.s;
        let sector = h / 60.0;
        let x = c * (1.0 - (sector % 2.0 - 1.0).abs());
        let m = self.v - c;

        let (r, g, b) = match sector as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Rgb::new(r + m, g + m, b + m)
    }

    fn as_vector(&self) -> Vector3<f64> {
        Vector3::new(self.h, self.s, self.v)
    }
}

/// `rem_euclid` rounds tiny negative angles up to exactly 360.
fn wrap_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);

    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Channel-wise blend. Hue is blended as a plain number, so a transition from 350° to 10°
/// sweeps back through the whole hue circle instead of crossing 0°.
impl Lerpable for Hsv {
    fn lerp(&self, other: &Self, factor: f64) -> Self {
        let v = self.as_vector().lerp(&other.as_vector(), factor);

        Hsv {
            h: v.x,
            s: v.y,
            v: v.z,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid hex color {0:?}, expected #rrggbb")]
    InvalidHex(String),
}
