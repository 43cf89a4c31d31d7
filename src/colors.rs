// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! RGB and HSV colors, and the two ways of mixing them.

use std::str::FromStr;

use error::BrocoliError;

/// An 8 bit per channel RGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

/// Black.
pub const BLACK: Color = Color(0, 0, 0);

/// White.
pub const WHITE: Color = Color(255, 255, 255);

/// A color in the HSV hexcone, every component in `[0, 1]`.  The hue
/// is a position on a circle, so 0 and 1 are the same red.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hsv {
    /// Hue.
    pub h: f64,
    /// Saturation.
    pub s: f64,
    /// Value.
    pub v: f64,
}

const NAMED_COLORS: [(&str, Color); 20] = [
    ("black", Color(0, 0, 0)),
    ("white", Color(255, 255, 255)),
    ("red", Color(255, 0, 0)),
    ("lime", Color(0, 255, 0)),
    ("green", Color(0, 128, 0)),
    ("blue", Color(0, 0, 255)),
    ("yellow", Color(255, 255, 0)),
    ("cyan", Color(0, 255, 255)),
    ("magenta", Color(255, 0, 255)),
    ("orange", Color(255, 165, 0)),
    ("purple", Color(128, 0, 128)),
    ("pink", Color(255, 192, 203)),
    ("brown", Color(165, 42, 42)),
    ("gray", Color(128, 128, 128)),
    ("grey", Color(128, 128, 128)),
    ("navy", Color(0, 0, 128)),
    ("teal", Color(0, 128, 128)),
    ("maroon", Color(128, 0, 0)),
    ("olive", Color(128, 128, 0)),
    ("gold", Color(255, 215, 0)),
];

#[inline]
fn lerp(a: f64, b: f64, f: f64) -> f64 {
    a * (1.0 - f) + b * f
}

impl Color {
    /// Straight per-channel interpolation: `self` at 0, `other` at 1.
    pub fn mix(self, other: Color, f: f64) -> Color {
        let channel = |a: u8, b: u8| {
            let x = lerp(f64::from(a), f64::from(b), f).round();
            x.max(0.0).min(255.0) as u8
        };
        Color(
            channel(self.0, other.0),
            channel(self.1, other.1),
            channel(self.2, other.2),
        )
    }

    /// Convert to the HSV hexcone.
    pub fn to_hsv(self) -> Hsv {
        let (r, g, b) = (
            f64::from(self.0) / 255.0,
            f64::from(self.1) / 255.0,
            f64::from(self.2) / 255.0,
        );
        let maxc = r.max(g).max(b);
        let minc = r.min(g).min(b);
        if maxc == minc {
            return Hsv { h: 0.0, s: 0.0, v: maxc };
        }
        let span = maxc - minc;
        let (rc, gc, bc) = ((maxc - r) / span, (maxc - g) / span, (maxc - b) / span);
        let h = if r == maxc {
            bc - gc
        } else if g == maxc {
            2.0 + rc - bc
        } else {
            4.0 + gc - rc
        };
        Hsv {
            h: (h / 6.0).rem_euclid(1.0),
            s: span / maxc,
            v: maxc,
        }
    }

    /// `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from(rgb: (u8, u8, u8)) -> Color {
        Color(rgb.0, rgb.1, rgb.2)
    }
}

/// Accepts `#RRGGBB`, `RRGGBB`, or one of a handful of English color
/// names.
impl FromStr for Color {
    type Err = BrocoliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('#');
        let lower = trimmed.to_lowercase();
        if let Some(&(_, color)) = NAMED_COLORS.iter().find(|named| named.0 == lower) {
            return Ok(color);
        }
        if trimmed.len() != 6 || !trimmed.is_ascii() {
            return Err(BrocoliError::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&trimmed[i..i + 2], 16)
                .map_err(|_| BrocoliError::InvalidColor(s.to_string()))
        };
        Ok(Color(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Parse dash separated colors, `0F4152-59A07B-F7E491`.  A trailing dash
/// loops the gradient back to its first color.
pub fn parse_gradient(s: &str) -> Result<Vec<Color>, BrocoliError> {
    let s = s.trim();
    let looped = s.ends_with('-');
    let mut colors = s
        .trim_end_matches('-')
        .split('-')
        .map(Color::from_str)
        .collect::<Result<Vec<Color>, BrocoliError>>()?;
    if looped {
        let first = colors[0];
        colors.push(first);
    }
    Ok(colors)
}

impl Hsv {
    /// Convert back to 8 bit RGB.  Channels are truncated, not rounded.
    pub fn to_color(self) -> Color {
        let (r, g, b) = self.to_rgb();
        let channel = |x: f64| (255.0 * x).max(0.0).min(255.0) as u8;
        Color(channel(r), channel(g), channel(b))
    }

    fn to_rgb(self) -> (f64, f64, f64) {
        let Hsv { h, s, v } = self;
        if s == 0.0 {
            return (v, v, v);
        }
        let sector = (h * 6.0).floor();
        let f = h * 6.0 - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        match (sector as i64).rem_euclid(6) {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        }
    }

    /// The distance between the two hues around the hue circle, in
    /// `[0, 1/2]`.
    pub fn hue_distance(self, other: Hsv) -> f64 {
        let d = (self.h - other.h).abs();
        d.min(1.0 - d)
    }

    /// Interpolate in HSV space: `self` at 0, `other` at 1.  The hue goes
    /// the short way around the circle, through red if it has to.
    pub fn mix(self, other: Hsv, f: f64) -> Hsv {
        if f <= 0.0 {
            return self;
        }
        if f >= 1.0 {
            return other;
        }
        let h = if (self.h - other.h).abs() <= 0.5 {
            lerp(self.h, other.h, f)
        } else if self.h > other.h {
            lerp(self.h, other.h + 1.0, f).rem_euclid(1.0)
        } else {
            lerp(self.h, other.h - 1.0, f).rem_euclid(1.0)
        };
        Hsv {
            h,
            s: lerp(self.s, other.s, f),
            v: lerp(self.v, other.v, f),
        }
    }
}
