// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape functions.  Each one iterates `z -> z * z + c` from a
//! starting point and boils the orbit down to a single number.  The
//! sign of that number is the one convention every later stage relies
//! on: negative (or zero) means the orbit never left the bound and the
//! point is inside the set, positive means it escaped.
//!
//! The set of functions is closed, so the kind of coloration is a
//! plain enum that indexes a fixed table of function pointers.

use num::Complex;
use std::f64::consts::LN_2;
use std::fmt;
use std::str::FromStr;

use error::BrocoliError;

/// The escape bound used when nobody asks for another one.
pub const DEFAULT_BOUND: f64 = 20_000.0;

/// The iteration limit used when nobody asks for another one.
pub const DEFAULT_LIMIT: usize = 128;

/// The signature shared by every escape function: starting point,
/// parameter, iteration limit and escape bound.
pub type EscapeFn = fn(Complex<f64>, Complex<f64>, usize, f64) -> f64;

/// The five ways of turning an orbit into a value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Coloration {
    /// The iteration at which the orbit escaped.
    Time,
    /// The escape time, made continuous.
    SmoothTime,
    /// The mean of the orbit.  Always non-positive.
    Angle,
    /// The average triangle inequality, a measure of how far each step
    /// strays from its bounds.
    AvgTriangleInequality,
    /// The average turning angle of the orbit.
    AvgCurvature,
}

const ESCAPE_FUNCTIONS: [EscapeFn; 5] = [
    escape_time,
    escape_smooth,
    escape_angle,
    escape_triangle_inequality,
    escape_curvature,
];

impl Coloration {
    /// Every kind, in table order.
    pub const ALL: [Coloration; 5] = [
        Coloration::Time,
        Coloration::SmoothTime,
        Coloration::Angle,
        Coloration::AvgTriangleInequality,
        Coloration::AvgCurvature,
    ];

    /// The escape function computing this kind.
    pub fn escape_fn(self) -> EscapeFn {
        ESCAPE_FUNCTIONS[self as usize]
    }

    /// Evaluate one point.
    pub fn escape(self, z0: Complex<f64>, c: Complex<f64>, limit: usize, bound: f64) -> f64 {
        (self.escape_fn())(z0, c, limit, bound)
    }

    /// The human readable name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            Coloration::Time => "escape time",
            Coloration::SmoothTime => "smooth escape time",
            Coloration::Angle => "angle",
            Coloration::AvgTriangleInequality => "average triangle inequality",
            Coloration::AvgCurvature => "average curvature",
        }
    }

    fn code(self) -> &'static str {
        match self {
            Coloration::Time => "t",
            Coloration::SmoothTime => "s",
            Coloration::Angle => "a",
            Coloration::AvgTriangleInequality => "i",
            Coloration::AvgCurvature => "c",
        }
    }
}

impl fmt::Display for Coloration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the full name of a kind or its one letter code.
impl FromStr for Coloration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Coloration::ALL
            .iter()
            .find(|kind| kind.code() == s || kind.name() == s)
            .cloned()
            .ok_or_else(|| format!("Coloration must be one of [T|S|A|I|C], got {:?}", s))
    }
}

/// Check the two preconditions every escape function assumes.
pub fn check_limits(limit: usize, bound: f64) -> Result<(), BrocoliError> {
    if limit < 1 {
        return Err(BrocoliError::InvalidLimit);
    }
    if !(bound > 0.0) || !bound.is_finite() {
        return Err(BrocoliError::InvalidBound(bound));
    }
    Ok(())
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// How far past the bound the last iterate went, as a fraction of an
/// iteration.  Used to blend the last two partial averages.  Defined as
/// zero when `|z| == 1`, where the logarithm vanishes, and whenever the
/// result is not finite.
#[inline]
fn smooth_coef(absz: f64, bound: f64) -> f64 {
    if absz == 1.0 {
        return 0.0;
    }
    let d = 1.0 + (bound.ln() / absz.ln().abs()).ln() / LN_2;
    if d.is_finite() {
        d
    } else {
        0.0
    }
}

/// Blend the averages `s / (i - 1)` and `s1 / (i - 2)` of an orbit that
/// stopped at iteration `i`.
#[inline]
fn blend(s: f64, s1: f64, i: usize, d: f64, sign: f64) -> f64 {
    let average = if i > 1 { s / (i - 1) as f64 } else { 0.0 };
    let previous = if i > 2 { s1 / (i - 2) as f64 } else { 0.0 };
    lerp(previous, average, d) * sign
}

/// The classic escape time: the iteration at which `|z|` passed the
/// bound, or `-limit` for points that never did.
pub fn escape_time(z0: Complex<f64>, c: Complex<f64>, limit: usize, bound: f64) -> f64 {
    let mut z = z0;
    for i in 1..limit {
        z = z * z + c;
        if z.norm() > bound {
            return i as f64;
        }
    }
    -(limit as f64)
}

/// The escape time with the fractional part recovered from how far past
/// the bound the orbit landed.
pub fn escape_smooth(z0: Complex<f64>, c: Complex<f64>, limit: usize, bound: f64) -> f64 {
    let mut z = z0;
    for i in 1..limit {
        z = z * z + c;
        let absz = z.norm();
        if absz > bound {
            return i as f64 + (bound.ln() / absz.ln()).ln() / LN_2;
        }
    }
    -(limit as f64)
}

/// Minus the modulus of the mean of the orbit, up to and including the
/// first iterate outside the radius 2 disc.  The bound is ignored.
///
/// This is non-positive for escaping points too, so this kind never
/// separates the inside of the set by sign.
pub fn escape_angle(z0: Complex<f64>, c: Complex<f64>, limit: usize, _bound: f64) -> f64 {
    let mut z = z0;
    let mut sum = z0;
    let mut length = 1;
    for _ in 1..limit {
        z = z * z + c;
        sum = sum + z;
        length += 1;
        if z.norm() > 2.0 {
            break;
        }
    }
    -sum.norm() / length as f64
}

/// Average of `(|z| - m) / (M - m)` along the orbit, where `m` and `M`
/// are the triangle inequality bounds of `|z|` given `z - c` and `c`.
pub fn escape_triangle_inequality(
    z0: Complex<f64>,
    c: Complex<f64>,
    limit: usize,
    bound: f64,
) -> f64 {
    let absc = c.norm();
    let mut z = z0;
    let mut absz = z.norm();
    let (mut s, mut s1) = (0.0, 0.0);
    let mut last = 0;
    let mut sign = -1.0;

    for i in 1..limit {
        last = i;
        z = z * z + c;

        s1 = s;
        absz = z.norm();
        let zc = (z - c).norm();
        let low = (zc - absc).abs();
        let high = zc + absc;

        if i > 1 && high != low {
            s += (absz - low) / (high - low);
        }

        if absz > bound {
            sign = 1.0;
            break;
        }
    }

    blend(s, s1, last, smooth_coef(absz, bound), sign)
}

/// The last three iterates of an orbit.  `head` is always the slot one
/// past the newest value, so it also holds the oldest one.
struct Ring3 {
    zs: [Complex<f64>; 3],
    head: usize,
}

impl Ring3 {
    fn new() -> Ring3 {
        Ring3 {
            zs: [Complex::new(0.0, 0.0); 3],
            head: 0,
        }
    }

    fn push(&mut self, z: Complex<f64>) {
        self.zs[self.head] = z;
        self.head = (self.head + 1) % 3;
    }

    /// The value pushed `age` pushes ago; 0 is the newest.
    fn back(&self, age: usize) -> Complex<f64> {
        self.zs[(self.head + 2 - age % 3) % 3]
    }
}

/// The absolute turning angle at the middle of the last three iterates.
fn curvature(zs: &Ring3) -> f64 {
    let (newest, middle, oldest) = (zs.back(0), zs.back(1), zs.back(2));
    if middle == oldest {
        return 0.0;
    }
    ((newest - middle) / (middle - oldest)).arg().abs()
}

/// Average of the turning angle of the orbit.
pub fn escape_curvature(z0: Complex<f64>, c: Complex<f64>, limit: usize, bound: f64) -> f64 {
    let mut zs = Ring3::new();
    zs.push(z0);
    let (mut s, mut s1) = (0.0, 0.0);
    let mut last = 0;
    let mut sign = -1.0;

    for i in 0..limit {
        last = i;
        let z = zs.back(0);
        zs.push(z * z + c);

        if i >= 2 {
            s1 = s;
            s += curvature(&zs);
        }

        if zs.back(0).norm() > bound {
            sign = 1.0;
            break;
        }
    }

    blend(s, s1, last, smooth_coef(zs.back(0).norm(), bound), sign)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex<f64> {
        Complex::new(re, im)
    }

    #[test]
    fn table_matches_kinds() {
        let z = c(0.3, 0.2);
        for kind in Coloration::ALL.iter() {
            assert_eq!(kind.escape(z, z, 50, 4.0), (kind.escape_fn())(z, z, 50, 4.0));
        }
        assert_eq!(
            Coloration::Time.escape(c(2.0, 0.0), c(2.0, 0.0), 50, 4.0),
            escape_time(c(2.0, 0.0), c(2.0, 0.0), 50, 4.0)
        );
    }

    #[test]
    fn kinds_parse_from_codes_and_names() {
        assert_eq!("T".parse::<Coloration>(), Ok(Coloration::Time));
        assert_eq!("s".parse::<Coloration>(), Ok(Coloration::SmoothTime));
        assert_eq!("a".parse::<Coloration>(), Ok(Coloration::Angle));
        assert_eq!("i".parse::<Coloration>(), Ok(Coloration::AvgTriangleInequality));
        assert_eq!("c".parse::<Coloration>(), Ok(Coloration::AvgCurvature));
        assert_eq!("average curvature".parse::<Coloration>(), Ok(Coloration::AvgCurvature));
        assert!("x".parse::<Coloration>().is_err());
        assert_eq!(Coloration::SmoothTime.to_string(), "smooth escape time");
    }

    #[test]
    fn escape_time_escapes_immediately_outside() {
        assert_eq!(escape_time(c(2.0, 0.0), c(2.0, 0.0), 50, 4.0), 1.0);
    }

    #[test]
    fn escape_time_never_escapes_at_origin() {
        assert_eq!(escape_time(c(0.0, 0.0), c(0.0, 0.0), 50, 4.0), -50.0);
        assert_eq!(escape_time(c(-1.0, 0.0), c(-1.0, 0.0), 50, 4.0), -50.0);
    }

    #[test]
    fn limit_of_one_never_iterates() {
        assert_eq!(escape_time(c(2.0, 0.0), c(2.0, 0.0), 1, 4.0), -1.0);
        assert_eq!(escape_smooth(c(2.0, 0.0), c(2.0, 0.0), 1, 4.0), -1.0);
    }

    #[test]
    fn smooth_time_follows_escape_time() {
        // 1 -> 2 -> 5 -> 26: escapes a bound of 10 at the third step.
        let value = escape_smooth(c(1.0, 0.0), c(1.0, 0.0), 50, 10.0);
        let expected = 3.0 + (10f64.ln() / 26f64.ln()).ln() / LN_2;
        assert!((value - expected).abs() < 1e-12);
        assert_eq!(escape_smooth(c(0.0, 0.0), c(0.0, 0.0), 50, 10.0), -50.0);
    }

    #[test]
    fn smooth_time_grows_with_bound() {
        let bounds = [10.0, 100.0, 1_000.0, 10_000.0, 100_000.0];
        let values: Vec<f64> = bounds
            .iter()
            .map(|&bound| escape_smooth(c(1.0, 0.0), c(1.0, 0.0), 50, bound))
            .collect();
        for pair in values.windows(2) {
            assert!(pair[0] <= pair[1], "{:?}", values);
        }
    }

    #[test]
    fn angle_is_never_positive() {
        for &(re, im) in &[(0.0, 0.0), (2.0, 0.0), (0.3, 0.5), (-1.5, 0.1), (10.0, 10.0)] {
            let z = c(re, im);
            assert!(escape_angle(z, z, 50, 4.0) <= 0.0);
        }
    }

    #[test]
    fn angle_averages_orbit() {
        // 2 -> 6: the orbit is [2, 6] and its mean has modulus 4.
        assert_eq!(escape_angle(c(2.0, 0.0), c(2.0, 0.0), 50, 1e9), -4.0);
    }

    #[test]
    fn triangle_inequality_signs_membership() {
        let inside = c(-0.1, 0.1);
        let outside = c(0.5, 0.5);
        assert!(escape_triangle_inequality(inside, inside, 200, 1000.0) < 0.0);
        assert!(escape_triangle_inequality(outside, outside, 200, 1000.0) > 0.0);
    }

    #[test]
    fn triangle_inequality_is_finite_at_origin() {
        let value = escape_triangle_inequality(c(0.0, 0.0), c(0.0, 0.0), 50, 1000.0);
        assert!(value.is_finite());
        assert!(value <= 0.0);
    }

    #[test]
    fn curvature_signs_membership() {
        let inside = c(-0.1, 0.1);
        let outside = c(0.5, 0.5);
        assert!(escape_curvature(inside, inside, 200, 1000.0) < 0.0);
        assert!(escape_curvature(outside, outside, 200, 1000.0) > 0.0);
    }

    #[test]
    fn curvature_of_straight_orbit_is_zero() {
        // A real orbit never turns, so every angle is 0 or pi.
        let value = escape_curvature(c(1.0, 0.0), c(1.0, 0.0), 50, 1000.0);
        assert_eq!(value, 0.0);
    }

    fn assert_close(value: f64, expected: f64) {
        assert!((value - expected).abs() < 1e-9, "{} != {}", value, expected);
    }

    #[test]
    fn triangle_inequality_averages() {
        let point = c(0.3, 0.5);
        assert_close(escape_triangle_inequality(point, point, 100, 1000.0), -0.5668272727608688);
        let point = c(-0.75, 0.1);
        assert_close(escape_triangle_inequality(point, point, 200, 20_000.0), 0.3031016900381678);
        let point = c(-1.5, 0.01);
        assert_close(escape_triangle_inequality(point, point, 64, 1000.0), 0.21681630603056495);
    }

    #[test]
    fn curvature_averages() {
        let point = c(0.3, 0.5);
        assert_close(escape_curvature(point, point, 100, 1000.0), -1.599880547492475);
        let point = c(-0.75, 0.1);
        assert_close(escape_curvature(point, point, 200, 20_000.0), 2.816406438680755);
        let point = c(-1.5, 0.01);
        assert_close(escape_curvature(point, point, 64, 1000.0), 2.53743309722275);
    }

    #[test]
    fn ring_keeps_last_three() {
        let mut zs = Ring3::new();
        for i in 0..5 {
            zs.push(c(i as f64, 0.0));
        }
        assert_eq!(zs.back(0), c(4.0, 0.0));
        assert_eq!(zs.back(1), c(3.0, 0.0));
        assert_eq!(zs.back(2), c(2.0, 0.0));
    }

    #[test]
    fn check_limits_rejects_bad_configuration() {
        assert_eq!(check_limits(0, 4.0), Err(BrocoliError::InvalidLimit));
        assert_eq!(check_limits(10, 0.0), Err(BrocoliError::InvalidBound(0.0)));
        assert!(check_limits(1, 2.5).is_ok());
    }

    #[test]
    fn julia_seed_changes_the_parameter() {
        let z0 = c(0.0, 0.0);
        assert_eq!(escape_time(z0, z0, 50, 4.0), -50.0);
        assert_eq!(escape_time(z0, c(3.0, 0.0), 50, 4.0), 2.0);
    }
}
