// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bringing the escape values into `[-1, 1]` without mixing up the
//! inside of the set with the outside.

use grid::Grid;

/// Smallest and largest finite values of the cells selected by `keep`.
fn finite_range<F: Fn(f64) -> bool>(values: &[f64], keep: F) -> Option<(f64, f64)> {
    values
        .iter()
        .cloned()
        .filter(|&v| v.is_finite() && keep(v))
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((low, high)) => Some((low.min(v), high.max(v))),
        })
}

/// Min-max normalize one half of the grid into `[0, 1)` and rotate it by
/// `speed` and `offset`.  A constant half is sent to `constant`.
fn rescale(v: f64, range: Option<(f64, f64)>, speed: f64, offset: f64, constant: f64) -> f64 {
    match range {
        Some((low, high)) if low != high => {
            let x = (v - low) / (high - low);
            // rem_euclid rounds tiny negative inputs up to exactly 1.
            let rotated = (x * speed + offset).rem_euclid(1.0);
            if rotated < 1.0 {
                rotated
            } else {
                0.0
            }
        }
        _ => constant,
    }
}

/// Normalize a grid and keep the sign of each value.
///
/// The non-negative values are mapped to `[0, 1]` and the negative ones
/// to `[-1, 0]`, each half on its own range, so the boundary between
/// the inside and the outside of the set stays at zero.  `speed`
/// stretches and `offset` rotates the normalized values around that
/// interval.  Infinities go to the matching end of the interval and
/// NaN is left alone.
pub fn signed_normalize(mut grid: Grid<f64>, speed: f64, offset: f64) -> Grid<f64> {
    let positive = finite_range(grid.values(), |v| v >= 0.0);
    let negative = finite_range(grid.values(), |v| v < 0.0);
    debug!(
        "normalizing with escaped range {:?} and inside range {:?}",
        positive, negative
    );

    for v in grid.values_mut() {
        *v = if v.is_nan() {
            *v
        } else if v.is_infinite() {
            v.signum()
        } else if *v >= 0.0 {
            rescale(*v, positive, speed, offset, 1.0)
        } else {
            rescale(*v, negative, speed, offset, 0.0) - 1.0
        };
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(values: &[f64], speed: f64, offset: f64) -> Vec<f64> {
        let grid = Grid::from_vec(values.len(), 1, values.to_vec()).unwrap();
        signed_normalize(grid, speed, offset).into_vec()
    }

    #[test]
    fn halves_are_normalized_separately() {
        let out = normalize(&[-10.0, -6.0, -2.0, 0.0, 4.0, 8.0], 1.0, 0.0);
        assert_eq!(out[0], -1.0);
        assert_eq!(out[1], -0.5);
        assert_eq!(out[3], 0.0);
        assert_eq!(out[4], 0.5);
        // The top of each half wraps around to the start.
        assert_eq!(out[2], -1.0);
        assert_eq!(out[5], 0.0);
    }

    #[test]
    fn output_stays_in_range_and_keeps_sign() {
        let values = [-128.0, -3.5, -0.001, 0.0, 0.25, 17.0, 128.0, 1e6];
        for &(speed, offset) in &[(1.0, 0.0), (2.5, 0.3), (0.1, 0.9), (-1.0, 0.0)] {
            let out = normalize(&values, speed, offset);
            for (before, after) in values.iter().zip(&out) {
                assert!(*after >= -1.0 && *after <= 1.0, "{} -> {}", before, after);
                if *before < 0.0 {
                    assert!(*after <= 0.0);
                } else {
                    assert!(*after >= 0.0);
                }
            }
        }
    }

    #[test]
    fn constant_halves_go_to_extremes() {
        let out = normalize(&[-50.0, -50.0, 3.0, 3.0], 1.0, 0.0);
        assert_eq!(out, vec![-1.0, -1.0, 1.0, 1.0]);
    }

    #[test]
    fn offset_rotates() {
        let out = normalize(&[0.0, 1.0, 2.0, 4.0], 1.0, 0.25);
        assert_eq!(out, vec![0.25, 0.5, 0.75, 0.25]);
    }

    #[test]
    fn backwards_rotation_keeps_inside_negative() {
        let out = normalize(&[-2.0, -1.5, -1.0, 1.0, 2.0], 1.0, -1e-20);
        assert!(out[..3].iter().all(|&v| v < 0.0), "{:?}", out);
        assert_eq!(out[0], -1.0);
        let out = normalize(&[-2.0, -1.5, -1.0, 1.0, 2.0], -1.0, 0.0);
        assert!(out[..3].iter().all(|&v| v < 0.0), "{:?}", out);
        assert!(out[3..].iter().all(|&v| v >= 0.0 && v < 1.0), "{:?}", out);
    }

    #[test]
    fn non_finite_values() {
        let out = normalize(
            &[std::f64::NAN, std::f64::INFINITY, std::f64::NEG_INFINITY, 1.0, 2.0],
            1.0,
            0.0,
        );
        assert!(out[0].is_nan());
        assert_eq!(out[1], 1.0);
        assert_eq!(out[2], -1.0);
        assert_eq!(out[3], 0.0);
    }

    #[test]
    fn empty_halves_are_fine() {
        assert_eq!(normalize(&[1.0, 2.0, 3.0], 1.0, 0.0), vec![0.0, 0.5, 0.0]);
        assert_eq!(normalize(&[-1.0, -3.0], 1.0, 0.0), vec![-1.0, -1.0]);
    }
}
