// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The last stage: looking every normalized value up in the gradient.

use image::{Rgb, RgbImage};

use colors::Color;
use grid::Grid;

/// The finished picture, one color per pixel.
pub type Image = Grid<Color>;

/// A gradient that is stretched or rotated has to loop, or the wrap
/// point of the rotation shows up as a hard edge.
pub fn loop_required(looped: bool, speed: f64, offset: f64) -> bool {
    looped || speed != 1.0 || offset != 0.0
}

#[inline]
fn gradient_index(v: f64, len: usize) -> usize {
    if !v.is_finite() {
        return 0;
    }
    let last = len - 1;
    let index = (v.abs() * last as f64).round();
    if index >= last as f64 {
        last
    } else {
        index as usize
    }
}

/// Color a normalized grid.  The magnitude of each value picks the
/// entry of `gradient`; when `inside_color` is set, every negative
/// value is painted with it instead.  An empty gradient paints
/// everything black.
pub fn colorize(grid: &Grid<f64>, gradient: &[Color], inside_color: Option<Color>) -> Image {
    if gradient.is_empty() {
        return grid.map(|_| Color(0, 0, 0));
    }
    grid.map(|&v| match inside_color {
        Some(inside) if v < 0.0 => inside,
        _ => gradient[gradient_index(v, gradient.len())],
    })
}

impl Grid<Color> {
    /// Copy into an `image` buffer, ready to be encoded.
    pub fn to_rgb_image(&self) -> RgbImage {
        let width = self.width();
        RgbImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            let Color(r, g, b) = self.values()[y as usize * width + x as usize];
            Rgb([r, g, b])
        })
    }
}
