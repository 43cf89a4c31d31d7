// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The configuration errors a render can be refused for.  Numeric
//! trouble inside a render (constant grids, NaN orbits) is never an
//! error; every stage has a defined answer for it.

/// Everything that can make a render refuse to start.
#[derive(Debug, Fail, PartialEq)]
pub enum BrocoliError {
    /// The pixel grid has a zero dimension.
    #[fail(display = "image size must be positive, got {}x{}", _0, _1)]
    InvalidSize(usize, usize),

    /// The camera's complex height is zero, negative or not finite.
    #[fail(display = "camera height must be positive, got {}", _0)]
    InvalidHeight(f64),

    /// The escape bound is zero, negative or not finite.
    #[fail(display = "escape bound must be positive, got {}", _0)]
    InvalidBound(f64),

    /// The iteration limit is zero.
    #[fail(display = "iteration limit must be at least 1")]
    InvalidLimit,

    /// A gradient needs something to interpolate between.
    #[fail(display = "a gradient needs at least two colors, got {}", _0)]
    TooFewAnchors(usize),

    /// A gradient lookup table with no entries.
    #[fail(display = "color count must be positive")]
    InvalidColorCount,

    /// Binning into zero parts.
    #[fail(display = "bin count must be at least 1")]
    InvalidBins,

    /// Neither a hex triple nor a known color name.
    #[fail(display = "could not parse color {:?}", _0)]
    InvalidColor(String),

    /// A buffer handed to `Grid::from_vec` of the wrong length.
    #[fail(display = "{} values do not fill a {}x{} grid", _0, _1, _2)]
    GridShape(usize, usize, usize),

    /// One of the render threads died.
    #[fail(display = "a render worker panicked")]
    WorkerPanic,
}
