#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape time fractal renderer
//!
//! The Mandelbrot set is the set of complex numbers `c` for which the
//! orbit of `z -> z * z + c`, starting from zero, stays bounded.  Julia
//! sets fix `c` and vary the starting point instead.  Neither can be
//! decided exactly for a point, so every pixel is iterated up to a
//! limit and the orbit is summarized by a single "escape value":
//! negative when the orbit never left the bound, positive when it did,
//! with a magnitude that depends on the coloration picked.
//!
//! Those values are then reshaped (binning, quantiles, a signed power),
//! normalized into `[-1, 1]` one sign at a time, and looked up in a
//! gradient of colors interpolated between a handful of anchors.
//!
//! ```no_run
//! # extern crate brocoli;
//! # extern crate num;
//! use brocoli::{Camera, FractalParameters, Size};
//! use num::Complex;
//!
//! let camera = Camera::new(Size(800, 600), Complex::new(-0.75, 0.0), 3.0).unwrap();
//! let image = FractalParameters::new(camera).render(4).unwrap();
//! image.to_rgb_image().save("mandelbrot.png").unwrap();
//! ```

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod camera;
pub mod colorize;
pub mod colors;
pub mod compute;
pub mod error;
pub mod escape;
pub mod fractal;
pub mod gradient;
pub mod grid;
pub mod normalize;
pub mod preprocess;

pub use camera::{Camera, Pixel, Size};
pub use colorize::{colorize, loop_required, Image};
pub use colors::{parse_gradient, Color, Hsv};
pub use compute::{compute, EscapeRenderer};
pub use error::BrocoliError;
pub use escape::Coloration;
pub use fractal::FractalParameters;
pub use gradient::{build_gradient, GradientCache};
pub use grid::Grid;
pub use normalize::signed_normalize;
pub use preprocess::{do_bins, normalize_quantiles, preprocess, signed_power};
