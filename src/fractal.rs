// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything one render needs, and the pipeline that runs it:
//! escape values, preprocessing, normalization, then color.

use num::Complex;

use camera::Camera;
use colorize::{colorize, loop_required, Image};
use colors::{Color, BLACK, WHITE};
use compute::EscapeRenderer;
use error::BrocoliError;
use escape::{check_limits, Coloration, DEFAULT_BOUND, DEFAULT_LIMIT};
use gradient::GradientCache;
use grid::Grid;
use normalize::signed_normalize;
use preprocess::preprocess;

/// The number of entries in the gradient table unless asked otherwise.
pub const DEFAULT_COLOR_COUNT: usize = 1000;

/// The parameters of a render.  Built once, then only read.
#[derive(Clone, Debug, PartialEq)]
pub struct FractalParameters {
    /// The view.
    pub camera: Camera,
    /// How orbits are turned into values.
    pub kind: Coloration,
    /// Maximum number of iterations per point.
    pub limit: usize,
    /// Escape radius.
    pub bound: f64,
    /// Draw the Julia set of this parameter instead of the Mandelbrot set.
    pub julia: Option<Complex<f64>>,
    /// Equal-count bins for the escaped values; 1 disables binning.
    pub bins: usize,
    /// Replace values by their quantile rank.
    pub normalize_quantiles: bool,
    /// Signed power applied after the other preprocessing.
    pub steps_power: f64,
    /// The anchors of the gradient.
    pub gradient: Vec<Color>,
    /// Number of entries in the gradient table.
    pub color_count: usize,
    /// Bring the gradient back to its first color.
    pub gradient_loop: bool,
    /// How many times the gradient is repeated over the value range.
    pub gradient_speed: f64,
    /// Rotation of the gradient, as a fraction of its length.
    pub gradient_offset: f64,
    /// The color of every point inside the set, if any.
    pub inside_color: Option<Color>,
}

impl FractalParameters {
    /// Smooth escape time through a black to white gradient.
    pub fn new(camera: Camera) -> FractalParameters {
        FractalParameters {
            camera,
            kind: Coloration::SmoothTime,
            limit: DEFAULT_LIMIT,
            bound: DEFAULT_BOUND,
            julia: None,
            bins: 1,
            normalize_quantiles: false,
            steps_power: 1.0,
            gradient: vec![BLACK, WHITE],
            color_count: DEFAULT_COLOR_COUNT,
            gradient_loop: false,
            gradient_speed: 1.0,
            gradient_offset: 0.0,
            inside_color: None,
        }
    }

    /// Refuse the configuration before any work is done.
    pub fn validate(&self) -> Result<(), BrocoliError> {
        if self.camera.is_empty() {
            return Err(BrocoliError::InvalidSize(self.camera.size.0, self.camera.size.1));
        }
        if !(self.camera.height > 0.0) || !self.camera.height.is_finite() {
            return Err(BrocoliError::InvalidHeight(self.camera.height));
        }
        check_limits(self.limit, self.bound)?;
        if self.bins < 1 {
            return Err(BrocoliError::InvalidBins);
        }
        if self.gradient.len() < 2 {
            return Err(BrocoliError::TooFewAnchors(self.gradient.len()));
        }
        if self.color_count < 1 {
            return Err(BrocoliError::InvalidColorCount);
        }
        Ok(())
    }

    /// Whether the gradient table has to be built looping.
    pub fn looped(&self) -> bool {
        loop_required(self.gradient_loop, self.gradient_speed, self.gradient_offset)
    }

    /// The raw escape values.
    pub fn compute(&self, threads: usize) -> Result<Grid<f64>, BrocoliError> {
        self.validate()?;
        EscapeRenderer::new(self.camera, self.kind, self.limit, self.bound, self.julia)?
            .render(threads)
    }

    /// Binning, quantiles and power, as configured.
    pub fn preprocess(&self, grid: Grid<f64>) -> Grid<f64> {
        preprocess(grid, self.bins, self.normalize_quantiles, self.steps_power)
    }

    /// Into `[-1, 1]`, stretched and rotated by the gradient controls.
    pub fn normalize(&self, grid: Grid<f64>) -> Grid<f64> {
        signed_normalize(grid, self.gradient_speed, self.gradient_offset)
    }

    /// Color a normalized grid, reusing the cached gradient table when
    /// the coloring controls have not changed.
    pub fn colorize(
        &self,
        grid: &Grid<f64>,
        cache: &mut GradientCache,
    ) -> Result<Image, BrocoliError> {
        let table = cache.get(&self.gradient, self.color_count, self.looped())?;
        Ok(colorize(grid, table, self.inside_color))
    }

    /// The whole pipeline.
    pub fn render(&self, threads: usize) -> Result<Image, BrocoliError> {
        let raw = self.compute(threads)?;
        let grid = self.normalize(self.preprocess(raw));
        self.colorize(&grid, &mut GradientCache::new())
    }
}
