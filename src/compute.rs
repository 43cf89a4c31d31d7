// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape value computation.
//!
//! Every pixel is mapped to its complex number, iterated with the
//! selected escape function, and the result written to the matching
//! cell of the output grid.  No pixel depends on any other, so the
//! rows of the grid are handed out to a pool of workers, each of
//! which writes only the row it was given.  The result does not
//! depend on the number of workers or on how they were scheduled.

extern crate crossbeam;

use num::Complex;
use num_cpus;
use std::iter::Enumerate;
use std::slice::ChunksMut;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use camera::{Camera, Pixel};
use error::BrocoliError;
use escape::{check_limits, Coloration, EscapeFn};
use grid::Grid;

type RowQueue<'a> = Arc<Mutex<Enumerate<ChunksMut<'a, f64>>>>;

/// Takes a camera, a coloration kind and the iteration limits, and
/// computes one escape value per pixel.  Once built, the renderer is
/// not mutable.
#[derive(Debug)]
pub struct EscapeRenderer {
    camera: Camera,
    kind: Coloration,
    limit: usize,
    bound: f64,
    julia: Option<Complex<f64>>,
}

impl EscapeRenderer {
    /// Requires the camera, the kind of escape function, the maximum
    /// number of iterations per point and the escape bound.  Without a
    /// Julia seed every pixel is the parameter of its own orbit, which
    /// draws the Mandelbrot set.
    pub fn new(
        camera: Camera,
        kind: Coloration,
        limit: usize,
        bound: f64,
        julia: Option<Complex<f64>>,
    ) -> Result<Self, BrocoliError> {
        if camera.is_empty() {
            return Err(BrocoliError::InvalidSize(camera.size.0, camera.size.1));
        }
        check_limits(limit, bound)?;
        if bound <= 2.0 {
            warn!(
                "escape bound {} is not above 2, escaping orbits may be missed",
                bound
            );
        }
        Ok(EscapeRenderer {
            camera,
            kind,
            limit,
            bound,
            julia,
        })
    }

    /// The camera this renderer looks through.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    fn value_at(&self, escape: EscapeFn, pixel: &Pixel) -> f64 {
        let z0 = self.camera.pixel_to_complex(pixel);
        let c = self.julia.unwrap_or(z0);
        escape(z0, c, self.limit, self.bound)
    }

    fn render_row(&self, escape: EscapeFn, row: usize, cells: &mut [f64]) {
        for (column, cell) in cells.iter_mut().enumerate() {
            *cell = self.value_at(escape, &Pixel(column, row));
        }
    }

    /// The main function for single-threaded implementations.
    pub fn render_single(&self) -> Grid<f64> {
        let escape = self.kind.escape_fn();
        let mut grid = Grid::new(self.camera.size.0, self.camera.size.1, 0.0);
        for pixel in self.camera.pixels() {
            grid[pixel] = self.value_at(escape, &pixel);
        }
        grid
    }

    /// A multi-threaded version of the render function that takes a
    /// thread count.  Workers pull the next unrendered row off a shared
    /// queue until there are none left.
    pub fn render(&self, threads: usize) -> Result<Grid<f64>, BrocoliError> {
        let threads = threads.max(1);
        let escape = self.kind.escape_fn();
        let started = Instant::now();
        debug!(
            "rendering {} over {}x{} pixels, limit {}, bound {}, {} threads",
            self.kind, self.camera.size.0, self.camera.size.1, self.limit, self.bound, threads
        );

        let mut grid = Grid::new(self.camera.size.0, self.camera.size.1, 0.0);
        {
            let rows: RowQueue = Arc::new(Mutex::new(grid.rows_mut().enumerate()));
            crossbeam::scope(|spawner| {
                for _ in 0..threads {
                    let rows = rows.clone();
                    spawner.spawn(move |_| loop {
                        let row = match rows.lock() {
                            Ok(mut rows) => rows.next(),
                            Err(_) => None,
                        };
                        match row {
                            Some((y, cells)) => self.render_row(escape, y, cells),
                            None => {
                                break;
                            }
                        }
                    });
                }
            })
            .map_err(|_| BrocoliError::WorkerPanic)?;
        }

        let elapsed = started.elapsed();
        info!(
            "computed {} escape values in {}.{:03}s",
            grid.len(),
            elapsed.as_secs(),
            elapsed.subsec_millis()
        );
        Ok(grid)
    }
}

/// Compute the escape values of every pixel the camera sees, with one
/// worker per CPU.
pub fn compute(
    camera: &Camera,
    kind: Coloration,
    limit: usize,
    bound: f64,
    julia: Option<Complex<f64>>,
) -> Result<Grid<f64>, BrocoliError> {
    EscapeRenderer::new(*camera, kind, limit, bound, julia)?.render(num_cpus::get())
}
