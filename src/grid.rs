// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A plain row-major buffer of per-pixel values.  Every stage of the
//! pipeline owns the grid it is working on and hands it to the next
//! one; nothing is shared between stages.

use std::ops::{Index, IndexMut};
use std::slice::{Chunks, ChunksMut};

use camera::Pixel;
use error::BrocoliError;

/// A `width` x `height` array stored row after row, so the value of
/// pixel `(x, y)` lives at `y * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// A grid with every cell set to `fill`.
    pub fn new(width: usize, height: usize, fill: T) -> Grid<T> {
        Grid {
            width,
            height,
            data: vec![fill; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Wrap an existing row-major buffer.  The buffer must hold exactly
    /// `width * height` values.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Grid<T>, BrocoliError> {
        if data.len() != width * height {
            return Err(BrocoliError::GridShape(data.len(), width, height));
        }
        Ok(Grid {
            width,
            height,
            data,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The value at column `x`, row `y`, if it is inside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.data.get(y * self.width + x)
        } else {
            None
        }
    }

    /// Every value, row after row.
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// Every value, row after row, mutably.
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// The rows, top to bottom.
    pub fn rows(&self) -> Chunks<T> {
        self.data.chunks(self.width.max(1))
    }

    /// The rows, top to bottom, as disjoint mutable slices.  This is
    /// what lets the renderer hand one row to each worker.
    pub fn rows_mut(&mut self) -> ChunksMut<T> {
        self.data.chunks_mut(self.width.max(1))
    }

    /// Apply `f` to every cell, producing a grid of the same shape.
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Give the buffer back.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T> Index<Pixel> for Grid<T> {
    type Output = T;

    fn index(&self, pixel: Pixel) -> &T {
        &self.data[pixel.1 * self.width + pixel.0]
    }
}

impl<T> IndexMut<Pixel> for Grid<T> {
    fn index_mut(&mut self, pixel: Pixel) -> &mut T {
        &mut self.data[pixel.1 * self.width + pixel.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_rejects_wrong_length() {
        let grid = Grid::from_vec(3, 2, vec![0.0; 5]);
        assert_eq!(grid, Err(BrocoliError::GridShape(5, 3, 2)));
    }

    #[test]
    fn cells_are_row_major() {
        let grid = Grid::from_vec(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(grid[Pixel(0, 0)], 0);
        assert_eq!(grid[Pixel(2, 0)], 2);
        assert_eq!(grid[Pixel(0, 1)], 3);
        assert_eq!(grid.get(1, 1), Some(&4));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.rows().count(), 2);
    }

    #[test]
    fn map_keeps_shape() {
        let grid = Grid::new(4, 3, 2.0);
        let halved = grid.map(|v| v / 2.0);
        assert_eq!(halved.width(), 4);
        assert_eq!(halved.height(), 3);
        assert!(halved.values().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn rows_mut_are_disjoint() {
        let mut grid = Grid::new(2, 3, 0);
        for (y, row) in grid.rows_mut().enumerate() {
            for cell in row.iter_mut() {
                *cell = y;
            }
        }
        assert_eq!(grid.into_vec(), vec![0, 0, 1, 1, 2, 2]);
    }
}
