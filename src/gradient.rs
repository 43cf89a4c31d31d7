// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Expanding a handful of anchor colors into a dense lookup table.
//!
//! The anchors are spread evenly over `[0, 1]` and every entry of the
//! table is interpolated between the two anchors around it.  Anchors of
//! similar hue and brightness are mixed in HSV space, which keeps the
//! saturation up in the middle of the segment; anything further apart
//! is mixed channel by channel, since sweeping the hue across half the
//! circle paints colors that belong to neither end.

use colors::{Color, Hsv};
use error::BrocoliError;

/// Anchors whose hues are closer than this are mixed in HSV.
const MAX_HSV_HUE_DISTANCE: f64 = 1.0 / 3.0;

/// Anchors whose values are closer than this are mixed in HSV.
const MAX_HSV_VALUE_DISTANCE: f64 = 1.0 / 2.0;

fn mix(a: Hsv, b: Hsv, f: f64) -> Color {
    if a.hue_distance(b) < MAX_HSV_HUE_DISTANCE && (a.v - b.v).abs() < MAX_HSV_VALUE_DISTANCE {
        a.mix(b, f).to_color()
    } else {
        a.to_color().mix(b.to_color(), f)
    }
}

/// Build a table of `steps` colors going through every anchor in order.
/// When `looped`, the table comes back to the first anchor at the end,
/// so that its first and last entries are the same color.
pub fn build_gradient(
    anchors: &[Color],
    steps: usize,
    looped: bool,
) -> Result<Vec<Color>, BrocoliError> {
    if anchors.len() < 2 {
        return Err(BrocoliError::TooFewAnchors(anchors.len()));
    }
    if steps == 0 {
        return Err(BrocoliError::InvalidColorCount);
    }

    let mut colors: Vec<Hsv> = anchors.iter().map(|c| c.to_hsv()).collect();
    if looped {
        colors.push(colors[0]);
    }
    if steps == 1 {
        return Ok(vec![colors[0].to_color()]);
    }

    let segments = colors.len() - 1;
    let mut segment = 1;
    let table = (0..steps)
        .map(|i| {
            let pos = i as f64 / (steps - 1) as f64;
            while segment < segments && pos > segment as f64 / segments as f64 {
                segment += 1;
            }
            let f = pos * segments as f64 - (segment - 1) as f64;
            mix(colors[segment - 1], colors[segment], f)
        })
        .collect();
    Ok(table)
}

/// Remembers the last table built, so that recoloring with the same
/// gradient does not interpolate it again.
#[derive(Debug, Default)]
pub struct GradientCache {
    key: Option<(Vec<Color>, usize, bool)>,
    table: Vec<Color>,
}

impl GradientCache {
    /// An empty cache.
    pub fn new() -> GradientCache {
        GradientCache::default()
    }

    /// The table for these inputs, built only if they differ from the
    /// previous call's.
    pub fn get(
        &mut self,
        anchors: &[Color],
        steps: usize,
        looped: bool,
    ) -> Result<&[Color], BrocoliError> {
        let fresh = match self.key {
            Some((ref cached, cached_steps, cached_loop)) => {
                cached.as_slice() == anchors && cached_steps == steps && cached_loop == looped
            }
            None => false,
        };
        if !fresh {
            debug!(
                "building a {} color gradient from {} anchors",
                steps,
                anchors.len()
            );
            self.table = build_gradient(anchors, steps, looped)?;
            self.key = Some((anchors.to_vec(), steps, looped));
        }
        Ok(&self.table)
    }
}
