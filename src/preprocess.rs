// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reshaping the distribution of escape values before they are
//! normalized.  Every transform here is monotonic (`a <= b` implies
//! `f(a) <= f(b)`) and keeps inside values negative and escaped values
//! non-negative.  Non-finite values are left where they are.

use std::cmp::Ordering;

use grid::Grid;

/// The number of quantiles used by [`preprocess`].
pub const QUANTILE_RESOLUTION: usize = 1000;

fn sorted<I: Iterator<Item = f64>>(values: I) -> Vec<f64> {
    let mut values: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    values
}

/// The number of entries of the sorted slice `steps` that are at most
/// `value`.
fn count_at_most(steps: &[f64], value: f64) -> usize {
    steps.partition_point(|&step| step <= value)
}

/// Spread the escaped values so that `nb` equally populated parts each
/// cover a range of exactly one.  For example, with two bins half of
/// the escaped pixels end up in `[0, 1]` and the other half in `[1, 2]`.
/// Inside values are untouched.  When there are not more escaped values
/// than bins there is nothing to spread and the grid is returned as is.
pub fn do_bins(mut grid: Grid<f64>, nb: usize) -> Grid<f64> {
    if nb <= 1 {
        return grid;
    }
    let values = sorted(grid.values().iter().cloned().filter(|&v| v >= 0.0));
    if values.len() <= nb {
        debug!(
            "only {} escaped values for {} bins, skipping",
            values.len(),
            nb
        );
        return grid;
    }

    let last = values.len() - 1;
    let boundaries: Vec<f64> = (0..=nb)
        .map(|part| values[(part * values.len() / nb).min(last)])
        .collect();

    for v in grid.values_mut() {
        if !(*v >= 0.0) || !v.is_finite() {
            continue;
        }
        // The last part whose lower boundary is not above the value.
        let part = count_at_most(&boundaries, *v).max(1).min(nb) - 1;
        let (low, high) = (boundaries[part], boundaries[part + 1]);
        let fraction = if high > low { (*v - low) / (high - low) } else { 0.0 };
        *v = part as f64 + fraction.min(1.0);
    }
    grid
}

/// Replace every value by its rank among `nb` quantiles of the whole
/// grid, so that every color ends up covering about the same area.  The
/// rank of the boundary between inside and escaped values is subtracted,
/// which keeps inside ranks at or below -1 and escaped ranks at or above
/// 0.
pub fn normalize_quantiles(mut grid: Grid<f64>, nb: usize) -> Grid<f64> {
    let values = sorted(grid.values().iter().cloned());
    if values.is_empty() || nb == 0 {
        return grid;
    }
    let steps: Vec<f64> = (0..nb).map(|part| values[part * values.len() / nb]).collect();
    let inside_steps = steps.iter().filter(|&&step| step < 0.0).count() as f64;

    for v in grid.values_mut() {
        if !v.is_finite() {
            continue;
        }
        let rank = count_at_most(&steps, *v) as f64;
        *v = if *v < 0.0 {
            rank - inside_steps - 1.0
        } else {
            rank - inside_steps
        };
    }
    grid
}

/// Raise every value to `power`, keeping its sign.
pub fn signed_power(mut grid: Grid<f64>, power: f64) -> Grid<f64> {
    for v in grid.values_mut() {
        if *v != 0.0 {
            *v = v.signum() * v.abs().powf(power);
        }
    }
    grid
}

/// Run the enabled transforms in their fixed order: binning, quantile
/// normalization, then the signed power.  A power of 0 or 1 is skipped.
pub fn preprocess(
    grid: Grid<f64>,
    bins: usize,
    normalize: bool,
    steps_power: f64,
) -> Grid<f64> {
    let mut grid = grid;
    if bins > 1 {
        debug!("binning escape values into {} parts", bins);
        grid = do_bins(grid, bins);
    }
    if normalize {
        debug!("normalizing into {} quantiles", QUANTILE_RESOLUTION);
        grid = normalize_quantiles(grid, QUANTILE_RESOLUTION);
    }
    if steps_power != 0.0 && steps_power != 1.0 {
        debug!("raising escape values to the power {}", steps_power);
        grid = signed_power(grid, steps_power);
    }
    grid
}
