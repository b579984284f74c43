//! Interior grid adaptation.
//!
//! # Algorithm
//! One call to [`Mesh::adapt`] runs sweeps over a [`WorkingGrid`] until a
//! sweep changes nothing (at most [`MAX_ADAPT_SWEEPS`]). A sweep is:
//!
//! 1. an insertion pass over the intervals, left to right; a split interval
//!    is skipped past, so new points are judged in the next sweep;
//! 2. a removal pass over the interior points, left to right; after a
//!    removal the same index is examined again, now holding the next point.
//!    The removal pass never inserts.
//!
//! Value and derivative ranges are measured on the working grid at the start
//! of each pass, so a converged call leaves a grid on which a second call
//! finds nothing to do. Removal applies every insertion criterion scaled by
//! `rm_tol`, which keeps the two passes from undoing each other.

use super::geometry::{MIN_POINTS, centered_derivative};
use super::remap::WorkingGrid;
use super::{Curvature, Mesh};
use crate::grid_error::GridError;
use itertools::{Itertools, MinMaxResult};

/// Upper bound on insertion/removal sweeps within one call to [`Mesh::adapt`].
pub const MAX_ADAPT_SWEEPS: usize = 64;

/// Derivative ranges below this fraction of the largest derivative are round-off.
const DERIVATIVE_NOISE: f64 = 1e-9;

/// Why an interval was split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertReason {
    /// Jump in variable `k` exceeds `vtol`.
    Value(usize),
    /// Jump in the derivative of variable `k` exceeds `dvtol`.
    Derivative(usize),
    /// Spacing too wide for the local damping length.
    Damping,
    /// Spacing above `grid_max`.
    MaxSpacing,
    /// Spacing too large compared with a neighbouring interval.
    Uniformity,
}

/// Full range `max - min` of a variable; zero for an empty slice.
pub fn range(values: &[f64]) -> f64 {
    match values.iter().minmax() {
        MinMaxResult::NoElements | MinMaxResult::OneElement(_) => 0.0,
        MinMaxResult::MinMax(lo, hi) => hi - lo,
    }
}

/// Value and derivative scales of each adaptation variable on a working grid.
#[derive(Clone, Debug)]
struct Scales {
    value: Vec<f64>,
    /// Zero when the derivative criterion is inactive for that variable.
    derivative: Vec<f64>,
}

impl Scales {
    fn measure(work: &WorkingGrid, absvtol: f64) -> Self {
        let last = work.len() - 1;
        let length = work.x[last] - work.x[0];
        let mut value = Vec::with_capacity(work.values.len());
        let mut derivative = Vec::with_capacity(work.values.len());
        for v in &work.values {
            value.push(range(v));
            let dv: Vec<f64> = (1..last).map(|j| centered_derivative(&work.x, v, j)).collect();
            let dv_range = range(&dv);
            let dv_max = dv.iter().fold(0.0_f64, |m, d| m.max(d.abs()));
            let active = dv_range > absvtol / length && dv_range > DERIVATIVE_NOISE * dv_max;
            derivative.push(if active { dv_range } else { 0.0 });
        }
        Self { value, derivative }
    }
}

impl Mesh {
    /// Insert and remove interior points so that every adaptation variable is
    /// resolved to its tolerances, then re-map `y` (one array per variable,
    /// one entry per point) and the damping lengths onto the new grid.
    ///
    /// Returns `true` when the point set changed.
    pub fn adapt(&mut self, y: &mut [Vec<f64>]) -> Result<bool, GridError> {
        self.check_solution(y)?;
        self.check_center_spacing()?;
        let n_adapt = self.n_adapt(y.len());
        let mut work = WorkingGrid::new(&self.x, &y[..n_adapt], &self.damp_val);

        let mut inserted = 0;
        let mut removed = 0;
        let mut converged = false;
        for _ in 0..MAX_ADAPT_SWEEPS {
            let added = self.insertion_pass(&mut work);
            let dropped = self.removal_pass(&mut work);
            inserted += added;
            removed += dropped;
            if added == 0 && dropped == 0 {
                converged = true;
                break;
            }
        }
        if !converged {
            log::warn!(
                "adapt: grid still changing after {MAX_ADAPT_SWEEPS} sweeps ({} points)",
                work.len()
            );
        }

        let changed = !work.plan.is_identity();
        if changed {
            self.commit(work, y)?;
            log::debug!(
                "adapt: inserted {inserted}, removed {removed}, now {} points",
                self.n_points()
            );
        }
        self.finish_update(changed);
        Ok(changed)
    }

    fn insertion_pass(&self, work: &mut WorkingGrid) -> usize {
        let scales = Scales::measure(work, self.options.absvtol);
        let mut inserted = 0;
        let mut j = 0;
        while j + 1 < work.len() {
            let Some(reason) = self.insertion_reason(work, &scales, j) else {
                j += 1;
                continue;
            };
            if self.insertion_blocked(work, j) {
                log::trace!("adapt: {reason:?} at interval {j} blocked by minimum spacing");
                j += 1;
                continue;
            }
            log::trace!("adapt: split interval {j} at x = {} ({reason:?})", work.x[j]);
            work.insert_midpoint(j);
            inserted += 1;
            j += 2;
        }
        inserted
    }

    fn insertion_reason(
        &self,
        work: &WorkingGrid,
        scales: &Scales,
        j: usize,
    ) -> Option<InsertReason> {
        let opts = &self.options;
        let last = work.len() - 1;
        let h = work.spacing(j);

        for (k, v) in work.values.iter().enumerate() {
            let value_range = scales.value[k];
            if value_range < opts.absvtol || value_range == 0.0 {
                continue;
            }
            if (v[j + 1] - v[j]).abs() > self.vtol(k) * value_range {
                return Some(InsertReason::Value(k));
            }
            let dv_range = scales.derivative[k];
            if dv_range > 0.0 && j > 0 && j + 1 < last {
                let jump = (centered_derivative(&work.x, v, j + 1)
                    - centered_derivative(&work.x, v, j))
                .abs();
                if jump > self.dvtol(k) * dv_range {
                    return Some(InsertReason::Derivative(k));
                }
            }
        }

        if h > opts.damp_const * work.damp[j].min(work.damp[j + 1]) {
            return Some(InsertReason::Damping);
        }
        if h > opts.grid_max {
            return Some(InsertReason::MaxSpacing);
        }
        if (j > 0 && h > opts.uniformity_tol * work.spacing(j - 1))
            || (j + 1 < last && h > opts.uniformity_tol * work.spacing(j + 1))
        {
            return Some(InsertReason::Uniformity);
        }
        None
    }

    fn insertion_blocked(&self, work: &WorkingGrid, j: usize) -> bool {
        let half = 0.5 * work.spacing(j);
        if half < self.options.grid_min {
            return true;
        }
        self.options.curvature() == Curvature::Cylindrical
            && j == 0
            && work.x[0] <= 0.0
            && half < self.options.center_grid_min
    }

    fn removal_pass(&self, work: &mut WorkingGrid) -> usize {
        let scales = Scales::measure(work, self.options.absvtol);
        let mut removed = 0;
        let mut j = 1;
        while j + 1 < work.len() && work.len() > MIN_POINTS {
            if self.removable(work, &scales, j) {
                log::trace!("adapt: remove point {j} at x = {}", work.x[j]);
                work.remove(j);
                removed += 1;
            } else {
                j += 1;
            }
        }
        removed
    }

    fn removable(&self, work: &WorkingGrid, scales: &Scales, j: usize) -> bool {
        let opts = &self.options;
        let last = work.len() - 1;
        let merged = work.x[j + 1] - work.x[j - 1];

        for (k, v) in work.values.iter().enumerate() {
            let value_range = scales.value[k];
            if value_range < opts.absvtol || value_range == 0.0 {
                continue;
            }
            if (v[j + 1] - v[j - 1]).abs() > opts.rm_tol * self.vtol(k) * value_range {
                return false;
            }
            let dv_range = scales.derivative[k];
            if dv_range > 0.0 && j > 1 && j + 1 < last {
                let jump = (centered_derivative(&work.x, v, j + 1)
                    - centered_derivative(&work.x, v, j - 1))
                .abs();
                if jump > opts.rm_tol * self.dvtol(k) * dv_range {
                    return false;
                }
            }
        }

        // damping retention
        let damp = work.damp[j - 1].min(work.damp[j]).min(work.damp[j + 1]);
        if merged >= opts.rm_tol * opts.damp_const * damp {
            return false;
        }
        if merged > opts.grid_max {
            return false;
        }
        if j >= 2 && merged > opts.uniformity_tol * work.spacing(j - 2) {
            return false;
        }
        if j + 2 <= last && merged > opts.uniformity_tol * work.spacing(j + 1) {
            return false;
        }
        true
    }
}
