//! Boundary regridding: growing and trimming the domain at its ends.
//!
//! Each call evaluates, in order, right addition, left addition, right
//! removal and left removal. Additions append up to `add_point_count` points
//! at the spacing of the end interval and extend the solution as a constant.
//! Removals delete the end point while the end region is flat, at most
//! `add_point_count` times, and skip a side that grew in the same call.

use super::adapt::range;
use super::remap::WorkingGrid;
use super::{Curvature, Mesh, Side};
use crate::debug_invariants::check_len;
use crate::grid_error::GridError;

/// Boundary removal never shrinks the grid below this many points.
pub const MIN_REGRID_POINTS: usize = 5;

/// Extent of the heat-release zone of an unstrained flame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlameZone {
    /// First coordinate where the heat release is significant.
    pub x_start: f64,
    /// Last coordinate where the heat release is significant.
    pub x_end: f64,
    /// Flame thickness used to scale the downstream region.
    pub thickness: f64,
}

impl FlameZone {
    /// Locate the region where `qdot >= threshold * max(qdot)`.
    ///
    /// Returns `None` when there is no positive heat release.
    pub fn locate(x: &[f64], qdot: &[f64], threshold: f64) -> Option<Self> {
        let q_max = qdot.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !(q_max > 0.0) {
            return None;
        }
        let cutoff = threshold * q_max;
        let first = qdot.iter().position(|&q| q >= cutoff)?;
        let last = qdot.iter().rposition(|&q| q >= cutoff)?;
        let mut thickness = x[last] - x[first];
        if thickness <= 0.0 {
            // single significant point: use its dual cell width
            let lo = first.saturating_sub(1);
            let hi = (last + 1).min(x.len() - 1);
            thickness = 0.5 * (x[hi] - x[lo]);
        }
        Some(Self {
            x_start: x[first],
            x_end: x[last],
            thickness,
        })
    }

    /// Distance required between the end of the zone and the right boundary.
    pub fn downstream_width(&self, width: f64) -> f64 {
        width * self.thickness
    }
}

impl Mesh {
    /// Add and remove points at the two ends of the domain, then re-map `y`
    /// and the damping lengths onto the new grid.
    ///
    /// Returns `true` when the point set changed.
    pub fn regrid(&mut self, y: &mut [Vec<f64>]) -> Result<bool, GridError> {
        self.regrid_with(y, None)
    }

    /// Variant of [`Mesh::regrid`] for unstrained flames: the right boundary
    /// is additionally kept `unstrained_downstream_width` flame thicknesses
    /// behind the heat-release zone described by `qdot`, which is re-mapped
    /// together with `y`.
    pub fn regrid_unstrained(
        &mut self,
        y: &mut [Vec<f64>],
        qdot: &mut Vec<f64>,
    ) -> Result<bool, GridError> {
        check_len("qdot", self.n_points(), qdot.len())?;
        self.regrid_with(y, Some(qdot))
    }

    fn regrid_with(
        &mut self,
        y: &mut [Vec<f64>],
        qdot: Option<&mut Vec<f64>>,
    ) -> Result<bool, GridError> {
        self.check_solution(y)?;
        self.check_center_spacing()?;
        let n_adapt = self.n_adapt(y.len());
        let flame = qdot
            .as_deref()
            .and_then(|q| FlameZone::locate(&self.x, q, self.options.boundary_tol));
        let mut work = WorkingGrid::new(&self.x, &y[..n_adapt], &self.damp_val);

        let right_added = self.add_right(&mut work, flame.as_ref());
        let left_added = self.add_left(&mut work)?;
        let right_removed = if right_added == 0 {
            self.remove_end(&mut work, Side::Right, flame.as_ref())
        } else {
            0
        };
        let left_removed = if left_added == 0 {
            self.remove_end(&mut work, Side::Left, None)
        } else {
            0
        };

        let changed = right_added + left_added + right_removed + left_removed > 0;
        if changed {
            if let Some(q) = qdot {
                *q = work.plan.apply(q)?;
            }
            self.commit(work, y)?;
            log::debug!(
                "regrid: left +{left_added}/-{left_removed}, right +{right_added}/-{right_removed}, now {} points",
                self.n_points()
            );
        }
        self.finish_update(changed);
        Ok(changed)
    }

    /// True when some voting variable jumps by more than `boundary_tol` of its
    /// range across the end interval at `side`.
    fn end_is_steep(&self, work: &WorkingGrid, side: Side) -> bool {
        let last = work.len() - 1;
        let (end, inner) = match side {
            Side::Left => (0, 1),
            Side::Right => (last, last - 1),
        };
        work.values.iter().enumerate().any(|(k, v)| {
            let value_range = range(v);
            self.votes(side, k)
                && value_range >= self.options.absvtol
                && value_range > 0.0
                && (v[end] - v[inner]).abs() > self.options.boundary_tol * value_range
        })
    }

    /// True when every voting variable is flat to `boundary_tol_rm` over the
    /// two end intervals at `side`, and at least one voting variable varies.
    fn end_is_flat(&self, work: &WorkingGrid, side: Side) -> bool {
        let last = work.len() - 1;
        let (end, inner) = match side {
            Side::Left => (0, 2),
            Side::Right => (last, last - 2),
        };
        let mut judged = false;
        for (k, v) in work.values.iter().enumerate() {
            let value_range = range(v);
            if !self.votes(side, k) || value_range < self.options.absvtol || value_range == 0.0 {
                continue;
            }
            judged = true;
            if (v[end] - v[inner]).abs() >= self.options.boundary_tol_rm * value_range {
                return false;
            }
        }
        judged
    }

    fn add_right(&self, work: &mut WorkingGrid, flame: Option<&FlameZone>) -> usize {
        let last = work.len() - 1;
        let short_downstream = flame.is_some_and(|zone| {
            work.x[last] - zone.x_end
                < zone.downstream_width(self.options.unstrained_downstream_width)
        });
        if !(short_downstream || self.end_is_steep(work, Side::Right)) {
            return 0;
        }
        for _ in 0..self.options.add_point_count {
            let last = work.len() - 1;
            let x_new = work.x[last] + work.spacing(last - 1);
            work.extend(Side::Right, x_new);
        }
        self.options.add_point_count
    }

    /// Grow the left end. Twin and curved flames stop at the symmetry plane or
    /// axis: a point that would land closer to it than `axis_floor` is placed
    /// on it instead. An end point stranded inside that floor cannot move and
    /// is reported.
    fn add_left(&self, work: &mut WorkingGrid) -> Result<usize, GridError> {
        let opts = &self.options;
        if opts.fixed_left_loc || !self.end_is_steep(work, Side::Left) {
            return Ok(0);
        }
        let bounded_at_axis = opts.twin_flame || opts.curved_flame;
        let axis_floor = if opts.curvature() == Curvature::Cylindrical {
            opts.grid_min.max(opts.center_grid_min)
        } else {
            opts.grid_min
        };
        if bounded_at_axis && work.x[0] > 0.0 && work.x[0] < axis_floor {
            return Err(GridError::GeometricInfeasibility(format!(
                "left end at x = {} is steep but closer to the axis than {axis_floor}",
                work.x[0]
            )));
        }
        let mut added = 0;
        for _ in 0..opts.add_point_count {
            let mut x_new = work.x[0] - work.spacing(0);
            if bounded_at_axis && x_new < axis_floor {
                if work.x[0] >= axis_floor {
                    x_new = 0.0;
                } else {
                    break;
                }
            }
            work.extend(Side::Left, x_new);
            added += 1;
            if bounded_at_axis && x_new == 0.0 {
                break;
            }
        }
        Ok(added)
    }

    /// Whether regridding may delete the end point at `side`.
    fn end_removable(&self, side: Side) -> bool {
        let opts = &self.options;
        let (bc, burned_side) = match side {
            Side::Left => (opts.left_bc, !opts.unburned_left),
            Side::Right => (opts.right_bc, opts.unburned_left),
        };
        if !bc.allows_removal() || (burned_side && opts.fixed_burned_val) {
            return false;
        }
        side == Side::Right || !(opts.fixed_left_loc || opts.twin_flame || opts.curved_flame)
    }

    fn remove_end(&self, work: &mut WorkingGrid, side: Side, flame: Option<&FlameZone>) -> usize {
        if !self.end_removable(side) {
            return 0;
        }
        let mut removed = 0;
        while removed < self.options.add_point_count && work.len() > MIN_REGRID_POINTS {
            if !self.end_is_flat(work, side) {
                break;
            }
            let last = work.len() - 1;
            if let Some(zone) = flame {
                let room = work.x[last - 1] - zone.x_end;
                if room < zone.downstream_width(self.options.unstrained_downstream_width) {
                    break;
                }
            }
            match side {
                Side::Left => work.remove(0),
                Side::Right => work.remove(last),
            }
            removed += 1;
        }
        removed
    }
}
