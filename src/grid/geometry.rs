//! Derived per-point geometry of a 1-D grid.
//!
//! # Layout
//! For a grid with points `x[0..=jj]`:
//!
//! - `hh`, `rphalf` have one entry per interval (`jj` entries);
//! - `x`, `r`, `dlj`, `cfm`, `cf`, `cfp` have one entry per point. The
//!   stencil arrays (`dlj`, `cfm`, `cf`, `cfp`) are zero at both ends.
//!
//! A [`GridGeometry`] is a snapshot: it is rebuilt from scratch by
//! [`GridGeometry::compute`] whenever the point set changes and never patched
//! in place.

use super::boundary::{BoundaryCondition, Curvature};
use crate::grid_error::GridError;

/// Smallest grid the adaptation and assembly stencils can work on.
pub const MIN_POINTS: usize = 3;

/// Weights `(cfm, cf, cfp)` of the centered first derivative at a point with
/// left spacing `hm` and right spacing `hp`. Exact for quadratics.
#[inline]
pub fn centered_weights(hm: f64, hp: f64) -> (f64, f64, f64) {
    let cfm = -hp / (hm * (hm + hp));
    let cf = (hp - hm) / (hm * hp);
    let cfp = hm / (hp * (hm + hp));
    (cfm, cf, cfp)
}

/// Centered first derivative of `v` at interior point `j` of `x`.
#[inline]
pub fn centered_derivative(x: &[f64], v: &[f64], j: usize) -> f64 {
    let (cfm, cf, cfp) = centered_weights(x[j] - x[j - 1], x[j + 1] - x[j]);
    cfm * v[j - 1] + cf * v[j] + cfp * v[j + 1]
}

/// Geometry snapshot handed to operator assembly.
#[derive(Clone, Debug, PartialEq)]
pub struct GridGeometry {
    pub x: Vec<f64>,
    pub hh: Vec<f64>,
    pub dlj: Vec<f64>,
    pub cfm: Vec<f64>,
    pub cf: Vec<f64>,
    pub cfp: Vec<f64>,
    pub r: Vec<f64>,
    pub rphalf: Vec<f64>,
    pub curvature: Curvature,
    pub left_bc: BoundaryCondition,
    pub right_bc: BoundaryCondition,
    /// Largest ratio between adjacent spacings, in either direction.
    pub max_spacing_ratio: f64,
}

impl GridGeometry {
    /// Derive the geometry of `x`.
    ///
    /// Fails when the points are not strictly increasing, when there are
    /// fewer than [`MIN_POINTS`], or when a cylindrical domain extends to
    /// negative radius.
    pub fn compute(
        x: &[f64],
        curvature: Curvature,
        left_bc: BoundaryCondition,
        right_bc: BoundaryCondition,
    ) -> Result<Self, GridError> {
        let n_points = x.len();
        if n_points < MIN_POINTS {
            return Err(GridError::TooFewPoints {
                min: MIN_POINTS,
                found: n_points,
            });
        }
        for (index, pair) in x.windows(2).enumerate() {
            if !(pair[1] > pair[0]) {
                return Err(GridError::NonMonotonicPoints {
                    index: index + 1,
                    value: pair[1],
                    previous: pair[0],
                });
            }
        }
        if curvature == Curvature::Cylindrical && x[0] < 0.0 {
            return Err(GridError::GeometricInfeasibility(format!(
                "cylindrical grid starts at negative radius {}",
                x[0]
            )));
        }

        let jj = n_points - 1;
        let hh: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let rphalf: Vec<f64> = x
            .windows(2)
            .map(|w| curvature.radius(0.5 * (w[0] + w[1])))
            .collect();
        let r: Vec<f64> = x.iter().map(|&xj| curvature.radius(xj)).collect();

        let mut dlj = vec![0.0; n_points];
        let mut cfm = vec![0.0; n_points];
        let mut cf = vec![0.0; n_points];
        let mut cfp = vec![0.0; n_points];
        for j in 1..jj {
            let (m, c, p) = centered_weights(hh[j - 1], hh[j]);
            cfm[j] = m;
            cf[j] = c;
            cfp[j] = p;
            dlj[j] = 0.5 * (x[j + 1] - x[j - 1]);
        }

        let max_spacing_ratio = hh
            .windows(2)
            .map(|w| (w[1] / w[0]).max(w[0] / w[1]))
            .fold(1.0, f64::max);

        Ok(Self {
            x: x.to_vec(),
            hh,
            dlj,
            cfm,
            cf,
            cfp,
            r,
            rphalf,
            curvature,
            left_bc,
            right_bc,
            max_spacing_ratio,
        })
    }

    #[inline]
    pub fn n_points(&self) -> usize {
        self.x.len()
    }

    /// Index of the last point.
    #[inline]
    pub fn jj(&self) -> usize {
        self.x.len() - 1
    }

    /// Boundary condition at one end.
    pub fn boundary(&self, side: super::Side) -> BoundaryCondition {
        match side {
            super::Side::Left => self.left_bc,
            super::Side::Right => self.right_bc,
        }
    }
}
