//! Adaptive one-dimensional grid.
//!
//! A [`Mesh`] owns the grid coordinates, the damping lengths supplied by the
//! flow solver, the per-variable adaptation metadata and the derived
//! [`GridGeometry`]. Two families of operations change the point set:
//!
//! - [`Mesh::adapt`] inserts and removes interior points;
//! - [`Mesh::regrid`] and [`Mesh::regrid_unstrained`] grow or trim the domain
//!   at its ends.
//!
//! Both re-map the caller's solution arrays onto the new points and rebuild
//! the geometry before returning.

pub mod adapt;
pub mod boundary;
pub mod geometry;
pub mod options;
pub mod regrid;
pub mod remap;

pub use boundary::{BoundaryCondition, Curvature, Side};
pub use geometry::{GridGeometry, MIN_POINTS};
pub use options::GridOptions;
pub use remap::{PointSource, RemapPlan};

use crate::debug_invariants::{DebugInvariants, check_len};
use crate::grid_error::GridError;

/// Adaptive 1-D grid with its derived geometry.
#[derive(Clone, Debug)]
pub struct Mesh {
    x: Vec<f64>,
    damp_val: Vec<f64>,
    options: GridOptions,
    geometry: GridGeometry,
    vtol: Vec<f64>,
    dvtol: Vec<f64>,
    n_adapt: Option<usize>,
    left_components: Vec<bool>,
    right_components: Vec<bool>,
    ju: usize,
    jb: usize,
    updated: bool,
    last_remap: Option<RemapPlan>,
}

impl Mesh {
    /// Build a mesh on the given points and apply `options`.
    pub fn new(x: Vec<f64>, options: GridOptions) -> Result<Self, GridError> {
        options.validate()?;
        let geometry = GridGeometry::compute(
            &x,
            options.curvature(),
            options.left_bc,
            options.right_bc,
        )?;
        let n_points = x.len();
        let mut mesh = Self {
            x,
            damp_val: vec![f64::INFINITY; n_points],
            options,
            geometry,
            vtol: Vec::new(),
            dvtol: Vec::new(),
            n_adapt: None,
            left_components: Vec::new(),
            right_components: Vec::new(),
            ju: 0,
            jb: 0,
            updated: false,
            last_remap: None,
        };
        mesh.update_boundary_indices();
        Ok(mesh)
    }

    /// Build a mesh of `n_points` equally spaced points on `[x_left, x_right]`.
    pub fn uniform(
        n_points: usize,
        x_left: f64,
        x_right: f64,
        options: GridOptions,
    ) -> Result<Self, GridError> {
        if n_points < MIN_POINTS {
            return Err(GridError::TooFewPoints {
                min: MIN_POINTS,
                found: n_points,
            });
        }
        let h = (x_right - x_left) / (n_points - 1) as f64;
        let x = (0..n_points)
            .map(|j| {
                if j == n_points - 1 {
                    x_right
                } else {
                    x_left + h * j as f64
                }
            })
            .collect();
        Self::new(x, options)
    }

    /// Replace the configuration. Rejected options leave the mesh untouched.
    pub fn set_options(&mut self, options: GridOptions) -> Result<(), GridError> {
        options.validate()?;
        let geometry = GridGeometry::compute(
            &self.x,
            options.curvature(),
            options.left_bc,
            options.right_bc,
        )?;
        self.geometry = geometry;
        self.vtol.fill(options.vtol_in);
        self.dvtol.fill(options.dvtol_in);
        self.options = options;
        self.update_boundary_indices();
        Ok(())
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Recompute the derived geometry and boundary indices from the current points.
    pub fn update_values(&mut self) -> Result<(), GridError> {
        self.geometry = GridGeometry::compute(
            &self.x,
            self.options.curvature(),
            self.options.left_bc,
            self.options.right_bc,
        )?;
        self.update_boundary_indices();
        crate::debug_invariants!(self.validate_invariants(), "mesh after update_values");
        Ok(())
    }

    /// Recompute the unburned (`ju`) and burned (`jb`) boundary indices.
    pub fn update_boundary_indices(&mut self) {
        let jj = self.jj();
        if self.options.unburned_left {
            self.ju = 0;
            self.jb = jj;
        } else {
            self.ju = jj;
            self.jb = 0;
        }
    }

    /// Select how many leading variables drive adaptation and which of them
    /// vote on the left and right boundary criteria. Variables beyond the
    /// end of a mask vote.
    pub fn set_adaptation_components(
        &mut self,
        n_adapt: usize,
        left_components: Vec<bool>,
        right_components: Vec<bool>,
    ) {
        self.n_adapt = Some(n_adapt);
        self.left_components = left_components;
        self.right_components = right_components;
        self.vtol = vec![self.options.vtol_in; n_adapt];
        self.dvtol = vec![self.options.dvtol_in; n_adapt];
    }

    /// Override the value and derivative tolerances of variable `k`.
    pub fn set_tolerances(&mut self, k: usize, vtol: f64, dvtol: f64) -> Result<(), GridError> {
        if !(vtol > 0.0 && dvtol > 0.0) {
            return Err(GridError::InvalidConfiguration(format!(
                "tolerances of variable {k} must be positive, found vtol={vtol}, dvtol={dvtol}"
            )));
        }
        if k >= self.vtol.len() {
            self.vtol.resize(k + 1, self.options.vtol_in);
            self.dvtol.resize(k + 1, self.options.dvtol_in);
        }
        self.vtol[k] = vtol;
        self.dvtol[k] = dvtol;
        Ok(())
    }

    /// Supply the local damping lengths, one per grid point.
    pub fn set_damp_val(&mut self, damp_val: Vec<f64>) -> Result<(), GridError> {
        check_len("damp_val", self.n_points(), damp_val.len())?;
        self.damp_val = damp_val;
        Ok(())
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn damp_val(&self) -> &[f64] {
        &self.damp_val
    }

    /// Current geometry snapshot. Borrowing it freezes the mesh.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    #[inline]
    pub fn n_points(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn jj(&self) -> usize {
        self.x.len() - 1
    }

    pub fn alpha(&self) -> i32 {
        self.geometry.curvature.alpha()
    }

    pub fn ju(&self) -> usize {
        self.ju
    }

    pub fn jb(&self) -> usize {
        self.jb
    }

    /// True when the last `adapt` or `regrid` call changed the grid.
    pub fn updated(&self) -> bool {
        self.updated
    }

    /// Old-to-new point mapping of the last `adapt` or `regrid` call, or
    /// `None` when that call left the grid unchanged. Use it to carry
    /// arrays that were not passed in `y` over to the current points.
    pub fn last_remap(&self) -> Option<&RemapPlan> {
        self.last_remap.as_ref()
    }

    /// True when no adjacent spacing ratio exceeds `uniformity_tol`.
    pub fn is_uniform(&self) -> bool {
        self.geometry.max_spacing_ratio <= self.options.uniformity_tol
    }

    /// Number of adaptation variables for a solution with `n_vars` variables.
    pub(crate) fn n_adapt(&self, n_vars: usize) -> usize {
        self.n_adapt.unwrap_or(n_vars).min(n_vars)
    }

    pub(crate) fn vtol(&self, k: usize) -> f64 {
        self.vtol.get(k).copied().unwrap_or(self.options.vtol_in)
    }

    pub(crate) fn dvtol(&self, k: usize) -> f64 {
        self.dvtol.get(k).copied().unwrap_or(self.options.dvtol_in)
    }

    /// Whether variable `k` votes on the boundary criteria at `side`.
    pub(crate) fn votes(&self, side: Side, k: usize) -> bool {
        let mask = match side {
            Side::Left => &self.left_components,
            Side::Right => &self.right_components,
        };
        mask.get(k).copied().unwrap_or(true)
    }

    /// Verify every solution variable lives on the current points.
    pub(crate) fn check_solution(&self, y: &[Vec<f64>]) -> Result<(), GridError> {
        if let Some(n_adapt) = self.n_adapt {
            if n_adapt > y.len() {
                return Err(GridError::DimensionMismatch {
                    what: "adaptation variables",
                    expected: n_adapt,
                    found: y.len(),
                });
            }
        }
        for v in y {
            check_len("solution variable", self.n_points(), v.len())?;
        }
        Ok(())
    }

    /// The first spacing of a cylindrical domain centred on the axis must
    /// respect `center_grid_min`.
    pub(crate) fn check_center_spacing(&self) -> Result<(), GridError> {
        if self.geometry.curvature == Curvature::Cylindrical && self.x[0] <= 0.0 {
            let spacing = self.geometry.hh[0];
            if spacing < self.options.center_grid_min {
                return Err(GridError::CenterSpacing {
                    spacing,
                    min: self.options.center_grid_min,
                });
            }
        }
        Ok(())
    }

    /// Record the outcome of an `adapt` or `regrid` call.
    pub(crate) fn finish_update(&mut self, changed: bool) {
        self.updated = changed;
        if !changed {
            self.last_remap = None;
        }
    }

    /// Install the outcome of a working-grid scan.
    pub(crate) fn commit(
        &mut self,
        work: remap::WorkingGrid,
        y: &mut [Vec<f64>],
    ) -> Result<(), GridError> {
        work.plan.apply_all(y)?;
        self.damp_val = work.plan.apply(&self.damp_val)?;
        self.x = work.x;
        self.last_remap = Some(work.plan);
        self.update_values()
    }
}

impl DebugInvariants for Mesh {
    fn validate_invariants(&self) -> Result<(), GridError> {
        let n_points = self.n_points();
        check_len("damp_val", n_points, self.damp_val.len())?;
        check_len("geometry points", n_points, self.geometry.n_points())?;
        check_len("hh", n_points - 1, self.geometry.hh.len())?;
        check_len("rphalf", n_points - 1, self.geometry.rphalf.len())?;
        for (index, pair) in self.x.windows(2).enumerate() {
            if !(pair[1] > pair[0]) {
                return Err(GridError::NonMonotonicPoints {
                    index: index + 1,
                    value: pair[1],
                    previous: pair[0],
                });
            }
        }
        if self.ju.max(self.jb) != self.jj() || self.ju.min(self.jb) != 0 {
            return Err(GridError::GeometricInfeasibility(format!(
                "boundary indices ju={} jb={} do not match jj={}",
                self.ju,
                self.jb,
                self.jj()
            )));
        }
        Ok(())
    }
}
