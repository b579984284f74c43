//! Tolerances and boundary selections that control grid adaptation.
//!
//! [`GridOptions`] is the only way to configure a [`Mesh`](super::Mesh); it is
//! handed over through [`Mesh::set_options`](super::Mesh::set_options), which
//! calls [`GridOptions::validate`] before anything is applied.

use super::boundary::{BoundaryCondition, Curvature};
use crate::grid_error::GridError;
use serde::{Deserialize, Serialize};

/// Grid adaptation and boundary configuration.
///
/// Lengths are in the units of the grid coordinates; `vtol_in`, `dvtol_in`,
/// `boundary_tol` and `boundary_tol_rm` are relative to the range of each
/// variable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Relative value tolerance for point insertion.
    pub vtol_in: f64,
    /// Relative derivative tolerance for point insertion.
    pub dvtol_in: f64,
    /// Variables whose range is below this value do not drive adaptation.
    pub absvtol: f64,
    /// Removal margin: a point goes only if every criterion holds scaled by this factor.
    pub rm_tol: f64,
    /// Maximum ratio of adjacent grid spacings.
    pub uniformity_tol: f64,
    pub grid_min: f64,
    pub grid_max: f64,
    /// Allowed spacing relative to the local damping length `damp_val`.
    pub damp_const: f64,
    /// Minimum spacing next to the axis of a curved flame.
    pub center_grid_min: f64,
    /// Relative jump at an end point that triggers boundary point addition.
    pub boundary_tol: f64,
    /// Relative flatness at an end point that permits boundary point removal.
    pub boundary_tol_rm: f64,
    /// Downstream room for unstrained flames, in flame thicknesses.
    pub unstrained_downstream_width: f64,
    /// Points added (or at most removed) per side and regrid call.
    pub add_point_count: usize,
    pub left_bc: BoundaryCondition,
    pub right_bc: BoundaryCondition,
    /// The burned-side end is held fixed during regridding.
    pub fixed_burned_val: bool,
    /// Unburned mixture enters from the left end.
    pub unburned_left: bool,
    /// The left end location is fixed (e.g. a burner surface).
    pub fixed_left_loc: bool,
    /// Symmetric twin flame with the symmetry plane at the left end.
    pub twin_flame: bool,
    /// Cylindrical flame with the axis at the left end.
    pub curved_flame: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            vtol_in: 0.12,
            dvtol_in: 0.2,
            absvtol: 1e-8,
            rm_tol: 0.6,
            uniformity_tol: 2.5,
            grid_min: 5e-7,
            grid_max: 2e-4,
            damp_const: 7.0,
            center_grid_min: 1e-4,
            boundary_tol: 5e-5,
            boundary_tol_rm: 1e-5,
            unstrained_downstream_width: 5.0,
            add_point_count: 3,
            left_bc: BoundaryCondition::FixedValue,
            right_bc: BoundaryCondition::FixedValue,
            fixed_burned_val: false,
            unburned_left: true,
            fixed_left_loc: false,
            twin_flame: false,
            curved_flame: false,
        }
    }
}

fn invalid(message: impl Into<String>) -> GridError {
    GridError::InvalidConfiguration(message.into())
}

fn positive(name: &str, value: f64) -> Result<(), GridError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be positive and finite, found {value}")))
    }
}

impl GridOptions {
    /// Curvature implied by `curved_flame`.
    pub fn curvature(&self) -> Curvature {
        if self.curved_flame {
            Curvature::Cylindrical
        } else {
            Curvature::Planar
        }
    }

    /// Check that the options are individually sane and mutually consistent.
    pub fn validate(&self) -> Result<(), GridError> {
        positive("vtol_in", self.vtol_in)?;
        positive("dvtol_in", self.dvtol_in)?;
        positive("uniformity_tol", self.uniformity_tol)?;
        positive("grid_min", self.grid_min)?;
        positive("damp_const", self.damp_const)?;
        positive("boundary_tol", self.boundary_tol)?;
        positive("boundary_tol_rm", self.boundary_tol_rm)?;
        positive("unstrained_downstream_width", self.unstrained_downstream_width)?;
        if !(self.absvtol >= 0.0) {
            return Err(invalid(format!("absvtol must be non-negative, found {}", self.absvtol)));
        }
        if !(self.center_grid_min >= 0.0) {
            return Err(invalid(format!(
                "center_grid_min must be non-negative, found {}",
                self.center_grid_min
            )));
        }
        if !(self.rm_tol > 0.0 && self.rm_tol <= 1.0) {
            return Err(invalid(format!("rm_tol must lie in (0, 1], found {}", self.rm_tol)));
        }
        if self.uniformity_tol <= 1.0 {
            return Err(invalid(format!(
                "uniformity_tol must exceed 1, found {}",
                self.uniformity_tol
            )));
        }
        if !(self.grid_max > self.grid_min) {
            return Err(invalid(format!(
                "grid_max ({}) must exceed grid_min ({})",
                self.grid_max, self.grid_min
            )));
        }
        if self.boundary_tol_rm >= self.boundary_tol {
            return Err(invalid(format!(
                "boundary_tol_rm ({}) must be smaller than boundary_tol ({})",
                self.boundary_tol_rm, self.boundary_tol
            )));
        }
        if self.fixed_left_loc && !self.unburned_left {
            return Err(invalid(
                "fixed_left_loc requires the unburned mixture on the left (unburned_left)",
            ));
        }
        if self.twin_flame && self.unburned_left {
            return Err(invalid(
                "twin_flame places burned gas at the symmetry plane; unburned_left must be unset",
            ));
        }
        if (self.twin_flame || self.curved_flame) && !self.left_bc.is_symmetric() {
            return Err(invalid(format!(
                "left boundary of a twin or curved flame must be ZeroGradient or ControlVolume, found {:?}",
                self.left_bc
            )));
        }
        Ok(())
    }
}
