//! Boundary policies attached to the two ends of the grid.

use serde::{Deserialize, Serialize};

/// Treatment of one end of the domain.
///
/// The same value drives two decisions: whether regridding may move that end,
/// and how the diffusion operator fills the corresponding edge row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryCondition {
    /// Value imposed by the outer solver; the end point is never removed.
    #[default]
    FixedValue,
    /// Symmetry/outflow end with vanishing normal gradient.
    ZeroGradient,
    /// Half-cell balance around the end point.
    ControlVolume,
    /// Robin-type flux towards an external value (`y_inf`, `wall_const`).
    WallFlux,
    /// End point follows the solution; treated like a zero gradient.
    Floating,
}

impl BoundaryCondition {
    /// Whether regridding may delete the end point governed by this condition.
    pub fn allows_removal(self) -> bool {
        !matches!(self, BoundaryCondition::FixedValue)
    }

    /// Whether the condition describes a symmetry plane (no net flux).
    pub fn is_symmetric(self) -> bool {
        matches!(
            self,
            BoundaryCondition::ZeroGradient | BoundaryCondition::ControlVolume
        )
    }
}

/// One end of the domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// Domain curvature of the divergence operator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curvature {
    /// `alpha = 0`
    #[default]
    Planar,
    /// `alpha = 1`, radial coordinate measured from the axis at `x = 0`.
    Cylindrical,
}

impl Curvature {
    /// The curvature exponent `alpha`.
    #[inline]
    pub fn alpha(self) -> i32 {
        match self {
            Curvature::Planar => 0,
            Curvature::Cylindrical => 1,
        }
    }

    /// `x^alpha`, the radius factor of a point or half point.
    #[inline]
    pub fn radius(self, x: f64) -> f64 {
        match self {
            Curvature::Planar => 1.0,
            Curvature::Cylindrical => x,
        }
    }

    /// Volume per unit angle between two coordinates: `|b^(a+1) - a^(a+1)| / (alpha + 1)`.
    #[inline]
    pub fn shell_volume(self, a: f64, b: f64) -> f64 {
        match self {
            Curvature::Planar => (b - a).abs(),
            Curvature::Cylindrical => 0.5 * (b * b - a * a).abs(),
        }
    }
}
