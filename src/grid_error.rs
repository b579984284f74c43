//! GridError: Unified error type for flame-grid public APIs
//!
//! Every fallible operation on the mesh and the diffusion operator returns
//! this type instead of panicking. Variants fall into three groups:
//! configuration inconsistency, geometric infeasibility and dimension
//! mismatch. The last group signals a broken caller contract and must not be
//! retried.

use thiserror::Error;

/// Unified error type for grid adaptation and operator assembly.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    /// Tolerances or boundary flags that cannot be used together.
    #[error("Invalid grid configuration: {0}")]
    InvalidConfiguration(String),
    /// Grid coordinates must be strictly increasing.
    #[error("Grid points must be strictly increasing: x[{index}] = {value} follows {previous}")]
    NonMonotonicPoints {
        index: usize,
        value: f64,
        previous: f64,
    },
    /// The grid needs at least `min` points to carry interior stencils.
    #[error("Grid requires at least {min} points, found {found}")]
    TooFewPoints { min: usize, found: usize },
    /// Center spacing of a cylindrical domain is below `center_grid_min`.
    #[error("Center grid spacing {spacing} is below the curved-flame floor {min}")]
    CenterSpacing { spacing: f64, min: f64 },
    /// A hard geometric floor cannot be honoured.
    #[error("Geometric infeasibility: {0}")]
    GeometricInfeasibility(String),
    /// An array does not match the size of the grid or segment it describes.
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// The diffusion segment does not fit inside the grid.
    #[error("Segment [{left}, {right}] is invalid for a grid with {n_points} points")]
    InvalidSegment {
        left: usize,
        right: usize,
        n_points: usize,
    },
    /// A diffusion segment must span at least two grid points.
    #[error("Segment [{left}, {right}] must span at least two points")]
    EmptySegment { left: usize, right: usize },
    /// The banded matrix cannot hold a three-point stencil.
    #[error("Band matrix needs lower/upper bandwidth >= 1, found {lower}/{upper}")]
    BandTooNarrow { lower: usize, upper: usize },
}
