#![cfg_attr(docsrs, feature(doc_cfg))]
//! # flame-grid
//!
//! flame-grid provides the spatial layer of a one-dimensional flame solver: an
//! adaptive grid that follows steep fronts, and the banded linear operator for
//! the diffusion term of a split time integrator.
//!
//! ## Features
//! - [`Mesh`](grid::Mesh): grid coordinates, derived geometry (`hh`, `dlj`,
//!   centered-derivative weights, radius factors) and damping lengths
//! - Interior adaptation ([`Mesh::adapt`](grid::Mesh::adapt)) driven by value,
//!   derivative, damping, spacing and uniformity criteria
//! - Boundary regridding ([`Mesh::regrid`](grid::Mesh::regrid)) that grows or
//!   trims the domain at its ends, with an unstrained-flame variant
//! - Solution transfer through an explicit [`RemapPlan`](grid::RemapPlan)
//!   applied to every grid-sized array after a change, and kept by
//!   [`Mesh::last_remap`](grid::Mesh::last_remap) for arrays the caller
//!   carries separately
//! - [`DiffusionSystem`](diffusion::DiffusionSystem): assembly of `A` and `C`
//!   in `ydot = A*y + C` into any [`BandMatrix`](diffusion::BandMatrix)
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! flame-grid = "0.1"
//! # Optional features:
//! # features = ["check-invariants"]
//! ```
//!
//! ## Invariant checking
//! Structural invariants are checked after every change in debug builds. The
//! `strict-invariants` and `check-invariants` features keep the checks in
//! release builds.

pub mod debug_invariants;
pub mod diffusion;
pub mod grid;
pub mod grid_error;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::diffusion::{BandMatrix, BandedMatrix, DiffusionSystem};
    pub use crate::grid::regrid::FlameZone;
    pub use crate::grid::{
        BoundaryCondition, Curvature, GridGeometry, GridOptions, Mesh, RemapPlan, Side,
    };
    pub use crate::grid_error::GridError;
}
