//! Linear diffusion operator for a single scalar field.
//!
//! The field obeys one of
//!
//! ```text
//! ydot = B * d/dx(D * dy/dx) + C          (planar)
//! ydot = B/r * d/dr(r * D * dy/dr) + C    (cylindrical)
//! ```
//!
//! on the segment `[j_left, j_right]` of the grid, which is written as the
//! linear system `ydot = A*y + C`. [`DiffusionSystem::get_a`] fills `A` in a
//! banded matrix supplied by the integrator and [`DiffusionSystem::get_c`]
//! fills `C`. Both read the grid through a [`GridGeometry`] snapshot passed
//! on every call.
//!
//! # Edge rows
//! A row at the end of the segment that is an interior grid point only
//! couples to points inside the segment. A row at an end of the domain
//! follows the [`BoundaryCondition`] of that end:
//!
//! | condition                    | row                                     |
//! |------------------------------|-----------------------------------------|
//! | `FixedValue`                 | zero (value held)                       |
//! | `ZeroGradient`, `Floating`   | mirror stencil about the end point      |
//! | `ControlVolume`              | half-cell balance, no boundary flux     |
//! | `WallFlux`                   | half-cell balance, Robin boundary flux  |

pub mod band;

pub use band::{BandMatrix, BandedMatrix};

use crate::debug_invariants::{DebugInvariants, check_len};
use crate::grid::{BoundaryCondition, GridGeometry, Side};
use crate::grid_error::GridError;

/// Diffusion of one solution component on a grid segment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiffusionSystem {
    /// Prefactor `B`, one entry per segment point.
    pub b: Vec<f64>,
    /// Diffusion coefficient `D`, one entry per segment point.
    pub d: Vec<f64>,
    /// Constant terms supplied by the splitting method.
    pub split_const: Vec<f64>,
    /// Far-field value for a wall-flux boundary.
    pub y_inf: f64,
    /// Transfer coefficient for a wall-flux boundary.
    pub wall_const: f64,
    n: usize,
    j_left: usize,
    j_right: usize,
}

/// Coefficients of one boundary row: `A[i][i] = diag`, `A[i][neighbour] = off`,
/// and `C[i] += constant`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct EdgeRow {
    diag: f64,
    off: f64,
    constant: f64,
}

impl DiffusionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points in the governed segment (`j_right - j_left + 1`).
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn j_left(&self) -> usize {
        self.j_left
    }

    pub fn j_right(&self) -> usize {
        self.j_right
    }

    /// Govern the grid points `j_left..=j_right`; resizes the coefficient
    /// arrays when the segment length changes.
    pub fn set_segment(&mut self, j_left: usize, j_right: usize) -> Result<(), GridError> {
        if j_right <= j_left {
            return Err(GridError::EmptySegment {
                left: j_left,
                right: j_right,
            });
        }
        self.j_left = j_left;
        self.j_right = j_right;
        let n = j_right - j_left + 1;
        if n != self.n {
            self.resize(n);
        }
        Ok(())
    }

    /// Reallocate `b`, `d` and `split_const` to length `n`, zero-filled.
    pub fn resize(&mut self, n: usize) {
        self.n = n;
        self.j_right = self.j_left + n.saturating_sub(1);
        self.b = vec![0.0; n];
        self.d = vec![0.0; n];
        self.split_const = vec![0.0; n];
    }

    /// Zero the splitting constants, leaving `b` and `d` untouched.
    pub fn reset_split_constants(&mut self) {
        self.split_const.fill(0.0);
    }

    fn check(&self, geometry: &GridGeometry) -> Result<(), GridError> {
        self.validate_invariants()?;
        if self.n < 2 || self.j_right > geometry.jj() {
            return Err(GridError::InvalidSegment {
                left: self.j_left,
                right: self.j_right,
                n_points: geometry.n_points(),
            });
        }
        Ok(())
    }

    /// Rebuild `A` in full. The matrix must be square of dimension `n` with
    /// at least one sub- and one super-diagonal.
    pub fn get_a<M: BandMatrix + ?Sized>(
        &self,
        geometry: &GridGeometry,
        a: &mut M,
    ) -> Result<(), GridError> {
        self.check(geometry)?;
        check_len("band matrix", self.n, a.dim())?;
        if a.lower_bandwidth() < 1 || a.upper_bandwidth() < 1 {
            return Err(GridError::BandTooNarrow {
                lower: a.lower_bandwidth(),
                upper: a.upper_bandwidth(),
            });
        }
        a.set_zero();

        let last = self.n - 1;
        let (first_row, end_row) = (
            self.edge_row(geometry, Side::Left),
            self.edge_row(geometry, Side::Right),
        );
        if let Some(row) = first_row {
            a.set(0, 0, row.diag);
            a.set(0, 1, row.off);
        }
        if let Some(row) = end_row {
            a.set(last, last, row.diag);
            a.set(last, last - 1, row.off);
        }

        let start = usize::from(first_row.is_some());
        let stop = if end_row.is_some() { last } else { self.n };
        for i in start..stop {
            let k = self.j_left + i;
            let c1 = self.b[i] / (geometry.r[k] * geometry.dlj[k]);
            let c2 = if i > 0 {
                geometry.rphalf[k - 1] * 0.5 * (self.d[i - 1] + self.d[i]) / geometry.hh[k - 1]
            } else {
                0.0
            };
            let c3 = if i < last {
                geometry.rphalf[k] * 0.5 * (self.d[i] + self.d[i + 1]) / geometry.hh[k]
            } else {
                0.0
            };
            a.set(i, i, -c1 * (c2 + c3));
            if i > 0 {
                a.set(i, i - 1, c1 * c2);
            }
            if i < last {
                a.set(i, i + 1, c1 * c3);
            }
        }
        Ok(())
    }

    /// Fill the constant term: the splitting constants plus any boundary
    /// inhomogeneity (wall-flux ends).
    pub fn get_c(&self, geometry: &GridGeometry, c: &mut [f64]) -> Result<(), GridError> {
        self.check(geometry)?;
        check_len("constant term", self.n, c.len())?;
        c.copy_from_slice(&self.split_const);
        if let Some(row) = self.edge_row(geometry, Side::Left) {
            c[0] += row.constant;
        }
        if let Some(row) = self.edge_row(geometry, Side::Right) {
            c[self.n - 1] += row.constant;
        }
        Ok(())
    }

    /// Boundary row for the segment end at `side`, or `None` when that end is
    /// an interior grid point and the regular stencil applies.
    fn edge_row(&self, geometry: &GridGeometry, side: Side) -> Option<EdgeRow> {
        let jj = geometry.jj();
        // (segment row, grid point, neighbouring grid point, interval index)
        let (i, k, nb, interval) = match side {
            Side::Left if self.j_left == 0 => (0, 0, 1, 0),
            Side::Right if self.j_right == jj => (self.n - 1, jj, jj - 1, jj - 1),
            _ => return None,
        };
        let i_nb = match side {
            Side::Left => i + 1,
            Side::Right => i - 1,
        };

        let b = self.b[i];
        let h = geometry.hh[interval];
        let face = geometry.rphalf[interval] * 0.5 * (self.d[i] + self.d[i_nb]) / h;
        let half_cell = || {
            let x_half = 0.5 * (geometry.x[k] + geometry.x[nb]);
            geometry.curvature.shell_volume(geometry.x[k], x_half)
        };

        let row = match geometry.boundary(side) {
            BoundaryCondition::FixedValue => EdgeRow {
                diag: 0.0,
                off: 0.0,
                constant: 0.0,
            },
            BoundaryCondition::ZeroGradient | BoundaryCondition::Floating
                if geometry.r[k] > 0.0 =>
            {
                let coeff = 2.0 * b * face / (geometry.r[k] * h);
                EdgeRow {
                    diag: -coeff,
                    off: coeff,
                    constant: 0.0,
                }
            }
            BoundaryCondition::ZeroGradient
            | BoundaryCondition::Floating
            | BoundaryCondition::ControlVolume => {
                let coeff = b * face / half_cell();
                EdgeRow {
                    diag: -coeff,
                    off: coeff,
                    constant: 0.0,
                }
            }
            BoundaryCondition::WallFlux => {
                let scale = b / half_cell();
                let wall = geometry.r[k] * self.wall_const;
                EdgeRow {
                    diag: -scale * (face + wall),
                    off: scale * face,
                    constant: scale * wall * self.y_inf,
                }
            }
        };
        Some(row)
    }
}

impl DebugInvariants for DiffusionSystem {
    fn validate_invariants(&self) -> Result<(), GridError> {
        check_len("B", self.n, self.b.len())?;
        check_len("D", self.n, self.d.len())?;
        check_len("splitConst", self.n, self.split_const.len())?;
        Ok(())
    }
}
