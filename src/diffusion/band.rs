//! Banded matrix seam between operator assembly and the time integrator.

/// Storage the integrator hands to [`DiffusionSystem::get_a`](super::DiffusionSystem::get_a).
///
/// The integrator owns the layout and performs all factorizations; assembly
/// only needs to clear the matrix and write entries inside the band.
pub trait BandMatrix {
    /// Number of rows (and columns).
    fn dim(&self) -> usize;
    /// Number of sub-diagonals stored.
    fn lower_bandwidth(&self) -> usize;
    /// Number of super-diagonals stored.
    fn upper_bandwidth(&self) -> usize;
    /// Reset every stored entry to zero.
    fn set_zero(&mut self);
    /// Write entry `(row, col)`; the position must lie inside the band.
    fn set(&mut self, row: usize, col: usize, value: f64);
}

/// Column-major band storage in the LAPACK `gbtrf` layout without the
/// fill-in rows: entry `(i, j)` lives at `data[j * ld + upper + i - j]`.
#[derive(Clone, Debug, PartialEq)]
pub struct BandedMatrix {
    n: usize,
    lower: usize,
    upper: usize,
    data: Vec<f64>,
}

impl BandedMatrix {
    /// Zero matrix of dimension `n` with the given bandwidths.
    pub fn new(n: usize, lower: usize, upper: usize) -> Self {
        Self {
            n,
            lower,
            upper,
            data: vec![0.0; n * (lower + upper + 1)],
        }
    }

    /// Tridiagonal matrix, the smallest band the diffusion stencil fits in.
    pub fn tridiagonal(n: usize) -> Self {
        Self::new(n, 1, 1)
    }

    #[inline]
    fn in_band(&self, row: usize, col: usize) -> bool {
        row < self.n && col < self.n && row <= col + self.lower && col <= row + self.upper
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        col * (self.lower + self.upper + 1) + self.upper + row - col
    }

    /// Entry `(row, col)`; zero outside the band.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        if self.in_band(row, col) {
            self.data[self.index(row, col)]
        } else {
            0.0
        }
    }

    /// Dense copy of row `row`.
    pub fn row(&self, row: usize) -> Vec<f64> {
        (0..self.n).map(|col| self.get(row, col)).collect()
    }

    /// Matrix-vector product `A * v`.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        (0..self.n)
            .map(|row| {
                let lo = row.saturating_sub(self.lower);
                let hi = (row + self.upper).min(self.n.saturating_sub(1));
                (lo..=hi).map(|col| self.get(row, col) * v[col]).sum()
            })
            .collect()
    }
}

impl BandMatrix for BandedMatrix {
    fn dim(&self) -> usize {
        self.n
    }

    fn lower_bandwidth(&self) -> usize {
        self.lower
    }

    fn upper_bandwidth(&self) -> usize {
        self.upper
    }

    fn set_zero(&mut self) {
        self.data.fill(0.0);
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(
            self.in_band(row, col),
            "({row}, {col}) outside band of a {n}x{n} matrix with bandwidths {lower}/{upper}",
            n = self.n,
            lower = self.lower,
            upper = self.upper
        );
        let index = self.index(row, col);
        self.data[index] = value;
    }
}
