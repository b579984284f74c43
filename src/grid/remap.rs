//! Index remapping for grid insertions and removals.
//!
//! Adaptation never edits solution arrays while it scans the grid. It edits a
//! [`WorkingGrid`], which records for every working point where its values
//! come from (a [`PointSource`]). Once the scan is finished, the resulting
//! [`RemapPlan`] is applied uniformly to every array that lives on the grid.

use crate::debug_invariants::check_len;
use crate::grid_error::GridError;

/// Values of a new point as an affine combination of old point values.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSource {
    terms: Vec<(usize, f64)>,
}

impl PointSource {
    /// The new point carries the value of old point `index`.
    pub fn copy(index: usize) -> Self {
        Self {
            terms: vec![(index, 1.0)],
        }
    }

    /// Linear interpolation `(1 - t) * left + t * right`.
    pub fn blend(left: &PointSource, right: &PointSource, t: f64) -> Self {
        let mut terms: Vec<(usize, f64)> = Vec::with_capacity(left.terms.len() + right.terms.len());
        let scaled = left
            .terms
            .iter()
            .map(|&(i, w)| (i, w * (1.0 - t)))
            .chain(right.terms.iter().map(|&(i, w)| (i, w * t)));
        for (index, weight) in scaled {
            if weight == 0.0 {
                continue;
            }
            match terms.iter_mut().find(|(i, _)| *i == index) {
                Some((_, w)) => *w += weight,
                None => terms.push((index, weight)),
            }
        }
        Self { terms }
    }

    /// Old index when the point is an unmodified copy.
    pub fn copied_from(&self) -> Option<usize> {
        match self.terms.as_slice() {
            [(index, w)] if *w == 1.0 => Some(*index),
            _ => None,
        }
    }

    /// Evaluate the source against an old array.
    #[inline]
    pub fn sample(&self, old: &[f64]) -> f64 {
        self.terms.iter().map(|&(i, w)| w * old[i]).sum()
    }
}

/// Old-to-new mapping for every point of an adapted grid.
#[derive(Clone, Debug, PartialEq)]
pub struct RemapPlan {
    old_len: usize,
    sources: Vec<PointSource>,
}

impl RemapPlan {
    /// Plan that keeps all `n` points in place.
    pub fn identity(n: usize) -> Self {
        Self {
            old_len: n,
            sources: (0..n).map(PointSource::copy).collect(),
        }
    }

    /// Number of points before the change.
    pub fn old_len(&self) -> usize {
        self.old_len
    }

    /// Number of points after the change.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn sources(&self) -> &[PointSource] {
        &self.sources
    }

    /// True when the plan leaves every point where it was.
    pub fn is_identity(&self) -> bool {
        self.sources.len() == self.old_len
            && self
                .sources
                .iter()
                .enumerate()
                .all(|(j, s)| s.copied_from() == Some(j))
    }

    /// Map one array from the old point set to the new one.
    pub fn apply(&self, old: &[f64]) -> Result<Vec<f64>, GridError> {
        check_len("remapped array", self.old_len, old.len())?;
        Ok(self.sources.iter().map(|s| s.sample(old)).collect())
    }

    /// Map every array in place. All arrays are checked before any is touched.
    pub fn apply_all(&self, arrays: &mut [Vec<f64>]) -> Result<(), GridError> {
        for array in arrays.iter() {
            check_len("solution variable", self.old_len, array.len())?;
        }
        for array in arrays.iter_mut() {
            *array = self.apply(array)?;
        }
        Ok(())
    }

    pub(crate) fn insert(&mut self, index: usize, source: PointSource) {
        self.sources.insert(index, source);
    }

    pub(crate) fn remove(&mut self, index: usize) {
        self.sources.remove(index);
    }
}

/// Point set under modification, together with the adaptation variables
/// and damping values sampled on it.
#[derive(Clone, Debug)]
pub(crate) struct WorkingGrid {
    pub x: Vec<f64>,
    pub values: Vec<Vec<f64>>,
    pub damp: Vec<f64>,
    pub plan: RemapPlan,
}

impl WorkingGrid {
    pub fn new(x: &[f64], values: &[Vec<f64>], damp: &[f64]) -> Self {
        Self {
            x: x.to_vec(),
            values: values.to_vec(),
            damp: damp.to_vec(),
            plan: RemapPlan::identity(x.len()),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn spacing(&self, j: usize) -> f64 {
        self.x[j + 1] - self.x[j]
    }

    /// Insert the midpoint of interval `[j, j+1]` at index `j + 1`.
    pub fn insert_midpoint(&mut self, j: usize) {
        let x_mid = 0.5 * (self.x[j] + self.x[j + 1]);
        let source = PointSource::blend(&self.plan.sources[j], &self.plan.sources[j + 1], 0.5);
        self.x.insert(j + 1, x_mid);
        for v in self.values.iter_mut() {
            let mid = 0.5 * (v[j] + v[j + 1]);
            v.insert(j + 1, mid);
        }
        let damp_mid = 0.5 * (self.damp[j] + self.damp[j + 1]);
        self.damp.insert(j + 1, damp_mid);
        self.plan.insert(j + 1, source);
    }

    /// Drop point `j`.
    pub fn remove(&mut self, j: usize) {
        self.x.remove(j);
        for v in self.values.iter_mut() {
            v.remove(j);
        }
        self.damp.remove(j);
        self.plan.remove(j);
    }

    /// Add a point at `x_new` beyond the left or right end, copying the values
    /// of the current end point.
    pub fn extend(&mut self, side: super::Side, x_new: f64) {
        let (from, at) = match side {
            super::Side::Left => (0, 0),
            super::Side::Right => (self.len() - 1, self.len()),
        };
        let source = self.plan.sources[from].clone();
        self.x.insert(at, x_new);
        for v in self.values.iter_mut() {
            let value = v[from];
            v.insert(at, value);
        }
        let damp = self.damp[from];
        self.damp.insert(at, damp);
        self.plan.insert(at, source);
    }
}
