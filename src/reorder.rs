//! Axis reordering as a single permutation
//!
//! The assembled array comes out in read order (active pair, then swept axes).
//! [`AxisPermutation`] maps every output position straight to its source axis
//! and is applied with one `permuted_axes` call, so cycles of any length
//! resolve in one step.

use crate::dimension::Axis;
use crate::errors::{Result, RuGaXError};
use ndarray::{ArrayD, ErrorKind, ShapeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisPermutation {
    /// `source[i]` is the axis of the input that becomes output axis `i`
    source: Vec<usize>,
}

impl AxisPermutation {
    pub fn identity(rank: usize) -> Self {
        Self {
            source: (0..rank).collect(),
        }
    }

    /// Permutation that rearranges axes laid out as `from` into `to`.
    pub fn between(from: &[Axis], to: &[Axis]) -> Result<Self> {
        let invalid = || RuGaXError::InvalidLayout {
            layout: to.to_vec(),
            varying: from.to_vec(),
        };
        if from.len() != to.len() {
            return Err(invalid());
        }
        let source = to
            .iter()
            .map(|axis| from.iter().position(|a| a == axis))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;
        Self::from_source(source).ok_or_else(invalid)
    }

    /// Build from explicit source positions; `None` unless a permutation.
    pub fn from_source(source: Vec<usize>) -> Option<Self> {
        let mut seen = vec![false; source.len()];
        for &s in &source {
            if s >= seen.len() || seen[s] {
                return None;
            }
            seen[s] = true;
        }
        Some(Self { source })
    }

    pub fn source(&self) -> &[usize] {
        &self.source
    }

    pub fn rank(&self) -> usize {
        self.source.len()
    }

    pub fn is_identity(&self) -> bool {
        self.moves() == 0
    }

    /// Number of output positions whose axis comes from elsewhere.
    pub fn moves(&self) -> usize {
        self.source
            .iter()
            .enumerate()
            .filter(|(i, s)| i != *s)
            .count()
    }

    /// Reorder `arr`; returns it untouched when nothing moves.
    pub fn apply<T: Clone>(&self, arr: ArrayD<T>) -> Result<ArrayD<T>> {
        if arr.ndim() != self.rank() {
            return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
        }
        if self.is_identity() {
            return Ok(arr);
        }
        let permuted = arr.permuted_axes(self.source.clone());
        Ok(permuted.as_standard_layout().into_owned())
    }
}
