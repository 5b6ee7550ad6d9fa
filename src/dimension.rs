//! The five GrADS axes and the dimension environment of a session
//!
//! GrADS addresses every grid through the same closed set of axes. Two
//! fixed orderings of that set drive the exporter:
//!
//! - [`READ_EFFICIENCY`]: how cheaply GrADS can vary an axis in one read
//!   (x fastest, then y, z, t, e). The two cheapest varying axes are read
//!   directly; the rest are swept.
//! - [`FWRITE_ORDER`]: the axis order GrADS lays a 2-D read out in
//!   (z, y, x, t, e). The active pair is sorted by it before every read.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// One of the five GrADS grid axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
    T,
    E,
}

/// Axes ranked by read efficiency, cheapest first
pub const READ_EFFICIENCY: [Axis; 5] = [Axis::X, Axis::Y, Axis::Z, Axis::T, Axis::E];

/// Axis order of GrADS' native 2-D output
pub const FWRITE_ORDER: [Axis; 5] = [Axis::Z, Axis::Y, Axis::X, Axis::T, Axis::E];

impl Axis {
    /// Letter used in `set` statements.
    pub fn letter(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
            Axis::T => 't',
            Axis::E => 'e',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'x' => Some(Axis::X),
            'y' => Some(Axis::Y),
            'z' => Some(Axis::Z),
            't' => Some(Axis::T),
            'e' => Some(Axis::E),
            _ => None,
        }
    }

    /// Rank in [`FWRITE_ORDER`].
    pub fn fwrite_rank(self) -> usize {
        match self {
            Axis::Z => 0,
            Axis::Y => 1,
            Axis::X => 2,
            Axis::T => 3,
            Axis::E => 4,
        }
    }

    /// Position in x, y, z, t, e order.
    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// State of a single axis in the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisState {
    /// Pinned to a single value
    pub fixed: bool,
    /// Grid-coordinate range; may be fractional
    pub grid: (f64, f64),
    /// Integer grid indices covered, inclusive at both ends
    pub index: (i64, i64),
}

impl AxisState {
    /// An axis pinned at grid index `i`.
    pub fn fixed_at(i: i64) -> Self {
        Self {
            fixed: true,
            grid: (i as f64, i as f64),
            index: (i, i),
        }
    }

    /// An axis varying over the inclusive index range `lo..=hi`.
    pub fn varying(lo: i64, hi: i64) -> Self {
        Self {
            fixed: false,
            grid: (lo as f64, hi as f64),
            index: (lo, hi),
        }
    }

    pub fn indices(&self) -> RangeInclusive<i64> {
        self.index.0..=self.index.1
    }

    /// Number of grid points in the index range.
    pub fn len(&self) -> usize {
        (self.index.1 - self.index.0 + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offset of index `i` from the start of the range.
    pub fn position(&self, i: i64) -> usize {
        (i - self.index.0) as usize
    }
}

/// Snapshot of a session's dimension environment (`q dims`)
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    axes: [AxisState; 5],
    /// Display form of the current time, e.g. `00Z01JAN2000`
    pub time: String,
}

impl Environment {
    /// Build a snapshot from per-axis states given in x, y, z, t, e order.
    pub fn new(axes: [AxisState; 5], time: impl Into<String>) -> Self {
        Self {
            axes,
            time: time.into(),
        }
    }

    pub fn axis(&self, axis: Axis) -> &AxisState {
        &self.axes[axis.slot()]
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisState {
        &mut self.axes[axis.slot()]
    }

    /// Varying axes in read-efficiency order.
    pub fn varying(&self) -> Vec<Axis> {
        READ_EFFICIENCY
            .iter()
            .copied()
            .filter(|&axis| !self.axis(axis).fixed)
            .collect()
    }
}
