//! Array assembly from 2-D reads
//!
//! GrADS can only hand back two varying axes per read. Higher-rank fields are
//! built by pinning every swept axis to each of its grid indices in turn and
//! stacking the resulting slices into one array laid out as
//! `active pair ++ swept axes`.

use crate::data_source::GradsSession;
use crate::dimension::{AxisState, Environment};
use crate::errors::{Result, RuGaXError};
use crate::plan::DimensionPlan;
use crate::relay::Relay;
use ndarray::{ArrayD, Axis as ArrayAxis, IxDyn};
use tracing::{debug, info};

/// Read `expr` into an array in the plan's assembly order.
pub fn assemble<S>(
    session: &mut S,
    expr: &str,
    env: &Environment,
    plan: &DimensionPlan,
) -> Result<ArrayD<S::Elem>>
where
    S: GradsSession + ?Sized,
{
    if !plan.needs_sweep() {
        debug!(expr, active = ?plan.active, "single read");
        return session.read_field(expr, &plan.active);
    }

    let states: Vec<AxisState> = plan.sweep.iter().map(|&axis| *env.axis(axis)).collect();
    let mut full: Option<ArrayD<S::Elem>> = None;
    let mut reads = 0usize;

    for combo in Combinations::new(&states) {
        for (&axis, &value) in plan.sweep.iter().zip(&combo) {
            session.set_index(axis, value)?;
        }
        let positions: Vec<usize> = states
            .iter()
            .zip(&combo)
            .map(|(state, &value)| state.position(value))
            .collect();

        let slice = session.read_field(expr, &plan.active)?;
        let full = full.get_or_insert_with(|| {
            let shape: Vec<usize> = slice
                .shape()
                .iter()
                .copied()
                .chain(states.iter().map(AxisState::len))
                .collect();
            ArrayD::zeros(IxDyn(&shape))
        });
        place_slice(full, &slice, &positions)?;
        reads += 1;
    }

    info!(expr, reads, sweep = ?plan.sweep, "assembled swept field");

    Ok(full.unwrap_or_else(|| {
        let shape: Vec<usize> = plan
            .assembly_order()
            .iter()
            .map(|&axis| env.axis(axis).len())
            .collect();
        ArrayD::zeros(IxDyn(&shape))
    }))
}

/// Copy `slice` into `full` at the given positions along its trailing axes.
fn place_slice<T: Clone>(full: &mut ArrayD<T>, slice: &ArrayD<T>, positions: &[usize]) -> Result<()> {
    let base = slice.ndim();
    if full.ndim() != base + positions.len() || &full.shape()[..base] != slice.shape() {
        return Err(RuGaXError::SliceShapeMismatch {
            expected: full.shape()[..base.min(full.ndim())].to_vec(),
            got: slice.shape().to_vec(),
        });
    }
    let mut view = full.view_mut();
    for &p in positions {
        view = view.index_axis_move(ArrayAxis(base), p);
    }
    view.assign(slice);
    Ok(())
}

/// Every combination of grid indices over a set of axes, last axis fastest.
struct Combinations {
    ranges: Vec<(i64, i64)>,
    next: Option<Vec<i64>>,
}

impl Combinations {
    fn new(states: &[AxisState]) -> Self {
        let ranges: Vec<(i64, i64)> = states.iter().map(|s| s.index).collect();
        let next = if ranges.iter().all(|(lo, hi)| lo <= hi) {
            Some(ranges.iter().map(|(lo, _)| *lo).collect())
        } else {
            None
        };
        Self { ranges, next }
    }
}

impl Iterator for Combinations {
    type Item = Vec<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let mut advanced = current.clone();
        for i in (0..advanced.len()).rev() {
            if advanced[i] < self.ranges[i].1 {
                advanced[i] += 1;
                self.next = Some(advanced);
                return Some(current);
            }
            advanced[i] = self.ranges[i].0;
        }
        Some(current)
    }
}
