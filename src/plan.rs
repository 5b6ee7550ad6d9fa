//! Dimension analysis: which axes to read, which to sweep, and the output layout

use crate::config::AxisLayout;
use crate::dimension::{Axis, Environment};
use crate::errors::{Result, RuGaXError};
use crate::reorder::AxisPermutation;

/// Preferred leading pair, checked top to bottom. A row applies when both
/// of its axes vary.
const PREFERRED_PAIRS: [([Axis; 2], [Axis; 2]); 6] = [
    ([Axis::X, Axis::Y], [Axis::Y, Axis::X]),
    ([Axis::X, Axis::Z], [Axis::Z, Axis::X]),
    ([Axis::Y, Axis::Z], [Axis::Z, Axis::Y]),
    ([Axis::X, Axis::T], [Axis::T, Axis::X]),
    ([Axis::Y, Axis::T], [Axis::Y, Axis::T]),
    ([Axis::Z, Axis::T], [Axis::Z, Axis::T]),
];

/// How one export reads and lays out its axes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionPlan {
    /// Varying axes in read-efficiency order
    pub varying: Vec<Axis>,
    /// Axes read directly, in GrADS write order
    pub active: Vec<Axis>,
    /// Axes iterated one value at a time
    pub sweep: Vec<Axis>,
    /// Axis order of the exported array
    pub output: Vec<Axis>,
}

impl DimensionPlan {
    pub fn from_environment(env: &Environment, layout: &AxisLayout) -> Result<Self> {
        let varying = env.varying();
        let split = varying.len().min(2);

        let mut active = varying[..split].to_vec();
        active.sort_by_key(|axis| axis.fwrite_rank());
        let sweep = varying[split..].to_vec();

        let output = match layout {
            AxisLayout::Preferred => preferred_order(&varying),
            AxisLayout::Explicit(order) => explicit_order(order, &varying)?,
        };

        Ok(Self {
            varying,
            active,
            sweep,
            output,
        })
    }

    pub fn rank(&self) -> usize {
        self.varying.len()
    }

    pub fn needs_sweep(&self) -> bool {
        !self.sweep.is_empty()
    }

    /// Axis order of the assembled array: active pair, then swept axes.
    pub fn assembly_order(&self) -> Vec<Axis> {
        self.active.iter().chain(&self.sweep).copied().collect()
    }

    /// Permutation taking the assembled array to the output layout.
    pub fn permutation(&self) -> Result<AxisPermutation> {
        AxisPermutation::between(&self.assembly_order(), &self.output)
    }
}

/// Output order from the preference table, remainder in efficiency order.
pub fn preferred_order(varying: &[Axis]) -> Vec<Axis> {
    let Some((_, lead)) = PREFERRED_PAIRS
        .iter()
        .find(|(key, _)| key.iter().all(|axis| varying.contains(axis)))
    else {
        return varying.to_vec();
    };

    lead.iter()
        .copied()
        .chain(varying.iter().copied().filter(|axis| !lead.contains(axis)))
        .collect()
}

/// Varying axes named in `order` lead; any others follow in preferred order.
fn explicit_order(order: &[Axis], varying: &[Axis]) -> Result<Vec<Axis>> {
    let mut out: Vec<Axis> = Vec::with_capacity(varying.len());
    for (i, &axis) in order.iter().enumerate() {
        if order[..i].contains(&axis) {
            return Err(RuGaXError::InvalidLayout {
                layout: order.to_vec(),
                varying: varying.to_vec(),
            });
        }
        if varying.contains(&axis) {
            out.push(axis);
        }
    }
    for axis in preferred_order(varying) {
        if !out.contains(&axis) {
            out.push(axis);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::AxisState;
    use Axis::*;

    fn env_with(varying: &[Axis]) -> Environment {
        let mut env = Environment::new([AxisState::fixed_at(1); 5], "00Z01JAN2000");
        for &axis in varying {
            *env.axis_mut(axis) = AxisState::varying(1, 3);
        }
        env
    }

    #[test]
    fn preference_rows() {
        assert_eq!(preferred_order(&[X, Y]), vec![Y, X]);
        assert_eq!(preferred_order(&[X, Z]), vec![Z, X]);
        assert_eq!(preferred_order(&[Y, Z]), vec![Z, Y]);
        assert_eq!(preferred_order(&[X, T]), vec![T, X]);
        assert_eq!(preferred_order(&[Y, T]), vec![Y, T]);
        assert_eq!(preferred_order(&[Z, T]), vec![Z, T]);
    }

    #[test]
    fn earlier_row_wins() {
        assert_eq!(preferred_order(&[X, Y, Z]), vec![Y, X, Z]);
        assert_eq!(preferred_order(&[Y, Z, T, E]), vec![Z, Y, T, E]);
    }

    #[test]
    fn unmatched_keeps_efficiency_order() {
        assert_eq!(preferred_order(&[T]), vec![T]);
        assert_eq!(preferred_order(&[X, E]), vec![X, E]);
        assert_eq!(preferred_order(&[T, E]), vec![T, E]);
    }

    #[test]
    fn active_pair_uses_write_order() {
        let plan = DimensionPlan::from_environment(&env_with(&[X, Y, T]), &AxisLayout::Preferred)
            .unwrap();
        assert_eq!(plan.varying, vec![X, Y, T]);
        assert_eq!(plan.active, vec![Y, X]);
        assert_eq!(plan.sweep, vec![T]);
        assert_eq!(plan.assembly_order(), vec![Y, X, T]);
        assert_eq!(plan.output, vec![Y, X, T]);
        assert!(plan.permutation().unwrap().is_identity());
    }

    #[test]
    fn explicit_layout_leads() {
        let layout = AxisLayout::Explicit(vec![Z, Y, X]);
        let plan = DimensionPlan::from_environment(&env_with(&[X, Y, Z]), &layout).unwrap();
        assert_eq!(plan.output, vec![Z, Y, X]);

        let partial = AxisLayout::Explicit(vec![T]);
        let plan = DimensionPlan::from_environment(&env_with(&[X, Y, T]), &partial).unwrap();
        assert_eq!(plan.output, vec![T, Y, X]);
    }

    #[test]
    fn explicit_layout_rejects_duplicates() {
        let layout = AxisLayout::Explicit(vec![X, X]);
        let err = DimensionPlan::from_environment(&env_with(&[X, Y]), &layout).unwrap_err();
        assert!(matches!(err, RuGaXError::InvalidLayout { .. }));
    }
}
