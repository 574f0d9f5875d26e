//! Factorial condition tables and their randomized presentation order.

use rand::{rngs::StdRng, seq::SliceRandom as _, Rng as _};
use serde::{Deserialize, Serialize};

use crate::kinematics::{Axis, TurnDirection};

mod tables;

pub use tables::{
    linear_backward_table, linear_forward_table, rotation_table, triangle_table,
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LinearCondition {
    pub distance: f64,
    pub axis: Axis,
    pub turn: TurnDirection,
}

/// `angle_deg` is the interior angle shown in the design table; the engine turns
/// by `180 - angle_deg`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RotationCondition {
    pub angle_deg: f64,
    pub axis: Axis,
    pub turn: TurnDirection,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TriangleCondition {
    pub leg1: f64,
    pub leg2: f64,
    pub angle_deg: f64,
    pub axis: Axis,
    pub turn: TurnDirection,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShufflePolicy {
    /// `10 * N` swaps of two indices drawn uniformly with replacement. Not a
    /// uniform permutation; kept so orders match previously collected data.
    #[default]
    LegacySwap,
    /// Fisher-Yates.
    Uniform,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriangleVariant {
    /// 24 conditions, first leg fixed at 8 m.
    #[default]
    Standard,
    /// 48 conditions, both legs drawn from {4, 8} m.
    Extended,
}

pub fn generate_order<C>(rows: &mut [C], policy: ShufflePolicy, rng: &mut StdRng) {
    let n = rows.len();
    if n < 2 {
        return;
    }
    match policy {
        ShufflePolicy::LegacySwap => {
            for _ in 0..10 * n {
                let a = rng.gen_range(0..n);
                let b = rng.gen_range(0..n);
                rows.swap(a, b);
            }
        }
        ShufflePolicy::Uniform => rows.shuffle(rng),
    }
}

/// Immutable presentation order for one task run.
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionSet<C> {
    rows: Vec<C>,
}

impl<C: Copy> ConditionSet<C> {
    pub fn shuffled(mut rows: Vec<C>, policy: ShufflePolicy, rng: &mut StdRng) -> Self {
        generate_order(&mut rows, policy, rng);
        Self { rows }
    }

    /// Keeps `rows` in the given order.
    pub fn fixed(rows: Vec<C>) -> Self {
        Self { rows }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn get(&self, cond: usize) -> Option<C> {
        self.rows.get(cond).copied()
    }

    pub fn as_slice(&self) -> &[C] {
        &self.rows
    }
}

#[cfg(test)]
mod tests;
