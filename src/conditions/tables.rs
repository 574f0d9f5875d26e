use super::*;
use crate::config::{BACKWARD_DISTANCE_M, TRIANGLE_LEG_ONE_M};

const AXES: [Axis; 2] = [Axis::Pitch, Axis::Yaw];
const TURNS: [TurnDirection; 2] = [TurnDirection::Right, TurnDirection::Left];
const ROTATION_ANGLES_DEG: [f64; 3] = [135.0, 150.0, 165.0];
const TRIANGLE_ANGLES_DEG: [f64; 3] = [165.0, 150.0, 135.0];

/// 4..=12 m in 2 m steps, each with every axis/direction pair.
pub fn linear_forward_table() -> Vec<LinearCondition> {
    let mut rows = Vec::with_capacity(20);
    for distance in (4..=12).step_by(2) {
        for axis in AXES {
            for turn in TURNS {
                rows.push(LinearCondition {
                    distance: f64::from(distance),
                    axis,
                    turn,
                });
            }
        }
    }
    rows
}

pub fn linear_backward_table() -> Vec<LinearCondition> {
    let mut rows = Vec::with_capacity(4);
    for axis in AXES {
        for turn in TURNS {
            rows.push(LinearCondition {
                distance: BACKWARD_DISTANCE_M,
                axis,
                turn,
            });
        }
    }
    rows
}

pub fn rotation_table() -> Vec<RotationCondition> {
    let mut rows = Vec::with_capacity(12);
    for axis in AXES {
        for turn in TURNS {
            for angle_deg in ROTATION_ANGLES_DEG {
                rows.push(RotationCondition {
                    angle_deg,
                    axis,
                    turn,
                });
            }
        }
    }
    rows
}

pub fn triangle_table(variant: TriangleVariant) -> Vec<TriangleCondition> {
    let first_legs: &[f64] = match variant {
        TriangleVariant::Standard => &[TRIANGLE_LEG_ONE_M],
        TriangleVariant::Extended => &[TRIANGLE_LEG_ONE_M, 4.0],
    };

    let mut rows = Vec::with_capacity(24 * first_legs.len());
    for &leg1 in first_legs {
        for axis in AXES {
            for turn in TURNS {
                for leg2 in [8.0, 4.0] {
                    for angle_deg in TRIANGLE_ANGLES_DEG {
                        rows.push(TriangleCondition {
                            leg1,
                            leg2,
                            angle_deg,
                            axis,
                            turn,
                        });
                    }
                }
            }
        }
    }
    rows
}
