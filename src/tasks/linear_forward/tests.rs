use super::super::tests::{
    assert_complete_run, buttons, confirm, run_to_completion, test_setup,
};
use super::*;
use crate::kinematics::TurnDirection;

const IDLE: InputSnapshot = InputSnapshot::IDLE;

fn four_metres_yaw_right() -> ConditionSet<LinearCondition> {
    ConditionSet::fixed(vec![LinearCondition {
        distance: 4.0,
        axis: Axis::Yaw,
        turn: TurnDirection::Right,
    }])
}

/// Drives a fresh single-condition task into `AdjustTarget` and returns the clock.
fn to_adjust(task: &mut LinearForwardTask) -> u64 {
    task.tick(0, IDLE);
    task.tick(100, confirm());
    assert_eq!(task.tick(200, IDLE).phase, TrialPhase::WaitForStart);
    assert_eq!(task.tick(300, confirm()).phase, TrialPhase::Turn);
    assert_eq!(task.tick(1_700, IDLE).phase, TrialPhase::Turn);
    assert_eq!(task.tick(1_800, IDLE).phase, TrialPhase::Wait);
    assert_eq!(task.tick(1_900, IDLE).phase, TrialPhase::Wait);
    assert_eq!(task.tick(2_000, IDLE).phase, TrialPhase::MoveForward);

    let mut now = 2_000;
    loop {
        now += 20;
        let out = task.tick(now, IDLE);
        if out.phase == TrialPhase::AdjustTarget {
            let p = out.observer.position;
            let expected = 4.0 * core::f64::consts::FRAC_1_SQRT_2;
            assert!((p.x - expected).abs() < 1e-9);
            assert!((p.z - expected).abs() < 1e-9);
            assert_eq!(p.y, 0.0);
            return now;
        }
        assert_eq!(out.phase, TrialPhase::MoveForward);
        assert!(out.observer.position.length() < 4.0);
        assert!(now < 10_000, "never reached the distance");
    }
}

#[test]
fn turn_then_travel_then_adjust_records_one_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut task =
        LinearForwardTask::with_conditions(test_setup(dir.path()), four_metres_yaw_right());
    let mut now = to_adjust(&mut task);

    let init = task.target_distance();
    assert!((INIT_TARGET_MIN_M..=INIT_TARGET_MAX_M).contains(&init));

    for _ in 0..5 {
        now += 20;
        task.tick(now, buttons(true, false));
    }
    let expected = init + 0.01 * (1.0 + 1.1 + 1.21 + 1.331 + 1.4641);
    assert!((task.target_distance() - expected).abs() < 1e-9);

    let done = task.tick(now + 20, confirm());
    assert_eq!(done.phase, TrialPhase::Done);
    let file = done.saved_responses().expect("responses");
    assert_eq!(file.lines.len(), 2);
    assert!(file.lines[1].starts_with("0, 0.3, 4, 45, False, 1, "));
}

#[test]
fn reticle_clamps_to_minimum() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut task =
        LinearForwardTask::with_conditions(test_setup(dir.path()), four_metres_yaw_right());
    let mut now = to_adjust(&mut task);
    for _ in 0..500 {
        now += 20;
        task.tick(now, buttons(false, true));
    }
    assert_eq!(task.target_distance(), TARGET_MIN_M);
}

#[test]
fn full_run_logs_every_condition_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut task = LinearForwardTask::new(test_setup(dir.path()), ShufflePolicy::Uniform);
    let run = run_to_completion(|now, input| task.tick(now, input));
    assert_complete_run(&run, 20, LinearForwardRecord::HEADER);
}
