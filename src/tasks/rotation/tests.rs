use super::super::tests::{
    assert_complete_run, confirm, held, run_to_completion, test_setup, STAMP_MS,
};
use super::*;
use crate::{
    conditions::ConditionSet,
    kinematics::TurnDirection,
    recording::write_log_file,
    tasks::TaskAction,
};

const IDLE: InputSnapshot = InputSnapshot::IDLE;

fn one_condition(axis: Axis, turn: TurnDirection) -> ConditionSet<RotationCondition> {
    ConditionSet::fixed(vec![RotationCondition {
        angle_deg: 135.0,
        axis,
        turn,
    }])
}

/// Walks a fresh task to `TurnBack`, starting the turn at 1 s.
fn turned(task: &mut RotationTask) -> u64 {
    task.tick(0, IDLE);
    task.tick(100, confirm());
    task.tick(200, IDLE);
    task.tick(300, confirm());
    task.tick(1_000, confirm());
    let out = task.tick(2_500, IDLE);
    assert_eq!(out.phase, TrialPhase::TurnBack);
    2_500
}

#[test]
fn single_condition_turns_then_logs_one_response() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut task = RotationTask::with_conditions(
        test_setup(dir.path()),
        one_condition(Axis::Yaw, TurnDirection::Right),
    );

    assert_eq!(task.tick(0, IDLE).phase, TrialPhase::Setup);
    assert_eq!(task.tick(50, IDLE).phase, TrialPhase::Setup);
    assert_eq!(task.tick(100, confirm()).phase, TrialPhase::BeforeMotion);

    let loaded = task.tick(200, IDLE);
    assert_eq!(loaded.phase, TrialPhase::WaitForButtonPress);
    assert!(loaded.actions.contains(&TaskAction::StartTrace));
    assert!(loaded
        .scene_commands()
        .any(|c| *c == SceneCommand::DialogChoice("Condition 1/1".into())));

    assert_eq!(task.tick(300, confirm()).phase, TrialPhase::WaitToTurn);
    assert_eq!(task.tick(1_000, confirm()).phase, TrialPhase::Turn);

    let mut now = 1_000;
    let mut last_yaw = 0.0;
    loop {
        now += 50;
        let out = task.tick(now, IDLE);
        let yaw = out.observer.orientation.yaw_deg;
        assert!(yaw <= 45.0, "overshot to {yaw} at {now}");
        assert!(yaw >= last_yaw);
        assert_eq!(out.observer.orientation.pitch_deg, 0.0);
        last_yaw = yaw;
        if now < 2_500 {
            assert_eq!(out.phase, TrialPhase::Turn, "left Turn early at {now}");
        } else {
            assert_eq!(out.phase, TrialPhase::TurnBack);
            assert_eq!(yaw, 45.0);
            break;
        }
    }

    let done = task.tick(2_600, confirm());
    assert_eq!(done.phase, TrialPhase::Done);
    assert_eq!(done.observer, Pose::ORIGIN);
    assert!(done.actions.contains(&TaskAction::SaveTrace(
        dir.path()
            .join(format!("HeadTracking_rotation_{STAMP_MS}_0.txt"))
    )));

    let file = done.saved_responses().expect("responses flushed");
    assert_eq!(
        file.path,
        dir.path().join(format!("Responses_rotation_{STAMP_MS}.txt"))
    );
    write_log_file(file).expect("write responses");
    let text = std::fs::read_to_string(&file.path).expect("read back");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec![RotationRecord::HEADER, "0, 1, 135, False, 1, 0"]);

    assert!(!task.tick(2_700, IDLE).terminated());
    assert!(task.tick(2_800, confirm()).terminated());
}

#[test]
fn pitch_right_turns_upward() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut task = RotationTask::with_conditions(
        test_setup(dir.path()),
        one_condition(Axis::Pitch, TurnDirection::Right),
    );
    turned(&mut task);
    let out = task.tick(2_550, IDLE);
    assert_eq!(out.observer.orientation.pitch_deg, -45.0);
    assert_eq!(out.observer.orientation.yaw_deg, 0.0);
}

#[test]
fn held_stick_accelerates_turn_back_and_clamps() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut task = RotationTask::with_conditions(
        test_setup(dir.path()),
        one_condition(Axis::Yaw, TurnDirection::Left),
    );
    let mut now = turned(&mut task);

    for _ in 0..10 {
        now += 20;
        task.tick(now, held(true, false));
    }
    let after_ten = task.turn_angle();
    let expected: f64 = (0..10).map(|k| 0.1 * 1.01_f64.powi(k)).sum();
    assert!((after_ten - expected).abs() < 1e-9);

    now += 20;
    let out = task.tick(now, held(false, true));
    assert!((task.turn_angle() - (after_ten - 0.1)).abs() < 1e-9);
    // Left yaw turns are negative, so the heading is -(45 + angle).
    assert!((out.observer.orientation.yaw_deg + 45.0 + task.turn_angle()).abs() < 1e-9);

    for _ in 0..2_000 {
        now += 20;
        task.tick(now, held(true, false));
    }
    assert_eq!(task.turn_angle(), 180.0);
}

#[test]
fn full_run_logs_every_condition_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut task = RotationTask::new(test_setup(dir.path()), ShufflePolicy::LegacySwap);
    let run = run_to_completion(|now, input| task.tick(now, input));
    assert_complete_run(&run, 12, RotationRecord::HEADER);
}

#[test]
fn empty_table_completes_immediately() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut task =
        RotationTask::with_conditions(test_setup(dir.path()), ConditionSet::fixed(Vec::new()));
    task.tick(0, IDLE);
    task.tick(100, confirm());
    let out = task.tick(200, IDLE);
    assert_eq!(out.phase, TrialPhase::Done);
    assert_eq!(
        out.saved_responses().map(|f| f.lines.len()),
        Some(1)
    );
}
