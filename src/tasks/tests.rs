use std::path::{Path, PathBuf};

use rand::SeedableRng as _;

use super::*;

pub(super) const STAMP_MS: i64 = 1_700_000_000_000;

pub(super) fn test_setup(dir: &Path) -> TaskSetup {
    TaskSetup {
        output_dir: dir.to_path_buf(),
        session_stamp_ms: STAMP_MS,
        rng: StdRng::seed_from_u64(7),
    }
}

pub(super) fn confirm() -> InputSnapshot {
    InputSnapshot {
        confirm: true,
        ..InputSnapshot::IDLE
    }
}

pub(super) fn held(increment: bool, decrement: bool) -> InputSnapshot {
    InputSnapshot {
        increment_held: increment,
        decrement_held: decrement,
        ..InputSnapshot::IDLE
    }
}

pub(super) fn buttons(plus: bool, minus: bool) -> InputSnapshot {
    InputSnapshot {
        adjust_plus: plus,
        adjust_minus: minus,
        ..InputSnapshot::IDLE
    }
}

pub(super) struct FullRun {
    pub responses: LogFile,
    pub traces: Vec<PathBuf>,
    pub trace_starts: usize,
    pub conds_seen: Vec<usize>,
}

/// Holds the trigger down every tick until the engine reports `Done`.
pub(super) fn run_to_completion(mut tick: impl FnMut(u64, InputSnapshot) -> TaskOutput) -> FullRun {
    let mut responses = None;
    let mut traces = Vec::new();
    let mut trace_starts = 0;
    let mut conds_seen = Vec::new();

    for step in 0..1_000_000u64 {
        let out = tick(step * 50, confirm());
        for action in &out.actions {
            match action {
                TaskAction::StartTrace => {
                    trace_starts += 1;
                    conds_seen.push(out.cond);
                }
                TaskAction::SaveTrace(path) => traces.push(path.clone()),
                TaskAction::SaveResponses(file) => responses = Some(file.clone()),
                _ => {}
            }
        }
        if out.phase == TrialPhase::Done {
            break;
        }
    }

    FullRun {
        responses: responses.expect("task finished without saving responses"),
        traces,
        trace_starts,
        conds_seen,
    }
}

pub(super) fn assert_complete_run(run: &FullRun, expected: usize, header: &str) {
    assert_eq!(run.responses.lines.len(), expected + 1);
    assert_eq!(run.responses.lines[0], header);
    for (i, line) in run.responses.lines[1..].iter().enumerate() {
        let cond = line.split(", ").next().expect("cond column");
        assert_eq!(cond, i.to_string());
    }
    assert_eq!(run.trace_starts, expected);
    assert_eq!(run.traces.len(), expected);
    assert_eq!(run.conds_seen, (0..expected).collect::<Vec<_>>());
}

#[test]
fn task_kind_parses_cli_spellings() {
    assert_eq!("linear-forward".parse::<TaskKind>(), Ok(TaskKind::LinearForward));
    assert_eq!("linear_backward".parse::<TaskKind>(), Ok(TaskKind::LinearBackward));
    assert_eq!("rotation".parse::<TaskKind>(), Ok(TaskKind::Rotation));
    assert_eq!("triangle".parse::<TaskKind>(), Ok(TaskKind::TriangleCompletion));
    assert!("spiral".parse::<TaskKind>().is_err());
}

#[test]
fn file_names_carry_task_stamp_and_trial() {
    let run = TrialRun::new(
        TaskKind::TriangleCompletion,
        test_setup(Path::new("/data")),
        ConditionSet::<u8>::fixed(vec![1, 2]),
    );
    assert_eq!(
        run.response_path(),
        PathBuf::from("/data/Responses_triangle_1700000000000.txt")
    );
    assert_eq!(
        run.trace_path(3),
        PathBuf::from("/data/HeadTracking_triangle_completion_1700000000000_3.txt")
    );
}

#[test]
fn finish_trial_resets_observer_and_advances() {
    let mut run = TrialRun::new(
        TaskKind::Rotation,
        test_setup(Path::new("/data")),
        ConditionSet::<u8>::fixed(vec![1, 2]),
    );
    let mut context = DispatchContext::default();
    run.observer = Pose::new(crate::kinematics::Vec3::new(1.0, 2.0, 3.0), Pose::ORIGIN.orientation);

    assert!(run.finish_trial(&mut context));
    assert_eq!(run.cond, 1);
    assert_eq!(run.observer, Pose::ORIGIN);
    assert!(!run.finish_trial(&mut context));
    assert_eq!(run.cond, 1);
    assert!(matches!(context.actions[0], TaskAction::SaveTrace(_)));
}
