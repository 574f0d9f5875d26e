use super::*;

const EPS: f64 = 1e-9;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

#[test]
fn translate_is_monotonic_and_clamps_at_target() {
    let mut previous = 0.0;
    for step in 0..=200 {
        let t = f64::from(step) * 0.05;
        let d = translate(t, 1.4, 8.0);
        assert!(d >= previous);
        assert!(d <= 8.0);
        previous = d;
    }

    assert!(close(translate(8.0 / 1.4, 1.4, 8.0), 8.0));
    assert!(translate(8.0 / 1.4 - 0.01, 1.4, 8.0) < 8.0);
    assert_eq!(translate(100.0, 1.4, 8.0), 8.0);
}

#[test]
fn translate_before_phase_start_is_zero() {
    assert_eq!(translate(-1.0, 1.4, 8.0), 0.0);
}

#[test]
fn rotate_clamps_at_amplitude() {
    let at_clamp = rotate(1.5, 30.0, 45.0, Axis::Yaw, 1.0);
    assert!(close(at_clamp.yaw_deg, 45.0));
    assert_eq!(at_clamp.pitch_deg, 0.0);

    let late = rotate(10.0, 30.0, 45.0, Axis::Yaw, 1.0);
    assert_eq!(late.yaw_deg, 45.0);

    let early = rotate(1.0, 30.0, 45.0, Axis::Yaw, 1.0);
    assert!(close(early.yaw_deg, 30.0));
}

#[test]
fn rotate_sign_flips_only_the_driven_axis() {
    let up = rotate(1.0, 30.0, 45.0, Axis::Pitch, 1.0);
    let down = rotate(1.0, 30.0, 45.0, Axis::Pitch, -1.0);
    assert!(close(up.pitch_deg, -down.pitch_deg));
    assert_eq!(up.yaw_deg, 0.0);
    assert_eq!(down.yaw_deg, 0.0);
}

#[test]
fn spin_dir_matches_axis_convention() {
    assert_eq!(TurnDirection::Right.spin_dir(Axis::Pitch), -1.0);
    assert_eq!(TurnDirection::Left.spin_dir(Axis::Pitch), 1.0);
    assert_eq!(TurnDirection::Right.spin_dir(Axis::Yaw), 1.0);
    assert_eq!(TurnDirection::Left.spin_dir(Axis::Yaw), -1.0);
}

#[test]
fn place_polar_yaw_and_pitch() {
    let yaw = place_polar(2.0, 90.0, Axis::Yaw);
    assert!(close(yaw.x, 2.0));
    assert!(close(yaw.y, 0.0));
    assert!(close(yaw.z, 0.0));

    let pitch = place_polar(2.0, 90.0, Axis::Pitch);
    assert!(close(pitch.x, 0.0));
    assert!(close(pitch.y, -2.0));
    assert!(close(pitch.z, 0.0));

    let ahead = place_polar(4.0, 0.0, Axis::Pitch);
    assert!(close(ahead.z, 4.0));
}

#[test]
fn quaternion_from_yaw_and_pitch() {
    let q = EulerAngles::new(0.0, 90.0).to_quat();
    let h = 0.5_f64.sqrt();
    assert!(close(q.x, 0.0));
    assert!(close(q.y, h));
    assert!(close(q.z, 0.0));
    assert!(close(q.w, h));

    let q = EulerAngles::new(90.0, 90.0).to_quat();
    assert!(close(q.x, 0.5));
    assert!(close(q.y, 0.5));
    assert!(close(q.z, -0.5));
    assert!(close(q.w, 0.5));

    assert_eq!(EulerAngles::LEVEL.to_quat(), Quat::IDENTITY);
}

#[test]
fn accelerating_step_grows_geometrically_and_caps() {
    let mut step = AcceleratingStep::new(0.01, 0.5, 1.1);
    for n in 1..=30 {
        let size = step.advance(Some(StepDirection::Increase));
        let expected = (0.01 * 1.1_f64.powi(n - 1)).min(0.5);
        assert!((size - expected).abs() < 1e-12, "tick {n}: {size} != {expected}");
    }

    for _ in 0..100 {
        step.advance(Some(StepDirection::Increase));
    }
    assert_eq!(step.current(), 0.5);
}

#[test]
fn accelerating_step_resets_on_release_or_reversal() {
    let mut step = AcceleratingStep::new(0.1, 2.0, 1.01);
    step.advance(Some(StepDirection::Increase));
    step.advance(Some(StepDirection::Increase));
    assert!(step.current() > 0.1);

    assert_eq!(step.advance(None), 0.0);
    assert_eq!(step.advance(Some(StepDirection::Increase)), 0.1);
    step.advance(Some(StepDirection::Increase));
    assert_eq!(step.advance(Some(StepDirection::Decrease)), 0.1);
}

#[test]
fn apply_clamps_to_bounds() {
    let mut step = AcceleratingStep::new(0.01, 0.5, 1.1);
    let mut value = 31.99;
    for _ in 0..50 {
        value = step.apply(value, Some(StepDirection::Increase), 0.5, 32.0);
    }
    assert_eq!(value, 32.0);

    let mut value = 0.6;
    for _ in 0..50 {
        value = step.apply(value, Some(StepDirection::Decrease), 0.5, 32.0);
    }
    assert_eq!(value, 0.5);
}

#[test]
fn increase_wins_over_decrease() {
    assert_eq!(
        StepDirection::from_flags(true, true),
        Some(StepDirection::Increase)
    );
    assert_eq!(StepDirection::from_flags(false, false), None);
}
