use super::*;

fn stick(x: f32) -> RawControls {
    RawControls {
        stick_x: x,
        ..RawControls::default()
    }
}

fn trigger(value: f32) -> RawControls {
    RawControls {
        trigger: value,
        ..RawControls::default()
    }
}

fn armed() -> ResponseInput {
    let mut input = ResponseInput::default();
    input.update(RawControls::default());
    input
}

#[test]
fn confirm_fires_once_per_press() {
    let mut input = ResponseInput::default();
    let mut fired = 0;
    for _ in 0..3 {
        for _ in 0..5 {
            if input.update(trigger(0.9)).confirm {
                fired += 1;
            }
        }
        for _ in 0..2 {
            assert!(!input.update(trigger(0.1)).confirm);
        }
    }
    assert_eq!(fired, 3);
}

#[test]
fn trigger_at_threshold_counts_as_released() {
    let mut input = ResponseInput::default();
    assert!(input.update(trigger(0.6)).confirm);
    assert!(!input.update(trigger(0.5)).confirm);
    assert!(input.update(trigger(0.6)).confirm);
}

#[test]
fn stick_needs_neutral_before_first_edge() {
    let mut input = ResponseInput::default();
    let first = input.update(stick(0.9));
    assert!(!first.increment);
    assert!(!first.increment_held);

    input.update(stick(0.0));
    assert!(input.update(stick(0.9)).increment);
}

#[test]
fn increment_edge_fires_once_while_held_stays_asserted() {
    let mut input = armed();
    let mut edges = 0;
    for _ in 0..10 {
        let snapshot = input.update(stick(0.8));
        assert!(snapshot.increment_held);
        if snapshot.increment {
            edges += 1;
        }
    }
    assert_eq!(edges, 1);

    let released = input.update(stick(0.0));
    assert!(!released.increment_held);
    assert!(input.update(stick(0.8)).increment);
}

#[test]
fn decrement_on_negative_stick() {
    let mut input = armed();
    let snapshot = input.update(stick(-0.7));
    assert!(snapshot.decrement);
    assert!(snapshot.decrement_held);
    assert!(!snapshot.increment);
}

#[test]
fn small_deflection_neither_fires_nor_rearms() {
    let mut input = armed();
    assert!(input.update(stick(0.9)).increment);
    // Partially released but outside the deadzone: no re-arm.
    input.update(stick(0.3));
    assert!(!input.update(stick(0.9)).increment);
}

#[test]
fn reset_disarms_until_neutral() {
    let mut input = armed();
    assert!(input.update(stick(0.9)).increment);
    input.reset();
    assert!(!input.snapshot().increment_held);

    let still_held = input.update(stick(0.9));
    assert!(!still_held.increment);
    assert!(!still_held.increment_held);

    input.update(stick(0.0));
    assert!(input.update(stick(0.9)).increment);
}

#[test]
fn buttons_are_level_triggered() {
    let mut input = ResponseInput::default();
    let held = RawControls {
        button_a: 1.0,
        button_b: 0.7,
        ..RawControls::default()
    };
    for _ in 0..4 {
        let snapshot = input.update(held);
        assert!(snapshot.adjust_plus);
        assert!(snapshot.adjust_minus);
    }
    assert!(!input.update(RawControls::default()).adjust_plus);
}
