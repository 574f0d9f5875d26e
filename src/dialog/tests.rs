use super::*;

fn press(increment: bool, decrement: bool, confirm: bool) -> InputSnapshot {
    InputSnapshot {
        increment,
        decrement,
        confirm,
        ..InputSnapshot::IDLE
    }
}

fn three_choices() -> ChoiceDialog {
    let mut dialog = ChoiceDialog::new();
    let commands = dialog.set_elements("Choose", ["a", "b", "c"]);
    assert_eq!(
        commands,
        vec![
            SceneCommand::DialogTitle("Choose".into()),
            SceneCommand::DialogChoice("a".into()),
        ]
    );
    dialog
}

#[test]
fn increment_wraps_to_previous_choice() {
    let mut dialog = three_choices();
    let mut commands = Vec::new();
    assert!(dialog.update(&press(true, false, false), &mut commands));
    assert_eq!(dialog.current(), 2);
    assert_eq!(commands, vec![SceneCommand::DialogChoice("c".into())]);
}

#[test]
fn decrement_wraps_to_next_choice() {
    let mut dialog = three_choices();
    let mut commands = Vec::new();
    for _ in 0..4 {
        dialog.update(&press(false, true, false), &mut commands);
    }
    assert_eq!(dialog.current(), 1);
}

#[test]
fn confirm_latches_response_and_freezes_navigation() {
    let mut dialog = three_choices();
    let mut commands = Vec::new();
    assert_eq!(dialog.response(), None);

    dialog.update(&press(false, true, false), &mut commands);
    dialog.update(&press(false, false, true), &mut commands);
    assert_eq!(dialog.response(), Some(1));

    assert!(!dialog.update(&press(false, true, false), &mut commands));
    assert_eq!(dialog.response(), Some(1));
}

#[test]
fn new_elements_clear_response() {
    let mut dialog = three_choices();
    let mut commands = Vec::new();
    dialog.update(&press(false, true, true), &mut commands);
    assert!(dialog.response().is_some());

    dialog.set_elements("Again", ["x", "y"]);
    assert_eq!(dialog.response(), None);
    assert_eq!(dialog.current(), 0);
}
