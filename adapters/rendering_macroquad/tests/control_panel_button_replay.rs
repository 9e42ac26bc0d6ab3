use life_canvas_rendering_macroquad::ControlPanelInputState;

fn run_sequence(
    sequence: &[bool],
    take: fn(&mut ControlPanelInputState) -> bool,
    register: fn(&mut ControlPanelInputState),
) -> Vec<bool> {
    let mut state = ControlPanelInputState::default();
    let mut observed = Vec::new();
    for &pressed in sequence {
        observed.push(take(&mut state));
        if pressed {
            register(&mut state);
        }
    }

    // Flush any trailing latched press so the harness observes the final action.
    observed.push(take(&mut state));
    observed
}

#[test]
fn play_button_toggle_sequence_is_deterministic() {
    let button_sequence = [false, true, false, true, true, false];
    let expected = vec![false, false, true, false, true, true, false];

    let first_run = run_sequence(
        &button_sequence,
        ControlPanelInputState::take_toggle_play,
        ControlPanelInputState::register_toggle_play,
    );
    let second_run = run_sequence(
        &button_sequence,
        ControlPanelInputState::take_toggle_play,
        ControlPanelInputState::register_toggle_play,
    );

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn clear_button_fires_once_per_press() {
    let button_sequence = [true, false, true, false, false, true];
    let expected = vec![false, true, false, true, false, false, true];

    let observed = run_sequence(
        &button_sequence,
        ControlPanelInputState::take_clear,
        ControlPanelInputState::register_clear,
    );

    assert_eq!(observed, expected);
}

#[test]
fn latches_are_independent() {
    let mut state = ControlPanelInputState::default();
    state.register_step();

    assert!(!state.take_clear());
    assert!(!state.take_toggle_play());
    assert!(state.take_step());
    assert!(!state.take_step(), "step latch must clear after being taken");
}
