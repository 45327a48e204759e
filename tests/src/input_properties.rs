//! Button precedence and run-state properties

use proptest::prelude::*;
use stopwatch_core::hal::mock::MockStopwatchHal;
use stopwatch_core::test_utils::ScenarioRunner;
use stopwatch_core::{
    Button, ButtonAction, DigitBank, InputSampler, RunState, RunStateController, StopwatchHal,
};

fn hal_with(start: bool, pause: bool, reset: bool) -> MockStopwatchHal {
    let mut hal = MockStopwatchHal::new();
    for button in Button::PRIORITY {
        hal.configure_input(button).unwrap();
    }
    for (button, pressed) in [(Button::Start, start), (Button::Pause, pause), (Button::Reset, reset)] {
        if pressed {
            hal.press(button);
        }
    }
    hal
}

fn expected_action(start: bool, pause: bool, reset: bool) -> Option<ButtonAction> {
    if start {
        Some(ButtonAction::Start)
    } else if pause {
        Some(ButtonAction::Pause)
    } else if reset {
        Some(ButtonAction::Reset)
    } else {
        None
    }
}

fn any_run_state() -> impl Strategy<Value = RunState> {
    prop_oneof![Just(RunState::Stopped), Just(RunState::Running)]
}

proptest! {
    #[test]
    fn first_pressed_in_priority_wins(start: bool, pause: bool, reset: bool) {
        let mut hal = hal_with(start, pause, reset);
        let action = InputSampler::default().sample(&mut hal).unwrap();
        prop_assert_eq!(action, expected_action(start, pause, reset));
    }

    #[test]
    fn sample_applies_to_state_and_bank(
        start in any::<bool>(),
        pause in any::<bool>(),
        reset in any::<bool>(),
        initial in any_run_state(),
        seconds in 0u16..3600
    ) {
        let mut hal = hal_with(start, pause, reset);
        let mut controller = RunStateController::new();
        let mut bank = DigitBank::from_seconds(seconds);
        if initial == RunState::Running {
            controller.apply(ButtonAction::Start, &mut bank);
        }

        if let Some(action) = InputSampler::default().sample(&mut hal).unwrap() {
            controller.apply(action, &mut bank);
        }

        let expected_state = match expected_action(start, pause, reset) {
            Some(ButtonAction::Start) => RunState::Running,
            Some(ButtonAction::Pause) | Some(ButtonAction::Reset) => RunState::Stopped,
            None => initial,
        };
        prop_assert_eq!(controller.state(), expected_state);

        let zeroed = !start && !pause && reset;
        if zeroed {
            prop_assert!(bank.is_zero());
        } else {
            prop_assert_eq!(bank.total_seconds(), seconds);
        }
    }

    #[test]
    fn stopped_stopwatch_never_counts(seconds_running in 0u32..4, idle_cycles in 1u32..6) {
        let mut runner = ScenarioRunner::fast().unwrap();
        runner.tap(Button::Start).unwrap();
        runner.idle_super_cycles(seconds_running).unwrap();
        runner.tap(Button::Pause).unwrap();
        let frozen = runner.bank();

        let after = runner.idle_super_cycles(idle_cycles).unwrap();
        prop_assert_eq!(after.run_state, RunState::Stopped);
        prop_assert_eq!(runner.bank(), frozen);
    }
}
