//! End-to-end stopwatch scenarios on mock hardware

use rstest::rstest;
use stopwatch_core::hal::mock::HalEvent;
use stopwatch_core::test_utils::{ScenarioRunner, Snapshot};
use stopwatch_core::{default_config, Button, Level, RunState, StopwatchConfig};

#[rstest]
fn start_one_second_pause_reset() {
    let mut runner = ScenarioRunner::fast().unwrap();
    assert_eq!(
        runner.snapshot(),
        Snapshot {
            digits: (0, 0, 0, 0),
            run_state: RunState::Stopped
        }
    );

    // Start is sampled inside the first pass of the super-cycle
    runner.tap(Button::Start).unwrap();
    let after_start = runner.idle_super_cycles(1).unwrap();
    assert_eq!(after_start.digits, (0, 0, 0, 1));
    assert_eq!(after_start.run_state, RunState::Running);

    runner.tap(Button::Pause).unwrap();
    let paused = runner.idle_super_cycles(3).unwrap();
    assert_eq!(paused.digits, (0, 0, 0, 1));
    assert_eq!(paused.run_state, RunState::Stopped);

    let reset = runner.tap(Button::Reset).unwrap();
    assert_eq!(reset.digits, (0, 0, 0, 0));
    assert_eq!(reset.run_state, RunState::Stopped);
}

#[rstest]
#[case(1, (0, 0, 0, 1))]
#[case(10, (0, 0, 1, 0))]
#[case(60, (0, 1, 0, 0))]
#[case(61, (0, 1, 0, 1))]
#[case(600, (1, 0, 0, 0))]
#[case(3599, (5, 9, 5, 9))]
#[case(3600, (0, 0, 0, 0))]
fn running_super_cycles_count_seconds(#[case] seconds: u32, #[case] digits: (u8, u8, u8, u8)) {
    let mut runner = ScenarioRunner::new(StopwatchConfig::new(1, 1, Level::Low).unwrap()).unwrap();
    runner.stopwatch_mut().hal_mut().press(Button::Start);
    for _ in 0..seconds {
        runner.stopwatch_mut().run_super_cycle().unwrap();
    }
    assert_eq!(runner.snapshot().digits, digits);
}

#[rstest]
#[case::start(Button::Start, RunState::Running)]
#[case::pause(Button::Pause, RunState::Stopped)]
#[case::reset(Button::Reset, RunState::Stopped)]
fn held_button_repeats_idempotently(#[case] button: Button, #[case] expected: RunState) {
    let mut runner = ScenarioRunner::fast().unwrap();
    let once = runner.tap(button).unwrap();
    let held = runner.hold(button, 3).unwrap();

    assert_eq!(once.run_state, expected);
    assert_eq!(held.run_state, expected);
}

#[rstest]
fn held_reset_keeps_zeroing_while_running_elsewhere() {
    let mut runner = ScenarioRunner::fast().unwrap();
    runner.tap(Button::Start).unwrap();
    runner.idle_super_cycles(5).unwrap();
    assert_eq!(runner.bank().total_seconds(), 5);

    // Reset held across a full super-cycle: no second is ever credited
    let held = runner.hold(Button::Reset, 8).unwrap();
    assert_eq!(held.digits, (0, 0, 0, 0));
    assert_eq!(held.run_state, RunState::Stopped);
}

#[rstest]
fn start_with_reset_pressed_keeps_counting() {
    let mut runner = ScenarioRunner::fast().unwrap();
    runner.tap(Button::Start).unwrap();
    runner.idle_super_cycles(2).unwrap();

    let hal = runner.stopwatch_mut().hal_mut();
    hal.press(Button::Start);
    hal.press(Button::Reset);
    runner.stopwatch_mut().run_super_cycle().unwrap();

    assert_eq!(runner.snapshot().run_state, RunState::Running);
    assert_eq!(runner.bank().total_seconds(), 3);
}

#[rstest]
fn pause_then_resume_continues_from_frozen_value() {
    let mut runner = ScenarioRunner::fast().unwrap();
    runner.tap(Button::Start).unwrap();
    runner.idle_super_cycles(59).unwrap();
    runner.tap(Button::Pause).unwrap();
    runner.idle_super_cycles(10).unwrap();
    assert_eq!(runner.snapshot().digits, (0, 0, 5, 9));

    runner.tap(Button::Start).unwrap();
    let resumed = runner.idle_super_cycles(1).unwrap();
    assert_eq!(resumed.digits, (0, 1, 0, 0));
}

#[rstest]
fn only_one_enable_high_whenever_a_digit_renders() {
    let mut runner = ScenarioRunner::fast().unwrap();
    runner.tap(Button::Start).unwrap();
    runner.idle_super_cycles(12).unwrap();

    let renders: Vec<[Level; 4]> = runner
        .stopwatch()
        .hal()
        .events()
        .iter()
        .filter_map(|event| match event {
            HalEvent::Render { enables, .. } => Some(*enables),
            _ => None,
        })
        .collect();

    assert!(!renders.is_empty());
    for enables in renders {
        assert_eq!(enables.iter().filter(|level| level.is_high()).count(), 1);
    }
}

#[rstest]
fn default_timing_spans_one_second_per_tick() {
    let mut runner = ScenarioRunner::new(default_config()).unwrap();
    runner.tap(Button::Start).unwrap();
    let before = runner.stopwatch().hal().elapsed();

    runner.idle_super_cycles(2).unwrap();
    let after = runner.stopwatch().hal().elapsed();

    assert_eq!(runner.bank().total_seconds(), 2);
    // Remaining 124 passes of the first cycle plus one full cycle
    assert_eq!(after.as_millis() - before.as_millis(), (124 + 125) * 8);
}

#[rstest]
#[case(1, 250)]
#[case(2, 125)]
#[case(4, 62)]
#[case(5, 50)]
#[case(10, 25)]
fn super_cycle_length_follows_dwell(#[case] dwell_ms: u64, #[case] passes: u16) {
    let config = StopwatchConfig::from_dwell_ms(dwell_ms).unwrap();
    assert_eq!(config.passes_per_tick, passes);
    let tick_ms = config.tick_period().as_millis();
    assert!((990..=1000).contains(&tick_ms), "tick {}ms", tick_ms);
}
