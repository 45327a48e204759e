//! Pin-level behaviour of the embedded-hal adapter against scripted mocks

use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::pin::{Mock as PinMock, State, Transaction};
use stopwatch_core::{
    EmbeddedHalStopwatch, Level, RunState, SegmentPolarity, SevenSegmentPins, Stopwatch,
    StopwatchConfig,
};

type MockStopwatch =
    Stopwatch<EmbeddedHalStopwatch<PinMock, PinMock, SevenSegmentPins<PinMock>, NoopDelay>>;

/// Segment line levels for `0` on a common-cathode display (a..f lit, g dark)
fn zero_pattern_line(line: usize) -> State {
    if line < 6 {
        State::High
    } else {
        State::Low
    }
}

/// Enable line `digit`: low at startup, then high only during its own slot
fn enable_transactions(digit: usize, passes: usize) -> Vec<Transaction> {
    let mut transactions = vec![Transaction::set(State::Low)];
    for _ in 0..passes {
        for slot in 0..4 {
            let state = if slot == digit { State::High } else { State::Low };
            transactions.push(Transaction::set(state));
        }
    }
    transactions
}

fn segment_pins(renders: usize) -> [PinMock; 7] {
    std::array::from_fn(|line| PinMock::new(&vec![Transaction::set(zero_pattern_line(line)); renders]))
}

fn build(buttons: [PinMock; 3], passes: usize) -> MockStopwatch {
    let enables: [PinMock; 4] =
        std::array::from_fn(|digit| PinMock::new(&enable_transactions(digit, passes)));

    let hal = EmbeddedHalStopwatch::new(
        buttons,
        enables,
        SevenSegmentPins::new(segment_pins(passes * 4), SegmentPolarity::CommonCathode),
        NoopDelay::new(),
    );
    Stopwatch::new(hal, StopwatchConfig::new(2, 2, Level::Low).unwrap())
}

fn finish(stopwatch: MockStopwatch) {
    let (buttons, enables, segments, _delay) = stopwatch.release().release();
    for mut pin in buttons.into_iter().chain(enables).chain(segments.release()) {
        pin.done();
    }
}

#[test]
fn idle_pass_reads_every_button_and_scans_digits() {
    let released = |reads: usize| PinMock::new(&vec![Transaction::get(State::High); reads]);
    let mut stopwatch = build([released(4), released(4), released(4)], 1);

    stopwatch.init().unwrap();
    assert!(!stopwatch.run_pass().unwrap());
    assert_eq!(stopwatch.run_state(), RunState::Stopped);

    finish(stopwatch);
}

#[test]
fn held_start_short_circuits_lower_priority_reads() {
    // Pause and reset are never read while start is held
    let start = PinMock::new(&vec![Transaction::get(State::Low); 8]);
    let mut stopwatch = build([start, PinMock::new(&[]), PinMock::new(&[])], 2);

    stopwatch.init().unwrap();
    assert!(!stopwatch.run_pass().unwrap());
    assert!(stopwatch.run_pass().unwrap());
    assert_eq!(stopwatch.run_state(), RunState::Running);

    finish(stopwatch);
}
