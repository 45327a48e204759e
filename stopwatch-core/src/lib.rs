#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # Stopwatch Core
//!
//! Control loop for a four-digit multiplexed 7-segment stopwatch with
//! start, pause and reset buttons. One owned context, one loop, no interrupts.

pub mod types;
pub mod segments;
pub mod controller;
pub mod display;
pub mod scheduler;
pub mod hal;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use types::*;
pub use segments::Segments;
pub use controller::*;
pub use display::*;
pub use scheduler::*;
pub use hal::{Duration, EmbeddedHalStopwatch, HalError, SegmentDriver, SegmentPolarity, SevenSegmentPins, StopwatchHal};

/// Stopwatch library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 2ms per digit, 125 passes per second
pub fn default_config() -> StopwatchConfig {
    StopwatchConfig {
        dwell: Duration::from_millis(2),
        passes_per_tick: 125,
        pressed_level: Level::Low,
    }
}
