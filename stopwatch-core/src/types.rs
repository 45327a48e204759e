//! Core data types for the stopwatch

use core::fmt;
use core::fmt::Write as _;

use heapless::String;

use crate::hal::{Duration, HalError};

/// Number of physical digit positions on the display
pub const DIGIT_COUNT: usize = 4;

/// Elapsed time wraps at one hour (59:59 -> 00:00)
pub const SECONDS_PER_WRAP: u16 = 3600;

/// Electrical level of a logical pin
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub const fn is_high(&self) -> bool {
        matches!(self, Level::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// One of the four physical 7-segment digits
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DigitPosition {
    SecondsUnits,
    SecondsTens,
    MinutesUnits,
    MinutesTens,
}

impl DigitPosition {
    /// Fixed multiplexer scan order
    pub const SCAN_ORDER: [DigitPosition; DIGIT_COUNT] = [
        DigitPosition::SecondsUnits,
        DigitPosition::SecondsTens,
        DigitPosition::MinutesUnits,
        DigitPosition::MinutesTens,
    ];

    /// Index of this position within [`Self::SCAN_ORDER`]
    pub const fn index(&self) -> usize {
        match self {
            DigitPosition::SecondsUnits => 0,
            DigitPosition::SecondsTens => 1,
            DigitPosition::MinutesUnits => 2,
            DigitPosition::MinutesTens => 3,
        }
    }
}

/// Push buttons wired to the sampler
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Start,
    Pause,
    Reset,
}

impl Button {
    /// Evaluation order of a sample; the first pressed button wins
    pub const PRIORITY: [Button; 3] = [Button::Start, Button::Pause, Button::Reset];

    /// Index of this button within [`Self::PRIORITY`]
    pub const fn index(&self) -> usize {
        match self {
            Button::Start => 0,
            Button::Pause => 1,
            Button::Reset => 2,
        }
    }

    /// Action requested by pressing this button
    pub const fn action(&self) -> ButtonAction {
        match self {
            Button::Start => ButtonAction::Start,
            Button::Pause => ButtonAction::Pause,
            Button::Reset => ButtonAction::Reset,
        }
    }
}

/// Action resolved from one input sample
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonAction {
    /// Start or resume counting
    Start,
    /// Stop counting, keep the elapsed time
    Pause,
    /// Stop counting and zero the elapsed time
    Reset,
}

/// Stopwatch run state
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    /// Counter frozen (initial state, and the state after pause or reset)
    #[default]
    Stopped,
    /// Counter advancing once per super-cycle
    Running,
}

impl RunState {
    pub const fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }
}

/// Four bounded decimal counters holding elapsed mm:ss
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitBank {
    seconds_units: u8,
    seconds_tens: u8,
    minutes_units: u8,
    minutes_tens: u8,
}

impl DigitBank {
    /// All digits zero
    pub const fn new() -> Self {
        Self {
            seconds_units: 0,
            seconds_tens: 0,
            minutes_units: 0,
            minutes_tens: 0,
        }
    }

    /// Build a bank from elapsed seconds, wrapping at one hour
    pub const fn from_seconds(seconds: u16) -> Self {
        let s = seconds % SECONDS_PER_WRAP;
        let minutes = (s / 60) as u8;
        let secs = (s % 60) as u8;
        Self {
            seconds_units: secs % 10,
            seconds_tens: secs / 10,
            minutes_units: minutes % 10,
            minutes_tens: minutes / 10,
        }
    }

    /// Credit one second, carrying through all four digits.
    ///
    /// 59:59 wraps to 00:00.
    pub fn advance(&mut self) {
        self.seconds_units += 1;
        if self.seconds_units == 10 {
            self.seconds_units = 0;
            self.seconds_tens += 1;
        }

        if self.seconds_tens == 6 {
            self.seconds_units = 0;
            self.seconds_tens = 0;
            self.minutes_units += 1;
        }

        if self.minutes_units == 10 {
            self.minutes_units = 0;
            self.minutes_tens += 1;
        }

        if self.minutes_tens == 6 {
            self.minutes_units = 0;
            self.minutes_tens = 0;
        }
    }

    /// Zero all four digits
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Value of the digit shown at `position`
    pub const fn digit(&self, position: DigitPosition) -> u8 {
        match position {
            DigitPosition::SecondsUnits => self.seconds_units,
            DigitPosition::SecondsTens => self.seconds_tens,
            DigitPosition::MinutesUnits => self.minutes_units,
            DigitPosition::MinutesTens => self.minutes_tens,
        }
    }

    /// Digits in reading order: (min-tens, min-units, sec-tens, sec-units)
    pub const fn digits(&self) -> (u8, u8, u8, u8) {
        (
            self.minutes_tens,
            self.minutes_units,
            self.seconds_tens,
            self.seconds_units,
        )
    }

    pub const fn minutes(&self) -> u8 {
        self.minutes_tens * 10 + self.minutes_units
    }

    pub const fn seconds(&self) -> u8 {
        self.seconds_tens * 10 + self.seconds_units
    }

    /// Elapsed time in seconds, always below [`SECONDS_PER_WRAP`]
    pub const fn total_seconds(&self) -> u16 {
        self.minutes() as u16 * 60 + self.seconds() as u16
    }

    pub const fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }

    /// Render as `mm:ss`
    pub fn render_mmss(&self) -> String<5> {
        let mut out = String::new();
        // Five characters always fit
        let _ = write!(out, "{}", self);
        out
    }
}

impl fmt::Display for DigitBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            self.minutes_tens, self.minutes_units, self.seconds_tens, self.seconds_units
        )
    }
}

/// Upper bound on one full pass; beyond this the digits visibly flicker
pub const MAX_PASS_PERIOD_MS: u64 = 40;

/// Stopwatch timing configuration
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StopwatchConfig {
    /// Hold time of each digit within a pass
    pub dwell: Duration,
    /// Passes per credited second (super-cycle length)
    pub passes_per_tick: u16,
    /// Level read on a button input while it is held down
    pub pressed_level: Level,
}

impl Default for StopwatchConfig {
    fn default() -> Self {
        Self {
            dwell: Duration::from_millis(2),
            passes_per_tick: 125, // 1000 / (2 * 4)
            pressed_level: Level::Low,
        }
    }
}

impl StopwatchConfig {
    /// Create a new configuration with validation
    pub fn new(
        dwell_ms: u64,
        passes_per_tick: u16,
        pressed_level: Level,
    ) -> Result<Self, &'static str> {
        Self::check(dwell_ms, passes_per_tick)?;
        Ok(Self {
            dwell: Duration::from_millis(dwell_ms),
            passes_per_tick,
            pressed_level,
        })
    }

    fn check(dwell_ms: u64, passes_per_tick: u16) -> Result<(), &'static str> {
        if dwell_ms == 0 {
            return Err("Dwell must be at least 1ms");
        }
        let pass_too_long = dwell_ms
            .checked_mul(DIGIT_COUNT as u64)
            .map_or(true, |pass_ms| pass_ms > MAX_PASS_PERIOD_MS);
        if pass_too_long {
            return Err("Pass period must be <= 40ms");
        }
        if passes_per_tick == 0 {
            return Err("Passes per tick must be at least 1");
        }
        Ok(())
    }

    /// Re-check a configuration built field by field
    pub fn validate(&self) -> Result<(), HalError> {
        Self::check(self.dwell.as_millis(), self.passes_per_tick)
            .map_err(|_| HalError::InvalidConfig)
    }

    /// Derive the super-cycle length so one tick spans about one second
    pub fn from_dwell_ms(dwell_ms: u64) -> Result<Self, &'static str> {
        let pass_ms = dwell_ms.saturating_mul(DIGIT_COUNT as u64).max(1);
        let passes = (1000 / pass_ms).clamp(1, u16::MAX as u64) as u16;
        Self::new(dwell_ms, passes, Level::Low)
    }

    /// Duration of one full pass over all digits
    pub fn pass_period(&self) -> Duration {
        self.dwell * DIGIT_COUNT as u32
    }

    /// Duration of one super-cycle
    pub fn tick_period(&self) -> Duration {
        self.pass_period() * self.passes_per_tick as u32
    }
}
