//! Hardware Abstraction Layer for the stopwatch control loop

// Re-export time types based on feature
#[cfg(feature = "embassy-time")]
pub use embassy_time::Duration;

#[cfg(not(feature = "embassy-time"))]
pub use self::mock_time::Duration;

#[cfg(not(feature = "embassy-time"))]
mod mock_time {
    /// Millisecond duration for builds without embassy-time
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Duration(u64);

    impl Duration {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }
    }

    impl core::ops::Mul<u32> for Duration {
        type Output = Duration;

        fn mul(self, rhs: u32) -> Duration {
            Duration(self.0 * rhs as u64)
        }
    }

    impl core::ops::Add for Duration {
        type Output = Duration;

        fn add(self, rhs: Duration) -> Duration {
            Duration(self.0 + rhs.0)
        }
    }

    impl core::ops::AddAssign for Duration {
        fn add_assign(&mut self, rhs: Duration) {
            self.0 += rhs.0;
        }
    }
}

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::segments::Segments;
use crate::types::{Button, DigitPosition, Level, DIGIT_COUNT};

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// Timing operation failed
    TimingError,
    /// Value outside 0..=9 sent to the segment lines
    InvalidDigit,
    /// Pins used before the startup configuration ran
    NotInitialized,
    /// Invalid configuration
    InvalidConfig,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::TimingError => write!(f, "Timing operation failed"),
            HalError::InvalidDigit => write!(f, "Digit value out of range"),
            HalError::NotInitialized => write!(f, "Hardware not initialized"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Capability set the control loop needs from the board
///
/// Inputs are addressed by [`Button`] and outputs by [`DigitPosition`], so a
/// digit-enable line can never be read and a button can never be driven.
pub trait StopwatchHal {
    type Error: From<HalError>;

    /// Mark a button line as input with its pull-up enabled
    fn configure_input(&mut self, button: Button) -> Result<(), Self::Error>;

    /// Mark a digit-enable line as output
    fn configure_output(&mut self, digit: DigitPosition) -> Result<(), Self::Error>;

    /// Drive a digit-enable line
    fn write_digital(&mut self, digit: DigitPosition, level: Level) -> Result<(), Self::Error>;

    /// Read the instantaneous level of a button line
    fn read_digital(&mut self, button: Button) -> Result<Level, Self::Error>;

    /// Drive the shared segment lines with the pattern for `value`
    fn render_digit(&mut self, value: u8) -> Result<(), Self::Error>;

    /// Block for `duration`
    fn wait(&mut self, duration: Duration) -> Result<(), Self::Error>;
}

/// Shared segment lines a..g
pub trait SegmentDriver {
    type Error: From<HalError>;

    fn write_segments(&mut self, segments: Segments) -> Result<(), Self::Error>;
}

/// Segment wiring polarity
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SegmentPolarity {
    /// Segment lit when its line is high
    CommonCathode,
    /// Segment lit when its line is low
    CommonAnode,
}

/// Seven embedded-hal output pins, index 0 = segment a
pub struct SevenSegmentPins<P> {
    pins: [P; 7],
    polarity: SegmentPolarity,
}

impl<P> SevenSegmentPins<P>
where
    P: OutputPin,
{
    pub fn new(pins: [P; 7], polarity: SegmentPolarity) -> Self {
        Self { pins, polarity }
    }

    pub fn release(self) -> [P; 7] {
        self.pins
    }
}

impl<P> SegmentDriver for SevenSegmentPins<P>
where
    P: OutputPin,
{
    type Error = HalError;

    fn write_segments(&mut self, segments: Segments) -> Result<(), Self::Error> {
        for (index, pin) in self.pins.iter_mut().enumerate() {
            let lit = segments.is_lit(index);
            let high = match self.polarity {
                SegmentPolarity::CommonCathode => lit,
                SegmentPolarity::CommonAnode => !lit,
            };
            if high {
                pin.set_high().map_err(|_| HalError::GpioError)?;
            } else {
                pin.set_low().map_err(|_| HalError::GpioError)?;
            }
        }
        Ok(())
    }
}

/// Generic implementation for embedded-hal compatible pins
///
/// embedded-hal pins carry their mode in the type, so the `configure_*`
/// capabilities are satisfied at construction and do nothing here.
pub struct EmbeddedHalStopwatch<I, O, S, D> {
    buttons: [I; 3],
    digit_enables: [O; DIGIT_COUNT],
    segments: S,
    delay: D,
}

impl<I, O, S, D> EmbeddedHalStopwatch<I, O, S, D>
where
    I: InputPin,
    O: OutputPin,
    S: SegmentDriver,
    D: DelayNs,
{
    /// `buttons` in [`Button::PRIORITY`] order, `digit_enables` in
    /// [`DigitPosition::SCAN_ORDER`] order
    pub fn new(buttons: [I; 3], digit_enables: [O; DIGIT_COUNT], segments: S, delay: D) -> Self {
        Self {
            buttons,
            digit_enables,
            segments,
            delay,
        }
    }

    pub fn release(self) -> ([I; 3], [O; DIGIT_COUNT], S, D) {
        (self.buttons, self.digit_enables, self.segments, self.delay)
    }
}

impl<I, O, S, D> StopwatchHal for EmbeddedHalStopwatch<I, O, S, D>
where
    I: InputPin,
    O: OutputPin,
    S: SegmentDriver<Error = HalError>,
    D: DelayNs,
{
    type Error = HalError;

    fn configure_input(&mut self, _button: Button) -> Result<(), Self::Error> {
        Ok(())
    }

    fn configure_output(&mut self, _digit: DigitPosition) -> Result<(), Self::Error> {
        Ok(())
    }

    fn write_digital(&mut self, digit: DigitPosition, level: Level) -> Result<(), Self::Error> {
        let pin = &mut self.digit_enables[digit.index()];
        match level {
            Level::High => pin.set_high(),
            Level::Low => pin.set_low(),
        }
        .map_err(|_| HalError::GpioError)
    }

    fn read_digital(&mut self, button: Button) -> Result<Level, Self::Error> {
        self.buttons[button.index()]
            .is_high()
            .map(Level::from)
            .map_err(|_| HalError::GpioError)
    }

    fn render_digit(&mut self, value: u8) -> Result<(), Self::Error> {
        let segments = Segments::from_digit(value).ok_or(HalError::InvalidDigit)?;
        self.segments.write_segments(segments)
    }

    fn wait(&mut self, duration: Duration) -> Result<(), Self::Error> {
        let ms = u32::try_from(duration.as_millis()).map_err(|_| HalError::TimingError)?;
        self.delay.delay_ms(ms);
        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use std::vec::Vec;

    /// One recorded capability call
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub enum HalEvent {
        ConfigureInput(Button),
        ConfigureOutput(DigitPosition),
        Write(DigitPosition, Level),
        Read(Button),
        /// Rendered value with the enable levels at that instant
        Render {
            value: u8,
            enables: [Level; DIGIT_COUNT],
        },
        Wait(Duration),
    }

    /// Recording mock board
    ///
    /// Buttons follow pull-up wiring: released reads high, pressed reads low.
    #[derive(Debug)]
    pub struct MockStopwatchHal {
        button_levels: [Level; 3],
        enables: [Level; DIGIT_COUNT],
        inputs_configured: [bool; 3],
        outputs_configured: [bool; DIGIT_COUNT],
        events: Vec<HalEvent>,
        elapsed: Duration,
        fail_reads: bool,
    }

    impl Default for MockStopwatchHal {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockStopwatchHal {
        pub fn new() -> Self {
            Self {
                button_levels: [Level::High; 3],
                enables: [Level::Low; DIGIT_COUNT],
                inputs_configured: [false; 3],
                outputs_configured: [false; DIGIT_COUNT],
                events: Vec::new(),
                elapsed: Duration::from_millis(0),
                fail_reads: false,
            }
        }

        /// Hold a button down
        pub fn press(&mut self, button: Button) {
            self.button_levels[button.index()] = Level::Low;
        }

        /// Let a button go
        pub fn release(&mut self, button: Button) {
            self.button_levels[button.index()] = Level::High;
        }

        pub fn release_all(&mut self) {
            self.button_levels = [Level::High; 3];
        }

        /// Make every subsequent button read fail
        pub fn fail_reads(&mut self, fail: bool) {
            self.fail_reads = fail;
        }

        pub fn enables(&self) -> [Level; DIGIT_COUNT] {
            self.enables
        }

        pub fn is_input_configured(&self, button: Button) -> bool {
            self.inputs_configured[button.index()]
        }

        pub fn is_output_configured(&self, digit: DigitPosition) -> bool {
            self.outputs_configured[digit.index()]
        }

        pub fn events(&self) -> &[HalEvent] {
            &self.events
        }

        pub fn clear_events(&mut self) {
            self.events.clear();
        }

        /// Values rendered so far, in order
        pub fn rendered(&self) -> Vec<u8> {
            self.events
                .iter()
                .filter_map(|event| match event {
                    HalEvent::Render { value, .. } => Some(*value),
                    _ => None,
                })
                .collect()
        }

        /// Total time spent in `wait`
        pub fn elapsed(&self) -> Duration {
            self.elapsed
        }
    }

    impl StopwatchHal for MockStopwatchHal {
        type Error = HalError;

        fn configure_input(&mut self, button: Button) -> Result<(), Self::Error> {
            self.inputs_configured[button.index()] = true;
            self.events.push(HalEvent::ConfigureInput(button));
            Ok(())
        }

        fn configure_output(&mut self, digit: DigitPosition) -> Result<(), Self::Error> {
            self.outputs_configured[digit.index()] = true;
            self.events.push(HalEvent::ConfigureOutput(digit));
            Ok(())
        }

        fn write_digital(&mut self, digit: DigitPosition, level: Level) -> Result<(), Self::Error> {
            if !self.is_output_configured(digit) {
                return Err(HalError::NotInitialized);
            }
            self.enables[digit.index()] = level;
            self.events.push(HalEvent::Write(digit, level));
            Ok(())
        }

        fn read_digital(&mut self, button: Button) -> Result<Level, Self::Error> {
            if self.fail_reads {
                return Err(HalError::GpioError);
            }
            if !self.is_input_configured(button) {
                return Err(HalError::NotInitialized);
            }
            self.events.push(HalEvent::Read(button));
            Ok(self.button_levels[button.index()])
        }

        fn render_digit(&mut self, value: u8) -> Result<(), Self::Error> {
            if value > 9 {
                return Err(HalError::InvalidDigit);
            }
            self.events.push(HalEvent::Render {
                value,
                enables: self.enables,
            });
            Ok(())
        }

        fn wait(&mut self, duration: Duration) -> Result<(), Self::Error> {
            self.elapsed += duration;
            self.events.push(HalEvent::Wait(duration));
            Ok(())
        }
    }
}
