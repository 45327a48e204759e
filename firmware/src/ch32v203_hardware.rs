//! CH32V203 Hardware Implementation
//!
//! Raw register GPIO for the stopwatch board.
//!
//! | Line               | Pin     | Mode              |
//! |--------------------|---------|-------------------|
//! | Start button       | PC0     | input, pull-up    |
//! | Pause button       | PC1     | input, pull-up    |
//! | Reset button       | PC2     | input, pull-up    |
//! | Seconds units en.  | PB7     | push-pull output  |
//! | Seconds tens en.   | PB6     | push-pull output  |
//! | Minutes units en.  | PB5     | push-pull output  |
//! | Minutes tens en.   | PB4     | push-pull output  |
//! | Segments a..g      | PA0-PA6 | push-pull output  |

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use stopwatch_core::{
    Button, DigitPosition, Duration, HalError, Level, SegmentDriver, SegmentPolarity, Segments,
    SevenSegmentPins, StopwatchHal,
};

const RCC_BASE: u32 = 0x4002_1000;
const RCC_APB2PCENR: u32 = 0x18;

const GPIOA_BASE: u32 = 0x4001_0800;
const GPIOB_BASE: u32 = 0x4001_0C00;
const GPIOC_BASE: u32 = 0x4001_1000;

/// GPIO register offsets
const GPIO_CFGLR: u32 = 0x00;
const GPIO_CFGHR: u32 = 0x04;
const GPIO_INDR: u32 = 0x08;
const GPIO_BSHR: u32 = 0x10;
const GPIO_BCR: u32 = 0x14;

/// CNF=10 MODE=00: input with pull-up/down, direction picked by OUTDR
const MODE_INPUT_PULL: u32 = 0x8;
/// CNF=00 MODE=11: push-pull output, 50 MHz
const MODE_OUTPUT_PUSH_PULL: u32 = 0x3;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Port {
    A,
    B,
    C,
}

impl Port {
    const fn base(self) -> u32 {
        match self {
            Port::A => GPIOA_BASE,
            Port::B => GPIOB_BASE,
            Port::C => GPIOC_BASE,
        }
    }

    /// IOPxEN bit in RCC_APB2PCENR
    const fn clock_enable_bit(self) -> u32 {
        match self {
            Port::A => 1 << 2,
            Port::B => 1 << 3,
            Port::C => 1 << 4,
        }
    }
}

/// Enable the APB2 clocks of ports A, B and C
pub fn enable_gpio_clocks() {
    let bits = Port::A.clock_enable_bit() | Port::B.clock_enable_bit() | Port::C.clock_enable_bit();
    unsafe {
        let apb2pcenr = (RCC_BASE + RCC_APB2PCENR) as *mut u32;
        let current = core::ptr::read_volatile(apb2pcenr);
        core::ptr::write_volatile(apb2pcenr, current | bits);
    }
}

/// One GPIO line addressed by port and pin number
#[derive(Debug)]
pub struct GpioLine {
    port: Port,
    pin: u8,
}

impl GpioLine {
    pub const fn new(port: Port, pin: u8) -> Self {
        Self { port, pin }
    }

    fn register(&self, offset: u32) -> *mut u32 {
        (self.port.base() + offset) as *mut u32
    }

    fn set_mode(&self, mode: u32) {
        // Pins 0-7 live in CFGLR, 8-15 in CFGHR, four bits each
        let (offset, shift) = if self.pin < 8 {
            (GPIO_CFGLR, self.pin as u32 * 4)
        } else {
            (GPIO_CFGHR, (self.pin as u32 - 8) * 4)
        };
        unsafe {
            let cfg = self.register(offset);
            let mut value = core::ptr::read_volatile(cfg);
            value &= !(0xF << shift);
            value |= mode << shift;
            core::ptr::write_volatile(cfg, value);
        }
    }

    /// Input with the internal pull-up selected
    pub fn make_pull_up_input(&self) {
        self.set_mode(MODE_INPUT_PULL);
        self.drive(true);
    }

    pub fn make_push_pull_output(&self) {
        self.set_mode(MODE_OUTPUT_PUSH_PULL);
    }

    fn drive(&self, high: bool) {
        let (offset, mask) = if high {
            (GPIO_BSHR, 1 << self.pin)
        } else {
            (GPIO_BCR, 1 << self.pin)
        };
        unsafe {
            core::ptr::write_volatile(self.register(offset), mask);
        }
    }

    fn sense(&self) -> bool {
        let indr = unsafe { core::ptr::read_volatile(self.register(GPIO_INDR) as *const u32) };
        indr & (1 << self.pin) != 0
    }
}

impl ErrorType for GpioLine {
    type Error = Infallible;
}

impl InputPin for GpioLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.sense())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.sense())
    }
}

impl OutputPin for GpioLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

/// CH32V203 board implementation of the stopwatch capabilities
pub struct Ch32v203StopwatchHal {
    buttons: [GpioLine; 3],
    digit_enables: [GpioLine; 4],
    segments: SevenSegmentPins<GpioLine>,
}

impl Ch32v203StopwatchHal {
    /// Enable the port clocks and bring up the segment port.
    ///
    /// Buttons and digit enables stay untouched until
    /// [`Stopwatch::init`](stopwatch_core::Stopwatch::init) configures them.
    pub fn new() -> Self {
        enable_gpio_clocks();

        let segment_lines = [0, 1, 2, 3, 4, 5, 6].map(|pin| GpioLine::new(Port::A, pin));
        for line in segment_lines.iter() {
            line.make_push_pull_output();
            line.drive(false);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("🔌 CH32V203 segment port ready");

        Self {
            // Button::PRIORITY order
            buttons: [
                GpioLine::new(Port::C, 0),
                GpioLine::new(Port::C, 1),
                GpioLine::new(Port::C, 2),
            ],
            // DigitPosition::SCAN_ORDER order
            digit_enables: [
                GpioLine::new(Port::B, 7),
                GpioLine::new(Port::B, 6),
                GpioLine::new(Port::B, 5),
                GpioLine::new(Port::B, 4),
            ],
            segments: SevenSegmentPins::new(segment_lines, SegmentPolarity::CommonCathode),
        }
    }
}

impl Default for Ch32v203StopwatchHal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopwatchHal for Ch32v203StopwatchHal {
    type Error = HalError;

    fn configure_input(&mut self, button: Button) -> Result<(), Self::Error> {
        self.buttons[button.index()].make_pull_up_input();
        Ok(())
    }

    fn configure_output(&mut self, digit: DigitPosition) -> Result<(), Self::Error> {
        self.digit_enables[digit.index()].make_push_pull_output();
        Ok(())
    }

    fn write_digital(&mut self, digit: DigitPosition, level: Level) -> Result<(), Self::Error> {
        self.digit_enables[digit.index()].drive(level.is_high());
        Ok(())
    }

    fn read_digital(&mut self, button: Button) -> Result<Level, Self::Error> {
        Ok(Level::from(self.buttons[button.index()].sense()))
    }

    fn render_digit(&mut self, value: u8) -> Result<(), Self::Error> {
        let segments = Segments::from_digit(value).ok_or(HalError::InvalidDigit)?;
        self.segments.write_segments(segments)
    }

    fn wait(&mut self, duration: Duration) -> Result<(), Self::Error> {
        embassy_time::block_for(duration);
        Ok(())
    }
}
