//! Time-multiplexed 4-digit display refresh

use crate::controller::{InputSampler, RunStateController};
use crate::hal::{Duration, StopwatchHal};
use crate::types::{DigitBank, DigitPosition, Level};

/// Drives one digit position at a time through the shared segment lines
#[derive(Copy, Clone, Debug)]
pub struct DisplayMultiplexer {
    dwell: Duration,
}

impl DisplayMultiplexer {
    pub const fn new(dwell: Duration) -> Self {
        Self { dwell }
    }

    pub const fn dwell(&self) -> Duration {
        self.dwell
    }

    /// Drive every digit-enable line low
    pub fn blank<H: StopwatchHal>(&self, hal: &mut H) -> Result<(), H::Error> {
        for digit in DigitPosition::SCAN_ORDER {
            hal.write_digital(digit, Level::Low)?;
        }
        Ok(())
    }

    /// Sample, select and render one slot without holding it.
    ///
    /// The other three enables are driven low before `position` goes high,
    /// so two digits are never lit together.
    pub fn show_slot<H: StopwatchHal>(
        &self,
        hal: &mut H,
        position: DigitPosition,
        sampler: &InputSampler,
        run_state: &mut RunStateController,
        bank: &mut DigitBank,
    ) -> Result<(), H::Error> {
        if let Some(action) = sampler.sample(hal)? {
            run_state.apply(action, bank);
        }

        for other in DigitPosition::SCAN_ORDER {
            if other != position {
                hal.write_digital(other, Level::Low)?;
            }
        }
        hal.write_digital(position, Level::High)?;

        hal.render_digit(bank.digit(position))
    }

    /// One full pass over the four digits, holding each for the dwell time
    pub fn run_pass<H: StopwatchHal>(
        &self,
        hal: &mut H,
        sampler: &InputSampler,
        run_state: &mut RunStateController,
        bank: &mut DigitBank,
    ) -> Result<(), H::Error> {
        for position in DigitPosition::SCAN_ORDER {
            self.show_slot(hal, position, sampler, run_state, bank)?;
            hal.wait(self.dwell)?;
        }
        Ok(())
    }
}
