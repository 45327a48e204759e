//! Button sampling and run-state control

use crate::hal::StopwatchHal;
use crate::types::{Button, ButtonAction, DigitBank, Level, RunState};

/// Reads the three buttons and resolves one action per sample
///
/// There is no debounce: one raw read per button per sample is the whole
/// input contract, and a held button repeats its action every sample.
#[derive(Copy, Clone, Debug)]
pub struct InputSampler {
    pressed_level: Level,
}

impl InputSampler {
    pub const fn new(pressed_level: Level) -> Self {
        Self { pressed_level }
    }

    pub const fn pressed_level(&self) -> Level {
        self.pressed_level
    }

    /// Take one sample.
    ///
    /// Buttons are read in [`Button::PRIORITY`] order and reading stops at
    /// the first pressed one, so start beats pause beats reset.
    pub fn sample<H: StopwatchHal>(&self, hal: &mut H) -> Result<Option<ButtonAction>, H::Error> {
        for button in Button::PRIORITY {
            if hal.read_digital(button)? == self.pressed_level {
                return Ok(Some(button.action()));
            }
        }
        Ok(None)
    }
}

impl Default for InputSampler {
    fn default() -> Self {
        Self::new(Level::Low)
    }
}

/// Two-state run controller
#[derive(Copy, Clone, Debug, Default)]
pub struct RunStateController {
    state: RunState,
}

impl RunStateController {
    /// Starts stopped
    pub const fn new() -> Self {
        Self {
            state: RunState::Stopped,
        }
    }

    pub const fn state(&self) -> RunState {
        self.state
    }

    pub const fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Apply a sampled action; reset also zeroes `bank`.
    ///
    /// Returns true if the run state changed.
    pub fn apply(&mut self, action: ButtonAction, bank: &mut DigitBank) -> bool {
        let previous = self.state;

        self.state = match action {
            ButtonAction::Start => RunState::Running,
            ButtonAction::Pause => RunState::Stopped,
            ButtonAction::Reset => {
                bank.reset();
                RunState::Stopped
            }
        };

        let changed = previous != self.state;

        #[cfg(feature = "defmt")]
        if changed {
            defmt::info!("⏯️ {} -> {} ({})", previous, self.state, action);
        }

        changed
    }
}
