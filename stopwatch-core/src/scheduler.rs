//! Tick scheduling and the owned control-loop context

use core::convert::Infallible;

use crate::controller::{InputSampler, RunStateController};
use crate::display::DisplayMultiplexer;
use crate::hal::{HalError, StopwatchHal};
use crate::types::{Button, DigitBank, DigitPosition, RunState, StopwatchConfig};

/// Counts passes and reports super-cycle boundaries
#[derive(Copy, Clone, Debug)]
pub struct TickScheduler {
    passes_per_tick: u16,
    completed_passes: u16,
}

impl TickScheduler {
    pub const fn new(passes_per_tick: u16) -> Self {
        Self {
            passes_per_tick,
            completed_passes: 0,
        }
    }

    /// Record one finished pass; true when it completed a super-cycle
    pub fn record_pass(&mut self) -> bool {
        self.completed_passes += 1;
        if self.completed_passes >= self.passes_per_tick {
            self.completed_passes = 0;
            true
        } else {
            false
        }
    }

    /// Passes finished within the current super-cycle
    pub const fn completed_passes(&self) -> u16 {
        self.completed_passes
    }

    pub const fn passes_per_tick(&self) -> u16 {
        self.passes_per_tick
    }
}

/// State owned by the control loop
#[derive(Copy, Clone, Debug, Default)]
pub struct StopwatchContext {
    pub bank: DigitBank,
    pub run_state: RunStateController,
}

impl StopwatchContext {
    pub const fn new() -> Self {
        Self {
            bank: DigitBank::new(),
            run_state: RunStateController::new(),
        }
    }

    /// Credit one second if running; the bank never changes while stopped
    pub fn tick(&mut self) -> bool {
        if self.run_state.is_running() {
            self.bank.advance();
            true
        } else {
            false
        }
    }
}

/// Complete stopwatch: one board, one context, one loop
pub struct Stopwatch<H> {
    hal: H,
    config: StopwatchConfig,
    context: StopwatchContext,
    sampler: InputSampler,
    display: DisplayMultiplexer,
    scheduler: TickScheduler,
    initialized: bool,
}

impl<H: StopwatchHal> Stopwatch<H> {
    /// Create a stopwatch at 00:00, stopped
    pub fn new(hal: H, config: StopwatchConfig) -> Self {
        Self {
            hal,
            config,
            context: StopwatchContext::new(),
            sampler: InputSampler::new(config.pressed_level),
            display: DisplayMultiplexer::new(config.dwell),
            scheduler: TickScheduler::new(config.passes_per_tick),
            initialized: false,
        }
    }

    /// Configure buttons and digit enables, then darken the display.
    ///
    /// Fails with [`HalError::InvalidConfig`] before touching any pin if the
    /// configuration was assembled with out-of-range fields.
    pub fn init(&mut self) -> Result<(), H::Error> {
        self.config.validate()?;
        for button in Button::PRIORITY {
            self.hal.configure_input(button)?;
        }
        for digit in DigitPosition::SCAN_ORDER {
            self.hal.configure_output(digit)?;
        }
        self.display.blank(&mut self.hal)?;
        self.initialized = true;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "⏱️ Stopwatch initialized: dwell {}ms, {} passes per tick",
            self.config.dwell.as_millis(),
            self.config.passes_per_tick
        );

        Ok(())
    }

    fn ensure_initialized(&self) -> Result<(), H::Error> {
        if self.initialized {
            Ok(())
        } else {
            Err(HalError::NotInitialized.into())
        }
    }

    /// One full display pass, then a tick if it closed a super-cycle.
    ///
    /// Returns true if a second was credited.
    pub fn run_pass(&mut self) -> Result<bool, H::Error> {
        self.ensure_initialized()?;
        self.display.run_pass(
            &mut self.hal,
            &self.sampler,
            &mut self.context.run_state,
            &mut self.context.bank,
        )?;
        Ok(self.finish_pass())
    }

    /// Run passes until the next super-cycle boundary.
    ///
    /// Returns true if that boundary credited a second.
    pub fn run_super_cycle(&mut self) -> Result<bool, H::Error> {
        loop {
            let remaining = self.scheduler.passes_per_tick() - self.scheduler.completed_passes();
            let ticked = self.run_pass()?;
            if remaining <= 1 {
                return Ok(ticked);
            }
        }
    }

    /// Run forever; only returns on a HAL error
    pub fn run(&mut self) -> Result<Infallible, H::Error> {
        loop {
            self.run_pass()?;
        }
    }

    /// Same slot sequence as [`Self::run`], yielding to the embassy timer
    /// for each dwell instead of blocking in the HAL
    #[cfg(feature = "embassy-time")]
    pub async fn run_async(&mut self) -> Result<Infallible, H::Error> {
        use embassy_time::Timer;

        self.ensure_initialized()?;
        loop {
            for position in DigitPosition::SCAN_ORDER {
                self.display.show_slot(
                    &mut self.hal,
                    position,
                    &self.sampler,
                    &mut self.context.run_state,
                    &mut self.context.bank,
                )?;
                Timer::after(self.config.dwell).await;
            }
            self.finish_pass();
        }
    }

    fn finish_pass(&mut self) -> bool {
        if !self.scheduler.record_pass() {
            return false;
        }
        let ticked = self.context.tick();

        #[cfg(feature = "defmt")]
        if ticked {
            defmt::debug!("⏱️ {}", self.context.bank.render_mmss().as_str());
        }

        ticked
    }

    pub fn digits(&self) -> &DigitBank {
        &self.context.bank
    }

    pub fn run_state(&self) -> RunState {
        self.context.run_state.state()
    }

    pub fn config(&self) -> &StopwatchConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Passes finished toward the next tick
    pub fn passes_into_tick(&self) -> u16 {
        self.scheduler.completed_passes()
    }

    pub fn hal(&self) -> &H {
        &self.hal
    }

    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    /// Give the board back
    pub fn release(self) -> H {
        self.hal
    }
}
