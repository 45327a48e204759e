//! Test utilities for driving a stopwatch on mock hardware

use crate::hal::mock::MockStopwatchHal;
use crate::hal::HalError;
use crate::scheduler::Stopwatch;
use crate::types::{Button, DigitBank, RunState, StopwatchConfig};

/// Observable stopwatch state after a step
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub digits: (u8, u8, u8, u8),
    pub run_state: RunState,
}

/// Initialized stopwatch on a [`MockStopwatchHal`] with button helpers
pub struct ScenarioRunner {
    stopwatch: Stopwatch<MockStopwatchHal>,
}

impl ScenarioRunner {
    pub fn new(config: StopwatchConfig) -> Result<Self, HalError> {
        let mut stopwatch = Stopwatch::new(MockStopwatchHal::new(), config);
        stopwatch.init()?;
        Ok(Self { stopwatch })
    }

    /// Short super-cycle so scenarios stay small
    pub fn fast() -> Result<Self, HalError> {
        Self::new(StopwatchConfig {
            passes_per_tick: 4,
            ..StopwatchConfig::default()
        })
    }

    /// Hold `button` for one pass, then release it
    pub fn tap(&mut self, button: Button) -> Result<Snapshot, HalError> {
        self.stopwatch.hal_mut().press(button);
        let result = self.stopwatch.run_pass();
        self.stopwatch.hal_mut().release(button);
        result?;
        Ok(self.snapshot())
    }

    /// Hold `button` across `passes` passes
    pub fn hold(&mut self, button: Button, passes: u32) -> Result<Snapshot, HalError> {
        self.stopwatch.hal_mut().press(button);
        for _ in 0..passes {
            if let Err(err) = self.stopwatch.run_pass() {
                self.stopwatch.hal_mut().release(button);
                return Err(err);
            }
        }
        self.stopwatch.hal_mut().release(button);
        Ok(self.snapshot())
    }

    /// Run `count` super-cycles with no buttons held
    pub fn idle_super_cycles(&mut self, count: u32) -> Result<Snapshot, HalError> {
        self.stopwatch.hal_mut().release_all();
        for _ in 0..count {
            self.stopwatch.run_super_cycle()?;
        }
        Ok(self.snapshot())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            digits: self.stopwatch.digits().digits(),
            run_state: self.stopwatch.run_state(),
        }
    }

    pub fn bank(&self) -> DigitBank {
        *self.stopwatch.digits()
    }

    pub fn stopwatch(&self) -> &Stopwatch<MockStopwatchHal> {
        &self.stopwatch
    }

    pub fn stopwatch_mut(&mut self) -> &mut Stopwatch<MockStopwatchHal> {
        &mut self.stopwatch
    }
}
