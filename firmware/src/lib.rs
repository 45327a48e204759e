#![no_std]

//! CH32V203 board support and tasks for the stopwatch firmware

pub use stopwatch_core::*;

pub use crate::ch32v203_hardware::*;
pub use crate::tasks::*;
pub use crate::time_driver::start_system_timer;

pub mod ch32v203_hardware;

mod time_driver;

pub mod tasks {
    use super::*;

    /// Multiplex the display and follow the buttons forever
    #[embassy_executor::task]
    pub async fn stopwatch_task(mut stopwatch: Stopwatch<Ch32v203StopwatchHal>) {
        #[cfg(feature = "defmt")]
        defmt::info!("⏲️ Stopwatch task started");

        match stopwatch.run_async().await {
            Ok(never) => match never {},
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::error!("❌ Stopwatch loop stopped: {}", _err);
            }
        }
    }
}
