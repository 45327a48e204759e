#![no_std]
#![no_main]

#[cfg(feature = "defmt")]
use defmt_rtt as _;

// RISC-V runtime
use riscv_rt as _;

// Panic handler
use panic_halt as _;

use embassy_executor::Spawner;

use stopwatch_firmware::*;

/// Main firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    #[cfg(feature = "defmt")]
    defmt::info!("🔧 Stopwatch firmware v{} starting...", VERSION);

    start_system_timer();

    let config = default_config();
    #[cfg(feature = "defmt")]
    defmt::info!(
        "⚙️ Dwell {}ms, {} passes per second",
        config.dwell.as_millis(),
        config.passes_per_tick
    );

    let mut stopwatch = Stopwatch::new(Ch32v203StopwatchHal::new(), config);
    if let Err(_err) = stopwatch.init() {
        #[cfg(feature = "defmt")]
        defmt::error!("❌ Pin setup failed: {}", _err);
        return;
    }

    spawner.must_spawn(stopwatch_task(stopwatch));

    #[cfg(feature = "defmt")]
    defmt::info!("✨ Stopwatch ready");
}
