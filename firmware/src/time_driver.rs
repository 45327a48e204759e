//! SysTick backed embassy time driver for CH32V203
//!
//! The QingKe V4 SysTick counts HCLK up to CMPLR and raises its interrupt,
//! giving one embassy tick per millisecond (`tick-hz-1_000`). A single alarm
//! serves the thread executor's generic timer queue.

use core::cell::Cell;

use critical_section::Mutex;
use embassy_time_driver::{AlarmHandle, Driver};
use portable_atomic::{AtomicBool, AtomicU64, Ordering};

const STK_BASE: u32 = 0xE000_F000;
const STK_CTLR: u32 = 0x00;
const STK_SR: u32 = 0x04;
const STK_CNTL: u32 = 0x08;
const STK_CMPLR: u32 = 0x10;

/// STE | STIE | STCLK (HCLK) | STRE (auto-reload on compare)
const STK_CTLR_RUN: u32 = 0b1111;

/// PFIC interrupt enable set register covering IRQs 0-31
const PFIC_IENR1: u32 = 0xE000_E100;
const SYSTICK_IRQ: u32 = 12;

/// HSI after reset
const HCLK_HZ: u32 = 8_000_000;
const TICK_HZ: u32 = 1_000;

struct AlarmSlot {
    at: Cell<u64>,
    callback: Cell<Option<(fn(*mut ()), *mut ())>>,
}

// Only touched inside critical sections on a single hart
unsafe impl Send for AlarmSlot {}

pub struct SysTickDriver {
    ticks: AtomicU64,
    alarm_taken: AtomicBool,
    alarm: Mutex<AlarmSlot>,
}

impl SysTickDriver {
    const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            alarm_taken: AtomicBool::new(false),
            alarm: Mutex::new(AlarmSlot {
                at: Cell::new(u64::MAX),
                callback: Cell::new(None),
            }),
        }
    }

    /// Advance by one tick and fire the alarm once it is due
    fn on_tick(&self) {
        let now = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;

        let due = critical_section::with(|cs| {
            let slot = self.alarm.borrow(cs);
            if now >= slot.at.get() {
                slot.at.set(u64::MAX);
                slot.callback.get()
            } else {
                None
            }
        });

        if let Some((callback, ctx)) = due {
            callback(ctx);
        }
    }
}

impl Driver for SysTickDriver {
    fn now(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    unsafe fn allocate_alarm(&self) -> Option<AlarmHandle> {
        if self.alarm_taken.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(AlarmHandle::new(0))
        }
    }

    fn set_alarm_callback(&self, _alarm: AlarmHandle, callback: fn(*mut ()), ctx: *mut ()) {
        critical_section::with(|cs| {
            self.alarm.borrow(cs).callback.set(Some((callback, ctx)));
        });
    }

    fn set_alarm(&self, _alarm: AlarmHandle, timestamp: u64) -> bool {
        critical_section::with(|cs| {
            let slot = self.alarm.borrow(cs);
            if timestamp <= self.now() {
                // Already due: the caller polls instead
                slot.at.set(u64::MAX);
                false
            } else {
                slot.at.set(timestamp);
                true
            }
        })
    }
}

embassy_time_driver::time_driver_impl!(static DRIVER: SysTickDriver = SysTickDriver::new());

/// Start the 1 kHz SysTick and unmask its interrupt
pub fn start_system_timer() {
    unsafe {
        core::ptr::write_volatile((STK_BASE + STK_CTLR) as *mut u32, 0);
        core::ptr::write_volatile((STK_BASE + STK_SR) as *mut u32, 0);
        core::ptr::write_volatile((STK_BASE + STK_CNTL) as *mut u32, 0);
        core::ptr::write_volatile((STK_BASE + STK_CMPLR) as *mut u32, HCLK_HZ / TICK_HZ - 1);
        core::ptr::write_volatile(PFIC_IENR1 as *mut u32, 1 << SYSTICK_IRQ);
        core::ptr::write_volatile((STK_BASE + STK_CTLR) as *mut u32, STK_CTLR_RUN);
    }

    #[cfg(feature = "defmt")]
    defmt::info!("⏱️ SysTick running at {} Hz", TICK_HZ);
}

#[no_mangle]
extern "C" fn SysTick() {
    // Clear CNTIF before anything can re-arm
    unsafe {
        core::ptr::write_volatile((STK_BASE + STK_SR) as *mut u32, 0);
    }
    DRIVER.on_tick();
}

// Critical section implementation for single-core RISC-V
critical_section::set_impl!(RiscvCriticalSection);

struct RiscvCriticalSection;

unsafe impl critical_section::Impl for RiscvCriticalSection {
    unsafe fn acquire() -> critical_section::RawRestoreState {
        let mstatus = riscv::register::mstatus::read();
        riscv::register::mstatus::clear_mie();
        mstatus.mie() as u8
    }

    unsafe fn release(was_enabled: critical_section::RawRestoreState) {
        if was_enabled != 0 {
            riscv::register::mstatus::set_mie();
        }
    }
}
