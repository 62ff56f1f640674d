use core::cell::RefCell;

use cortex_m::interrupt::Mutex;
use hal::timer::{Alarm, Alarm0};
use rp_pico::hal;

use fugit::MicrosDurationU32;
use oled_flipbook::FrameClock;
use portable_atomic::{AtomicBool, Ordering};

pub static SHARED_STATE: Mutex<RefCell<Option<SharedState>>> = Mutex::new(RefCell::new(None));
pub static ATOMIC_STATE: AtomicState = AtomicState::new();

pub fn shared_state_interrupt_free<F>(f: F)
where
    F: FnOnce(&mut SharedState),
{
    cortex_m::interrupt::free(|cs| {
        SHARED_STATE
            .borrow(cs)
            .borrow_mut()
            .as_mut()
            .map(f)
            .unwrap();
    });
}

pub struct AtomicState {
    pub frame_period_elapsed: AtomicBool,
}

impl AtomicState {
    pub const fn new() -> Self {
        Self {
            frame_period_elapsed: AtomicBool::new(false),
        }
    }
}

pub struct SharedState {
    pub alarm0: Alarm0,
}

impl SharedState {
    pub fn alarm0_schedule(&mut self, duration: MicrosDurationU32) {
        self.alarm0.schedule(duration).unwrap();
    }

    pub fn alarm0_clear_interrupt(&mut self) {
        self.alarm0.clear_interrupt();
    }
}

/// Paces playback with ALARM0: arms it for one frame period and sleeps until `TIMER_IRQ_0` fires.
pub struct AlarmClock;

impl FrameClock for AlarmClock {
    fn wait(&mut self, period: MicrosDurationU32) {
        let elapsed = &ATOMIC_STATE.frame_period_elapsed;
        elapsed.store(false, Ordering::Release);
        shared_state_interrupt_free(|state| state.alarm0_schedule(period));

        while !elapsed.load(Ordering::Acquire) {
            // Check and sleep with interrupts masked, otherwise the alarm could fire in between
            // and leave us waiting for an interrupt that already happened. A pending IRQ still
            // wakes wfi.
            cortex_m::interrupt::free(|_| {
                if !elapsed.load(Ordering::Acquire) {
                    cortex_m::asm::wfi();
                }
            });
        }
    }
}
