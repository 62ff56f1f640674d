#![no_std]
#![no_main]

mod global_state;

use rp_pico::entry;
use panic_halt as _;
use rp_pico::hal; // Hardware Abstraction Layer (higher-level drivers)
use rp_pico::hal::pac; // Peripheral Access Crate (low-level register access)
use rp_pico::hal::pac::interrupt;
use rp_pico::hal::gpio::{FunctionI2C, Pin, PullUp};
use rp_pico::hal::timer::Alarm;
use rp_pico::hal::Clock;
use embedded_hal::digital::OutputPin;

use fugit::RateExtU32;
use log::error;
use portable_atomic::Ordering;
use rtt_target::rtt_init_log;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

use global_state::{
    shared_state_interrupt_free, AlarmClock, SharedState, ATOMIC_STATE, SHARED_STATE,
};
use oled_flipbook::{asset, config, Player, StopSignal};

// Nothing requests a stop yet; playback only ends with a reset.
static STOP: StopSignal = StopSignal::new();

#[entry]
fn main() -> ! {
    rtt_init_log!(log::LevelFilter::Info);

    let mut pac = pac::Peripherals::take().unwrap();

    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);

    // Configure the clocks (125 MHz system clock)
    let clocks = hal::clocks::init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    ).unwrap();

    let sio = hal::Sio::new(pac.SIO); // single-cycle IO
    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );
    // LED stays on while booting and when halted, off while playing
    let mut led_pin = pins.led.into_push_pull_output();
    led_pin.set_high().unwrap();

    let mut timer = hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
    let mut alarm0 = timer.alarm_0().unwrap();
    alarm0.enable_interrupt();
    cortex_m::interrupt::free(|cs| {
        SHARED_STATE.borrow(cs).replace(Some(SharedState { alarm0 }));
    });

    unsafe {
        pac::NVIC::unmask(pac::Interrupt::TIMER_IRQ_0);
    }

    // I2C0: SDA on GPIO8, SCL on GPIO9
    let sda: Pin<_, FunctionI2C, PullUp> = pins.gpio8.reconfigure();
    let scl: Pin<_, FunctionI2C, PullUp> = pins.gpio9.reconfigure();
    let i2c = hal::I2C::i2c0(
        pac.I2C0,
        sda,
        scl,
        config::I2C_FREQUENCY_HZ.Hz(),
        &mut pac.RESETS,
        clocks.system_clock.freq(),
    );

    let interface = I2CDisplayInterface::new_custom_address(i2c, config::SCREEN_ADDRESS);
    let display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();

    let animation = match asset::pulse() {
        Ok(animation) => animation,
        Err(e) => {
            error!("bundled animation is unusable: {e}");
            loop {
                cortex_m::asm::wfi();
            }
        }
    };

    match Player::start(animation, display, AlarmClock) {
        Ok(mut player) => {
            led_pin.set_low().unwrap();
            player.run(&STOP);
        }
        Err(halted) => halted.park(cortex_m::asm::wfi),
    }

    led_pin.set_high().unwrap();
    loop {
        cortex_m::asm::wfi();
    }
}

#[interrupt]
fn TIMER_IRQ_0() {
    shared_state_interrupt_free(|state| state.alarm0_clear_interrupt());
    ATOMIC_STATE.frame_period_elapsed.store(true, Ordering::Release);
}
