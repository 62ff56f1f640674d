use embedded_graphics::geometry::Size;
use fugit::MicrosDurationU32;

pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;
pub const FRAME_BYTES: usize = (SCREEN_WIDTH * SCREEN_HEIGHT) as usize / 8;

/// 7-bit I2C address of the SSD1306 (0x3D on boards with the address jumper moved).
pub const SCREEN_ADDRESS: u8 = 0x3C;

pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Minimum time between two commits, ~33 frames per second.
pub const FRAME_PERIOD: MicrosDurationU32 = MicrosDurationU32::millis(30);

pub const fn screen_size() -> Size {
    Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
}
