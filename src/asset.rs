//! The animation flashed with the firmware.
//!
//! `assets/pulse.bin` holds 12 packed 128x64 frames of rings expanding from the centre, back to
//! back in the layout described on [`Frame`](crate::frame::Frame).

use crate::config::{screen_size, FRAME_BYTES, FRAME_PERIOD};
use crate::frame::{Animation, AnimationError};

pub const PULSE_FRAME_COUNT: usize = 12;

pub static PULSE_FRAMES: &[u8; PULSE_FRAME_COUNT * FRAME_BYTES] =
    include_bytes!("../assets/pulse.bin");

pub fn pulse() -> Result<Animation<'static>, AnimationError> {
    Animation::new(PULSE_FRAMES, screen_size(), FRAME_PERIOD)
}
