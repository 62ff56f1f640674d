//! Plays a pre-rasterized monochrome animation on an SSD1306 OLED, forever.
//!
//! The playback logic lives here and is independent of the board, so it runs on the host in
//! tests. `main.rs` wires it to the Raspberry Pi Pico.

#![cfg_attr(not(test), no_std)]

pub mod asset;
pub mod clock;
pub mod config;
pub mod frame;
pub mod framebuffer;
pub mod player;
pub mod surface;

#[cfg(test)]
mod test_support;

pub use clock::{FrameClock, StopSignal};
pub use frame::{Animation, AnimationError, Frame};
pub use framebuffer::MemorySurface;
pub use player::{Cycle, Halted, PlaybackStats, Player, StartError};
pub use surface::DisplaySurface;
