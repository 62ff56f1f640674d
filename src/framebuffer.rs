use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::config::{FRAME_BYTES, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::frame::{bit_at, Frame};
use crate::surface::DisplaySurface;

/// A display surface that only exists in RAM.
///
/// Drawing goes to a back buffer, `commit` copies it to the front buffer, which stands in for the
/// panel. Both use the packed layout of [`Frame`], so a committed frame can be compared byte for
/// byte with its asset.
pub struct MemorySurface {
    back: [u8; FRAME_BYTES],
    front: [u8; FRAME_BYTES],
    commits: usize,
}

impl MemorySurface {
    pub const fn new() -> Self {
        Self {
            back: [0; FRAME_BYTES],
            front: [0; FRAME_BYTES],
            commits: 0,
        }
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return;
        }
        let pixel_index = (y * SCREEN_WIDTH + x) as usize;
        let mask = 0x80 >> (pixel_index & 0b111);
        if on {
            self.back[pixel_index >> 3] |= mask;
        } else {
            self.back[pixel_index >> 3] &= !mask;
        }
    }

    /// Reads the back buffer.
    pub fn pixel(&self, point: Point) -> Option<bool> {
        let x = u32::try_from(point.x).ok()?;
        let y = u32::try_from(point.y).ok()?;
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return None;
        }
        Some(bit_at(&self.back, (y * SCREEN_WIDTH + x) as usize))
    }

    /// What the panel would show after the last commit.
    pub fn front_buffer(&self) -> &[u8; FRAME_BYTES] {
        &self.front
    }

    pub fn commit_count(&self) -> usize {
        self.commits
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for MemorySurface {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for MemorySurface {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Infallible>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Infallible> {
        self.back.fill(if color.is_on() { 0xFF } else { 0x00 });
        Ok(())
    }
}

impl DisplaySurface for MemorySurface {
    type Error = Infallible;

    fn initialize(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn geometry(&self) -> Size {
        OriginDimensions::size(self)
    }

    fn clear(&mut self) {
        self.back.fill(0);
    }

    fn paint_bitmap(
        &mut self,
        origin: Point,
        frame: &Frame<'_>,
        fg: BinaryColor,
        bg: BinaryColor,
    ) -> Result<(), Infallible> {
        frame.draw(self, origin, fg, bg)
    }

    fn commit(&mut self) -> Result<(), Infallible> {
        self.front.copy_from_slice(&self.back);
        self.commits += 1;
        Ok(())
    }
}
