use core::fmt::Debug;

use display_interface::{DisplayError, WriteOnlyDataCommand};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{OriginDimensions, Point, Size};
use ssd1306::mode::{BufferedGraphicsMode, DisplayConfig};
use ssd1306::size::DisplaySize;
use ssd1306::Ssd1306;

use crate::frame::Frame;

/// A monochrome display with an in-memory pixel buffer.
///
/// The bus address and the geometry are fixed when the surface is constructed. `initialize` has
/// to succeed once before anything else is called. Drawing only touches the buffer; nothing reaches
/// the panel until `commit`.
pub trait DisplaySurface {
    type Error: Debug;

    /// Brings up the display controller.
    fn initialize(&mut self) -> Result<(), Self::Error>;

    fn geometry(&self) -> Size;

    /// Resets the buffer to the unset color.
    fn clear(&mut self);

    /// Overwrites the rectangle at `origin` with `frame`: `fg` for set bits, `bg` for unset ones.
    ///
    /// The rectangle must lie within `geometry()`.
    fn paint_bitmap(
        &mut self,
        origin: Point,
        frame: &Frame<'_>,
        fg: BinaryColor,
        bg: BinaryColor,
    ) -> Result<(), Self::Error>;

    /// Transfers the whole buffer to the panel.
    fn commit(&mut self) -> Result<(), Self::Error>;
}

impl<DI, SIZE> DisplaySurface for Ssd1306<DI, SIZE, BufferedGraphicsMode<SIZE>>
where
    DI: WriteOnlyDataCommand,
    SIZE: DisplaySize,
{
    type Error = DisplayError;

    fn initialize(&mut self) -> Result<(), DisplayError> {
        self.init()
    }

    fn geometry(&self) -> Size {
        OriginDimensions::size(self)
    }

    fn clear(&mut self) {
        self.clear_buffer();
    }

    fn paint_bitmap(
        &mut self,
        origin: Point,
        frame: &Frame<'_>,
        fg: BinaryColor,
        bg: BinaryColor,
    ) -> Result<(), DisplayError> {
        frame.draw(self, origin, fg, bg)
    }

    fn commit(&mut self) -> Result<(), DisplayError> {
        self.flush()
    }
}
