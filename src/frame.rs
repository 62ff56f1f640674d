use core::num::NonZeroUsize;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use fugit::MicrosDurationU32;

/// Number of bytes one packed frame of `size` occupies.
///
/// `None` if the pixel count does not fit in a `u32`.
pub const fn packed_len(size: Size) -> Option<usize> {
    match size.width.checked_mul(size.height) {
        Some(pixels) => Some(pixels.div_ceil(8) as usize),
        None => None,
    }
}

/// Reads pixel `index` (row-major) out of densely packed, MSB-first bitmap data.
pub(crate) fn bit_at(bits: &[u8], index: usize) -> bool {
    bits[index >> 3] & (0x80 >> (index & 0b111)) != 0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AnimationError {
    #[error("frame size {0:?} has no pixels")]
    EmptyGeometry(Size),
    #[error("frame size {0:?} has more pixels than fit in a u32")]
    Oversized(Size),
    #[error("animation has no frames")]
    NoFrames,
    #[error("{len} bytes of frame data is not a whole number of {frame_len}-byte frames")]
    Misaligned { len: usize, frame_len: usize },
}

/// One monochrome bitmap of an animation.
///
/// Pixels are packed densely in row-major order, one bit per pixel, most significant bit first:
/// pixel `(x, y)` is bit `7 - i % 8` of byte `i / 8` with `i = y * width + x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame<'a> {
    bits: &'a [u8],
    size: Size,
}

impl<'a> Frame<'a> {
    /// Returns `None` if `bits` is not exactly `packed_len(size)` bytes long.
    pub fn new(bits: &'a [u8], size: Size) -> Option<Self> {
        (Some(bits.len()) == packed_len(size)).then_some(Self { bits, size })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bits
    }

    pub fn pixel(&self, point: Point) -> Option<bool> {
        let x = u32::try_from(point.x).ok()?;
        let y = u32::try_from(point.y).ok()?;
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some(bit_at(self.bits, (y * self.size.width + x) as usize))
    }

    /// All pixels in row-major order, `true` for set bits.
    pub fn pixels(&self) -> impl Iterator<Item = bool> + 'a {
        let bits = self.bits;
        // `Frame::new` and `Animation::new` reject sizes whose pixel count overflows
        let count = (self.size.width * self.size.height) as usize;
        (0..count).map(move |index| bit_at(bits, index))
    }

    /// Overwrites the rectangle at `origin` with this frame: set bits become `fg`, unset bits `bg`.
    pub fn draw<D>(
        &self,
        target: &mut D,
        origin: Point,
        fg: BinaryColor,
        bg: BinaryColor,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let area = Rectangle::new(origin, self.size);
        target.fill_contiguous(&area, self.pixels().map(|set| if set { fg } else { bg }))
    }
}

/// A fixed, non-empty sequence of equally sized frames and the time between them.
///
/// The frame data is borrowed, usually from a `static` asset, and never written to.
#[derive(Clone, Copy, Debug)]
pub struct Animation<'a> {
    data: &'a [u8],
    size: Size,
    frame_len: usize,
    frame_count: NonZeroUsize,
    frame_period: MicrosDurationU32,
}

impl<'a> Animation<'a> {
    /// Builds an animation from packed frames laid out back to back in `data`.
    pub fn new(
        data: &'a [u8],
        size: Size,
        frame_period: MicrosDurationU32,
    ) -> Result<Self, AnimationError> {
        let frame_len = packed_len(size).ok_or(AnimationError::Oversized(size))?;
        if frame_len == 0 {
            return Err(AnimationError::EmptyGeometry(size));
        }
        if data.len() % frame_len != 0 {
            return Err(AnimationError::Misaligned { len: data.len(), frame_len });
        }
        let frame_count =
            NonZeroUsize::new(data.len() / frame_len).ok_or(AnimationError::NoFrames)?;

        Ok(Self {
            data,
            size,
            frame_len,
            frame_count,
            frame_period,
        })
    }

    /// Builds an animation from an array of packed frames, the shape the asset converter emits.
    pub fn from_frames<const N: usize>(
        frames: &'a [[u8; N]],
        size: Size,
        frame_period: MicrosDurationU32,
    ) -> Result<Self, AnimationError> {
        if frames.is_empty() {
            return Err(AnimationError::NoFrames);
        }
        let frame_len = packed_len(size).ok_or(AnimationError::Oversized(size))?;
        if N != frame_len {
            return Err(AnimationError::Misaligned { len: N, frame_len });
        }
        Self::new(frames.as_flattened(), size, frame_period)
    }

    pub fn frame_count(&self) -> NonZeroUsize {
        self.frame_count
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn frame_period(&self) -> MicrosDurationU32 {
        self.frame_period
    }

    /// The frame shown on the `cycle`-th cycle of endless playback, index `cycle % frame_count`.
    pub fn looped_frame(&self, cycle: usize) -> Frame<'a> {
        let start = (cycle % self.frame_count) * self.frame_len;
        Frame {
            bits: &self.data[start..start + self.frame_len],
            size: self.size,
        }
    }

    pub fn frames(&self) -> impl Iterator<Item = Frame<'a>> + 'a {
        let data = self.data;
        let size = self.size;
        data.chunks_exact(self.frame_len).map(move |bits| Frame { bits, size })
    }
}
