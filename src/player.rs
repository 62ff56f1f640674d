use core::fmt::Debug;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{Point, Size};
use log::{error, info, trace, warn};

use crate::clock::{FrameClock, StopSignal};
use crate::frame::Animation;
use crate::surface::DisplaySurface;

/// Why playback never started.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StartError<E: Debug> {
    #[error("display initialization failed: {0:?}")]
    Init(E),
    #[error("animation frames are {frame:?} but the display is {display:?}")]
    GeometryMismatch { frame: Size, display: Size },
}

/// Terminal state after a failed start. Nothing is drawn from here on.
#[derive(Debug)]
pub struct Halted<E: Debug> {
    reason: StartError<E>,
}

impl<E: Debug> Halted<E> {
    pub fn reason(&self) -> &StartError<E> {
        &self.reason
    }

    /// Stays halted for good, calling `idle` in a loop (typically `wfi`).
    pub fn park<F: FnMut()>(self, mut idle: F) -> ! {
        loop {
            idle();
        }
    }
}

/// Outcome of one playback cycle.
#[derive(Debug, PartialEq, Eq)]
pub enum Cycle<E> {
    Shown(usize),
    /// Painting or committing the frame failed; the cycle still waited and advanced.
    Dropped { index: usize, error: E },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    pub cycles: u64,
    pub shown: u64,
    pub dropped: u64,
}

/// Replays an [`Animation`] on a [`DisplaySurface`], one frame per period, wrapping at the end.
///
/// The only state carried from one cycle to the next is the index of the frame to show.
pub struct Player<'a, S, C> {
    animation: Animation<'a>,
    surface: S,
    clock: C,
    index: usize,
    stats: PlaybackStats,
}

impl<'a, S, C> Player<'a, S, C>
where
    S: DisplaySurface,
    C: FrameClock,
{
    /// Brings up `surface` and blanks it.
    ///
    /// On failure exactly one diagnostic is logged and nothing is painted.
    pub fn start(
        animation: Animation<'a>,
        mut surface: S,
        clock: C,
    ) -> Result<Self, Halted<S::Error>> {
        if let Err(reason) = Self::bring_up(&animation, &mut surface) {
            error!("{reason}");
            return Err(Halted { reason });
        }

        // Wipe whatever the controller shows after power-on.
        surface.clear();
        if let Err(error) = surface.commit() {
            warn!("blanking the display failed: {error:?}");
        }

        info!(
            "display ready, {} frames every {} ms",
            animation.frame_count(),
            animation.frame_period().to_millis()
        );
        Ok(Self {
            animation,
            surface,
            clock,
            index: 0,
            stats: PlaybackStats::default(),
        })
    }

    fn bring_up(animation: &Animation<'a>, surface: &mut S) -> Result<(), StartError<S::Error>> {
        let display = surface.geometry();
        if animation.size() != display {
            return Err(StartError::GeometryMismatch {
                frame: animation.size(),
                display,
            });
        }
        surface.initialize().map_err(StartError::Init)
    }

    /// Runs one cycle: clear, paint, commit, wait one frame period, advance.
    ///
    /// A failed paint or commit drops the frame and playback carries on with the next one.
    pub fn tick(&mut self) -> Cycle<S::Error> {
        let index = self.index;
        let outcome = match self.render(index) {
            Ok(()) => {
                trace!("frame {index} shown");
                self.stats.shown += 1;
                Cycle::Shown(index)
            }
            Err(error) => {
                warn!("frame {index} dropped: {error:?}");
                self.stats.dropped += 1;
                Cycle::Dropped { index, error }
            }
        };

        self.clock.wait(self.animation.frame_period());
        self.index = (index + 1) % self.animation.frame_count();
        self.stats.cycles += 1;
        outcome
    }

    fn render(&mut self, index: usize) -> Result<(), S::Error> {
        let frame = self.animation.looped_frame(index);
        self.surface.clear();
        self.surface
            .paint_bitmap(Point::zero(), &frame, BinaryColor::On, BinaryColor::Off)?;
        self.surface.commit()
    }

    /// Plays until `stop` is requested, which is checked before every cycle.
    pub fn run(&mut self, stop: &StopSignal) -> PlaybackStats {
        while !stop.is_requested() {
            self.tick();
        }
        info!(
            "playback stopped after {} cycles ({} dropped)",
            self.stats.cycles, self.stats.dropped
        );
        self.stats
    }

    /// Plays forever.
    pub fn play(mut self) -> ! {
        loop {
            self.tick();
        }
    }

    /// Index of the frame the next cycle shows.
    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn stats(&self) -> PlaybackStats {
        self.stats
    }

    pub fn animation(&self) -> &Animation<'a> {
        &self.animation
    }

    pub fn into_parts(self) -> (S, C) {
        (self.surface, self.clock)
    }
}
