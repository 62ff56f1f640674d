use fugit::MicrosDurationU32;
use portable_atomic::{AtomicBool, Ordering};

/// Suspends the player between frames.
///
/// `wait` blocks for at least `period`, measured from the call. Time already spent rendering the
/// frame is not subtracted.
pub trait FrameClock {
    fn wait(&mut self, period: MicrosDurationU32);
}

/// Asks a running player to stop after its current cycle.
///
/// Lives in a `static` so an interrupt handler or another core can request the stop.
pub struct StopSignal {
    requested: AtomicBool,
}

impl StopSignal {
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
        }
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
