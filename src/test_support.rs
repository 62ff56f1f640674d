//! Host-side doubles for the display, the clock and the logger.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use display_interface::{DataFormat, DisplayError, WriteOnlyDataCommand};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{Point, Size};
use fugit::MicrosDurationU32;
use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::clock::FrameClock;
use crate::frame::Frame;
use crate::surface::DisplaySurface;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Initialize,
    Clear,
    Paint {
        origin: Point,
        fg: BinaryColor,
        bg: BinaryColor,
        bits: Vec<u8>,
    },
    Commit,
    Wait(u32),
}

/// Operations from the surface and the clock, in the order they happened.
pub type OpLog = Rc<RefCell<Vec<Op>>>;

pub fn op_log() -> OpLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Bits of every painted frame, in paint order.
pub fn painted(log: &OpLog) -> Vec<Vec<u8>> {
    log.borrow()
        .iter()
        .filter_map(|op| match op {
            Op::Paint { bits, .. } => Some(bits.clone()),
            _ => None,
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    NotFound,
    Nack,
}

/// Records every call; the n-th paint or commit (0-based) can be made to fail.
pub struct RecordingSurface {
    log: OpLog,
    size: Size,
    pub missing: bool,
    pub failing_paints: Vec<usize>,
    pub failing_commits: Vec<usize>,
    paints: usize,
    commits: usize,
}

impl RecordingSurface {
    pub fn new(log: &OpLog, size: Size) -> Self {
        Self {
            log: log.clone(),
            size,
            missing: false,
            failing_paints: Vec::new(),
            failing_commits: Vec::new(),
            paints: 0,
            commits: 0,
        }
    }
}

impl DisplaySurface for RecordingSurface {
    type Error = Fault;

    fn initialize(&mut self) -> Result<(), Fault> {
        self.log.borrow_mut().push(Op::Initialize);
        if self.missing {
            return Err(Fault::NotFound);
        }
        Ok(())
    }

    fn geometry(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.log.borrow_mut().push(Op::Clear);
    }

    fn paint_bitmap(
        &mut self,
        origin: Point,
        frame: &Frame<'_>,
        fg: BinaryColor,
        bg: BinaryColor,
    ) -> Result<(), Fault> {
        let attempt = self.paints;
        self.paints += 1;
        if self.failing_paints.contains(&attempt) {
            return Err(Fault::Nack);
        }
        self.log.borrow_mut().push(Op::Paint {
            origin,
            fg,
            bg,
            bits: frame.bytes().to_vec(),
        });
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Fault> {
        let attempt = self.commits;
        self.commits += 1;
        if self.failing_commits.contains(&attempt) {
            return Err(Fault::Nack);
        }
        self.log.borrow_mut().push(Op::Commit);
        Ok(())
    }
}

/// Advances instantly and notes the requested period.
pub struct VirtualClock {
    log: OpLog,
}

impl VirtualClock {
    pub fn new(log: &OpLog) -> Self {
        Self { log: log.clone() }
    }
}

impl FrameClock for VirtualClock {
    fn wait(&mut self, period: MicrosDurationU32) {
        self.log.borrow_mut().push(Op::Wait(period.to_micros()));
    }
}

/// Sum of all waits in the log, in microseconds.
pub fn virtual_elapsed(log: &OpLog) -> u64 {
    log.borrow()
        .iter()
        .map(|op| match op {
            Op::Wait(micros) => u64::from(*micros),
            _ => 0,
        })
        .sum()
}

/// I2C transport stand-in for the SSD1306; an absent device fails every write like a NACK would.
#[derive(Default)]
pub struct FakeBus {
    pub absent: bool,
    pub command_writes: usize,
    pub data_bytes: usize,
}

impl WriteOnlyDataCommand for FakeBus {
    fn send_commands(&mut self, _cmd: DataFormat<'_>) -> Result<(), DisplayError> {
        if self.absent {
            return Err(DisplayError::BusWriteError);
        }
        self.command_writes += 1;
        Ok(())
    }

    fn send_data(&mut self, buf: DataFormat<'_>) -> Result<(), DisplayError> {
        if self.absent {
            return Err(DisplayError::BusWriteError);
        }
        if let DataFormat::U8(bytes) = buf {
            self.data_bytes += bytes.len();
        }
        Ok(())
    }
}

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let entry = (record.level(), record.args().to_string());
        RECORDS.with(|records| records.borrow_mut().push(entry));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Starts collecting this thread's log records, dropping earlier ones.
pub fn capture_logs() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).expect("another logger is installed");
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.with(|records| records.borrow_mut().clear());
}

pub fn logged(level: Level) -> Vec<String> {
    RECORDS.with(|records| {
        records
            .borrow()
            .iter()
            .filter(|(record_level, _)| *record_level == level)
            .map(|(_, message)| message.clone())
            .collect()
    })
}
