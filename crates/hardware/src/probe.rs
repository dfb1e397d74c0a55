//! Pipeline probe reporter.
//!
//! A read-only sampler invoked once per cycle, after the core's second
//! low-phase evaluation and before the clock toggles high. It renders one
//! fixed-width line per cycle: a column per pipeline stage, single-character
//! flags, and optional bracketed annotations. It has zero effect on
//! simulation state; its only contract is deterministic, column-aligned
//! output — columns never desynchronize regardless of how many flags are
//! simultaneously true.

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::port::PortRole;

/// Number of sampled pipeline stages.
pub const STAGE_COUNT: usize = 7;

/// Width of a fetch-stage column (8 hex digits of PC).
const FETCH_COL: usize = 8;

/// Width of a back-end stage column (`pc:inst`, 8+1+8).
const EXEC_COL: usize = 17;

/// The fixed set of sampled stages, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// First fetch stage.
    Fetch1,
    /// Second fetch stage.
    Fetch2,
    /// Third fetch stage.
    Fetch3,
    /// Decode.
    Decode,
    /// Execute.
    Execute,
    /// Memory.
    Memory,
    /// Writeback.
    Writeback,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Self; STAGE_COUNT] = [
        Self::Fetch1,
        Self::Fetch2,
        Self::Fetch3,
        Self::Decode,
        Self::Execute,
        Self::Memory,
        Self::Writeback,
    ];

    /// Column header label.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fetch1 => "if1",
            Self::Fetch2 => "if2",
            Self::Fetch3 => "if3",
            Self::Decode => "id",
            Self::Execute => "ex",
            Self::Memory => "mem",
            Self::Writeback => "wb",
        }
    }

    /// Back-end stages additionally render the instruction word.
    fn shows_inst(self) -> bool {
        matches!(
            self,
            Self::Decode | Self::Execute | Self::Memory | Self::Writeback
        )
    }
}

/// One stage's sampled signals for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageProbe {
    /// Stage holds a live instruction this cycle.
    pub valid: bool,
    /// Program counter of the instruction in the stage.
    pub pc: u64,
    /// Instruction word (rendered for decode and later stages only).
    pub inst: u32,
}

/// A register-file write observed this cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegWrite {
    /// Destination register index.
    pub index: u8,
    /// Value written.
    pub data: u64,
}

/// A cache/memory request observed this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheRequest {
    /// Which port the request targets.
    pub port: PortRole,
    /// Request address.
    pub addr: u64,
}

/// Everything the probe samples in one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeSample {
    /// Per-stage valid/pc/inst, in [`Stage::ALL`] order.
    pub stages: [StageProbe; STAGE_COUNT],
    /// Front-end stall condition.
    pub stall: bool,
    /// A memory read is in flight.
    pub mem_read: bool,
    /// A memory write is in flight.
    pub mem_write: bool,
    /// A branch is resolving.
    pub branch: bool,
    /// Register write observed this cycle, if any.
    pub reg_write: Option<RegWrite>,
    /// Cache request observed this cycle, if any.
    pub cache_request: Option<CacheRequest>,
}

/// Renders the fixed-width diagnostic line for one cycle.
///
/// Invalid stages render a dash placeholder of the column width so columns
/// stay aligned across cycles. Annotations, when present, append after the
/// flag field and never shift the columns before them.
pub fn render_line(cycle: u64, sample: &ProbeSample) -> String {
    let mut line = String::with_capacity(128);
    let _ = write!(line, "{cycle:>8} |");

    for (stage, probe) in Stage::ALL.iter().zip(sample.stages.iter()) {
        if *stage == Stage::Decode {
            line.push_str(" |");
        }
        line.push(' ');
        if !probe.valid {
            let width = if stage.shows_inst() { EXEC_COL } else { FETCH_COL };
            line.extend(std::iter::repeat_n('-', width));
        } else if stage.shows_inst() {
            let _ = write!(line, "{:08x}:{:08x}", probe.pc & 0xffff_ffff, probe.inst);
        } else {
            let _ = write!(line, "{:08x}", probe.pc & 0xffff_ffff);
        }
    }

    let _ = write!(
        line,
        " | {}{}{}{}",
        if sample.stall { 'S' } else { '-' },
        if sample.mem_read { 'r' } else { '-' },
        if sample.mem_write { 'w' } else { '-' },
        if sample.branch { 'B' } else { '-' },
    );

    if let Some(reg) = sample.reg_write {
        let _ = write!(line, " [x{:02}<={:016x}]", reg.index, reg.data);
    }
    if let Some(req) = sample.cache_request {
        let tag = match req.port {
            PortRole::Instruction => 'I',
            PortRole::Data => 'D',
        };
        let _ = write!(line, " [{tag}$ {:08x}]", req.addr);
    }

    line
}

/// Column header matching [`render_line`]'s layout.
pub fn header() -> String {
    format!(
        "{:>8} | {:<8} {:<8} {:<8} | {:<17} {:<17} {:<17} {:<17} | flag",
        "cycle",
        Stage::Fetch1.name(),
        Stage::Fetch2.name(),
        Stage::Fetch3.name(),
        Stage::Decode.name(),
        Stage::Execute.name(),
        Stage::Memory.name(),
        Stage::Writeback.name(),
    )
}

/// Writes probe lines to a sink, emitting the header before the first line.
pub struct ProbeReporter {
    out: Box<dyn Write + Send>,
    wrote_header: bool,
}

impl std::fmt::Debug for ProbeReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeReporter")
            .field("wrote_header", &self.wrote_header)
            .finish_non_exhaustive()
    }
}

impl ProbeReporter {
    /// Reporter writing to the given sink.
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            wrote_header: false,
        }
    }

    /// Reporter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Renders and writes the line for one cycle.
    ///
    /// # Errors
    ///
    /// Propagates I/O failures from the underlying sink.
    pub fn record(&mut self, cycle: u64, sample: &ProbeSample) -> io::Result<()> {
        if !self.wrote_header {
            writeln!(self.out, "{}", header())?;
            self.wrote_header = true;
        }
        writeln!(self.out, "{}", render_line(cycle, sample))
    }
}
