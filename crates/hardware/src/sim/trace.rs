//! VCD waveform trace capture.
//!
//! Every signal of the port surface plus clock and reset is declared once,
//! then sampled at every evaluation step (four per cycle). Value changes
//! are emitted only on delta, keeping the file compact. The trace is
//! closed on normal completion and on fatal violations alike so the
//! captured prefix stays inspectable.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use vcd::{IdCode, TimescaleUnit, Value, VarType};

use crate::port::signals::{ReadRequest, WriteRequest};

/// Sampled levels of one port's full signal surface at one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortState {
    /// Core-driven read request wires.
    pub read: ReadRequest,
    /// Engine-driven read acceptance.
    pub read_ready: bool,
    /// Engine-driven response handshake and payload.
    pub response_valid: bool,
    /// Core-driven response acceptance.
    pub response_ready: bool,
    /// Address wire of the delivered response.
    pub response_addr: u64,
    /// Data wires of the delivered response.
    pub response_data: Box<[u8]>,
    /// Core-driven write wires.
    pub write: WriteRequest,
    /// Engine-driven write acceptance.
    pub write_ready: bool,
}

/// Sampled levels of the whole signal surface at one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalState {
    /// Clock pin level.
    pub clock: bool,
    /// Reset pin level.
    pub reset: bool,
    /// Instruction port signals.
    pub imem: PortState,
    /// Data port signals.
    pub dmem: PortState,
}

#[derive(Debug, Clone, Copy)]
struct PortVars {
    read_valid: IdCode,
    read_addr: IdCode,
    read_ready: IdCode,
    resp_valid: IdCode,
    resp_ready: IdCode,
    resp_addr: IdCode,
    resp_data: IdCode,
    write_valid: IdCode,
    write_ready: IdCode,
    write_addr: IdCode,
    write_data: IdCode,
    data_bits: usize,
}

/// Writer for the waveform trace file.
pub struct WaveTrace {
    writer: vcd::Writer<BufWriter<File>>,
    clock: IdCode,
    reset: IdCode,
    imem: PortVars,
    dmem: PortVars,
    last: Option<SignalState>,
}

impl std::fmt::Debug for WaveTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveTrace").finish_non_exhaustive()
    }
}

impl WaveTrace {
    /// Creates the trace file and writes the declaration section.
    ///
    /// `imem_bytes` / `dmem_bytes` size the per-port response data wires.
    ///
    /// # Errors
    ///
    /// Propagates file creation and header write failures.
    pub fn open(path: &Path, imem_bytes: usize, dmem_bytes: usize) -> io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = vcd::Writer::new(BufWriter::new(file));

        writer.timescale(1, TimescaleUnit::NS)?;
        writer.add_module("testbench")?;
        let clock = writer.add_var(VarType::Wire, 1, "clock", None)?;
        let reset = writer.add_var(VarType::Wire, 1, "reset", None)?;
        let imem = Self::declare_port(&mut writer, "imem", imem_bytes)?;
        let dmem = Self::declare_port(&mut writer, "dmem", dmem_bytes)?;
        writer.upscope()?;
        writer.enddefinitions()?;

        Ok(Self {
            writer,
            clock,
            reset,
            imem,
            dmem,
            last: None,
        })
    }

    fn declare_port(
        writer: &mut vcd::Writer<BufWriter<File>>,
        name: &str,
        response_bytes: usize,
    ) -> io::Result<PortVars> {
        let data_bits = response_bytes * 8;
        writer.add_module(name)?;
        let vars = PortVars {
            read_valid: writer.add_var(VarType::Wire, 1, "read_valid", None)?,
            read_addr: writer.add_var(VarType::Wire, 64, "read_addr", None)?,
            read_ready: writer.add_var(VarType::Wire, 1, "read_ready", None)?,
            resp_valid: writer.add_var(VarType::Wire, 1, "resp_valid", None)?,
            resp_ready: writer.add_var(VarType::Wire, 1, "resp_ready", None)?,
            resp_addr: writer.add_var(VarType::Wire, 64, "resp_addr", None)?,
            resp_data: writer.add_var(VarType::Wire, data_bits as u32, "resp_data", None)?,
            write_valid: writer.add_var(VarType::Wire, 1, "write_valid", None)?,
            write_ready: writer.add_var(VarType::Wire, 1, "write_ready", None)?,
            write_addr: writer.add_var(VarType::Wire, 64, "write_addr", None)?,
            write_data: writer.add_var(VarType::Wire, data_bits as u32, "write_data", None)?,
            data_bits,
        };
        writer.upscope()?;
        Ok(vars)
    }

    /// Records one evaluation step at `time`, emitting only changed values.
    ///
    /// # Errors
    ///
    /// Propagates write failures to the trace file.
    pub fn sample(&mut self, time: u64, state: &SignalState) -> io::Result<()> {
        self.writer.timestamp(time)?;
        let last = self.last.take();

        self.scalar(self.clock, state.clock, last.as_ref().map(|l| l.clock))?;
        self.scalar(self.reset, state.reset, last.as_ref().map(|l| l.reset))?;
        self.port(self.imem, &state.imem, last.as_ref().map(|l| &l.imem))?;
        self.port(self.dmem, &state.dmem, last.as_ref().map(|l| &l.dmem))?;

        self.last = Some(state.clone());
        Ok(())
    }

    fn port(&mut self, vars: PortVars, now: &PortState, before: Option<&PortState>) -> io::Result<()> {
        self.scalar(vars.read_valid, now.read.valid, before.map(|p| p.read.valid))?;
        self.word(vars.read_addr, now.read.addr, before.map(|p| p.read.addr))?;
        self.scalar(vars.read_ready, now.read_ready, before.map(|p| p.read_ready))?;

        self.scalar(vars.resp_valid, now.response_valid, before.map(|p| p.response_valid))?;
        self.scalar(vars.resp_ready, now.response_ready, before.map(|p| p.response_ready))?;
        self.word(vars.resp_addr, now.response_addr, before.map(|p| p.response_addr))?;
        if before.is_none_or(|p| p.response_data != now.response_data) {
            let bits = block_bits(&now.response_data, vars.data_bits);
            self.writer.change_vector(vars.resp_data, &bits)?;
        }

        self.scalar(vars.write_valid, now.write.valid, before.map(|p| p.write.valid))?;
        self.scalar(vars.write_ready, now.write_ready, before.map(|p| p.write_ready))?;
        self.word(vars.write_addr, now.write.addr, before.map(|p| p.write.addr))?;
        if before.is_none_or(|p| p.write.data != now.write.data) {
            let bits = block_bits(&now.write.data, vars.data_bits);
            self.writer.change_vector(vars.write_data, &bits)?;
        }
        Ok(())
    }

    fn scalar(&mut self, id: IdCode, now: bool, before: Option<bool>) -> io::Result<()> {
        if before != Some(now) {
            self.writer.change_scalar(id, Value::from(now))?;
        }
        Ok(())
    }

    fn word(&mut self, id: IdCode, now: u64, before: Option<u64>) -> io::Result<()> {
        if before != Some(now) {
            let bits: Vec<Value> = (0..64)
                .rev()
                .map(|i| Value::from((now >> i) & 1 == 1))
                .collect();
            self.writer.change_vector(id, &bits)?;
        }
        Ok(())
    }
}

/// Expands a little-endian byte block to `width_bits` VCD values, MSB first.
fn block_bits(data: &[u8], width_bits: usize) -> Vec<Value> {
    let mut bits = Vec::with_capacity(width_bits);
    for i in (0..width_bits / 8).rev() {
        let byte = data.get(i).copied().unwrap_or(0);
        for bit in (0..8).rev() {
            bits.push(Value::from((byte >> bit) & 1 == 1));
        }
    }
    bits
}
