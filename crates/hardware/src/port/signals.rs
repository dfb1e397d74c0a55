//! The core's signal surface.
//!
//! The core under test is a black box. Its wires are abstracted as the
//! [`CoreIo`] capability trait (one getter/setter per named signal) so the
//! protocol engines can run against a mock core with no hardware-evaluation
//! dependency. Signal values live for one evaluation step; the engines
//! sample request wires once per cycle and never retain them.

use crate::port::PortRole;
use crate::probe::ProbeSample;

/// A read request sampled from the core for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadRequest {
    /// The core requests a read this cycle.
    pub valid: bool,
    /// Byte address of the request.
    pub addr: u64,
}

/// A write request sampled from the core for one cycle (data port only).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteRequest {
    /// The core requests a write this cycle.
    pub valid: bool,
    /// Byte address of the write.
    pub addr: u64,
    /// Payload committed to the backing store.
    pub data: Vec<u8>,
}

/// Levels the engine drove onto its output wires this cycle.
///
/// Kept by each engine for waveform capture; the core only ever observes
/// these through its own input wires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortOutputs {
    /// Read acceptance; held high every cycle once the engine runs.
    pub read_ready: bool,
    /// High for the data port, permanently low for the instruction port.
    pub write_ready: bool,
    /// The engine is delivering a response this cycle.
    pub response_valid: bool,
    /// Address associated with the delivered response.
    pub response_addr: u64,
    /// Fixed-width data block of the delivered response.
    pub response_data: Box<[u8]>,
}

impl PortOutputs {
    /// Idle outputs for a port with `response_bytes`-wide responses.
    pub fn idle(response_bytes: usize) -> Self {
        Self {
            read_ready: false,
            write_ready: false,
            response_valid: false,
            response_addr: 0,
            response_data: vec![0; response_bytes].into_boxed_slice(),
        }
    }
}

/// Capability surface of the core under test.
///
/// One method per named wire of the handshake, plus the clock/reset pins
/// and the combinational evaluation primitive. The simulator never inspects
/// core internals except through [`CoreIo::probe`].
pub trait CoreIo {
    /// Drives the clock pin; a low-to-high transition is the rising edge.
    fn set_clock(&mut self, high: bool);

    /// Drives the reset pin.
    fn set_reset(&mut self, asserted: bool);

    /// Settles combinational logic; called at least twice per half-cycle.
    fn eval(&mut self);

    /// Samples `read_request_valid` / `read_request_address` for a port.
    fn read_request(&self, port: PortRole) -> ReadRequest;

    /// Drives `read_ready` for a port.
    fn set_read_ready(&mut self, port: PortRole, ready: bool);

    /// Samples `response_ready` for a port.
    fn response_ready(&self, port: PortRole) -> bool;

    /// Deasserts `response_valid` for a port (the per-cycle default).
    fn clear_response(&mut self, port: PortRole);

    /// Drives `response_valid`, `response_address` and `response_data`.
    fn drive_response(&mut self, port: PortRole, addr: u64, data: &[u8]);

    /// Samples `write_valid` / `write_address` / `write_data` for a port.
    fn write_request(&self, port: PortRole) -> WriteRequest;

    /// Drives `write_ready` for a port.
    fn set_write_ready(&mut self, port: PortRole, ready: bool);

    /// Samples the named pipeline probe signals, if the core exposes them.
    ///
    /// Read-only; returning `None` disables probe reporting for this core.
    fn probe(&self) -> Option<ProbeSample> {
        None
    }
}
