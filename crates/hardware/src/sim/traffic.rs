//! Built-in sequential-fetch core.
//!
//! A minimal [`CoreIo`] implementation that exercises the harness without a
//! compiled core model: it issues back-to-back line fetches on the
//! instruction port with response-ready held high, wraps at the store
//! capacity, and exposes its own three-deep fetch pipeline through the
//! probe. The data port stays idle. Used by the CLI and the test suite.

use crate::config::Config;
use crate::port::signals::{CoreIo, ReadRequest, WriteRequest};
use crate::port::PortRole;
use crate::probe::{CacheRequest, ProbeSample, StageProbe};

/// Sequential line-fetch requester.
#[derive(Debug)]
pub struct TrafficCore {
    line_bytes: u64,
    wrap_at: u64,
    clock: bool,
    reset: bool,
    fetch_addr: u64,
    fetch2: Option<u64>,
    fetch3: Option<u64>,
    response: Option<(u64, u32)>,
    responses: u64,
}

impl TrafficCore {
    /// Builds a traffic core matching the run configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            line_bytes: config.imem.response_bytes as u64,
            wrap_at: config.memory.capacity as u64,
            clock: false,
            reset: false,
            fetch_addr: 0,
            fetch2: None,
            fetch3: None,
            response: None,
            responses: 0,
        }
    }

    /// Total responses delivered to this core.
    pub fn responses(&self) -> u64 {
        self.responses
    }

    /// Address and first instruction word of the latest response, if one
    /// arrived this cycle.
    pub fn last_response(&self) -> Option<(u64, u32)> {
        self.response
    }
}

impl CoreIo for TrafficCore {
    fn set_clock(&mut self, high: bool) {
        let rising = high && !self.clock;
        self.clock = high;
        if rising && !self.reset {
            // Advance the fetch pipeline one stage per cycle. A
            // zero-capacity store has no line to wrap back to.
            self.fetch3 = self.fetch2;
            self.fetch2 = Some(self.fetch_addr);
            let next = self.fetch_addr + self.line_bytes;
            self.fetch_addr = if self.wrap_at == 0 {
                next
            } else {
                next % self.wrap_at
            };
        }
    }

    fn set_reset(&mut self, asserted: bool) {
        self.reset = asserted;
        if asserted {
            self.fetch_addr = 0;
            self.fetch2 = None;
            self.fetch3 = None;
            self.response = None;
        }
    }

    fn eval(&mut self) {
        // Outputs are pure functions of register state.
    }

    fn read_request(&self, port: PortRole) -> ReadRequest {
        match port {
            PortRole::Instruction => ReadRequest {
                valid: !self.reset,
                addr: self.fetch_addr,
            },
            PortRole::Data => ReadRequest::default(),
        }
    }

    fn set_read_ready(&mut self, _port: PortRole, _ready: bool) {}

    fn response_ready(&self, _port: PortRole) -> bool {
        true
    }

    fn clear_response(&mut self, port: PortRole) {
        if port == PortRole::Instruction {
            self.response = None;
        }
    }

    fn drive_response(&mut self, port: PortRole, addr: u64, data: &[u8]) {
        if port == PortRole::Instruction {
            let word = data
                .get(..4)
                .map_or(0, |w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]));
            self.response = Some((addr, word));
            self.responses += 1;
        }
    }

    fn write_request(&self, _port: PortRole) -> WriteRequest {
        WriteRequest::default()
    }

    fn set_write_ready(&mut self, _port: PortRole, _ready: bool) {}

    fn probe(&self) -> Option<ProbeSample> {
        let mut sample = ProbeSample {
            stall: false,
            mem_read: self.response.is_some(),
            cache_request: Some(CacheRequest {
                port: PortRole::Instruction,
                addr: self.fetch_addr,
            }),
            ..ProbeSample::default()
        };
        sample.stages[0] = StageProbe {
            valid: !self.reset,
            pc: self.fetch_addr,
            inst: 0,
        };
        if let Some(pc) = self.fetch2 {
            sample.stages[1] = StageProbe {
                valid: true,
                pc,
                inst: 0,
            };
        }
        if let Some(pc) = self.fetch3 {
            sample.stages[2] = StageProbe {
                valid: true,
                pc,
                inst: 0,
            };
        }
        if let Some((addr, inst)) = self.response {
            sample.stages[3] = StageProbe {
                valid: true,
                pc: addr,
                inst,
            };
        }
        Some(sample)
    }
}
