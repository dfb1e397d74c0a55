//! Port protocol engine.
//!
//! One engine per port role, both running the same logic parameterized by a
//! small capability descriptor. Each invocation executes one half-cycle of
//! the ready/valid protocol: hold read-ready high, deliver at most one
//! queued response, accept at most one new read, and (data port only)
//! commit at most one write synchronously.
//!
//! Response delivery runs before request acceptance, so a response enqueued
//! in cycle N is first driven in cycle N+1. Line-granular ports mask the
//! low address bits before the bounds check on the read path and the write
//! path identically.

use tracing::warn;

use crate::common::addr::align_down;
use crate::common::error::{AccessKind, OutOfRange, SimError};
use crate::config::{PortConfig, RangePolicy};
use crate::mem::queue::{PendingResponse, ResponseQueue};
use crate::mem::store::BackingStore;
use crate::port::signals::{CoreIo, PortOutputs};
use crate::port::PortRole;

/// Capability descriptor distinguishing the two port instantiations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortCaps {
    /// Whether the port accepts writes. Hard capability: the instruction
    /// port holds write-ready low regardless of configuration.
    pub supports_write: bool,
    /// Response block width in bytes (64 for the line-granular variant).
    pub response_bytes: usize,
    /// Mask request addresses down to a `response_bytes` boundary.
    pub align_to_line: bool,
}

impl PortCaps {
    /// Builds the capabilities for `role` from its port configuration.
    pub fn from_config(role: PortRole, config: &PortConfig) -> Self {
        Self {
            supports_write: role == PortRole::Data,
            response_bytes: config.response_bytes,
            align_to_line: config.align_to_line,
        }
    }
}

/// Counters of transactions the engine has processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortStats {
    /// Read requests accepted (including permissive-mode zero-fills).
    pub reads_accepted: u64,
    /// Responses delivered to the core.
    pub responses_delivered: u64,
    /// Writes committed to the backing store.
    pub writes_committed: u64,
    /// Out-of-range accesses observed in permissive mode.
    pub range_violations: u64,
}

/// The ready/valid protocol engine for one port.
///
/// Owns its response queue as instance state (no ambient/static access), so
/// simulation runs and parallel test instances cannot contaminate each
/// other.
#[derive(Debug)]
pub struct PortEngine {
    role: PortRole,
    caps: PortCaps,
    policy: RangePolicy,
    queue: ResponseQueue,
    outputs: PortOutputs,
    stats: PortStats,
}

impl PortEngine {
    /// Creates an engine for `role` with the given capabilities and policy.
    pub fn new(role: PortRole, caps: PortCaps, policy: RangePolicy) -> Self {
        Self {
            role,
            caps,
            policy,
            queue: ResponseQueue::new(),
            outputs: PortOutputs::idle(caps.response_bytes),
            stats: PortStats::default(),
        }
    }

    /// The port role this engine serves.
    pub fn role(&self) -> PortRole {
        self.role
    }

    /// The capability descriptor this engine was built with.
    pub fn caps(&self) -> &PortCaps {
        &self.caps
    }

    /// Output wire levels driven during the most recent [`Self::service`].
    pub fn outputs(&self) -> &PortOutputs {
        &self.outputs
    }

    /// Transaction counters.
    pub fn stats(&self) -> &PortStats {
        &self.stats
    }

    /// Number of accepted-but-undelivered responses.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Runs one half-cycle of the protocol against `core` and `store`.
    ///
    /// Sequence: read-ready high; deliver at most one queued response if the
    /// core asserts response-ready; sample and accept a new read request;
    /// commit a write synchronously (data port). For line-granular ports
    /// the write payload is expected to be a full line; sub-line payloads
    /// are committed at the masked base address.
    ///
    /// # Errors
    ///
    /// [`SimError::ProtocolViolation`] for an out-of-range access under
    /// [`RangePolicy::Strict`]. Permissive mode logs a warning instead and
    /// substitutes a zero-filled response (reads) or drops the payload
    /// (writes).
    pub fn service<C: CoreIo>(
        &mut self,
        core: &mut C,
        store: &mut BackingStore,
    ) -> Result<(), SimError> {
        // No backpressure on acceptance.
        core.set_read_ready(self.role, true);
        self.outputs.read_ready = true;

        self.deliver(core);
        self.accept(core, store)?;
        self.commit(core, store)
    }

    /// Delivers the front of the queue if the core is ready for it.
    ///
    /// Strictly one response per cycle regardless of queue depth; when
    /// response-ready is low the queue is left untouched.
    fn deliver<C: CoreIo>(&mut self, core: &mut C) {
        core.clear_response(self.role);
        self.outputs.response_valid = false;

        if !core.response_ready(self.role) {
            return;
        }
        if let Some(response) = self.queue.pop() {
            core.drive_response(self.role, response.addr, &response.data);
            self.outputs.response_valid = true;
            self.outputs.response_addr = response.addr;
            self.outputs.response_data.copy_from_slice(&response.data);
            self.stats.responses_delivered += 1;
        }
    }

    /// Samples the read request wires and enqueues a pending response.
    fn accept<C: CoreIo>(
        &mut self,
        core: &mut C,
        store: &mut BackingStore,
    ) -> Result<(), SimError> {
        let request = core.read_request(self.role);
        if !request.valid {
            return Ok(());
        }

        let addr = self.effective_addr(request.addr);
        match store.read(addr, self.caps.response_bytes) {
            Ok(block) => {
                self.queue.push(PendingResponse {
                    addr,
                    data: Box::from(block),
                });
                self.stats.reads_accepted += 1;
            }
            Err(source) => self.out_of_range(AccessKind::Read, source)?,
        }
        Ok(())
    }

    /// Samples the write wires and commits the payload, data port only.
    ///
    /// Writes take effect within the same evaluation step; they are never
    /// queued.
    fn commit<C: CoreIo>(
        &mut self,
        core: &mut C,
        store: &mut BackingStore,
    ) -> Result<(), SimError> {
        if !self.caps.supports_write {
            core.set_write_ready(self.role, false);
            self.outputs.write_ready = false;
            return Ok(());
        }

        core.set_write_ready(self.role, true);
        self.outputs.write_ready = true;

        let request = core.write_request(self.role);
        if !request.valid {
            return Ok(());
        }

        let addr = self.effective_addr(request.addr);
        match store.write(addr, &request.data) {
            Ok(()) => self.stats.writes_committed += 1,
            Err(source) => self.out_of_range(AccessKind::Write, source)?,
        }
        Ok(())
    }

    /// Masks to the line boundary for line-granular ports, raw otherwise.
    fn effective_addr(&self, addr: u64) -> u64 {
        if self.caps.align_to_line {
            align_down(addr, self.caps.response_bytes)
        } else {
            addr
        }
    }

    fn out_of_range(&mut self, access: AccessKind, source: OutOfRange) -> Result<(), SimError> {
        match self.policy {
            RangePolicy::Strict => Err(SimError::ProtocolViolation {
                port: self.role,
                access,
                source,
            }),
            RangePolicy::Permissive => {
                warn!(port = %self.role, %access, "{source}; continuing");
                self.stats.range_violations += 1;
                if access == AccessKind::Read {
                    // Zero substitute keeps the FIFO accounting intact.
                    self.queue.push(PendingResponse {
                        addr: source.addr,
                        data: vec![0; self.caps.response_bytes].into_boxed_slice(),
                    });
                    self.stats.reads_accepted += 1;
                }
                Ok(())
            }
        }
    }
}
