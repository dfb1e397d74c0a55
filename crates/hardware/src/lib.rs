//! Cycle-accurate memory-bus transaction simulator.
//!
//! This crate stands in for instruction and data memory behind a simulated
//! processor core that drives a ready/valid handshake. It implements:
//! 1. **Backing store:** Flat fixed-capacity byte memory, image-loaded, bounds-checked.
//! 2. **Port engines:** One protocol engine per port (instruction fetch, data access)
//!    with FIFO response queues and a configurable out-of-range policy.
//! 3. **Probe:** Optional per-cycle pipeline-stage diagnostic lines.
//! 4. **Sequencer:** Two-phase clock with a reset window and exact
//!    engine-between-evaluations ordering.
//! 5. **Trace:** VCD waveform capture of the full port signal surface.

/// Common types (errors, address alignment helpers).
pub mod common;
/// Simulator configuration (defaults, policy enums, hierarchical structures).
pub mod config;
/// Backing store and response queues.
pub mod mem;
/// Port protocol engines and the core signal surface.
pub mod port;
/// Pipeline probe sampling and rendering.
pub mod probe;
/// Simulation driver (loader, sequencer, waveform trace, traffic core).
pub mod sim;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Generic per-port protocol engine; instantiate once per port role.
pub use crate::port::engine::PortEngine;
/// Top-level simulation run; owns the core, store, engines, probe, and trace.
pub use crate::sim::sequencer::Simulation;
