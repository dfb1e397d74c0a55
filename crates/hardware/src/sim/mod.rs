//! Simulation driver.
//!
//! This module assembles a run: image loading, the clock/reset sequencer,
//! waveform trace capture, and a built-in traffic core for exercising the
//! harness without an external core model.

/// Flat memory image loading.
pub mod loader;

/// Clock/reset sequencer and the top-level simulation loop.
pub mod sequencer;

/// Built-in sequential-fetch core.
pub mod traffic;

/// VCD waveform trace capture.
pub mod trace;

pub use sequencer::{RunSummary, Simulation};
pub use traffic::TrafficCore;
