//! Configuration system for the bus simulator.
//!
//! This module defines all configuration structures and enums used to
//! parameterize a simulation run. It provides:
//! 1. **Defaults:** Baseline constants (store capacity, line width, reset
//!    window, cycle budget, trace file).
//! 2. **Structures:** Hierarchical config for the backing store, the two
//!    ports, and the sequencer.
//! 3. **Enums:** The out-of-range policy selecting between the strict
//!    (abort) and permissive (warn-and-zero) harness behaviors.
//!
//! Configuration is supplied as JSON (see [`Config::from_json`]) or via
//! `Config::default()`; every field carries a serde default so partial
//! documents work.

use serde::Deserialize;

/// Default configuration constants.
mod defaults {
    /// Backing store capacity in bytes (128 KiB).
    ///
    /// A fixed constant, never derived from the loaded image; accesses at
    /// or beyond this bound are out of range.
    pub const MEM_CAPACITY: usize = 0x0002_0000;

    /// Response block width in bytes (one 64-byte line, a 512-bit wire).
    pub const LINE_BYTES: usize = 64;

    /// Full clock cycles with reset asserted before the main loop.
    pub const RESET_CYCLES: u64 = 10;

    /// Clock cycles simulated after the reset window.
    pub const RUN_CYCLES: u64 = 1000;

    /// Default waveform trace output file.
    pub const TRACE_FILE: &str = "dump.vcd";
}

/// Policy for out-of-range accesses.
///
/// Both behaviors exist across the harness family: the later variant aborts
/// the run, the earlier ones log a warning and substitute zeros. Callers
/// pick per validation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum RangePolicy {
    /// Raise a fatal protocol violation and terminate the run.
    #[default]
    Strict,
    /// Log a diagnostic, zero-fill reads, drop writes, keep running.
    #[serde(alias = "Warn")]
    Permissive,
}

/// Root configuration structure for a simulation run.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use membus_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.memory.capacity, 0x20000);
/// assert_eq!(config.imem.response_bytes, 64);
/// assert_eq!(config.sequencer.reset_cycles, 10);
/// ```
///
/// Deserializing a partial JSON document:
///
/// ```
/// use membus_core::config::{Config, RangePolicy};
///
/// let json = r#"{
///     "memory": { "capacity": 4096, "policy": "Permissive" },
///     "sequencer": { "run_cycles": 250 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.memory.capacity, 4096);
/// assert_eq!(config.memory.policy, RangePolicy::Permissive);
/// assert_eq!(config.sequencer.run_cycles, 250);
/// assert!(config.dmem.align_to_line);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Backing store configuration.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Instruction port configuration.
    #[serde(default)]
    pub imem: PortConfig,
    /// Data port configuration.
    #[serde(default)]
    pub dmem: PortConfig,
    /// Clock/reset sequencer configuration.
    #[serde(default)]
    pub sequencer: SequencerConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error for malformed documents.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory: MemoryConfig::default(),
            imem: PortConfig::default(),
            dmem: PortConfig::default(),
            sequencer: SequencerConfig::default(),
        }
    }
}

/// Backing store capacity and range policy.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Store capacity in bytes.
    #[serde(default = "MemoryConfig::default_capacity")]
    pub capacity: usize,

    /// Out-of-range behavior for both ports.
    #[serde(default)]
    pub policy: RangePolicy,
}

impl MemoryConfig {
    fn default_capacity() -> usize {
        defaults::MEM_CAPACITY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::MEM_CAPACITY,
            policy: RangePolicy::default(),
        }
    }
}

/// Per-port response width and alignment mode.
///
/// The line-granular variant masks every address to the 64-byte boundary;
/// narrower variants operate on raw addresses with no masking. One policy
/// per port-width mode, applied uniformly to reads and writes.
#[derive(Debug, Clone, Deserialize)]
pub struct PortConfig {
    /// Response block width in bytes; must be a power of two when
    /// `align_to_line` is set.
    #[serde(default = "PortConfig::default_response_bytes")]
    pub response_bytes: usize,

    /// Mask request addresses down to a `response_bytes` boundary.
    #[serde(default = "PortConfig::default_align_to_line")]
    pub align_to_line: bool,
}

impl PortConfig {
    fn default_response_bytes() -> usize {
        defaults::LINE_BYTES
    }

    fn default_align_to_line() -> bool {
        true
    }
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            response_bytes: defaults::LINE_BYTES,
            align_to_line: true,
        }
    }
}

/// Clock/reset sequencing and observability options.
#[derive(Debug, Clone, Deserialize)]
pub struct SequencerConfig {
    /// Full cycles with reset asserted before the main loop.
    #[serde(default = "SequencerConfig::default_reset_cycles")]
    pub reset_cycles: u64,

    /// Cycle budget for the main loop.
    #[serde(default = "SequencerConfig::default_run_cycles")]
    pub run_cycles: u64,

    /// Waveform trace output path; `None` disables tracing.
    #[serde(default = "SequencerConfig::default_trace_path")]
    pub trace_path: Option<String>,

    /// Enable the per-cycle pipeline probe on standard output.
    #[serde(default)]
    pub probe: bool,
}

impl SequencerConfig {
    fn default_reset_cycles() -> u64 {
        defaults::RESET_CYCLES
    }

    fn default_run_cycles() -> u64 {
        defaults::RUN_CYCLES
    }

    fn default_trace_path() -> Option<String> {
        Some(defaults::TRACE_FILE.to_string())
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            reset_cycles: defaults::RESET_CYCLES,
            run_cycles: defaults::RUN_CYCLES,
            trace_path: Self::default_trace_path(),
            probe: false,
        }
    }
}
