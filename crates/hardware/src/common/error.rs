//! Error types for the simulator.
//!
//! This module defines the full error taxonomy:
//! 1. **`OutOfRange`:** A read or write (after any alignment masking) falls
//!    outside backing-store bounds. Fatal or warn-and-zero depending on the
//!    configured [`RangePolicy`](crate::config::RangePolicy).
//! 2. **`SimError`:** Fatal conditions that terminate the run — protocol
//!    violations in strict mode, an unreadable memory image, or trace and
//!    probe output failures.
//!
//! A memory image shorter than the store capacity is not an error; the
//! remainder of the store is zero-filled by the loader.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::port::PortRole;

/// An access whose end falls past the backing store capacity.
///
/// Raised for `addr + width > capacity`; the exact boundary
/// `addr + width == capacity` is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("address {addr:#x} + {width} bytes exceeds capacity {capacity:#x}")]
pub struct OutOfRange {
    /// Start address of the offending access (post-masking).
    pub addr: u64,
    /// Access width in bytes.
    pub width: usize,
    /// Backing store capacity in bytes.
    pub capacity: usize,
}

/// Direction of a port access, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// Read request (instruction fetch or data load).
    Read,
    /// Write request (data port only).
    Write,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Fatal simulation errors.
///
/// Every variant terminates the run; the CLI maps them to a non-zero exit
/// code. Non-fatal conditions (permissive-mode range violations) are logged
/// through `tracing` instead and never surface here.
#[derive(Debug, Error)]
pub enum SimError {
    /// Strict-mode out-of-range access on a port.
    #[error("protocol violation: {access} on {port} port: {source}")]
    ProtocolViolation {
        /// Port on which the violation occurred.
        port: PortRole,
        /// Read or write path.
        access: AccessKind,
        /// The underlying bounds failure.
        source: OutOfRange,
    },

    /// The memory image file could not be opened or read.
    #[error("memory image '{}': {source}", path.display())]
    MalformedImage {
        /// Path passed on the command line.
        path: PathBuf,
        /// The underlying I/O failure.
        source: io::Error,
    },

    /// Writing the waveform trace failed.
    #[error("waveform trace: {source}")]
    Trace {
        /// The underlying I/O failure.
        source: io::Error,
    },

    /// Writing a probe diagnostic line failed.
    #[error("probe output: {source}")]
    Probe {
        /// The underlying I/O failure.
        source: io::Error,
    },
}
