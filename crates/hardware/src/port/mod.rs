//! Port-side components: signal surface and protocol engines.
//!
//! The simulator exposes exactly one memory responder per port, a single
//! in-order channel with no reordering. Both ports run the same generic
//! engine; they differ only in their capability descriptor (write support,
//! response width, line alignment).

use std::fmt;

/// Protocol engine implementation.
pub mod engine;

/// The core's signal surface as a capability trait, plus signal value types.
pub mod signals;

pub use engine::{PortCaps, PortEngine};
pub use signals::{CoreIo, PortOutputs, ReadRequest, WriteRequest};

/// Role of a memory port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortRole {
    /// Instruction fetch port; never accepts writes.
    Instruction,
    /// Data access port; accepts reads and writes.
    Data,
}

impl PortRole {
    /// Short name used in logs and trace scopes.
    pub fn name(self) -> &'static str {
        match self {
            Self::Instruction => "imem",
            Self::Data => "dmem",
        }
    }
}

impl fmt::Display for PortRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
