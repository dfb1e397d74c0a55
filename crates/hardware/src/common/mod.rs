//! Common utilities and types shared across the simulator.
//!
//! This module provides the building blocks used by every other component:
//! 1. **Alignment:** Line-boundary masking helpers for block-granular ports.
//! 2. **Error Handling:** The out-of-range condition and the fatal error taxonomy.

/// Address alignment helpers.
pub mod addr;

/// Error types for bounds violations, image loading, and trace output.
pub mod error;

pub use addr::align_down;
pub use error::{AccessKind, OutOfRange, SimError};
