//! Memory-side state: the backing store and per-port response queues.
//!
//! This module holds the two stateful leaves of the simulator:
//! 1. **Store:** Flat fixed-capacity byte memory behind both ports.
//! 2. **Queue:** FIFO of accepted-but-undelivered read responses.

/// Flat backing store with checked bounds.
pub mod store;

/// FIFO response queue of pending read results.
pub mod queue;

pub use queue::{PendingResponse, ResponseQueue};
pub use store::BackingStore;
