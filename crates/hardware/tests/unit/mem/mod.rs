/// FIFO response queue ordering.
pub mod queue;
