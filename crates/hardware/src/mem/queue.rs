//! FIFO response queue.
//!
//! Each port engine owns one queue of accepted-but-undelivered read
//! responses. Insertion order equals acceptance order equals delivery
//! order; there is no reordering and no priority. The queue is unbounded in
//! the model (acceptance has no backpressure) and bounded in practice by
//! the number of outstanding reads.

use std::collections::VecDeque;

/// A queued result of an accepted read, awaiting delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingResponse {
    /// Address the response refers to (post-masking for line-granular ports).
    pub addr: u64,
    /// Fixed-width data block read from the backing store.
    pub data: Box<[u8]>,
}

/// Strictly in-order buffer of [`PendingResponse`] entries.
#[derive(Debug, Default)]
pub struct ResponseQueue {
    entries: VecDeque<PendingResponse>,
}

impl ResponseQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a response at the tail (acceptance order).
    pub fn push(&mut self, response: PendingResponse) {
        self.entries.push_back(response);
    }

    /// Removes and returns the oldest response, if any.
    pub fn pop(&mut self) -> Option<PendingResponse> {
        self.entries.pop_front()
    }

    /// Returns the oldest response without removing it.
    pub fn front(&self) -> Option<&PendingResponse> {
        self.entries.front()
    }

    /// Number of undelivered responses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the queue holds no responses.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
