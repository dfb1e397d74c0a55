//! Response Queue Unit Tests.
//!
//! Verifies strict FIFO ordering: delivery order equals acceptance order,
//! with no reordering under any interleaving of pushes and pops.

use membus_core::mem::queue::{PendingResponse, ResponseQueue};
use proptest::prelude::*;

fn entry(addr: u64) -> PendingResponse {
    PendingResponse {
        addr,
        data: Box::from([addr as u8; 4]),
    }
}

// ══════════════════════════════════════════════════════════
// 1. Basic FIFO behavior
// ══════════════════════════════════════════════════════════

#[test]
fn empty_queue() {
    let mut queue = ResponseQueue::new();
    assert!(queue.is_empty());
    assert_eq!(queue.len(), 0);
    assert_eq!(queue.front(), None);
    assert_eq!(queue.pop(), None);
}

#[test]
fn pop_order_equals_push_order() {
    let mut queue = ResponseQueue::new();
    for addr in [0x40, 0x80, 0xC0] {
        queue.push(entry(addr));
    }
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.front().unwrap().addr, 0x40);
    assert_eq!(queue.pop().unwrap().addr, 0x40);
    assert_eq!(queue.pop().unwrap().addr, 0x80);
    assert_eq!(queue.pop().unwrap().addr, 0xC0);
    assert!(queue.is_empty());
}

#[test]
fn front_does_not_consume() {
    let mut queue = ResponseQueue::new();
    queue.push(entry(0x40));
    assert_eq!(queue.front().unwrap().addr, 0x40);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.pop().unwrap().addr, 0x40);
}

#[test]
fn payload_survives_queueing() {
    let mut queue = ResponseQueue::new();
    queue.push(PendingResponse {
        addr: 0x100,
        data: Box::from([1, 2, 3, 4]),
    });
    assert_eq!(&*queue.pop().unwrap().data, &[1, 2, 3, 4]);
}

// ══════════════════════════════════════════════════════════
// 2. Ordering property
// ══════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn interleaved_pops_preserve_order(addrs in prop::collection::vec(any::<u64>(), 1..64)) {
        let mut queue = ResponseQueue::new();
        let mut out = Vec::new();

        // Push everything, popping after every other push.
        for (i, addr) in addrs.iter().enumerate() {
            queue.push(entry(*addr));
            if i % 2 == 1 {
                out.push(queue.pop().unwrap().addr);
            }
        }
        while let Some(response) = queue.pop() {
            out.push(response.addr);
        }

        prop_assert_eq!(out, addrs);
    }
}
