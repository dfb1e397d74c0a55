//! Error Taxonomy Unit Tests.
//!
//! Verifies display formatting and structure of the fatal error types.

use std::io;
use std::path::PathBuf;

use membus_core::common::error::{AccessKind, OutOfRange, SimError};
use membus_core::port::PortRole;

// ══════════════════════════════════════════════════════════
// 1. OutOfRange rendering
// ══════════════════════════════════════════════════════════

#[test]
fn out_of_range_display() {
    let err = OutOfRange {
        addr: 0x1FFE0,
        width: 64,
        capacity: 0x20000,
    };
    assert_eq!(
        err.to_string(),
        "address 0x1ffe0 + 64 bytes exceeds capacity 0x20000"
    );
}

// ══════════════════════════════════════════════════════════
// 2. Protocol violation rendering
// ══════════════════════════════════════════════════════════

#[test]
fn protocol_violation_names_port_and_direction() {
    let err = SimError::ProtocolViolation {
        port: PortRole::Data,
        access: AccessKind::Write,
        source: OutOfRange {
            addr: 0x40000,
            width: 8,
            capacity: 0x20000,
        },
    };
    let text = err.to_string();
    assert!(text.starts_with("protocol violation: write on dmem port"));
    assert!(text.contains("0x40000"));
}

#[test]
fn access_kind_display() {
    assert_eq!(AccessKind::Read.to_string(), "read");
    assert_eq!(AccessKind::Write.to_string(), "write");
}

// ══════════════════════════════════════════════════════════
// 3. Image errors carry the offending path
// ══════════════════════════════════════════════════════════

#[test]
fn malformed_image_carries_path() {
    let err = SimError::MalformedImage {
        path: PathBuf::from("firmware.bin"),
        source: io::Error::from(io::ErrorKind::NotFound),
    };
    assert!(err.to_string().contains("firmware.bin"));
}

#[test]
fn port_role_names() {
    assert_eq!(PortRole::Instruction.to_string(), "imem");
    assert_eq!(PortRole::Data.to_string(), "dmem");
}
