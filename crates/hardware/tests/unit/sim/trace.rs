//! Waveform Trace Unit Tests.
//!
//! Verifies the declaration section, the per-step timestamps, and
//! delta-only value emission, both directly and through a full run.

use std::fs;

use membus_core::port::signals::{ReadRequest, WriteRequest};
use membus_core::port::PortRole;
use membus_core::sim::trace::{PortState, SignalState, WaveTrace};

use crate::common::harness::{quiet_config, TestContext};

fn idle_port(bytes: usize) -> PortState {
    PortState {
        read: ReadRequest::default(),
        read_ready: false,
        response_valid: false,
        response_ready: false,
        response_addr: 0,
        response_data: vec![0; bytes].into_boxed_slice(),
        write: WriteRequest::default(),
        write_ready: false,
    }
}

fn idle_state() -> SignalState {
    SignalState {
        clock: false,
        reset: false,
        imem: idle_port(64),
        dmem: idle_port(64),
    }
}

// ══════════════════════════════════════════════════════════
// 1. Declarations
// ══════════════════════════════════════════════════════════

#[test]
fn header_declares_the_full_surface() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("header.vcd");
    {
        let mut trace = WaveTrace::open(&path, 64, 64).unwrap();
        trace.sample(0, &idle_state()).unwrap();
    }

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("$timescale"));
    assert!(text.contains("$scope module testbench"));
    assert!(text.contains("$scope module imem"));
    assert!(text.contains("$scope module dmem"));
    assert!(text.contains("$enddefinitions"));

    for name in [
        "clock",
        "reset",
        "read_valid",
        "read_addr",
        "read_ready",
        "resp_valid",
        "resp_ready",
        "resp_addr",
        "resp_data",
        "write_valid",
        "write_ready",
        "write_addr",
        "write_data",
    ] {
        assert!(text.contains(name), "missing declaration for {name}");
    }

    // 512-bit response data vector.
    assert!(text.contains("$var wire 512"));
}

// ══════════════════════════════════════════════════════════
// 2. Timestamps and delta emission
// ══════════════════════════════════════════════════════════

#[test]
fn every_step_gets_a_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("steps.vcd");
    {
        let mut trace = WaveTrace::open(&path, 64, 64).unwrap();
        for time in 0..8 {
            let mut state = idle_state();
            state.clock = time % 4 >= 2;
            trace.sample(time, &state).unwrap();
        }
    }

    let text = fs::read_to_string(&path).unwrap();
    for time in 0..8 {
        assert!(text.contains(&format!("#{time}")));
    }
}

#[test]
fn unchanged_signals_emit_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("delta.vcd");
    {
        let mut trace = WaveTrace::open(&path, 64, 64).unwrap();
        let state = idle_state();
        trace.sample(0, &state).unwrap();
        trace.sample(1, &state).unwrap();
        trace.sample(2, &state).unwrap();
    }

    let text = fs::read_to_string(&path).unwrap();
    let body = text.split("$enddefinitions").nth(1).unwrap();
    // The full surface is dumped at #0; identical later steps add only
    // their timestamps.
    let after_first = body.split("#1").nth(1).unwrap();
    assert_eq!(after_first.trim(), "#2");
}

#[test]
fn toggling_clock_is_re_emitted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("toggle.vcd");
    {
        let mut trace = WaveTrace::open(&path, 64, 64).unwrap();
        let mut state = idle_state();
        trace.sample(0, &state).unwrap();
        state.clock = true;
        trace.sample(1, &state).unwrap();
    }

    let text = fs::read_to_string(&path).unwrap();
    let after_first = text.split("#1").nth(1).unwrap();
    // Exactly one scalar change after #1: the clock going high.
    assert_eq!(after_first.trim().len(), 2);
    assert!(after_first.trim().starts_with('1'));
}

// ══════════════════════════════════════════════════════════
// 3. Through a full run
// ══════════════════════════════════════════════════════════

#[test]
fn trace_prefix_survives_a_strict_violation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("violation.vcd");

    let mut config = quiet_config(100);
    config.sequencer.reset_cycles = 1;
    config.sequencer.trace_path = Some(path.to_string_lossy().into_owned());
    config.imem.align_to_line = false;
    let mut ctx = TestContext::new(&config);
    ctx.core_mut()
        .request_read(PortRole::Instruction, 0x20000);

    ctx.sim.run().unwrap_err();

    // The run halts in cycle 0, but the trace is flushed and the captured
    // prefix stays inspectable: the declarations, the reset window's four
    // steps, and cycle 0's first evaluation step.
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("$enddefinitions"));
    for time in 0..5 {
        assert!(text.contains(&format!("#{time}")), "missing timestamp #{time}");
    }
    assert!(!text.contains("#5"));
}

#[test]
fn run_produces_a_trace_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.vcd");

    let mut config = quiet_config(2);
    config.sequencer.reset_cycles = 1;
    config.sequencer.trace_path = Some(path.to_string_lossy().into_owned());
    let mut ctx = TestContext::new(&config);
    ctx.core_mut().request_read(PortRole::Instruction, 0x40);
    ctx.sim.run().unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("$enddefinitions"));
    // Four evaluation steps per cycle, three cycles total.
    assert!(text.contains("#0"));
    assert!(text.contains("#11"));
    assert!(!text.contains("#12"));
}
