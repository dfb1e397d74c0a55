//! Sequencer Unit Tests.
//!
//! Runs full simulations around the scripted mock core: reset window
//! behavior, per-cycle evaluation cadence, request-to-response latency
//! through the main loop, write commits, probe framing, and strict-mode
//! termination.

use membus_core::config::RangePolicy;
use membus_core::port::signals::WriteRequest;
use membus_core::port::PortRole;
use membus_core::probe::{ProbeReporter, ProbeSample};

use crate::common::harness::{quiet_config, SharedBuf, TestContext};

// ══════════════════════════════════════════════════════════
// 1. Reset window
// ══════════════════════════════════════════════════════════

#[test]
fn reset_window_runs_cold() {
    let mut ctx = TestContext::new(&quiet_config(0));
    ctx.core_mut().request_read(PortRole::Instruction, 0);

    let summary = ctx.sim.run().unwrap();

    // Ten cycles of clock activity, zero engine activity.
    assert_eq!(summary.cycles, 0);
    assert_eq!(ctx.core().rising_edges, 10);
    assert_eq!(summary.imem.reads_accepted, 0);
    assert!(!ctx.core().read_ready[0]);
    assert!(ctx.core().deliveries(PortRole::Instruction).is_empty());
}

#[test]
fn four_evaluations_per_cycle() {
    let mut config = quiet_config(5);
    config.sequencer.reset_cycles = 3;
    let mut ctx = TestContext::new(&config);

    let summary = ctx.sim.run().unwrap();

    assert_eq!(summary.cycles, 5);
    assert_eq!(ctx.core().rising_edges, 8);
    assert_eq!(ctx.core().evals, 4 * 8);
}

// ══════════════════════════════════════════════════════════
// 2. Request-to-response latency through the loop
// ══════════════════════════════════════════════════════════

#[test]
fn responses_lag_requests_by_one_cycle() {
    let mut ctx = TestContext::new(&quiet_config(4));
    {
        let core = ctx.core_mut();
        // Request in cycle 0, scripted follow-up in cycle 1, idle after.
        core.request_read(PortRole::Instruction, 0x40);
        core.script_read(PortRole::Instruction, 0x80);
    }

    let summary = ctx.sim.run().unwrap();

    assert_eq!(summary.imem.reads_accepted, 2);
    assert_eq!(summary.imem.responses_delivered, 2);
    assert_eq!(
        ctx.core().delivered_addrs(PortRole::Instruction),
        vec![0x40, 0x80]
    );

    // With a 10-cycle reset window, cycle N's engines run after the Nth
    // reset edge; each delivery lands exactly one cycle after its request.
    let deliveries = ctx.core().deliveries(PortRole::Instruction);
    assert_eq!(deliveries[0].edge, 11);
    assert_eq!(deliveries[1].edge, 12);
}

#[test]
fn both_ports_serviced_every_cycle() {
    let mut ctx = TestContext::new(&quiet_config(2));
    {
        let core = ctx.core_mut();
        core.request_read(PortRole::Instruction, 0x00);
        core.request_read(PortRole::Data, 0x1C0);
    }

    let summary = ctx.sim.run().unwrap();

    assert_eq!(summary.imem.responses_delivered, 1);
    assert_eq!(summary.dmem.responses_delivered, 1);
    assert_eq!(ctx.core().delivered_addrs(PortRole::Data), vec![0x1C0]);
    assert!(ctx.core().write_ready[1]);
    assert!(!ctx.core().write_ready[0]);
}

// ══════════════════════════════════════════════════════════
// 3. Writes through the loop
// ══════════════════════════════════════════════════════════

#[test]
fn data_write_lands_in_the_store() {
    let mut ctx = TestContext::new(&quiet_config(1));
    ctx.core_mut().write_req = WriteRequest {
        valid: true,
        addr: 0x200,
        data: vec![0xC0, 0xFF, 0xEE],
    };

    let summary = ctx.sim.run().unwrap();

    assert_eq!(summary.dmem.writes_committed, 1);
    assert_eq!(ctx.sim.store().read(0x200, 3).unwrap(), &[0xC0, 0xFF, 0xEE]);
}

// ══════════════════════════════════════════════════════════
// 4. Strict-mode termination
// ══════════════════════════════════════════════════════════

#[test]
fn strict_violation_halts_the_run() {
    let mut config = quiet_config(100);
    config.imem.align_to_line = false;
    let mut ctx = TestContext::new(&config);
    ctx.core_mut()
        .request_read(PortRole::Instruction, 0x20000);

    let err = ctx.sim.run().unwrap_err();
    assert!(err.to_string().contains("protocol violation"));
    // Halted in cycle 0, well short of the budget.
    assert_eq!(ctx.sim.summary().cycles, 0);
}

#[test]
fn permissive_violation_runs_to_budget() {
    let mut config = quiet_config(3);
    config.imem.align_to_line = false;
    config.memory.policy = RangePolicy::Permissive;
    let mut ctx = TestContext::new(&config);
    ctx.core_mut()
        .request_read(PortRole::Instruction, 0x20000);

    let summary = ctx.sim.run().unwrap();

    assert_eq!(summary.cycles, 3);
    assert_eq!(summary.imem.range_violations, 1);
    let deliveries = ctx.core().deliveries(PortRole::Instruction);
    assert_eq!(deliveries.len(), 1);
    assert!(deliveries[0].data.iter().all(|b| *b == 0));
}

// ══════════════════════════════════════════════════════════
// 5. Probe framing
// ══════════════════════════════════════════════════════════

#[test]
fn probe_records_one_line_per_cycle() {
    let sink = SharedBuf::default();
    let mut ctx = TestContext::new(&quiet_config(3));
    ctx.core_mut().probe_sample = Some(ProbeSample::default());
    ctx.sim.set_probe(ProbeReporter::new(Box::new(sink.clone())));

    ctx.sim.run().unwrap();

    let text = sink.contents();
    // Header plus one line per main-loop cycle; none for the reset window.
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().nth(1).unwrap().starts_with("       0 |"));
    assert!(text.lines().nth(3).unwrap().starts_with("       2 |"));
}

#[test]
fn probe_silent_when_core_exposes_none() {
    let sink = SharedBuf::default();
    let mut ctx = TestContext::new(&quiet_config(3));
    ctx.sim.set_probe(ProbeReporter::new(Box::new(sink.clone())));

    ctx.sim.run().unwrap();

    assert_eq!(sink.contents(), "");
}
