//! Clock/reset sequencer and top-level simulation loop.
//!
//! Owns the core, the backing store, both port engines, and the optional
//! probe and trace. Each cycle is two-phased: the engines run after the
//! low-phase evaluation and before the second evaluation, so request
//! signals sampled under the low phase are answered before the core samples
//! responses on the rising edge. This ordering is exact; moving the engine
//! invocation makes handshake responses a cycle late or early.

use std::path::Path;

use tracing::debug;

use crate::common::error::SimError;
use crate::config::Config;
use crate::mem::store::BackingStore;
use crate::port::engine::{PortCaps, PortEngine, PortStats};
use crate::port::signals::{CoreIo, WriteRequest};
use crate::port::PortRole;
use crate::probe::ProbeReporter;
use crate::sim::trace::{PortState, SignalState, WaveTrace};

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Main-loop cycles completed (excludes the reset window).
    pub cycles: u64,
    /// Instruction port transaction counts.
    pub imem: PortStats,
    /// Data port transaction counts.
    pub dmem: PortStats,
}

/// A full simulation run: core, store, engines, probe, trace.
///
/// Single-threaded and strictly sequential; one logical cycle completes
/// before the next begins. Terminates at the cycle budget or on a fatal
/// protocol violation, nothing else.
#[derive(Debug)]
pub struct Simulation<C: CoreIo> {
    core: C,
    store: BackingStore,
    imem: PortEngine,
    dmem: PortEngine,
    probe: Option<ProbeReporter>,
    trace: Option<WaveTrace>,
    reset_cycles: u64,
    run_cycles: u64,
    clock: bool,
    reset: bool,
    time: u64,
    cycle: u64,
}

impl<C: CoreIo> Simulation<C> {
    /// Assembles a run from a core, a pre-loaded store, and a config.
    ///
    /// Opens the waveform trace if the config names one and enables the
    /// stdout probe reporter if configured.
    ///
    /// # Errors
    ///
    /// [`SimError::Trace`] if the trace file cannot be created.
    pub fn new(core: C, store: BackingStore, config: &Config) -> Result<Self, SimError> {
        let imem = PortEngine::new(
            PortRole::Instruction,
            PortCaps::from_config(PortRole::Instruction, &config.imem),
            config.memory.policy,
        );
        let dmem = PortEngine::new(
            PortRole::Data,
            PortCaps::from_config(PortRole::Data, &config.dmem),
            config.memory.policy,
        );

        let trace = match &config.sequencer.trace_path {
            Some(path) => Some(
                WaveTrace::open(
                    Path::new(path),
                    config.imem.response_bytes,
                    config.dmem.response_bytes,
                )
                .map_err(|source| SimError::Trace { source })?,
            ),
            None => None,
        };

        Ok(Self {
            core,
            store,
            imem,
            dmem,
            probe: config.sequencer.probe.then(ProbeReporter::stdout),
            trace,
            reset_cycles: config.sequencer.reset_cycles,
            run_cycles: config.sequencer.run_cycles,
            clock: false,
            reset: false,
            time: 0,
            cycle: 0,
        })
    }

    /// Replaces the probe reporter (used by tests to capture output).
    pub fn set_probe(&mut self, reporter: ProbeReporter) {
        self.probe = Some(reporter);
    }

    /// The core under test.
    pub fn core(&self) -> &C {
        &self.core
    }

    /// Mutable access to the core under test.
    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    /// The shared backing store.
    pub fn store(&self) -> &BackingStore {
        &self.store
    }

    /// Current summary counters.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            cycles: self.cycle,
            imem: *self.imem.stats(),
            dmem: *self.dmem.stats(),
        }
    }

    /// Runs the reset window and the main loop to the cycle budget.
    ///
    /// The trace is closed on both success and failure so the captured
    /// prefix remains inspectable after a violation.
    ///
    /// # Errors
    ///
    /// A fatal [`SimError`] halts the run immediately.
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        let result = self.run_inner();
        // Dropping the trace flushes the underlying buffered file.
        self.trace = None;
        result.map(|()| self.summary())
    }

    fn run_inner(&mut self) -> Result<(), SimError> {
        debug!(
            "reset window: {} cycles; budget: {} cycles",
            self.reset_cycles, self.run_cycles
        );
        self.set_reset(true);
        for _ in 0..self.reset_cycles {
            self.idle_cycle()?;
        }
        self.set_reset(false);

        for _ in 0..self.run_cycles {
            self.cycle()?;
        }
        Ok(())
    }

    /// One reset-window cycle: clock toggling and trace capture only.
    fn idle_cycle(&mut self) -> Result<(), SimError> {
        self.set_clock(false);
        self.eval_and_capture()?;
        self.eval_and_capture()?;
        self.set_clock(true);
        self.eval_and_capture()?;
        self.eval_and_capture()?;
        Ok(())
    }

    /// One main-loop cycle with the engines between the low-phase
    /// evaluations and the probe before the rising edge.
    fn cycle(&mut self) -> Result<(), SimError> {
        self.set_clock(false);
        self.eval_and_capture()?;

        self.imem.service(&mut self.core, &mut self.store)?;
        self.dmem.service(&mut self.core, &mut self.store)?;

        self.eval_and_capture()?;

        if let Some(reporter) = self.probe.as_mut() {
            if let Some(sample) = self.core.probe() {
                reporter
                    .record(self.cycle, &sample)
                    .map_err(|source| SimError::Probe { source })?;
            }
        }

        self.set_clock(true);
        self.eval_and_capture()?;
        self.eval_and_capture()?;

        self.cycle += 1;
        Ok(())
    }

    fn set_clock(&mut self, high: bool) {
        self.clock = high;
        self.core.set_clock(high);
    }

    fn set_reset(&mut self, asserted: bool) {
        self.reset = asserted;
        self.core.set_reset(asserted);
    }

    fn eval_and_capture(&mut self) -> Result<(), SimError> {
        self.core.eval();
        if self.trace.is_some() {
            let state = self.snapshot();
            if let Some(trace) = self.trace.as_mut() {
                trace
                    .sample(self.time, &state)
                    .map_err(|source| SimError::Trace { source })?;
            }
        }
        self.time += 1;
        Ok(())
    }

    fn snapshot(&self) -> SignalState {
        SignalState {
            clock: self.clock,
            reset: self.reset,
            imem: self.port_state(&self.imem),
            dmem: self.port_state(&self.dmem),
        }
    }

    fn port_state(&self, engine: &PortEngine) -> PortState {
        let role = engine.role();
        let outputs = engine.outputs();
        PortState {
            read: self.core.read_request(role),
            read_ready: outputs.read_ready,
            response_valid: outputs.response_valid,
            response_ready: self.core.response_ready(role),
            response_addr: outputs.response_addr,
            response_data: outputs.response_data.clone(),
            write: if engine.caps().supports_write {
                self.core.write_request(role)
            } else {
                WriteRequest::default()
            },
            write_ready: outputs.write_ready,
        }
    }
}
