//! Memory-bus transaction simulator CLI.
//!
//! Runs the testbench against the built-in traffic core: loads a flat
//! binary memory image, executes the reset window plus the configured cycle
//! budget, and writes a VCD waveform trace. Exit code 0 on normal
//! completion, 1 on a fatal protocol violation or an unreadable image.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use membus_core::config::{Config, RangePolicy};
use membus_core::mem::store::BackingStore;
use membus_core::sim::loader;
use membus_core::sim::sequencer::Simulation;
use membus_core::sim::traffic::TrafficCore;

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "Cycle-accurate memory-bus transaction simulator",
    long_about = "Simulates the instruction and data memory behind a ready/valid core.\n\nThe image is loaded at address zero, truncated or zero-extended to the\nstore capacity. A waveform trace (dump.vcd by default) captures every\nsignal transition.\n\nExamples:\n  sim firmware.bin\n  sim --permissive --probe firmware.bin\n  sim --cycles 250 --trace run.vcd firmware.bin"
)]
struct Cli {
    /// Flat binary memory image, loaded at address zero.
    image: PathBuf,

    /// Main-loop cycle budget (overrides the config).
    #[arg(long)]
    cycles: Option<u64>,

    /// Log-and-zero out-of-range accesses instead of aborting.
    #[arg(long)]
    permissive: bool,

    /// Print per-cycle pipeline probe columns to stdout.
    #[arg(long)]
    probe: bool,

    /// Waveform trace output path.
    #[arg(long, value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Disable waveform tracing.
    #[arg(long, conflicts_with = "trace")]
    no_trace: bool,

    /// JSON configuration file; omitted fields keep built-in defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli);

    let image = loader::load_image(&cli.image, config.memory.capacity)
        .unwrap_or_else(|e| fatal(&e.to_string()));

    let mut store = BackingStore::new(config.memory.capacity);
    store.load(&image);

    let core = TrafficCore::new(&config);
    let mut sim =
        Simulation::new(core, store, &config).unwrap_or_else(|e| fatal(&e.to_string()));

    match sim.run() {
        Ok(summary) => {
            println!(
                "[Sim] Completed {} cycles | imem: {} reads, {} responses | dmem: {} writes",
                summary.cycles,
                summary.imem.reads_accepted,
                summary.imem.responses_delivered,
                summary.dmem.writes_committed,
            );
        }
        Err(e) => fatal(&e.to_string()),
    }
}

fn build_config(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
                fatal(&format!("config '{}': {e}", path.display()))
            });
            Config::from_json(&text).unwrap_or_else(|e| {
                fatal(&format!("config '{}': {e}", path.display()))
            })
        }
        None => Config::default(),
    };

    if let Some(cycles) = cli.cycles {
        config.sequencer.run_cycles = cycles;
    }
    if cli.permissive {
        config.memory.policy = RangePolicy::Permissive;
    }
    if cli.probe {
        config.sequencer.probe = true;
    }
    if let Some(path) = &cli.trace {
        config.sequencer.trace_path = Some(path.display().to_string());
    }
    if cli.no_trace {
        config.sequencer.trace_path = None;
    }
    config
}

fn fatal(msg: &str) -> ! {
    eprintln!("\n[!] FATAL: {msg}");
    process::exit(1);
}
