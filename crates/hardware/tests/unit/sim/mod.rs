
/// Clock/reset sequencing and the top-level loop.
pub mod sequencer;

/// VCD trace file output.
pub mod trace;
