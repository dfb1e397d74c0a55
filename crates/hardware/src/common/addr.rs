//! Address alignment helpers.
//!
//! Block-granular ports round every address down to the containing block
//! before bounds checking and storage access. The mask is applied to read
//! and write paths identically.

/// Rounds `addr` down to the nearest multiple of `width`.
///
/// `width` must be a power of two (block sizes always are); for a 64-byte
/// line this clears the low 6 bits.
pub fn align_down(addr: u64, width: usize) -> u64 {
    debug_assert!(width.is_power_of_two(), "block width must be a power of two");
    addr & !(width as u64 - 1)
}

/// Returns whether `addr` is already a multiple of `width`.
pub fn is_aligned(addr: u64, width: usize) -> bool {
    align_down(addr, width) == addr
}
