//! Flat backing store.
//!
//! A contiguous byte array of fixed capacity standing in for physical
//! memory. The capacity is a configuration constant, never derived from the
//! loaded image, and the store is never resized. Only the data-port engine
//! writes it after the initial image load.

use crate::common::error::OutOfRange;

/// Fixed-capacity byte memory shared by both port engines.
///
/// The API is strict: any access whose end exceeds the capacity returns
/// [`OutOfRange`]. The warn-and-zero versus hard-fail policy choice lives in
/// the port engine, the store's only caller.
#[derive(Debug, Clone)]
pub struct BackingStore {
    bytes: Vec<u8>,
}

impl BackingStore {
    /// Creates a zero-filled store of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
        }
    }

    /// Returns the fixed capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Fills the store from an image, truncating to capacity.
    ///
    /// A short image leaves the remainder zero-filled; a long image is cut
    /// at the capacity boundary. Neither case is an error.
    pub fn load(&mut self, image: &[u8]) {
        let n = image.len().min(self.bytes.len());
        self.bytes[..n].copy_from_slice(&image[..n]);
    }

    /// Returns `width` bytes starting at `addr`.
    ///
    /// # Errors
    ///
    /// [`OutOfRange`] when `addr + width` exceeds the capacity. The exact
    /// boundary `addr + width == capacity` is valid.
    pub fn read(&self, addr: u64, width: usize) -> Result<&[u8], OutOfRange> {
        let start = self.check(addr, width)?;
        Ok(&self.bytes[start..start + width])
    }

    /// Overwrites `data.len()` bytes starting at `addr`.
    ///
    /// # Errors
    ///
    /// [`OutOfRange`] when `addr + data.len()` exceeds the capacity; the
    /// store is left untouched.
    pub fn write(&mut self, addr: u64, data: &[u8]) -> Result<(), OutOfRange> {
        let start = self.check(addr, data.len())?;
        self.bytes[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn check(&self, addr: u64, width: usize) -> Result<usize, OutOfRange> {
        let capacity = self.bytes.len();
        let in_range = addr
            .checked_add(width as u64)
            .is_some_and(|end| end <= capacity as u64);
        if in_range {
            Ok(addr as usize)
        } else {
            Err(OutOfRange {
                addr,
                width,
                capacity,
            })
        }
    }
}
