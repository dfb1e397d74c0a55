//! Memory image loading.
//!
//! The simulator consumes one flat binary image, loaded in full before any
//! cycle runs. The image is truncated to the store capacity and
//! zero-extended when shorter; only an unreadable file is an error.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::common::error::SimError;

/// Reads a flat binary image, sized exactly to `capacity`.
///
/// A short image is zero-extended; a long one is truncated at the capacity
/// boundary.
///
/// # Errors
///
/// [`SimError::MalformedImage`] when the file cannot be opened or read.
pub fn load_image(path: &Path, capacity: usize) -> Result<Vec<u8>, SimError> {
    let mut image = fs::read(path).map_err(|source| SimError::MalformedImage {
        path: path.to_path_buf(),
        source,
    })?;

    if image.len() > capacity {
        debug!(
            "image {} exceeds capacity {capacity:#x}; truncating {} bytes",
            path.display(),
            image.len() - capacity
        );
    }
    info!(
        "loaded {} bytes from {} into a {capacity:#x}-byte store",
        image.len().min(capacity),
        path.display()
    );

    image.truncate(capacity);
    image.resize(capacity, 0);
    Ok(image)
}
