//! Common test infrastructure
//!
//! Provides the in-process mock backend and shared fixtures for the
//! end-to-end tests. Tests should only import from this module, not from
//! internal submodules.

#![allow(dead_code)]

mod constants;
mod server;

// Public API - this is what tests import
pub use constants::*;
pub use server::{BackendState, CapturedSubmission, MockBackend};

use receipt_ingestion::staging::ImageFile;

/// Smallest payload the staging area recognizes as a PNG.
pub fn png_file(name: &str) -> ImageFile {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 64]);
    ImageFile::new(name, bytes)
}
