//! Staging of receipt images before extraction and submission.
//!
//! The staging area holds the images selected for one receipt together with
//! their transient preview handles. Preview handles are scoped guards:
//! acquired when an image is staged, released when it is dropped, with
//! acquire/release accounting for leak checks.

mod area;
mod preview;

pub use area::{ImageFile, ImagePayload, ImageStagingArea, StagedImage, StagingError};
pub use preview::{PreviewHandle, PreviewRegistry};
