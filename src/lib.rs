//! Receipt Ingestion Library
//!
//! Turns photographed paper receipts into structured, editable, submittable
//! records by orchestrating an external OCR service, an external
//! text-to-structured-data service and a receipt persistence store.

pub mod config;
pub mod draft;
pub mod extraction;
pub mod ingestion;
pub mod staging;
pub mod submission;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use draft::{Category, Draft, DraftField, DraftLineItem, LineItemField};
pub use extraction::{ExtractionApi, ExtractionError, HttpExtractionClient};
pub use ingestion::{IngestionManager, IngestionSettings, PipelineError, SessionPhase};
pub use staging::{ImageFile, ImageStagingArea, StagingError};
pub use submission::{HttpSubmissionClient, Receipt, SubmissionApi, SubmissionError};
