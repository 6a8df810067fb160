//! Two-stage receipt extraction: OCR, then text-to-structured-data.
//!
//! The second stage cannot run without the first stage's output; sequencing
//! lives in the ingestion controller, these clients only speak HTTP.

mod client;
mod models;

pub use client::{ExtractionApi, ExtractionError, ExtractionStage, HttpExtractionClient};
pub use models::{ExtractionResult, OcrResponse, StructuredProduct, StructuredReceipt};

pub(crate) use models::decimal_string;
