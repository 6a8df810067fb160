//! The ingestion session controller.
//!
//! Sequences staging → extraction → reconciliation → submission for one
//! receipt at a time and owns the session's state transitions, failure
//! classification and resource discipline.

mod manager;
mod models;

pub use manager::{IngestionManager, IngestionSettings, PipelineError};
pub use models::{SessionPhase, SessionSnapshot};
