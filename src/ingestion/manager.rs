//! Ingestion manager - orchestrates one receipt ingestion session.
//!
//! Session workflow:
//! 1. User selects one or more images → staged with preview handles
//! 2. EXTRACTING: OCR call, then structuring call, in sequence
//! 3. READY: draft built from the structured payload, edited field by field
//! 4. SUBMITTING: draft + images persisted as one durable receipt
//! 5. COMMITTED, or FAILED with a classified error; retry is user-initiated
//!
//! The manager owns every state transition. The clients are stateless; the
//! staging area owns the preview handles; draft edits are pure functions.
//! Sessions are versioned with a monotonically increasing epoch, and a stage
//! outcome carrying a stale epoch is discarded instead of overwriting a newer
//! session.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::draft::{reconciler, Draft, DraftField, LineItemField};
use crate::extraction::{ExtractionApi, ExtractionError, ExtractionResult};
use crate::staging::{ImageFile, ImageStagingArea, PreviewRegistry, StagingError};
use crate::submission::{Receipt, SubmissionApi, SubmissionError};

use super::models::{SessionPhase, SessionSnapshot};

/// Errors surfaced at the controller boundary.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("staging error: {0}")]
    Staging(#[from] StagingError),

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("submission failed: {0}")]
    Submission(#[from] SubmissionError),

    #[error("invalid session state: expected {expected}, got {actual}")]
    InvalidState { expected: String, actual: String },

    #[error("submission precondition violated: {0}")]
    Precondition(&'static str),
}

/// Configuration for the ingestion manager.
#[derive(Debug, Clone)]
pub struct IngestionSettings {
    /// Maximum size of a single staged image in bytes.
    pub max_image_bytes: u64,
    /// Maximum number of images per session.
    pub max_images_per_session: usize,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            max_image_bytes: 10 * 1024 * 1024, // 10 MB
            max_images_per_session: 5,
        }
    }
}

/// Orchestrates one receipt ingestion session at a time.
pub struct IngestionManager {
    extraction: Arc<dyn ExtractionApi>,
    submission: Arc<dyn SubmissionApi>,
    staging: ImageStagingArea,
    phase: SessionPhase,
    /// Session version; bumped whenever a session starts or ends. Stage
    /// outcomes carrying an older epoch are discarded.
    epoch: u64,
    session_id: Option<String>,
    draft: Option<Draft>,
    last_error: Option<String>,
}

impl IngestionManager {
    /// Create a new manager with explicit collaborators.
    pub fn new(
        extraction: Arc<dyn ExtractionApi>,
        submission: Arc<dyn SubmissionApi>,
        settings: IngestionSettings,
    ) -> Self {
        Self {
            extraction,
            submission,
            staging: ImageStagingArea::new(
                settings.max_image_bytes,
                settings.max_images_per_session,
            ),
            phase: SessionPhase::Empty,
            epoch: 0,
            session_id: None,
            draft: None,
            last_error: None,
        }
    }

    // =========================================================================
    // Session queries
    // =========================================================================

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn staged_count(&self) -> usize {
        self.staging.len()
    }

    /// Preview accounting for the whole manager lifetime.
    pub fn preview_registry(&self) -> &Arc<PreviewRegistry> {
        self.staging.preview_registry()
    }

    /// Render-able view of the current session, valid in every phase.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            session_id: self.session_id.clone(),
            staged_images: self.staging.len(),
            previews: self
                .staging
                .images()
                .iter()
                .map(|s| s.preview().uri())
                .collect(),
            draft: self.draft.clone(),
            error: self.last_error.clone(),
        }
    }

    // =========================================================================
    // Staging + extraction
    // =========================================================================

    /// Start a session from one selection of image files.
    ///
    /// Supersedes whatever the manager was doing: an in-flight extraction for
    /// an older selection becomes stale, a previous draft and its previews
    /// are discarded before re-staging. Staging runs the two extraction
    /// stages immediately; on success the session lands in `Ready` with an
    /// editable draft, on failure in `Failed`.
    ///
    /// An invalid selection is rejected before anything is discarded and
    /// leaves the session untouched.
    pub async fn select_images(&mut self, files: Vec<ImageFile>) -> Result<(), PipelineError> {
        self.staging.validate_selection(&files)?;

        // The old session (if any) ends here.
        self.epoch += 1;
        let token = self.epoch;
        self.staging.clear();
        self.draft = None;
        self.last_error = None;

        let session_id = uuid::Uuid::new_v4().to_string();
        self.session_id = Some(session_id.clone());
        self.staging.add_images(files)?;
        self.phase = SessionPhase::Staged;
        info!(
            "Session {} staged {} image(s)",
            session_id,
            self.staging.len()
        );

        self.phase = SessionPhase::Extracting;
        let outcome = self.run_extraction().await;
        self.apply_extraction_outcome(token, outcome)
    }

    /// Run OCR then structuring over the staged images.
    ///
    /// The structuring call never starts before the OCR call has resolved.
    async fn run_extraction(&self) -> Result<Draft, ExtractionError> {
        let payloads = self.staging.payloads();
        let raw_text = self.extraction.recognize_text(&payloads).await?;
        debug!("OCR recognized {} characters", raw_text.len());

        let structured = self.extraction.extract_structured(&raw_text).await?;
        let result = ExtractionResult {
            raw_text,
            structured,
        };

        // The extraction result is consumed here; only the draft survives.
        Ok(reconciler::from_extraction(&result.structured))
    }

    /// Apply an extraction outcome if it still belongs to the current
    /// session; a stale token means the session was superseded and the
    /// outcome is dropped on the floor.
    fn apply_extraction_outcome(
        &mut self,
        token: u64,
        outcome: Result<Draft, ExtractionError>,
    ) -> Result<(), PipelineError> {
        if token != self.epoch {
            debug!(
                "Discarding extraction outcome for superseded session (epoch {} != {})",
                token, self.epoch
            );
            return Ok(());
        }

        match outcome {
            Ok(draft) => {
                self.draft = Some(draft);
                self.phase = SessionPhase::Ready;
                info!(
                    "Session {} extracted, draft ready",
                    self.session_id.as_deref().unwrap_or("?")
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Session {} extraction failed at {} stage: {}",
                    self.session_id.as_deref().unwrap_or("?"),
                    e.stage().as_str(),
                    e
                );
                self.last_error = Some(e.to_string());
                self.phase = SessionPhase::Failed;
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // Draft edits (synchronous, Ready only)
    // =========================================================================

    /// Update one top-level draft field.
    pub fn update_field(&mut self, field: DraftField, value: &str) -> Result<(), PipelineError> {
        let draft = self.take_editable_draft()?;
        self.draft = Some(reconciler::set_field(draft, field, value));
        Ok(())
    }

    /// Update one field of the line item at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds, like the reconciler it delegates
    /// to.
    pub fn update_line_item(
        &mut self,
        index: usize,
        field: LineItemField,
        value: &str,
    ) -> Result<(), PipelineError> {
        let draft = self.take_editable_draft()?;
        self.draft = Some(reconciler::set_line_item(draft, index, field, value));
        Ok(())
    }

    /// Append an empty line item to the draft.
    pub fn add_line_item(&mut self) -> Result<(), PipelineError> {
        let draft = self.take_editable_draft()?;
        self.draft = Some(reconciler::add_line_item(draft));
        Ok(())
    }

    /// Remove the line item at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn remove_line_item(&mut self, index: usize) -> Result<(), PipelineError> {
        let draft = self.take_editable_draft()?;
        self.draft = Some(reconciler::remove_line_item(draft, index));
        Ok(())
    }

    fn take_editable_draft(&mut self) -> Result<Draft, PipelineError> {
        if !self.phase.is_editable() {
            return Err(PipelineError::InvalidState {
                expected: SessionPhase::Ready.as_str().to_string(),
                actual: self.phase.as_str().to_string(),
            });
        }
        // Ready implies a draft; a missing one is an invariant breach we
        // report rather than unwrap.
        self.draft
            .take()
            .ok_or(PipelineError::Precondition("no draft for editable session"))
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Submit the current draft with its staged images.
    ///
    /// The session ends whatever the outcome: previews are released and the
    /// draft is discarded. On success the persisted receipt is returned and
    /// the session lands in `Committed`; on failure it lands in `Failed` and
    /// retry means re-selecting images.
    pub async fn submit(&mut self) -> Result<Receipt, PipelineError> {
        if self.phase != SessionPhase::Ready {
            return Err(PipelineError::InvalidState {
                expected: SessionPhase::Ready.as_str().to_string(),
                actual: self.phase.as_str().to_string(),
            });
        }
        if self.staging.is_empty() {
            return Err(PipelineError::Precondition("no staged images"));
        }
        let draft = self
            .draft
            .clone()
            .ok_or(PipelineError::Precondition("no draft"))?;

        self.phase = SessionPhase::Submitting;
        let payloads = self.staging.payloads();
        let result = self.submission.submit(&draft, &payloads).await;

        // The session ends on success and on failure alike.
        self.epoch += 1;
        self.staging.clear();
        self.draft = None;

        match result {
            Ok(receipt) => {
                info!(
                    "Session {} committed as receipt {}",
                    self.session_id.as_deref().unwrap_or("?"),
                    receipt.id
                );
                self.phase = SessionPhase::Committed;
                Ok(receipt)
            }
            Err(e) => {
                warn!(
                    "Session {} submission failed: {}",
                    self.session_id.as_deref().unwrap_or("?"),
                    e
                );
                self.last_error = Some(e.to_string());
                self.phase = SessionPhase::Failed;
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // Session teardown
    // =========================================================================

    /// Close the current session and reset to `Empty`.
    ///
    /// Invoked on every exit path - after a commit, on abandonment, or when
    /// the hosting surface goes away. Releases every preview handle and
    /// discards the draft; safe to call in any phase, any number of times.
    pub fn close_session(&mut self) {
        self.epoch += 1;
        self.staging.clear();
        self.draft = None;
        self.last_error = None;
        self.session_id = None;
        self.phase = SessionPhase::Empty;
    }
}
