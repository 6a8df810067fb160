//! Session model for the ingestion pipeline.

use serde::{Deserialize, Serialize};

use crate::draft::Draft;

/// Phase of one ingestion session.
///
/// `Empty → Staged → Extracting → Ready → Submitting → Committed`, with
/// `Failed` reachable from any in-flight phase and always recoverable by
/// starting over with a new selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    /// No images selected yet.
    Empty,
    /// Images staged, extraction not started.
    Staged,
    /// OCR + structuring calls in flight.
    Extracting,
    /// Draft exists and is editable.
    Ready,
    /// Submission call in flight.
    Submitting,
    /// Receipt persisted; session over.
    Committed,
    /// Last attempted stage errored; retry by re-selecting images.
    Failed,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "EMPTY",
            Self::Staged => "STAGED",
            Self::Extracting => "EXTRACTING",
            Self::Ready => "READY",
            Self::Submitting => "SUBMITTING",
            Self::Committed => "COMMITTED",
            Self::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EMPTY" => Some(Self::Empty),
            "STAGED" => Some(Self::Staged),
            "EXTRACTING" => Some(Self::Extracting),
            "READY" => Some(Self::Ready),
            "SUBMITTING" => Some(Self::Submitting),
            "COMMITTED" => Some(Self::Committed),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }

    /// True once the session has persisted its receipt.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed)
    }

    /// True while draft edits are reachable.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Render-able view of the current session.
///
/// Always valid, whatever the phase: the draft is present exactly when the
/// session is editable or submitting.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub session_id: Option<String>,
    pub staged_images: usize,
    pub previews: Vec<String>,
    pub draft: Option<Draft>,
    pub error: Option<String>,
}
