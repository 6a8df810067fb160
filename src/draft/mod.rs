//! The editable draft built from extraction output.
//!
//! A draft exists if and only if extraction has completed successfully for
//! the current session. Edits are pure operations; the controller owns the
//! draft slot and decides when edits are reachable.

mod models;
pub mod reconciler;

pub use models::{Category, Draft, DraftField, DraftLineItem, LineItemField};
