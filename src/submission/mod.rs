//! Receipt persistence: one multipart call that turns a draft and its staged
//! images into a durable record.

mod client;
mod models;

pub use client::{HttpSubmissionClient, SubmissionApi, SubmissionError};
pub use models::{Receipt, ReceiptImage, ReceiptProduct};
