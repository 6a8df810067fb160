//! HTTP client for the receipt persistence call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::draft::Draft;
use crate::staging::ImagePayload;

use super::models::Receipt;

/// Errors from the persistence store.
///
/// The controller treats every variant except `Unauthorized` uniformly; the
/// split exists for logging and for the session layer.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("receipt store unreachable: {0}")]
    Transport(String),

    #[error("receipt store rejected the submission (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("could not decode receipt store response: {0}")]
    Parse(String),

    /// Credential rejected. Surfaced to the session layer, never
    /// reclassified by the pipeline.
    #[error("submission request unauthorized")]
    Unauthorized,
}

/// The "create receipt" persistence operation.
#[async_trait]
pub trait SubmissionApi: Send + Sync {
    /// Persist the draft with its images as one durable receipt.
    async fn submit(
        &self,
        draft: &Draft,
        images: &[ImagePayload],
    ) -> Result<Receipt, SubmissionError>;
}

/// HTTP implementation of [`SubmissionApi`].
#[derive(Clone)]
pub struct HttpSubmissionClient {
    client: Client,
    base_url: String,
    bearer_token: String,
}

impl HttpSubmissionClient {
    /// Create a new submission client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the receipt store (e.g., "http://localhost:8000")
    /// * `bearer_token` - Credential attached to every request
    /// * `timeout_secs` - Request timeout in seconds
    pub fn new(
        base_url: String,
        bearer_token: String,
        timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            bearer_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_form(draft: &Draft, images: &[ImagePayload]) -> Result<Form, SubmissionError> {
        let products = serde_json::to_string(&draft.line_items)
            .map_err(|e| SubmissionError::Parse(e.to_string()))?;

        let mut form = Form::new()
            .text("store_name", draft.store_name.clone())
            .text("total_amount", draft.total_amount.clone())
            .text("date", draft.date.clone())
            .text("category", draft.category.as_str())
            .text("warranty_months", draft.warranty_months.clone())
            .text("products", products);

        for image in images {
            let part = Part::bytes(image.bytes.as_ref().clone())
                .file_name(image.filename.clone())
                .mime_str(&image.mime)
                .map_err(|e| SubmissionError::Transport(e.to_string()))?;
            form = form.part("images", part);
        }

        Ok(form)
    }
}

#[async_trait]
impl SubmissionApi for HttpSubmissionClient {
    async fn submit(
        &self,
        draft: &Draft,
        images: &[ImagePayload],
    ) -> Result<Receipt, SubmissionError> {
        let url = format!("{}/api/receipts/", self.base_url);
        let form = Self::build_form(draft, images)?;

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.bearer_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(SubmissionError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| SubmissionError::Parse(e.to_string()))
    }
}
