//! HTTP client for the OCR and structuring services.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::staging::ImagePayload;

use super::models::{OcrResponse, StructuredReceipt};

/// Stage of the extraction pipeline an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStage {
    Ocr,
    Structuring,
}

impl ExtractionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ocr => "ocr",
            Self::Structuring => "structuring",
        }
    }
}

/// Errors from the extraction services.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("OCR service error: {0}")]
    OcrService(String),

    #[error("OCR recognized no text")]
    EmptyText,

    #[error("structuring service error: {0}")]
    StructuringService(String),

    #[error("structuring returned no usable payload")]
    EmptyStructured,

    /// Credential rejected. Surfaced to the session layer, never
    /// reclassified by the pipeline.
    #[error("extraction request unauthorized")]
    Unauthorized,
}

impl ExtractionError {
    /// Which stage of the pipeline produced this error.
    ///
    /// `Unauthorized` is attributed to the stage that observed it only
    /// indirectly; callers that need the distinction match on the variant.
    pub fn stage(&self) -> ExtractionStage {
        match self {
            Self::OcrService(_) | Self::EmptyText => ExtractionStage::Ocr,
            Self::StructuringService(_) | Self::EmptyStructured | Self::Unauthorized => {
                ExtractionStage::Structuring
            }
        }
    }
}

/// The two sequential extraction operations.
///
/// Both are side-effect-free with respect to local state; all session state
/// transitions happen in the caller.
#[async_trait]
pub trait ExtractionApi: Send + Sync {
    /// Send staged images to the OCR service and return the recognized text.
    ///
    /// Empty text is a failure, not a receipt with no text.
    async fn recognize_text(&self, images: &[ImagePayload]) -> Result<String, ExtractionError>;

    /// Send recognized text to the structuring service.
    async fn extract_structured(&self, text: &str) -> Result<StructuredReceipt, ExtractionError>;
}

/// HTTP implementation of [`ExtractionApi`].
///
/// Stateless facade: configuration is injected at construction, nothing is
/// read from process-wide state.
#[derive(Clone)]
pub struct HttpExtractionClient {
    client: Client,
    base_url: String,
    bearer_token: String,
}

impl HttpExtractionClient {
    /// Create a new extraction client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the extraction backend (e.g., "http://localhost:8000")
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

    fn image_part(image: &ImagePayload) -> Result<Part, reqwest::Error> {
        Part::bytes(image.bytes.as_ref().clone())
            .file_name(image.filename.clone())
            .mime_str(&image.mime)
    }
}

#[async_trait]
impl ExtractionApi for HttpExtractionClient {
    async fn recognize_text(&self, images: &[ImagePayload]) -> Result<String, ExtractionError> {
        let url = format!("{}/api/ocr/", self.base_url);

        let mut form = Form::new();
        for image in images {
            let part =
                Self::image_part(image).map_err(|e| ExtractionError::OcrService(e.to_string()))?;
            form = form.part("images", part);
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.bearer_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ExtractionError::OcrService(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ExtractionError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(ExtractionError::OcrService(format!(
                "OCR request failed with status: {}",
                response.status()
            )));
        }

        let body: OcrResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::OcrService(e.to_string()))?;

        if body.text.trim().is_empty() {
            return Err(ExtractionError::EmptyText);
        }
        Ok(body.text)
    }

    async fn extract_structured(&self, text: &str) -> Result<StructuredReceipt, ExtractionError> {
        let url = format!("{}/api/extract/", self.base_url);

        let form = Form::new().text("raw_text", text.to_string());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.bearer_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ExtractionError::StructuringService(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ExtractionError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(ExtractionError::StructuringService(format!(
                "structuring request failed with status: {}",
                response.status()
            )));
        }

        let structured: StructuredReceipt = response
            .json()
            .await
            .map_err(|e| ExtractionError::StructuringService(e.to_string()))?;

        // An all-defaults payload means the service had nothing for us.
        if structured.store_name.is_empty()
            && structured.total_amount.is_empty()
            && structured.products.is_empty()
        {
            return Err(ExtractionError::EmptyStructured);
        }
        Ok(structured)
    }
}
