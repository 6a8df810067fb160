//! Staging area for the images of one receipt.

use std::sync::Arc;

use thiserror::Error;

use super::preview::{PreviewHandle, PreviewRegistry};

/// Errors that can occur while staging images.
///
/// Staging errors are locally recoverable: the selection is rejected as a
/// whole and the session keeps whatever was staged before.
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("empty selection, pick at least one image")]
    EmptySelection,

    #[error("not a recognizable image: {0}")]
    NotAnImage(String),

    #[error("image too large: {0} bytes (max: {1})")]
    ImageTooLarge(u64, u64),

    #[error("too many images: {0} (max: {1})")]
    TooManyImages(usize, usize),
}

/// One file picked by the user, before staging.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// The submittable payload of a staged image.
///
/// Bytes are shared with the image's preview handle, so staging never copies
/// the file.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub filename: String,
    pub mime: String,
    pub bytes: Arc<Vec<u8>>,
}

/// A staged image: the original payload plus its live preview handle.
///
/// The preview handle is owned here and nowhere else; it is released when the
/// staged image is dropped (replaced, removed, or the session ends).
#[derive(Debug)]
pub struct StagedImage {
    payload: ImagePayload,
    preview: PreviewHandle,
}

impl StagedImage {
    pub fn payload(&self) -> &ImagePayload {
        &self.payload
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

/// Holds the set of images selected for one receipt and their preview
/// handles. Owns no network logic.
pub struct ImageStagingArea {
    previews: Arc<PreviewRegistry>,
    staged: Vec<StagedImage>,
    max_image_bytes: u64,
    max_images: usize,
}

impl ImageStagingArea {
    pub fn new(max_image_bytes: u64, max_images: usize) -> Self {
        Self {
            previews: PreviewRegistry::new(),
            staged: Vec::new(),
            max_image_bytes,
            max_images,
        }
    }

    /// Validate one selection without staging anything.
    ///
    /// Checks the selection as it would land in an empty staging area; the
    /// controller uses this to reject a selection before it discards the
    /// previous session. Returns the sniffed mime type per file.
    pub fn validate_selection(&self, files: &[ImageFile]) -> Result<Vec<String>, StagingError> {
        if files.is_empty() {
            return Err(StagingError::EmptySelection);
        }
        if files.len() > self.max_images {
            return Err(StagingError::TooManyImages(files.len(), self.max_images));
        }

        let mut sniffed = Vec::with_capacity(files.len());
        for file in files {
            let size = file.bytes.len() as u64;
            if size > self.max_image_bytes {
                return Err(StagingError::ImageTooLarge(size, self.max_image_bytes));
            }
            // Sniff the content, never trust the filename.
            let kind = infer::get(&file.bytes)
                .filter(|t| t.matcher_type() == infer::MatcherType::Image)
                .ok_or_else(|| StagingError::NotAnImage(file.filename.clone()))?;
            sniffed.push(kind.mime_type().to_string());
        }
        Ok(sniffed)
    }

    /// Stage the files of one selection, allocating a preview handle per
    /// image.
    ///
    /// The selection is validated as a whole before anything is staged: a
    /// rejected selection leaves the staged set untouched and releases
    /// nothing.
    pub fn add_images(&mut self, files: Vec<ImageFile>) -> Result<&[StagedImage], StagingError> {
        if self.staged.len() + files.len() > self.max_images {
            return Err(StagingError::TooManyImages(
                self.staged.len() + files.len(),
                self.max_images,
            ));
        }
        let sniffed = self.validate_selection(&files)?;

        let first_new = self.staged.len();
        for (file, mime) in files.into_iter().zip(sniffed) {
            let bytes = Arc::new(file.bytes);
            let preview = self.previews.acquire(Arc::clone(&bytes));
            self.staged.push(StagedImage {
                payload: ImagePayload {
                    filename: file.filename,
                    mime,
                    bytes,
                },
                preview,
            });
        }

        Ok(&self.staged[first_new..])
    }

    /// Release every preview handle and empty the staged set.
    pub fn clear(&mut self) {
        self.staged.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn images(&self) -> &[StagedImage] {
        &self.staged
    }

    /// Payloads of all staged images, in staging order.
    pub fn payloads(&self) -> Vec<ImagePayload> {
        self.staged.iter().map(|s| s.payload.clone()).collect()
    }

    /// The registry backing this area's preview handles.
    pub fn preview_registry(&self) -> &Arc<PreviewRegistry> {
        &self.previews
    }
}

impl Drop for ImageStagingArea {
    fn drop(&mut self) {
        self.clear();
    }
}
