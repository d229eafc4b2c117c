//! Receipt upload controller.
//!
//! State machine for the creation flow: the payer name must be set before
//! a file can be selected, both must be present before submission, and at
//! most one submission runs at a time. Submission compresses the receipt
//! under the size-tiered envelope, sends it to the backend, and reports
//! the created expense's routing reference through the success callback.

use anyhow::Result;

use forkbill_core::models::{ExpenseResponse, SelectedFile};
use forkbill_core::AppError;
use forkbill_processing::{CompressionEnvelope, ReceiptCompressor, ReceiptValidator};

use crate::traits::ExpenseCreator;

/// Shown when the backend rejects the upload for size even after compression.
pub const TOO_LARGE_MESSAGE: &str = "Image is still too large after compression. \
Please try a smaller image or take a new photo with lower resolution.";

/// Fallback when a failure carries no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to process receipt. Please try again.";

/// Invoked exactly once per successful submission with the routing
/// reference (slug, or id when the backend returned no slug).
pub type ExpenseCreatedCallback = Box<dyn FnMut(&str) + Send>;

/// Controller for the receipt upload flow.
pub struct ReceiptUploadController<C: ExpenseCreator> {
    creator: C,
    validator: ReceiptValidator,
    on_expense_created: ExpenseCreatedCallback,
    uploading: bool,
    payer_name: String,
    error: Option<String>,
    selected_file: Option<SelectedFile>,
}

impl<C: ExpenseCreator> ReceiptUploadController<C> {
    pub fn new(
        creator: C,
        validator: ReceiptValidator,
        on_expense_created: ExpenseCreatedCallback,
    ) -> Self {
        Self {
            creator,
            validator,
            on_expense_created,
            uploading: false,
            payer_name: String::new(),
            error: None,
            selected_file: None,
        }
    }

    pub fn set_payer_name(&mut self, name: impl Into<String>) {
        self.payer_name = name.into();
    }

    pub fn payer_name(&self) -> &str {
        &self.payer_name
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// File selection opens up once the payer name trims non-empty and no
    /// upload is in flight. This is the single source of truth for the gate.
    pub fn can_select_file(&self) -> bool {
        !self.uploading && !self.payer_name.trim().is_empty()
    }

    /// Submission additionally requires a selected file.
    pub fn can_submit(&self) -> bool {
        self.can_select_file() && self.selected_file.is_some()
    }

    /// Select a receipt file. No-op while the gate is closed.
    ///
    /// A file that fails validation stores the validator's message as the
    /// error and leaves the selection unchanged; a valid file replaces the
    /// selection and clears any prior error. Re-selecting the same file is
    /// idempotent.
    pub fn select_file(&mut self, file: SelectedFile) {
        if !self.can_select_file() {
            return;
        }

        if let Err(err) = self
            .validator
            .validate_all(&file.filename, &file.content_type, file.size())
        {
            tracing::debug!(filename = %file.filename, error = %err, "Receipt rejected");
            self.error = Some(err.to_string());
            return;
        }

        self.selected_file = Some(file);
        self.error = None;
    }

    /// Submit the selected receipt: compress, then create the expense.
    ///
    /// No-op unless [`can_submit`](Self::can_submit) holds, which also
    /// blocks re-entry while an upload is in flight. On success the
    /// callback fires with the routing reference, which is also returned.
    /// On failure the classified message lands in the error slot and the
    /// controller stays usable.
    pub async fn submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        let file = self.selected_file.clone()?;
        let payer_name = self.payer_name.trim().to_string();

        self.uploading = true;
        self.error = None;

        let result = self.perform_upload(&file, &payer_name).await;
        // Cleared on every exit path, success or failure.
        self.uploading = false;

        match result {
            Ok(expense) => {
                let routing_ref = expense.routing_ref().to_string();
                tracing::info!(routing_ref = %routing_ref, "Expense created");
                (self.on_expense_created)(&routing_ref);
                Some(routing_ref)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to create expense");
                self.error = Some(classify_upload_error(&err));
                None
            }
        }
    }

    /// Compression and creation run sequentially, never concurrently.
    async fn perform_upload(
        &self,
        file: &SelectedFile,
        payer_name: &str,
    ) -> Result<ExpenseResponse> {
        let envelope = CompressionEnvelope::for_file_size(file.size());
        tracing::debug!(
            original_bytes = file.size(),
            max_width = envelope.max_width,
            quality = envelope.quality,
            max_size_kb = envelope.max_size_kb,
            "Compressing receipt"
        );

        let compressed = ReceiptCompressor::compress_async(file.data.clone(), envelope).await?;
        let compressed_file =
            SelectedFile::new(compressed, jpeg_filename(&file.filename), "image/jpeg");

        self.creator
            .create_expense(&compressed_file, payer_name)
            .await
    }
}

/// Rename to a .jpg extension; compression always re-encodes to JPEG.
fn jpeg_filename(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => format!("{}.jpg", stem),
        _ => format!("{}.jpg", filename),
    }
}

/// Map an upload failure to a user-facing message.
///
/// A structured 413 from the API client wins; otherwise the spec'd
/// substring checks ("413", case-insensitive "too large") catch foreign
/// errors, the error's own message passes through verbatim, and a blank
/// message falls back to the generic retry text.
fn classify_upload_error(err: &anyhow::Error) -> String {
    if let Some(app_err) = err.downcast_ref::<AppError>() {
        if app_err.is_payload_too_large() {
            return TOO_LARGE_MESSAGE.to_string();
        }
    }

    let message = err.to_string();
    if message.contains("413") || message.to_lowercase().contains("too large") {
        return TOO_LARGE_MESSAGE.to_string();
    }
    if message.trim().is_empty() {
        return GENERIC_FAILURE_MESSAGE.to_string();
    }
    message
}
