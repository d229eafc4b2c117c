//! Domain methods for the expense backend.

use crate::{api_prefix, ApiClient};
use anyhow::{Context, Result};
use forkbill_core::models::{ExpenseResponse, SelectedFile};

impl ApiClient {
    /// Create an expense from a (compressed) receipt image and payer name.
    ///
    /// The backend OCRs the receipt, builds the item list, and returns the
    /// created expense's id and routing slug.
    pub async fn create_expense_from_image(
        &self,
        file: &SelectedFile,
        payer_name: &str,
    ) -> Result<ExpenseResponse> {
        let part = reqwest::multipart::Part::bytes(file.data.to_vec())
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)
            .context("Invalid receipt content type")?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("payer_name", payer_name.to_string());

        tracing::debug!(
            filename = %file.filename,
            bytes = file.size(),
            payer = %payer_name,
            "Creating expense from receipt"
        );

        self.post_multipart(&format!("{}/expenses", api_prefix()), form)
            .await
    }

    /// Fetch an expense by routing slug or id.
    pub async fn get_expense(&self, reference: &str) -> Result<ExpenseResponse> {
        self.get(&format!("{}/expenses/{}", api_prefix(), reference), &[])
            .await
    }
}
