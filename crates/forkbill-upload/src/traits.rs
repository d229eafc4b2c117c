//! Seams for the upload controller.

use async_trait::async_trait;
use forkbill_core::models::{ExpenseResponse, SelectedFile};

/// Creates an expense from a compressed receipt image.
///
/// Implemented by the API client; mocked in controller tests.
#[async_trait]
pub trait ExpenseCreator: Send + Sync {
    async fn create_expense(
        &self,
        file: &SelectedFile,
        payer_name: &str,
    ) -> anyhow::Result<ExpenseResponse>;
}

#[async_trait]
impl ExpenseCreator for forkbill_api_client::ApiClient {
    async fn create_expense(
        &self,
        file: &SelectedFile,
        payer_name: &str,
    ) -> anyhow::Result<ExpenseResponse> {
        self.create_expense_from_image(file, payer_name).await
    }
}
