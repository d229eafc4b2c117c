//! Domain models shared across forkbill crates.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Expense record returned by the backend after a receipt is processed.
///
/// The backend owns the item list, pricing, and per-person claims; the
/// client only cares about identity and routing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExpenseResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ExpenseResponse {
    /// Reference used for routing to the expense's page.
    ///
    /// Prefers the human-readable slug when the backend provided one,
    /// falling back to the raw id.
    pub fn routing_ref(&self) -> &str {
        match self.slug.as_deref() {
            Some(slug) if !slug.is_empty() => slug,
            _ => &self.id,
        }
    }
}

/// A user-chosen receipt image, held only until submission or replacement.
#[derive(Clone, Debug)]
pub struct SelectedFile {
    pub data: Bytes,
    pub filename: String,
    pub content_type: String,
}

impl SelectedFile {
    pub fn new(data: impl Into<Bytes>, filename: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }

    /// Byte size of the payload. The compression tiers are chosen from this.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_ref_prefers_slug() {
        let expense = ExpenseResponse {
            id: "42".to_string(),
            slug: Some("abc123".to_string()),
            created_at: None,
        };
        assert_eq!(expense.routing_ref(), "abc123");
    }

    #[test]
    fn routing_ref_falls_back_to_id() {
        let expense = ExpenseResponse {
            id: "42".to_string(),
            slug: None,
            created_at: None,
        };
        assert_eq!(expense.routing_ref(), "42");

        let expense = ExpenseResponse {
            id: "42".to_string(),
            slug: Some(String::new()),
            created_at: None,
        };
        assert_eq!(expense.routing_ref(), "42");
    }

    #[test]
    fn expense_response_deserializes_without_slug() {
        let expense: ExpenseResponse = serde_json::from_str(r#"{"id":"42"}"#).unwrap();
        assert_eq!(expense.id, "42");
        assert!(expense.slug.is_none());
    }

    #[test]
    fn selected_file_size() {
        let file = SelectedFile::new(vec![0u8; 1024], "receipt.jpg", "image/jpeg");
        assert_eq!(file.size(), 1024);
        assert_eq!(file.filename, "receipt.jpg");
    }
}
