//! Domain methods for the parsing API.
//!
//! Form fields are named in camelCase at the call site and converted to the
//! backend's snake_case on the way out (`imgFile` becomes `img_file`).

use async_trait::async_trait;
use grocer_core::case::to_snake_case;
use grocer_core::{AppError, GroceryReceipt, ReceiptParser, SelectedFile};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::ApiClient;

/// Receipt parsing endpoint, relative to the base URL.
pub const GROCERY_RECEIPT_PATH: &str = "/grocery_receipt";
/// Health check endpoint, relative to the base URL.
pub const STATUS_PATH: &str = "/status";

/// Health check response. Matches GET /status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Value of one multipart field.
#[derive(Debug, Clone)]
pub enum FormValue<'a> {
    Text(String),
    File(&'a SelectedFile),
}

/// Build a multipart form, converting keys to snake_case and skipping absent values.
pub fn build_form<'a, I>(fields: I) -> Result<Form, AppError>
where
    I: IntoIterator<Item = (&'a str, Option<FormValue<'a>>)>,
{
    let mut form = Form::new();
    for (key, value) in fields {
        let Some(value) = value else {
            continue;
        };
        let name = to_snake_case(key);
        form = match value {
            FormValue::Text(text) => form.text(name, text),
            FormValue::File(file) => form.part(name, file_part(file)?),
        };
    }
    Ok(form)
}

fn file_part(file: &SelectedFile) -> Result<Part, AppError> {
    Part::bytes(file.data().to_vec())
        .file_name(file.name().to_string())
        .mime_str(file.content_type())
        .map_err(|e| {
            AppError::InvalidInput(format!(
                "Invalid content type {}: {}",
                file.content_type(),
                e
            ))
        })
}

impl ApiClient {
    /// Upload a receipt image for parsing on behalf of `user`.
    pub async fn parse_grocery_receipt(
        &self,
        file: &SelectedFile,
        user: &str,
    ) -> Result<GroceryReceipt, AppError> {
        let form = build_form([
            ("imgFile", Some(FormValue::File(file))),
            ("user", Some(FormValue::Text(user.to_string()))),
        ])?;

        self.post_multipart(GROCERY_RECEIPT_PATH, form).await
    }

    /// Check that the API is reachable.
    pub async fn status(&self) -> Result<StatusResponse, AppError> {
        self.get(STATUS_PATH).await
    }
}

#[async_trait]
impl ReceiptParser for ApiClient {
    async fn parse_receipt(
        &self,
        file: &SelectedFile,
        user: &str,
    ) -> Result<GroceryReceipt, AppError> {
        tracing::info!(
            file = %file.name(),
            size = file.size(),
            user = %user,
            "Uploading receipt for parsing"
        );
        let result = self.parse_grocery_receipt(file, user).await;
        match &result {
            Ok(receipt) => tracing::debug!(
                items = receipt.item_count(),
                is_valid = receipt.is_valid,
                "Receipt parsed"
            ),
            Err(e) => tracing::debug!(error = %e, "Receipt parsing request failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_ok() {
        let ok = StatusResponse {
            status: "ok".to_string(),
        };
        let down = StatusResponse {
            status: "degraded".to_string(),
        };
        assert!(ok.is_ok());
        assert!(!down.is_ok());
    }

    #[test]
    fn test_build_form_rejects_malformed_mime() {
        let file = SelectedFile::new("receipt.jpg", "not a mime", vec![1u8]);
        let result = build_form([("imgFile", Some(FormValue::File(&file)))]);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_build_form_skips_absent_values() {
        let form = build_form([
            ("user", Some(FormValue::Text("DemoUser".to_string()))),
            ("storeHint", None),
        ])
        .unwrap();
        assert!(!form.boundary().is_empty());
    }
}
