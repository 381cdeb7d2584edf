//! Collaborator traits
//!
//! The workflow talks to the outside world through these two seams: a parser
//! that turns an uploaded image into a [`GroceryReceipt`] and a sink that
//! persists a reviewed receipt. The API client implements the former; the
//! front-end supplies the latter.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{GroceryReceipt, SelectedFile};

/// Sends a receipt image to a parsing backend.
#[async_trait]
pub trait ReceiptParser: Send + Sync {
    /// Parse `file` on behalf of `user`. Any failure (transport, non-2xx,
    /// undecodable body) is returned as an error.
    async fn parse_receipt(
        &self,
        file: &SelectedFile,
        user: &str,
    ) -> Result<GroceryReceipt, AppError>;
}

/// Persists a reviewed receipt. The workflow's responsibility ends at calling it.
#[async_trait]
pub trait ReceiptSink: Send + Sync {
    async fn save_receipt(&self, receipt: &GroceryReceipt) -> Result<(), AppError>;
}

/// Sink that discards receipts, for callers that only want the review.
pub struct NoOpReceiptSink;

#[async_trait]
impl ReceiptSink for NoOpReceiptSink {
    async fn save_receipt(&self, _receipt: &GroceryReceipt) -> Result<(), AppError> {
        Ok(())
    }
}
