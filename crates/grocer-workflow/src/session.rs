//! Async driver for [`UploadWorkflow`].
//!
//! The session owns the workflow together with its collaborators. Requests are
//! raced against the session's cancellation token, so shutting the session
//! down (or dropping it) abandons an outstanding request instead of letting
//! it complete into a disposed workflow.

use std::sync::Arc;

use grocer_core::{AppError, GroceryReceipt, ReceiptParser, ReceiptSink, SelectedFile};
use grocer_processing::ValidationWarning;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::workflow::{Completion, UploadWorkflow};

pub struct ReceiptSession {
    workflow: UploadWorkflow,
    parser: Arc<dyn ReceiptParser>,
    sink: Arc<dyn ReceiptSink>,
    cancel_token: CancellationToken,
}

impl ReceiptSession {
    pub fn new(
        workflow: UploadWorkflow,
        parser: Arc<dyn ReceiptParser>,
        sink: Arc<dyn ReceiptSink>,
    ) -> Self {
        Self::with_cancel_token(workflow, parser, sink, CancellationToken::new())
    }

    /// Build a session that shuts down when `cancel_token` is cancelled.
    pub fn with_cancel_token(
        workflow: UploadWorkflow,
        parser: Arc<dyn ReceiptParser>,
        sink: Arc<dyn ReceiptSink>,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            workflow,
            parser,
            sink,
            cancel_token,
        }
    }

    pub fn workflow(&self) -> &UploadWorkflow {
        &self.workflow
    }

    /// Handle that shuts the session down from another task.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Abandon any outstanding request. The session accepts no further requests.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    pub fn select_file(&mut self, file: SelectedFile) -> Result<&[ValidationWarning], AppError> {
        self.workflow.select_file(file)
    }

    /// Parse the selected file. A shutdown while waiting yields
    /// `Completion::Failed(AppError::Cancelled)` and keeps the file.
    pub async fn submit(&mut self) -> Result<Completion, AppError> {
        if self.is_shut_down() {
            return Err(AppError::Cancelled);
        }

        let Some(submission) = self.workflow.begin_submit()? else {
            return Ok(Completion::Ignored);
        };

        let outcome = tokio::select! {
            _ = self.cancel_token.cancelled() => {
                debug!(submission = %submission.id, "Session shut down, abandoning request");
                Err(AppError::Cancelled)
            }
            result = self.parser.parse_receipt(&submission.file, &submission.user) => result,
        };

        Ok(self.workflow.complete_submit(submission.id, outcome))
    }

    pub fn cancel_review(&mut self) -> Result<(), AppError> {
        self.workflow.cancel_review()
    }

    pub fn reopen_review(&mut self) -> Result<(), AppError> {
        self.workflow.reopen_review()
    }

    /// Save the result under review as-is.
    pub async fn save(&mut self) -> Result<(), AppError> {
        self.save_receipt(None).await
    }

    /// Save a user-edited version of the result under review.
    pub async fn save_edited(&mut self, receipt: GroceryReceipt) -> Result<(), AppError> {
        self.save_receipt(Some(receipt)).await
    }

    async fn save_receipt(&mut self, edited: Option<GroceryReceipt>) -> Result<(), AppError> {
        if self.is_shut_down() {
            return Err(AppError::Cancelled);
        }

        let receipt = self.workflow.begin_save(edited)?;

        let outcome = tokio::select! {
            _ = self.cancel_token.cancelled() => Err(AppError::Cancelled),
            result = self.sink.save_receipt(&receipt) => result,
        };

        self.workflow.finish_save(outcome)
    }
}

impl Drop for ReceiptSession {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
