//! Upload and review state machine.
//!
//! ```text
//! Idle --select_file--> FileSelected --begin_submit--> Submitting
//! Submitting --complete_submit(ok)--> Reviewing
//! Submitting --complete_submit(err)--> FileSelected
//! Reviewing --cancel_review--> FileSelected --reopen_review--> Reviewing
//! Reviewing --begin_save--> Saved --finish_save(ok)--> Idle
//!                                 --finish_save(err)--> Reviewing
//! ```
//!
//! The machine is synchronous; the network call happens between
//! [`UploadWorkflow::begin_submit`] and [`UploadWorkflow::complete_submit`].

use std::fmt;

use grocer_core::{AppError, GroceryReceipt, SelectedFile};
use grocer_processing::{Preview, PreviewRenderer, ReceiptValidator, ValidationWarning};
use tracing::{debug, info, warn};

use crate::state::WorkflowState;

/// Identifies one call to `begin_submit`. Ids increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionId(u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the parser needs for one request.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: SubmissionId,
    pub file: SelectedFile,
    pub user: String,
}

/// What a finished submission did to the workflow.
#[derive(Debug)]
pub enum Completion {
    /// The result is stored and open for review.
    Reviewing,
    /// The request failed; the file is kept for another attempt.
    Failed(AppError),
    /// The selection changed while the request was in flight; its outcome was dropped.
    Stale,
    /// A request was already in flight, so no new one was started.
    Ignored,
}

pub struct UploadWorkflow {
    state: WorkflowState,
    file: Option<SelectedFile>,
    result: Option<GroceryReceipt>,
    preview: Option<Preview>,
    warnings: Vec<ValidationWarning>,
    validator: ReceiptValidator,
    previews: PreviewRenderer,
    user: String,
    next_submission: u64,
    in_flight: Option<SubmissionId>,
}

impl UploadWorkflow {
    pub fn new(
        validator: ReceiptValidator,
        previews: PreviewRenderer,
        user: impl Into<String>,
    ) -> Self {
        Self {
            state: WorkflowState::Idle,
            file: None,
            result: None,
            preview: None,
            warnings: Vec::new(),
            validator,
            previews,
            user: user.into(),
            next_submission: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn result(&self) -> Option<&GroceryReceipt> {
        self.result.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Advisory warnings for the current selection (size, emptiness).
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn in_flight(&self) -> Option<SubmissionId> {
        self.in_flight
    }

    /// Select a file for upload.
    ///
    /// Unsupported types are rejected with no change to the workflow. An
    /// accepted file replaces the previous one, clears any parse result and
    /// releases the previous preview. Selecting while a request is in flight
    /// makes that request stale.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<&[ValidationWarning], AppError> {
        if self.state == WorkflowState::Saved {
            return Err(self.invalid("select a file"));
        }

        let warnings = match self.validator.validate(&file) {
            Ok(warnings) => warnings,
            Err(e) => {
                debug!(
                    file = %file.name(),
                    content_type = %file.content_type(),
                    error = %e,
                    "Rejected file selection"
                );
                return Err(e);
            }
        };

        if let Some(id) = self.in_flight.take() {
            debug!(submission = %id, "Selection replaced while submitting, discarding request");
        }

        self.result = None;
        self.preview = None;
        self.preview = match self.previews.render(&file) {
            Ok(preview) => Some(preview),
            Err(e) => {
                warn!(file = %file.name(), error = %e, "Failed to render preview");
                None
            }
        };

        for warning in &warnings {
            warn!(file = %file.name(), "{}", warning);
        }

        info!(
            file = %file.name(),
            content_type = %file.content_type(),
            size = file.size(),
            "File selected"
        );

        self.warnings = warnings;
        self.file = Some(file);
        self.state = WorkflowState::FileSelected;
        Ok(&self.warnings)
    }

    /// Start a parse request for the selected file.
    ///
    /// Returns `Ok(None)` when a request is already in flight. Valid from
    /// `FileSelected` or `Reviewing`; a retained result is always re-fetched.
    pub fn begin_submit(&mut self) -> Result<Option<Submission>, AppError> {
        if self.state == WorkflowState::Submitting {
            debug!(submission = ?self.in_flight, "Submission already in flight, ignoring submit");
            return Ok(None);
        }

        let Some(file) = self.file.clone() else {
            return Err(AppError::NoFileSelected);
        };

        if !self.state.can_submit() {
            return Err(self.invalid("submit"));
        }

        self.next_submission += 1;
        let id = SubmissionId(self.next_submission);
        self.in_flight = Some(id);
        self.state = WorkflowState::Submitting;

        info!(submission = %id, file = %file.name(), user = %self.user, "Submitting receipt");

        Ok(Some(Submission {
            id,
            file,
            user: self.user.clone(),
        }))
    }

    /// Record the outcome of submission `id`.
    pub fn complete_submit(
        &mut self,
        id: SubmissionId,
        outcome: Result<GroceryReceipt, AppError>,
    ) -> Completion {
        if self.in_flight != Some(id) {
            debug!(submission = %id, "Discarding stale submission result");
            return Completion::Stale;
        }
        self.in_flight = None;

        match outcome {
            Ok(receipt) => {
                info!(
                    submission = %id,
                    items = receipt.item_count(),
                    is_valid = receipt.is_valid,
                    "Receipt ready for review"
                );
                self.result = Some(receipt);
                self.state = WorkflowState::Reviewing;
                Completion::Reviewing
            }
            Err(e) => {
                warn!(submission = %id, error = %e, "Receipt submission failed");
                self.state = WorkflowState::FileSelected;
                Completion::Failed(e)
            }
        }
    }

    /// Close the review, keeping the file and the result.
    pub fn cancel_review(&mut self) -> Result<(), AppError> {
        if self.state != WorkflowState::Reviewing {
            return Err(self.invalid("cancel review"));
        }
        self.state = WorkflowState::FileSelected;
        debug!("Review closed");
        Ok(())
    }

    /// Reopen the review of a retained result without another request.
    pub fn reopen_review(&mut self) -> Result<(), AppError> {
        if self.state != WorkflowState::FileSelected {
            return Err(self.invalid("view results"));
        }
        if self.result.is_none() {
            return Err(AppError::InvalidState {
                operation: "view results",
                state: "no result is available".to_string(),
            });
        }
        self.state = WorkflowState::Reviewing;
        debug!("Review reopened");
        Ok(())
    }

    /// Move to `Saved` and return the receipt to hand to the sink.
    ///
    /// `edited` replaces the stored result when given.
    pub fn begin_save(
        &mut self,
        edited: Option<GroceryReceipt>,
    ) -> Result<GroceryReceipt, AppError> {
        if self.state != WorkflowState::Reviewing {
            return Err(self.invalid("save"));
        }
        if let Some(receipt) = edited {
            self.result = Some(receipt);
        }
        let Some(receipt) = self.result.clone() else {
            return Err(AppError::Internal("Reviewing without a result".to_string()));
        };
        self.state = WorkflowState::Saved;
        Ok(receipt)
    }

    /// Record the sink's outcome. Success clears the workflow back to `Idle`;
    /// failure returns to `Reviewing` with the data intact.
    pub fn finish_save(&mut self, outcome: Result<(), AppError>) -> Result<(), AppError> {
        if self.state != WorkflowState::Saved {
            return Err(self.invalid("finish saving"));
        }

        match outcome {
            Ok(()) => {
                info!(
                    file = ?self.file.as_ref().map(|f| f.name().to_string()),
                    "Receipt saved"
                );
                self.clear();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Saving receipt failed");
                self.state = WorkflowState::Reviewing;
                Err(e)
            }
        }
    }

    fn clear(&mut self) {
        self.file = None;
        self.result = None;
        self.preview = None;
        self.warnings.clear();
        self.in_flight = None;
        self.state = WorkflowState::Idle;
    }

    fn invalid(&self, operation: &'static str) -> AppError {
        AppError::InvalidState {
            operation,
            state: self.state.to_string(),
        }
    }
}

impl fmt::Debug for UploadWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadWorkflow")
            .field("state", &self.state)
            .field("file", &self.file)
            .field("has_result", &self.result.is_some())
            .field("in_flight", &self.in_flight)
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grocer_core::{ReceiptUser, Store};
    use grocer_processing::JpegConverter;
    use std::sync::Arc;

    fn workflow() -> UploadWorkflow {
        UploadWorkflow::new(
            ReceiptValidator::default(),
            PreviewRenderer::new(Arc::new(JpegConverter::default())),
            "DemoUser",
        )
    }

    fn jpeg(name: &str) -> SelectedFile {
        SelectedFile::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    fn receipt() -> GroceryReceipt {
        GroceryReceipt {
            date_time: None,
            is_valid: true,
            user: ReceiptUser {
                username: "DemoUser".to_string(),
            },
            store: Store::default(),
            purchases: vec![],
        }
    }

    #[test]
    fn test_submission_ids_increase() {
        let mut wf = workflow();
        wf.select_file(jpeg("a.jpg")).unwrap();

        let first = wf.begin_submit().unwrap().unwrap();
        wf.complete_submit(first.id, Err(AppError::Transport("down".to_string())));
        let second = wf.begin_submit().unwrap().unwrap();

        assert!(second.id > first.id);
        assert_eq!(second.user, "DemoUser");
        assert_eq!(second.file.name(), "a.jpg");
    }

    #[test]
    fn test_submit_without_file() {
        let mut wf = workflow();
        assert!(matches!(wf.begin_submit(), Err(AppError::NoFileSelected)));
        assert_eq!(wf.state(), WorkflowState::Idle);
    }

    #[test]
    fn test_cancel_review_outside_reviewing() {
        let mut wf = workflow();
        let err = wf.cancel_review().unwrap_err();
        assert_eq!(err.to_string(), "Cannot cancel review while idle");
    }

    #[test]
    fn test_reopen_requires_result() {
        let mut wf = workflow();
        wf.select_file(jpeg("a.jpg")).unwrap();
        assert!(wf.reopen_review().is_err());
        assert_eq!(wf.state(), WorkflowState::FileSelected);
    }

    #[test]
    fn test_select_during_save_rejected() {
        let mut wf = workflow();
        wf.select_file(jpeg("a.jpg")).unwrap();
        let submission = wf.begin_submit().unwrap().unwrap();
        wf.complete_submit(submission.id, Ok(receipt()));
        wf.begin_save(None).unwrap();

        assert!(wf.select_file(jpeg("b.jpg")).is_err());
        assert_eq!(wf.state(), WorkflowState::Saved);
        assert_eq!(wf.selected_file().unwrap().name(), "a.jpg");
    }

    #[test]
    fn test_begin_save_with_edits() {
        let mut wf = workflow();
        wf.select_file(jpeg("a.jpg")).unwrap();
        let submission = wf.begin_submit().unwrap().unwrap();
        wf.complete_submit(submission.id, Ok(receipt()));

        let mut edited = receipt();
        edited.store.name = "Corner Market".to_string();
        let saved = wf.begin_save(Some(edited.clone())).unwrap();

        assert_eq!(saved, edited);
        assert_eq!(wf.result(), Some(&edited));
    }

    #[test]
    fn test_finish_save_outside_saved() {
        let mut wf = workflow();
        assert!(wf.finish_save(Ok(())).is_err());
    }

    #[test]
    fn test_oversized_file_is_accepted_with_warning() {
        let validator = ReceiptValidator::new(4, vec!["image/jpeg".to_string()]);
        let mut wf = UploadWorkflow::new(
            validator,
            PreviewRenderer::new(Arc::new(JpegConverter::default())),
            "DemoUser",
        );

        let warnings = wf
            .select_file(SelectedFile::new("big.jpg", "image/jpeg", vec![0u8; 8]))
            .unwrap()
            .to_vec();

        assert_eq!(warnings, vec![ValidationWarning::FileLarge { size: 8, max: 4 }]);
        assert_eq!(wf.state(), WorkflowState::FileSelected);
    }
}
