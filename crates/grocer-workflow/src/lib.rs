//! Grocer workflow: the receipt upload and review state machine.
//!
//! [`UploadWorkflow`] holds the selection, the parse result and the current
//! state, and enforces which transitions are legal. [`ReceiptSession`] drives
//! it asynchronously against a [`grocer_core::ReceiptParser`] and a
//! [`grocer_core::ReceiptSink`].

pub mod session;
pub mod state;
pub mod workflow;

pub use session::ReceiptSession;
pub use state::WorkflowState;
pub use workflow::{Completion, Submission, SubmissionId, UploadWorkflow};
