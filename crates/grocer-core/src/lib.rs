//! Grocer Core Library
//!
//! Receipt data model, display formatting, error types, configuration and the
//! collaborator traits shared by every Grocer crate.

pub mod case;
pub mod config;
pub mod error;
pub mod format;
pub mod hooks;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel, Result};
pub use hooks::{NoOpReceiptSink, ReceiptParser, ReceiptSink};
pub use models::{GroceryCategory, GroceryReceipt, Purchase, ReceiptUser, SelectedFile, Store, UnitType};
