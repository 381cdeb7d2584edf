//! Data models for the receipt workflow
//!
//! `receipt` holds the parse result returned by the API; `file` holds the
//! blob the user selected for upload.

mod file;
mod receipt;

pub use file::*;
pub use receipt::*;
