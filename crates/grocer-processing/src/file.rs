//! Loading a receipt image from disk into a [`SelectedFile`].

use grocer_core::{AppError, SelectedFile};
use std::path::Path;

use crate::sniff::guess_content_type;

/// Content type used when neither the extension nor the contents identify the file.
const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

/// Read `path` and declare its MIME type the way a browser file input would.
///
/// The file is not validated here; the workflow decides whether to accept it.
pub fn load_selected_file(path: &Path) -> Result<SelectedFile, AppError> {
    let data = std::fs::read(path).map_err(|e| {
        AppError::InvalidInput(format!("Failed to read file {}: {}", path.display(), e))
    })?;

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid file name: {}", path.display())))?
        .to_string();

    let content_type = guess_content_type(path, &data).unwrap_or(UNKNOWN_CONTENT_TYPE);

    tracing::debug!(
        file = %name,
        content_type = %content_type,
        size = data.len(),
        "Loaded receipt file"
    );

    Ok(SelectedFile::new(name, content_type, data))
}
