//! Display previews of the selected receipt.
//!
//! A preview is backed by a temporary file so a viewer can open it by path.
//! Dropping the [`Preview`] deletes the file, so replacing or clearing the
//! selection releases it.

use bytes::Bytes;
use grocer_core::{AppError, SelectedFile};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

use super::convert::{image_dimensions, ImageConverter};
use crate::sniff::is_heic;

/// Where the preview bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewSource {
    /// HEIC input converted to JPEG.
    Converted,
    /// The selected file as-is (no conversion needed, or conversion failed).
    Original,
}

/// A displayable rendition of the selected file.
#[derive(Debug)]
pub struct Preview {
    source: PreviewSource,
    content_type: String,
    dimensions: Option<(u32, u32)>,
    file: NamedTempFile,
}

impl Preview {
    pub fn source(&self) -> PreviewSource {
        self.source
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    /// Path of the temporary preview file; valid while the preview is alive.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Copy the preview to `dest`, leaving the temporary file in place.
    pub fn copy_to(&self, dest: &Path) -> Result<(), AppError> {
        std::fs::copy(self.file.path(), dest)?;
        Ok(())
    }
}

/// Builds previews, converting HEIC input and falling back to the original bytes.
#[derive(Clone)]
pub struct PreviewRenderer {
    converter: Arc<dyn ImageConverter>,
    dir: Option<PathBuf>,
}

impl PreviewRenderer {
    pub fn new(converter: Arc<dyn ImageConverter>) -> Self {
        Self {
            converter,
            dir: None,
        }
    }

    /// Write preview files under `dir` instead of the system temp directory.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Render a preview of `file`.
    ///
    /// Conversion failures are logged and degrade to the original bytes; only
    /// failing to write the temporary file is an error.
    pub fn render(&self, file: &SelectedFile) -> Result<Preview, AppError> {
        let (source, content_type, data) = if is_heic(file.content_type(), file.name()) {
            match self.converter.convert(file.data(), file.content_type()) {
                Ok(converted) => (
                    PreviewSource::Converted,
                    converted.content_type,
                    converted.data,
                ),
                Err(e) => {
                    tracing::warn!(
                        file = %file.name(),
                        error = %e,
                        "HEIC conversion failed, previewing original file"
                    );
                    (
                        PreviewSource::Original,
                        file.content_type().to_string(),
                        file.data().clone(),
                    )
                }
            }
        } else {
            (
                PreviewSource::Original,
                file.content_type().to_string(),
                file.data().clone(),
            )
        };

        let temp = self.write_temp(&data, preview_suffix(&content_type, file))?;

        Ok(Preview {
            source,
            dimensions: image_dimensions(&data),
            content_type,
            file: temp,
        })
    }

    fn write_temp(&self, data: &Bytes, suffix: String) -> Result<NamedTempFile, AppError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("grocer-preview-").suffix(&suffix);
        let mut temp = match &self.dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        temp.write_all(data)?;
        temp.flush()?;
        Ok(temp)
    }
}

fn preview_suffix(content_type: &str, file: &SelectedFile) -> String {
    match content_type {
        "image/jpeg" | "image/jpg" => ".jpg".to_string(),
        "image/png" => ".png".to_string(),
        _ => file
            .extension()
            .map(|e| format!(".{}", e))
            .unwrap_or_default(),
    }
}
