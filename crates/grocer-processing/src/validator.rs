use grocer_core::{AppError, Config, SelectedFile};

/// Advisory findings that do not block a selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationWarning {
    #[error("File is larger than the recommended size: {size} bytes (max: {max} bytes)")]
    FileLarge { size: usize, max: usize },

    #[error("Empty file")]
    EmptyFile,
}

/// Receipt file validator
///
/// Acceptance is decided by the declared MIME type alone. The size limit is
/// advisory: an oversized or empty file yields a warning, never a rejection.
#[derive(Debug, Clone)]
pub struct ReceiptValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl ReceiptValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.trim().to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_file_size_bytes,
            config.allowed_content_types.clone(),
        )
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.allowed_content_types
    }

    /// Validate content type against the allow-list
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), AppError> {
        let normalized = content_type.trim().to_lowercase();

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(AppError::UnsupportedFileType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Check file size against the advisory limit
    pub fn check_file_size(&self, size: usize) -> Option<ValidationWarning> {
        if size == 0 {
            return Some(ValidationWarning::EmptyFile);
        }

        if size > self.max_file_size {
            return Some(ValidationWarning::FileLarge {
                size,
                max: self.max_file_size,
            });
        }

        None
    }

    /// Validate a selection. Returns advisory warnings on acceptance.
    pub fn validate(&self, file: &SelectedFile) -> Result<Vec<ValidationWarning>, AppError> {
        self.validate_content_type(file.content_type())?;
        Ok(self.check_file_size(file.size()).into_iter().collect())
    }
}

impl Default for ReceiptValidator {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
