use bytes::Bytes;
use std::fmt;
use std::path::Path;

/// A file the user picked for upload: name, declared MIME type and contents.
///
/// Cloning is cheap; the contents are reference counted.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    content_type: String,
    data: Bytes,
}

impl SelectedFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into().trim().to_lowercase(),
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared MIME type, lowercased.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Size in megabytes, as shown next to the selection.
    pub fn size_mb(&self) -> f64 {
        self.data.len() as f64 / 1024.0 / 1024.0
    }

    /// Lowercased extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_is_normalized() {
        let file = SelectedFile::new("receipt.JPG", " Image/JPEG ", vec![1u8, 2, 3]);
        assert_eq!(file.content_type(), "image/jpeg");
        assert_eq!(file.extension().as_deref(), Some("jpg"));
        assert_eq!(file.size(), 3);
    }

    #[test]
    fn test_size_mb() {
        let file = SelectedFile::new("receipt.png", "image/png", vec![0u8; 1024 * 1024]);
        assert!((file.size_mb() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_debug_omits_contents() {
        let file = SelectedFile::new("receipt.png", "image/png", vec![0u8; 16]);
        let debug = format!("{:?}", file);
        assert!(debug.contains("receipt.png"));
        assert!(debug.contains("size: 16"));
    }

    #[test]
    fn test_no_extension() {
        let file = SelectedFile::new("receipt", "image/png", Vec::<u8>::new());
        assert_eq!(file.extension(), None);
    }
}
