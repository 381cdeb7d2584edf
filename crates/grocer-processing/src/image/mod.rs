//! Image handling for receipt previews
//!
//! - Format conversion (convert)
//! - Temporary-file previews with HEIC fallback (preview)

pub mod convert;
pub mod preview;

pub use convert::{image_dimensions, ConvertedImage, ImageConverter, JpegConverter};
pub use preview::{Preview, PreviewRenderer, PreviewSource};
