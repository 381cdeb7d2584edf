//! Grocer processing: receipt file validation, content-type detection and
//! display previews.

pub mod file;
pub mod image;
pub mod sniff;
pub mod validator;

pub use file::load_selected_file;
pub use image::{
    ConvertedImage, ImageConverter, JpegConverter, Preview, PreviewRenderer, PreviewSource,
};
pub use sniff::{content_type_for_extension, detect_content_type, guess_content_type, is_heic};
pub use validator::{ReceiptValidator, ValidationWarning};
