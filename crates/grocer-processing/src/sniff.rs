//! Content-type detection from file extensions and magic bytes.

use std::path::Path;

/// ISO-BMFF brands used by HEIF/HEIC stills and sequences.
const HEIF_BRANDS: [&[u8; 4]; 8] = [
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"mif1", b"msf1",
];

/// MIME type a browser would declare for a file with this extension.
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.trim_start_matches('.').to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "heic" | "heif" => Some("image/heic"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "avif" => Some("image/avif"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

/// Detect the MIME type from the leading bytes of a file.
pub fn detect_content_type(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    if data.starts_with(b"%PDF") {
        return Some("application/pdf");
    }
    if data.len() >= 12 && &data[4..8] == b"ftyp" {
        let brand = &data[8..12];
        if HEIF_BRANDS.iter().any(|b| b.as_slice() == brand) {
            return Some("image/heic");
        }
        if brand == b"avif" || brand == b"avis" {
            return Some("image/avif");
        }
    }
    None
}

/// Declared content type for a file on disk: by extension first (the way a
/// browser file picker declares it), then by magic bytes.
pub fn guess_content_type(path: &Path, data: &[u8]) -> Option<&'static str> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(content_type_for_extension)
        .or_else(|| detect_content_type(data))
}

/// True when the file should go through HEIC conversion before display.
pub fn is_heic(content_type: &str, file_name: &str) -> bool {
    let ct = content_type.trim().to_lowercase();
    ct == "image/heic"
        || ct == "image/heif"
        || file_name.to_lowercase().ends_with(".heic")
        || file_name.to_lowercase().ends_with(".heif")
}
