//! Plain-text rendering of selections, receipts and errors.

use std::fmt::Write;

use grocer_core::format::{
    format_item_count, format_price, format_quantity, format_receipt_date, format_size_mb,
};
use grocer_core::{AppError, ErrorMetadata, GroceryReceipt, Purchase, SelectedFile};
use grocer_processing::{Preview, PreviewSource, ValidationWarning};

use crate::truncate_string;

const NAME_WIDTH: usize = 28;

/// Summary of the selected file, its preview and any advisory warnings.
pub fn render_selection(
    file: &SelectedFile,
    preview: Option<&Preview>,
    warnings: &[ValidationWarning],
    max_file_size_mb: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Selected: {} ({}, {})",
        file.name(),
        file.content_type(),
        format_size_mb(file.size())
    );
    let _ = writeln!(out, "Upload limit: up to {}MB", max_file_size_mb);

    if let Some(preview) = preview {
        let source = match preview.source() {
            PreviewSource::Converted => "converted",
            PreviewSource::Original => "original",
        };
        let _ = write!(out, "Preview: {} ({})", preview.path().display(), source);
        if let Some((w, h)) = preview.dimensions() {
            let _ = write!(out, " {}x{}", w, h);
        }
        out.push('\n');
    }

    for warning in warnings {
        let _ = writeln!(out, "Warning: {}", warning);
    }
    out
}

/// Full review text for a parsed receipt.
pub fn render_receipt(receipt: &GroceryReceipt) -> String {
    let mut out = String::new();

    if !receipt.is_valid {
        out.push_str("Invalid Receipt\n");
        out.push_str("This doesn't appear to be a valid grocery receipt.\n");
        return out;
    }

    out.push_str("\n=== Receipt Information ===\n\n");
    let _ = writeln!(
        out,
        "Date:    {}",
        format_receipt_date(receipt.date_time.as_deref())
    );
    let _ = writeln!(out, "User:    {}", receipt.user.username);
    let _ = writeln!(out, "Store:   {}", receipt.store.name);
    if let Some(address) = &receipt.store.address {
        let _ = writeln!(out, "Address: {}", address);
    }
    if let Some(phone) = &receipt.store.phone {
        let _ = writeln!(out, "Phone:   {}", phone);
    }

    let _ = writeln!(
        out,
        "\n--- Items Purchased ({}) ---",
        format_item_count(receipt.item_count())
    );
    for purchase in &receipt.purchases {
        out.push_str(&render_purchase(purchase));
    }

    let _ = writeln!(out, "\nTotal Amount: {}", format_price(receipt.total()));
    out
}

fn render_purchase(purchase: &Purchase) -> String {
    let mut line = format!(
        "{:<width$} {:<14} {:>8} {:>10}\n",
        truncate_string(&purchase.name, NAME_WIDTH),
        purchase.category.label(),
        format!(
            "{} {}",
            format_quantity(purchase.quantity),
            purchase.unit_type
        ),
        format_price(purchase.line_total()),
        width = NAME_WIDTH
    );
    let _ = write!(
        line,
        "{:<width$} {} per {}",
        "",
        format_price(purchase.unit_price),
        purchase.unit_type,
        width = NAME_WIDTH
    );
    if let Some(brand) = &purchase.brand {
        let _ = write!(line, ", brand: {}", brand);
    }
    line.push('\n');
    line
}

/// User-facing message for an error, with the suggested next step if any.
pub fn render_error(err: &AppError) -> String {
    match err.suggested_action() {
        Some(action) => format!("{} ({})", err.client_message(), action),
        None => err.client_message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grocer_core::{GroceryCategory, ReceiptUser, Store, UnitType};

    fn receipt() -> GroceryReceipt {
        GroceryReceipt {
            date_time: Some("2025-03-14T17:42:00".to_string()),
            is_valid: true,
            user: ReceiptUser {
                username: "DemoUser".to_string(),
            },
            store: Store {
                name: "Corner Market".to_string(),
                address: Some("1 Main St".to_string()),
                phone: None,
            },
            purchases: vec![
                Purchase {
                    name: "Milk".to_string(),
                    category: GroceryCategory::Dairy,
                    brand: Some("Acme".to_string()),
                    quantity: 1.0,
                    unit_price: 3.5,
                    unit_type: UnitType::Each,
                },
                Purchase {
                    name: "Shampoo".to_string(),
                    category: GroceryCategory::PersonalCare,
                    brand: None,
                    quantity: 2.0,
                    unit_price: 1250.0,
                    unit_type: UnitType::Each,
                },
            ],
        }
    }

    #[test]
    fn test_render_receipt() {
        let text = render_receipt(&receipt());
        assert!(text.contains("Date:    March 14, 2025, 05:42 PM"));
        assert!(text.contains("Store:   Corner Market"));
        assert!(text.contains("Address: 1 Main St"));
        assert!(!text.contains("Phone:"));
        assert!(text.contains("(2 items)"));
        assert!(text.contains("personal care"));
        assert!(text.contains("$3.50 per ea, brand: Acme"));
        assert!(text.contains("$2,500.00"));
        assert!(text.contains("Total Amount: $2,503.50"));
    }

    #[test]
    fn test_render_invalid_receipt() {
        let mut invalid = receipt();
        invalid.is_valid = false;
        let text = render_receipt(&invalid);
        assert!(text.starts_with("Invalid Receipt"));
        assert!(!text.contains("Total Amount"));
    }

    #[test]
    fn test_render_unknown_date() {
        let mut undated = receipt();
        undated.date_time = None;
        assert!(render_receipt(&undated).contains("Date:    Unknown date"));
    }

    #[test]
    fn test_render_selection_with_warning() {
        let file = SelectedFile::new("receipt.jpg", "image/jpeg", vec![0u8; 2048]);
        let warnings = [ValidationWarning::FileLarge {
            size: 2048,
            max: 1024,
        }];
        let text = render_selection(&file, None, &warnings, 10);
        assert!(text.contains("Selected: receipt.jpg (image/jpeg, 0.00 MB)"));
        assert!(text.contains("up to 10MB"));
        assert!(text.contains("Warning: File is larger"));
    }

    #[test]
    fn test_render_error() {
        let err = AppError::UnsupportedFileType {
            content_type: "image/gif".to_string(),
            allowed: vec![],
        };
        assert_eq!(
            render_error(&err),
            "Please upload a valid image file (JPG, PNG, HEIC) (Choose a JPG, PNG or HEIC image)"
        );
        assert_eq!(
            render_error(&AppError::Cancelled),
            "The request was cancelled."
        );
    }
}
