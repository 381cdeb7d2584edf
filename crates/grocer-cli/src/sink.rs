//! Default save target: one pretty-printed JSON file per saved receipt.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use grocer_core::{AppError, GroceryReceipt, ReceiptSink};
use uuid::Uuid;

pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(&self) -> String {
        format!(
            "receipt-{}-{}.json",
            chrono::Utc::now().format("%Y%m%dT%H%M%S"),
            Uuid::new_v4().simple()
        )
    }

    /// Write `receipt` into the save directory and return the file's path.
    pub async fn write(&self, receipt: &GroceryReceipt) -> Result<PathBuf, AppError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Persistence(format!(
                "Failed to create {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let body = serde_json::to_vec_pretty(receipt)
            .map_err(|e| AppError::Persistence(format!("Failed to serialize receipt: {}", e)))?;

        let path = self.dir.join(self.file_name());
        tokio::fs::write(&path, body).await.map_err(|e| {
            AppError::Persistence(format!("Failed to write {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "Receipt written");
        Ok(path)
    }
}

#[async_trait]
impl ReceiptSink for JsonFileSink {
    async fn save_receipt(&self, receipt: &GroceryReceipt) -> Result<(), AppError> {
        self.write(receipt).await.map(|_| ())
    }
}
