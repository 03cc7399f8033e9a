//! Object store gateway used by the upload pipeline.

use crate::keys::{extracted_text_key, upload_key, UploadClock};
use crate::traits::{Storage, StorageResult};
use bytes::Bytes;
use genie_core::constants::TEXT_CONTENT_TYPE;
use genie_core::{StoredObjectReference, UploadedFile};
use std::sync::Arc;

/// Writes uploaded files and extracted text under the shared key layout.
///
/// Pipeline writes go to the bucket the backend was configured with. Failures
/// are returned as-is; nothing is retried here.
#[derive(Clone)]
pub struct ObjectStoreGateway {
    storage: Arc<dyn Storage>,
    clock: Arc<UploadClock>,
}

impl ObjectStoreGateway {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            clock: Arc::new(UploadClock::new()),
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Write `payload` under `key` and return its reference.
    ///
    /// `bucket` defaults to the backend's configured bucket.
    pub async fn store(
        &self,
        bucket: Option<&str>,
        key: &str,
        payload: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<StoredObjectReference> {
        let target = match bucket {
            Some(bucket) if bucket != self.storage.bucket() => self.storage.for_bucket(bucket)?,
            _ => self.storage.clone(),
        };

        target.put(key, payload, content_type).await?;

        Ok(StoredObjectReference {
            bucket: target.bucket().to_string(),
            key: key.to_string(),
            url: target.object_url(key),
        })
    }

    /// Store an uploaded file under `uploads/{epochMillis}-{originalName}`.
    pub async fn store_file(&self, file: &UploadedFile) -> StorageResult<StoredObjectReference> {
        let key = upload_key(self.clock.next_millis(), &file.original_name);
        tracing::debug!(
            stage = "UPLOAD_FILES_TO_S3",
            file_name = %file.original_name,
            size_bytes = file.size(),
            key = %key,
            "Uploading file"
        );

        let stored = self
            .store(None, &key, file.data.clone(), Some(&file.content_type))
            .await
            .inspect_err(|e| {
                tracing::error!(
                    stage = "UPLOAD_FILES_TO_S3",
                    error = %e,
                    file_name = %file.original_name,
                    "Error uploading file"
                );
            })?;

        tracing::info!(stage = "UPLOAD_FILES_TO_S3", url = %stored.url, "File URL added");
        Ok(stored)
    }

    /// Store extracted text under `input/{originalName}-extracted.txt` as `text/plain`.
    pub async fn store_text(
        &self,
        original_name: &str,
        text: &str,
    ) -> StorageResult<StoredObjectReference> {
        let key = extracted_text_key(original_name);

        let stored = self
            .store(
                None,
                &key,
                Bytes::copy_from_slice(text.as_bytes()),
                Some(TEXT_CONTENT_TYPE),
            )
            .await
            .inspect_err(|e| {
                tracing::error!(stage = "UPLOAD_TXT_TO_S3", error = %e, key = %key, "Error uploading text");
            })?;

        tracing::info!(stage = "UPLOAD_TXT_TO_S3", key = %stored.key, "Text upload successful");
        Ok(stored)
    }
}
