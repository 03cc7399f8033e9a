//! Shared key generation for storage backends.
//!
//! Key format: `uploads/{epochMillis}-{originalName}` for uploaded files and
//! `input/{originalName}-extracted.txt` for extracted text. The extraction
//! function and the flow both depend on these layouts.

use genie_core::constants::{
    EXTRACTED_TEXT_KEY_PREFIX, EXTRACTED_TEXT_KEY_SUFFIX, UPLOAD_KEY_PREFIX,
};
use std::sync::atomic::{AtomicI64, Ordering};

/// Key for an uploaded source file.
pub fn upload_key(timestamp_millis: i64, original_name: &str) -> String {
    format!("{}/{}-{}", UPLOAD_KEY_PREFIX, timestamp_millis, original_name)
}

/// Key for the text extracted from `original_name`.
///
/// No timestamp: re-processing the same source file overwrites its previous
/// extracted text.
pub fn extracted_text_key(original_name: &str) -> String {
    format!(
        "{}/{}{}",
        EXTRACTED_TEXT_KEY_PREFIX, original_name, EXTRACTED_TEXT_KEY_SUFFIX
    )
}

/// Virtual-hosted style S3 URL: `https://{bucket}.s3.amazonaws.com/{key}`
pub fn s3_object_url(bucket: &str, key: &str) -> String {
    format!("https://{}.s3.amazonaws.com/{}", bucket, key)
}

/// Millisecond timestamps for upload keys that never repeat within a process.
///
/// Two uploads landing in the same millisecond get consecutive values, so keys
/// stay unique and ordered by arrival.
#[derive(Debug, Default)]
pub struct UploadClock {
    last: AtomicI64,
}

impl UploadClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next timestamp, strictly greater than every value returned before.
    pub fn next_millis(&self) -> i64 {
        self.next_after(chrono::Utc::now().timestamp_millis())
    }

    fn next_after(&self, now: i64) -> i64 {
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self.last.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_key_layout() {
        assert_eq!(
            upload_key(1700000000123, "report.pdf"),
            "uploads/1700000000123-report.pdf"
        );
    }

    #[test]
    fn extracted_text_key_has_no_timestamp() {
        assert_eq!(
            extracted_text_key("report.pdf"),
            "input/report.pdf-extracted.txt"
        );
    }

    #[test]
    fn s3_url_is_derived_from_bucket_and_key() {
        assert_eq!(
            s3_object_url("genie-docs", "uploads/1-a.pdf"),
            "https://genie-docs.s3.amazonaws.com/uploads/1-a.pdf"
        );
    }

    #[test]
    fn clock_is_strictly_increasing_within_one_millisecond() {
        let clock = UploadClock::new();
        let a = clock.next_after(1_000);
        let b = clock.next_after(1_000);
        let c = clock.next_after(999);
        assert_eq!(a, 1_000);
        assert_eq!(b, 1_001);
        assert_eq!(c, 1_002);
        assert_eq!(clock.next_after(5_000), 5_000);
    }

    #[test]
    fn clock_follows_wall_time() {
        let clock = UploadClock::new();
        let before = chrono::Utc::now().timestamp_millis();
        let ts = clock.next_millis();
        assert!(ts >= before);
        assert!(clock.next_millis() > ts);
    }
}
