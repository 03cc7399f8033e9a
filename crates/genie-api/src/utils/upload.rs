//! Multipart upload helpers

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use genie_core::constants::DEFAULT_CONTENT_TYPE;
use genie_core::{AppError, UploadedFile};

const FILE_FIELD: &str = "file";

fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(format!("{}: {}", context, err.body_text()));
    }
    AppError::InvalidInput(format!("{}: {}", context, err.body_text()))
}

/// Read the single `file` field from a multipart form.
///
/// Returns `Ok(None)` when the form has no `file` field carrying a file name.
/// A plain text field named `file` is not an upload and is skipped. A second
/// file is rejected; other fields are ignored.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
) -> Result<Option<UploadedFile>, AppError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let Some(filename) = field.file_name().map(str::to_string) else {
            tracing::debug!("Skipping 'file' field without a file name");
            continue;
        };

        if file.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read file data", e))?;

        file = Some(UploadedFile::new(
            sanitize_filename(&filename)?,
            content_type,
            data,
        ));
    }

    Ok(file)
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Keep only the final path component of a client-supplied file name.
///
/// The name becomes part of object keys, so directory parts and `..` are not
/// allowed through.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(AppError::InvalidInput(format!(
            "Invalid file name: {}",
            filename
        )));
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_plain_names() {
        assert_eq!(sanitize_filename("report.pdf").unwrap(), "report.pdf");
        assert_eq!(
            sanitize_filename("Q3 plan (final).docx").unwrap(),
            "Q3 plan (final).docx"
        );
    }

    #[test]
    fn strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\a.pdf").unwrap(), "a.pdf");
    }

    #[test]
    fn rejects_empty_and_dot_names() {
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("dir/..").is_err());
        assert!(sanitize_filename("uploads/").is_err());
    }

    #[test]
    fn size_limit() {
        assert!(validate_file_size(10, 10).is_ok());
        assert!(matches!(
            validate_file_size(11, 10),
            Err(AppError::PayloadTooLarge(_))
        ));
    }
}
