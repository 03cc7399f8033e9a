//! Extraction result parsing.

use crate::extraction::ExtractionError;
use serde_json::Value;

/// Pull the `extractedText` values out of an extraction body.
///
/// `body` may be a JSON-encoded string or an already decoded object. The body
/// must contain a `results` object mapping source path to
/// `{ "extractedText": ... }`; anything else is a [`ExtractionError::MalformedBody`].
/// Entries without a non-empty text are skipped, and so are non-string
/// `extractedText` values: only strings can be stored as text objects.
/// Result order follows the map
/// iteration order and carries no meaning.
pub fn parse_extracted_texts(body: &Value) -> Result<Vec<String>, ExtractionError> {
    let decoded;
    let parsed = match body {
        Value::String(raw) => {
            decoded = serde_json::from_str::<Value>(raw)
                .map_err(|e| ExtractionError::MalformedBody(format!("body is not JSON: {}", e)))?;
            &decoded
        }
        other => other,
    };

    let results = parsed
        .get("results")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            ExtractionError::MalformedBody("Results object not found.".to_string())
        })?;

    let mut texts = Vec::with_capacity(results.len());
    for (path, result) in results {
        match result.get("extractedText") {
            Some(Value::String(text)) if !text.is_empty() => texts.push(text.clone()),
            _ => {
                tracing::debug!(
                    stage = "PARSE_EXTRACTED_TEXT",
                    path = %path,
                    "No extracted text for file"
                );
            }
        }
    }

    Ok(texts)
}
