//! Fixed names shared with the extraction function and the managed flow.
//!
//! The key prefixes and flow node names are part of the contract with external
//! services and must not change without updating those services.

/// API base path prefix
pub const API_BASE: &str = "/api";

/// Key prefix for uploaded source files: `uploads/{epochMillis}-{originalName}`
pub const UPLOAD_KEY_PREFIX: &str = "uploads";

/// Key prefix for extracted text: `input/{originalName}-extracted.txt`
pub const EXTRACTED_TEXT_KEY_PREFIX: &str = "input";

pub const EXTRACTED_TEXT_KEY_SUFFIX: &str = "-extracted.txt";

pub const TEXT_CONTENT_TYPE: &str = "text/plain";

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Remote extraction function invoked when `EXTRACTION_FUNCTION_NAME` is unset
pub const DEFAULT_EXTRACTION_FUNCTION: &str = "ba-genie-dev-testExtractMultipleFiles";

/// Flow input node the extracted text key is bound to
pub const FLOW_INPUT_NODE: &str = "FlowInputNode";

/// Output slot of [`FLOW_INPUT_NODE`]
pub const FLOW_INPUT_OUTPUT_NAME: &str = "document";

/// Single page size used by the flow catalog
pub const FLOW_CATALOG_PAGE_SIZE: i32 = 100;

pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";

pub const NO_FILE_UPLOADED_MESSAGE: &str = "No file uploaded.";
