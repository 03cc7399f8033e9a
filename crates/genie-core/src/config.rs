//! Configuration module
//!
//! Settings come from the process environment (after loading `.env` with
//! dotenvy). The legacy `REACT_APP_*` variable names used by earlier
//! deployments are accepted as fallbacks for the AWS and bucket settings.
//!
//! Credentials are not validated here; a missing key surfaces on the first
//! network call that needs it.

use std::env;

use crate::constants::DEFAULT_EXTRACTION_FUNCTION;
use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 3000;
const MAX_FILE_SIZE_MB: usize = 50;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    // AWS
    pub aws_region: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, LocalStack, ...)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Remote services
    pub extraction_function_name: String,
    pub flow_identifier: Option<String>,
    pub flow_alias_identifier: Option<String>,
    // Upload limits
    pub max_file_size_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let var_or_legacy = |key: &str, legacy: &str| var(key).or_else(|| var(legacy));

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = match var("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(backend) => backend.parse()?,
            None => StorageBackend::S3,
        };

        let max_file_size_mb = var("MAX_FILE_SIZE_MB")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(MAX_FILE_SIZE_MB);
        let max_file_size_bytes = max_file_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"))?;

        Ok(Config {
            server_port,
            environment,
            cors_origins,
            aws_region: var_or_legacy("AWS_REGION", "REACT_APP_AWS_REGION"),
            aws_access_key_id: var_or_legacy("AWS_ACCESS_KEY_ID", "REACT_APP_AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: var_or_legacy(
                "AWS_SECRET_ACCESS_KEY",
                "REACT_APP_AWS_SECRET_ACCESS_KEY",
            ),
            storage_backend,
            s3_bucket: var_or_legacy("S3_BUCKET", "REACT_APP_S3_BUCKET_NAME"),
            s3_endpoint: var("S3_ENDPOINT"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
            extraction_function_name: var("EXTRACTION_FUNCTION_NAME")
                .unwrap_or_else(|| DEFAULT_EXTRACTION_FUNCTION.to_string()),
            flow_identifier: var("FLOW_IDENTIFIER"),
            flow_alias_identifier: var("FLOW_ALIAS_IDENTIFIER"),
            max_file_size_bytes,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.storage_backend == StorageBackend::Local && self.local_storage_path.is_none() {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_PATH must be set when STORAGE_BACKEND=local"
            ));
        }

        Ok(())
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.aws_region.as_deref()
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_bytes
    }
}
