//! Shared AWS SDK configuration.
//!
//! One `SdkConfig` is loaded at startup and every client (Lambda, Bedrock
//! agent runtime, Bedrock agent) is built from it.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_lambda::config::Credentials;
use genie_core::Config;

/// Load SDK configuration from the application config.
///
/// Region and static keys from the config override the default provider
/// chain. Missing keys are not an error here; the chain may still resolve
/// credentials, and if it cannot the first call fails.
pub async fn load_sdk_config(config: &Config) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = config.aws_region() {
        loader = loader.region(Region::new(region.to_string()));
    }

    if let (Some(key_id), Some(secret)) = (
        config.aws_access_key_id.as_deref(),
        config.aws_secret_access_key.as_deref(),
    ) {
        loader = loader.credentials_provider(Credentials::new(
            key_id,
            secret,
            None,
            None,
            "genie-config",
        ));
    }

    loader.load().await
}
