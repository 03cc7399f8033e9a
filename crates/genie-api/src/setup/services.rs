//! Remote service clients and application state

use crate::state::AppState;
use anyhow::Result;
use genie_core::Config;
use genie_services::{
    load_sdk_config, BedrockFlowCatalog, BedrockFlowRuntime, ExtractionInvoker, FlowInvoker,
    LambdaInvoker,
};
use genie_storage::{ObjectStoreGateway, Storage};
use std::sync::Arc;

/// Build the AWS clients once and assemble the shared state.
pub async fn initialize_services(
    config: &Config,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let sdk_config = load_sdk_config(config).await;
    tracing::info!(
        region = ?sdk_config.region().map(|r| r.as_ref().to_string()),
        "AWS SDK configuration loaded"
    );

    let extraction = ExtractionInvoker::new(
        Arc::new(LambdaInvoker::new(&sdk_config)),
        config.extraction_function_name.clone(),
    );

    if config.flow_identifier.is_none() || config.flow_alias_identifier.is_none() {
        tracing::warn!(
            "FLOW_IDENTIFIER or FLOW_ALIAS_IDENTIFIER not set; uploads will fail at the flow stage"
        );
    }
    let flow = FlowInvoker::new(
        Arc::new(BedrockFlowRuntime::new(&sdk_config)),
        config.flow_identifier.clone(),
        config.flow_alias_identifier.clone(),
    );

    tracing::info!(
        extraction_function = %extraction.function_name(),
        "Remote services initialized"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        gateway: ObjectStoreGateway::new(storage),
        extraction,
        flow,
        catalog: Arc::new(BedrockFlowCatalog::new(&sdk_config)),
    }))
}
