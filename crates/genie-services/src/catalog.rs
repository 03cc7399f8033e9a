//! Flow catalog listing.

use crate::flow::FlowError;
use async_trait::async_trait;
use genie_core::FlowSummary;

/// Lists the flows available in the account.
#[async_trait]
pub trait FlowCatalog: Send + Sync {
    /// One page of flow summaries, in the order the service returns them.
    async fn list_flows(&self) -> Result<Vec<FlowSummary>, FlowError>;
}

#[cfg(feature = "aws")]
pub use bedrock::BedrockFlowCatalog;

#[cfg(feature = "aws")]
mod bedrock {
    use super::FlowCatalog;
    use crate::flow::FlowError;
    use async_trait::async_trait;
    use aws_sdk_bedrockagent::error::DisplayErrorContext;
    use aws_sdk_bedrockagent::Client as AgentClient;
    use genie_core::constants::FLOW_CATALOG_PAGE_SIZE;
    use genie_core::FlowSummary;

    /// [`FlowCatalog`] backed by Bedrock Agents `ListFlows`.
    #[derive(Clone, Debug)]
    pub struct BedrockFlowCatalog {
        client: AgentClient,
    }

    impl BedrockFlowCatalog {
        pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
            Self {
                client: AgentClient::new(sdk_config),
            }
        }
    }

    #[async_trait]
    impl FlowCatalog for BedrockFlowCatalog {
        async fn list_flows(&self) -> Result<Vec<FlowSummary>, FlowError> {
            let output = self
                .client
                .list_flows()
                .max_results(FLOW_CATALOG_PAGE_SIZE)
                .send()
                .await
                .map_err(|e| FlowError::Catalog(DisplayErrorContext(&e).to_string()))?;

            if output.next_token().is_some() {
                tracing::debug!("More flows available than one page; only the first page is returned");
            }

            Ok(output
                .flow_summaries()
                .iter()
                .map(|summary| FlowSummary {
                    name: summary.name().to_string(),
                    id: summary.id().to_string(),
                })
                .collect())
        }
    }
}
