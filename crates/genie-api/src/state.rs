use genie_core::Config;
use genie_services::{ExtractionInvoker, FlowCatalog, FlowInvoker};
use genie_storage::ObjectStoreGateway;
use std::sync::Arc;

/// Shared application state.
///
/// Every client is built once at startup and shared read-only between
/// requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateway: ObjectStoreGateway,
    pub extraction: ExtractionInvoker,
    pub flow: FlowInvoker,
    pub catalog: Arc<dyn FlowCatalog>,
}
