//! Test helpers: build AppState and router for integration tests.
//!
//! Every remote collaborator is replaced by an in-process double that records
//! its calls into one shared, ordered log.
//!
//! Run with: `cargo test -p genie-api`

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use futures::StreamExt;
use genie_api::setup::routes;
use genie_api::state::AppState;
use genie_core::{Config, FlowSummary, StorageBackend};
use genie_services::{
    ExtractionError, ExtractionInvoker, FlowCatalog, FlowError, FlowEvent, FlowEventStream,
    FlowInvoker, FlowRequest, FlowRuntime, FunctionInvoker,
};
use genie_storage::{ObjectStoreGateway, Storage, StorageError, StorageResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const TEST_BUCKET: &str = "genie-test-bucket";
pub const TEST_FUNCTION: &str = "test-extract-fn";
pub const TEST_FLOW_ID: &str = "FLOWTEST01";
pub const TEST_FLOW_ALIAS: &str = "ALIASTEST1";

/// Ordered record of every collaborator call.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Storage double that keeps objects in memory.
pub struct MemoryStorage {
    log: CallLog,
    pub objects: Mutex<HashMap<String, (Vec<u8>, Option<String>)>>,
    fail_writes: bool,
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<()> {
        self.log.push(format!("put:{}", storage_key));
        if self.fail_writes {
            return Err(StorageError::UploadFailed("NoSuchBucket".to_string()));
        }
        self.objects.lock().unwrap().insert(
            storage_key.to_string(),
            (data.to_vec(), content_type.map(String::from)),
        );
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        if self.fail_writes {
            return Err(StorageError::BackendError("unreachable".to_string()));
        }
        Ok(self.objects.lock().unwrap().contains_key(storage_key))
    }

    fn bucket(&self) -> &str {
        TEST_BUCKET
    }

    fn object_url(&self, storage_key: &str) -> String {
        format!("https://{}.s3.amazonaws.com/{}", TEST_BUCKET, storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }

    fn for_bucket(&self, bucket: &str) -> StorageResult<Arc<dyn Storage>> {
        Err(StorageError::ConfigError(format!("unknown bucket {}", bucket)))
    }
}

/// Extraction function double answering with a fixed response payload.
pub struct CannedFunction {
    log: CallLog,
    response: Vec<u8>,
    pub payloads: Mutex<Vec<Value>>,
}

#[async_trait]
impl FunctionInvoker for CannedFunction {
    async fn invoke(
        &self,
        function_name: &str,
        payload: Vec<u8>,
    ) -> Result<Vec<u8>, ExtractionError> {
        self.log.push(format!("invoke:{}", function_name));
        self.payloads
            .lock()
            .unwrap()
            .push(serde_json::from_slice(&payload).unwrap());
        Ok(self.response.clone())
    }
}

/// Flow runtime double emitting a fixed list of output documents.
pub struct ScriptedFlow {
    log: CallLog,
    documents: Vec<String>,
    reject: Option<String>,
    pub requests: Mutex<Vec<FlowRequest>>,
}

#[async_trait]
impl FlowRuntime for ScriptedFlow {
    async fn invoke(&self, request: &FlowRequest) -> Result<FlowEventStream, FlowError> {
        self.log.push(format!("flow:{}", request.input_ref));
        self.requests.lock().unwrap().push(request.clone());
        if let Some(message) = &self.reject {
            return Err(FlowError::Invocation(message.clone()));
        }
        let events: Vec<Result<FlowEvent, FlowError>> = self
            .documents
            .iter()
            .map(|doc| {
                Ok(FlowEvent::Output {
                    document: Some(Value::String(doc.clone())),
                })
            })
            .chain(std::iter::once(Ok(FlowEvent::Completion {
                reason: "SUCCESS".to_string(),
            })))
            .collect();
        Ok(futures::stream::iter(events).boxed())
    }
}

/// Catalog double.
pub struct StaticCatalog(pub Result<Vec<FlowSummary>, String>);

#[async_trait]
impl FlowCatalog for StaticCatalog {
    async fn list_flows(&self) -> Result<Vec<FlowSummary>, FlowError> {
        self.0.clone().map_err(FlowError::Catalog)
    }
}

/// Knobs for one test application.
pub struct TestAppOptions {
    pub extraction_response: Value,
    pub flow_documents: Vec<String>,
    pub flow_rejection: Option<String>,
    pub catalog: Result<Vec<FlowSummary>, String>,
    pub fail_storage_writes: bool,
    pub max_file_size_mb: u64,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            extraction_response: extraction_success("extracted document text"),
            flow_documents: vec![r#"[{"title":"Story 1"},{"title":"Story 2"}]"#.to_string()],
            flow_rejection: None,
            catalog: Ok(Vec::new()),
            fail_storage_writes: false,
            max_file_size_mb: 50,
        }
    }
}

/// Envelope returned by a healthy extraction function, with a string body.
pub fn extraction_success(text: &str) -> Value {
    let body = serde_json::json!({
        "results": { "uploads/file.pdf": { "extractedText": text } }
    });
    serde_json::json!({ "statusCode": 200, "body": body.to_string() })
}

/// Test application: server plus handles on every double.
pub struct TestApp {
    pub server: TestServer,
    pub log: CallLog,
    pub storage: Arc<MemoryStorage>,
    pub function: Arc<CannedFunction>,
    pub flow: Arc<ScriptedFlow>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(max_file_size_mb: u64) -> Config {
    let max = max_file_size_mb.to_string();
    Config::from_lookup(|key| match key {
        "S3_BUCKET" => Some(TEST_BUCKET.to_string()),
        "AWS_REGION" => Some("us-east-1".to_string()),
        "EXTRACTION_FUNCTION_NAME" => Some(TEST_FUNCTION.to_string()),
        "FLOW_IDENTIFIER" => Some(TEST_FLOW_ID.to_string()),
        "FLOW_ALIAS_IDENTIFIER" => Some(TEST_FLOW_ALIAS.to_string()),
        "MAX_FILE_SIZE_MB" => Some(max.clone()),
        _ => None,
    })
    .expect("Failed to build test config")
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(TestAppOptions::default())
}

pub fn setup_test_app_with(options: TestAppOptions) -> TestApp {
    let log = CallLog::default();
    let config = test_config(options.max_file_size_mb);

    let storage = Arc::new(MemoryStorage {
        log: log.clone(),
        objects: Mutex::new(HashMap::new()),
        fail_writes: options.fail_storage_writes,
    });
    let function = Arc::new(CannedFunction {
        log: log.clone(),
        response: serde_json::to_vec(&options.extraction_response).unwrap(),
        payloads: Mutex::new(Vec::new()),
    });
    let flow = Arc::new(ScriptedFlow {
        log: log.clone(),
        documents: options.flow_documents,
        reject: options.flow_rejection,
        requests: Mutex::new(Vec::new()),
    });

    let state = Arc::new(AppState {
        gateway: ObjectStoreGateway::new(storage.clone()),
        extraction: ExtractionInvoker::new(function.clone(), config.extraction_function_name.clone()),
        flow: FlowInvoker::new(
            flow.clone(),
            config.flow_identifier.clone(),
            config.flow_alias_identifier.clone(),
        ),
        catalog: Arc::new(StaticCatalog(options.catalog)),
        config: config.clone(),
    });

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        log,
        storage,
        function,
        flow,
    }
}
