//! Upload pipeline integration tests.
//!
//! Run with: `cargo test -p genie-api --test upload_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{
    setup_test_app, setup_test_app_with, TestAppOptions, TEST_BUCKET, TEST_FLOW_ALIAS,
    TEST_FLOW_ID, TEST_FUNCTION,
};
use serde_json::{json, Value};

fn pdf_form(name: &str) -> MultipartForm {
    let part = Part::bytes(b"%PDF-1.4 test".to_vec())
        .file_name(name)
        .mime_type("application/pdf");
    MultipartForm::new().add_part("file", part)
}

#[tokio::test]
async fn test_upload_runs_every_stage_in_order() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/upload")
        .multipart(pdf_form("report.pdf"))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), "File uploaded successfully");

    let log = app.log.entries();
    assert_eq!(log.len(), 4, "unexpected calls: {:?}", log);
    assert!(log[0].starts_with("put:uploads/"));
    assert!(log[0].ends_with("-report.pdf"));
    assert_eq!(log[1], format!("invoke:{}", TEST_FUNCTION));
    assert_eq!(log[2], "put:input/report.pdf-extracted.txt");
    assert_eq!(log[3], "flow:input/report.pdf-extracted.txt");
}

#[tokio::test]
async fn test_upload_sends_object_url_and_stores_text() {
    let app = setup_test_app();

    app.client()
        .post("/api/upload")
        .multipart(pdf_form("report.pdf"))
        .await
        .assert_status_ok();

    let upload_key = app.log.entries()[0]
        .trim_start_matches("put:")
        .to_string();
    let payloads = app.function.payloads.lock().unwrap();
    assert_eq!(
        payloads[0],
        json!({ "fileUrls": [format!("https://{}.s3.amazonaws.com/{}", TEST_BUCKET, upload_key)] })
    );

    let objects = app.storage.objects.lock().unwrap();
    let (data, content_type) = &objects["input/report.pdf-extracted.txt"];
    assert_eq!(data.as_slice(), b"extracted document text");
    assert_eq!(content_type.as_deref(), Some("text/plain"));
    let (_, upload_type) = &objects[&upload_key];
    assert_eq!(upload_type.as_deref(), Some("application/pdf"));

    let requests = app.flow.requests.lock().unwrap();
    assert_eq!(requests[0].flow_identifier, TEST_FLOW_ID);
    assert_eq!(requests[0].flow_alias_identifier, TEST_FLOW_ALIAS);
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected_before_storage() {
    let app = setup_test_app();

    let form = MultipartForm::new().add_text("description", "no file here");
    let response = app.client().post("/api/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), "No file uploaded.");
    assert!(app.log.entries().is_empty());
}

#[tokio::test]
async fn test_text_field_named_file_is_not_an_upload() {
    let app = setup_test_app();

    let form = MultipartForm::new().add_text("file", "just some text, not a file");
    let response = app.client().post("/api/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), "No file uploaded.");
    assert!(app.log.entries().is_empty());
}

#[tokio::test]
async fn test_upload_without_multipart_body_is_rejected() {
    let app = setup_test_app();

    let response = app.client().post("/api/upload").await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), "No file uploaded.");
    assert!(app.log.entries().is_empty());
}

#[tokio::test]
async fn test_upload_with_two_files_is_rejected() {
    let app = setup_test_app();

    let form = pdf_form("a.pdf").add_part(
        "file",
        Part::bytes(b"second".to_vec())
            .file_name("b.pdf")
            .mime_type("application/pdf"),
    );
    let response = app.client().post("/api/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(app.log.entries().is_empty());
}

#[tokio::test]
async fn test_extraction_error_status_surfaces_remote_message() {
    let app = setup_test_app_with(TestAppOptions {
        extraction_response: json!({ "statusCode": 500, "message": "Unsupported document" }),
        ..Default::default()
    });

    let response = app
        .client()
        .post("/api/upload")
        .multipart(pdf_form("scan.tiff"))
        .await;

    assert_eq!(response.status_code(), 502);
    let body: Value = response.json();
    assert_eq!(body["error"], "Unsupported document");
    assert_eq!(body["code"], "EXTRACTION_SERVICE_ERROR");

    // Nothing after extraction ran.
    let log = app.log.entries();
    assert_eq!(log.len(), 2);
    assert!(app.flow.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_results_object_is_malformed_body() {
    let app = setup_test_app_with(TestAppOptions {
        extraction_response: json!({ "statusCode": 200, "body": "{\"results\":null}" }),
        ..Default::default()
    });

    let response = app
        .client()
        .post("/api/upload")
        .multipart(pdf_form("report.pdf"))
        .await;

    assert_eq!(response.status_code(), 502);
    let body: Value = response.json();
    assert_eq!(body["code"], "MALFORMED_EXTRACTION_BODY");
    assert_eq!(app.log.entries().len(), 2);
}

#[tokio::test]
async fn test_empty_extraction_result_stores_nothing() {
    let app = setup_test_app_with(TestAppOptions {
        extraction_response: json!({ "statusCode": 200, "body": { "results": {} } }),
        ..Default::default()
    });

    let response = app
        .client()
        .post("/api/upload")
        .multipart(pdf_form("blank.pdf"))
        .await;

    assert_eq!(response.status_code(), 502);
    let objects = app.storage.objects.lock().unwrap();
    assert_eq!(objects.len(), 1, "only the original upload is stored");
}

#[tokio::test]
async fn test_storage_failure_stops_pipeline() {
    let app = setup_test_app_with(TestAppOptions {
        fail_storage_writes: true,
        ..Default::default()
    });

    let response = app
        .client()
        .post("/api/upload")
        .multipart(pdf_form("report.pdf"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "STORAGE_ERROR");
    assert_eq!(app.log.entries().len(), 1);
    assert!(app.function.payloads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_flow_rejection_is_bad_gateway() {
    let app = setup_test_app_with(TestAppOptions {
        flow_rejection: Some("ResourceNotFoundException: flow not found".to_string()),
        ..Default::default()
    });

    let response = app
        .client()
        .post("/api/upload")
        .multipart(pdf_form("report.pdf"))
        .await;

    assert_eq!(response.status_code(), 502);
    let body: Value = response.json();
    assert_eq!(body["code"], "FLOW_INVOCATION_ERROR");
    // Objects already written stay in place.
    assert_eq!(app.storage.objects.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unparseable_flow_chunks_do_not_fail_upload() {
    let app = setup_test_app_with(TestAppOptions {
        flow_documents: vec![
            r#"{"title":"Story 1"}"#.to_string(),
            "not json".to_string(),
        ],
        ..Default::default()
    });

    app.client()
        .post("/api/upload")
        .multipart(pdf_form("report.pdf"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_flow_without_usable_output_fails_upload() {
    let app = setup_test_app_with(TestAppOptions {
        flow_documents: vec!["not json".to_string(), "42".to_string()],
        ..Default::default()
    });

    let response = app
        .client()
        .post("/api/upload")
        .multipart(pdf_form("report.pdf"))
        .await;

    assert_eq!(response.status_code(), 502);
    let body: Value = response.json();
    assert_eq!(body["code"], "FLOW_INVOCATION_ERROR");
    assert_eq!(app.log.entries().len(), 4);
    assert_eq!(app.storage.objects.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_flow_without_output_events_succeeds() {
    let app = setup_test_app_with(TestAppOptions {
        flow_documents: Vec::new(),
        ..Default::default()
    });

    app.client()
        .post("/api/upload")
        .multipart(pdf_form("report.pdf"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_only_first_text_is_used() {
    let body = json!({
        "results": {
            "uploads/a.pdf": { "extractedText": "only text" },
            "uploads/b.pdf": { "error": "unreadable" }
        }
    });
    let app = setup_test_app_with(TestAppOptions {
        extraction_response: json!({ "statusCode": 200, "body": body }),
        ..Default::default()
    });

    app.client()
        .post("/api/upload")
        .multipart(pdf_form("a.pdf"))
        .await
        .assert_status_ok();

    let objects = app.storage.objects.lock().unwrap();
    assert_eq!(objects["input/a.pdf-extracted.txt"].0.as_slice(), b"only text");
}

#[tokio::test]
async fn test_oversized_file_is_rejected() {
    let app = setup_test_app_with(TestAppOptions {
        max_file_size_mb: 1,
        ..Default::default()
    });

    let part = Part::bytes(vec![0u8; 1024 * 1024 + 128 * 1024])
        .file_name("big.bin")
        .mime_type("application/octet-stream");
    let response = app
        .client()
        .post("/api/upload")
        .multipart(MultipartForm::new().add_part("file", part))
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(app.log.entries().is_empty());
}
