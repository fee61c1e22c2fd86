use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use super::build_router;
use crate::config::Config;
use crate::export::options::ImageFormat;
use crate::export::{ExportError, ExportGuard, ExportOptions, PdfExporter, RasterPdfExporter};
use crate::layout::PreviewDocument;
use crate::state::AppState;
use crate::storage::memory::MemoryStorage;
use crate::storage::ObjectStorage;
use crate::store::DocumentStore;

fn test_state(export_dir: &std::path::Path) -> AppState {
    AppState {
        documents: DocumentStore::new(),
        exporter: Arc::new(RasterPdfExporter),
        export_guard: ExportGuard::new(),
        storage: None,
        llm: None,
        config: Config::for_tests(export_dir.to_path_buf()),
    }
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, headers, bytes)
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

async fn create_document(app: &Router, fields: Value) -> Uuid {
    let (status, _, body) = send(app, "POST", "/api/v1/documents", Some(json!({ "fields": fields }))).await;
    assert_eq!(status, StatusCode::CREATED);
    json_body(&body)["id"].as_str().unwrap().parse().unwrap()
}

fn error_code(bytes: &[u8]) -> String {
    json_body(bytes)["error"]["code"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_reports_optional_integrations() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(dir.path()));
    let (status, _, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], false);
    assert_eq!(body["assistant"], false);
}

#[tokio::test]
async fn test_message_replacement_updates_displayed_text() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(dir.path()));
    let id = create_document(&app, json!([])).await;

    let (status, _, body) = send(
        &app,
        "POST",
        &format!("/api/v1/documents/{id}/fields"),
        Some(json!({ "field": "message", "value": "Hello World" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json_body(&body)["preview_text"].as_str().unwrap().contains("Hello World"));

    let (status, _, body) = send(
        &app,
        "POST",
        &format!("/api/v1/documents/{id}/fields/message/replace"),
        Some(json!({ "find": "Hello World", "replacement": "PDF system integration test" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["value"], "PDF system integration test");
    assert_eq!(body["replacements"], 1);
    let preview_text = body["preview_text"].as_str().unwrap();
    assert!(preview_text.contains("PDF system integration test"));
    assert!(!preview_text.contains("Hello World"));

    let (status, _, html) = send(&app, "GET", &format!("/api/v1/documents/{id}/preview"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(html).unwrap().contains("PDF system integration test"));
}

#[tokio::test]
async fn test_editor_page_renders_labeled_controls() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(dir.path()));
    let id = create_document(&app, json!([{ "field": "full_name", "value": "Ada Lovelace" }])).await;

    let (status, headers, html) = send(&app, "GET", &format!("/api/v1/documents/{id}/editor"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    let html = String::from_utf8(html).unwrap();
    assert!(html.contains("<label for=\"message\">Message</label>"));
    assert!(html.contains("value=\"Ada Lovelace\""));
    assert!(html.contains("class=\"backdrop\""));
}

fn backdrop_of(html: &str) -> &str {
    let start = html.find("<div class=\"backdrop\"").unwrap();
    let end = start + html[start..].find("</svg></div>").unwrap();
    &html[start..end]
}

#[tokio::test]
async fn test_backdrop_is_independent_of_document() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(dir.path()));
    let first = create_document(&app, json!([{ "field": "full_name", "value": "Ada Lovelace" }])).await;
    let second = create_document(
        &app,
        json!([
            { "field": "headline", "value": "Compiler engineer" },
            { "field": "message", "value": "Hello World" }
        ]),
    )
    .await;

    let mut pages = Vec::new();
    for id in [&first, &second] {
        let (status, _, html) = send(&app, "GET", &format!("/api/v1/documents/{id}/editor"), None).await;
        assert_eq!(status, StatusCode::OK);
        pages.push(String::from_utf8(html).unwrap());
    }

    let a = backdrop_of(&pages[0]);
    let b = backdrop_of(&pages[1]);
    assert_eq!(a, b);
    let (first, second) = (first.to_string(), second.to_string());
    for value in ["Ada Lovelace", "Compiler engineer", "Hello World", first.as_str(), second.as_str()] {
        assert!(!a.contains(value), "backdrop leaked {value}");
    }
}

#[tokio::test]
async fn test_export_returns_pdf_download() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(dir.path()));
    let id = create_document(
        &app,
        json!([
            { "field": "full_name", "value": "Ada Lovelace" },
            { "field": "summary", "value": "Wrote the first published algorithm." }
        ]),
    )
    .await;

    for tier in ["standard", "improved"] {
        let (status, headers, body) = send(
            &app,
            "POST",
            &format!("/api/v1/documents/{id}/export"),
            Some(json!({ "tier": tier })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{tier} export failed");
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume.pdf\""
        );
        assert!(body.starts_with(b"%PDF-"));
    }
}

#[tokio::test]
async fn test_export_of_unknown_document_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(dir.path()));
    let (status, _, body) = send(
        &app,
        "POST",
        &format!("/api/v1/documents/{}/export", Uuid::new_v4()),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn test_concurrent_export_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path());
    let guard = state.export_guard.clone();
    let app = build_router(state);
    let id = create_document(&app, json!([])).await;

    let permit = guard.try_acquire(id).unwrap();
    let (status, _, body) = send(&app, "POST", &format!("/api/v1/documents/{id}/export"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "EXPORT_IN_PROGRESS");

    drop(permit);
    let (status, _, _) = send(&app, "POST", &format!("/api/v1/documents/{id}/export"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_options_are_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(dir.path()));
    let id = create_document(&app, json!([])).await;

    let mut options = serde_json::to_value(ExportOptions::default()).unwrap();
    options["canvas"]["scale"] = json!(-1.0);
    let (status, _, body) = send(
        &app,
        "POST",
        &format!("/api/v1/documents/{id}/export"),
        Some(json!({ "options": options })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "INVALID_EXPORT_OPTIONS");
}

#[tokio::test]
async fn test_export_as_data_uri_and_saved_file() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(dir.path()));
    let id = create_document(&app, json!([{ "field": "headline", "value": "Engineer" }])).await;

    let mut options = serde_json::to_value(ExportOptions::default()).unwrap();
    options["output"] = json!("data_uri");
    let (status, _, body) = send(
        &app,
        "POST",
        &format!("/api/v1/documents/{id}/export"),
        Some(json!({ "options": options })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json_body(&body)["data_uri"]
        .as_str()
        .unwrap()
        .starts_with("data:application/pdf;base64,JVBERi0"));

    options["output"] = json!("save");
    options["filename"] = json!("../engineer");
    let (status, _, body) = send(
        &app,
        "POST",
        &format!("/api/v1/documents/{id}/export"),
        Some(json!({ "options": options })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["filename"], "engineer.pdf");
    let saved = std::fs::read(dir.path().join("engineer.pdf")).unwrap();
    assert!(saved.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn test_upload_without_storage_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(dir.path()));
    let id = create_document(&app, json!([])).await;
    let (status, _, body) = send(
        &app,
        "POST",
        &format!("/api/v1/documents/{id}/export"),
        Some(json!({ "upload": true })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error_code(&body), "STORAGE_UNAVAILABLE");
}

#[tokio::test]
async fn test_upload_stores_pdf_under_export_key() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(MemoryStorage::default());
    let mut state = test_state(dir.path());
    state.storage = Some(storage.clone());
    let app = build_router(state);
    let id = create_document(&app, json!([])).await;

    let (status, headers, body) = send(
        &app,
        "POST",
        &format!("/api/v1/documents/{id}/export"),
        Some(json!({ "upload": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let key = format!("exports/{id}/resume.pdf");
    assert_eq!(headers["x-storage-key"], key.as_str());
    assert_eq!(storage.get_object(&key).await.unwrap(), body);
}

#[tokio::test]
async fn test_failed_save_does_not_upload() {
    let dir = tempfile::tempdir().unwrap();
    // A plain file where the export directory should be, so saving fails.
    let blocked = dir.path().join("not-a-dir");
    std::fs::write(&blocked, b"").unwrap();

    let storage = Arc::new(MemoryStorage::default());
    let mut state = test_state(&blocked);
    state.storage = Some(storage.clone());
    let app = build_router(state);
    let id = create_document(&app, json!([])).await;

    let mut options = serde_json::to_value(ExportOptions::default()).unwrap();
    options["output"] = json!("save");
    let (status, _, body) = send(
        &app,
        "POST",
        &format!("/api/v1/documents/{id}/export"),
        Some(json!({ "options": options, "upload": true })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_code(&body), "EXPORT_FAILED");
    assert!(storage.objects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_snapshot_and_restore_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(MemoryStorage::default());

    let mut first = test_state(dir.path());
    first.storage = Some(storage.clone());
    let app = build_router(first);
    let id = create_document(&app, json!([{ "field": "skills", "value": "Rust, Postgres" }])).await;
    let (status, _, body) = send(&app, "POST", &format!("/api/v1/documents/{id}/snapshot"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["key"], format!("documents/{id}.json"));

    // A fresh process: empty memory, same bucket.
    let mut second = test_state(dir.path());
    second.storage = Some(storage);
    let app = build_router(second);
    let (status, _, _) = send(&app, "GET", &format!("/api/v1/documents/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(&app, "POST", &format!("/api/v1/documents/{id}/restore"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, body) = send(&app, "GET", &format!("/api/v1/documents/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["skills"], "Rust, Postgres");
}

#[tokio::test]
async fn test_suggest_without_assistant_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(dir.path()));
    let id = create_document(&app, json!([{ "field": "summary", "value": "i code" }])).await;
    let (status, _, body) = send(
        &app,
        "POST",
        &format!("/api/v1/documents/{id}/fields/summary/suggest"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error_code(&body), "ASSISTANT_UNAVAILABLE");
}

#[tokio::test]
async fn test_unknown_field_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(dir.path()));
    let id = create_document(&app, json!([])).await;
    let (status, _, body) = send(
        &app,
        "POST",
        &format!("/api/v1/documents/{id}/fields/salary/replace"),
        Some(json!({ "find": "a", "replacement": "b" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

/// Captures the options each export was invoked with.
#[derive(Default)]
struct RecordingExporter {
    calls: Mutex<Vec<ExportOptions>>,
}

#[async_trait]
impl PdfExporter for RecordingExporter {
    async fn export(
        &self,
        _preview: PreviewDocument,
        options: ExportOptions,
    ) -> Result<Vec<u8>, ExportError> {
        self.calls.lock().unwrap().push(options);
        Ok(b"%PDF-1.5\n%%EOF".to_vec())
    }
}

#[tokio::test]
async fn test_improved_export_keeps_layout_fields_of_baseline() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(RecordingExporter::default());
    let mut state = test_state(dir.path());
    state.exporter = recorder.clone();
    let app = build_router(state);
    let id = create_document(&app, json!([])).await;

    for tier in ["standard", "improved"] {
        let (status, _, _) = send(
            &app,
            "POST",
            &format!("/api/v1/documents/{id}/export"),
            Some(json!({ "tier": tier })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let calls = recorder.calls.lock().unwrap();
    let (baseline, improved) = (&calls[0], &calls[1]);
    assert_eq!(baseline.image.format, ImageFormat::Jpeg);
    assert_eq!(improved.image.format, ImageFormat::Png);
    assert!(improved.image.quality >= baseline.image.quality);
    assert!(improved.canvas.scale > baseline.canvas.scale);
    assert_eq!(improved.margin, baseline.margin);
    assert_eq!(improved.filename, baseline.filename);
    assert_eq!(improved.page, baseline.page);
    assert_eq!(improved.pagebreak, baseline.pagebreak);
    assert_eq!(improved.output, baseline.output);
}
