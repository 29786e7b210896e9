use super::*;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReceivedPart {
    field: String,
    filename: String,
    content_type: String,
    len: usize,
}

#[derive(Clone, Default)]
struct Capture {
    parts: Arc<Mutex<Vec<ReceivedPart>>>,
    questions: Arc<Mutex<Vec<String>>>,
}

async fn spawn_server(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    addr
}

async fn record_upload(
    State(capture): State<Capture>,
    mut multipart: Multipart,
) -> Json<serde_json::Value> {
    let mut received = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("next multipart field") {
        received.push(ReceivedPart {
            field: field.name().unwrap_or_default().to_string(),
            filename: field.file_name().unwrap_or_default().to_string(),
            content_type: field.content_type().unwrap_or_default().to_string(),
            len: field.bytes().await.expect("field bytes").len(),
        });
    }
    let count = received.len();
    capture.parts.lock().await.extend(received);
    Json(serde_json::json!({
        "message": format!("Successfully processed {count} document(s).")
    }))
}

async fn record_ask(
    State(capture): State<Capture>,
    Json(request): Json<shared::protocol::AskRequest>,
) -> Json<serde_json::Value> {
    capture.questions.lock().await.push(request.question);
    Json(serde_json::json!({ "answer": "$1200/mo" }))
}

fn pdf_upload(filename: &str, bytes: &[u8]) -> DocumentUpload {
    DocumentUpload {
        filename: filename.to_string(),
        mime_type: "application/pdf".to_string(),
        bytes: bytes.to_vec(),
    }
}

#[tokio::test]
async fn upload_submits_each_file_as_a_files_part() {
    let capture = Capture::default();
    let router = Router::new()
        .route("/api/upload", post(record_upload))
        .with_state(capture.clone());
    let addr = spawn_server(router).await;

    let client = QaClient::new(format!("http://{addr}"));
    let outcome = client
        .upload_documents(vec![
            pdf_upload("lease.pdf", b"%PDF-1.7 lease body"),
            pdf_upload("addendum.pdf", b"%PDF-1.7 addendum body"),
        ])
        .await
        .expect("upload");

    assert_eq!(outcome.message, "Successfully processed 2 document(s).");
    assert_eq!(
        outcome.documents,
        vec![
            DocumentDescriptor::new("lease.pdf"),
            DocumentDescriptor::new("addendum.pdf"),
        ]
    );

    let parts = capture.parts.lock().await;
    assert_eq!(parts.len(), 2);
    assert!(parts
        .iter()
        .all(|part| part.field == "files" && part.content_type == "application/pdf"));
    assert_eq!(parts[0].filename, "lease.pdf");
    assert_eq!(parts[1].filename, "addendum.pdf");
    assert!(parts.iter().all(|part| part.len > 0));
}

#[tokio::test]
async fn upload_surfaces_server_error_field() {
    let router = Router::new().route(
        "/api/upload",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "Invalid PDF" })),
            )
        }),
    );
    let addr = spawn_server(router).await;

    let client = QaClient::new(format!("http://{addr}"));
    let err = client
        .upload_documents(vec![pdf_upload("lease.pdf", b"%PDF")])
        .await
        .expect_err("rejected upload");

    match err {
        ClientError::Server { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid PDF");
        }
        other => panic!("expected server rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_failure_body_degrades_to_generic_error() {
    let router = Router::new().route(
        "/api/upload",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "worker exploded") }),
    );
    let addr = spawn_server(router).await;

    let client = QaClient::new(format!("http://{addr}"));
    let err = client
        .upload_documents(vec![pdf_upload("lease.pdf", b"%PDF")])
        .await
        .expect_err("rejected upload");

    match err {
        ClientError::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, GENERIC_SERVER_ERROR);
        }
        other => panic!("expected server rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn ask_round_trips_question_and_answer() {
    let capture = Capture::default();
    let router = Router::new()
        .route("/api/ask", post(record_ask))
        .with_state(capture.clone());
    let addr = spawn_server(router).await;

    let client = QaClient::new(format!("http://{addr}"));
    let answer = client.ask("What is the rent?").await.expect("ask");

    assert_eq!(answer, "$1200/mo");
    assert_eq!(*capture.questions.lock().await, vec!["What is the rent?"]);
}

#[tokio::test]
async fn ask_surfaces_server_error_field() {
    let router = Router::new().route(
        "/api/ask",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "Please upload and process documents first."
                })),
            )
        }),
    );
    let addr = spawn_server(router).await;

    let client = QaClient::new(format!("http://{addr}"));
    let err = client.ask("What is the rent?").await.expect_err("rejected ask");

    assert!(err.is_server_rejection());
    assert_eq!(err.to_string(), "Please upload and process documents first.");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind then drop so the port is known-dead.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let client = QaClient::new(format!("http://{addr}"));
    let err = client.ask("anyone home?").await.expect_err("dead server");

    assert!(matches!(err, ClientError::Transport(_)));
}

#[tokio::test]
async fn trailing_slash_in_server_url_is_tolerated() {
    let capture = Capture::default();
    let router = Router::new()
        .route("/api/ask", post(record_ask))
        .with_state(capture.clone());
    let addr = spawn_server(router).await;

    let client = QaClient::new(format!("http://{addr}/"));
    assert_eq!(client.server_url(), format!("http://{addr}"));
    let answer = client.ask("still works?").await.expect("ask");
    assert_eq!(answer, "$1200/mo");
}
