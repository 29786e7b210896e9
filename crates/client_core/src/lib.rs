//! HTTP client for the document question-answering backend.
//!
//! Wraps the two endpoints the desktop UI talks to: multipart document
//! upload and JSON question submission. [`QaBackend`] is the seam the UI's
//! worker thread is written against, so tests can substitute a stub for the
//! real [`QaClient`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use shared::{
    domain::DocumentDescriptor,
    protocol::{ApiFailure, AskRequest, AskResponse, UploadResponse},
};
use tracing::debug;

pub mod error;

pub use error::ClientError;

/// Fallback used when a failure response does not carry a parseable
/// `{"error": ...}` body.
pub const GENERIC_SERVER_ERROR: &str = "Server error";

/// One file queued for upload, already read into memory.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Result of a successful upload round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    /// Server-provided status text, surfaced verbatim in the UI.
    pub message: String,
    pub documents: Vec<DocumentDescriptor>,
}

#[async_trait]
pub trait QaBackend: Send + Sync {
    async fn upload_documents(
        &self,
        files: Vec<DocumentUpload>,
    ) -> Result<UploadOutcome, ClientError>;

    async fn ask(&self, question: &str) -> Result<String, ClientError>;
}

pub struct QaClient {
    http: Client,
    server_url: String,
}

impl QaClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url = server_url.into();
        Self {
            http: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Turns a non-success response into a [`ClientError::Server`],
    /// preserving the server's `error` text where the body parses.
    async fn rejection(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<ApiFailure>(&body)
                .map(|failure| failure.error)
                .unwrap_or_else(|_| GENERIC_SERVER_ERROR.to_string()),
            Err(_) => GENERIC_SERVER_ERROR.to_string(),
        };
        ClientError::Server { status, message }
    }
}

#[async_trait]
impl QaBackend for QaClient {
    async fn upload_documents(
        &self,
        files: Vec<DocumentUpload>,
    ) -> Result<UploadOutcome, ClientError> {
        // Descriptors are recorded from the submitted set, name only.
        let documents: Vec<DocumentDescriptor> = files
            .iter()
            .map(|file| DocumentDescriptor::new(file.filename.clone()))
            .collect();

        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.filename)
                .mime_str(&file.mime_type)?;
            form = form.part("files", part);
        }

        let response = self
            .http
            .post(format!("{}/api/upload", self.server_url))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: UploadResponse = response.json().await?;
        debug!(message = %body.message, count = documents.len(), "upload accepted");
        Ok(UploadOutcome {
            message: body.message,
            documents,
        })
    }

    async fn ask(&self, question: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/ask", self.server_url))
            .json(&AskRequest {
                question: question.to_string(),
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: AskResponse = response.json().await?;
        Ok(body.answer)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
