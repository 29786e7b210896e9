use serde::{Deserialize, Serialize};

/// Success body of `POST /api/upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
}

/// Request body of `POST /api/ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Success body of `POST /api/ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Failure body for both endpoints on any non-success status. Responses
/// that do not match this shape degrade to a generic error message on the
/// client side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFailure {
    pub error: String,
}
