//! UI/backend events and error modeling for the desktop controller.

use client_core::{ClientError, UploadOutcome};

/// Notifications carried from the backend worker to the UI thread. The
/// worker sends exactly one of the paired terminal events per queued
/// command, so the reducer can clear its busy flag unconditionally.
pub enum UiEvent {
    UploadFinished(UploadOutcome),
    UploadFailed(UiError),
    AnswerReceived(String),
    AskFailed(UiError),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Server,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Upload,
    Ask,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("connection")
            || message_lower.contains("dns")
            || message_lower.contains("timed out")
            || message_lower.contains("timeout")
            || message_lower.contains("network")
            || message_lower.contains("unreachable")
            || message_lower.contains("failed to read")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Server { .. } => UiErrorCategory::Server,
            ClientError::Transport(_) => UiErrorCategory::Transport,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    /// Backend-startup failures halt the session; everything else leaves the
    /// controller ready for the next user action.
    pub fn is_fatal(&self) -> bool {
        self.context == UiErrorContext::BackendStartup
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_connection_failures_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::Ask,
            "error sending request: connection refused",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(!err.is_fatal());
    }

    #[test]
    fn classifies_server_rejections_from_client_error() {
        let client_err = ClientError::Server {
            status: 400,
            message: "Invalid PDF".to_string(),
        };
        let err = UiError::from_client_error(UiErrorContext::Upload, &client_err);
        assert_eq!(err.category(), UiErrorCategory::Server);
        assert_eq!(err.message(), "Invalid PDF");
    }

    #[test]
    fn backend_startup_errors_are_fatal() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "backend worker startup failure: failed to build runtime: oom",
        );
        assert!(err.is_fatal());
    }
}
