//! Session state and phase transitions for the chat client.
//!
//! All mutable session state lives here, owned by the app instance. The
//! reducer is pure with respect to time (callers pass `Instant`), so every
//! transition is testable without a display surface or a real clock. The
//! busy flag is checked only at the two request entry points; nothing else
//! gates submissions.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use client_core::UploadOutcome;
use shared::domain::{DocumentDescriptor, MessageRole};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Fixed duration of the hero screen fade-out.
pub const HERO_FADE: Duration = Duration::from_millis(600);
/// Lifetime of a transient toast.
pub const TOAST_TTL: Duration = Duration::from_millis(4000);

pub const GREETING: &str = "Your documents are processed! Ask me anything.";
pub const THINKING_PLACEHOLDER: &str = "Thinking...";
pub const PDF_ONLY_TOAST: &str = "Please select PDF files only.";
pub const UPLOAD_IN_PROGRESS_TOAST: &str = "Processing document...";
pub const SUMMARIZE_QUESTION: &str = "Summarize the uploaded documents in a few sentences.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    Hero,
    Welcome,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastSeverity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub severity: ToastSeverity,
    pub text: String,
    pub raised_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub text: String,
}

pub struct SessionState {
    phase: AppPhase,
    hero_fade_started: Option<Instant>,
    busy: bool,
    fatal: Option<String>,
    documents: Vec<DocumentDescriptor>,
    transcript: Vec<ChatTurn>,
    thinking: bool,
    toasts: Vec<Toast>,
    scroll_to_bottom: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: AppPhase::Hero,
            hero_fade_started: None,
            busy: false,
            fatal: None,
            documents: Vec::new(),
            transcript: Vec::new(),
            thinking: false,
            toasts: Vec::new(),
            scroll_to_bottom: false,
        }
    }

    pub fn phase(&self) -> AppPhase {
        self.phase
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    pub fn fatal(&self) -> Option<&str> {
        self.fatal.as_deref()
    }

    pub fn documents(&self) -> &[DocumentDescriptor] {
        &self.documents
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Consumes the pending forced-scroll request, if any.
    pub fn take_scroll_to_bottom(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_bottom)
    }

    /// Expires old toasts and completes an elapsed hero fade.
    pub fn tick(&mut self, now: Instant) {
        self.toasts
            .retain(|toast| now.duration_since(toast.raised_at) < TOAST_TTL);
        if let Some(started) = self.hero_fade_started {
            if now.duration_since(started) >= HERO_FADE {
                self.hero_fade_started = None;
                self.phase = AppPhase::Welcome;
            }
        }
    }

    pub fn begin_hero_fade(&mut self, now: Instant) {
        if self.phase == AppPhase::Hero && self.hero_fade_started.is_none() {
            self.hero_fade_started = Some(now);
        }
    }

    pub fn is_hero_fading(&self) -> bool {
        self.hero_fade_started.is_some()
    }

    /// Opacity of the hero screen: 1.0 when idle, falling to 0.0 over the
    /// fixed fade duration.
    pub fn hero_opacity(&self, now: Instant) -> f32 {
        match self.hero_fade_started {
            Some(started) => {
                let elapsed = now.duration_since(started).as_secs_f32();
                (1.0 - elapsed / HERO_FADE.as_secs_f32()).clamp(0.0, 1.0)
            }
            None => 1.0,
        }
    }

    /// Entry point for both click-to-browse and drag-and-drop selections.
    /// Filters to PDF media types, raises the validation toast when nothing
    /// qualifies, and otherwise marks the session busy and yields the
    /// command to queue. While busy the submission has no observable effect.
    pub fn request_upload(
        &mut self,
        selected: Vec<PathBuf>,
        now: Instant,
    ) -> Option<BackendCommand> {
        if self.fatal.is_some() || self.busy {
            return None;
        }
        let paths = filter_pdf_files(selected);
        if paths.is_empty() {
            self.push_toast(ToastSeverity::Error, PDF_ONLY_TOAST, now);
            return None;
        }
        self.busy = true;
        self.push_toast(ToastSeverity::Info, UPLOAD_IN_PROGRESS_TOAST, now);
        Some(BackendCommand::UploadDocuments { paths })
    }

    /// Entry point for the send action. Trims the composer text; empty
    /// input and busy sessions are ignored. The user turn is appended
    /// before the request is queued.
    pub fn request_ask(&mut self, input: &str) -> Option<BackendCommand> {
        if self.fatal.is_some() || self.busy {
            return None;
        }
        let question = input.trim();
        if question.is_empty() {
            return None;
        }
        self.transcript.push(ChatTurn {
            role: MessageRole::User,
            text: question.to_string(),
        });
        self.busy = true;
        self.thinking = true;
        self.scroll_to_bottom = true;
        Some(BackendCommand::Ask {
            question: question.to_string(),
        })
    }

    /// The summarize action funnels a canned question through the ask flow,
    /// under the same busy guard.
    pub fn request_summarize(&mut self) -> Option<BackendCommand> {
        if self.phase != AppPhase::Chat {
            return None;
        }
        self.request_ask(SUMMARIZE_QUESTION)
    }

    /// Rolls back a request whose command could not be queued, so the busy
    /// flag never outlives an in-flight request.
    pub fn abort_dispatch(&mut self, reason: &str, now: Instant) {
        self.busy = false;
        self.thinking = false;
        self.push_toast(ToastSeverity::Error, reason, now);
    }

    pub fn apply_event(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::UploadFinished(UploadOutcome { message, documents }) => {
                self.busy = false;
                self.documents.extend(documents);
                self.phase = AppPhase::Chat;
                self.transcript.push(ChatTurn {
                    role: MessageRole::Assistant,
                    text: GREETING.to_string(),
                });
                self.push_toast(ToastSeverity::Success, message, now);
                self.scroll_to_bottom = true;
            }
            UiEvent::UploadFailed(err) => {
                self.busy = false;
                self.push_toast(ToastSeverity::Error, format!("Error: {}", err.message()), now);
            }
            UiEvent::AnswerReceived(answer) => {
                self.busy = false;
                self.thinking = false;
                self.transcript.push(ChatTurn {
                    role: MessageRole::Assistant,
                    text: answer,
                });
                self.scroll_to_bottom = true;
            }
            UiEvent::AskFailed(err) => {
                self.busy = false;
                self.thinking = false;
                self.transcript.push(ChatTurn {
                    role: MessageRole::Assistant,
                    text: format!("Error: {}", err.message()),
                });
                self.scroll_to_bottom = true;
            }
            UiEvent::Error(err) => {
                if err.is_fatal() {
                    self.busy = false;
                    self.thinking = false;
                    self.fatal = Some(err.message().to_string());
                } else {
                    self.push_toast(ToastSeverity::Error, err.message().to_string(), now);
                }
            }
        }
    }

    fn push_toast(&mut self, severity: ToastSeverity, text: impl Into<String>, now: Instant) {
        self.toasts.push(Toast {
            severity,
            text: text.into(),
            raised_at: now,
        });
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn is_pdf(path: &Path) -> bool {
    mime_guess::from_path(path).first_or_octet_stream() == mime_guess::mime::APPLICATION_PDF
}

pub(crate) fn filter_pdf_files(selected: Vec<PathBuf>) -> Vec<PathBuf> {
    selected.into_iter().filter(|path| is_pdf(path)).collect()
}
