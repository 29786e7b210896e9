//! Worker thread bridging the UI command queue to the backend client.
//!
//! The worker owns its tokio runtime; the UI thread never blocks on the
//! network. Every queued command produces exactly one terminal [`UiEvent`],
//! which is what lets the reducer clear its busy flag unconditionally.

use std::path::{Path, PathBuf};
use std::thread;

use anyhow::Context;
use client_core::{DocumentUpload, QaBackend, QaClient};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn spawn_backend_thread(
    server_url: String,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = QaClient::new(server_url);
            tracing::info!(server_url = client.server_url(), "backend worker ready");
            while let Ok(cmd) = cmd_rx.recv() {
                handle_command(&client, cmd, &ui_tx).await;
            }
        });
    });
}

/// Executes one queued command and reports its terminal event.
pub(crate) async fn handle_command<B: QaBackend>(
    backend: &B,
    cmd: BackendCommand,
    ui_tx: &Sender<UiEvent>,
) {
    match cmd {
        BackendCommand::UploadDocuments { paths } => {
            // A read failure fails the whole upload; no partial request.
            let files = match read_uploads(&paths).await {
                Ok(files) => files,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::UploadFailed(UiError::from_message(
                        UiErrorContext::Upload,
                        format!("{err:#}"),
                    )));
                    return;
                }
            };
            let event = match backend.upload_documents(files).await {
                Ok(outcome) => UiEvent::UploadFinished(outcome),
                Err(err) => {
                    UiEvent::UploadFailed(UiError::from_client_error(UiErrorContext::Upload, &err))
                }
            };
            let _ = ui_tx.try_send(event);
        }
        BackendCommand::Ask { question } => {
            let event = match backend.ask(&question).await {
                Ok(answer) => UiEvent::AnswerReceived(answer),
                Err(err) => {
                    UiEvent::AskFailed(UiError::from_client_error(UiErrorContext::Ask, &err))
                }
            };
            let _ = ui_tx.try_send(event);
        }
    }
}

async fn read_uploads(paths: &[PathBuf]) -> anyhow::Result<Vec<DocumentUpload>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        files.push(DocumentUpload {
            filename: file_name_of(path),
            mime_type: mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
            bytes,
        });
    }
    Ok(files)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document.pdf")
        .to_string()
}
