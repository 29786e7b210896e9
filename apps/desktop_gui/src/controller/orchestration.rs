//! Command orchestration from UI actions into the backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    QueueFull,
    Disconnected,
}

impl DispatchError {
    pub fn user_message(self) -> &'static str {
        match self {
            DispatchError::QueueFull => "Too many pending requests; please retry",
            DispatchError::Disconnected => {
                "Backend worker disconnected (possible startup/runtime failure); restart the app"
            }
        }
    }
}

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), DispatchError> {
    let cmd_name = match &cmd {
        BackendCommand::UploadDocuments { .. } => "upload_documents",
        BackendCommand::Ask { .. } => "ask",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err(DispatchError::QueueFull),
        Err(TrySendError::Disconnected(_)) => Err(DispatchError::Disconnected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn reports_full_queue_without_panicking() {
        let (cmd_tx, _cmd_rx) = bounded(1);
        assert!(dispatch_backend_command(
            &cmd_tx,
            BackendCommand::Ask {
                question: "first".to_string()
            }
        )
        .is_ok());
        assert_eq!(
            dispatch_backend_command(
                &cmd_tx,
                BackendCommand::Ask {
                    question: "second".to_string()
                }
            ),
            Err(DispatchError::QueueFull)
        );
    }

    #[test]
    fn reports_disconnected_worker() {
        let (cmd_tx, cmd_rx) = bounded(1);
        drop(cmd_rx);
        assert_eq!(
            dispatch_backend_command(
                &cmd_tx,
                BackendCommand::Ask {
                    question: "anyone?".to_string()
                }
            ),
            Err(DispatchError::Disconnected)
        );
    }
}
