//! Backend commands queued from UI to the backend worker.

use std::path::PathBuf;

pub enum BackendCommand {
    UploadDocuments { paths: Vec<PathBuf> },
    Ask { question: String },
}
