//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one structured line per
//! [`TransferEvent`] through the `log` facade. The host binary routes that
//! to stderr via `env_logger`.

use log::{debug, info, warn};

use crate::app::events::TransferEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`TransferEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &TransferEvent) {
        match event {
            TransferEvent::CommandReceived { keyword } => {
                debug!("CMD | {}", keyword);
            }
            TransferEvent::CommentReceived(text) => {
                info!("COMMENT | {}", text);
            }
            TransferEvent::DownloadStarted {
                filename,
                encoded_len,
            } => {
                info!("DOWNLOAD | start '{}' encoded_len={}", filename, encoded_len);
            }
            TransferEvent::DownloadCompleted { filename } => {
                info!("DOWNLOAD | done '{}'", filename);
            }
            TransferEvent::UploadStarted { filename } => {
                info!("UPLOAD | start '{}'", filename);
            }
            TransferEvent::UploadSaved { filename, bytes } => {
                info!("UPLOAD | saved '{}' bytes={}", filename, bytes);
            }
            TransferEvent::UploadFailed { filename, reason } => {
                warn!("UPLOAD | failed '{}' reason={}", filename, reason);
            }
            TransferEvent::CommandFailed { kind } => {
                debug!("CMD | failed kind={}", kind);
            }
        }
    }
}
