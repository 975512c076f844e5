//! Outbound events emitted by the transfer core.
//!
//! These are observability only: the wire response never depends on
//! whether a sink is attached.

/// Events the core publishes via [`EventSink`](super::ports::EventSink).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEvent {
    /// A command arrived (keyword only, never payload).
    CommandReceived { keyword: &'static str },

    /// Free-text comment from the central.
    CommentReceived(String),

    /// Offset-0 request cached a fresh encoded copy.
    DownloadStarted { filename: String, encoded_len: usize },

    /// Final chunk served; session evicted.
    DownloadCompleted { filename: String },

    /// Upload session created by a range-0 fragment.
    UploadStarted { filename: String },

    /// Upload decoded and persisted.
    UploadSaved { filename: String, bytes: usize },

    /// Upload session evicted without persisting.
    UploadFailed { filename: String, reason: &'static str },

    /// A command produced an error payload.
    CommandFailed { kind: &'static str },
}
