//! File-transfer service: the command dispatcher.
//!
//! [`FileTransferService`] owns the two session managers and the response
//! mailbox. Every write from the central is parsed, routed, and its result
//! (success or error, always a payload) lands in the mailbox. That write is
//! the only side effect the transport can observe.
//!
//! ```text
//!                     ┌──────────────────────────────┐
//!  command bytes ──▶  │     FileTransferService      │ ──▶ EventSink
//!                     │  parse · route · serialise   │
//!  FileStorePort ◀──▶ │  DownloadCache  Uploads      │
//!                     └──────────────┬───────────────┘
//!                                    ▼
//!                             ResponseMailbox ──▶ read request
//! ```
//!
//! Dispatch is synchronous and assumes one command at a time. Bindings that
//! deliver events concurrently wrap the whole service in one mutex.

use log::{debug, info};

use crate::error::TransferError;
use crate::protocol::chunked::DEFAULT_CHUNK_SIZE;
use crate::protocol::response::Response;

use super::commands::Command;
use super::download::{DownloadCache, DownloadChunk};
use super::events::TransferEvent;
use super::mailbox::ResponseMailbox;
use super::ports::{EventSink, FileStorePort};
use super::upload::{UploadProgress, UploadReassembler};

// ───────────────────────────────────────────────────────────────
// FileTransferService
// ───────────────────────────────────────────────────────────────

pub struct FileTransferService<S, E> {
    store: S,
    sink: E,
    downloads: DownloadCache,
    uploads: UploadReassembler,
    mailbox: ResponseMailbox,
}

impl<S: FileStorePort, E: EventSink> FileTransferService<S, E> {
    /// Service with the default 300-unit chunk size.
    pub fn new(store: S, sink: E) -> Self {
        Self::with_chunk_size(store, sink, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(store: S, sink: E, chunk_size: usize) -> Self {
        Self {
            store,
            sink,
            downloads: DownloadCache::new(chunk_size),
            uploads: UploadReassembler::new(),
            mailbox: ResponseMailbox::new(),
        }
    }

    // ── Transport-facing ──────────────────────────────────────

    /// Handle one write from the central: parse, dispatch, fill the mailbox.
    pub fn handle_write(&mut self, value: &[u8]) {
        let response = match Command::parse_bytes(value) {
            Ok(command) => self.dispatch(command),
            Err(e) => self.fail(TransferError::Parse(e)),
        };
        self.mailbox.write(response.to_payload());
    }

    /// Current mailbox content for a read request.
    pub fn read_response(&self) -> &[u8] {
        self.mailbox.read()
    }

    // ── Command routing ───────────────────────────────────────

    /// Route a parsed command and return its response. Does not touch the
    /// mailbox; [`handle_write`](Self::handle_write) does that.
    pub fn dispatch(&mut self, command: Command) -> Response {
        self.sink.emit(&TransferEvent::CommandReceived {
            keyword: keyword(&command),
        });
        match command {
            Command::List => self.list_files(),
            Command::Download { filename, offset } => self.download(&filename, offset),
            Command::UploadChunk {
                filename,
                range_start,
                payload,
                final_chunk,
            } => self.upload(&filename, range_start, &payload, final_chunk),
            Command::Comment { text } => {
                self.sink.emit(&TransferEvent::CommentReceived(text.clone()));
                Response::CommentReceived(text)
            }
            Command::Unrecognized { raw } => {
                debug!("unrecognised command ({} bytes)", raw.len());
                self.fail(TransferError::Unrecognized)
            }
        }
    }

    fn list_files(&mut self) -> Response {
        match self.store.list() {
            Ok(mut names) => {
                names.sort();
                Response::Files(names)
            }
            Err(e) => self.fail(TransferError::List {
                detail: e.to_string(),
            }),
        }
    }

    fn download(&mut self, filename: &str, offset: usize) -> Response {
        match self.downloads.request_chunk(&self.store, filename, offset) {
            Ok(chunk) => {
                self.report_download(&chunk);
                Response::Chunk {
                    filename: chunk.filename,
                    start: chunk.range.start,
                    end: chunk.range.end,
                    data: chunk.data,
                    status: chunk.range.status,
                }
            }
            Err(e) => self.fail(e),
        }
    }

    fn upload(
        &mut self,
        filename: &str,
        range_start: usize,
        payload: &str,
        final_chunk: bool,
    ) -> Response {
        let result =
            self.uploads
                .submit_chunk(&mut self.store, filename, range_start, payload, final_chunk);
        match result {
            Ok(UploadProgress::Continue { filename, started }) => {
                if started {
                    self.sink.emit(&TransferEvent::UploadStarted {
                        filename: filename.clone(),
                    });
                }
                Response::UploadContinue { filename }
            }
            Ok(UploadProgress::Saved { filename, bytes }) => {
                info!("upload: '{}' saved ({} bytes)", filename, bytes);
                // The old encoded length no longer describes the file.
                self.downloads.forget_completed(&filename);
                self.sink.emit(&TransferEvent::UploadSaved {
                    filename: filename.clone(),
                    bytes,
                });
                Response::UploadSuccess { filename }
            }
            Err(e) => {
                if matches!(e, TransferError::Decode { .. } | TransferError::Write { .. }) {
                    self.sink.emit(&TransferEvent::UploadFailed {
                        filename: filename.to_owned(),
                        reason: e.kind(),
                    });
                }
                self.fail(e)
            }
        }
    }

    fn report_download(&mut self, chunk: &DownloadChunk) {
        if chunk.started {
            self.sink.emit(&TransferEvent::DownloadStarted {
                filename: chunk.filename.clone(),
                encoded_len: chunk.encoded_len,
            });
        }
        // Late polls replay an empty DONE; only the evicting request counts.
        let evicted_now = chunk.started || !chunk.range.is_empty();
        if chunk.is_final() && evicted_now {
            self.sink.emit(&TransferEvent::DownloadCompleted {
                filename: chunk.filename.clone(),
            });
        }
    }

    fn fail(&mut self, error: TransferError) -> Response {
        self.sink.emit(&TransferEvent::CommandFailed { kind: error.kind() });
        Response::Error(error)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mailbox(&self) -> &ResponseMailbox {
        &self.mailbox
    }

    pub fn downloads(&self) -> &DownloadCache {
        &self.downloads
    }

    pub fn uploads(&self) -> &UploadReassembler {
        &self.uploads
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }
}

/// Keyword tag for a command, for events and logs.
fn keyword(command: &Command) -> &'static str {
    match command {
        Command::List => "LIST",
        Command::Download { .. } => "DOWNLOAD",
        Command::UploadChunk { .. } => "UPLOADCHUNK",
        Command::Comment { .. } => "COMMENT",
        Command::Unrecognized { .. } => "UNRECOGNIZED",
    }
}

// ── Tests ────────────────────────────────────────────────────
