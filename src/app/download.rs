//! Download cache: per-filename encoded copies served in bounded chunks.
//!
//! An offset-0 request reads the whole file once, encodes it, and caches
//! the text. Later requests slice the cached text; the file is not
//! re-read, so the cached copy is authoritative until eviction.
//!
//! ```text
//! offset 0 ──▶ read + encode ──▶ session[f] ──▶ slice [off, off+chunk)
//!                                     │
//!                 end == len ─────────┴──▶ evict, remember len
//! ```
//!
//! Completed downloads remember their encoded length so a late or
//! duplicate final poll (offset at or past that length) still gets an empty
//! `DONE` chunk instead of an error. The memory is dropped on the next
//! offset-0 request for the same name.

use std::collections::HashMap;

use log::debug;

use crate::error::{Result, TransferError};
use crate::protocol::chunked::{self, ChunkRange};
use crate::protocol::codec;

use super::ports::{FileStorePort, StoreError};

/// One in-flight download.
struct DownloadSession {
    encoded: String,
}

/// Slice handed back for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadChunk {
    pub filename: String,
    pub range: ChunkRange,
    pub data: String,
    /// Encoded length of the whole file.
    pub encoded_len: usize,
    /// This request created the session.
    pub started: bool,
}

impl DownloadChunk {
    /// The session was evicted while serving this chunk or earlier.
    pub fn is_final(&self) -> bool {
        self.range.status.is_done()
    }
}

/// Per-filename download sessions plus completion records.
///
/// A completion record is one `usize` per distinct name downloaded to the
/// end. It lives until the next offset-0 request for that name, a saved
/// upload of that name ([`forget_completed`](Self::forget_completed)), or
/// [`clear`](Self::clear). Nothing else bounds the map.
pub struct DownloadCache {
    sessions: HashMap<String, DownloadSession>,
    completed: HashMap<String, usize>,
    chunk_size: usize,
}

impl DownloadCache {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            completed: HashMap::new(),
            chunk_size,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Serve the chunk of `filename` starting at `offset`.
    pub fn request_chunk(
        &mut self,
        store: &impl FileStorePort,
        filename: &str,
        offset: usize,
    ) -> Result<DownloadChunk> {
        let started = offset == 0;
        if started {
            self.start_session(store, filename)?;
        }

        let Some(session) = self.sessions.get(filename) else {
            return self.late_poll(filename, offset);
        };

        let encoded_len = session.encoded.len();
        let range = chunked::chunk_at(offset, encoded_len, self.chunk_size);
        let data = session.encoded[range.start.min(encoded_len)..range.end.min(encoded_len)]
            .to_owned();

        if range.status.is_done() {
            self.evict(filename, encoded_len);
        }

        Ok(DownloadChunk {
            filename: filename.to_owned(),
            range,
            data,
            encoded_len,
            started,
        })
    }

    /// Whether a session for `filename` is cached.
    pub fn is_active(&self, filename: &str) -> bool {
        self.sessions.contains_key(filename)
    }

    /// Number of cached sessions.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Drop the completion record for `filename`. A live session is kept;
    /// its cached copy stays authoritative until it is evicted.
    pub fn forget_completed(&mut self, filename: &str) {
        self.completed.remove(filename);
    }

    /// Number of completion records kept for late polls.
    pub fn completed_records(&self) -> usize {
        self.completed.len()
    }

    /// Drop every session and completion record.
    pub fn clear(&mut self) {
        self.sessions.clear();
        self.completed.clear();
    }

    // ── Internal ──────────────────────────────────────────────

    fn start_session(&mut self, store: &impl FileStorePort, filename: &str) -> Result<()> {
        if !store.exists(filename) {
            return Err(TransferError::NotFound {
                filename: filename.to_owned(),
            });
        }
        let bytes = store.read(filename).map_err(|e| match e {
            StoreError::NotFound => TransferError::NotFound {
                filename: filename.to_owned(),
            },
            StoreError::Io(detail) => TransferError::Read {
                filename: filename.to_owned(),
                detail,
            },
        })?;
        let encoded = codec::encode(&bytes);
        debug!(
            "download: cached '{}' ({} bytes, {} encoded)",
            filename,
            bytes.len(),
            encoded.len()
        );
        // A second offset-0 request silently restarts the session.
        self.completed.remove(filename);
        self.sessions
            .insert(filename.to_owned(), DownloadSession { encoded });
        Ok(())
    }

    fn late_poll(&self, filename: &str, offset: usize) -> Result<DownloadChunk> {
        match self.completed.get(filename) {
            Some(&encoded_len) if offset >= encoded_len => Ok(DownloadChunk {
                filename: filename.to_owned(),
                range: chunked::chunk_at(offset, encoded_len, self.chunk_size),
                data: String::new(),
                encoded_len,
                started: false,
            }),
            _ => Err(TransferError::NoCachedData {
                filename: filename.to_owned(),
            }),
        }
    }

    fn evict(&mut self, filename: &str, encoded_len: usize) {
        self.sessions.remove(filename);
        self.completed.insert(filename.to_owned(), encoded_len);
    }
}

// ── Tests ────────────────────────────────────────────────────
