//! Upload reassembler: accumulates encoded fragments per filename.
//!
//! ```text
//! range 0 ──▶ create session ──▶ append ──▶ append ──▶ final: decode + write
//!                                                         │
//!                                   evict (success or failure)
//! ```
//!
//! Fragments are appended in arrival order; there is no reordering or gap
//! detection. A fragment for an unknown name must start at range 0.
//!
//! A failed decode or write on the final fragment still evicts the
//! session, discarding everything uploaded so far. The central has to
//! restart from range 0.

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::{Result, TransferError};
use crate::protocol::codec;

use super::ports::FileStorePort;

/// Result of one accepted fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadProgress {
    /// Fragment appended; more expected.
    Continue { filename: String, started: bool },
    /// Final fragment decoded and written.
    Saved { filename: String, bytes: usize },
}

pub struct UploadReassembler {
    sessions: HashMap<String, String>,
}

impl UploadReassembler {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Accept one fragment of `filename`.
    pub fn submit_chunk(
        &mut self,
        store: &mut impl FileStorePort,
        filename: &str,
        range_start: usize,
        payload: &str,
        final_chunk: bool,
    ) -> Result<UploadProgress> {
        let started = !self.sessions.contains_key(filename);
        if started {
            if range_start != 0 {
                return Err(TransferError::State {
                    filename: filename.to_owned(),
                });
            }
            debug!("upload: new session for '{}'", filename);
        }

        let buffer = self.sessions.entry(filename.to_owned()).or_default();
        buffer.push_str(payload);

        if !final_chunk {
            return Ok(UploadProgress::Continue {
                filename: filename.to_owned(),
                started,
            });
        }

        let encoded = self.sessions.remove(filename).unwrap_or_default();
        Self::finalize(store, filename, &encoded)
    }

    /// Whether an upload for `filename` is in progress.
    pub fn is_active(&self, filename: &str) -> bool {
        self.sessions.contains_key(filename)
    }

    /// Encoded units buffered for `filename`.
    pub fn buffered_len(&self, filename: &str) -> Option<usize> {
        self.sessions.get(filename).map(String::len)
    }

    /// Number of in-progress uploads.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Drop every in-progress upload.
    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    fn finalize(
        store: &mut impl FileStorePort,
        filename: &str,
        encoded: &str,
    ) -> Result<UploadProgress> {
        let Some(raw) = codec::decode(encoded) else {
            warn!(
                "upload: '{}' discarded, {} encoded units failed to decode",
                filename,
                encoded.len()
            );
            return Err(TransferError::Decode {
                filename: filename.to_owned(),
            });
        };
        store.write(filename, &raw).map_err(|e| {
            warn!("upload: '{}' discarded, write failed: {}", filename, e);
            TransferError::Write {
                filename: filename.to_owned(),
                detail: e.to_string(),
            }
        })?;
        Ok(UploadProgress::Saved {
            filename: filename.to_owned(),
            bytes: raw.len(),
        })
    }
}

impl Default for UploadReassembler {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────
