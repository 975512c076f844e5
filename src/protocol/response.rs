//! Response payloads written into the mailbox.
//!
//! ```text
//! FILES: <name1>, <name2>, ...
//! CHUNK:<filename>:<start>-<end>:<encodedSlice>:<CONT|DONE>
//! UPLOADCHUNK CONT: <filename>
//! UPLOAD SUCCESS: <filename> saved on server.
//! Comment Received: <freeText>
//! ERROR: <description>
//! ```

use core::fmt;

use crate::error::TransferError;

use super::chunked::ChunkStatus;

/// Prefix of every error payload.
pub const ERROR_PREFIX: &str = "ERROR: ";

/// One command's result, before serialisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Files(Vec<String>),
    Chunk {
        filename: String,
        start: usize,
        end: usize,
        data: String,
        status: ChunkStatus,
    },
    UploadContinue {
        filename: String,
    },
    UploadSuccess {
        filename: String,
    },
    CommentReceived(String),
    Error(TransferError),
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Serialise to the UTF-8 bytes a central reads back.
    pub fn to_payload(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Files(names) => write!(f, "FILES: {}", names.join(", ")),
            Self::Chunk {
                filename,
                start,
                end,
                data,
                status,
            } => write!(f, "CHUNK:{filename}:{start}-{end}:{data}:{status}"),
            Self::UploadContinue { filename } => write!(f, "UPLOADCHUNK CONT: {filename}"),
            Self::UploadSuccess { filename } => {
                write!(f, "UPLOAD SUCCESS: {filename} saved on server.")
            }
            Self::CommentReceived(text) => write!(f, "Comment Received: {text}"),
            Self::Error(e) => write!(f, "{ERROR_PREFIX}{e}"),
        }
    }
}

impl From<TransferError> for Response {
    fn from(e: TransferError) -> Self {
        Self::Error(e)
    }
}
