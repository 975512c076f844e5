//! Central-side transfer driver.
//!
//! [`TransferClient`] speaks the command protocol over any [`CommandLink`]
//! (write a command, then read the characteristic). It walks downloads
//! chunk by chunk following the server's `end` offsets and splits uploads
//! into `chunk_size` slices of the encoded text.
//!
//! ```text
//!  download:  DOWNLOAD f:0 ─▶ CHUNK:f:0-300:..:CONT ─▶ DOWNLOAD f:300 ─▶ … DONE
//!  upload:    UPLOADCHUNK:f:0-300:..:CONT ─▶ … ─▶ UPLOADCHUNK:f:s-e:..:DONE
//! ```

use core::fmt;

use log::debug;

use crate::adapters::gatt::DEFAULT_MAX_ATTRIBUTE_LEN;
use crate::protocol::chunked::{self, ChunkStatus, DEFAULT_CHUNK_SIZE};
use crate::protocol::codec;
use crate::protocol::response::ERROR_PREFIX;
use crate::protocol::transport::AttStatus;

const FILES_PREFIX: &str = "FILES: ";
const CHUNK_PREFIX: &str = "CHUNK:";
const UPLOAD_CONT_PREFIX: &str = "UPLOADCHUNK CONT: ";
const UPLOAD_SUCCESS_PREFIX: &str = "UPLOAD SUCCESS: ";
const COMMENT_PREFIX: &str = "Comment Received: ";
const UPLOAD_KEYWORD: &str = "UPLOADCHUNK:";
/// `:` `-` `:` `:` around the range and slice, plus the 4-letter status.
const UPLOAD_FRAMING: usize = 8;

// ───────────────────────────────────────────────────────────────
// Link trait
// ───────────────────────────────────────────────────────────────

/// One request/response round trip on the characteristic.
pub trait CommandLink {
    /// Write `command`, then read back the characteristic value.
    fn exchange(&mut self, command: &str) -> Result<String, LinkError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The peripheral answered a request with a non-success ATT status.
    Att(AttStatus),
    /// No connection.
    Closed,
    /// Underlying I/O failed.
    Io(String),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Att(status) => write!(f, "ATT error 0x{:02X} ({:?})", status.code(), status),
            Self::Closed => write!(f, "link closed"),
            Self::Io(detail) => write!(f, "link I/O: {}", detail),
        }
    }
}

impl std::error::Error for LinkError {}

// ───────────────────────────────────────────────────────────────
// Client errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    Link(LinkError),
    /// Server answered `ERROR: <description>`.
    Server(String),
    /// Server answered something outside the response grammar.
    Malformed(String),
    /// Reassembled download is not valid transfer encoding.
    Decode { filename: String },
    /// No upload fragment for this name fits in one command.
    NameTooLong { filename: String, max_command_len: usize },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "{}", e),
            Self::Server(desc) => write!(f, "server error: {}", desc),
            Self::Malformed(line) => write!(f, "unexpected response: {:?}", line),
            Self::Decode { filename } => write!(f, "could not decode download of {}", filename),
            Self::NameTooLong {
                filename,
                max_command_len,
            } => write!(
                f,
                "name {:?} leaves no room for data in a {}-byte command",
                filename, max_command_len
            ),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<LinkError> for ClientError {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ───────────────────────────────────────────────────────────────
// CHUNK response parsing
// ───────────────────────────────────────────────────────────────

/// Parsed `CHUNK:<f>:<start>-<end>:<data>:<status>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReply {
    pub filename: String,
    pub start: usize,
    pub end: usize,
    pub data: String,
    pub status: ChunkStatus,
}

impl ChunkReply {
    /// Fields are taken from the right, so a filename containing `:`
    /// still parses.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.strip_prefix(CHUNK_PREFIX)?;
        let (rest, status) = rest.rsplit_once(':')?;
        let (rest, data) = rest.rsplit_once(':')?;
        let (filename, range) = rest.rsplit_once(':')?;
        let (start, end) = range.split_once('-')?;
        Some(Self {
            filename: filename.to_owned(),
            start: start.parse().ok()?,
            end: end.parse().ok()?,
            data: data.to_owned(),
            status: match status {
                "DONE" => ChunkStatus::Done,
                "CONT" => ChunkStatus::Cont,
                _ => return None,
            },
        })
    }
}

// ───────────────────────────────────────────────────────────────
// TransferClient
// ───────────────────────────────────────────────────────────────

pub struct TransferClient<L> {
    link: L,
    chunk_size: usize,
    max_command_len: usize,
}

impl<L: CommandLink> TransferClient<L> {
    pub fn new(link: L) -> Self {
        Self::with_chunk_size(link, DEFAULT_CHUNK_SIZE)
    }

    /// Upload slices are `chunk_size` encoded characters; 0 means default.
    pub fn with_chunk_size(link: L, chunk_size: usize) -> Self {
        let chunk_size = if chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        Self {
            link,
            chunk_size,
            max_command_len: DEFAULT_MAX_ATTRIBUTE_LEN,
        }
    }

    /// Longest command the peripheral accepts in one write. Upload slices
    /// shrink so every `UPLOADCHUNK` line fits.
    pub fn with_max_command_len(mut self, max_command_len: usize) -> Self {
        self.max_command_len = max_command_len;
        self
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn into_inner(self) -> L {
        self.link
    }

    /// Names in the server's working directory.
    pub fn list(&mut self) -> Result<Vec<String>, ClientError> {
        let reply = self.request("LIST")?;
        let names = expect_prefix(&reply, FILES_PREFIX)?;
        Ok(names
            .split(", ")
            .filter(|n| !n.is_empty())
            .map(str::to_owned)
            .collect())
    }

    /// Fetch the whole of `filename`.
    pub fn download(&mut self, filename: &str) -> Result<Vec<u8>, ClientError> {
        let mut encoded = String::new();
        let mut offset = 0usize;
        loop {
            let reply = self.request(&format!("DOWNLOAD {}:{}", filename, offset))?;
            let chunk = ChunkReply::parse(&reply).ok_or_else(|| ClientError::Malformed(reply.clone()))?;
            if chunk.start != offset {
                return Err(ClientError::Malformed(reply));
            }
            encoded.push_str(&chunk.data);
            if chunk.status.is_done() {
                break;
            }
            if chunk.end <= offset {
                // No progress; the server would loop forever.
                return Err(ClientError::Malformed(reply));
            }
            offset = chunk.end;
        }
        debug!("client: downloaded '{}' ({} encoded)", filename, encoded.len());
        codec::decode(&encoded).ok_or_else(|| ClientError::Decode {
            filename: filename.to_owned(),
        })
    }

    /// Store `data` on the server as `filename`, replacing any existing file.
    pub fn upload(&mut self, filename: &str, data: &[u8]) -> Result<(), ClientError> {
        let encoded = codec::encode(data);
        let slice_len = self.upload_slice_len(filename, encoded.len())?;
        for range in chunked::split_ranges(encoded.len(), slice_len) {
            let command = format!(
                "UPLOADCHUNK:{}:{}-{}:{}:{}",
                filename,
                range.start,
                range.end,
                &encoded[range.start..range.end],
                range.status
            );
            let reply = self.request(&command)?;
            let prefix = if range.status.is_done() {
                UPLOAD_SUCCESS_PREFIX
            } else {
                UPLOAD_CONT_PREFIX
            };
            expect_prefix(&reply, prefix)?;
        }
        debug!("client: uploaded '{}' ({} bytes)", filename, data.len());
        Ok(())
    }

    /// Send a free-text comment; returns the text the server echoed.
    pub fn comment(&mut self, text: &str) -> Result<String, ClientError> {
        let reply = self.request(&format!("COMMENT {}", text))?;
        expect_prefix(&reply, COMMENT_PREFIX).map(str::to_owned)
    }

    /// Largest slice that keeps every fragment of an `encoded_len` upload
    /// within `max_command_len`.
    fn upload_slice_len(&self, filename: &str, encoded_len: usize) -> Result<usize, ClientError> {
        let overhead =
            UPLOAD_KEYWORD.len() + filename.len() + 2 * decimal_digits(encoded_len) + UPLOAD_FRAMING;
        match self.max_command_len.checked_sub(overhead) {
            Some(room) if room > 0 => Ok(room.min(self.chunk_size)),
            _ => Err(ClientError::NameTooLong {
                filename: filename.to_owned(),
                max_command_len: self.max_command_len,
            }),
        }
    }

    fn request(&mut self, command: &str) -> Result<String, ClientError> {
        let reply = self.link.exchange(command)?;
        match reply.strip_prefix(ERROR_PREFIX) {
            Some(desc) => Err(ClientError::Server(desc.to_owned())),
            None => Ok(reply),
        }
    }
}

fn decimal_digits(n: usize) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

fn expect_prefix<'a>(reply: &'a str, prefix: &str) -> Result<&'a str, ClientError> {
    reply
        .strip_prefix(prefix)
        .ok_or_else(|| ClientError::Malformed(reply.to_owned()))
}
