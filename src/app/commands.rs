//! Inbound commands written by the central.
//!
//! Parsing is total and stateless: every input maps to a [`Command`] or a
//! structured [`ParseError`]. Keywords match case-insensitively on a trimmed
//! copy; arguments keep their original case.
//!
//! ```text
//! LIST
//! DOWNLOAD <filename>:<offset>
//! UPLOADCHUNK:<filename>:<rangeDescriptor>:<encodedPayload>:<CONT|DONE>
//! COMMENT <freeText>
//! ```

use crate::error::ParseError;
use crate::protocol::chunked::ChunkStatus;

const KW_LIST: &str = "LIST";
const KW_DOWNLOAD: &str = "DOWNLOAD ";
const KW_UPLOAD_CHUNK: &str = "UPLOADCHUNK:";
const KW_COMMENT: &str = "COMMENT ";

/// Commands the dispatcher interprets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the working directory.
    List,

    /// Request the encoded chunk starting at `offset`.
    Download { filename: String, offset: usize },

    /// One fragment of an upload. `final_chunk` is set by a `DONE` status.
    UploadChunk {
        filename: String,
        range_start: usize,
        payload: String,
        final_chunk: bool,
    },

    /// Free-text note from the central.
    Comment { text: String },

    /// Anything else; carries the trimmed input.
    Unrecognized { raw: String },
}

impl Command {
    /// Parse one command.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let trimmed = input.trim();

        if trimmed.eq_ignore_ascii_case(KW_LIST) {
            return Ok(Self::List);
        }
        if let Some(rest) = strip_keyword(trimmed, KW_DOWNLOAD) {
            return parse_download(rest);
        }
        if let Some(rest) = strip_keyword(trimmed, KW_UPLOAD_CHUNK) {
            return parse_upload_chunk(rest);
        }
        if let Some(rest) = strip_keyword(trimmed, KW_COMMENT) {
            return Ok(Self::Comment {
                text: rest.to_owned(),
            });
        }
        Ok(Self::Unrecognized {
            raw: trimmed.to_owned(),
        })
    }

    /// Parse raw characteristic bytes. Non-UTF-8 input is unrecognised.
    pub fn parse_bytes(value: &[u8]) -> Result<Self, ParseError> {
        match core::str::from_utf8(value) {
            Ok(text) => Self::parse(text),
            Err(_) => Ok(Self::Unrecognized { raw: String::new() }),
        }
    }

    /// Filename a command addresses, if any.
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Download { filename, .. } | Self::UploadChunk { filename, .. } => {
                Some(filename)
            }
            _ => None,
        }
    }
}

/// Case-insensitive prefix strip that leaves the remainder untouched.
fn strip_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let head = input.get(..keyword.len())?;
    head.eq_ignore_ascii_case(keyword)
        .then(|| &input[keyword.len()..])
}

fn parse_download(rest: &str) -> Result<Command, ParseError> {
    let rest = rest.trim();
    let (name, offset) = rest.split_once(':').ok_or(ParseError::DownloadUsage)?;
    let offset = offset.trim();
    let offset = offset
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidOffset(offset.to_owned()))?;
    Ok(Command::Download {
        filename: name.trim().to_owned(),
        offset,
    })
}

fn parse_upload_chunk(rest: &str) -> Result<Command, ParseError> {
    // Exactly four fields; the last one absorbs any further colons.
    let mut fields = rest.splitn(4, ':');
    let (Some(filename), Some(range), Some(payload), Some(status)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(ParseError::UploadFormat);
    };
    Ok(Command::UploadChunk {
        filename: filename.to_owned(),
        range_start: parse_range_start(range)?,
        payload: payload.to_owned(),
        final_chunk: ChunkStatus::from_field(status).is_done(),
    })
}

/// Start of a `<start>` or `<start>-<end>` descriptor. `end` is informational.
fn parse_range_start(range: &str) -> Result<usize, ParseError> {
    let start = range.split_once('-').map_or(range, |(start, _)| start);
    start
        .trim()
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidRange(range.to_owned()))
}

// ── Tests ────────────────────────────────────────────────────
