//! Error taxonomy for the file-transfer core.
//!
//! Every failure a command can hit funnels into [`TransferError`]. The
//! dispatcher converts it to the `ERROR: <description>` wire payload only at
//! its output boundary, so internal logic and tests match on the variant
//! rather than on the rendered string.
//!
//! `Display` renders exactly the description that follows `ERROR: `.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level transfer error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// Malformed command or arguments.
    Parse(ParseError),
    /// Referenced file is absent from the store.
    NotFound { filename: String },
    /// Chunk requested without a prior offset-0 request, or after eviction.
    NoCachedData { filename: String },
    /// Upload fragment arrived without a started session.
    State { filename: String },
    /// Accumulated upload payload is not valid transfer encoding.
    Decode { filename: String },
    /// File read failed while caching a download.
    Read { filename: String, detail: String },
    /// File write failed while finalising an upload.
    Write { filename: String, detail: String },
    /// Directory listing failed.
    List { detail: String },
    /// Keyword not recognised.
    Unrecognized,
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::NotFound { filename } => write!(f, "File '{filename}' does not exist."),
            Self::NoCachedData { filename } => write!(f, "No base64 cached for '{filename}'."),
            Self::State { filename } => write!(
                f,
                "No upload cache for {filename}. Did you start from offset 0?"
            ),
            Self::Decode { filename } => write!(f, "Could not decode base64 for {filename}."),
            Self::Read { filename, detail } => {
                write!(f, "Failed to read file '{filename}': {detail}")
            }
            Self::Write { filename, detail } => write!(f, "Failed writing {filename}: {detail}"),
            Self::List { detail } => write!(f, "Failed to list files: {detail}"),
            Self::Unrecognized => write!(f, "Unrecognized command."),
        }
    }
}

impl std::error::Error for TransferError {}

impl TransferError {
    /// Short tag for log lines and metrics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Parse(_) | Self::Unrecognized => "parse",
            Self::NotFound { .. } => "not_found",
            Self::NoCachedData { .. } => "no_cached_data",
            Self::State { .. } => "state",
            Self::Decode { .. } => "decode",
            Self::Read { .. } | Self::Write { .. } | Self::List { .. } => "io",
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `DOWNLOAD` without the `:` separator.
    DownloadUsage,
    /// Offset is not a non-negative integer.
    InvalidOffset(String),
    /// `UPLOADCHUNK` with fewer than four fields.
    UploadFormat,
    /// Range descriptor does not start with a non-negative integer.
    InvalidRange(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DownloadUsage => write!(f, "Use DOWNLOAD <filename>:<offset>"),
            Self::InvalidOffset(raw) => write!(f, "Invalid offset {raw}."),
            Self::UploadFormat => write!(f, "Invalid UPLOADCHUNK format."),
            Self::InvalidRange(raw) => write!(f, "Invalid range {raw}."),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for TransferError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, TransferError>;
