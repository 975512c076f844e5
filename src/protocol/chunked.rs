//! Chunk addressing over the encoded representation of a file.
//!
//! Chunks are byte ranges `[start, end)` into the base64 text, at most
//! `chunk_size` units long. The receiver learns the next offset from `end`
//! and stops on `DONE`.
//!
//! ```text
//! DOWNLOAD f:0    → CHUNK:f:0-300:<300 units>:CONT
//! DOWNLOAD f:300  → CHUNK:f:300-600:<300 units>:CONT
//! DOWNLOAD f:600  → CHUNK:f:600-712:<112 units>:DONE
//! ```

use core::fmt;

/// Encoded units per chunk, sized to fit one ATT attribute value.
pub const DEFAULT_CHUNK_SIZE: usize = 300;

/// Status tag closing every CHUNK and UPLOADCHUNK line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkStatus {
    /// More chunks follow.
    Cont,
    /// Final chunk.
    Done,
}

impl ChunkStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cont => "CONT",
            Self::Done => "DONE",
        }
    }

    /// Interpret a status field. Only `DONE` (any case) is terminal.
    pub fn from_field(field: &str) -> Self {
        if field.eq_ignore_ascii_case("DONE") {
            Self::Done
        } else {
            Self::Cont
        }
    }

    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for ChunkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Range served for a request at `offset` into text of length `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub start: usize,
    pub end: usize,
    pub status: ChunkStatus,
}

impl ChunkRange {
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Compute the chunk served at `offset`.
///
/// An offset at or past `total` yields the empty `offset..offset` range
/// tagged `DONE`. A zero `chunk_size` falls back to [`DEFAULT_CHUNK_SIZE`].
pub fn chunk_at(offset: usize, total: usize, chunk_size: usize) -> ChunkRange {
    let size = if chunk_size == 0 {
        DEFAULT_CHUNK_SIZE
    } else {
        chunk_size
    };
    if offset >= total {
        return ChunkRange {
            start: offset,
            end: offset,
            status: ChunkStatus::Done,
        };
    }
    let end = offset.saturating_add(size).min(total);
    let status = if end < total {
        ChunkStatus::Cont
    } else {
        ChunkStatus::Done
    };
    ChunkRange {
        start: offset,
        end,
        status,
    }
}

/// Split encoded text of length `total` into consecutive chunk ranges.
///
/// Empty input yields a single empty `DONE` range so the receiver still
/// sees a terminal fragment.
pub fn split_ranges(total: usize, chunk_size: usize) -> Vec<ChunkRange> {
    if total == 0 {
        return vec![chunk_at(0, 0, chunk_size)];
    }
    let mut out = Vec::new();
    let mut offset = 0;
    while offset < total {
        let range = chunk_at(offset, total, chunk_size);
        offset = range.end;
        out.push(range);
    }
    out
}

// ── Tests ────────────────────────────────────────────────────
