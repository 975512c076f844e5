//! Port traits: the hexagonal boundary between the transfer core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FileTransferService (domain)
//! ```
//!
//! Driven adapters (file store, event sinks) implement these traits. The
//! [`FileTransferService`](super::service::FileTransferService) consumes
//! them via generics, so the core never touches the filesystem or the
//! logger directly.
//!
//! ## Security notes
//!
//! - **FileStorePort** receives client-supplied names verbatim. Adapters
//!   that care about traversal must enforce it themselves; the core does not.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// File store port (driven adapter: domain ↔ working directory)
// ───────────────────────────────────────────────────────────────

/// Byte-level access to the working directory.
///
/// Stateless from the core's point of view: every call stands alone.
pub trait FileStorePort {
    /// Names of the entries in the working directory.
    fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Whether `name` exists.
    fn exists(&self, name: &str) -> bool;

    /// Full contents of `name`.
    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError>;

    /// Create or replace `name` with `data`.
    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`TransferEvent`](super::events::TransferEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::TransferEvent);
}

/// Sink that drops every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &super::events::TransferEvent) {}
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`FileStorePort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Entry does not exist.
    NotFound,
    /// Any other backend failure, with the backend's description.
    Io(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no such file"),
            Self::Io(detail) => write!(f, "{}", detail),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::Io(e.to_string()),
        }
    }
}
