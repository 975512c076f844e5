//! Application core: pure domain logic, zero I/O.
//!
//! Command parsing, the download cache, upload reassembly, and the response
//! mailbox. Storage and event delivery go through the **port traits** in
//! [`ports`], so this layer is testable without a filesystem or a radio.

pub mod commands;
pub mod download;
pub mod events;
pub mod mailbox;
pub mod ports;
pub mod service;
pub mod upload;
