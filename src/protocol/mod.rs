//! Text protocol carried over the single GATT characteristic.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Protocol Stack                          │
//! │                                                            │
//! │  ┌──────────┐   ┌──────────┐   ┌───────────────────────┐   │
//! │  │ Transport │──▶│ Commands │──▶│  FileTransferService  │   │
//! │  │ (write)   │   │ (parse)  │   │  → Download / Upload  │   │
//! │  └──────────┘   └──────────┘   └───────────────────────┘   │
//! │       ▲                                    │               │
//! │       │              ┌─────────────────────┘               │
//! │       │              ▼                                     │
//! │  ┌──────────┐   ┌──────────┐                               │
//! │  │ Transport │◀──│ Mailbox  │   (pull-style reads)         │
//! │  │ (read)    │   │ (1 slot) │                              │
//! │  └──────────┘   └──────────┘                               │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod chunked;
pub mod codec;
pub mod response;
pub mod transport;
