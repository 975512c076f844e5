//! gattfs: file transfer over a single GATT characteristic.
//!
//! Exposes the protocol core, its adapters and the client driver for the
//! host binary and for integration testing. The platform BLE stack is not
//! part of this crate; it drives [`adapters::gatt::GattCharacteristic`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;

pub use adapters::fs_store::DirectoryStore;
pub use adapters::gatt::{CentralId, GattCharacteristic, LoopbackLink};
pub use adapters::stream::StreamLink;
pub use app::service::FileTransferService;
pub use client::TransferClient;
pub use config::ServerConfig;
pub use error::TransferError;
