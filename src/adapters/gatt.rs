//! GATT characteristic binding.
//!
//! [`GattCharacteristic`] is what the platform peripheral stack talks to:
//! it owns the single read/write characteristic the file protocol runs
//! over, tracks which central is connected, and funnels every ATT request
//! into one [`FileTransferService`].
//!
//! ```text
//!  ATT Write Req ──▶ handle_write ─┐            ┌──────────────────────┐
//!                                  ├─ Mutex ──▶ │ FileTransferService  │
//!  ATT Read Req  ──▶ handle_read  ─┘            │   + connected central│
//!                                               └──────────────────────┘
//! ```
//!
//! One mutex guards the whole dispatch, so a read can never observe a
//! half-updated mailbox even when the stack delivers callbacks from
//! different threads. Sessions survive a disconnect; an interrupted
//! transfer is only cleared by the next offset-0 request.

use core::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::app::ports::{EventSink, FileStorePort};
use crate::app::service::FileTransferService;
use crate::client::{CommandLink, LinkError};
use crate::protocol::transport::{AttStatus, GattHandler, NullResponder, Responder};

/// ATT maximum attribute value length.
pub const DEFAULT_MAX_ATTRIBUTE_LEN: usize = 512;

/// Opaque identifier the platform stack assigns to a connected central.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CentralId(pub u64);

impl fmt::Display for CentralId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "central#{}", self.0)
    }
}

struct Inner<S, E> {
    service: FileTransferService<S, E>,
    central: Option<CentralId>,
}

pub struct GattCharacteristic<S, E> {
    inner: Mutex<Inner<S, E>>,
    max_attribute_len: usize,
}

impl<S: FileStorePort, E: EventSink> GattCharacteristic<S, E> {
    pub fn new(service: FileTransferService<S, E>) -> Self {
        Self::with_max_attribute_len(service, DEFAULT_MAX_ATTRIBUTE_LEN)
    }

    pub fn with_max_attribute_len(service: FileTransferService<S, E>, max_len: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                service,
                central: None,
            }),
            max_attribute_len: max_len,
        }
    }

    // A panic inside dispatch leaves the maps consistent (every mutation is
    // a single insert or remove), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner<S, E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Connection tracking ───────────────────────────────────

    /// Accept `central` unless a different one is already connected.
    pub fn connect(&self, central: CentralId) -> bool {
        let mut inner = self.lock();
        match inner.central {
            Some(current) if current != central => {
                warn!("gatt: refusing {} while {} is connected", central, current);
                false
            }
            _ => {
                inner.central = Some(central);
                info!("gatt: {} connected", central);
                true
            }
        }
    }

    pub fn disconnect(&self, central: CentralId) {
        let mut inner = self.lock();
        if inner.central == Some(central) {
            inner.central = None;
            info!("gatt: {} disconnected", central);
        }
    }

    pub fn connected_central(&self) -> Option<CentralId> {
        self.lock().central
    }

    // ── ATT request handling ──────────────────────────────────

    /// ATT Write Request. On success the mailbox holds the command's
    /// response before this returns.
    pub fn handle_write(
        &self,
        central: CentralId,
        value: &[u8],
        responder: &mut impl Responder,
    ) -> AttStatus {
        let status = {
            let mut inner = self.lock();
            if inner.central != Some(central) {
                AttStatus::WriteNotPermitted
            } else if value.len() > self.max_attribute_len {
                AttStatus::InvalidAttributeValueLength
            } else {
                inner.service.handle_write(value);
                AttStatus::Success
            }
        };
        if status != AttStatus::Success {
            debug!("gatt: write from {} rejected ({:?})", central, status);
        }
        responder.respond(status);
        status
    }

    /// ATT Read (Blob) Request starting at `offset` into the mailbox.
    pub fn handle_read(
        &self,
        central: CentralId,
        offset: usize,
        responder: &mut impl Responder,
    ) -> Result<Vec<u8>, AttStatus> {
        let result = {
            let inner = self.lock();
            let value = inner.service.read_response();
            if inner.central != Some(central) {
                Err(AttStatus::ReadNotPermitted)
            } else if offset > value.len() {
                Err(AttStatus::InvalidOffset)
            } else {
                Ok(value[offset..].to_vec())
            }
        };
        responder.respond(match &result {
            Ok(_) => AttStatus::Success,
            Err(status) => *status,
        });
        result
    }

    /// Run `f` against the service while holding the dispatch lock.
    pub fn with_service<R>(&self, f: impl FnOnce(&mut FileTransferService<S, E>) -> R) -> R {
        f(&mut self.lock().service)
    }
}

impl<S: FileStorePort, E: EventSink> GattHandler for GattCharacteristic<S, E> {
    fn on_write_received(&self, value: &[u8]) {
        self.lock().service.handle_write(value);
    }

    fn on_read_requested(&self) -> Vec<u8> {
        self.lock().service.read_response().to_vec()
    }
}

// ───────────────────────────────────────────────────────────────
// In-process loopback link
// ───────────────────────────────────────────────────────────────

/// [`CommandLink`] that drives a [`GattCharacteristic`] directly, as a
/// connected central would: one write request, then one read request.
pub struct LoopbackLink<'a, S, E> {
    gatt: &'a GattCharacteristic<S, E>,
    central: CentralId,
}

impl<'a, S: FileStorePort, E: EventSink> LoopbackLink<'a, S, E> {
    /// Connect `central` and return a link bound to it.
    pub fn connect(
        gatt: &'a GattCharacteristic<S, E>,
        central: CentralId,
    ) -> Result<Self, LinkError> {
        if !gatt.connect(central) {
            return Err(LinkError::Closed);
        }
        Ok(Self { gatt, central })
    }

    pub fn central(&self) -> CentralId {
        self.central
    }
}

impl<S: FileStorePort, E: EventSink> CommandLink for LoopbackLink<'_, S, E> {
    fn exchange(&mut self, command: &str) -> Result<String, LinkError> {
        let mut ack = NullResponder;
        match self.gatt.handle_write(self.central, command.as_bytes(), &mut ack) {
            AttStatus::Success => {}
            status => return Err(LinkError::Att(status)),
        }
        let value = self
            .gatt
            .handle_read(self.central, 0, &mut ack)
            .map_err(LinkError::Att)?;
        Ok(String::from_utf8_lossy(&value).into_owned())
    }
}

impl<S, E> Drop for LoopbackLink<'_, S, E> {
    fn drop(&mut self) {
        let mut inner = self.gatt.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.central == Some(self.central) {
            inner.central = None;
        }
    }
}
