//! Transport binding: the platform GATT stack's view of the core.
//!
//! The peripheral stack delivers exactly two inbound events for the file
//! characteristic: a central wrote command bytes, or a central wants to
//! read the current value. Whatever adapter owns the platform stack calls
//! into a [`GattHandler`]; the core never references the stack directly.
//!
//! Concrete bindings:
//! - [`GattCharacteristic`](crate::adapters::gatt::GattCharacteristic)
//!   (single-central ATT request handling)
//! - [`stream`](crate::adapters::stream) (line-framed stdio and TCP, on top
//!   of the characteristic)

/// Inbound events from the transport.
///
/// Implementations must have updated the value a subsequent
/// [`on_read_requested`](Self::on_read_requested) returns by the time
/// [`on_write_received`](Self::on_write_received) returns.
pub trait GattHandler {
    /// A central wrote `value` to the characteristic.
    fn on_write_received(&self, value: &[u8]);

    /// A central is reading the characteristic.
    fn on_read_requested(&self) -> Vec<u8>;
}

/// ATT result codes the binding answers requests with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AttStatus {
    Success = 0x00,
    ReadNotPermitted = 0x02,
    WriteNotPermitted = 0x03,
    InvalidOffset = 0x07,
    InvalidAttributeValueLength = 0x0D,
}

impl AttStatus {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Outbound capability: acknowledge an ATT request.
///
/// Opaque to the core; the binding calls it once per request.
pub trait Responder {
    fn respond(&mut self, status: AttStatus);
}

/// Responder that discards acknowledgements.
pub struct NullResponder;

impl Responder for NullResponder {
    fn respond(&mut self, _status: AttStatus) {}
}
