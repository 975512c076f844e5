//! Line-framed stream binding.
//!
//! Runs the characteristic's write-then-read cycle over any byte stream:
//! each `\n`-terminated line is one write, and the value read back is sent
//! as one line. The stdio daemon and the TCP listener both use it.
//!
//! ```text
//!  line ──▶ handle_write ──▶ handle_read ──▶ value + "\n"
//!  EXIT ──▶ end of session (not dispatched)
//! ```
//!
//! Lines are raw bytes. A line that is not UTF-8 reaches the dispatcher
//! unchanged and is answered like any other unrecognised command.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};

use log::{info, warn};

use crate::app::ports::{EventSink, FileStorePort};
use crate::client::{CommandLink, LinkError};
use crate::protocol::transport::{AttStatus, Responder};

use super::gatt::{CentralId, GattCharacteristic};

/// Line that ends a stream session.
pub const EXIT_COMMAND: &[u8] = b"EXIT";

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn write_att_error(writer: &mut impl Write, status: AttStatus) -> io::Result<()> {
    write!(writer, "ATT error 0x{:02X}", status.code())
}

/// Serve `central` from `reader` until end of input or `EXIT`.
///
/// Returns the number of commands dispatched. Only I/O failures on the
/// stream itself end the session early.
pub fn serve_lines<S, E>(
    gatt: &GattCharacteristic<S, E>,
    central: CentralId,
    mut reader: impl BufRead,
    mut writer: impl Write,
    responder: &mut impl Responder,
) -> io::Result<usize>
where
    S: FileStorePort,
    E: EventSink,
{
    let mut buf = Vec::new();
    let mut served = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = strip_line_ending(&buf);
        if line.trim_ascii().eq_ignore_ascii_case(EXIT_COMMAND) {
            break;
        }
        match gatt.handle_write(central, line, responder) {
            AttStatus::Success => match gatt.handle_read(central, 0, responder) {
                Ok(value) => writer.write_all(&value)?,
                Err(status) => write_att_error(&mut writer, status)?,
            },
            status => write_att_error(&mut writer, status)?,
        }
        writer.write_all(b"\n")?;
        writer.flush()?;
        served += 1;
    }
    Ok(served)
}

// ───────────────────────────────────────────────────────────────
// TCP
// ───────────────────────────────────────────────────────────────

/// Serve one TCP connection as `central`, then release the central.
pub fn serve_connection<S, E>(
    gatt: &GattCharacteristic<S, E>,
    central: CentralId,
    stream: TcpStream,
    responder: &mut impl Responder,
) -> io::Result<usize>
where
    S: FileStorePort,
    E: EventSink,
{
    if !gatt.connect(central) {
        let mut stream = stream;
        writeln!(stream, "ATT error 0x{:02X}", AttStatus::WriteNotPermitted.code())?;
        return Ok(0);
    }
    let reader = BufReader::new(stream.try_clone()?);
    let result = serve_lines(gatt, central, reader, &stream, responder);
    gatt.disconnect(central);
    result
}

/// Accept connections one after another, each as a fresh central.
///
/// A failing connection is logged and dropped; only `accept` errors end
/// the loop.
pub fn serve_tcp<S, E>(
    gatt: &GattCharacteristic<S, E>,
    listener: &TcpListener,
    responder: &mut impl Responder,
) -> io::Result<()>
where
    S: FileStorePort,
    E: EventSink,
{
    let mut next_id = 1u64;
    loop {
        let (stream, peer) = listener.accept()?;
        let central = CentralId(next_id);
        next_id = next_id.wrapping_add(1);
        info!("tcp: {} is {}", peer, central);
        match serve_connection(gatt, central, stream, responder) {
            Ok(served) => info!("tcp: {} closed after {} commands", peer, served),
            Err(e) => warn!("tcp: {} dropped: {}", peer, e),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Client side
// ───────────────────────────────────────────────────────────────

/// [`CommandLink`] over a line-framed stream. Commands must be single
/// lines.
pub struct StreamLink<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> StreamLink<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl StreamLink<BufReader<TcpStream>, TcpStream> {
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self, LinkError> {
        let stream = TcpStream::connect(addr).map_err(io_error)?;
        let reader = BufReader::new(stream.try_clone().map_err(io_error)?);
        Ok(Self::new(reader, stream))
    }
}

impl<R: BufRead, W: Write> CommandLink for StreamLink<R, W> {
    fn exchange(&mut self, command: &str) -> Result<String, LinkError> {
        self.writer
            .write_all(command.as_bytes())
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush())
            .map_err(io_error)?;

        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf).map_err(io_error)? == 0 {
            return Err(LinkError::Closed);
        }
        Ok(String::from_utf8_lossy(strip_line_ending(&buf)).into_owned())
    }
}

fn io_error(e: io::Error) -> LinkError {
    LinkError::Io(e.to_string())
}
