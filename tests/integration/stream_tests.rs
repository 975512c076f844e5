//! Line-framed stream binding: the stdio loop and the TCP listener.

use std::io::Cursor;
use std::net::TcpListener;
use std::thread;

use gattfs::adapters::stream::{serve_connection, serve_lines};
use gattfs::app::ports::NullSink;
use gattfs::client::ClientError;
use gattfs::protocol::transport::NullResponder;
use gattfs::{CentralId, FileTransferService, GattCharacteristic, StreamLink, TransferClient};

use crate::mock_store::MemoryStore;

const CONSOLE: CentralId = CentralId(1);

fn gatt_with(files: &[(&str, &[u8])]) -> GattCharacteristic<MemoryStore, NullSink> {
    GattCharacteristic::new(FileTransferService::new(MemoryStore::with(files), NullSink))
}

fn run(gatt: &GattCharacteristic<MemoryStore, NullSink>, input: &[u8]) -> (usize, String) {
    gatt.connect(CONSOLE);
    let mut out = Vec::new();
    let served = serve_lines(gatt, CONSOLE, Cursor::new(input), &mut out, &mut NullResponder).unwrap();
    (served, String::from_utf8(out).unwrap())
}

#[test]
fn invalid_utf8_line_is_answered_and_serving_continues() {
    let gatt = gatt_with(&[("a.txt", b"AB")]);
    let (served, out) = run(&gatt, b"LIST\n\xff\xfe\nLIST\n");
    assert_eq!(served, 3);
    assert_eq!(
        out,
        "FILES: a.txt\nERROR: Unrecognized command.\nFILES: a.txt\n"
    );
}

#[test]
fn crlf_is_stripped_and_exit_ends_the_session() {
    let gatt = gatt_with(&[]);
    let (served, out) = run(&gatt, b"COMMENT hi\r\nexit\r\nLIST\n");
    assert_eq!(served, 1);
    assert_eq!(out, "Comment Received: hi\n");
}

#[test]
fn last_line_without_newline_is_served() {
    let gatt = gatt_with(&[("a.txt", b"AB")]);
    let (_, out) = run(&gatt, b"DOWNLOAD a.txt:0");
    assert_eq!(out, "CHUNK:a.txt:0-4:QUI=:DONE\n");
}

#[test]
fn rejected_write_is_reported_inline() {
    let gatt = GattCharacteristic::with_max_attribute_len(
        FileTransferService::new(MemoryStore::default(), NullSink),
        8,
    );
    gatt.connect(CONSOLE);
    let mut out = Vec::new();
    serve_lines(
        &gatt,
        CONSOLE,
        Cursor::new(&b"COMMENT far too long\nLIST\n"[..]),
        &mut out,
        &mut NullResponder,
    )
    .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "ATT error 0x0D\nFILES: \n");
}

#[test]
fn tcp_client_round_trip() {
    let gatt = gatt_with(&[]);
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::scope(|s| {
        let server = s.spawn(|| {
            let (stream, _) = listener.accept().unwrap();
            serve_connection(&gatt, CentralId(9), stream, &mut NullResponder).unwrap()
        });

        {
            let mut client = TransferClient::new(StreamLink::connect(addr).unwrap());
            let payload: Vec<u8> = (0..1500u32).map(|i| (i % 253) as u8).collect();
            client.upload("wifi.bin", &payload).unwrap();
            assert_eq!(client.list().unwrap(), vec!["wifi.bin"]);
            assert_eq!(client.download("wifi.bin").unwrap(), payload);
            assert!(matches!(
                client.download("missing"),
                Err(ClientError::Server(_))
            ));
        }

        assert!(server.join().unwrap() > 4);
    });
    assert_eq!(gatt.connected_central(), None);
}
