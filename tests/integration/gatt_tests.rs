//! GATT binding tests: ATT request handling, connection tracking and
//! serialised dispatch from several threads.

use std::sync::Arc;
use std::thread;

use gattfs::adapters::log_sink::LogEventSink;
use gattfs::app::ports::NullSink;
use gattfs::protocol::transport::{AttStatus, GattHandler, NullResponder, Responder};
use gattfs::{CentralId, DirectoryStore, FileTransferService, GattCharacteristic};

use crate::mock_store::{MemoryStore, RecordingSink};

const PHONE: CentralId = CentralId(0xA1);
const LAPTOP: CentralId = CentralId(0xB2);

#[derive(Default)]
struct Acks(Vec<AttStatus>);

impl Responder for Acks {
    fn respond(&mut self, status: AttStatus) {
        self.0.push(status);
    }
}

fn read_text<S, E>(gatt: &GattCharacteristic<S, E>, offset: usize) -> String
where
    S: gattfs::app::ports::FileStorePort,
    E: gattfs::app::ports::EventSink,
{
    let value = gatt.handle_read(PHONE, offset, &mut NullResponder).unwrap();
    String::from_utf8(value).unwrap()
}

#[test]
fn directory_backed_download_over_att() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"AB").unwrap();
    let service = FileTransferService::new(DirectoryStore::new(dir.path()), LogEventSink::new());
    let gatt = GattCharacteristic::new(service);
    assert!(gatt.connect(PHONE));

    let mut acks = Acks::default();
    assert_eq!(
        gatt.handle_write(PHONE, b"DOWNLOAD a.txt:0", &mut acks),
        AttStatus::Success
    );
    assert_eq!(read_text(&gatt, 0), "CHUNK:a.txt:0-4:QUI=:DONE");
    assert_eq!(acks.0, vec![AttStatus::Success]);
}

#[test]
fn directory_backed_upload_lands_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let service = FileTransferService::new(DirectoryStore::new(dir.path()), NullSink);
    let gatt = GattCharacteristic::new(service);
    gatt.connect(PHONE);

    gatt.handle_write(PHONE, b"UPLOADCHUNK:new.txt:0-4:QUI=:DONE", &mut NullResponder);
    assert_eq!(read_text(&gatt, 0), "UPLOAD SUCCESS: new.txt saved on server.");
    assert_eq!(std::fs::read(dir.path().join("new.txt")).unwrap(), b"AB");

    gatt.handle_write(PHONE, b"LIST", &mut NullResponder);
    assert_eq!(read_text(&gatt, 0), "FILES: new.txt");
}

#[test]
fn long_read_reassembles_full_value() {
    let data = vec![0x5Au8; 600];
    let service = FileTransferService::new(MemoryStore::with(&[("big", &data)]), NullSink);
    let gatt = GattCharacteristic::new(service);
    gatt.connect(PHONE);
    gatt.handle_write(PHONE, b"DOWNLOAD big:0", &mut NullResponder);

    let full = read_text(&gatt, 0);
    let mut pieced = String::new();
    let mut offset = 0;
    while offset < full.len() {
        let piece = read_text(&gatt, offset);
        let take = piece.len().min(22);
        pieced.push_str(&piece[..take]);
        offset += take;
    }
    assert_eq!(pieced, full);
    assert_eq!(
        gatt.handle_read(PHONE, full.len() + 1, &mut NullResponder),
        Err(AttStatus::InvalidOffset)
    );
}

#[test]
fn sessions_survive_disconnect() {
    let data = vec![1u8; 600];
    let service = FileTransferService::new(MemoryStore::with(&[("f", &data)]), NullSink);
    let gatt = GattCharacteristic::new(service);
    gatt.connect(PHONE);
    gatt.handle_write(PHONE, b"DOWNLOAD f:0", &mut NullResponder);
    gatt.disconnect(PHONE);

    assert_eq!(gatt.with_service(|s| s.downloads().active_sessions()), 1);

    assert!(gatt.connect(LAPTOP));
    assert_eq!(
        gatt.handle_write(PHONE, b"DOWNLOAD f:300", &mut NullResponder),
        AttStatus::WriteNotPermitted
    );
    assert_eq!(
        gatt.handle_write(LAPTOP, b"DOWNLOAD f:300", &mut NullResponder),
        AttStatus::Success
    );
}

#[test]
fn concurrent_handlers_never_interleave_a_dispatch() {
    let store = MemoryStore::with(&[("a.txt", b"AB")]);
    let gatt = Arc::new(GattCharacteristic::new(FileTransferService::new(
        store,
        RecordingSink::default(),
    )));

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let gatt = Arc::clone(&gatt);
            thread::spawn(move || {
                for n in 0..50 {
                    if n % 2 == 0 {
                        gatt.on_write_received(format!("COMMENT worker {}", i).as_bytes());
                    } else {
                        gatt.on_write_received(b"DOWNLOAD a.txt:0");
                    }
                    let value = String::from_utf8(gatt.on_read_requested()).unwrap();
                    assert!(
                        value.starts_with("Comment Received: worker ")
                            || value == "CHUNK:a.txt:0-4:QUI=:DONE",
                        "torn mailbox value: {:?}",
                        value
                    );
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }

    gatt.with_service(|s| {
        assert_eq!(s.mailbox().write_count(), 200);
        assert_eq!(s.downloads().active_sessions(), 0);
    });
}
