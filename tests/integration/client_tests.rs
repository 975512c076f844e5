//! End-to-end transfers: `TransferClient` driving a `GattCharacteristic`
//! through the in-process loopback link.

use gattfs::app::ports::NullSink;
use gattfs::client::{ClientError, LinkError};
use gattfs::protocol::transport::AttStatus;
use gattfs::{
    CentralId, DirectoryStore, FileTransferService, GattCharacteristic, LoopbackLink,
    TransferClient,
};

use crate::mock_store::MemoryStore;

const CENTRAL: CentralId = CentralId(7);

#[test]
fn upload_then_download_through_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let gatt = GattCharacteristic::new(FileTransferService::new(
        DirectoryStore::new(dir.path()),
        NullSink,
    ));
    let mut client = TransferClient::new(LoopbackLink::connect(&gatt, CENTRAL).unwrap());

    let payload: Vec<u8> = (0..2000u32).map(|i| (i * 31 % 251) as u8).collect();
    client.upload("photo.bin", &payload).unwrap();
    assert_eq!(std::fs::read(dir.path().join("photo.bin")).unwrap(), payload);

    assert_eq!(client.list().unwrap(), vec!["photo.bin"]);
    assert_eq!(client.download("photo.bin").unwrap(), payload);
    assert_eq!(client.comment("thanks").unwrap(), "thanks");
}

#[test]
fn empty_file_round_trip() {
    let gatt = GattCharacteristic::new(FileTransferService::new(MemoryStore::default(), NullSink));
    let mut client = TransferClient::new(LoopbackLink::connect(&gatt, CENTRAL).unwrap());

    client.upload("empty", b"").unwrap();
    gatt.with_service(|s| assert_eq!(s.store().files["empty"], b""));
    assert_eq!(client.download("empty").unwrap(), b"");
}

#[test]
fn small_client_chunks_still_reassemble() {
    let gatt = GattCharacteristic::new(FileTransferService::with_chunk_size(
        MemoryStore::default(),
        NullSink,
        7,
    ));
    let mut client =
        TransferClient::with_chunk_size(LoopbackLink::connect(&gatt, CENTRAL).unwrap(), 5);

    client.upload("notes.txt", b"hello, gatt world").unwrap();
    assert_eq!(client.download("notes.txt").unwrap(), b"hello, gatt world");
}

#[test]
fn missing_file_is_a_server_error() {
    let gatt = GattCharacteristic::new(FileTransferService::new(MemoryStore::default(), NullSink));
    let mut client = TransferClient::new(LoopbackLink::connect(&gatt, CENTRAL).unwrap());
    assert_eq!(
        client.download("nope.txt"),
        Err(ClientError::Server("File 'nope.txt' does not exist.".into()))
    );
}

#[test]
fn oversized_command_is_rejected_at_att_level() {
    let gatt = GattCharacteristic::with_max_attribute_len(
        FileTransferService::new(MemoryStore::default(), NullSink),
        32,
    );
    let mut client = TransferClient::new(LoopbackLink::connect(&gatt, CENTRAL).unwrap());
    assert_eq!(
        client.upload("f", &[0u8; 64]),
        Err(ClientError::Link(LinkError::Att(
            AttStatus::InvalidAttributeValueLength
        )))
    );
}

#[test]
fn second_link_cannot_connect_while_first_is_open() {
    let gatt = GattCharacteristic::new(FileTransferService::new(MemoryStore::default(), NullSink));
    let _first = LoopbackLink::connect(&gatt, CENTRAL).unwrap();
    assert!(matches!(
        LoopbackLink::connect(&gatt, CentralId(8)),
        Err(LinkError::Closed)
    ));
}
