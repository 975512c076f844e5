//! Fuzz target: `FileTransferService::handle_write`
//!
//! Splits the input on newlines and dispatches each piece against an
//! in-memory store. Every write must leave a non-empty response in the
//! mailbox, and no session map may grow past the number of writes.
//!
//! cargo fuzz run fuzz_dispatch

#![no_main]

use std::collections::BTreeMap;

use gattfs::app::ports::{FileStorePort, NullSink, StoreError};
use gattfs::FileTransferService;
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct MemStore(BTreeMap<String, Vec<u8>>);

impl FileStorePort for MemStore {
    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.0.keys().cloned().collect())
    }
    fn exists(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        self.0.get(name).cloned().ok_or(StoreError::NotFound)
    }
    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        self.0.insert(name.to_owned(), data.to_vec());
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let mut store = MemStore::default();
    store.0.insert("seed.bin".into(), vec![0xAA; 700]);
    let mut svc = FileTransferService::with_chunk_size(store, NullSink, 64);

    let mut writes = 0;
    for line in data.split(|&b| b == b'\n') {
        svc.handle_write(line);
        writes += 1;
        assert!(!svc.read_response().is_empty());
    }
    assert!(svc.downloads().active_sessions() <= writes);
    assert!(svc.uploads().active_sessions() <= writes);
});
