//! Mock adapters shared by the integration tests.

use std::collections::BTreeMap;

use gattfs::app::events::TransferEvent;
use gattfs::app::ports::{EventSink, FileStorePort, StoreError};
use gattfs::FileTransferService;

// ── MemoryStore ───────────────────────────────────────────────

/// In-memory working directory with failure injection.
#[derive(Default)]
pub struct MemoryStore {
    pub files: BTreeMap<String, Vec<u8>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub fail_list: bool,
}

impl MemoryStore {
    pub fn with(files: &[(&str, &[u8])]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(n, d)| ((*n).to_owned(), d.to_vec()))
                .collect(),
            ..Self::default()
        }
    }
}

impl FileStorePort for MemoryStore {
    fn list(&self) -> Result<Vec<String>, StoreError> {
        if self.fail_list {
            return Err(StoreError::Io("directory unavailable".into()));
        }
        Ok(self.files.keys().cloned().collect())
    }

    fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Io("permission denied".into()));
        }
        self.files.get(name).cloned().ok_or(StoreError::NotFound)
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Io("disk full".into()));
        }
        self.files.insert(name.to_owned(), data.to_vec());
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<TransferEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &TransferEvent) {
        self.events.push(event.clone());
    }
}

// ── Helpers ───────────────────────────────────────────────────

pub type TestService = FileTransferService<MemoryStore, RecordingSink>;

pub fn service_with(files: &[(&str, &[u8])]) -> TestService {
    FileTransferService::new(MemoryStore::with(files), RecordingSink::default())
}

/// Write `command`, then read the mailbox back as text.
pub fn exchange(svc: &mut TestService, command: &str) -> String {
    svc.handle_write(command.as_bytes());
    String::from_utf8(svc.read_response().to_vec()).expect("responses are UTF-8")
}
