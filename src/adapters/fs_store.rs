//! Directory-backed file store.
//!
//! Implements [`FileStorePort`] over one working directory. Names are
//! joined onto the root verbatim: `../x` or an absolute path escapes the
//! directory. Callers that expose the store to untrusted centrals should
//! confine the process instead.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::app::ports::{FileStorePort, StoreError};

pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl FileStorePort for DirectoryStore {
    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            // Names that are not valid UTF-8 cannot be requested over the
            // text protocol anyway.
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => debug!("fs_store: skipping non-UTF-8 entry {:?}", raw),
            }
        }
        names.sort();
        Ok(names)
    }

    fn exists(&self, name: &str) -> bool {
        self.path_of(name).exists()
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        Ok(fs::read(self.path_of(name))?)
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        fs::write(self.path_of(name), data)?;
        Ok(())
    }
}
