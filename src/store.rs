//! Keyed storage used by command handlers.
//!
//! The parser and binder never touch a store; it is threaded to handlers
//! through their context.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no free key left after `{last}`")]
    KeysExhausted { last: u64 },
    #[error("can't access `{}`: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("can't decode `{}`: {source}", .path.display())]
    Decode { path: PathBuf, source: serde_json::Error },
    #[error("can't encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait Store<V> {
    fn get(&self, key: u64) -> Option<&V>;

    /// Stores `value` under `key`, returning the previous value.
    fn set(&mut self, key: u64, value: V) -> Result<Option<V>, StoreError>;

    fn delete(&mut self, key: u64) -> Result<Option<V>, StoreError>;

    fn iter(&self) -> Box<dyn Iterator<Item = (u64, &V)> + '_>;

    fn len(&self) -> usize {
        self.iter().count()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores `value` under the smallest key greater than every key in use.
    fn insert(&mut self, value: V) -> Result<u64, StoreError> {
        let key = next_key(self.iter().map(|(key, _)| key).max())?;
        self.set(key, value)?;
        Ok(key)
    }
}

fn next_key(last: Option<u64>) -> Result<u64, StoreError> {
    match last {
        None => Ok(1),
        Some(last) => last.checked_add(1).ok_or(StoreError::KeysExhausted { last }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStore<V> {
    entries: BTreeMap<u64, V>,
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        MemoryStore { entries: BTreeMap::new() }
    }
}

impl<V> MemoryStore<V> {
    pub fn new() -> MemoryStore<V> {
        MemoryStore::default()
    }
}

impl<V> Store<V> for MemoryStore<V> {
    fn get(&self, key: u64) -> Option<&V> {
        self.entries.get(&key)
    }

    fn set(&mut self, key: u64, value: V) -> Result<Option<V>, StoreError> {
        Ok(self.entries.insert(key, value))
    }

    fn delete(&mut self, key: u64) -> Result<Option<V>, StoreError> {
        Ok(self.entries.remove(&key))
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (u64, &V)> + '_> {
        Box::new(self.entries.iter().map(|(key, value)| (*key, value)))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A store kept as one JSON file, rewritten on every change.
#[derive(Debug)]
pub struct FileStore<V> {
    path: PathBuf,
    entries: BTreeMap<u64, V>,
}

impl<V: Serialize + DeserializeOwned> FileStore<V> {
    /// Loads `path`; a missing or empty file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<FileStore<V>, StoreError> {
        let path = path.into();
        let data = match fs::read(&path) {
            Ok(it) => it,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        let entries = if data.is_empty() {
            BTreeMap::new()
        } else {
            match serde_json::from_slice(&data) {
                Ok(it) => it,
                Err(source) => return Err(StoreError::Decode { path, source }),
            }
        };
        debug!(path = %path.display(), "store opened");
        Ok(FileStore { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        let io_err = |source| StoreError::Io { path: self.path.clone(), source };
        if let Some(parent) = tmp.parent().filter(|it| !it.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&tmp, data).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl<V: Serialize + DeserializeOwned> Store<V> for FileStore<V> {
    fn get(&self, key: u64) -> Option<&V> {
        self.entries.get(&key)
    }

    fn set(&mut self, key: u64, value: V) -> Result<Option<V>, StoreError> {
        let res = self.entries.insert(key, value);
        self.save()?;
        Ok(res)
    }

    fn delete(&mut self, key: u64) -> Result<Option<V>, StoreError> {
        let res = self.entries.remove(&key);
        if res.is_some() {
            self.save()?;
        }
        Ok(res)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (u64, &V)> + '_> {
        Box::new(self.entries.iter().map(|(key, value)| (*key, value)))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
