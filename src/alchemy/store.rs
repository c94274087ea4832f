//! Key-value string stores backing the discovery ledger.
//!
//! Three back ends share the [`KeyValueStore`] trait:
//! - [`SledStore`]: embedded sled database, the durable default
//! - [`JsonFileStore`]: a single JSON object file guarded with fs2 locks
//!   (shared for read, exclusive for write)
//! - [`MemoryStore`]: process-local map, used when storage is disabled and in tests

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::alchemy::errors::AlchemyError;

const TREE_LEDGER: &str = "cauldron_ledger";

/// A scoped string store addressed by fixed keys.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, AlchemyError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AlchemyError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, AlchemyError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AlchemyError> {
        (**self).set(key, value)
    }
}

/// Sled-backed persistence.
pub struct SledStore {
    _db: sled::Db,
    tree: sled::Tree,
}

impl SledStore {
    /// Open (or create) the store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AlchemyError> {
        let path_ref = path.as_ref();
        fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let tree = db.open_tree(TREE_LEDGER)?;
        Ok(Self { _db: db, tree })
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>, AlchemyError> {
        let Some(bytes) = self.tree.get(key.as_bytes())? else {
            return Ok(None);
        };
        let text = std::str::from_utf8(&bytes)
            .map_err(|e| AlchemyError::Persistence(format!("non-utf8 value for {key}: {e}")))?;
        Ok(Some(text.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AlchemyError> {
        self.tree.insert(key.as_bytes(), value.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }
}

/// On-disk schema for [`JsonFileStore`].
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    entries: HashMap<String, String>,
}

/// One JSON file holding every key.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> Result<(), AlchemyError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }

    fn parse(contents: &str) -> StoreFile {
        let cleaned = contents.trim_start_matches('\0');
        if cleaned.trim().is_empty() {
            return StoreFile::default();
        }
        serde_json::from_str(cleaned).unwrap_or_else(|e| {
            log::warn!("store: discarding unreadable file contents: {}", e);
            StoreFile::default()
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AlchemyError> {
        let mut f = match fs::OpenOptions::new().read(true).open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        f.lock_shared()?;
        let mut s = String::new();
        let read = f.read_to_string(&mut s);
        let _ = f.unlock();
        read?;
        Ok(Self::parse(&s).entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AlchemyError> {
        self.ensure_parent()?;
        let mut f = fs::OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.path)?;
        f.lock_exclusive()?;
        let result = (|| -> Result<(), AlchemyError> {
            let mut s = String::new();
            f.read_to_string(&mut s)?;
            let mut file = Self::parse(&s);
            file.entries.insert(key.to_string(), value.to_string());
            let data = serde_json::to_string_pretty(&file)?;
            // Rewrite from the start so shorter contents never leave stale bytes
            f.seek(SeekFrom::Start(0))?;
            f.set_len(0)?;
            f.write_all(data.as_bytes())?;
            f.flush()?;
            f.sync_all()?;
            Ok(())
        })();
        let _ = f.unlock();
        result
    }
}

/// In-memory store; nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AlchemyError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| AlchemyError::Persistence("memory store poisoned".to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AlchemyError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| AlchemyError::Persistence("memory store poisoned".to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
