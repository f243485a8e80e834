// Local Key Storage
// Keeps the registered key records between runs; the codec never touches it

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::rsa::{RsaPrivateKey, RsaPublicKey};

const CURRENT_VERSION: u32 = 1;

/// Errors that can occur while loading or saving keys
#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("key store I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("key store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported key store version {found}")]
    UnsupportedVersion { found: u32 },
}

/// Result type for key store operations
pub type KeyStoreResult<T> = Result<T, KeyStoreError>;

/// The key records kept after registration.
///
/// The public half is kept so messages can be encrypted to ourselves
/// without fetching our own key from elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredKeys {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
}

/// Somewhere to keep the local key records.
pub trait KeyStore {
    /// Returns `None` when nothing has been saved yet.
    fn load(&self) -> KeyStoreResult<Option<StoredKeys>>;

    /// Replaces whatever was stored before.
    fn save(&mut self, keys: &StoredKeys) -> KeyStoreResult<()>;

    /// Forgets the stored keys. Clearing an empty store is not an error.
    fn clear(&mut self) -> KeyStoreResult<()>;
}

/// In-process store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    keys: Option<StoredKeys>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryKeyStore {
    fn load(&self) -> KeyStoreResult<Option<StoredKeys>> {
        Ok(self.keys.clone())
    }

    fn save(&mut self, keys: &StoredKeys) -> KeyStoreResult<()> {
        self.keys = Some(keys.clone());
        Ok(())
    }

    fn clear(&mut self) -> KeyStoreResult<()> {
        self.keys = None;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct KeyFileData {
    version: u32,
    #[serde(flatten)]
    keys: StoredKeys,
}

/// JSON file on disk, written atomically.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> KeyStoreError {
        KeyStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl KeyStore for FileKeyStore {
    fn load(&self) -> KeyStoreResult<Option<StoredKeys>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let data: KeyFileData = serde_json::from_str(&contents)?;
        if data.version != CURRENT_VERSION {
            return Err(KeyStoreError::UnsupportedVersion {
                found: data.version,
            });
        }

        debug!(path = %self.path.display(), "loaded stored keys");
        Ok(Some(data.keys))
    }

    fn save(&mut self, keys: &StoredKeys) -> KeyStoreResult<()> {
        let data = KeyFileData {
            version: CURRENT_VERSION,
            keys: keys.clone(),
        };
        let json = serde_json::to_string_pretty(&data)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // Write to tmp, then rename over the old file
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json.as_bytes()).map_err(|e| self.io_error(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_error(e))?;
        }

        std::fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;

        info!(path = %self.path.display(), "keys saved");
        Ok(())
    }

    fn clear(&mut self) -> KeyStoreResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "stored keys cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
