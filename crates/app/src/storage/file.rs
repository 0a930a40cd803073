//! File-backed key-value store.
//!
//! Each key is a file `<root>/<key>.json`. Writes go to a uniquely named
//! temporary file in the same directory and are renamed into place, so a
//! reader never sees a partially written collection and two writers never
//! share a temporary file.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{KeyValueStore, StorageError, validate_key};

const FILE_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = ".tmp";

/// Directory mode for the secret store (owner only).
#[cfg(unix)]
const SECURE_DIR_MODE: u32 = 0o700;
/// File mode for secret values (owner read/write only).
#[cfg(unix)]
const SECURE_FILE_MODE: u32 = 0o600;

/// A [`KeyValueStore`] that persists each key as a file in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    secure: bool,
}

impl FileStore {
    /// Create a general-purpose store rooted at `root`.
    ///
    /// The directory is created on the first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            secure: false,
        }
    }

    /// Create a store for secrets rooted at `root`.
    ///
    /// On Unix the directory is created with mode `0700` and every value file
    /// with mode `0600`.
    #[must_use]
    pub fn secure(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            secure: true,
        }
    }

    /// Returns whether this is a secret store.
    #[must_use]
    pub const fn is_secure(&self) -> bool {
        self.secure
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{FILE_EXTENSION}")))
    }

    async fn ensure_root(&self) -> std::io::Result<()> {
        let mut builder = tokio::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        if self.secure {
            builder.mode(SECURE_DIR_MODE);
        }
        builder.create(&self.root).await
    }

    async fn write_file(&self, key: &str, path: &Path, value: &str) -> std::io::Result<()> {
        self.ensure_root().await?;

        let root = self.root.clone();
        let path = path.to_owned();
        let prefix = format!(".{key}.");
        let bytes = value.as_bytes().to_vec();
        let secure = self.secure;

        tokio::task::spawn_blocking(move || {
            let mut builder = tempfile::Builder::new();
            builder.prefix(&prefix).suffix(TEMP_SUFFIX);
            #[cfg(unix)]
            if secure {
                use std::os::unix::fs::PermissionsExt;
                builder.permissions(std::fs::Permissions::from_mode(SECURE_FILE_MODE));
            }
            #[cfg(not(unix))]
            let _ = secure;

            let mut tmp = builder.tempfile_in(&root)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(std::io::Error::other)?
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_owned(),
                source,
            }),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        self.write_file(key, &path, value)
            .await
            .map_err(|source| StorageError::Write {
                key: key.to_owned(),
                source,
            })?;
        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Delete {
                key: key.to_owned(),
                source,
            }),
        }
    }
}
