// # File State Store
//
// File-based implementation of StateStore.
//
// ## File Format
//
// The file holds the raw address and nothing else, e.g. `203.0.113.7`.
// There is no trailing newline and no framing. A record written by an
// older version of the updater (or by hand) is read back verbatim,
// with surrounding whitespace stripped.
//
// ## Crash Safety
//
// Writes go to a `.tmp` sibling first and are renamed over the record,
// so a crash mid-write leaves either the old or the new address.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::state_store::StateStore;

/// File-based last known address record
///
/// # Example
///
/// ```rust,no_run
/// use dyndns_core::state::FileStateStore;
/// use dyndns_core::traits::StateStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileStateStore::new("/tmp/last_ip").await?;
///
///     store.set_last_ip("1.2.3.4").await?;
///     assert_eq!(store.get_last_ip().await?, Some("1.2.3.4".to_string()));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Create a file state store, creating the parent directory if needed
    ///
    /// The record itself is created lazily on the first write.
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::config(format!(
                        "Failed to create state directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(Self { path })
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn get_last_ip(&self) -> Result<Option<String>, Error> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("State file does not exist: {}", self.path.display());
                Ok(None)
            }
            Err(e) => Err(Error::state_store(format!(
                "Failed to read state file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn set_last_ip(&self, ip: &str) -> Result<(), Error> {
        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(ip.as_bytes()).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Last IP written to {}", self.path.display());
        Ok(())
    }
}
