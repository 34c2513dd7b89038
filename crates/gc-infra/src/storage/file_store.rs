use std::fs;
use std::io;
use std::path::PathBuf;

use gc_core::ports::{KeyValueStorePort, StorageError};
use tracing::debug;

/// File-backed key-value store. One file per key.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// failed write never leaves a half-written value behind.
///
/// 基于文件的键值存储，每个 key 一个文件。
#[derive(Clone)]
pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `<data_dir>/kv`, creating the directory.
    ///
    /// 在 `<data_dir>/kv` 下创建存储。
    pub fn new_in_data_dir(data_dir: PathBuf) -> Result<Self, io::Error> {
        let base_dir = data_dir.join("kv");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Construct with a concrete, existing base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Keys may contain `:`, which is not portable in file names.
    fn file_path(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_dir.join(format!("{file_stem}.bin"))
    }

    fn map_io_error(context: &str, err: io::Error) -> StorageError {
        match err.kind() {
            io::ErrorKind::PermissionDenied => StorageError::Unavailable(format!("{context}: {err}")),
            io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
                StorageError::Corrupt(format!("{context}: {err}"))
            }
            _ => StorageError::Other(format!("{context}: {err}")),
        }
    }
}

impl KeyValueStorePort for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.file_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::map_io_error("failed to read storage file", err)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.file_path(key);
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value)
            .map_err(|err| Self::map_io_error("failed to write storage temp file", err))?;
        fs::rename(&temp_path, &path)
            .map_err(|err| Self::map_io_error("failed to rename storage file", err))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)
                .map_err(|err| Self::map_io_error("failed to read storage metadata", err))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)
                .map_err(|err| Self::map_io_error("failed to set storage permissions", err))?;
        }

        debug!(key, len = value.len(), "stored value");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.file_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::map_io_error("failed to delete storage file", err)),
        }
    }
}
