use thiserror::Error;

/// Key-value storage errors.
///
/// 键值存储错误类型。
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backing storage cannot be reached.
    ///
    /// 存储不可用。
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Stored data is corrupt or unreadable.
    ///
    /// 存储数据损坏。
    #[error("storage data corrupt: {0}")]
    Corrupt(String),

    #[error("storage failed: {0}")]
    Other(String),
}

/// Persistent key-value store.
///
/// Writes are all-or-nothing: a failed `set` leaves the previous value in
/// place. A missing key is not an error.
///
/// 持久化键值存储端口。
pub trait KeyValueStorePort: Send + Sync {
    /// Get a value by key. `Ok(None)` when the key was never written.
    ///
    /// 按 key 读取数据。
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Set a value by key.
    ///
    /// 按 key 写入数据。
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Delete a value by key. Deleting a missing key succeeds.
    ///
    /// 按 key 删除数据。
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
mockall::mock! {
    pub KeyValueStore {}

    impl KeyValueStorePort for KeyValueStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
        fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
        fn delete(&self, key: &str) -> Result<(), StorageError>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_store_reports_missing_key_as_none() {
        let mut store = MockKeyValueStore::new();
        store.expect_get().returning(|_| Ok(None));

        assert!(store.get("tc-acceptance:v1").unwrap().is_none());
    }
}
