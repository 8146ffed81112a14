/// Key-value persistence backend.
///
/// Implementations must make every single-key `get`/`set`/`delete` atomic.
/// There is no multi-key transaction: a crash between two `set` calls can
/// leave the stores out of step with each other, and callers accept that.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> crate::StoreResult<Option<String>>;

    /// Create or replace the value under `key`.
    fn set(&self, key: &str, value: &str) -> crate::StoreResult<()>;

    /// Delete `key`. Returns `true` if it existed.
    fn delete(&self, key: &str) -> crate::StoreResult<bool>;
}
