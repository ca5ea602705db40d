//! Local snapshot storage for the cart.
//!
//! A synchronous key-value blob store. The cart uses a single key and writes the
//! whole serialized cart on every commit.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

pub trait SnapshotStore: Send + Sync + 'static {
    /// Returns `None` when nothing was ever written under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces whatever is stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
