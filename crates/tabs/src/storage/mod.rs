//! Session record storage
//!
//! One named record per session, read and written whole. Writes go
//! through the single-worker `DiskWriter` so they never interleave.

pub mod file;
pub mod memory;
pub mod record;
pub mod writer;

use async_trait::async_trait;

use crate::error::Result;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use record::{RecordValue, SessionRecord};
pub use writer::{DiskWriter, PendingWrite};

/// Named record store
#[async_trait]
pub trait BundleStorage: Send + Sync {
    /// Read a record. `Ok(None)` when nothing is stored under `name`.
    async fn read(&self, name: &str) -> Result<Option<SessionRecord>>;

    /// Replace the record stored under `name`
    async fn write(&self, name: &str, record: &SessionRecord) -> Result<()>;

    /// Remove the record. Removing a missing record succeeds.
    async fn delete(&self, name: &str) -> Result<()>;
}
