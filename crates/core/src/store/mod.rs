pub mod json_file;
pub mod memory;
pub mod notes;

pub use json_file::*;
pub use memory::*;
pub use notes::*;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub type StorageMap = BTreeMap<String, Value>;

/// Shared durable key-value storage.
///
/// There are no transactions: a read followed by a write can interleave with
/// other writers.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `None` returns every entry; `Some(key)` returns at most that one.
    async fn get(&self, key: Option<&str>) -> Result<StorageMap>;

    /// Overwrites the given keys, leaving every other key as it was.
    async fn set(&self, items: StorageMap) -> Result<()>;
}
