use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    error::Result,
    store::{KeyValueStore, StorageMap},
};

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<StorageMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: StorageMap) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: Option<&str>) -> Result<StorageMap> {
        let entries = self.entries.lock().expect("MemoryStore poisoned");

        Ok(match key {
            None => entries.clone(),
            Some(key) => entries
                .get_key_value(key)
                .map(|(k, v)| (k.clone(), v.clone()))
                .into_iter()
                .collect(),
        })
    }

    async fn set(&self, items: StorageMap) -> Result<()> {
        self.entries
            .lock()
            .expect("MemoryStore poisoned")
            .extend(items);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn get_by_key_returns_only_that_key() {
        let store = MemoryStore::new();
        store
            .set(StorageMap::from([
                ("a".to_string(), json!([1])),
                ("b".to_string(), json!([2])),
            ]))
            .await
            .unwrap();

        let one = store.get(Some("a")).await.unwrap();
        assert_eq!(one, StorageMap::from([("a".to_string(), json!([1]))]));

        assert!(store.get(Some("missing")).await.unwrap().is_empty());
        assert_eq!(store.get(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn set_overwrites_only_given_keys() {
        let store = MemoryStore::with_entries(StorageMap::from([
            ("a".to_string(), json!([1])),
            ("b".to_string(), json!([2])),
        ]));

        store
            .set(StorageMap::from([("a".to_string(), json!([3]))]))
            .await
            .unwrap();

        let all = store.get(None).await.unwrap();
        assert_eq!(all["a"], json!([3]));
        assert_eq!(all["b"], json!([2]));
    }
}
