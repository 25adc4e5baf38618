use std::sync::Arc;

use log::{info, warn};
use serde_json::Value;

use crate::{
    error::{Result, VidnoteError},
    store::{KeyValueStore, StorageMap},
    types::{NoteIndex, VideoMetadata, VideoNote},
};

/// Note-shaped view over the shared key-value store.
///
/// Notes are grouped under their video id, newest first.
#[derive(Clone)]
pub struct NoteStore {
    kv: Arc<dyn KeyValueStore>,
}

impl NoteStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn load_draft(&self, metadata: &VideoMetadata) -> VideoNote {
        VideoNote::draft(metadata)
    }

    /// Prepends `note` to the list stored under `note.id`.
    ///
    /// Read-modify-write without any version check: two writers starting from
    /// the same list both succeed and the later write wins, dropping the other
    /// note. The caller is trusted to pass a savable note.
    pub async fn merge_and_persist(&self, note: &VideoNote) -> Result<()> {
        let mut existing = self.notes_for(&note.id).await?;
        existing.insert(0, note.clone());
        let count = existing.len();

        self.kv
            .set(StorageMap::from([(
                note.id.clone(),
                serde_json::to_value(existing)?,
            )]))
            .await?;

        info!(
            "event=note_saved video_id={} start_time={} notes_for_video={}",
            note.id, note.start_time, count
        );
        Ok(())
    }

    pub async fn notes_for(&self, video_id: &str) -> Result<Vec<VideoNote>> {
        let mut entries = self.kv.get(Some(video_id)).await?;

        match entries.remove(video_id) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => decode_entry(video_id, value),
        }
    }

    /// Everything stored, as sent to the web app.
    ///
    /// Entries that are not note lists are left out and logged.
    pub async fn snapshot(&self) -> Result<NoteIndex> {
        let entries = self.kv.get(None).await?;
        let mut index = NoteIndex::new();

        for (key, value) in entries {
            match decode_entry(&key, value) {
                Ok(notes) => {
                    index.insert(key, notes);
                }
                Err(e) => warn!("event=snapshot_entry_skipped key={} error={}", key, e),
            }
        }

        Ok(index)
    }
}

fn decode_entry(key: &str, value: Value) -> Result<Vec<VideoNote>> {
    serde_json::from_value(value).map_err(|source| VidnoteError::CorruptEntry {
        key: key.to_string(),
        source,
    })
}
