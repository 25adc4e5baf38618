use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata the content script reports for the video playing in its page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub timestamp: String,
    pub video_id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoNote {
    pub start_time: String,
    /// Video id; also the storage key the note is grouped under.
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Title,
    Description,
}

/// Video id -> notes for that video, newest first.
pub type NoteIndex = BTreeMap<String, Vec<VideoNote>>;

impl VideoNote {
    pub fn draft(metadata: &VideoMetadata) -> Self {
        Self {
            start_time: metadata.timestamp.clone(),
            id: metadata.video_id.clone(),
            url: metadata.url.clone(),
            title: String::new(),
            description: String::new(),
        }
    }

    /// Returns a copy with one editable field replaced.
    pub fn with_field(&self, field: NoteField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        match field {
            NoteField::Title => next.title = value.into(),
            NoteField::Description => next.description = value.into(),
        }
        next
    }

    pub fn is_savable(&self) -> bool {
        !self.title.is_empty() && !self.description.is_empty()
    }
}
