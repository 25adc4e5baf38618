use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::NoteIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    RequestVideoMetadata,
    SyncData,
}

impl MessageKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MessageKind::RequestVideoMetadata => "request_video_metadata",
            MessageKind::SyncData => "sync_data",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope exchanged between popup, page and web-app contexts.
///
/// Serialized as `{"type": "<kind>", "payload": ...}`; kinds without a
/// payload omit the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Message {
    RequestVideoMetadata,
    SyncData(NoteIndex),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::RequestVideoMetadata => MessageKind::RequestVideoMetadata,
            Message::SyncData(_) => MessageKind::SyncData,
        }
    }
}
