use thiserror::Error;

use crate::{messages::MessageKind, transport::TabId};

#[derive(Error, Debug)]
pub enum VidnoteError {
    #[error("Tab {tab} failed to handle {kind}: {reason}")]
    RemoteFailed {
        tab: TabId,
        kind: MessageKind,
        reason: String,
    },

    #[error("Tab {tab} already has a message handler registered")]
    DuplicateListener { tab: TabId },

    #[error("Transport has been shut down")]
    TransportClosed,

    #[error("No reply received for {kind}")]
    MissingReply { kind: MessageKind },

    #[error("Malformed reply for {kind}: {source}")]
    MalformedReply {
        kind: MessageKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("No active tab in the current window")]
    NoActiveTab,

    #[error("Stored value under key {key} is not a note list: {source}")]
    CorruptEntry {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Popup is not ready: video metadata has not arrived")]
    NotReady,

    #[error("Popup is closed")]
    PopupClosed,

    #[error("Note is not savable: title and description are required")]
    NotSavable,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VidnoteError>;
