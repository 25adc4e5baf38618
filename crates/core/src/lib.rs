pub mod config;
pub mod error;
pub mod messages;
pub mod popup;
pub mod protocol;
pub mod store;
pub mod sync;
pub mod tabs;
pub mod transport;
pub mod types;

pub use config::VidnoteConfig;
pub use error::{Result, VidnoteError};
pub use messages::{Message, MessageKind, Reply};
pub use popup::{PopupController, PopupState, SaveReport};
pub use protocol::{call, push_sync, request_video_metadata};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, NoteStore, StorageMap};
pub use sync::{SyncCoordinator, SyncOutcome};
pub use tabs::{InMemoryTabs, TabDirectory, TabHandle, TabQuery};
pub use transport::{
    ChannelTransport, MessageHandler, TabId, Transport, TransportConfig, TransportMetrics,
};
pub use types::{NoteField, NoteIndex, VideoMetadata, VideoNote};
