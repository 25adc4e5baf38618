use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use vidnote_core::{Message, MessageHandler, VideoMetadata};

/// Stands in for the content script of the page playing the video.
pub struct PageContext {
    metadata: VideoMetadata,
}

impl PageContext {
    pub fn new(metadata: VideoMetadata) -> Self {
        Self { metadata }
    }
}

#[async_trait]
impl MessageHandler for PageContext {
    async fn handle(&self, message: Message) -> anyhow::Result<Option<Value>> {
        match message {
            Message::RequestVideoMetadata => {
                debug!(
                    "event=metadata_reported video_id={} timestamp={}",
                    self.metadata.video_id, self.metadata.timestamp
                );
                Ok(Some(serde_json::to_value(&self.metadata)?))
            }
            // pages do not consume snapshots
            Message::SyncData(_) => Ok(None),
        }
    }
}
