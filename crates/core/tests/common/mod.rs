#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use serde_json::{Value, json};
use vidnote_core::{
    InMemoryTabs, KeyValueStore, MemoryStore, Message, MessageHandler, NoteIndex, Result,
    StorageMap, TabHandle, TabId, Transport, VideoMetadata, VideoNote, VidnoteError,
};

pub const PAGE_TAB: TabId = TabId(1);
pub const WEB_APP_TAB: TabId = TabId(2);

pub fn metadata(timestamp: &str, video_id: &str, url: &str) -> VideoMetadata {
    VideoMetadata {
        timestamp: timestamp.to_string(),
        video_id: video_id.to_string(),
        url: url.to_string(),
    }
}

pub fn note(id: &str, title: &str, description: &str) -> VideoNote {
    VideoNote {
        start_time: "00:30".to_string(),
        id: id.to_string(),
        url: "http://x".to_string(),
        title: title.to_string(),
        description: description.to_string(),
    }
}

pub fn tabs_with_page_and_web_app() -> Arc<InMemoryTabs> {
    let tabs = InMemoryTabs::new();
    tabs.open_tab(TabHandle {
        id: WEB_APP_TAB,
        title: "React App".to_string(),
        url: "http://localhost:3000".to_string(),
        active: false,
    });
    tabs.open_tab(TabHandle {
        id: PAGE_TAB,
        title: "Some video".to_string(),
        url: "http://x".to_string(),
        active: true,
    });
    Arc::new(tabs)
}

/// Content script stand-in answering metadata requests.
pub struct PageScript {
    pub metadata: VideoMetadata,
    pub requests: AtomicUsize,
}

impl PageScript {
    pub fn new(metadata: VideoMetadata) -> Arc<Self> {
        Arc::new(Self {
            metadata,
            requests: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl MessageHandler for PageScript {
    async fn handle(&self, message: Message) -> anyhow::Result<Option<Value>> {
        match message {
            Message::RequestVideoMetadata => {
                self.requests.fetch_add(1, Ordering::SeqCst);
                Ok(Some(serde_json::to_value(&self.metadata)?))
            }
            Message::SyncData(_) => Ok(None),
        }
    }
}

pub struct BrokenPage;

#[async_trait]
impl MessageHandler for BrokenPage {
    async fn handle(&self, _message: Message) -> anyhow::Result<Option<Value>> {
        anyhow::bail!("no video element on page")
    }
}

/// Web-app stand-in remembering every snapshot it was sent.
#[derive(Default)]
pub struct WebApp {
    pub received: Mutex<Vec<NoteIndex>>,
}

#[async_trait]
impl MessageHandler for WebApp {
    async fn handle(&self, message: Message) -> anyhow::Result<Option<Value>> {
        match message {
            Message::SyncData(index) => {
                self.received.lock().unwrap().push(index);
                Ok(Some(json!("ok")))
            }
            Message::RequestVideoMetadata => Ok(None),
        }
    }
}

pub struct BrokenWebApp;

#[async_trait]
impl MessageHandler for BrokenWebApp {
    async fn handle(&self, _message: Message) -> anyhow::Result<Option<Value>> {
        anyhow::bail!("web app crashed")
    }
}

/// Transport fake that records sends and never answers.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<(Message, TabId)>>,
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, message: Message, target: TabId) -> Result<Option<Value>> {
        self.sent.lock().unwrap().push((message, target));
        Ok(None)
    }
}

/// Store wrapper counting reads and writes.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
}

#[async_trait]
impl KeyValueStore for CountingStore {
    async fn get(&self, key: Option<&str>) -> Result<StorageMap> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn set(&self, items: StorageMap) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(items).await
    }
}

/// Store whose writes always fail.
#[derive(Default)]
pub struct ReadOnlyStore {
    pub inner: MemoryStore,
}

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, key: Option<&str>) -> Result<StorageMap> {
        self.inner.get(key).await
    }

    async fn set(&self, _items: StorageMap) -> Result<()> {
        Err(VidnoteError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "storage quota exceeded",
        )))
    }
}
