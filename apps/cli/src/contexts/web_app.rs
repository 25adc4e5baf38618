use std::sync::Mutex;

use async_trait::async_trait;
use console::style;
use serde_json::Value;
use vidnote_core::{Message, MessageHandler, NoteIndex};

/// Stands in for the companion web app: prints each snapshot it receives.
#[derive(Default)]
pub struct WebAppContext {
    last: Mutex<Option<NoteIndex>>,
}

impl WebAppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_snapshot(&self) -> Option<NoteIndex> {
        self.last.lock().expect("WebAppContext poisoned").clone()
    }
}

#[async_trait]
impl MessageHandler for WebAppContext {
    async fn handle(&self, message: Message) -> anyhow::Result<Option<Value>> {
        match message {
            Message::SyncData(index) => {
                let notes: usize = index.values().map(Vec::len).sum();
                println!(
                    "{} Web app received {} note(s) across {} video(s)",
                    style("⇄").cyan().bold(),
                    notes,
                    index.len()
                );
                *self.last.lock().expect("WebAppContext poisoned") = Some(index);
                Ok(Some(Value::Bool(true)))
            }
            Message::RequestVideoMetadata => Ok(None),
        }
    }
}
