//! Typed requests layered on [`Transport`].
//!
//! Both the metadata pull and the sync push go through the same
//! request/response primitive; they differ only in what the caller does with
//! the [`Reply`].

use log::debug;

use crate::{
    error::Result,
    messages::{Message, Reply},
    transport::{TabId, Transport},
    types::{NoteIndex, VideoMetadata},
};

/// Sends one message and wraps whatever comes back.
pub async fn call<T>(transport: &T, message: Message, target: TabId) -> Result<Reply>
where
    T: Transport + ?Sized,
{
    let kind = message.kind();
    debug!("event=request_sent tab={} kind={}", target, kind);

    let value = transport.send(message, target).await?;
    Ok(Reply::new(kind, value))
}

/// Asks the page in `tab` which video is playing and where.
pub async fn request_video_metadata<T>(transport: &T, tab: TabId) -> Result<VideoMetadata>
where
    T: Transport + ?Sized,
{
    call(transport, Message::RequestVideoMetadata, tab)
        .await?
        .decode()
}

/// Hands the full note snapshot to the web app in `tab`.
pub async fn push_sync<T>(transport: &T, tab: TabId, snapshot: NoteIndex) -> Result<()>
where
    T: Transport + ?Sized,
{
    call(transport, Message::SyncData(snapshot), tab)
        .await?
        .discard();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use crate::{error::VidnoteError, messages::MessageKind};

    struct ScriptedTransport {
        reply: Option<Value>,
        sent: Mutex<Vec<(Message, TabId)>>,
    }

    impl ScriptedTransport {
        fn replying(reply: Option<Value>) -> Self {
            Self {
                reply,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, message: Message, target: TabId) -> Result<Option<Value>> {
            self.sent.lock().unwrap().push((message, target));
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn metadata_request_targets_the_page_tab() {
        let transport = ScriptedTransport::replying(Some(json!({
            "timestamp": "00:30",
            "videoId": "abc",
            "url": "http://x",
        })));

        let metadata = request_video_metadata(&transport, TabId(4)).await.unwrap();

        assert_eq!(metadata.timestamp, "00:30");
        assert_eq!(
            transport.sent.lock().unwrap().as_slice(),
            &[(Message::RequestVideoMetadata, TabId(4))]
        );
    }

    #[tokio::test]
    async fn metadata_request_without_reply_fails() {
        let transport = ScriptedTransport::replying(None);

        let err = request_video_metadata(&transport, TabId(4)).await.unwrap_err();

        assert!(matches!(
            err,
            VidnoteError::MissingReply {
                kind: MessageKind::RequestVideoMetadata
            }
        ));
    }

    #[tokio::test]
    async fn push_sync_ignores_any_reply() {
        for reply in [None, Some(json!(true)), Some(json!({ "unexpected": 1 }))] {
            let transport = ScriptedTransport::replying(reply);
            push_sync(&transport, TabId(9), NoteIndex::new()).await.unwrap();

            let sent = transport.sent.lock().unwrap();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].0.kind(), MessageKind::SyncData);
            assert_eq!(sent[0].1, TabId(9));
        }
    }
}
