use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{Result, VidnoteError},
    messages::MessageKind,
};

/// Raw reply to one request, still untyped.
///
/// Every caller must pick either [`Reply::decode`] or [`Reply::discard`].
#[must_use = "decode the reply or discard it explicitly"]
#[derive(Debug)]
pub struct Reply {
    kind: MessageKind,
    value: Option<Value>,
}

impl Reply {
    pub fn new(kind: MessageKind, value: Option<Value>) -> Self {
        Self { kind, value }
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let value = match self.value {
            None | Some(Value::Null) => return Err(VidnoteError::MissingReply { kind: self.kind }),
            Some(value) => value,
        };

        serde_json::from_value(value).map_err(|source| VidnoteError::MalformedReply {
            kind: self.kind,
            source,
        })
    }

    /// Push-style calls: the remote reply carries no meaning.
    pub fn discard(self) {
        if let Some(value) = self.value {
            log::trace!("event=reply_discarded kind={} reply={}", self.kind, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::VideoMetadata;

    #[test]
    fn absent_reply_is_missing() {
        let err = Reply::new(MessageKind::RequestVideoMetadata, None)
            .decode::<VideoMetadata>()
            .unwrap_err();
        assert!(matches!(err, VidnoteError::MissingReply { .. }));

        let err = Reply::new(MessageKind::RequestVideoMetadata, Some(Value::Null))
            .decode::<VideoMetadata>()
            .unwrap_err();
        assert!(matches!(err, VidnoteError::MissingReply { .. }));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let err = Reply::new(
            MessageKind::RequestVideoMetadata,
            Some(json!({ "timestamp": 30 })),
        )
        .decode::<VideoMetadata>()
        .unwrap_err();

        assert!(matches!(
            err,
            VidnoteError::MalformedReply {
                kind: MessageKind::RequestVideoMetadata,
                ..
            }
        ));
    }

    #[test]
    fn decodes_metadata() {
        let metadata: VideoMetadata = Reply::new(
            MessageKind::RequestVideoMetadata,
            Some(json!({ "timestamp": "00:30", "videoId": "abc", "url": "http://x" })),
        )
        .decode()
        .unwrap();

        assert_eq!(metadata.video_id, "abc");
    }
}
