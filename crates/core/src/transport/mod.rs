pub mod channel;
pub mod metrics;

pub use channel::*;
pub use metrics::*;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::Result, messages::Message};

/// Opaque handle addressing one execution context (a browser tab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point-to-point delivery of one message to one context.
///
/// Resolves with the target's single reply, or `Ok(None)` when the target does
/// not exist, has no listener, or never answers. Only a failure raised by the
/// remote handler rejects the call. Separate calls are unordered with respect
/// to each other, and a pending call cannot be cancelled: dropping the future
/// just abandons it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, message: Message, target: TabId) -> Result<Option<Value>>;
}

/// The one listener a context registers for incoming messages.
#[async_trait]
pub trait MessageHandler: Send + Sync + 'static {
    async fn handle(&self, message: Message) -> anyhow::Result<Option<Value>>;
}
