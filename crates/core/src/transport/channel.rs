use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use tokio::{
    sync::{broadcast, mpsc, oneshot},
    task::JoinHandle,
};
use uuid::Uuid;

use crate::{
    error::{Result, VidnoteError},
    messages::Message,
    transport::{MessageHandler, TabId, Transport, TransportMetrics},
};

pub struct TransportConfig {
    pub session_id: Uuid,
    pub inbox_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            inbox_capacity: 16,
        }
    }
}

/// One message in flight, carrying the slot its reply goes back through.
struct Delivery {
    message: Message,
    reply_tx: oneshot::Sender<anyhow::Result<Option<Value>>>,
}

/// In-process transport connecting contexts that run as tokio tasks.
///
/// Each registered tab owns an inbox drained by its own listener task, one
/// message at a time. Replies travel back through a oneshot created per call,
/// so no correlation id is needed in the envelope.
#[derive(Clone)]
pub struct ChannelTransport {
    inner: Arc<ChannelTransportInner>,
}

struct ChannelTransportInner {
    session_id: Uuid,
    inbox_capacity: usize,
    inboxes: Mutex<HashMap<TabId, mpsc::Sender<Delivery>>>,
    shutdown_tx: broadcast::Sender<()>,
    closed: AtomicBool,
    metrics: Arc<TransportMetrics>,
}

impl ChannelTransport {
    pub fn new(cfg: TransportConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            inner: Arc::new(ChannelTransportInner {
                session_id: cfg.session_id,
                inbox_capacity: cfg.inbox_capacity.max(1),
                inboxes: Mutex::new(HashMap::new()),
                shutdown_tx,
                closed: AtomicBool::new(false),
                metrics: Arc::new(TransportMetrics::new()),
            }),
        }
    }

    /// Registers the single handler for `tab` and spawns its listener.
    ///
    /// Must be called from within a tokio runtime.
    pub fn register(
        &self,
        tab: TabId,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<JoinHandle<()>> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(VidnoteError::TransportClosed);
        }

        let (inbox_tx, inbox_rx) = mpsc::channel(self.inner.inbox_capacity);
        {
            let mut inboxes = self.inner.inboxes.lock().expect("ChannelTransport poisoned");
            if inboxes.contains_key(&tab) {
                return Err(VidnoteError::DuplicateListener { tab });
            }
            inboxes.insert(tab, inbox_tx);
        }

        debug!(
            "event=listener_registered session={} tab={}",
            self.inner.session_id, tab
        );

        let shutdown = self.inner.shutdown_tx.subscribe();
        Ok(tokio::spawn(listen(tab, handler, inbox_rx, shutdown)))
    }

    /// Drops the tab's inbox; its listener stops once in-flight calls finish.
    pub fn unregister(&self, tab: TabId) -> bool {
        let removed = self
            .inner
            .inboxes
            .lock()
            .expect("ChannelTransport poisoned")
            .remove(&tab)
            .is_some();

        if removed {
            debug!(
                "event=listener_unregistered session={} tab={}",
                self.inner.session_id, tab
            );
        }
        removed
    }

    pub fn is_registered(&self, tab: TabId) -> bool {
        self.inner
            .inboxes
            .lock()
            .expect("ChannelTransport poisoned")
            .contains_key(&tab)
    }

    /// Stops every listener. The call a listener is handling still gets its
    /// reply; queued and later calls resolve with no reply.
    pub fn shutdown(&self) {
        self.inner.closed.store(true, Ordering::Release);
        self.inner
            .inboxes
            .lock()
            .expect("ChannelTransport poisoned")
            .clear();
        let _ = self.inner.shutdown_tx.send(());
    }

    pub fn session_id(&self) -> Uuid {
        self.inner.session_id
    }

    pub fn metrics(&self) -> Arc<TransportMetrics> {
        Arc::clone(&self.inner.metrics)
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, message: Message, target: TabId) -> Result<Option<Value>> {
        // after shutdown every inbox is gone, so this resolves as unrouted
        let kind = message.kind();
        let inbox = self
            .inner
            .inboxes
            .lock()
            .expect("ChannelTransport poisoned")
            .get(&target)
            .cloned();

        let Some(inbox) = inbox else {
            self.inner.metrics.record_unrouted(target);
            debug!("event=send_unrouted tab={} kind={}", target, kind);
            return Ok(None);
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        if inbox.send(Delivery { message, reply_tx }).await.is_err() {
            self.inner.metrics.record_unrouted(target);
            debug!("event=send_listener_gone tab={} kind={}", target, kind);
            return Ok(None);
        }
        self.inner.metrics.record_sent();

        match reply_rx.await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => {
                self.inner.metrics.record_remote_failure();
                warn!(
                    "event=remote_handler_failed tab={} kind={} error={:#}",
                    target, kind, e
                );
                Err(VidnoteError::RemoteFailed {
                    tab: target,
                    kind,
                    reason: format!("{e:#}"),
                })
            }
            // listener went away before answering
            Err(_) => Ok(None),
        }
    }
}

async fn listen(
    tab: TabId,
    handler: Arc<dyn MessageHandler>,
    mut inbox: mpsc::Receiver<Delivery>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => break,
            delivery = inbox.recv() => match delivery {
                Some(Delivery { message, reply_tx }) => {
                    let kind = message.kind();
                    let result = handler.handle(message).await;
                    if reply_tx.send(result).is_err() {
                        debug!("event=reply_abandoned tab={} kind={}", tab, kind);
                    }
                }
                None => break,
            }
        }
    }

    debug!("event=listener_stopped tab={}", tab);
}
