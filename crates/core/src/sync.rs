use std::sync::Arc;

use log::{debug, info};

use crate::{
    error::Result,
    protocol::push_sync,
    store::NoteStore,
    tabs::{TabDirectory, TabQuery},
    transport::{TabId, Transport},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No companion tab is open; nothing was read or sent.
    Skipped,
    Pushed { tab: TabId, videos: usize },
}

/// Pushes the stored notes to the companion web app, if one is open.
#[derive(Clone)]
pub struct SyncCoordinator {
    tabs: Arc<dyn TabDirectory>,
    transport: Arc<dyn Transport>,
    store: NoteStore,
    web_app_title: String,
}

impl SyncCoordinator {
    pub fn new(
        tabs: Arc<dyn TabDirectory>,
        transport: Arc<dyn Transport>,
        store: NoteStore,
        web_app_title: impl Into<String>,
    ) -> Self {
        Self {
            tabs,
            transport,
            store,
            web_app_title: web_app_title.into(),
        }
    }

    pub fn web_app_title(&self) -> &str {
        &self.web_app_title
    }

    pub async fn sync(&self) -> Result<SyncOutcome> {
        let query = TabQuery::Title(self.web_app_title.clone());
        let Some(web_app) = self.tabs.query(&query).await?.into_iter().next() else {
            debug!(
                "event=sync_skipped reason=no_web_app_tab title={:?}",
                self.web_app_title
            );
            return Ok(SyncOutcome::Skipped);
        };

        let snapshot = self.store.snapshot().await?;
        let videos = snapshot.len();
        push_sync(self.transport.as_ref(), web_app.id, snapshot).await?;

        info!("event=sync_pushed tab={} videos={}", web_app.id, videos);
        Ok(SyncOutcome::Pushed {
            tab: web_app.id,
            videos,
        })
    }
}
