//! Popup controller: owns the note draft for one open/close cycle.
//!
//! State flow: `Opening -> MetadataPending -> Ready -> (Editing <-> Ready) ->
//! Saving -> Ready | Closed`. The draft is an immutable value replaced on each
//! edit. The `on_*` methods are the outermost action handlers; they log every
//! failure and never propagate it.

use std::sync::Arc;

use log::{error, info, warn};
use uuid::Uuid;

use crate::{
    config::VidnoteConfig,
    error::{Result, VidnoteError},
    protocol::request_video_metadata,
    store::{KeyValueStore, NoteStore},
    sync::{SyncCoordinator, SyncOutcome},
    tabs::{TabDirectory, TabQuery},
    transport::Transport,
    types::{NoteField, VideoNote},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState {
    Opening,
    MetadataPending,
    Ready,
    Editing,
    Saving,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub note: VideoNote,
    /// `None` when the follow-up sync failed; the note is saved either way.
    pub sync: Option<SyncOutcome>,
}

pub struct PopupController {
    session_id: Uuid,
    state: PopupState,
    draft: Option<VideoNote>,
    tabs: Arc<dyn TabDirectory>,
    transport: Arc<dyn Transport>,
    store: NoteStore,
    sync: SyncCoordinator,
}

impl PopupController {
    pub fn new(
        tabs: Arc<dyn TabDirectory>,
        transport: Arc<dyn Transport>,
        kv: Arc<dyn KeyValueStore>,
        config: &VidnoteConfig,
    ) -> Self {
        let store = NoteStore::new(kv);
        let sync = SyncCoordinator::new(
            Arc::clone(&tabs),
            Arc::clone(&transport),
            store.clone(),
            config.web_app_title.clone(),
        );

        Self {
            session_id: Uuid::new_v4(),
            state: PopupState::Opening,
            draft: None,
            tabs,
            transport,
            store,
            sync,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> PopupState {
        self.state
    }

    pub fn draft(&self) -> Option<&VideoNote> {
        self.draft.as_ref()
    }

    /// Whether the Save action is enabled.
    pub fn can_save(&self) -> bool {
        !self.is_closed() && self.draft.as_ref().is_some_and(VideoNote::is_savable)
    }

    pub fn is_closed(&self) -> bool {
        self.state == PopupState::Closed
    }

    /// Requests metadata from the active tab and starts the draft.
    ///
    /// Only the first call sends a request; later calls are no-ops.
    pub async fn open(&mut self) -> Result<()> {
        if self.state != PopupState::Opening {
            return Ok(());
        }
        self.state = PopupState::MetadataPending;

        let active = self
            .tabs
            .query(&TabQuery::Active)
            .await?
            .into_iter()
            .next()
            .ok_or(VidnoteError::NoActiveTab)?;

        let metadata = request_video_metadata(self.transport.as_ref(), active.id).await?;

        info!(
            "event=draft_started session={} tab={} video_id={} start_time={}",
            self.session_id, active.id, metadata.video_id, metadata.timestamp
        );
        self.draft = Some(self.store.load_draft(&metadata));
        self.state = PopupState::Ready;
        Ok(())
    }

    /// Replaces one field of the draft, returning whether Save is now enabled.
    pub fn edit(&mut self, field: NoteField, value: impl Into<String>) -> Result<bool> {
        if self.is_closed() {
            return Err(VidnoteError::PopupClosed);
        }
        let draft = self.draft.as_ref().ok_or(VidnoteError::NotReady)?;

        let next = draft.with_field(field, value);
        // back to Ready once both fields are cleared again
        self.state = if next.title.is_empty() && next.description.is_empty() {
            PopupState::Ready
        } else {
            PopupState::Editing
        };
        self.draft = Some(next);
        Ok(self.can_save())
    }

    /// Persists the draft, then syncs and closes the popup.
    ///
    /// A failed write leaves the popup open in its previous state. A failed
    /// sync is logged and does not undo the save.
    pub async fn save(&mut self) -> Result<SaveReport> {
        if self.is_closed() {
            return Err(VidnoteError::PopupClosed);
        }
        let note = self.draft.clone().ok_or(VidnoteError::NotReady)?;
        if !note.is_savable() {
            return Err(VidnoteError::NotSavable);
        }

        let previous = self.state;
        self.state = PopupState::Saving;
        if let Err(e) = self.store.merge_and_persist(&note).await {
            self.state = previous;
            return Err(e);
        }
        self.state = PopupState::Ready;

        let sync = match self.sync.sync().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(
                    "event=sync_after_save_failed session={} error={}",
                    self.session_id, e
                );
                None
            }
        };

        self.close();
        Ok(SaveReport { note, sync })
    }

    pub async fn sync_now(&self) -> Result<SyncOutcome> {
        if self.is_closed() {
            return Err(VidnoteError::PopupClosed);
        }
        self.sync.sync().await
    }

    /// Ends the popup lifecycle; the draft is discarded.
    pub fn close(&mut self) {
        if !self.is_closed() {
            info!("event=popup_closed session={}", self.session_id);
        }
        self.state = PopupState::Closed;
        self.draft = None;
    }

    /// Popup just opened: fetch metadata, then attempt a sync.
    pub async fn on_open(&mut self) {
        if let Err(e) = self.open().await {
            error!(
                "event=metadata_request_failed session={} error={}",
                self.session_id, e
            );
        }
        self.on_sync().await;
    }

    /// Input event from the title or description field.
    pub fn on_input(&mut self, field: NoteField, value: impl Into<String>) -> bool {
        match self.edit(field, value) {
            Ok(can_save) => can_save,
            Err(e) => {
                warn!("event=input_ignored session={} error={}", self.session_id, e);
                false
            }
        }
    }

    /// Save button. Returns whether the popup closed.
    pub async fn on_save(&mut self) -> bool {
        match self.save().await {
            Ok(_) => true,
            Err(e) => {
                error!("event=save_failed session={} error={}", self.session_id, e);
                false
            }
        }
    }

    /// Sync button.
    pub async fn on_sync(&self) -> Option<SyncOutcome> {
        match self.sync_now().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!("event=sync_failed session={} error={}", self.session_id, e);
                None
            }
        }
    }
}
