use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::Result, transport::TabId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabHandle {
    pub id: TabId,
    pub title: String,
    pub url: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabQuery {
    /// Active tab of the current window.
    Active,
    /// Tabs whose page title equals the given string.
    Title(String),
}

impl TabQuery {
    pub fn matches(&self, tab: &TabHandle) -> bool {
        match self {
            TabQuery::Active => tab.active,
            TabQuery::Title(title) => tab.title == *title,
        }
    }
}

#[async_trait]
pub trait TabDirectory: Send + Sync {
    async fn query(&self, filter: &TabQuery) -> Result<Vec<TabHandle>>;
}

/// Tab list kept in memory, in opening order.
#[derive(Default)]
pub struct InMemoryTabs {
    tabs: Mutex<Vec<TabHandle>>,
}

impl InMemoryTabs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tab; an active tab takes focus from every other tab.
    pub fn open_tab(&self, tab: TabHandle) {
        let mut tabs = self.tabs.lock().expect("InMemoryTabs poisoned");
        tabs.retain(|t| t.id != tab.id);
        if tab.active {
            tabs.iter_mut().for_each(|t| t.active = false);
        }
        tabs.push(tab);
    }

    pub fn close_tab(&self, id: TabId) -> Option<TabHandle> {
        let mut tabs = self.tabs.lock().expect("InMemoryTabs poisoned");
        let pos = tabs.iter().position(|t| t.id == id)?;
        Some(tabs.remove(pos))
    }

    pub fn activate(&self, id: TabId) -> bool {
        let mut tabs = self.tabs.lock().expect("InMemoryTabs poisoned");
        if !tabs.iter().any(|t| t.id == id) {
            return false;
        }
        for tab in tabs.iter_mut() {
            tab.active = tab.id == id;
        }
        true
    }
}

#[async_trait]
impl TabDirectory for InMemoryTabs {
    async fn query(&self, filter: &TabQuery) -> Result<Vec<TabHandle>> {
        Ok(self
            .tabs
            .lock()
            .expect("InMemoryTabs poisoned")
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(id: u32, title: &str, active: bool) -> TabHandle {
        TabHandle {
            id: TabId(id),
            title: title.to_string(),
            url: format!("http://tab/{id}"),
            active,
        }
    }

    #[tokio::test]
    async fn opening_active_tab_moves_focus() {
        let tabs = InMemoryTabs::new();
        tabs.open_tab(tab(1, "Video", true));
        tabs.open_tab(tab(2, "React App", true));

        let active = tabs.query(&TabQuery::Active).await.unwrap();
        assert_eq!(active, vec![tab(2, "React App", true)]);

        assert!(tabs.activate(TabId(1)));
        let active = tabs.query(&TabQuery::Active).await.unwrap();
        assert_eq!(active[0].id, TabId(1));
        assert!(!tabs.activate(TabId(42)));
    }

    #[tokio::test]
    async fn title_query_is_exact() {
        let tabs = InMemoryTabs::new();
        tabs.open_tab(tab(1, "React App", false));
        tabs.open_tab(tab(2, "React App - dev", false));

        let found = tabs
            .query(&TabQuery::Title("React App".to_string()))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, TabId(1));

        tabs.close_tab(TabId(1));
        assert!(
            tabs.query(&TabQuery::Title("React App".to_string()))
                .await
                .unwrap()
                .is_empty()
        );
    }
}
