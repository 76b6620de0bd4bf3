//! Tab set operations.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::error::BrowserError;

use super::browser::{Session, Tab};

/// One entry of the tab list.
#[derive(Debug, Clone, Serialize)]
pub struct TabInfo {
    pub index: usize,
    pub id: String,
    pub url: String,
    pub title: String,
    pub active: bool,
}

/// Outcome of closing a tab.
#[derive(Debug, Clone, Serialize)]
pub struct ClosedTab {
    pub closed: usize,
    pub active: usize,
    pub count: usize,
}

/// Merge the known tab order with the browser's live targets: known tabs
/// keep their position, vanished ones drop out, new ones are appended.
/// Returns the new order and the index of the previously active tab (or
/// the nearest surviving position).
pub(super) fn reconcile(current: &[String], live: &[String], active: usize) -> (Vec<String>, usize) {
    let mut order: Vec<String> = current.iter().filter(|id| live.contains(id)).cloned().collect();
    for id in live {
        if !order.contains(id) {
            order.push(id.clone());
        }
    }

    let active = current
        .get(active)
        .and_then(|id| order.iter().position(|o| o == id))
        .unwrap_or_else(|| active.min(order.len().saturating_sub(1)));
    (order, active)
}

impl Session {
    /// Reconcile the tab set against the browser, opening a blank tab when none remain.
    pub(crate) async fn sync_tabs(&mut self) -> Result<(), BrowserError> {
        let mut live: Vec<String> = self
            .client
            .list_page_targets()
            .await?
            .into_iter()
            .map(|t| t.target_id)
            .collect();

        if live.is_empty() {
            let page = self.client.new_page().await?;
            live.push(page.target_id().to_string());
        }

        let current: Vec<String> = self.tabs.iter().map(|t| t.target_id.clone()).collect();
        let (order, active) = reconcile(&current, &live, self.active);

        let mut pages: HashMap<String, Tab> = self
            .tabs
            .drain(..)
            .map(|t| (t.target_id.clone(), t))
            .collect();
        self.tabs = order
            .into_iter()
            .map(|id| pages.remove(&id).unwrap_or_else(|| Tab::new(id)))
            .collect();
        self.active = active;
        Ok(())
    }

    /// Ordered tab list with URL and title.
    pub async fn list_tabs(&mut self) -> Result<Vec<TabInfo>, BrowserError> {
        self.sync_tabs().await?;
        let targets = self.client.list_page_targets().await?;

        Ok(self
            .tabs
            .iter()
            .enumerate()
            .map(|(index, tab)| {
                let info = targets.iter().find(|t| t.target_id == tab.target_id);
                TabInfo {
                    index,
                    id: tab.target_id.clone(),
                    url: info.map(|t| t.url.clone()).unwrap_or_default(),
                    title: info.map(|t| t.title.clone()).unwrap_or_default(),
                    active: index == self.active,
                }
            })
            .collect())
    }

    /// Make the tab at `index` active.
    pub async fn switch_tab(&mut self, index: usize) -> Result<TabInfo, BrowserError> {
        self.sync_tabs().await?;
        if index >= self.tabs.len() {
            return Err(BrowserError::TabIndex {
                index,
                count: self.tabs.len(),
            });
        }

        self.active = index;
        let target_id = self.tabs[index].target_id.clone();
        self.client.activate(&target_id).await?;
        info!("Switched to tab {} ({})", index, target_id);

        let page = self.current_page().await?;
        Ok(TabInfo {
            index,
            id: target_id,
            url: page.get_url().await?,
            title: page.get_title().await?,
            active: true,
        })
    }

    /// Open a tab, optionally at `url`, and make it active.
    pub async fn new_tab(&mut self, url: Option<&str>) -> Result<TabInfo, BrowserError> {
        let page = self.client.new_page().await?;
        let target_id = page.target_id().to_string();
        if let Some(url) = url {
            page.navigate(url).await?;
        }

        self.sync_tabs().await?;
        let index = self
            .tabs
            .iter()
            .position(|t| t.target_id == target_id)
            .unwrap_or(self.tabs.len().saturating_sub(1));
        if let Some(tab) = self.tabs.get_mut(index) {
            tab.page = Some(std::sync::Arc::new(page));
        }
        self.active = index;
        info!("Opened tab {} ({})", index, target_id);

        let page = self.current_page().await?;
        Ok(TabInfo {
            index,
            id: target_id,
            url: page.get_url().await?,
            title: page.get_title().await?,
            active: true,
        })
    }

    /// Close the tab at `index` (the active one by default). The last tab
    /// is never closed.
    pub async fn close_tab(&mut self, index: Option<usize>) -> Result<ClosedTab, BrowserError> {
        self.sync_tabs().await?;
        let count = self.tabs.len();
        let index = index.unwrap_or(self.active);
        if index >= count {
            return Err(BrowserError::TabIndex { index, count });
        }
        if count <= 1 {
            return Err(BrowserError::LastTab);
        }

        let tab = self.tabs.remove(index);
        self.client.close_page(&tab.target_id).await?;
        if self.active > index || self.active >= self.tabs.len() {
            self.active = self.active.saturating_sub(1);
        }
        info!("Closed tab {} ({})", index, tab.target_id);

        self.sync_tabs().await?;
        let active_id = self.tabs[self.active].target_id.clone();
        self.client.activate(&active_id).await?;

        Ok(ClosedTab {
            closed: index,
            active: self.active,
            count: self.tabs.len(),
        })
    }
}
