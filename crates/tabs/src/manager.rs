//! Tabs Manager - owns every tab and the current-tab pointer
//!
//! Creation, deletion, switching, restoration and state saving all go
//! through here. The manager lives on the main context: tabs hold engine
//! views, which never leave it. Background work (restore planning, disk
//! writes) is handed off and only its results come back.

use std::sync::Arc;

use crate::codec::{encode_session, FaviconCodec, JpegFaviconCodec};
use crate::config::TabsConfig;
use crate::engine::BrowserContext;
use crate::error::{Result, TabsError};
use crate::initializer::TabInitializer;
use crate::planner::RestorePlanner;
use crate::recency::RecencyTracker;
use crate::search::{LaunchIntent, SearchEngineProvider};
use crate::storage::{BundleStorage, DiskWriter, PendingWrite};
use crate::tab::{Tab, TabId};

/// Called with the new tab count after every creation or deletion
pub type TabCountListener = Box<dyn Fn(usize)>;

/// Work deferred until the manager is initialized
pub type PendingWork = Box<dyn FnOnce(&mut TabsManager)>;

pub struct TabsManager {
    config: TabsConfig,
    planner: RestorePlanner,
    disk: DiskWriter,

    /// Display order, not recency order
    tabs: Vec<Tab>,
    /// Always a member of `tabs`, or None
    current: Option<TabId>,
    recency: RecencyTracker,
    /// Recency as last read from or written to disk, as positions into `tabs`
    saved_recency_indices: Vec<usize>,

    listeners: Vec<TabCountListener>,
    initialized: bool,
    /// Only non-empty while not initialized
    pending_work: Vec<PendingWork>,
}

impl TabsManager {
    /// Create a manager backed by `storage`. Spawns the disk worker, so
    /// this must be called inside a tokio runtime.
    pub fn new(
        config: TabsConfig,
        storage: Arc<dyn BundleStorage>,
        search: Arc<dyn SearchEngineProvider>,
    ) -> Self {
        Self::with_favicon_codec(config, storage, search, Arc::new(JpegFaviconCodec))
    }

    pub fn with_favicon_codec(
        config: TabsConfig,
        storage: Arc<dyn BundleStorage>,
        search: Arc<dyn SearchEngineProvider>,
        favicons: Arc<dyn FaviconCodec>,
    ) -> Self {
        Self {
            disk: DiskWriter::spawn(storage.clone()),
            planner: RestorePlanner::new(config.clone(), storage, search, favicons),
            config,
            tabs: Vec::new(),
            current: None,
            recency: RecencyTracker::new(),
            saved_recency_indices: Vec::new(),
            listeners: Vec::new(),
            initialized: false,
            pending_work: Vec::new(),
        }
    }

    pub fn config(&self) -> &TabsConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn add_tab_number_changed_listener(&mut self, listener: impl Fn(usize) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify_tab_count(&self) {
        let count = self.tabs.len();
        for listener in &self.listeners {
            listener(count);
        }
    }

    /// Run `work` now if initialized, otherwise once initialization
    /// finishes, after everything queued before it.
    pub fn do_after_initialization(&mut self, work: impl FnOnce(&mut TabsManager) + 'static) {
        if self.initialized {
            work(self);
        } else {
            self.pending_work.push(Box::new(work));
        }
    }

    /// Drop queued work without running it
    pub fn cancel_pending_work(&mut self) {
        self.pending_work.clear();
    }

    /// Start a session: throw away the current one, restore the saved one
    /// (unless incognito), add the tab the launch intent asks for, and
    /// present the last tab built. Returns that tab.
    ///
    /// Planning runs on a worker task; tabs are built back on the caller's
    /// task. Only one call may be in flight per manager.
    pub async fn initialize_tabs(
        &mut self,
        context: &dyn BrowserContext,
        intent: Option<&LaunchIntent>,
        incognito: bool,
    ) -> Result<TabId> {
        self.shutdown();

        let planner = self.planner.clone();
        let intent = intent.cloned();
        let plan = tokio::spawn(async move { planner.plan(intent.as_ref(), incognito).await })
            .await?;

        let mut last = None;
        for initializer in plan.initializers {
            last = Some(self.new_tab(context, initializer, incognito));
        }
        let tab_id = last.ok_or(TabsError::NoInitializers)?;
        if let Some(indices) = plan.recency_indices {
            self.saved_recency_indices = indices;
        }

        if let Some(position) = self.position_of(tab_id) {
            self.switch_to_tab(position);
        }
        self.finish_initialization();

        tracing::info!("[TabsManager] Initialized with {} tabs", self.tabs.len());
        Ok(tab_id)
    }

    fn finish_initialization(&mut self) {
        let ids = self.tab_ids();

        if self.saved_recency_indices.len() == ids.len() {
            self.recency.restore_from_indices(&self.saved_recency_indices, &ids);
        } else {
            tracing::debug!(
                "[TabsManager] {} saved recency entries for {} tabs, resetting",
                self.saved_recency_indices.len(),
                ids.len()
            );
            self.recency.rebuild_arbitrary(&ids, self.current);
        }
        self.recency.ensure_consistent(&ids, self.current);

        self.initialized = true;
        for work in std::mem::take(&mut self.pending_work) {
            work(self);
        }
    }

    /// Resume every tab. The current tab also gets its timers back.
    pub fn resume_all(&mut self) {
        if let Some(tab) = self.current_tab_mut() {
            tab.resume_timers();
        }
        for tab in &mut self.tabs {
            tab.resume();
        }
    }

    /// Pause every tab. The current tab also has its timers paused.
    pub fn pause_all(&mut self) {
        if let Some(tab) = self.current_tab_mut() {
            tab.pause_timers();
        }
        for tab in &mut self.tabs {
            tab.pause();
        }
    }

    /// Build a tab from `initializer` and append it
    pub fn new_tab(
        &mut self,
        context: &dyn BrowserContext,
        initializer: TabInitializer,
        incognito: bool,
    ) -> TabId {
        tracing::debug!("[TabsManager] New tab");
        let mut tab = Tab::new(context.create_view(incognito), incognito);
        initializer.initialize(&mut tab, context);

        let id = tab.id();
        self.tabs.push(tab);
        self.recency.track(id);
        self.notify_tab_count();
        id
    }

    /// Delete the tab at `position`. If it is the current tab, the next tab
    /// becomes current, or the previous one when it was last. Returns
    /// whether the current tab was deleted. Out-of-range positions are
    /// ignored.
    pub fn delete_tab(&mut self, position: usize) -> bool {
        tracing::debug!("[TabsManager] Delete tab: {}", position);
        if position >= self.tabs.len() {
            return false;
        }

        let was_current = self.index_of_current_tab() == Some(position);
        if was_current {
            if self.tabs.len() == 1 {
                self.current = None;
            } else if position < self.tabs.len() - 1 {
                self.set_current(position + 1);
            } else {
                self.set_current(position - 1);
            }
        }

        self.remove_tab(position);
        self.notify_tab_count();
        if self.initialized {
            let ids = self.tab_ids();
            self.recency.ensure_consistent(&ids, self.current);
        }
        was_current
    }

    fn remove_tab(&mut self, position: usize) {
        let mut tab = self.tabs.remove(position);
        self.recency.remove(tab.id());
        if self.current == Some(tab.id()) {
            self.current = None;
        }
        tab.destroy();
    }

    /// Make the tab at `position` current and most recent. Frozen tabs are
    /// thawed on the way.
    pub fn switch_to_tab(&mut self, position: usize) -> Option<&Tab> {
        tracing::debug!("[TabsManager] Switch to tab: {}", position);
        let Some(tab) = self.tabs.get_mut(position) else {
            tracing::warn!("[TabsManager] No tab at position {}", position);
            return None;
        };

        tab.thaw();
        let id = tab.id();
        self.current = Some(id);
        self.recency.touch(id);
        self.tabs.get(position)
    }

    /// Move the current pointer without thawing. Presenting the tab is up to
    /// the caller.
    fn set_current(&mut self, position: usize) {
        if let Some(id) = self.tabs.get(position).map(Tab::id) {
            self.current = Some(id);
            self.recency.touch(id);
        }
    }

    /// Destroy every tab and forget the session
    pub fn shutdown(&mut self) {
        while !self.tabs.is_empty() {
            self.delete_tab(0);
        }
        self.current = None;
        self.initialized = false;
    }

    /// Persist the whole collection. Returns immediately; the write is
    /// queued on the disk worker behind any earlier ones.
    pub fn save_state(&mut self) -> PendingWrite {
        tracing::info!("[TabsManager] Saving tab state");
        let ids = self.tab_ids();
        self.saved_recency_indices = self.recency.to_index_array(&ids);

        let record = encode_session(
            &self.tabs,
            &self.saved_recency_indices,
            self.planner.favicons.as_ref(),
            self.config.favicon_quality,
        );
        self.disk.write(self.config.storage_name.clone(), record)
    }

    /// Delete the persisted session so the next start is empty
    pub fn clear_saved_state(&self) -> PendingWrite {
        tracing::info!("[TabsManager] Clearing saved tab state");
        self.disk.delete(self.config.storage_name.clone())
    }

    /// Recency positions last read from or written to disk
    pub fn saved_recency_indices(&self) -> &[usize] {
        &self.saved_recency_indices
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab_ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(Tab::id).collect()
    }

    pub fn size(&self) -> usize {
        self.tabs.len()
    }

    /// Index of the last tab, or None when there are no tabs
    pub fn last(&self) -> Option<usize> {
        self.tabs.len().checked_sub(1)
    }

    pub fn last_tab(&self) -> Option<&Tab> {
        self.tabs.last()
    }

    pub fn tab_at(&self, position: usize) -> Option<&Tab> {
        self.tabs.get(position)
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id() == id)
    }

    pub fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|tab| tab.id() == id)
    }

    pub fn position_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id() == id)
    }

    pub fn current_tab(&self) -> Option<&Tab> {
        self.tab(self.current?)
    }

    fn current_tab_mut(&mut self) -> Option<&mut Tab> {
        let id = self.current?;
        self.tab_mut(id)
    }

    pub fn index_of_current_tab(&self) -> Option<usize> {
        self.position_of(self.current?)
    }

    /// Tab ids, least recently used first
    pub fn recent_tabs(&self) -> Vec<TabId> {
        self.recency.iter().collect()
    }
}
