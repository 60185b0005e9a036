//! Tab - one browsing session
//!
//! A tab owns its engine view outright. It is created and destroyed only
//! by the manager, which guarantees `destroy` runs before the tab is
//! dropped.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::EngineView;

/// Stable opaque tab handle, minted at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque engine snapshot. The manager stores and forwards it, never
/// looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenState(Vec<u8>);

impl FrozenState {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Decoded favicon, RGBA8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favicon {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

pub struct Tab {
    id: TabId,
    url: String,
    title: String,
    favicon: Option<Favicon>,
    incognito: bool,
    /// Snapshot waiting to be handed to the engine
    frozen: Option<FrozenState>,
    view: Box<dyn EngineView>,
    destroyed: bool,
}

impl Tab {
    pub(crate) fn new(view: Box<dyn EngineView>, incognito: bool) -> Self {
        Self {
            id: TabId::new(),
            url: String::new(),
            title: String::new(),
            favicon: None,
            incognito,
            frozen: None,
            view,
            destroyed: false,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn favicon(&self) -> Option<&Favicon> {
        self.favicon.as_ref()
    }

    pub fn is_incognito(&self) -> bool {
        self.incognito
    }

    /// True while the tab still holds a snapshot the engine has not seen
    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_favicon(&mut self, favicon: Option<Favicon>) {
        self.favicon = favicon;
    }

    /// Navigate the engine view
    pub fn load_url(&mut self, url: &str) {
        self.frozen = None;
        self.url = url.to_string();
        self.view.load_url(url);
    }

    /// Park a snapshot on the tab without waking the engine. `url` is only a
    /// display hint until the engine reports its own after thawing.
    pub(crate) fn freeze(
        &mut self,
        state: FrozenState,
        url: Option<String>,
        title: String,
        favicon: Option<Favicon>,
    ) {
        self.frozen = Some(state);
        if let Some(url) = url {
            self.url = url;
        }
        self.title = title;
        self.favicon = favicon;
    }

    /// Hand a parked snapshot to the engine. No-op for live tabs.
    pub fn thaw(&mut self) {
        if let Some(frozen) = self.frozen.take() {
            tracing::debug!("[Tab] Thawing {}", self.id);
            self.view.restore_state(&frozen);
            if let Some(url) = self.view.current_url() {
                self.url = url;
            }
        }
    }

    /// Current restorable state. Frozen tabs return their snapshot untouched.
    pub fn save_state(&self) -> FrozenState {
        match &self.frozen {
            Some(frozen) => frozen.clone(),
            None => self.view.save_state(),
        }
    }

    pub fn resume(&mut self) {
        self.view.on_resume();
    }

    pub fn pause(&mut self) {
        self.view.on_pause();
    }

    pub fn resume_timers(&mut self) {
        self.view.resume_timers();
    }

    pub fn pause_timers(&mut self) {
        self.view.pause_timers();
    }

    pub(crate) fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.view.destroy();
        self.destroyed = true;
    }
}

impl std::fmt::Debug for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tab")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("title", &self.title)
            .field("incognito", &self.incognito)
            .field("frozen", &self.frozen.is_some())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BrowserContext;
    use crate::testing::FakeContext;

    #[test]
    fn test_tab_ids_are_unique() {
        let context = FakeContext::new();
        let a = Tab::new(context.create_view(false), false);
        let b = Tab::new(context.create_view(false), false);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_frozen_tab_saves_without_touching_engine() {
        let context = FakeContext::new();
        let mut tab = Tab::new(context.create_view(false), false);
        let state = FrozenState::new(b"https://rust-lang.org".to_vec());

        tab.freeze(
            state.clone(),
            Some("https://rust-lang.org".to_string()),
            "Rust".to_string(),
            None,
        );

        assert!(tab.is_frozen());
        assert_eq!(tab.url(), "https://rust-lang.org");
        assert_eq!(tab.save_state(), state);
        assert!(context.calls().is_empty());

        tab.thaw();
        assert!(!tab.is_frozen());
        assert_eq!(tab.url(), "https://rust-lang.org");
        assert_eq!(tab.title(), "Rust");
        assert_eq!(context.calls().len(), 1);
    }

    #[test]
    fn test_destroy_runs_once() {
        let context = FakeContext::new();
        let mut tab = Tab::new(context.create_view(false), false);

        tab.destroy();
        tab.destroy();

        assert!(tab.is_destroyed());
        assert_eq!(context.count_calls("destroy"), 1);
    }
}
