//! Rendering engine boundary
//!
//! The manager never renders anything itself. It drives engine views
//! through these traits and leaves the rest to the embedder. Views are
//! main-thread objects, so neither trait requires `Send`.

use crate::tab::FrozenState;

/// A single engine view backing one tab
pub trait EngineView {
    /// Start loading `url`
    fn load_url(&mut self, url: &str);

    /// Rebuild the view's content from a frozen snapshot
    fn restore_state(&mut self, state: &FrozenState);

    /// Snapshot the view's content so it can be restored later
    fn save_state(&self) -> FrozenState;

    /// URL the view is currently showing, if it knows one
    fn current_url(&self) -> Option<String>;

    fn on_resume(&mut self);

    fn on_pause(&mut self);

    /// Resume JavaScript timers. Generic resume does not reliably do this.
    fn resume_timers(&mut self);

    /// Pause JavaScript timers. Generic pause does not reliably do this.
    fn pause_timers(&mut self);

    /// Release every engine-held resource. Called exactly once, on the
    /// main context, before the owning tab is dropped.
    fn destroy(&mut self);
}

/// Host environment tabs are created in
pub trait BrowserContext {
    /// Create a fresh engine view
    fn create_view(&self, incognito: bool) -> Box<dyn EngineView>;

    /// One-time permission check before a local file is loaded
    fn request_file_permission(&self, url: &str) -> bool;
}
