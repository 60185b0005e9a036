//! Tab initializers - how a new tab gets its first content
//!
//! A closed set of variants, consumed exactly once when a tab is built.

use crate::engine::BrowserContext;
use crate::tab::{Favicon, FrozenState, Tab};
use crate::urls::InternalPage;

#[derive(Debug, Clone, PartialEq)]
pub enum TabInitializer {
    Home,
    Bookmarks,
    History,
    Downloads,
    /// Plain URL load
    Url(String),
    /// Local file; the context must grant access before it loads
    PermissionUrl(String),
    /// Previously saved session content
    Restore {
        state: FrozenState,
        url: Option<String>,
        title: String,
        favicon: Option<Favicon>,
    },
}

impl TabInitializer {
    pub fn for_page(page: InternalPage) -> Self {
        match page {
            InternalPage::Home => TabInitializer::Home,
            InternalPage::Bookmarks => TabInitializer::Bookmarks,
            InternalPage::History => TabInitializer::History,
            InternalPage::Downloads => TabInitializer::Downloads,
        }
    }

    pub(crate) fn initialize(self, tab: &mut Tab, context: &dyn BrowserContext) {
        match self {
            TabInitializer::Home => tab.load_url(InternalPage::Home.url()),
            TabInitializer::Bookmarks => tab.load_url(InternalPage::Bookmarks.url()),
            TabInitializer::History => tab.load_url(InternalPage::History.url()),
            TabInitializer::Downloads => tab.load_url(InternalPage::Downloads.url()),
            TabInitializer::Url(url) => tab.load_url(&url),
            TabInitializer::PermissionUrl(url) => {
                if context.request_file_permission(&url) {
                    tab.load_url(&url);
                } else {
                    tracing::warn!("[TabInitializer] File access denied, opening home: {}", url);
                    tab.load_url(InternalPage::Home.url());
                }
            }
            TabInitializer::Restore {
                state,
                url,
                title,
                favicon,
            } => tab.freeze(state, url, title, favicon),
        }
    }
}
