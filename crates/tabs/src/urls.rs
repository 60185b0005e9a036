//! Reserved internal pages and URL classifiers

use url::Url;

pub const START_PAGE_URL: &str = "about:home";
pub const BOOKMARKS_URL: &str = "about:bookmarks";
pub const HISTORY_URL: &str = "about:history";
pub const DOWNLOADS_URL: &str = "about:downloads";

/// Built-in pages that are never persisted as engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalPage {
    Home,
    Bookmarks,
    History,
    Downloads,
}

impl InternalPage {
    pub fn url(self) -> &'static str {
        match self {
            InternalPage::Home => START_PAGE_URL,
            InternalPage::Bookmarks => BOOKMARKS_URL,
            InternalPage::History => HISTORY_URL,
            InternalPage::Downloads => DOWNLOADS_URL,
        }
    }

    /// Classify `url`. Query and fragment are ignored, so
    /// `about:history#today` is still the history page.
    pub fn from_url(url: &str) -> Option<Self> {
        let parsed = Url::parse(url.trim()).ok()?;
        if parsed.scheme() != "about" {
            return None;
        }

        match parsed.path() {
            "home" => Some(InternalPage::Home),
            "bookmarks" => Some(InternalPage::Bookmarks),
            "history" => Some(InternalPage::History),
            "downloads" => Some(InternalPage::Downloads),
            _ => None,
        }
    }
}

pub fn is_start_page_url(url: &str) -> bool {
    InternalPage::from_url(url) == Some(InternalPage::Home)
}

pub fn is_bookmark_url(url: &str) -> bool {
    InternalPage::from_url(url) == Some(InternalPage::Bookmarks)
}

pub fn is_history_url(url: &str) -> bool {
    InternalPage::from_url(url) == Some(InternalPage::History)
}

pub fn is_downloads_url(url: &str) -> bool {
    InternalPage::from_url(url) == Some(InternalPage::Downloads)
}

/// Any reserved internal page
pub fn is_special_url(url: &str) -> bool {
    InternalPage::from_url(url).is_some()
}

pub fn is_file_url(url: &str) -> bool {
    Url::parse(url.trim())
        .map(|parsed| parsed.scheme() == "file")
        .unwrap_or(false)
}
