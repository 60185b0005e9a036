//! Launch intents and turning free text into a navigable URL

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Placeholder substituted with the encoded query in search templates
pub const QUERY_PLACE_HOLDER: &str = "%s";

const ACCEPTED_SCHEMES: &[&str] = &[
    "http://",
    "https://",
    "file://",
    "ftp://",
    "about:",
    "data:",
    "javascript:",
    "content:",
];

/// A search engine as seen by the manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEngine {
    /// Query URL prefix; the encoded query is appended
    pub query_url: String,
}

pub trait SearchEngineProvider: Send + Sync {
    fn provide_search_engine(&self) -> SearchEngine;
}

/// Provider that always hands out the same engine
#[derive(Debug, Clone)]
pub struct StaticSearchEngine(pub SearchEngine);

impl StaticSearchEngine {
    pub fn new(query_url: impl Into<String>) -> Self {
        Self(SearchEngine {
            query_url: query_url.into(),
        })
    }
}

impl SearchEngineProvider for StaticSearchEngine {
    fn provide_search_engine(&self) -> SearchEngine {
        self.0.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentAction {
    Main,
    View,
    WebSearch,
}

/// What the browser was launched with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchIntent {
    pub action: IntentAction,
    pub data: Option<String>,
    pub query: Option<String>,
}

impl LaunchIntent {
    pub fn main() -> Self {
        Self {
            action: IntentAction::Main,
            data: None,
            query: None,
        }
    }

    pub fn view(url: impl Into<String>) -> Self {
        Self {
            action: IntentAction::View,
            data: Some(url.into()),
            query: None,
        }
    }

    pub fn web_search(query: impl Into<String>) -> Self {
        Self {
            action: IntentAction::WebSearch,
            data: None,
            query: Some(query.into()),
        }
    }
}

/// Resolve free text into something the engine can load.
///
/// Input with an accepted scheme is kept (scheme lowercased). Host-like
/// input without spaces gets `http://`. Anything else becomes a search
/// URL when `can_be_search` is set, or the empty string otherwise.
pub fn smart_url_filter(input: &str, can_be_search: bool, search_url: &str) -> String {
    let input = input.trim();
    let has_space = input.contains(' ');

    if let Some(scheme) = ACCEPTED_SCHEMES
        .iter()
        .find(|scheme| starts_with_ignore_case(input, scheme))
    {
        let rest = &input[scheme.len()..];
        let url = format!("{}{}", scheme, rest);
        return if has_space {
            url.replace(' ', "%20")
        } else {
            url
        };
    }

    if !has_space && looks_like_web_url(input) {
        return format!("http://{}", input);
    }

    if can_be_search {
        compose_search_url(input, search_url)
    } else {
        String::new()
    }
}

fn starts_with_ignore_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

fn looks_like_web_url(input: &str) -> bool {
    if input.is_empty() {
        return false;
    }
    match url::Url::parse(&format!("http://{}", input)) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => {
                host == "localhost"
                    || (host.contains('.') && !host.starts_with('.') && !host.ends_with('.'))
            }
            None => false,
        },
        Err(_) => false,
    }
}

fn compose_search_url(query: &str, search_url: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    search_url.replacen(QUERY_PLACE_HOLDER, &encoded, 1)
}
