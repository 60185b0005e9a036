//! Restore Planner - the database-context half of initialization
//!
//! Resolves the launch URL, reads the persisted session and decides which
//! initializers to build. Touches nothing owned by the manager, so it can
//! run on any worker thread.

use std::sync::Arc;

use crate::codec::{decode_session, DecodedSession, FaviconCodec};
use crate::config::TabsConfig;
use crate::initializer::TabInitializer;
use crate::search::{
    smart_url_filter, IntentAction, LaunchIntent, SearchEngineProvider, QUERY_PLACE_HOLDER,
};
use crate::storage::BundleStorage;
use crate::urls::is_file_url;

/// Initializers to materialize, plus the recency saved alongside them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestorePlan {
    pub initializers: Vec<TabInitializer>,
    /// `None` when no saved session was read (incognito, missing or
    /// unreadable record); the manager then keeps what it already had.
    pub recency_indices: Option<Vec<usize>>,
}

#[derive(Clone)]
pub struct RestorePlanner {
    pub(crate) config: TabsConfig,
    pub(crate) storage: Arc<dyn BundleStorage>,
    pub(crate) search: Arc<dyn SearchEngineProvider>,
    pub(crate) favicons: Arc<dyn FaviconCodec>,
}

impl RestorePlanner {
    pub fn new(
        config: TabsConfig,
        storage: Arc<dyn BundleStorage>,
        search: Arc<dyn SearchEngineProvider>,
        favicons: Arc<dyn FaviconCodec>,
    ) -> Self {
        Self {
            config,
            storage,
            search,
            favicons,
        }
    }

    /// Work out what a fresh session should contain.
    ///
    /// Incognito sessions get exactly one tab: the launch URL, or home.
    /// Regular sessions get every restored tab, then the launch URL if
    /// there is one. Home is only added when both are missing.
    pub async fn plan(&self, intent: Option<&LaunchIntent>, incognito: bool) -> RestorePlan {
        let initial_url = intent.and_then(|intent| self.initial_url(intent));

        if incognito {
            return RestorePlan {
                initializers: vec![initial_url
                    .map(TabInitializer::Url)
                    .unwrap_or(TabInitializer::Home)],
                recency_indices: None,
            };
        }

        let (mut initializers, recency_indices) = match self.restore_previous_tabs().await {
            Some(restored) => (restored.initializers, Some(restored.recency_indices)),
            None => (Vec::new(), None),
        };

        if let Some(url) = initial_url {
            if is_file_url(&url) {
                initializers.push(TabInitializer::PermissionUrl(url));
            } else {
                initializers.push(TabInitializer::Url(url));
            }
        }

        if initializers.is_empty() {
            initializers.push(TabInitializer::Home);
        }

        RestorePlan {
            initializers,
            recency_indices,
        }
    }

    /// URL the browser was asked to open, if any. Search intents go through
    /// the smart URL filter; a blank query means no URL.
    pub fn initial_url(&self, intent: &LaunchIntent) -> Option<String> {
        match intent.action {
            IntentAction::WebSearch => self.extract_search(intent),
            IntentAction::Main | IntentAction::View => intent.data.clone(),
        }
    }

    fn extract_search(&self, intent: &LaunchIntent) -> Option<String> {
        let query = intent.query.as_deref().filter(|q| !q.trim().is_empty())?;
        let search_url = format!(
            "{}{}",
            self.search.provide_search_engine().query_url,
            QUERY_PLACE_HOLDER
        );
        Some(smart_url_filter(query, true, &search_url))
    }

    /// Initializers for every tab in the persisted session. A missing or
    /// unreadable record yields `None`.
    async fn restore_previous_tabs(&self) -> Option<DecodedSession> {
        let record = match self.storage.read(&self.config.storage_name).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::debug!("[RestorePlanner] No saved session");
                return None;
            }
            Err(e) => {
                tracing::warn!("[RestorePlanner] Ignoring unreadable saved session: {}", e);
                return None;
            }
        };

        let decoded = decode_session(&record, self.favicons.as_ref(), &self.config.untitled_title);
        tracing::info!(
            "[RestorePlanner] Restoring {} tabs from saved session",
            decoded.initializers.len()
        );
        Some(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JpegFaviconCodec;
    use crate::search::StaticSearchEngine;
    use crate::storage::{FileStorage, MemoryStorage, RecordValue, SessionRecord};
    use crate::tab::FrozenState;
    use crate::urls::DOWNLOADS_URL;

    fn planner(storage: Arc<MemoryStorage>) -> RestorePlanner {
        RestorePlanner::new(
            TabsConfig::default(),
            storage,
            Arc::new(StaticSearchEngine::new("https://duckduckgo.com/?q=")),
            Arc::new(JpegFaviconCodec),
        )
    }

    fn saved_session() -> SessionRecord {
        let mut record = SessionRecord::new();
        record.put("CONTENT_STATE_0", RecordValue::Marker(DOWNLOADS_URL.to_string()));
        record.put("CONTENT_STATE_1", RecordValue::State(FrozenState::new(vec![7])));
        record.put("TAB_URL_1", RecordValue::Text("https://seven.example".to_string()));
        record.put("TAB_TITLE_1", RecordValue::Text("Seven".to_string()));
        record.put("RECENT_TAB_INDICES", RecordValue::Indices(vec![1, 0]));
        record
    }

    #[tokio::test]
    async fn test_empty_session_falls_back_to_home() {
        let plan = planner(Arc::new(MemoryStorage::new())).plan(None, false).await;

        assert_eq!(plan.initializers, vec![TabInitializer::Home]);
        assert_eq!(plan.recency_indices, None);
    }

    #[tokio::test]
    async fn test_malformed_session_file_falls_back_to_home() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("saved_tabs.json"), b"{ not json").unwrap();
        let planner = RestorePlanner::new(
            TabsConfig::default(),
            Arc::new(FileStorage::new(dir.path())),
            Arc::new(StaticSearchEngine::new("https://duckduckgo.com/?q=")),
            Arc::new(JpegFaviconCodec),
        );

        let plan = planner.plan(None, false).await;

        assert_eq!(plan.initializers, vec![TabInitializer::Home]);
        assert_eq!(plan.recency_indices, None);
    }

    #[tokio::test]
    async fn test_launch_url_is_appended_after_restored_tabs() {
        let storage = Arc::new(MemoryStorage::new());
        storage.insert("saved_tabs.json", saved_session());

        let intent = LaunchIntent::view("https://example.com");
        let plan = planner(storage).plan(Some(&intent), false).await;

        assert_eq!(plan.initializers.len(), 3);
        assert_eq!(plan.initializers[0], TabInitializer::Downloads);
        assert_eq!(
            plan.initializers[1],
            TabInitializer::Restore {
                state: FrozenState::new(vec![7]),
                url: Some("https://seven.example".to_string()),
                title: "Seven".to_string(),
                favicon: None,
            }
        );
        assert_eq!(
            plan.initializers[2],
            TabInitializer::Url("https://example.com".to_string())
        );
        assert_eq!(plan.recency_indices, Some(vec![1, 0]));
    }

    #[tokio::test]
    async fn test_restored_session_without_launch_url_gets_no_home() {
        let storage = Arc::new(MemoryStorage::new());
        storage.insert("saved_tabs.json", saved_session());

        let plan = planner(storage).plan(Some(&LaunchIntent::main()), false).await;

        assert_eq!(plan.initializers.len(), 2);
        assert!(!plan.initializers.contains(&TabInitializer::Home));
    }

    #[tokio::test]
    async fn test_file_url_needs_permission() {
        let intent = LaunchIntent::view("file:///sdcard/page.html");
        let plan = planner(Arc::new(MemoryStorage::new()))
            .plan(Some(&intent), false)
            .await;

        assert_eq!(
            plan.initializers,
            vec![TabInitializer::PermissionUrl("file:///sdcard/page.html".to_string())]
        );
    }

    #[tokio::test]
    async fn test_incognito_ignores_saved_session() {
        let storage = Arc::new(MemoryStorage::new());
        storage.insert("saved_tabs.json", saved_session());
        let planner = planner(storage);

        let plan = planner.plan(None, true).await;
        assert_eq!(plan.initializers, vec![TabInitializer::Home]);
        assert_eq!(plan.recency_indices, None);

        let intent = LaunchIntent::view("https://example.com");
        let plan = planner.plan(Some(&intent), true).await;
        assert_eq!(
            plan.initializers,
            vec![TabInitializer::Url("https://example.com".to_string())]
        );
    }

    #[test]
    fn test_search_intent_resolution() {
        let planner = planner(Arc::new(MemoryStorage::new()));

        assert_eq!(
            planner.initial_url(&LaunchIntent::web_search("rust tabs")),
            Some("https://duckduckgo.com/?q=rust+tabs".to_string())
        );
        assert_eq!(
            planner.initial_url(&LaunchIntent::web_search("example.org")),
            Some("http://example.org".to_string())
        );
        assert_eq!(planner.initial_url(&LaunchIntent::web_search("   ")), None);
        assert_eq!(planner.initial_url(&LaunchIntent::main()), None);
    }
}
