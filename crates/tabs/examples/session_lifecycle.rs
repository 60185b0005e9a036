//! Session lifecycle example - open tabs, save, and restore them

use std::sync::Arc;

use tabs::{
    BrowserContext, EngineView, FileStorage, FrozenState, LaunchIntent, StaticSearchEngine,
    TabInitializer, TabsConfig, TabsManager,
};

/// Engine stand-in that remembers only the URL it shows
struct HeadlessView {
    url: Option<String>,
}

impl EngineView for HeadlessView {
    fn load_url(&mut self, url: &str) {
        self.url = Some(url.to_string());
    }

    fn restore_state(&mut self, state: &FrozenState) {
        self.url = Some(String::from_utf8_lossy(state.as_bytes()).into_owned());
    }

    fn save_state(&self) -> FrozenState {
        FrozenState::new(self.url.clone().unwrap_or_default())
    }

    fn current_url(&self) -> Option<String> {
        self.url.clone()
    }

    fn on_resume(&mut self) {}
    fn on_pause(&mut self) {}
    fn resume_timers(&mut self) {}
    fn pause_timers(&mut self) {}

    fn destroy(&mut self) {
        tracing::debug!("Destroying view for {:?}", self.url);
    }
}

struct Headless;

impl BrowserContext for Headless {
    fn create_view(&self, _incognito: bool) -> Box<dyn EngineView> {
        Box::new(HeadlessView { url: None })
    }

    fn request_file_permission(&self, _url: &str) -> bool {
        true
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let dir = std::env::temp_dir().join("tabs-session-example");
    let storage = Arc::new(FileStorage::new(&dir));
    let search = Arc::new(StaticSearchEngine::new("https://duckduckgo.com/?q="));
    let context = Headless;

    let mut manager = TabsManager::new(TabsConfig::default(), storage.clone(), search.clone());
    manager.add_tab_number_changed_listener(|count| println!("Tabs open: {}", count));

    let intent = LaunchIntent::web_search("rust tab manager");
    let first = manager
        .initialize_tabs(&context, Some(&intent), false)
        .await?;
    println!("Presenting {:?}", manager.tab(first).map(|tab| tab.url()));

    manager.new_tab(&context, TabInitializer::Url("https://www.rust-lang.org".into()), false);
    manager.new_tab(&context, TabInitializer::Bookmarks, false);
    manager.switch_to_tab(1);

    manager.save_state().await?;
    println!("Saved session to {:?}", dir);

    // A second start picks the session back up
    let mut restored = TabsManager::new(TabsConfig::default(), storage, search);
    let presented = restored.initialize_tabs(&context, None, false).await?;
    for (position, tab) in restored.tabs().iter().enumerate() {
        println!("{}: {} (frozen: {})", position, tab.url(), tab.is_frozen());
    }
    println!("Presenting {:?}", restored.position_of(presented));

    restored.clear_saved_state().await?;
    restored.shutdown();
    Ok(())
}
