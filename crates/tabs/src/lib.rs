//! Tab lifecycle and session persistence for a browser
//!
//! Owns the set of open tabs, which one is current, and the order they
//! were last used in. Sessions are saved to a single named record and
//! restored on the next start.
//!
//! ```text
//! LaunchIntent ──► RestorePlanner (worker task) ──► [TabInitializer]
//!                        │ reads                          │
//!                  BundleStorage ◄── DiskWriter ◄──┐      ▼
//!                                                  └── TabsManager ──► Tab ──► EngineView
//! ```
//!
//! The engine itself stays outside: embedders implement `EngineView` and
//! `BrowserContext`.

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod initializer;
pub mod manager;
pub mod planner;
pub mod recency;
pub mod search;
pub mod storage;
pub mod tab;
pub mod urls;

#[cfg(test)]
mod testing;

pub use codec::{FaviconCodec, JpegFaviconCodec};
pub use config::TabsConfig;
pub use engine::{BrowserContext, EngineView};
pub use error::{Result, TabsError};
pub use initializer::TabInitializer;
pub use manager::TabsManager;
pub use recency::RecencyTracker;
pub use search::{LaunchIntent, SearchEngine, SearchEngineProvider, StaticSearchEngine};
pub use storage::{BundleStorage, FileStorage, MemoryStorage, SessionRecord};
pub use tab::{Favicon, FrozenState, Tab, TabId};
