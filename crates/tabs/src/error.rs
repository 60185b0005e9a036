//! Error types for tab and session operations
//!
//! Flat on purpose. Most faults in this crate are absorbed and logged;
//! only the ones a caller can act on end up here.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TabsError>;

#[derive(Debug, Error)]
pub enum TabsError {
    #[error("No tab initializers were produced")]
    NoInitializers,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Disk writer closed")]
    DiskWriterClosed,
}
