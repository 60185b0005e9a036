//! Manager configuration

use serde::{Deserialize, Serialize};

/// Tabs manager configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    /// Name of the persisted session record
    pub storage_name: String,

    /// Title given to restored tabs that were saved without one
    pub untitled_title: String,

    /// Quality hint handed to the favicon encoder (0-100)
    pub favicon_quality: u8,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            storage_name: "saved_tabs.json".to_string(),
            untitled_title: "untitled".to_string(),
            favicon_quality: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: TabsConfig =
            serde_json::from_str(r#"{ "storage_name": "session.json" }"#).unwrap();

        assert_eq!(config.storage_name, "session.json");
        assert_eq!(config.untitled_title, "untitled");
        assert_eq!(config.favicon_quality, 100);
    }
}
