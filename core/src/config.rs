//! Client Configuration
//!
//! Endpoint, language tag, and timing knobs for the chat client core.
//! Configuration comes from defaults, chainable setters, or environment
//! variables (`WIRECHAT_ENDPOINT`, `WIRECHAT_LANGUAGE`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a chat session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// WebSocket endpoint of the remote conversational model
    pub endpoint: String,
    /// Locale/language tag sent with every turn request
    pub language: String,
    /// Simulated processing delay before the upload reply is appended
    pub upload_reply_delay: Duration,
    /// Capacity of the event channels between tasks and the session
    pub event_capacity: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://127.0.0.1:8765".to_string(),
            language: "auto".to_string(),
            upload_reply_delay: Duration::from_secs(1),
            event_capacity: 100,
        }
    }
}

impl ChatConfig {
    /// Build configuration from environment variables.
    ///
    /// - `WIRECHAT_ENDPOINT`: WebSocket URL of the remote endpoint
    /// - `WIRECHAT_LANGUAGE`: language tag (default "auto")
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var("WIRECHAT_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(language) = std::env::var("WIRECHAT_LANGUAGE") {
            config.language = language;
        }
        config
    }

    /// Set the WebSocket endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the language tag
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the simulated upload reply delay
    #[must_use]
    pub fn with_upload_reply_delay(mut self, delay: Duration) -> Self {
        self.upload_reply_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.endpoint, "ws://127.0.0.1:8765");
        assert_eq!(config.language, "auto");
        assert_eq!(config.upload_reply_delay, Duration::from_secs(1));
        assert_eq!(config.event_capacity, 100);
    }

    #[test]
    fn test_chained_setters() {
        let config = ChatConfig::default()
            .with_endpoint("wss://chat.example.com/ws")
            .with_language("de")
            .with_upload_reply_delay(Duration::from_millis(10));
        assert_eq!(config.endpoint, "wss://chat.example.com/ws");
        assert_eq!(config.language, "de");
        assert_eq!(config.upload_reply_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = ChatConfig::default().with_language("fr");
        let json = serde_json::to_string(&config).unwrap();
        let decoded: ChatConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, decoded);
    }
}
