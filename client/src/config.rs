//! Client configuration, loaded from JSON.

use std::path::Path;

use serde::Deserialize;

use crate::error::RoomError;

pub const SHOWDOWN_URL: &str = "wss://sim3.psim.us/showdown/websocket";

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Websocket endpoint of the chat server.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Maximum number of submitted lines kept per text entry.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Number of oldest lines dropped at once when the history overflows.
    #[serde(default = "default_history_trim")]
    pub history_trim: usize,
    /// Rooms joined as soon as the client starts.
    #[serde(default = "default_autojoin")]
    pub autojoin: Vec<String>,
}

fn default_server_url() -> String {
    SHOWDOWN_URL.to_string()
}

fn default_history_capacity() -> usize {
    100
}

fn default_history_trim() -> usize {
    20
}

fn default_autojoin() -> Vec<String> {
    vec!["lobby".to_string()]
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            history_capacity: default_history_capacity(),
            history_trim: default_history_trim(),
            autojoin: default_autojoin(),
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self, RoomError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RoomError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RoomError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<(), RoomError> {
        if self.history_capacity == 0 {
            return Err(RoomError::Config("history_capacity must be positive".into()));
        }
        if self.history_trim == 0 || self.history_trim > self.history_capacity {
            return Err(RoomError::Config(format!(
                "history_trim must be between 1 and {}",
                self.history_capacity
            )));
        }
        Ok(())
    }
}
