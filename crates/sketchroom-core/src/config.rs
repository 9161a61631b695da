//! Client configuration.

use thiserror::Error;
use url::Url;

use crate::color::Rgba;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid server URL {url:?}: {reason}")]
    InvalidServerUrl { url: String, reason: String },
    #[error("Room must not be empty")]
    EmptyRoom,
    #[error("Display name must not be empty")]
    EmptyName,
}

/// Canvas geometry and brush settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    /// Width of the shared logical drawing space.
    pub logical_width: u32,
    /// Height of the shared logical drawing space.
    pub logical_height: u32,
    /// Brush width in logical units.
    pub brush_width: f64,
    pub background: Rgba,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            logical_width: 800,
            logical_height: 600,
            brush_width: 5.0,
            background: Rgba::WHITE,
        }
    }
}

/// Connection and session configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Server base URL, e.g. `ws://localhost:8000`.
    pub server_url: String,
    pub room: String,
    /// Display name; also the participant's identity within the room.
    pub name: String,
    pub canvas: CanvasConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://localhost:8000".to_string(),
            room: "lobby".to_string(),
            name: "guest".to_string(),
            canvas: CanvasConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>, room: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            room: room.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build the WebSocket URL for this participant: `<server>/ws/<room>/<name>`.
    ///
    /// `http(s)` schemes are mapped to `ws(s)`; room and name are percent-encoded.
    pub fn websocket_url(&self) -> Result<String, ConfigError> {
        let room = self.room.trim();
        let name = self.name.trim();
        if room.is_empty() {
            return Err(ConfigError::EmptyRoom);
        }
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }

        let raw = self.server_url.trim();
        let raw = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("ws://{}", raw)
        };
        let invalid = |reason: String| ConfigError::InvalidServerUrl {
            url: self.server_url.clone(),
            reason,
        };

        let mut url = Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;
        let scheme = match url.scheme() {
            "ws" | "http" => "ws",
            "wss" | "https" => "wss",
            other => return Err(invalid(format!("unsupported scheme {}", other))),
        };
        url.set_scheme(scheme)
            .map_err(|_| invalid("cannot switch scheme".to_string()))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| invalid("URL cannot have a path".to_string()))?;
            segments.pop_if_empty();
            // A base already ending in /ws is accepted as-is.
            segments.extend(["ws", room, name].into_iter().skip(usize::from(self.base_ends_with_ws())));
        }
        Ok(url.to_string())
    }

    fn base_ends_with_ws(&self) -> bool {
        self.server_url.trim().trim_end_matches('/').ends_with("/ws")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_url() {
        let config = ClientConfig::new("ws://localhost:8000", "abc", "Alice");
        assert_eq!(config.websocket_url().unwrap(), "ws://localhost:8000/ws/abc/Alice");
    }

    #[test]
    fn test_websocket_url_encodes_segments() {
        let config = ClientConfig::new("https://draw.example.com/", "room 1", "Zoë/x");
        assert_eq!(
            config.websocket_url().unwrap(),
            "wss://draw.example.com/ws/room%201/Zo%C3%AB%2Fx"
        );
    }

    #[test]
    fn test_websocket_url_bare_host_and_ws_suffix() {
        let config = ClientConfig::new("localhost:3030", "r", "n");
        assert_eq!(config.websocket_url().unwrap(), "ws://localhost:3030/ws/r/n");

        let config = ClientConfig::new("ws://localhost:3030/ws", "r", "n");
        assert_eq!(config.websocket_url().unwrap(), "ws://localhost:3030/ws/r/n");
    }

    #[test]
    fn test_websocket_url_rejects_bad_input() {
        assert!(matches!(
            ClientConfig::new("ws://host", " ", "n").websocket_url(),
            Err(ConfigError::EmptyRoom)
        ));
        assert!(matches!(
            ClientConfig::new("ws://host", "r", "").websocket_url(),
            Err(ConfigError::EmptyName)
        ));
        assert!(matches!(
            ClientConfig::new("ftp://host", "r", "n").websocket_url(),
            Err(ConfigError::InvalidServerUrl { .. })
        ));
    }
}
