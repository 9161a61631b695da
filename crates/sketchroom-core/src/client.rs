//! Room client: ties a [`GameSession`] to a platform WebSocket.
//!
//! Hosts call [`RoomClient::tick`] once per frame (or per loop iteration).
//! Each tick drains transport events into the session, one at a time, then
//! flushes whatever the session queued for the server.

use crate::config::{ClientConfig, ConfigError};
use crate::protocol::{ClientMessage, encode_client_message};
use crate::session::GameSession;
use crate::sync::{ConnectionState, PlatformWebSocket, SyncError, SyncEvent};

/// Errors from starting a connection.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sync(#[from] SyncError),
}

pub struct RoomClient {
    config: ClientConfig,
    session: GameSession,
    ws: PlatformWebSocket,
    /// Last connection error message, for display.
    last_error: Option<String>,
}

impl RoomClient {
    pub fn new(config: ClientConfig) -> Self {
        let session = GameSession::new(&config);
        Self {
            config,
            session,
            ws: PlatformWebSocket::new(),
            last_error: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.ws.state()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Open the room connection at `<server>/ws/<room>/<name>`.
    pub fn connect(&mut self) -> Result<(), ClientError> {
        let url = self.config.websocket_url()?;
        log::info!("Joining room {:?} as {:?}", self.config.room, self.config.name);
        self.ws.connect(&url)?;
        self.last_error = None;
        self.session.note_connection(ConnectionState::Connecting);
        Ok(())
    }

    /// Drop the current connection, if any, and open a new one.
    ///
    /// The server answers a fresh join with `game_state` and `redraw`, which
    /// resynchronize the session.
    pub fn reconnect(&mut self) -> Result<(), ClientError> {
        self.disconnect();
        self.connect()
    }

    pub fn disconnect(&mut self) {
        if self.ws.state() != ConnectionState::Disconnected {
            self.ws.disconnect();
            self.session.note_connection(ConnectionState::Disconnected);
        }
    }

    /// Process pending transport events and flush outgoing intents.
    ///
    /// Returns the number of events handled.
    pub fn tick(&mut self) -> usize {
        let events = self.ws.poll_events();
        let handled = events.len();
        for event in events {
            self.handle_event(event);
        }
        self.flush();
        handled
    }

    fn handle_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Connected => {
                log::info!("Connected to room {:?}", self.config.room);
                self.session.note_connection(ConnectionState::Connected);
            }
            SyncEvent::Disconnected => {
                log::info!("Disconnected from room {:?}", self.config.room);
                self.session.note_connection(ConnectionState::Disconnected);
            }
            SyncEvent::Error { message } => {
                log::error!("Connection error: {}", message);
                self.last_error = Some(message);
                self.session.note_connection(ConnectionState::Error);
            }
            SyncEvent::Received(inbound) => self.session.dispatch(inbound),
        }
    }

    /// Send queued intents. Intents produced while offline are dropped.
    fn flush(&mut self) {
        if !self.session.has_outgoing() {
            return;
        }
        for msg in self.session.take_outgoing() {
            self.send(&msg);
        }
    }

    /// Fire-and-forget send; dropped with a debug log when not connected.
    fn send(&self, msg: &ClientMessage) {
        if !self.ws.is_connected() {
            log::debug!("Not connected, dropping {:?}", msg);
            return;
        }
        let text = match encode_client_message(msg) {
            Ok(text) => text,
            Err(e) => {
                log::error!("Failed to encode message: {}", e);
                return;
            }
        };
        if let Err(e) = self.ws.send(&text) {
            log::warn!("Send failed: {}", e);
        }
    }
}
