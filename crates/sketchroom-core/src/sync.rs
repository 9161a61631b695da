//! WebSocket transport to the game server.
//!
//! Provides a platform-agnostic client: a background thread with tungstenite on
//! native, the browser `WebSocket` on wasm. Frames are decoded on arrival and
//! queued as [`SyncEvent`]s until polled.

use serde::Serialize;
use thiserror::Error;

use crate::protocol::{Inbound, decode_server_message};

/// Transport errors.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Already connected")]
    AlreadyConnected,
    #[error("Invalid WebSocket URL: {0}")]
    InvalidUrl(String),
    #[error("Failed to open connection: {0}")]
    Connect(String),
    #[error("Not connected")]
    NotConnected,
    #[error("Send failed: {0}")]
    Send(String),
}

/// Connection state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Events from the WebSocket client
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Connected,
    Disconnected,
    /// A decoded server frame.
    Received(Inbound),
    Error { message: String },
}

/// Decode one text frame. Malformed frames are logged and dropped.
fn frame_event(text: &str) -> Option<SyncEvent> {
    match decode_server_message(text) {
        Ok(inbound) => {
            if let Inbound::Unrecognized(kind) = &inbound {
                log::debug!("Unrecognized server message type {:?}", kind);
            }
            Some(SyncEvent::Received(inbound))
        }
        Err(e) => {
            log::warn!("Dropping malformed frame ({}): {}", e, preview(text));
            None
        }
    }
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(100) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn state_after(state: ConnectionState, event: &SyncEvent) -> ConnectionState {
    match event {
        SyncEvent::Connected => ConnectionState::Connected,
        SyncEvent::Disconnected => ConnectionState::Disconnected,
        SyncEvent::Error { .. } => ConnectionState::Error,
        SyncEvent::Received(_) => state,
    }
}

// ============================================================================
// WASM WebSocket Client
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod wasm_client {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

    /// WebSocket client for WASM.
    ///
    /// Events are collected by the browser callbacks and must be polled via `poll_events()`.
    pub struct WasmWebSocket {
        ws: Option<WebSocket>,
        state: ConnectionState,
        events: Rc<RefCell<Vec<SyncEvent>>>,
        // Closures must outlive the socket's handlers
        _on_open: Option<Closure<dyn Fn()>>,
        _on_message: Option<Closure<dyn Fn(MessageEvent)>>,
        _on_close: Option<Closure<dyn Fn(CloseEvent)>>,
        _on_error: Option<Closure<dyn Fn(ErrorEvent)>>,
    }

    impl WasmWebSocket {
        pub fn new() -> Self {
            Self {
                ws: None,
                state: ConnectionState::Disconnected,
                events: Rc::new(RefCell::new(Vec::new())),
                _on_open: None,
                _on_message: None,
                _on_close: None,
                _on_error: None,
            }
        }

        pub fn connect(&mut self, url: &str) -> Result<(), SyncError> {
            if self.ws.is_some() {
                return Err(SyncError::AlreadyConnected);
            }

            let ws = WebSocket::new(url).map_err(|e| SyncError::Connect(format!("{:?}", e)))?;
            ws.set_binary_type(web_sys::BinaryType::Arraybuffer);
            self.state = ConnectionState::Connecting;
            log::info!("Connecting to {}", url);

            let events_open = self.events.clone();
            let on_open = Closure::wrap(Box::new(move || {
                events_open.borrow_mut().push(SyncEvent::Connected);
            }) as Box<dyn Fn()>);
            ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));

            let events_msg = self.events.clone();
            let on_message = Closure::wrap(Box::new(move |e: MessageEvent| {
                // Only text frames carry protocol messages
                let Ok(txt) = e.data().dyn_into::<js_sys::JsString>() else {
                    return;
                };
                let text: String = txt.into();
                if let Some(event) = frame_event(&text) {
                    events_msg.borrow_mut().push(event);
                }
            }) as Box<dyn Fn(MessageEvent)>);
            ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

            let events_close = self.events.clone();
            let on_close = Closure::wrap(Box::new(move |e: CloseEvent| {
                log::info!("WebSocket closed (code {})", e.code());
                events_close.borrow_mut().push(SyncEvent::Disconnected);
            }) as Box<dyn Fn(CloseEvent)>);
            ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

            let events_err = self.events.clone();
            let on_error = Closure::wrap(Box::new(move |_e: ErrorEvent| {
                log::error!("WebSocket error");
                events_err.borrow_mut().push(SyncEvent::Error {
                    message: "WebSocket error".to_string(),
                });
            }) as Box<dyn Fn(ErrorEvent)>);
            ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

            self.ws = Some(ws);
            self._on_open = Some(on_open);
            self._on_message = Some(on_message);
            self._on_close = Some(on_close);
            self._on_error = Some(on_error);
            Ok(())
        }

        pub fn disconnect(&mut self) {
            if let Some(ws) = self.ws.take() {
                ws.set_onopen(None);
                ws.set_onmessage(None);
                ws.set_onclose(None);
                ws.set_onerror(None);
                let _ = ws.close();
            }
            self.state = ConnectionState::Disconnected;
            self._on_open = None;
            self._on_message = None;
            self._on_close = None;
            self._on_error = None;
        }

        /// Send a text frame. Fails unless the socket is open.
        pub fn send(&self, msg: &str) -> Result<(), SyncError> {
            match &self.ws {
                Some(ws) if ws.ready_state() == WebSocket::OPEN => ws
                    .send_with_str(msg)
                    .map_err(|e| SyncError::Send(format!("{:?}", e))),
                _ => Err(SyncError::NotConnected),
            }
        }

        /// Poll for pending events (non-blocking).
        pub fn poll_events(&mut self) -> Vec<SyncEvent> {
            let events = std::mem::take(&mut *self.events.borrow_mut());
            for event in &events {
                self.state = state_after(self.state, event);
            }
            if matches!(self.state, ConnectionState::Disconnected | ConnectionState::Error) && self.ws.is_some() {
                // Socket is gone; release it so connect() can be called again
                let state = self.state;
                self.disconnect();
                self.state = state;
            }
            events
        }

        pub fn state(&self) -> ConnectionState {
            self.state
        }

        pub fn is_connected(&self) -> bool {
            self.state == ConnectionState::Connected
        }
    }

    impl Default for WasmWebSocket {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_client::WasmWebSocket;

// ============================================================================
// Native WebSocket Client
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod native_client {
    use super::*;
    use std::net::TcpStream;
    use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
    use std::thread::{self, JoinHandle};
    use std::time::Duration;
    use tungstenite::stream::MaybeTlsStream;
    use tungstenite::{Message, WebSocket, connect};
    use url::Url;

    /// Commands sent to the WebSocket thread.
    enum WsCommand {
        Send(String),
        Close,
    }

    /// WebSocket client for native platforms.
    ///
    /// Uses a background thread for non-blocking operation.
    pub struct NativeWebSocket {
        state: ConnectionState,
        cmd_tx: Option<Sender<WsCommand>>,
        event_rx: Option<Receiver<SyncEvent>>,
        _thread: Option<JoinHandle<()>>,
    }

    impl NativeWebSocket {
        pub fn new() -> Self {
            Self {
                state: ConnectionState::Disconnected,
                cmd_tx: None,
                event_rx: None,
                _thread: None,
            }
        }

        /// Connect to a WebSocket server.
        ///
        /// Returns once the background thread is started; the outcome arrives
        /// as a `Connected` or `Error` event.
        pub fn connect(&mut self, url: &str) -> Result<(), SyncError> {
            if self.cmd_tx.is_some() {
                return Err(SyncError::AlreadyConnected);
            }

            let parsed = Url::parse(url).map_err(|e| SyncError::InvalidUrl(e.to_string()))?;
            if parsed.scheme() != "ws" && parsed.scheme() != "wss" {
                return Err(SyncError::InvalidUrl(format!("unsupported scheme {}", parsed.scheme())));
            }

            self.state = ConnectionState::Connecting;
            let (cmd_tx, cmd_rx) = channel::<WsCommand>();
            let (event_tx, event_rx) = channel::<SyncEvent>();
            let url = url.to_string();

            let handle = thread::Builder::new()
                .name("sketchroom-ws".to_string())
                .spawn(move || run_socket(&url, &cmd_rx, &event_tx))
                .map_err(|e| SyncError::Connect(e.to_string()))?;

            self.cmd_tx = Some(cmd_tx);
            self.event_rx = Some(event_rx);
            self._thread = Some(handle);
            Ok(())
        }

        pub fn disconnect(&mut self) {
            if let Some(tx) = self.cmd_tx.take() {
                let _ = tx.send(WsCommand::Close);
            }
            self.event_rx = None;
            self._thread = None;
            self.state = ConnectionState::Disconnected;
        }

        /// Queue a text frame. Fails unless the connection is open.
        pub fn send(&self, msg: &str) -> Result<(), SyncError> {
            if self.state != ConnectionState::Connected {
                return Err(SyncError::NotConnected);
            }
            let tx = self.cmd_tx.as_ref().ok_or(SyncError::NotConnected)?;
            tx.send(WsCommand::Send(msg.to_string()))
                .map_err(|e| SyncError::Send(e.to_string()))
        }

        /// Poll for pending events (non-blocking).
        pub fn poll_events(&mut self) -> Vec<SyncEvent> {
            let mut events = Vec::new();
            if let Some(rx) = &self.event_rx {
                while let Ok(event) = rx.try_recv() {
                    self.state = state_after(self.state, &event);
                    events.push(event);
                }
            }
            if matches!(self.state, ConnectionState::Disconnected | ConnectionState::Error) {
                // The socket thread has exited; allow a fresh connect()
                self.cmd_tx = None;
                self.event_rx = None;
                self._thread = None;
            }
            events
        }

        pub fn state(&self) -> ConnectionState {
            self.state
        }

        pub fn is_connected(&self) -> bool {
            self.state == ConnectionState::Connected
        }
    }

    impl Default for NativeWebSocket {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Drop for NativeWebSocket {
        fn drop(&mut self) {
            self.disconnect();
        }
    }

    fn run_socket(url: &str, cmd_rx: &Receiver<WsCommand>, event_tx: &Sender<SyncEvent>) {
        log::info!("WebSocket thread: connecting to {}", url);
        let mut socket = match connect(url) {
            Ok((socket, response)) => {
                log::info!("WebSocket connected, status: {}", response.status());
                socket
            }
            Err(e) => {
                log::error!("WebSocket connection failed: {}", e);
                let _ = event_tx.send(SyncEvent::Error {
                    message: format!("Connection failed: {}", e),
                });
                return;
            }
        };
        let _ = event_tx.send(SyncEvent::Connected);
        set_timeouts(&mut socket);

        'run: loop {
            // Drain every queued command before blocking on the next read
            loop {
                match cmd_rx.try_recv() {
                    Ok(WsCommand::Send(msg)) => {
                        log::debug!("WebSocket sending: {}", preview(&msg));
                        if let Err(e) = socket.send(Message::Text(msg)) {
                            log::error!("WebSocket send error: {}", e);
                            break 'run;
                        }
                    }
                    Ok(WsCommand::Close) => {
                        log::info!("WebSocket close requested");
                        let _ = socket.close(None);
                        break 'run;
                    }
                    Err(TryRecvError::Disconnected) => {
                        log::info!("WebSocket command channel disconnected");
                        break 'run;
                    }
                    Err(TryRecvError::Empty) => break,
                }
            }

            match socket.read() {
                Ok(Message::Text(txt)) => {
                    if let Some(event) = frame_event(&txt) {
                        if event_tx.send(event).is_err() {
                            break;
                        }
                    }
                }
                Ok(Message::Ping(data)) => {
                    let _ = socket.send(Message::Pong(data));
                }
                Ok(Message::Close(_)) => {
                    log::info!("WebSocket received close frame");
                    break;
                }
                Ok(_) => {}
                Err(tungstenite::Error::Io(ref e))
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    continue;
                }
                Err(e) => {
                    log::error!("WebSocket read error: {}", e);
                    break;
                }
            }
        }

        log::info!("WebSocket thread exiting");
        let _ = event_tx.send(SyncEvent::Disconnected);
    }

    /// Short read timeout so the loop can interleave outgoing commands.
    fn set_timeouts(socket: &mut WebSocket<MaybeTlsStream<TcpStream>>) {
        match socket.get_mut() {
            MaybeTlsStream::Plain(tcp) => {
                let _ = tcp.set_read_timeout(Some(Duration::from_millis(50)));
                let _ = tcp.set_write_timeout(Some(Duration::from_secs(5)));
            }
            #[allow(unreachable_patterns)]
            _ => log::debug!("Non-plain stream, relying on default timeout handling"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native_client::NativeWebSocket;

// ============================================================================
// Platform type alias
// ============================================================================

/// Platform-specific WebSocket client type.
#[cfg(target_arch = "wasm32")]
pub type PlatformWebSocket = WasmWebSocket;

#[cfg(not(target_arch = "wasm32"))]
pub type PlatformWebSocket = NativeWebSocket;
