//! Sketchroom Core Library
//!
//! Platform-agnostic client logic for the sketchroom draw-and-guess game:
//! wire protocol, raster canvas, stroke history, round state and chat, plus
//! the WebSocket transport that feeds them.

pub mod canvas;
pub mod chat;
pub mod client;
pub mod color;
pub mod config;
pub mod export;
pub mod history;
pub mod input;
pub mod protocol;
pub mod raster;
pub mod render;
pub mod round;
pub mod session;
pub mod sync;

pub use canvas::Canvas;
pub use chat::{ChatAuthor, ChatEntry, ChatLog};
pub use client::{ClientError, RoomClient};
pub use color::{ColorError, Rgba};
pub use config::{CanvasConfig, ClientConfig, ConfigError};
pub use export::{ExportError, encode_png, png_data_url, save_png};
pub use history::HistoryLog;
pub use input::{InputState, PointerEvent, Tool, Viewport};
pub use protocol::{ClientMessage, Inbound, ProtocolError, Role, ServerMessage, StrokeOp};
pub use raster::RasterBuffer;
pub use round::{Phase, RoundChange, RoundState};
pub use session::{GameSession, SessionChange};
pub use sync::{ConnectionState, PlatformWebSocket, SyncError, SyncEvent};
