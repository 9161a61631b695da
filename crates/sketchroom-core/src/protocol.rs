//! Wire protocol between a room participant and the game server.
//!
//! Every frame is a JSON object tagged by its `type` field. Stroke coordinates
//! are expressed in the shared logical canvas space (see [`crate::canvas`]).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgba;

/// Protocol decoding errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("Message has no string `type` field")]
    MissingType,
    #[error("Malformed `{kind}` message: {source}")]
    Malformed {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One line segment of a freehand stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "prevX")]
    pub prev_x: f64,
    #[serde(rename = "prevY")]
    pub prev_y: f64,
    #[serde(rename = "currX")]
    pub curr_x: f64,
    #[serde(rename = "currY")]
    pub curr_y: f64,
    pub color: Rgba,
    #[serde(rename = "strokeId", default, skip_serializing_if = "Option::is_none")]
    pub stroke_id: Option<String>,
}

/// A bucket fill seeded at a single point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub x: f64,
    pub y: f64,
    pub color: Rgba,
    #[serde(rename = "strokeId", default, skip_serializing_if = "Option::is_none")]
    pub stroke_id: Option<String>,
}

/// A single recorded drawing operation. Order matters for replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StrokeOp {
    #[serde(rename = "draw")]
    Segment(Segment),
    #[serde(rename = "fill")]
    Fill(Fill),
}

impl StrokeOp {
    pub fn stroke_id(&self) -> Option<&str> {
        match self {
            StrokeOp::Segment(s) => s.stroke_id.as_deref(),
            StrokeOp::Fill(f) => f.stroke_id.as_deref(),
        }
    }
}

/// The local participant's role in the current round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Drawer,
    #[default]
    Guesser,
}

/// A leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub score: i64,
}

/// Intents sent to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Draw(Segment),
    Fill(Fill),
    Clear,
    Undo,
    Chat { message: String },
    WordSelect { word: String },
}

/// Events received from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A segment drawn by the drawer
    Draw(Segment),
    /// A bucket fill by the drawer
    Fill(Fill),
    /// Canvas wiped
    Clear,
    /// Authoritative history snapshot
    Redraw { history: Vec<StrokeOp> },
    /// A new round started
    NewRound {
        role: Role,
        /// Full word for the drawer, masked hint otherwise
        word: String,
        drawer_name: String,
    },
    /// Someone is choosing a word
    Choosing { message: String },
    /// Word candidates, sent only to the upcoming drawer
    ChooseWord { words: Vec<String> },
    /// Remaining round time
    Timer { time: u32 },
    /// More letters of the hint revealed
    HintUpdate { word: String },
    /// `"<author>:<text>"`
    Chat { message: String },
    CorrectGuess {
        message: String,
        scores: Vec<Participant>,
    },
    /// Full state sync, sent on (re)connect
    GameState {
        role: Role,
        word: String,
        scores: Vec<Participant>,
    },
    /// Server reset back to the lobby
    Waiting {
        #[serde(default)]
        message: String,
    },
}

/// Tags of every [`ServerMessage`] variant this client understands.
pub const KNOWN_SERVER_TYPES: &[&str] = &[
    "draw",
    "fill",
    "clear",
    "redraw",
    "new_round",
    "choosing",
    "choose_word",
    "timer",
    "hint_update",
    "chat",
    "correct_guess",
    "game_state",
    "waiting",
];

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Message(ServerMessage),
    /// A well-formed frame with a tag this client doesn't know about.
    Unrecognized(String),
}

/// Decode one inbound text frame.
///
/// Unknown tags decode to [`Inbound::Unrecognized`] so newer servers can add
/// messages without breaking older clients.
pub fn decode_server_message(text: &str) -> Result<Inbound, ProtocolError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(ProtocolError::InvalidJson)?;
    let kind = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or(ProtocolError::MissingType)?
        .to_string();

    if !KNOWN_SERVER_TYPES.contains(&kind.as_str()) {
        return Ok(Inbound::Unrecognized(kind));
    }

    serde_json::from_value::<ServerMessage>(value)
        .map(Inbound::Message)
        .map_err(|source| ProtocolError::Malformed { kind, source })
}

/// Encode an outbound intent.
pub fn encode_client_message(msg: &ClientMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}
