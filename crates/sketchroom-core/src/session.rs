//! Game session: the single dispatch point for inbound protocol events and
//! local drawer input.
//!
//! All canvas, history, round and chat mutation goes through here, one event
//! at a time. Outgoing intents and change notifications are queued and drained
//! by the host (see [`crate::client::RoomClient`]), the same way the shell
//! drains them after every frame.

use std::collections::VecDeque;

use kurbo::{Affine, Point};

use crate::canvas::Canvas;
use crate::chat::{ChatEntry, ChatLog};
use crate::color::Rgba;
use crate::config::{CanvasConfig, ClientConfig};
use crate::history::HistoryLog;
use crate::input::{InputState, PointerEvent, Tool, Viewport, new_stroke_id};
use crate::protocol::{
    ClientMessage, Fill, Inbound, Role, Segment, ServerMessage, StrokeOp, decode_server_message,
};
use crate::round::{RoundChange, RoundState};
use crate::sync::ConnectionState;

/// Upper bound on local operations awaiting their server echo.
const MAX_PENDING_ECHO: usize = 4096;

/// Something observable changed in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    /// Canvas pixels changed.
    Canvas,
    Round(RoundChange),
    /// A chat entry was appended.
    Chat,
    Connection(ConnectionState),
}

/// Client-side state for one participant in one room.
pub struct GameSession {
    name: String,
    canvas: Canvas,
    history: HistoryLog,
    round: RoundState,
    chat: ChatLog,
    input: InputState,
    viewport: Option<Viewport>,
    /// Local operations already applied and recorded whose echo hasn't arrived yet.
    pending_echo: VecDeque<StrokeOp>,
    outgoing: Vec<ClientMessage>,
    changes: Vec<SessionChange>,
}

impl GameSession {
    /// Create a session for `config.name` with a canvas at the logical size.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_canvas(config.name.clone(), &config.canvas)
    }

    pub fn with_canvas(name: impl Into<String>, canvas: &CanvasConfig) -> Self {
        Self {
            name: name.into(),
            canvas: Canvas::new(canvas),
            history: HistoryLog::new(),
            round: RoundState::new(),
            chat: ChatLog::new(),
            input: InputState::new(),
            viewport: None,
            pending_echo: VecDeque::new(),
            outgoing: Vec::new(),
            changes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    // --- Inbound ---

    /// Decode and dispatch one raw text frame. Malformed frames are dropped.
    pub fn handle_text(&mut self, text: &str) {
        match decode_server_message(text) {
            Ok(inbound) => self.dispatch(inbound),
            Err(e) => log::warn!("Dropping malformed message: {}", e),
        }
    }

    /// Apply one decoded inbound event.
    pub fn dispatch(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Message(msg) => self.apply_server_message(msg),
            Inbound::Unrecognized(kind) => {
                log::debug!("Ignoring unrecognized message type {:?}", kind);
            }
        }
    }

    fn apply_server_message(&mut self, msg: ServerMessage) {
        match msg {
            ServerMessage::Draw(segment) => self.apply_remote(StrokeOp::Segment(segment)),
            ServerMessage::Fill(fill) => self.apply_remote(StrokeOp::Fill(fill)),
            ServerMessage::Clear => self.clear_board(),
            ServerMessage::Redraw { history } => {
                log::debug!("Redraw with {} operations", history.len());
                self.pending_echo.clear();
                self.history.replace(history);
                self.canvas.replay(&self.history);
                self.changes.push(SessionChange::Canvas);
            }
            ServerMessage::NewRound {
                role,
                word,
                drawer_name,
            } => {
                self.input.end_stroke();
                self.clear_board();
                let changes = self.round.on_new_round(role, word, drawer_name.clone());
                self.push_round_changes(changes);
                self.push_chat(ChatEntry::system(format!("{} is drawing now!", drawer_name)));
            }
            ServerMessage::Choosing { message } => {
                self.input.end_stroke();
                let changes = self.round.on_choosing();
                self.push_round_changes(changes);
                if !message.is_empty() {
                    self.push_chat(ChatEntry::system(message));
                }
            }
            ServerMessage::ChooseWord { words } => {
                let changes = self.round.on_choose_word(words);
                self.push_round_changes(changes);
            }
            ServerMessage::Timer { time } => {
                let changes = self.round.on_timer(time);
                self.push_round_changes(changes);
            }
            ServerMessage::HintUpdate { word } => {
                let changes = self.round.on_hint_update(word);
                self.push_round_changes(changes);
            }
            ServerMessage::Chat { message } => self.push_chat(ChatEntry::from_wire(&message)),
            ServerMessage::CorrectGuess { message, scores } => {
                self.push_chat(ChatEntry::system(message));
                let changes = self.round.on_correct_guess(scores);
                self.push_round_changes(changes);
            }
            ServerMessage::GameState { role, word, scores } => {
                if role != Role::Drawer {
                    self.input.end_stroke();
                }
                let changes = self.round.on_game_state(role, word, scores);
                self.push_round_changes(changes);
            }
            ServerMessage::Waiting { message } => {
                self.input.end_stroke();
                let changes = self.round.on_waiting();
                self.push_round_changes(changes);
                if !message.is_empty() {
                    self.push_chat(ChatEntry::system(message));
                }
            }
        }
    }

    /// Render and record a remotely-originated operation, unless it is the
    /// echo of one we already applied locally.
    fn apply_remote(&mut self, op: StrokeOp) {
        if op.stroke_id().is_some() {
            if let Some(pos) = self.pending_echo.iter().position(|pending| *pending == op) {
                self.pending_echo.remove(pos);
                return;
            }
        }
        self.canvas.apply(&op);
        self.history.record(op);
        self.changes.push(SessionChange::Canvas);
    }

    fn clear_board(&mut self) {
        self.pending_echo.clear();
        self.history.clear();
        self.canvas.clear();
        self.changes.push(SessionChange::Canvas);
    }

    fn push_round_changes(&mut self, changes: Vec<RoundChange>) {
        self.changes.extend(changes.into_iter().map(SessionChange::Round));
    }

    fn push_chat(&mut self, entry: ChatEntry) {
        self.chat.push(entry);
        self.changes.push(SessionChange::Chat);
    }

    // --- Viewport ---

    /// Adopt a new viewport; resizes the buffer and replays history if needed.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        let (width, height) = viewport.buffer_size();
        self.resize_buffer(width, height);
    }

    /// Resize the raster buffer directly (in device pixels).
    pub fn resize_buffer(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        let size = self.canvas.buffer_size();
        if size.width as u32 == width && size.height as u32 == height {
            return;
        }
        self.canvas.resize(width, height, &self.history);
        self.changes.push(SessionChange::Canvas);
    }

    /// Convert a viewport (CSS pixel) position to logical canvas coordinates.
    ///
    /// Without a viewport, positions are taken to be buffer pixels.
    pub fn viewport_to_logical(&self, position: Point) -> Point {
        let to_buffer = self.viewport.map_or(Affine::IDENTITY, |v| v.to_buffer());
        self.canvas.from_buffer() * to_buffer * position
    }

    // --- Local input ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.input.tool = tool;
        self.input.end_stroke();
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.input.color = color;
    }

    /// Handle a pointer/touch event on the canvas element.
    ///
    /// Only the drawer paints, and only while the round is active. Otherwise a no-op.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position } => {
                if !self.round.can_draw() {
                    return;
                }
                let point = self.viewport_to_logical(position);
                match self.input.tool {
                    Tool::Brush => {
                        self.input.begin_stroke(point);
                    }
                    Tool::Fill => self.fill_at(point),
                }
            }
            PointerEvent::Move { position } => {
                if !self.round.can_draw() {
                    return;
                }
                let point = self.viewport_to_logical(position);
                if let Some((prev, stroke_id)) = self.input.advance(point) {
                    self.commit_segment(prev, point, stroke_id);
                }
            }
            PointerEvent::Up | PointerEvent::Leave => self.input.end_stroke(),
        }
    }

    /// Draw a complete line in logical coordinates as its own stroke.
    pub fn draw_line(&mut self, from: Point, to: Point) {
        if !self.round.can_draw() {
            return;
        }
        self.commit_segment(from, to, new_stroke_id());
    }

    /// Bucket-fill at a logical position with the current color.
    pub fn fill_at(&mut self, point: Point) {
        if !self.round.can_draw() {
            return;
        }
        let fill = Fill {
            x: point.x,
            y: point.y,
            color: self.input.color,
            stroke_id: Some(new_stroke_id()),
        };
        self.commit_local(StrokeOp::Fill(fill.clone()), ClientMessage::Fill(fill));
    }

    fn commit_segment(&mut self, from: Point, to: Point, stroke_id: String) {
        let segment = Segment {
            prev_x: from.x,
            prev_y: from.y,
            curr_x: to.x,
            curr_y: to.y,
            color: self.input.color,
            stroke_id: Some(stroke_id),
        };
        self.commit_local(StrokeOp::Segment(segment.clone()), ClientMessage::Draw(segment));
    }

    /// Paint optimistically, record, remember for echo matching, and queue the intent.
    fn commit_local(&mut self, op: StrokeOp, intent: ClientMessage) {
        self.canvas.apply(&op);
        self.history.record(op.clone());
        if self.pending_echo.len() >= MAX_PENDING_ECHO {
            self.pending_echo.pop_front();
        }
        self.pending_echo.push_back(op);
        self.outgoing.push(intent);
        self.changes.push(SessionChange::Canvas);
    }

    /// Wipe the canvas for everyone (drawer only, active round).
    pub fn clear_canvas(&mut self) {
        if !self.round.can_draw() {
            return;
        }
        self.input.end_stroke();
        self.clear_board();
        self.outgoing.push(ClientMessage::Clear);
    }

    /// Ask the server to undo the last stroke (drawer only, active round).
    ///
    /// Nothing changes locally until the server answers with `redraw` or `clear`.
    pub fn request_undo(&mut self) {
        if !self.round.can_draw() {
            return;
        }
        self.outgoing.push(ClientMessage::Undo);
    }

    /// Send a chat line or guess. Blank input is ignored.
    pub fn send_chat(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.outgoing.push(ClientMessage::Chat {
            message: text.to_string(),
        });
    }

    /// Pick one of the offered words. Returns false if `word` wasn't offered.
    pub fn select_word(&mut self, word: &str) -> bool {
        if !self.round.select_word(word) {
            return false;
        }
        self.changes.push(SessionChange::Round(RoundChange::WordOptions));
        self.outgoing.push(ClientMessage::WordSelect {
            word: word.to_string(),
        });
        true
    }

    // --- Queues ---

    /// Record a transport state change for observers.
    pub fn note_connection(&mut self, state: ConnectionState) {
        self.changes.push(SessionChange::Connection(state));
    }

    /// Take pending outgoing intents (drains the queue).
    pub fn take_outgoing(&mut self) -> Vec<ClientMessage> {
        std::mem::take(&mut self.outgoing)
    }

    pub fn has_outgoing(&self) -> bool {
        !self.outgoing.is_empty()
    }

    /// Take pending change notifications (drains the queue).
    pub fn take_changes(&mut self) -> Vec<SessionChange> {
        std::mem::take(&mut self.changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::Phase;

    const RED: Rgba = Rgba::rgb(255, 0, 0);

    fn session() -> GameSession {
        GameSession::with_canvas("Me", &CanvasConfig::default())
    }

    fn drawer_session() -> GameSession {
        let mut s = session();
        s.handle_text(r#"{"type":"new_round","role":"drawer","word":"cat","drawer_name":"Me"}"#);
        s.take_changes();
        s
    }

    #[test]
    fn test_new_round_as_drawer() {
        let mut s = session();
        s.handle_text(r#"{"type":"new_round","role":"drawer","word":"cat","drawer_name":"Alice"}"#);

        assert_eq!(s.round().phase, Phase::Active);
        assert_eq!(s.round().role, Role::Drawer);
        assert_eq!(s.round().hint, "cat");
        assert_eq!(s.chat().len(), 1);
        let entry = s.chat().latest().unwrap();
        assert!(entry.is_system());
        assert!(entry.text.contains("Alice"));

        let changes = s.take_changes();
        assert!(changes.contains(&SessionChange::Round(RoundChange::Phase(Phase::Active))));
        assert!(changes.contains(&SessionChange::Chat));
    }

    #[test]
    fn test_new_round_clears_canvas_and_history() {
        let mut s = session();
        s.handle_text(r##"{"type":"fill","x":1,"y":1,"color":"#ff0000"}"##);
        assert_eq!(s.history().len(), 1);

        s.handle_text(r#"{"type":"new_round","role":"guesser","word":"_ _ _","drawer_name":"Bob"}"#);
        assert!(s.history().is_empty());
        assert_eq!(s.canvas().buffer().count(RED), 0);
    }

    #[test]
    fn test_local_fill_scenario() {
        let config = CanvasConfig {
            logical_width: 25,
            logical_height: 20,
            ..CanvasConfig::default()
        };
        let mut s = GameSession::with_canvas("Me", &config);
        s.handle_text(r#"{"type":"new_round","role":"drawer","word":"sea","drawer_name":"Me"}"#);
        s.set_tool(Tool::Fill);
        s.set_color(RED);
        let before = s.history().len();

        s.handle_pointer(PointerEvent::Down {
            position: Point::new(10.0, 10.0),
        });

        assert_eq!(s.canvas().buffer().count(RED), 500);
        assert_eq!(s.history().len(), before + 1);
        let outgoing = s.take_outgoing();
        assert_eq!(outgoing.len(), 1);
        match &outgoing[0] {
            ClientMessage::Fill(fill) => {
                assert_eq!((fill.x, fill.y), (10.0, 10.0));
                assert_eq!(fill.color, RED);
                assert!(fill.stroke_id.is_some());
            }
            other => panic!("Wrong intent: {:?}", other),
        }
    }

    #[test]
    fn test_fill_coordinates_are_dpr_aware() {
        let mut s = drawer_session();
        s.set_viewport(Viewport::new(400.0, 300.0, 2.0));
        s.set_tool(Tool::Fill);
        s.handle_pointer(PointerEvent::Down {
            position: Point::new(100.0, 50.0),
        });
        match &s.take_outgoing()[0] {
            // 400x300 CSS at 2x is an 800x600 buffer, which is the logical size
            ClientMessage::Fill(fill) => assert_eq!((fill.x, fill.y), (200.0, 100.0)),
            other => panic!("Wrong intent: {:?}", other),
        }
    }

    #[test]
    fn test_brush_drag_sends_segments() {
        let mut s = drawer_session();
        s.handle_pointer(PointerEvent::Down { position: Point::new(10.0, 10.0) });
        s.handle_pointer(PointerEvent::Move { position: Point::new(20.0, 10.0) });
        s.handle_pointer(PointerEvent::Move { position: Point::new(30.0, 15.0) });
        s.handle_pointer(PointerEvent::Up);
        s.handle_pointer(PointerEvent::Move { position: Point::new(90.0, 90.0) });

        let outgoing = s.take_outgoing();
        assert_eq!(outgoing.len(), 2);
        let ids: Vec<_> = outgoing
            .iter()
            .map(|m| match m {
                ClientMessage::Draw(seg) => seg.stroke_id.clone().unwrap(),
                other => panic!("Wrong intent: {:?}", other),
            })
            .collect();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.canvas().buffer().get(15, 10), Some(Rgba::BLACK));
    }

    #[test]
    fn test_guesser_input_is_inert() {
        let mut s = session();
        s.handle_text(r#"{"type":"new_round","role":"guesser","word":"_ _ _","drawer_name":"Bob"}"#);
        s.take_changes();

        s.handle_pointer(PointerEvent::Down { position: Point::new(10.0, 10.0) });
        s.handle_pointer(PointerEvent::Move { position: Point::new(50.0, 50.0) });
        s.fill_at(Point::new(5.0, 5.0));
        s.clear_canvas();
        s.request_undo();

        assert!(!s.has_outgoing());
        assert!(s.history().is_empty());
        assert!(s.take_changes().is_empty());
    }

    #[test]
    fn test_echo_is_not_recorded_twice() {
        let mut s = drawer_session();
        s.draw_line(Point::new(0.0, 0.0), Point::new(50.0, 50.0));
        let intent = s.take_outgoing().remove(0);
        assert_eq!(s.history().len(), 1);

        // The server rebroadcasts exactly what we sent
        let echo = serde_json::to_string(&intent).unwrap();
        s.handle_text(&echo);
        assert_eq!(s.history().len(), 1);

        // A second identical frame is a genuine remote op
        s.handle_text(&echo);
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn test_remote_draw_and_fill_recorded() {
        let mut s = session();
        s.handle_text(r##"{"type":"draw","prevX":0,"prevY":100,"currX":800,"currY":100,"color":"#000000"}"##);
        s.handle_text(r##"{"type":"fill","x":10,"y":10,"color":"#ff0000","strokeId":"z"}"##);
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.canvas().buffer().get(400, 100), Some(Rgba::BLACK));
        assert_eq!(s.canvas().buffer().get(10, 10), Some(RED));
        assert_eq!(s.canvas().buffer().get(10, 300), Some(Rgba::WHITE));
    }

    #[test]
    fn test_clear_event() {
        let mut s = session();
        s.handle_text(r##"{"type":"fill","x":10,"y":10,"color":"#ff0000"}"##);
        s.handle_text(r#"{"type":"clear"}"#);
        assert!(s.history().is_empty());
        assert_eq!(s.canvas().buffer().count(Rgba::WHITE), 800 * 600);
    }

    #[test]
    fn test_redraw_replaces_history() {
        let mut s = session();
        s.handle_text(r##"{"type":"fill","x":10,"y":10,"color":"#ff0000"}"##);
        s.handle_text(r##"{"type":"redraw","history":[
            {"type":"draw","prevX":0,"prevY":5,"currX":800,"currY":5,"color":"#0000ff"}
        ]}"##);
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.canvas().buffer().count(RED), 0);
        assert_eq!(s.canvas().buffer().get(400, 5), Some(Rgba::rgb(0, 0, 255)));
    }

    #[test]
    fn test_chat_during_choosing_keeps_phase() {
        let mut s = session();
        s.handle_text(r#"{"type":"choosing","message":"Bob is choosing a word"}"#);
        assert_eq!(s.round().phase, Phase::Choosing);
        s.take_changes();

        s.handle_text(r#"{"type":"chat","message":"Ann:hello"}"#);
        assert_eq!(s.round().phase, Phase::Choosing);
        assert_eq!(s.take_changes(), vec![SessionChange::Chat]);
        assert_eq!(s.chat().len(), 2);
    }

    #[test]
    fn test_unrecognized_and_malformed_do_nothing() {
        let mut s = session();
        s.handle_text(r##"{"type":"fill","x":10,"y":10,"color":"#ff0000"}"##);
        s.take_changes();
        let round = s.round().clone();
        let history = s.history().clone();
        let chat_len = s.chat().len();

        s.handle_text(r#"{"type":"fireworks","color":"gold"}"#);
        s.handle_text("{not json");
        s.handle_text(r#"{"type":"draw","prevX":"a"}"#);
        s.handle_text(r#"{"type":"new_round","role":"judge","word":"x","drawer_name":"y"}"#);

        assert_eq!(s.round(), &round);
        assert_eq!(s.history(), &history);
        assert_eq!(s.chat().len(), chat_len);
        assert!(s.take_changes().is_empty());
    }

    #[test]
    fn test_word_selection_flow() {
        let mut s = session();
        s.handle_text(r#"{"type":"choosing","message":"Me is choosing a word"}"#);
        s.handle_text(r#"{"type":"choose_word","words":["apple","kite","moon"]}"#);
        assert!(s.round().is_drawer());
        assert_eq!(s.round().word_options.len(), 3);

        assert!(!s.select_word("banana"));
        assert!(!s.has_outgoing());
        assert!(s.select_word("kite"));
        assert_eq!(
            s.take_outgoing(),
            vec![ClientMessage::WordSelect { word: "kite".to_string() }]
        );
        assert!(s.round().word_options.is_empty());
        assert_eq!(s.round().phase, Phase::Choosing);
    }

    #[test]
    fn test_correct_guess_and_game_state() {
        let mut s = session();
        s.handle_text(r#"{"type":"correct_guess","message":"Ann guessed it!","scores":[{"name":"Ann","score":120},{"name":"Me","score":0}]}"#);
        assert_eq!(s.round().leaderboard.len(), 2);
        assert_eq!(s.chat().latest().unwrap().text, "Ann guessed it!");

        s.handle_text(r#"{"type":"game_state","role":"drawer","word":"lamp","scores":[{"name":"Ann","score":150}]}"#);
        assert_eq!(s.round().phase, Phase::Waiting);
        assert_eq!(s.round().role, Role::Drawer);
        assert_eq!(s.round().hint, "lamp");
        assert_eq!(s.round().leaderboard[0].score, 150);
    }

    #[test]
    fn test_timer_and_hint() {
        let mut s = drawer_session();
        s.handle_text(r#"{"type":"timer","time":57}"#);
        s.handle_text(r#"{"type":"hint_update","word":"c _ t"}"#);
        assert_eq!(s.round().time_left_secs, Some(57));
        assert_eq!(s.round().hint, "c _ t");
        assert_eq!(s.round().phase, Phase::Active);
    }

    #[test]
    fn test_local_clear_and_undo() {
        let mut s = drawer_session();
        s.draw_line(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        s.request_undo();
        assert_eq!(s.history().len(), 1);

        s.clear_canvas();
        assert!(s.history().is_empty());
        assert_eq!(s.canvas().buffer().count(Rgba::WHITE), 800 * 600);
        let outgoing = s.take_outgoing();
        assert_eq!(outgoing[1], ClientMessage::Undo);
        assert_eq!(outgoing[2], ClientMessage::Clear);
    }

    #[test]
    fn test_resize_keeps_history() {
        let mut s = drawer_session();
        s.draw_line(Point::new(100.0, 100.0), Point::new(700.0, 100.0));
        s.draw_line(Point::new(100.0, 500.0), Point::new(700.0, 500.0));
        s.draw_line(Point::new(400.0, 50.0), Point::new(400.0, 550.0));

        s.resize_buffer(400, 300);
        assert_eq!(s.history().len(), 3);
        assert_eq!(s.canvas().buffer().get(200, 50), Some(Rgba::BLACK));
        assert_eq!(s.canvas().buffer().get(200, 150), Some(Rgba::BLACK));
        assert!(s.take_changes().contains(&SessionChange::Canvas));
    }

    #[test]
    fn test_waiting_resets_to_lobby() {
        let mut s = drawer_session();
        s.handle_text(r#"{"type":"waiting","message":"Not enough players"}"#);
        assert_eq!(s.round().phase, Phase::Waiting);
        assert_eq!(s.round().role, Role::Guesser);
        assert_eq!(s.chat().latest().unwrap().text, "Not enough players");
    }

    #[test]
    fn test_blank_chat_not_sent() {
        let mut s = session();
        s.send_chat("   ");
        assert!(!s.has_outgoing());
        s.send_chat(" pizza ");
        assert_eq!(
            s.take_outgoing(),
            vec![ClientMessage::Chat { message: "pizza".to_string() }]
        );
    }

    fn assert_inert(s: &mut GameSession) {
        s.draw_line(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        s.fill_at(Point::new(5.0, 5.0));
        s.clear_canvas();
        s.request_undo();
        s.handle_pointer(PointerEvent::Down { position: Point::new(10.0, 10.0) });
        s.handle_pointer(PointerEvent::Move { position: Point::new(60.0, 60.0) });
        s.handle_pointer(PointerEvent::Up);
        assert!(!s.has_outgoing());
    }

    #[test]
    fn test_previous_drawer_cannot_draw_while_next_word_is_chosen() {
        let mut s = drawer_session();
        s.draw_line(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        s.take_outgoing();

        s.handle_text(r#"{"type":"choosing","message":"Bob is choosing a word"}"#);
        assert!(s.round().is_drawer());
        assert_inert(&mut s);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_next_drawer_draws_only_after_round_starts() {
        let mut s = session();
        s.handle_text(r#"{"type":"choosing","message":"Me is choosing a word"}"#);
        s.handle_text(r#"{"type":"choose_word","words":["apple","kite"]}"#);
        assert!(s.round().is_drawer());
        assert_inert(&mut s);
        assert!(s.history().is_empty());

        assert!(s.select_word("kite"));
        assert_eq!(
            s.take_outgoing(),
            vec![ClientMessage::WordSelect { word: "kite".to_string() }]
        );

        s.handle_text(r#"{"type":"new_round","role":"drawer","word":"kite","drawer_name":"Me"}"#);
        s.handle_pointer(PointerEvent::Down { position: Point::new(10.0, 10.0) });
        s.handle_pointer(PointerEvent::Move { position: Point::new(60.0, 60.0) });
        assert!(matches!(s.take_outgoing().as_slice(), [ClientMessage::Draw(_)]));
    }

    #[test]
    fn test_pending_echo_cap_drops_oldest() {
        let mut s = drawer_session();
        for i in 0..=MAX_PENDING_ECHO {
            let y = (i % 600) as f64;
            s.draw_line(Point::new(0.0, y), Point::new(1.0, y));
        }
        let outgoing = s.take_outgoing();
        assert_eq!(outgoing.len(), MAX_PENDING_ECHO + 1);
        let recorded = s.history().len();

        // The oldest op fell out of the queue, so its echo counts as a remote op
        let first = serde_json::to_string(&outgoing[0]).unwrap();
        s.handle_text(&first);
        assert_eq!(s.history().len(), recorded + 1);

        let last = serde_json::to_string(&outgoing[MAX_PENDING_ECHO]).unwrap();
        s.handle_text(&last);
        assert_eq!(s.history().len(), recorded + 1);
    }

    #[test]
    fn test_echo_after_clear_is_recorded() {
        let mut s = drawer_session();
        s.draw_line(Point::new(0.0, 0.0), Point::new(50.0, 50.0));
        let echo = serde_json::to_string(&s.take_outgoing()[0]).unwrap();

        s.handle_text(r#"{"type":"clear"}"#);
        assert!(s.history().is_empty());
        s.handle_text(&echo);
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.canvas().buffer().get(25, 25), Some(Rgba::BLACK));
    }

    #[test]
    fn test_echo_after_redraw_is_recorded() {
        let mut s = drawer_session();
        s.draw_line(Point::new(0.0, 0.0), Point::new(50.0, 50.0));
        let echo = serde_json::to_string(&s.take_outgoing()[0]).unwrap();

        s.handle_text(r#"{"type":"redraw","history":[]}"#);
        assert!(s.history().is_empty());
        s.handle_text(&echo);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_zero_size_resize_keeps_coordinates_finite() {
        let mut s = drawer_session();
        s.resize_buffer(0, 0);
        let size = s.canvas().buffer_size();
        assert_eq!((size.width, size.height), (1.0, 1.0));

        s.handle_pointer(PointerEvent::Down { position: Point::new(0.0, 0.0) });
        s.handle_pointer(PointerEvent::Move { position: Point::new(0.5, 0.5) });
        match &s.take_outgoing()[0] {
            ClientMessage::Draw(seg) => {
                assert!([seg.prev_x, seg.prev_y, seg.curr_x, seg.curr_y].iter().all(|v| v.is_finite()));
                assert_eq!((seg.curr_x, seg.curr_y), (400.0, 300.0));
            }
            other => panic!("Wrong intent: {:?}", other),
        }
    }
}
