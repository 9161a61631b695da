//! Round lifecycle state machine.
//!
//! The client never advances the round on its own: every transition here is
//! driven by an inbound server event.
//!
//! ```text
//! Waiting --choosing--> Choosing --new_round--> Active --choosing--> Choosing ...
//!    ^                                            |
//!    +------------------ waiting -----------------+
//! ```

use serde::Serialize;

use crate::protocol::{Participant, Role};

/// Hint shown while the drawer is still picking a word.
pub const CHOOSING_PLACEHOLDER: &str = "Choosing a word...";

/// Round phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Lobby, before the first round or after a server reset.
    #[default]
    Waiting,
    /// The drawer is selecting a word.
    Choosing,
    /// Drawing and guessing in progress.
    Active,
}

/// An observable change to [`RoundState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundChange {
    Phase(Phase),
    Role(Role),
    Hint(String),
    DrawerName(Option<String>),
    TimeLeft(Option<u32>),
    Leaderboard,
    WordOptions,
}

/// Everything the client knows about the current round.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoundState {
    pub phase: Phase,
    pub role: Role,
    /// Full word for the drawer, masked hint for guessers.
    pub hint: String,
    pub drawer_name: Option<String>,
    pub time_left_secs: Option<u32>,
    pub leaderboard: Vec<Participant>,
    /// Candidate words offered to this client as the upcoming drawer.
    pub word_options: Vec<String>,
}

impl RoundState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawer(&self) -> bool {
        self.role == Role::Drawer
    }

    /// Drawing is open only to the drawer, and only once the round is active.
    pub fn can_draw(&self) -> bool {
        self.is_drawer() && self.phase == Phase::Active
    }

    /// `game_state`: resync role, hint and scores after (re)connecting. Phase is untouched.
    pub fn on_game_state(&mut self, role: Role, word: String, scores: Vec<Participant>) -> Vec<RoundChange> {
        let mut changes = Vec::new();
        self.set_role(role, &mut changes);
        self.set_hint(word, &mut changes);
        self.set_leaderboard(scores, &mut changes);
        changes
    }

    /// `choosing`: someone is picking a word.
    pub fn on_choosing(&mut self) -> Vec<RoundChange> {
        let mut changes = Vec::new();
        self.set_phase(Phase::Choosing, &mut changes);
        self.set_hint(CHOOSING_PLACEHOLDER.to_string(), &mut changes);
        changes
    }

    /// `choose_word`: this client will draw next and must pick one of `words`.
    pub fn on_choose_word(&mut self, words: Vec<String>) -> Vec<RoundChange> {
        let mut changes = Vec::new();
        self.set_role(Role::Drawer, &mut changes);
        if self.word_options != words {
            self.word_options = words;
            changes.push(RoundChange::WordOptions);
        }
        changes
    }

    /// `new_round`: drawing starts.
    pub fn on_new_round(&mut self, role: Role, word: String, drawer_name: String) -> Vec<RoundChange> {
        let mut changes = Vec::new();
        self.set_phase(Phase::Active, &mut changes);
        self.set_role(role, &mut changes);
        self.set_hint(word, &mut changes);
        self.set_drawer_name(Some(drawer_name), &mut changes);
        self.clear_word_options(&mut changes);
        changes
    }

    /// `hint_update`: more letters revealed.
    pub fn on_hint_update(&mut self, word: String) -> Vec<RoundChange> {
        let mut changes = Vec::new();
        self.set_hint(word, &mut changes);
        changes
    }

    /// `timer`: remaining seconds.
    pub fn on_timer(&mut self, time: u32) -> Vec<RoundChange> {
        let mut changes = Vec::new();
        self.set_time_left(Some(time), &mut changes);
        changes
    }

    /// `correct_guess`: the leaderboard is replaced wholesale.
    pub fn on_correct_guess(&mut self, scores: Vec<Participant>) -> Vec<RoundChange> {
        let mut changes = Vec::new();
        self.set_leaderboard(scores, &mut changes);
        changes
    }

    /// `waiting`: explicit server reset back to the lobby. Scores are kept.
    pub fn on_waiting(&mut self) -> Vec<RoundChange> {
        let mut changes = Vec::new();
        self.set_phase(Phase::Waiting, &mut changes);
        self.set_role(Role::Guesser, &mut changes);
        self.set_hint(String::new(), &mut changes);
        self.set_drawer_name(None, &mut changes);
        self.set_time_left(None, &mut changes);
        self.clear_word_options(&mut changes);
        changes
    }

    /// Consume a word selection made locally.
    ///
    /// Returns false if `word` was not offered, in which case nothing changes.
    pub fn select_word(&mut self, word: &str) -> bool {
        if !self.word_options.iter().any(|w| w == word) {
            return false;
        }
        self.word_options.clear();
        true
    }

    fn set_phase(&mut self, phase: Phase, changes: &mut Vec<RoundChange>) {
        if self.phase != phase {
            self.phase = phase;
            changes.push(RoundChange::Phase(phase));
        }
    }

    fn set_role(&mut self, role: Role, changes: &mut Vec<RoundChange>) {
        if self.role != role {
            self.role = role;
            changes.push(RoundChange::Role(role));
        }
    }

    fn set_hint(&mut self, hint: String, changes: &mut Vec<RoundChange>) {
        if self.hint != hint {
            self.hint = hint.clone();
            changes.push(RoundChange::Hint(hint));
        }
    }

    fn set_drawer_name(&mut self, name: Option<String>, changes: &mut Vec<RoundChange>) {
        if self.drawer_name != name {
            self.drawer_name = name.clone();
            changes.push(RoundChange::DrawerName(name));
        }
    }

    fn set_time_left(&mut self, time: Option<u32>, changes: &mut Vec<RoundChange>) {
        if self.time_left_secs != time {
            self.time_left_secs = time;
            changes.push(RoundChange::TimeLeft(time));
        }
    }

    fn set_leaderboard(&mut self, scores: Vec<Participant>, changes: &mut Vec<RoundChange>) {
        if self.leaderboard != scores {
            self.leaderboard = scores;
            changes.push(RoundChange::Leaderboard);
        }
    }

    fn clear_word_options(&mut self, changes: &mut Vec<RoundChange>) {
        if !self.word_options.is_empty() {
            self.word_options.clear();
            changes.push(RoundChange::WordOptions);
        }
    }
}
