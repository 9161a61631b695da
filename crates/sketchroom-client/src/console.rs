//! Line-oriented command interface for the headless native client.

use kurbo::Point;
use sketchroom_core::{ChatAuthor, GameSession, Rgba, RoundChange, SessionChange};

/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Anything that isn't a slash command goes to chat (guesses included).
    Chat(String),
    SelectWord(String),
    Clear,
    Undo,
    Fill { x: f64, y: f64, color: Option<Rgba> },
    Color(Rgba),
    Line { from: Point, to: Point },
    Quit,
}

/// Parse one input line. Returns `Err` with a usage hint for bad commands.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Chat(line.to_string()));
    };
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match (name, args.as_slice()) {
        ("word", [word]) => Ok(Command::SelectWord(word.to_string())),
        ("clear", []) => Ok(Command::Clear),
        ("undo", []) => Ok(Command::Undo),
        ("quit" | "exit", []) => Ok(Command::Quit),
        ("color", [color]) => Ok(Command::Color(parse_color(color)?)),
        ("fill", [x, y]) => Ok(Command::Fill {
            x: parse_coord(x)?,
            y: parse_coord(y)?,
            color: None,
        }),
        ("fill", [x, y, color]) => Ok(Command::Fill {
            x: parse_coord(x)?,
            y: parse_coord(y)?,
            color: Some(parse_color(color)?),
        }),
        ("line", [x0, y0, x1, y1]) => Ok(Command::Line {
            from: Point::new(parse_coord(x0)?, parse_coord(y0)?),
            to: Point::new(parse_coord(x1)?, parse_coord(y1)?),
        }),
        ("word", _) => Err("usage: /word <word>".to_string()),
        ("fill", _) => Err("usage: /fill <x> <y> [color]".to_string()),
        ("color", _) => Err("usage: /color <color>".to_string()),
        ("line", _) => Err("usage: /line <x0> <y0> <x1> <y1>".to_string()),
        _ => Err(format!("unknown command /{}", name)),
    }
}

fn parse_coord(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid coordinate {:?}", s))
}

fn parse_color(s: &str) -> Result<Rgba, String> {
    Rgba::parse(s).map_err(|e| e.to_string())
}

/// Apply a command to the session. Returns false for [`Command::Quit`].
pub fn apply_command(session: &mut GameSession, command: Command) -> bool {
    match command {
        Command::Chat(text) => session.send_chat(&text),
        Command::SelectWord(word) => {
            if !session.select_word(&word) {
                log::warn!("{:?} is not one of the offered words", word);
            }
        }
        Command::Clear => session.clear_canvas(),
        Command::Undo => session.request_undo(),
        Command::Fill { x, y, color } => {
            if let Some(color) = color {
                session.set_color(color);
            }
            session.fill_at(Point::new(x, y));
        }
        Command::Color(color) => session.set_color(color),
        Command::Line { from, to } => session.draw_line(from, to),
        Command::Quit => return false,
    }
    true
}

/// Human-readable line for a session change, if worth printing.
pub fn describe_change(change: &SessionChange, session: &GameSession) -> Option<String> {
    let round = session.round();
    match change {
        SessionChange::Canvas => None,
        SessionChange::Chat => {
            let entry = session.chat().latest()?;
            Some(match &entry.author {
                ChatAuthor::System => format!("* {}", entry.text),
                ChatAuthor::Participant(name) => format!("<{}> {}", name, entry.text),
            })
        }
        SessionChange::Connection(state) => Some(format!("connection: {:?}", state)),
        SessionChange::Round(change) => match change {
            RoundChange::Phase(phase) => Some(format!("phase: {:?}", phase)),
            RoundChange::Role(role) => Some(format!("role: {:?}", role)),
            RoundChange::Hint(hint) if !hint.is_empty() => Some(format!("word: {}", hint)),
            RoundChange::Hint(_) => None,
            RoundChange::DrawerName(Some(name)) => Some(format!("drawer: {}", name)),
            RoundChange::DrawerName(None) => None,
            RoundChange::TimeLeft(Some(secs)) if secs % 10 == 0 || *secs <= 5 => {
                Some(format!("time left: {}s", secs))
            }
            RoundChange::TimeLeft(_) => None,
            RoundChange::Leaderboard => {
                let board: Vec<String> = round
                    .leaderboard
                    .iter()
                    .map(|p| format!("{} {}", p.name, p.score))
                    .collect();
                Some(format!("scores: {}", board.join(", ")))
            }
            RoundChange::WordOptions if !round.word_options.is_empty() => Some(format!(
                "choose a word with /word: {}",
                round.word_options.join(" | ")
            )),
            RoundChange::WordOptions => None,
        },
    }
}
