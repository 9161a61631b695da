//! Append-only chat and system event log.

use serde::Serialize;

/// Who wrote a chat entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ChatAuthor {
    /// Generated by the game (round start, correct guesses, ...).
    System,
    Participant(String),
}

/// A single chat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatEntry {
    pub author: ChatAuthor,
    pub text: String,
}

impl ChatEntry {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            author: ChatAuthor::System,
            text: text.into(),
        }
    }

    /// Parse a wire chat line of the form `"<author>:<text>"`.
    ///
    /// Lines without a colon are treated as system messages.
    pub fn from_wire(message: &str) -> Self {
        match message.split_once(':') {
            Some((author, text)) if !author.trim().is_empty() => Self {
                author: ChatAuthor::Participant(author.trim().to_string()),
                text: text.trim_start().to_string(),
            },
            _ => Self::system(message),
        }
    }

    pub fn is_system(&self) -> bool {
        self.author == ChatAuthor::System
    }
}

/// Ordered chat log. Entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    entries: Vec<ChatEntry>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ChatEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in arrival order.
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    /// Entries for display, newest first.
    pub fn recent_first(&self) -> impl Iterator<Item = &ChatEntry> {
        self.entries.iter().rev()
    }

    pub fn latest(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wire_splits_first_colon() {
        let entry = ChatEntry::from_wire("Bob: is it a clock: maybe?");
        assert_eq!(entry.author, ChatAuthor::Participant("Bob".to_string()));
        assert_eq!(entry.text, "is it a clock: maybe?");
    }

    #[test]
    fn test_from_wire_without_author() {
        assert!(ChatEntry::from_wire("Round over").is_system());
        assert!(ChatEntry::from_wire(":orphan").is_system());
    }

    #[test]
    fn test_recent_first_order() {
        let mut log = ChatLog::new();
        log.push(ChatEntry::system("one"));
        log.push(ChatEntry::system("two"));
        let texts: Vec<&str> = log.recent_first().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "one"]);
        assert_eq!(log.latest().unwrap().text, "two");
    }
}
