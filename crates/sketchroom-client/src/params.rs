//! Page URL parameters for auto-joining a room.

/// Values read from `?room=...&name=...&server=...` or the hash fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    pub room: Option<String>,
    pub name: Option<String>,
    /// Server base, e.g. `localhost:8000` or `wss://draw.example.com`.
    pub server: Option<String>,
}

impl UrlParams {
    /// Parse a query string or hash fragment. Empty values are ignored.
    pub fn parse(s: &str) -> Self {
        let mut params = Self::default();
        params.merge(s);
        params
    }

    /// Fill in fields still missing from another source (query first, then hash).
    pub fn merge(&mut self, s: &str) {
        let s = s.trim_start_matches(['?', '#']);
        for (key, value) in url::form_urlencoded::parse(s.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "room" => &mut self.room,
                "name" => &mut self.name,
                "server" => &mut self.server,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
    }
}
