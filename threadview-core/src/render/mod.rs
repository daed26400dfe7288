use chrono::{DateTime, Local, Utc};

use crate::extract::visible_text;
use crate::model::NormalizedEntry;

pub mod document;
pub mod messages;
pub mod toc;

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
const MISSING_TIMESTAMP: &str = "-";

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Formats a timestamp in the local time zone as `YYYY/MM/DD hh:mm:ss`.
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(timestamp) => timestamp
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT)
            .to_string(),
        None => MISSING_TIMESTAMP.to_string(),
    }
}

pub fn anchor_id(turn: usize) -> String {
    format!("user-msg-{turn}")
}

/// A user turn that gets a number, a TOC entry and an anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedTurn {
    pub position: usize,
    pub turn: usize,
    pub text: String,
}

/// Numbered user turns in conversation order.
///
/// Both the message list and the TOC are driven from this table so their
/// numbering and anchors cannot drift apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberedTurns {
    turns: Vec<NumberedTurn>,
}

impl NumberedTurns {
    pub fn collect(entries: &[NormalizedEntry]) -> Self {
        let turns = entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| match entry {
                NormalizedEntry::Human(record) if !record.is_session_continuation() => {
                    visible_text(&record.message.content).map(|text| (position, text))
                }
                _ => None,
            })
            .enumerate()
            .map(|(turn, (position, text))| NumberedTurn {
                position,
                turn,
                text,
            })
            .collect();

        Self { turns }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NumberedTurn> {
        self.turns.iter()
    }

    pub fn at_position(&self, position: usize) -> Option<&NumberedTurn> {
        self.turns
            .binary_search_by_key(&position, |turn| turn.position)
            .ok()
            .map(|idx| &self.turns[idx])
    }
}
