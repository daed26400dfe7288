use chrono::{DateTime, Utc};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    User,
    Assistant,
    FileSnapshot,
    Other,
}

impl RecordKind {
    pub fn from_type(record_type: &str) -> Self {
        match record_type {
            "user" => Self::User,
            "assistant" => Self::Assistant,
            "file-history-snapshot" => Self::FileSnapshot,
            _ => Self::Other,
        }
    }
}

/// One decoded transcript line.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptRecord {
    pub kind: RecordKind,
    pub uuid: String,
    pub session_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub message: Message,
    pub is_visible_in_transcript_only: bool,
    pub is_compact_summary: bool,
}

impl TranscriptRecord {
    /// A synthetic user turn that carries the summary of a previous,
    /// context-exhausted session.
    pub fn is_session_continuation(&self) -> bool {
        self.is_visible_in_transcript_only && self.is_compact_summary
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    pub role: String,
    /// Empty for user turns; assistant fragments sharing it are merged.
    pub id: String,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Items(Vec<ContentItem>),
}

impl Default for Content {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Content {
    pub fn items(&self) -> &[ContentItem] {
        match self {
            Self::Text(_) => &[],
            Self::Items(items) => items,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentItem {
    Text {
        text: String,
    },
    Thinking {
        thinking: String,
        content: Option<String>,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
    },
    /// Any other item type; `content` holds its plain string `content`
    /// field when one is present.
    Other {
        kind: String,
        content: Option<String>,
    },
}

/// Post-merge unit handed to the renderers.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedEntry {
    Human(TranscriptRecord),
    Assistant(TranscriptRecord),
}

impl NormalizedEntry {
    pub fn record(&self) -> &TranscriptRecord {
        match self {
            Self::Human(record) | Self::Assistant(record) => record,
        }
    }

    pub fn content(&self) -> &Content {
        &self.record().message.content
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.record().timestamp
    }

    pub fn is_session_continuation(&self) -> bool {
        matches!(self, Self::Human(record) if record.is_session_continuation())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    pub session_id: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub entries: Vec<NormalizedEntry>,
}

/// A tool invocation paired with the result text found in the following
/// user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolUseRecord<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub input: &'a Value,
    pub result: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub lines: usize,
    pub records: usize,
    pub skipped: usize,
    pub snapshots: usize,
}
