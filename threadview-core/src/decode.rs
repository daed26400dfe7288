use std::io::BufRead;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::model::{Content, ContentItem, DecodeStats, Message, RecordKind, TranscriptRecord};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(rename = "type", default)]
    record_type: Option<String>,
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    message: Option<RawMessage>,
    #[serde(default)]
    is_visible_in_transcript_only: Option<bool>,
    #[serde(default)]
    is_compact_summary: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    content: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    Blank,
    Skipped,
    Record(TranscriptRecord),
}

/// Decodes one transcript line. Malformed lines are reported as
/// `Skipped`, never as an error.
pub fn decode_line(line: &[u8]) -> DecodeOutcome {
    let trimmed = line.trim_ascii();
    if trimmed.is_empty() {
        return DecodeOutcome::Blank;
    }

    // Records are JSON objects; serde would otherwise accept a positional
    // array for the same struct.
    if !trimmed.starts_with(b"{") {
        return DecodeOutcome::Skipped;
    }

    match serde_json::from_slice::<RawRecord>(trimmed) {
        Ok(raw) => DecodeOutcome::Record(raw.into_record()),
        Err(_) => DecodeOutcome::Skipped,
    }
}

/// Decodes every line of `reader`, passing retained records to `sink` in
/// stream order. File snapshots are counted and dropped here.
pub fn decode_reader<R, F>(reader: R, mut sink: F) -> std::io::Result<DecodeStats>
where
    R: BufRead,
    F: FnMut(TranscriptRecord),
{
    let mut stats = DecodeStats::default();

    for line in reader.split(b'\n') {
        let line = line?;
        stats.lines += 1;

        match decode_line(&line) {
            DecodeOutcome::Blank => {}
            DecodeOutcome::Skipped => stats.skipped += 1,
            DecodeOutcome::Record(record) if record.kind == RecordKind::FileSnapshot => {
                stats.snapshots += 1;
            }
            DecodeOutcome::Record(record) => {
                stats.records += 1;
                sink(record);
            }
        }
    }

    Ok(stats)
}

impl RawRecord {
    fn into_record(self) -> TranscriptRecord {
        let kind = RecordKind::from_type(self.record_type.as_deref().unwrap_or_default());
        let message = self.message.map(RawMessage::into_message).unwrap_or_default();

        TranscriptRecord {
            kind,
            uuid: self.uuid.unwrap_or_default(),
            session_id: self.session_id.unwrap_or_default(),
            timestamp: self.timestamp,
            message,
            is_visible_in_transcript_only: self.is_visible_in_transcript_only.unwrap_or(false),
            is_compact_summary: self.is_compact_summary.unwrap_or(false),
        }
    }
}

impl RawMessage {
    fn into_message(self) -> Message {
        let content = match self.content {
            Some(Value::String(text)) => Content::Text(text),
            Some(Value::Array(items)) => {
                Content::Items(items.iter().filter_map(decode_content_item).collect())
            }
            _ => Content::default(),
        };

        Message {
            role: self.role.unwrap_or_default(),
            id: self.id.unwrap_or_default(),
            content,
        }
    }
}

fn decode_content_item(value: &Value) -> Option<ContentItem> {
    let object = value.as_object()?;
    let item_type = object.get("type").and_then(Value::as_str).unwrap_or_default();
    let string_field = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let plain_content = || {
        object
            .get("content")
            .and_then(Value::as_str)
            .filter(|content| !content.is_empty())
            .map(ToString::to_string)
    };

    let item = match (item_type, object.get("text").and_then(Value::as_str)) {
        ("text", Some(text)) => ContentItem::Text {
            text: text.to_string(),
        },
        ("text", None) => ContentItem::Other {
            kind: item_type.to_string(),
            content: None,
        },
        ("thinking", _) => ContentItem::Thinking {
            thinking: string_field("thinking"),
            content: plain_content(),
        },
        ("tool_use", _) => ContentItem::ToolUse {
            id: string_field("id"),
            name: string_field("name"),
            input: object.get("input").cloned().unwrap_or(Value::Null),
        },
        ("tool_result", _) => ContentItem::ToolResult {
            tool_use_id: string_field("tool_use_id"),
            content: tool_result_text(object.get("content")),
        },
        (other, _) => ContentItem::Other {
            kind: other.to_string(),
            content: plain_content(),
        },
    };

    Some(item)
}

fn tool_result_text(content: Option<&Value>) -> String {
    match content {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(blocks)) => blocks
            .iter()
            .filter_map(|block| block.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::decode::{DecodeOutcome, decode_line, decode_reader};
    use crate::extract::display_text;
    use crate::model::{Content, ContentItem, RecordKind};

    fn decode(line: &str) -> DecodeOutcome {
        decode_line(line.as_bytes())
    }

    #[test]
    fn decodes_string_content_user_turn() {
        let DecodeOutcome::Record(record) = decode(
            r#"{"type":"user","uuid":"u1","sessionId":"s1","timestamp":"2025-10-30T06:14:49.000Z","message":{"role":"user","content":"Hi"}}"#,
        ) else {
            panic!("expected record");
        };

        assert_eq!(record.kind, RecordKind::User);
        assert_eq!(record.uuid, "u1");
        assert_eq!(record.session_id, "s1");
        assert!(record.timestamp.is_some());
        assert_eq!(record.message.content, Content::Text("Hi".to_string()));
        assert!(record.message.id.is_empty());
    }

    #[test]
    fn decodes_typed_items_in_order() {
        let DecodeOutcome::Record(record) = decode(
            r#"{"type":"assistant","message":{"id":"m1","role":"assistant","content":[{"type":"thinking","thinking":"hmm"},{"type":"text","text":"Hello"},{"type":"tool_use","id":"t1","name":"Read","input":{"path":"a.rs"}},{"type":"image","source":{}}]}}"#,
        ) else {
            panic!("expected record");
        };

        assert_eq!(record.message.id, "m1");
        assert_eq!(
            record.message.content.items(),
            &[
                ContentItem::Thinking {
                    thinking: "hmm".to_string(),
                    content: None,
                },
                ContentItem::Text {
                    text: "Hello".to_string()
                },
                ContentItem::ToolUse {
                    id: "t1".to_string(),
                    name: "Read".to_string(),
                    input: json!({"path": "a.rs"}),
                },
                ContentItem::Other {
                    kind: "image".to_string(),
                    content: None,
                },
            ]
        );
    }

    #[test]
    fn flattens_tool_result_blocks() {
        let DecodeOutcome::Record(record) = decode(
            r#"{"type":"user","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"t1","content":[{"type":"text","text":"line 1"},{"type":"text","text":"line 2"}]}]}}"#,
        ) else {
            panic!("expected record");
        };

        assert_eq!(
            record.message.content.items(),
            &[ContentItem::ToolResult {
                tool_use_id: "t1".to_string(),
                content: "line 1\nline 2".to_string(),
            }]
        );
    }

    #[test]
    fn tolerates_missing_and_null_fields() {
        let DecodeOutcome::Record(record) =
            decode(r#"{"type":"user","timestamp":null,"sessionId":null,"message":null}"#)
        else {
            panic!("expected record");
        };

        assert_eq!(record.timestamp, None);
        assert!(record.session_id.is_empty());
        assert_eq!(record.message.content, Content::Text(String::new()));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        assert_eq!(decode("   "), DecodeOutcome::Blank);
        assert_eq!(decode("{not json"), DecodeOutcome::Skipped);
        assert_eq!(decode(r#"{"type":5}"#), DecodeOutcome::Skipped);
        assert_eq!(
            decode(r#"{"type":"user","timestamp":"yesterday"}"#),
            DecodeOutcome::Skipped
        );
        assert_eq!(
            decode_line(b"{\"type\":\"user\",\"uuid\":\"\xff\"}"),
            DecodeOutcome::Skipped
        );
    }

    #[test]
    fn positional_arrays_are_not_records() {
        assert_eq!(
            decode(r#"["user","u1","s1",null,{"role":"user","content":"hi"}]"#),
            DecodeOutcome::Skipped
        );
    }

    #[test]
    fn text_items_without_text_contribute_nothing() {
        let DecodeOutcome::Record(record) = decode(
            r#"{"type":"user","message":{"role":"user","content":[{"type":"text"},{"type":"text","text":"a"},{"type":"text","text":7,"content":"no"}]}}"#,
        ) else {
            panic!("expected record");
        };

        assert_eq!(display_text(&record.message.content), "a");
        assert_eq!(
            record.message.content.items()[0],
            ContentItem::Other {
                kind: "text".to_string(),
                content: None,
            }
        );
    }

    #[test]
    fn thinking_items_keep_plain_content() {
        let DecodeOutcome::Record(record) = decode(
            r#"{"type":"assistant","message":{"id":"m1","role":"assistant","content":[{"type":"thinking","thinking":"x","content":"visible"}]}}"#,
        ) else {
            panic!("expected record");
        };

        assert_eq!(
            record.message.content.items(),
            &[ContentItem::Thinking {
                thinking: "x".to_string(),
                content: Some("visible".to_string()),
            }]
        );
        assert_eq!(display_text(&record.message.content), "visible");
    }

    #[test]
    fn reader_counts_outcomes_and_drops_snapshots() {
        let raw = concat!(
            "{\"type\":\"file-history-snapshot\",\"messageId\":\"x\"}\n",
            "\n",
            "garbage\n",
            "{\"type\":\"user\",\"message\":{\"role\":\"user\",\"content\":\"Hi\"}}\n",
            "{\"type\":\"system\",\"subtype\":\"info\"}\n",
        );

        let mut kinds = Vec::new();
        let stats =
            decode_reader(raw.as_bytes(), |record| kinds.push(record.kind)).expect("decode");

        assert_eq!(kinds, vec![RecordKind::User, RecordKind::Other]);
        assert_eq!(stats.lines, 5);
        assert_eq!(stats.records, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.snapshots, 1);
    }
}
