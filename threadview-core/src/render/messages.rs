use crate::correlate::correlate_tool_uses;
use crate::extract::{display_text, reasoning_text, visible_text};
use crate::model::{Conversation, NormalizedEntry, ToolUseRecord, TranscriptRecord};
use crate::render::{NumberedTurn, NumberedTurns, anchor_id, escape_html, format_timestamp};

const CONTINUATION_NOTICE: &str =
    "This session was continued from a previous conversation that ran out of context.";

/// Renders every entry of the conversation, in order, as message markup.
pub fn render_messages(conversation: &Conversation) -> String {
    let turns = NumberedTurns::collect(&conversation.entries);
    let mut output = String::new();

    for (position, entry) in conversation.entries.iter().enumerate() {
        match entry {
            NormalizedEntry::Human(record) if record.is_session_continuation() => {
                output.push_str(&render_session_continuation(record));
            }
            NormalizedEntry::Human(record) => {
                if let Some(turn) = turns.at_position(position) {
                    output.push_str(&render_user_turn(record, turn, turns.len()));
                }
            }
            NormalizedEntry::Assistant(record) => {
                let next = conversation.entries.get(position + 1);
                output.push_str(&render_assistant_turn(entry, record, next));
            }
        }
    }

    output
}

fn render_user_turn(record: &TranscriptRecord, turn: &NumberedTurn, total: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        r#"<div class="message-divider">#{}</div>"#,
        turn.turn + 1
    ));
    output.push_str(r#"<div class="message-group user">"#);
    output.push_str(&timestamp_label(record));
    output.push_str(&format!(
        r#"<div id="{}" class="message user-message">"#,
        anchor_id(turn.turn)
    ));
    output.push_str(&format!(
        r#"<div class="message-content">{}</div>"#,
        escape_html(&turn.text)
    ));

    output.push_str(r#"<div class="message-navigation">"#);
    if turn.turn > 0 {
        output.push_str(
            r#"<button class="nav-btn" onclick="jumpToMessage(this, 'prev')">⬆️</button>"#,
        );
    }
    if turn.turn + 1 < total {
        output.push_str(
            r#"<button class="nav-btn" onclick="jumpToMessage(this, 'next')">⬇️</button>"#,
        );
    }
    output.push_str("</div></div></div>");

    output
}

fn render_assistant_turn(
    entry: &NormalizedEntry,
    record: &TranscriptRecord,
    next: Option<&NormalizedEntry>,
) -> String {
    let content = &record.message.content;
    let mut output = String::new();

    if let Some(reasoning) = reasoning_text(content) {
        output.push_str(r#"<div class="message-group assistant">"#);
        output.push_str(&timestamp_label(record));
        output.push_str(r#"<div class="thinking-section">"#);
        output.push_str(
            r#"<button class="meta-btn" onclick="toggleThinking(this)">🧠 ...</button>"#,
        );
        output.push_str(r#"<div class="thinking-content" style="display: none;">"#);
        output.push_str(&format!("<pre>{}</pre>", escape_html(&reasoning)));
        output.push_str("</div></div></div>");
    }

    if let Some(text) = visible_text(content) {
        output.push_str(r#"<div class="message-group assistant">"#);
        output.push_str(&timestamp_label(record));
        output.push_str(r#"<div class="message assistant-message">"#);
        output.push_str(&format!(
            r#"<div class="message-content">{}</div>"#,
            escape_html(&text)
        ));
        output.push_str("</div></div>");
    }

    let tool_uses = correlate_tool_uses(entry, next);
    if !tool_uses.is_empty() {
        output.push_str(r#"<div class="message-group assistant">"#);
        output.push_str(&timestamp_label(record));
        output.push_str(r#"<div class="tools-section">⚒️ "#);
        output.push_str(
            &tool_uses
                .iter()
                .map(render_tool_use)
                .collect::<Vec<_>>()
                .join(", "),
        );
        output.push_str("</div></div>");
    }

    output
}

fn render_tool_use(tool_use: &ToolUseRecord<'_>) -> String {
    // Serializing an in-memory `Value` cannot fail.
    let input = serde_json::to_string_pretty(tool_use.input).unwrap_or_default();
    let mut output = String::new();

    output.push_str(r#"<span class="tool-item" onclick="toggleToolDetails(event)">"#);
    output.push_str(&escape_html(tool_use.name));
    output.push_str(r#" ▼<div class="tool-details" style="display: none;">"#);
    output.push_str(
        r#"<div class="tool-section"><div class="tool-section-title">Input Parameters:</div>"#,
    );
    output.push_str(&format!(
        r#"<pre class="tool-input">{}</pre></div>"#,
        escape_html(&input)
    ));

    if let Some(result) = tool_use.result.filter(|result| !result.is_empty()) {
        output.push_str(
            r#"<div class="tool-section"><div class="tool-section-title">Result:</div>"#,
        );
        output.push_str(&format!(
            r#"<pre class="tool-result">{}</pre></div>"#,
            escape_html(result)
        ));
    }

    output.push_str("</div></span>");
    output
}

fn render_session_continuation(record: &TranscriptRecord) -> String {
    let summary = display_text(&record.message.content);

    format!(
        r#"
<div id="session-continuation" class="message session-continuation-message">
  <div class="session-continuation-header">
    <span class="session-continuation-icon">⚠️</span>
    <span class="session-continuation-title">Session Continued</span>
    <span class="timestamp">{}</span>
  </div>
  <div class="session-continuation-notice">
    {CONTINUATION_NOTICE}
  </div>
  <div class="session-continuation-toggle">
    <button class="toggle-btn" onclick="toggleSessionSummary(this)">📋 View conversation summary</button>
  </div>
  <div class="session-continuation-content" style="display: none;">
    <pre>{}</pre>
  </div>
</div>"#,
        format_timestamp(record.timestamp),
        escape_html(&summary)
    )
}

fn timestamp_label(record: &TranscriptRecord) -> String {
    format!(
        r#"<div class="timestamp-label">{}</div>"#,
        format_timestamp(record.timestamp)
    )
}
