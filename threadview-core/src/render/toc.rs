use crate::model::Conversation;
use crate::render::{NumberedTurns, anchor_id, escape_html, format_timestamp};

const PREVIEW_CHAR_LIMIT: usize = 60;
const PREVIEW_ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub anchor: String,
    pub number: usize,
    pub preview: String,
    pub timestamp: String,
}

pub fn toc_entries(conversation: &Conversation) -> Vec<TocEntry> {
    NumberedTurns::collect(&conversation.entries)
        .iter()
        .map(|turn| TocEntry {
            anchor: anchor_id(turn.turn),
            number: turn.turn + 1,
            preview: preview(&turn.text),
            timestamp: format_timestamp(conversation.entries[turn.position].timestamp()),
        })
        .collect()
}

/// First line of `text`, cut to 60 characters with a trailing ellipsis.
pub fn preview(text: &str) -> String {
    let first_line = text.split('\n').next().unwrap_or_default();
    match first_line.char_indices().nth(PREVIEW_CHAR_LIMIT) {
        Some((cut, _)) => format!("{}{PREVIEW_ELLIPSIS}", &first_line[..cut]),
        None => first_line.to_string(),
    }
}

pub fn render_toc(conversation: &Conversation) -> String {
    let items = toc_entries(conversation)
        .iter()
        .map(|entry| {
            format!(
                r#"
<div class="toc-item" onclick="scrollToMessage('{}')">
  <div class="toc-number">#{}</div>
  <div class="toc-content">
    <div class="toc-preview">{}</div>
    <div class="toc-timestamp">{}</div>
  </div>
</div>"#,
                entry.anchor,
                entry.number,
                escape_html(&entry.preview),
                entry.timestamp
            )
        })
        .collect::<String>();

    format!(
        r#"
<div class="sidebar" id="sidebar">
  <div class="toc">
    {items}
  </div>
</div>
<button class="scroll-top-btn" id="scrollTopBtn" onclick="scrollToTop()">↑ Top</button>
"#
    )
}
