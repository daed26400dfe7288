use crate::model::{Content, ContentItem};

const REASONING_SEPARATOR: &str = "\n\n---\n\n";

/// Flattens message content into display text.
///
/// Plain text is returned verbatim. For item sequences, text items and the
/// plain `content` string of any other non-result item are joined with
/// newlines; tool invocations and tool results render elsewhere.
pub fn display_text(content: &Content) -> String {
    match content {
        Content::Text(text) => text.clone(),
        Content::Items(items) => items
            .iter()
            .filter_map(|item| match item {
                ContentItem::Text { text } => Some(text.as_str()),
                ContentItem::Thinking { content, .. } | ContentItem::Other { content, .. } => {
                    content.as_deref()
                }
                ContentItem::ToolUse { .. } | ContentItem::ToolResult { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Display text, or `None` when it is empty or whitespace only.
pub fn visible_text(content: &Content) -> Option<String> {
    let text = display_text(content);
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

pub fn reasoning_text(content: &Content) -> Option<String> {
    let parts = content
        .items()
        .iter()
        .filter_map(|item| match item {
            ContentItem::Thinking { thinking, .. } if !thinking.trim().is_empty() => {
                Some(thinking.as_str())
            }
            _ => None,
        })
        .collect::<Vec<_>>();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(REASONING_SEPARATOR))
    }
}
