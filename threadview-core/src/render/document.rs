use crate::model::Conversation;
use crate::render::messages::render_messages;
use crate::render::toc::render_toc;
use crate::render::{escape_html, format_timestamp};

pub const STYLES: &str = include_str!("../../assets/styles.css");
pub const SCRIPT: &str = include_str!("../../assets/script.js");

const DOCUMENT_TITLE: &str = "Claude Code Conversation";

/// Builds the complete, self-contained HTML page for a conversation.
pub fn render_document(conversation: &Conversation) -> String {
    let messages = render_messages(conversation);
    let toc = render_toc(conversation);
    let session_id = escape_html(&conversation.session_id);
    let start = format_timestamp(conversation.start_time);
    let end = format_timestamp(conversation.end_time);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{DOCUMENT_TITLE}</title>
  <style>{STYLES}</style>
</head>
<body>
  {toc}
  <div class="container">
    <div class="header">
      <h1>{DOCUMENT_TITLE}</h1>
      <div class="session-info">
        <div>Session ID: {session_id}</div>
        <div>Start: {start}</div>
        <div>End: {end}</div>
      </div>
    </div>
    <div class="messages">
      {messages}
    </div>
  </div>
  <script>{SCRIPT}</script>
</body>
</html>"#
    )
}
