pub mod assemble;
pub mod config;
pub mod correlate;
pub mod decode;
pub mod discover;
pub mod error;
pub mod extract;
pub mod model;
pub mod render;
pub mod service;

pub use assemble::ConversationAssembler;
pub use config::{ClaudeRoot, output_dir_from_env};
pub use discover::find_latest_transcript;
pub use error::{Result, ThreadviewError};
pub use model::{
    Content, ContentItem, Conversation, DecodeStats, Message, NormalizedEntry, RecordKind,
    ToolUseRecord, TranscriptRecord,
};
pub use service::{
    RenderSummary, generate_html, parse_transcript, parse_transcript_str, render_transcript,
    write_document,
};
