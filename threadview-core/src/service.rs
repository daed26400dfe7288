use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::assemble::ConversationAssembler;
use crate::decode::decode_reader;
use crate::error::{Result, ThreadviewError};
use crate::model::{Conversation, DecodeStats};
use crate::render::NumberedTurns;
use crate::render::document::render_document;

pub const OUTPUT_FILE_NAME: &str = "index.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub output_path: PathBuf,
    pub session_id: String,
    pub entries: usize,
    pub turns: usize,
    pub stats: DecodeStats,
}

pub fn parse_transcript(path: &Path) -> Result<(Conversation, DecodeStats)> {
    let file = fs::File::open(path).map_err(|source| ThreadviewError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut assembler = ConversationAssembler::new();
    let stats = decode_reader(BufReader::new(file), |record| assembler.push(record)).map_err(
        |source| ThreadviewError::Io {
            path: path.to_path_buf(),
            source,
        },
    )?;

    log_stats(&stats);
    Ok((assembler.finish(), stats))
}

pub fn parse_transcript_str(raw: &str) -> (Conversation, DecodeStats) {
    let mut assembler = ConversationAssembler::new();
    // Reading from an in-memory slice never fails.
    let stats = decode_reader(raw.as_bytes(), |record| assembler.push(record)).unwrap_or_default();

    log_stats(&stats);
    (assembler.finish(), stats)
}

fn log_stats(stats: &DecodeStats) {
    tracing::debug!(
        lines = stats.lines,
        records = stats.records,
        skipped = stats.skipped,
        snapshots = stats.snapshots,
        "decoded transcript"
    );
}

pub fn generate_html(conversation: &Conversation) -> String {
    render_document(conversation)
}

/// Writes `html` to `index.html` inside `output_dir`, creating the
/// directory tree first.
pub fn write_document(output_dir: &Path, html: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|source| ThreadviewError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let output_path = output_dir.join(OUTPUT_FILE_NAME);
    fs::write(&output_path, html).map_err(|source| ThreadviewError::Io {
        path: output_path.clone(),
        source,
    })?;

    Ok(output_path)
}

pub fn render_transcript(input: &Path, output_dir: &Path) -> Result<RenderSummary> {
    let (conversation, stats) = parse_transcript(input)?;
    tracing::info!(
        entries = conversation.entries.len(),
        input = %input.display(),
        "parsed transcript"
    );

    let html = generate_html(&conversation);
    let output_path = write_document(output_dir, &html)?;
    tracing::info!(output = %output_path.display(), "wrote document");

    Ok(RenderSummary {
        output_path,
        turns: NumberedTurns::collect(&conversation.entries).len(),
        entries: conversation.entries.len(),
        session_id: conversation.session_id,
        stats,
    })
}
