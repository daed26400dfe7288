use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::model::{Content, Conversation, NormalizedEntry, RecordKind, TranscriptRecord};

/// Folds decoded records into a [`Conversation`].
///
/// Assistant fragments sharing a message id are merged into the entry
/// created by the first fragment: that entry keeps its position and later
/// fragments append their items to it.
#[derive(Debug, Default)]
pub struct ConversationAssembler {
    session_id: String,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    entries: Vec<NormalizedEntry>,
    assistant_positions: HashMap<String, usize>,
}

impl ConversationAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TranscriptRecord) {
        if self.session_id.is_empty() && !record.session_id.is_empty() {
            self.session_id.clone_from(&record.session_id);
        }

        if let Some(timestamp) = record.timestamp {
            if self.start_time.is_none() {
                self.start_time = Some(timestamp);
            }
            self.end_time = Some(timestamp);
        }

        match record.kind {
            RecordKind::User => self.entries.push(NormalizedEntry::Human(record)),
            RecordKind::Assistant => self.push_assistant(record),
            RecordKind::FileSnapshot | RecordKind::Other => {}
        }
    }

    fn push_assistant(&mut self, record: TranscriptRecord) {
        // Fragments without a message id cannot be correlated; each one
        // stands alone.
        if record.message.id.is_empty() {
            self.entries.push(NormalizedEntry::Assistant(record));
            return;
        }

        if let Some(&position) = self.assistant_positions.get(&record.message.id) {
            if let Some(NormalizedEntry::Assistant(existing)) = self.entries.get_mut(position)
                && let (Content::Items(items), Content::Items(incoming)) =
                    (&mut existing.message.content, record.message.content)
            {
                items.extend(incoming);
            }
            return;
        }

        self.assistant_positions
            .insert(record.message.id.clone(), self.entries.len());
        self.entries.push(NormalizedEntry::Assistant(record));
    }

    pub fn finish(self) -> Conversation {
        tracing::debug!(
            session_id = %self.session_id,
            entries = self.entries.len(),
            merged_messages = self.assistant_positions.len(),
            "assembled conversation"
        );

        Conversation {
            session_id: self.session_id,
            start_time: self.start_time,
            end_time: self.end_time,
            entries: self.entries,
        }
    }
}

impl FromIterator<TranscriptRecord> for Conversation {
    fn from_iter<I: IntoIterator<Item = TranscriptRecord>>(records: I) -> Self {
        let mut assembler = ConversationAssembler::new();
        for record in records {
            assembler.push(record);
        }
        assembler.finish()
    }
}
