use crate::model::{Content, ContentItem, NormalizedEntry, ToolUseRecord};

/// Pairs the tool invocations of `entry` with results from `next`.
///
/// Results are only taken from the immediately following entry, and only
/// when it is a user turn with item content. Each result fills the first
/// still-unmatched invocation with the same id.
pub fn correlate_tool_uses<'a>(
    entry: &'a NormalizedEntry,
    next: Option<&'a NormalizedEntry>,
) -> Vec<ToolUseRecord<'a>> {
    let mut tool_uses = entry
        .content()
        .items()
        .iter()
        .filter_map(|item| match item {
            ContentItem::ToolUse { id, name, input } => Some(ToolUseRecord {
                id,
                name,
                input,
                result: None,
            }),
            _ => None,
        })
        .collect::<Vec<_>>();

    if tool_uses.is_empty() {
        return tool_uses;
    }

    let Some(NormalizedEntry::Human(next_record)) = next else {
        return tool_uses;
    };
    let Content::Items(next_items) = &next_record.message.content else {
        return tool_uses;
    };

    for item in next_items {
        let ContentItem::ToolResult {
            tool_use_id,
            content,
        } = item
        else {
            continue;
        };

        if let Some(tool_use) = tool_uses
            .iter_mut()
            .find(|tool_use| tool_use.result.is_none() && tool_use.id == tool_use_id.as_str())
        {
            tool_use.result = Some(content.as_str());
        }
    }

    tool_uses
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::correlate::correlate_tool_uses;
    use crate::model::{
        Content, ContentItem, Message, NormalizedEntry, RecordKind, TranscriptRecord,
    };

    fn entry(kind: RecordKind, items: Vec<ContentItem>) -> NormalizedEntry {
        let record = TranscriptRecord {
            kind,
            uuid: String::new(),
            session_id: String::new(),
            timestamp: None,
            message: Message {
                role: String::new(),
                id: String::new(),
                content: Content::Items(items),
            },
            is_visible_in_transcript_only: false,
            is_compact_summary: false,
        };
        match kind {
            RecordKind::Assistant => NormalizedEntry::Assistant(record),
            _ => NormalizedEntry::Human(record),
        }
    }

    fn tool_use(id: &str, name: &str) -> ContentItem {
        ContentItem::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input: json!({"command": "ls"}),
        }
    }

    fn tool_result(id: &str, content: &str) -> ContentItem {
        ContentItem::ToolResult {
            tool_use_id: id.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn attaches_results_from_next_user_turn() {
        let assistant = entry(
            RecordKind::Assistant,
            vec![tool_use("t1", "Bash"), tool_use("t2", "Read")],
        );
        let results = entry(
            RecordKind::User,
            vec![tool_result("t2", "file body"), tool_result("t1", "a.rs")],
        );

        let tool_uses = correlate_tool_uses(&assistant, Some(&results));
        assert_eq!(tool_uses.len(), 2);
        assert_eq!(tool_uses[0].name, "Bash");
        assert_eq!(tool_uses[0].result, Some("a.rs"));
        assert_eq!(tool_uses[1].result, Some("file body"));
    }

    #[test]
    fn duplicate_ids_pair_one_to_one() {
        let assistant = entry(
            RecordKind::Assistant,
            vec![tool_use("t1", "Bash"), tool_use("t1", "Bash")],
        );
        let results = entry(
            RecordKind::User,
            vec![tool_result("t1", "first"), tool_result("t1", "second")],
        );

        let tool_uses = correlate_tool_uses(&assistant, Some(&results));
        assert_eq!(tool_uses[0].result, Some("first"));
        assert_eq!(tool_uses[1].result, Some("second"));
    }

    #[test]
    fn ignores_results_outside_the_next_user_turn() {
        let assistant = entry(RecordKind::Assistant, vec![tool_use("t1", "Bash")]);
        let other_assistant = entry(RecordKind::Assistant, vec![tool_result("t1", "nope")]);

        assert_eq!(correlate_tool_uses(&assistant, None)[0].result, None);
        assert_eq!(
            correlate_tool_uses(&assistant, Some(&other_assistant))[0].result,
            None
        );

        let unrelated = entry(RecordKind::User, vec![tool_result("t9", "other")]);
        assert_eq!(
            correlate_tool_uses(&assistant, Some(&unrelated))[0].result,
            None
        );
    }
}
