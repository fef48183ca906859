//! Batch issue task files.
//!
//! A task file is JSON: either an array of tasks or an object with a
//! `tasks` array. Tasks missing a title are reported and skipped.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::agent::{AgentKind, PlatformScope};
use crate::error::{CoreError, MalformedInput, Result};
use crate::templates::IssueDraft;

#[derive(Debug, Deserialize)]
struct RawTask {
    title: Option<String>,
    agent: Option<String>,
    #[serde(default)]
    body: String,
    platform: Option<String>,
    #[serde(default)]
    acceptance: Vec<String>,
    #[serde(default)]
    labels: Vec<String>,
}

/// Parsed task file: valid drafts plus the tasks that were skipped.
#[derive(Debug, Default)]
pub struct TaskBatch {
    pub drafts: Vec<IssueDraft>,
    pub skipped: Vec<CoreError>,
}

/// Parse a task file's contents.
///
/// Fails only when the document itself is unusable; individual bad tasks
/// land in [`TaskBatch::skipped`].
pub fn parse_task_file(content: &str) -> Result<TaskBatch> {
    let doc: Value = serde_json::from_str(content)?;
    let items = match doc {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("tasks") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(CoreError::InvalidTaskFile(
                    "`tasks` must be an array".to_string(),
                ))
            }
            None => Vec::new(),
        },
        _ => {
            return Err(CoreError::InvalidTaskFile(
                "expected an array or an object with `tasks`".to_string(),
            ))
        }
    };

    let mut batch = TaskBatch::default();
    for (index, item) in items.into_iter().enumerate() {
        match task_to_draft(index + 1, item) {
            Ok(draft) => batch.drafts.push(draft),
            Err(e) => {
                warn!(event = "tasks.skipped", task = index + 1, error = %e);
                batch.skipped.push(e);
            }
        }
    }
    Ok(batch)
}

fn task_to_draft(index: usize, item: Value) -> Result<IssueDraft> {
    let raw: RawTask = serde_json::from_value(item)?;

    let title = raw
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| MalformedInput::TaskField {
            index,
            field: "title".to_string(),
        })?;

    let agent = match raw.agent.as_deref() {
        Some(name) => name.parse::<AgentKind>()?,
        None => AgentKind::Copilot,
    };

    let platform = raw
        .platform
        .as_deref()
        .map(str::parse::<PlatformScope>)
        .transpose()?;

    Ok(IssueDraft::new(agent, title)
        .with_body(raw.body)
        .with_platform(platform)
        .with_acceptance(raw.acceptance)
        .with_labels(raw.labels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_form() {
        let batch = parse_task_file(
            r#"[
                {"title": "Fix ColumnSet", "agent": "claude", "platform": "ios"},
                {"title": "Add CI flags"}
            ]"#,
        )
        .unwrap();
        assert_eq!(batch.drafts.len(), 2);
        assert!(batch.skipped.is_empty());
        assert_eq!(batch.drafts[0].agent, AgentKind::Claude);
        assert_eq!(batch.drafts[0].platform, Some(PlatformScope::Ios));
        assert_eq!(batch.drafts[1].agent, AgentKind::Copilot);
    }

    #[test]
    fn test_object_form() {
        let batch =
            parse_task_file(r#"{"tasks": [{"title": "One", "labels": ["p1"]}]}"#).unwrap();
        assert_eq!(batch.drafts.len(), 1);
        assert_eq!(batch.drafts[0].extra_labels, vec!["p1"]);
    }

    #[test]
    fn test_missing_title_skipped_rest_kept() {
        let batch = parse_task_file(
            r#"[{"body": "no title"}, {"title": "ok"}, {"title": "bad", "agent": "gemini"}]"#,
        )
        .unwrap();
        assert_eq!(batch.drafts.len(), 1);
        assert_eq!(batch.skipped.len(), 2);
        assert!(batch.skipped[0].to_string().contains("task #1"));
    }

    #[test]
    fn test_scalar_document_rejected() {
        let err = parse_task_file("42").unwrap_err();
        assert!(matches!(err, CoreError::InvalidTaskFile(_)));
    }
}
