use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};

use serde_json::Value;

use crate::{
    colors::Palette,
    error::{read_json, Result, StatuslineError},
    segments::{Context, RenderedSegment, StatusSegment},
};

const TODOS_DIR: &str = "todos";
const AGENT_MARKER: &str = "-agent-";
const IN_PROGRESS_SYMBOL: char = '▸';
const DONE_SYMBOL: char = '✓';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TodoStatus {
    InProgress,
    Completed,
    Other,
}

/// One entry of a todo list. Entries are read field by field so a malformed
/// one still counts towards the total.
#[derive(Debug)]
struct TodoItem {
    status: TodoStatus,
    active_form: Option<String>,
    subject: Option<String>,
}

impl From<&Value> for TodoItem {
    fn from(value: &Value) -> Self {
        let text = |field: &str| value.get(field).and_then(Value::as_str).map(String::from);
        let status = match value.get("status").and_then(Value::as_str) {
            Some("in_progress") => TodoStatus::InProgress,
            Some("completed") => TodoStatus::Completed,
            _ => TodoStatus::Other,
        };
        TodoItem {
            status,
            active_form: text("activeForm"),
            subject: text("subject"),
        }
    }
}

impl TodoItem {
    fn label(&self) -> &str {
        [&self.active_form, &self.subject]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|x| !x.is_empty())
            .unwrap_or("")
    }
}

/// The session's most recently written todo file.
fn latest_todo_file(dir: &Path, session_id: &str) -> Result<Option<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| StatuslineError::FileRead {
        path: dir.to_path_buf(),
        source,
    })?;
    let latest = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with(session_id) && name.contains(AGENT_MARKER) && name.ends_with(".json")
        })
        .filter_map(|entry| {
            let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
            Some((modified, entry.path()))
        })
        .max_by_key(|(modified, _): &(SystemTime, PathBuf)| *modified)
        .map(|(_, path)| path);
    Ok(latest)
}

#[derive(Debug, PartialEq)]
enum Progress {
    Working { label: String, done: usize, total: usize },
    Idle { done: usize, total: usize },
}

/// Progress through the session's todo list.
pub struct TodoSegment {
    progress: Progress,
}

impl TodoSegment {
    pub fn new(context: &Context) -> Option<Self> {
        let session_id = context.session_id.as_deref()?;
        let dir = context.claude_dir.as_ref()?.join(TODOS_DIR);
        if !dir.is_dir() {
            return None;
        }

        let entries: Vec<Value> = latest_todo_file(&dir, session_id)
            .and_then(|path| path.map(|path| read_json(&path)).transpose())
            .map_err(|e| tracing::debug!(error = %e, "ignoring todo list"))
            .ok()??;
        let todos: Vec<TodoItem> = entries.iter().map(TodoItem::from).collect();

        let done = todos
            .iter()
            .filter(|x| x.status == TodoStatus::Completed)
            .count();
        let total = todos.len();
        let progress = match todos.iter().find(|x| x.status == TodoStatus::InProgress) {
            Some(current) => Progress::Working {
                label: current.label().to_string(),
                done,
                total,
            },
            None if total > 0 => Progress::Idle { done, total },
            None => return None,
        };
        Some(TodoSegment { progress })
    }
}

impl StatusSegment for TodoSegment {
    fn render(&self, palette: &Palette) -> RenderedSegment {
        let text = match &self.progress {
            Progress::Working { label, done, total } => format!(
                "{} {} {}",
                palette.paint(palette.magenta, IN_PROGRESS_SYMBOL),
                palette.paint(palette.bold, label),
                palette.paint(palette.grey, format!("[{}/{}]", done, total)),
            ),
            Progress::Idle { done, total } => palette.icon_label(
                palette.green,
                DONE_SYMBOL,
                format!("{}/{} tasks", done, total),
            ),
        };
        RenderedSegment::new(text)
    }
}
