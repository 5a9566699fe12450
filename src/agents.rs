use std::path::Path;

use serde::Deserialize;

use crate::{
    colors::Palette,
    error::{read_json, Result, StatuslineError},
    segments::{Context, RenderedSegment, StatusSegment},
};

const TASKS_DIR: &str = "tasks";
const AGENT_SYMBOL: char = '⊙';

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum TaskStatus {
    Running,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct Task {
    #[serde(default)]
    status: TaskStatus,
}

fn count_running(dir: &Path, session_id: &str) -> Result<usize> {
    let entries = std::fs::read_dir(dir).map_err(|source| StatuslineError::FileRead {
        path: dir.to_path_buf(),
        source,
    })?;
    let running = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with(session_id) && name.ends_with(".json")
        })
        .filter_map(|entry| match read_json::<Task>(&entry.path()) {
            Ok(task) => Some(task),
            Err(e) => {
                tracing::debug!(error = %e, "skipping task file");
                None
            }
        })
        .filter(|task| task.status == TaskStatus::Running)
        .count();
    Ok(running)
}

/// Number of sub-agents currently running for the session.
pub struct AgentsSegment {
    running: usize,
}

impl AgentsSegment {
    pub fn new(context: &Context) -> Option<Self> {
        let session_id = context.session_id.as_deref()?;
        let dir = context.claude_dir.as_ref()?.join(TASKS_DIR);
        if !dir.is_dir() {
            return None;
        }
        let running = count_running(&dir, session_id)
            .map_err(|e| tracing::debug!(error = %e, "ignoring tasks"))
            .ok()?;
        match running {
            0 => None,
            running => Some(AgentsSegment { running }),
        }
    }
}

impl StatusSegment for AgentsSegment {
    fn render(&self, palette: &Palette) -> RenderedSegment {
        let noun = if self.running == 1 { "agent" } else { "agents" };
        RenderedSegment::new(palette.icon_label(
            palette.orange,
            AGENT_SYMBOL,
            format!("{} {}", self.running, noun),
        ))
    }
}
