use std::io::Read;

use serde::Deserialize;

use crate::error::{Result, StatuslineError};

/// Session state piped in on every render tick. Every field may be missing.
#[derive(Debug, Default, Deserialize)]
pub struct SessionInput {
    #[serde(default)]
    pub model: Option<ModelInfo>,
    #[serde(default)]
    pub workspace: Option<WorkspaceInfo>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub context_window: Option<ContextWindow>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkspaceInfo {
    #[serde(default)]
    pub current_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContextWindow {
    #[serde(default)]
    pub remaining_percentage: Option<f64>,
}

impl SessionInput {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(StatuslineError::InvalidInput)
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut json = String::new();
        reader
            .read_to_string(&mut json)
            .map_err(StatuslineError::Stdin)?;
        Self::parse(&json)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.model
            .as_ref()?
            .display_name
            .as_deref()
            .filter(|x| !x.is_empty())
    }

    pub fn current_dir(&self) -> Option<&str> {
        self.workspace
            .as_ref()?
            .current_dir
            .as_deref()
            .filter(|x| !x.is_empty())
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|x| !x.is_empty())
    }

    pub fn remaining_percentage(&self) -> Option<f64> {
        self.context_window.as_ref()?.remaining_percentage
    }
}
