use std::path::PathBuf;

use crate::{ansi::visible_width, colors::Palette, git::GitFacts};

/// Everything the collectors need to know about the current tick.
pub struct Context {
    pub model_name: String,
    pub path: PathBuf,
    pub session_id: Option<String>,
    pub remaining_percentage: Option<f64>,
    pub claude_dir: Option<PathBuf>,
    /// `None` outside a git repository.
    pub git: Option<GitFacts>,
    /// Unix timestamp the line is rendered at.
    pub now: i64,
}

#[cfg(test)]
impl Context {
    pub fn for_test(path: impl Into<PathBuf>) -> Self {
        Context {
            model_name: "Claude".to_string(),
            path: path.into(),
            session_id: None,
            remaining_percentage: None,
            claude_dir: None,
            git: None,
            now: 0,
        }
    }
}

/// A painted piece of the status line and its on-screen width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedSegment {
    pub text: String,
    pub width: usize,
}

impl RenderedSegment {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let width = visible_width(&text);
        RenderedSegment { text, width }
    }
}

pub trait StatusSegment {
    fn render(&self, palette: &Palette) -> RenderedSegment;
}
