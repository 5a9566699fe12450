use std::path::Path;

use crate::{
    colors::Palette,
    segments::{Context, RenderedSegment, StatusSegment},
};

const DIRECTORY_SYMBOL: char = '⌂';
const WORKTREE_MARKER: &str = "⊕wt";

/// Last component of `cwd`, empty for the filesystem root.
fn dir_name(cwd: &Path) -> String {
    cwd.file_name()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The workspace directory's name, flagged when it is a linked worktree.
pub struct PathSegment {
    name: String,
    linked_worktree: bool,
}

impl PathSegment {
    pub fn new(context: &Context) -> Option<Self> {
        Some(PathSegment {
            name: dir_name(&context.path),
            linked_worktree: context.git.as_ref().is_some_and(|x| x.linked_worktree),
        })
    }
}

impl StatusSegment for PathSegment {
    fn render(&self, palette: &Palette) -> RenderedSegment {
        let mut text = palette.icon_label(palette.blue, DIRECTORY_SYMBOL, &self.name);
        if self.linked_worktree {
            text.push(' ');
            text.push_str(&palette.paint(palette.pink, WORKTREE_MARKER));
        }
        RenderedSegment::new(text)
    }
}
