use std::path::Path;

use crate::{
    colors::Palette,
    error::Result,
    segments::{Context, RenderedSegment, StatusSegment},
};
use git2::{BranchType, Repository, RepositoryOpenFlags, StatusOptions};

const BRANCH_SYMBOL: char = '⌥';
const DIRTY_SYMBOL: char = '*';
const AHEAD_SYMBOL: char = '↑';
const BEHIND_SYMBOL: char = '↓';
const STASH_SYMBOL: char = '⚑';
const COMMIT_AGE_SYMBOL: char = '⏱';
const DETACHED_HEAD: &str = "HEAD";

/// What the status line shows about the repository containing the workspace.
/// Each fact is gathered independently; one failing leaves the others intact.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GitFacts {
    pub branch: Option<String>,
    pub dirty: bool,
    /// Commits ahead of and behind the upstream, when the branch tracks one.
    pub ahead_behind: Option<(usize, usize)>,
    pub stash_count: usize,
    /// The workspace is a linked worktree rather than the main checkout.
    pub linked_worktree: bool,
    /// Unix timestamp of the HEAD commit.
    pub last_commit: Option<i64>,
}

fn get_branch_name(repo: &Repository) -> Option<String> {
    if repo.head_detached().unwrap_or(false) {
        return Some(DETACHED_HEAD.to_string());
    }

    let head = repo.head().ok()?;
    head.shorthand().map(|x| x.to_string())
}

fn is_dirty(repo: &Repository) -> Result<bool> {
    let mut options = StatusOptions::new();
    options
        .include_untracked(true)
        .include_ignored(false);
    let statuses = repo.statuses(Some(&mut options))?;
    Ok(statuses.iter().any(|e| {
        let status = e.status();
        !status.is_empty() && !status.is_ignored()
    }))
}

fn get_ahead_behind(repo: &Repository, branch: &str) -> Result<Option<(usize, usize)>> {
    let local = repo.find_branch(branch, BranchType::Local)?;
    let upstream = match local.upstream() {
        Ok(upstream) => upstream,
        Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let (Some(local_oid), Some(upstream_oid)) = (local.get().target(), upstream.get().target())
    else {
        return Ok(None);
    };
    Ok(Some(repo.graph_ahead_behind(local_oid, upstream_oid)?))
}

fn count_stashes(repo: &mut Repository) -> Result<usize> {
    let mut count = 0;
    repo.stash_foreach(|_, _, _| {
        count += 1;
        true
    })?;
    Ok(count)
}

fn get_last_commit_time(repo: &Repository) -> Result<i64> {
    let commit = repo.head()?.peel_to_commit()?;
    Ok(commit.time().seconds())
}

impl GitFacts {
    /// Looks for a repository at or above `path`. `None` when there is none.
    pub fn collect(path: &Path) -> Option<Self> {
        let mut repo = Repository::open_ext(
            path,
            RepositoryOpenFlags::empty(),
            &[] as &[&std::ffi::OsStr],
        )
        .map_err(|e| tracing::debug!(path = %path.display(), error = %e, "no git repository"))
        .ok()?;

        let branch = get_branch_name(&repo);
        let dirty = is_dirty(&repo)
            .map_err(|e| tracing::debug!(error = %e, "git status unavailable"))
            .unwrap_or(false);
        let ahead_behind = match (&branch, repo.head_detached().unwrap_or(false)) {
            (Some(branch), false) => get_ahead_behind(&repo, branch)
                .map_err(|e| tracing::debug!(error = %e, "upstream unavailable"))
                .ok()
                .flatten(),
            _ => None,
        };
        let linked_worktree = repo.is_worktree();
        let last_commit = get_last_commit_time(&repo)
            .map_err(|e| tracing::debug!(error = %e, "no HEAD commit"))
            .ok();
        let stash_count = count_stashes(&mut repo)
            .map_err(|e| tracing::debug!(error = %e, "stash list unavailable"))
            .unwrap_or(0);

        Some(GitFacts {
            branch,
            dirty,
            ahead_behind,
            stash_count,
            linked_worktree,
            last_commit,
        })
    }
}

/// Branch name with dirty and ahead/behind markers.
pub struct GitSegment {
    branch_name: String,
    dirty: bool,
    ahead: usize,
    behind: usize,
}

impl GitSegment {
    pub fn new(context: &Context) -> Option<Self> {
        let facts = context.git.as_ref()?;
        let (ahead, behind) = facts.ahead_behind.unwrap_or((0, 0));
        Some(GitSegment {
            branch_name: facts.branch.clone()?,
            dirty: facts.dirty,
            ahead,
            behind,
        })
    }
}

impl StatusSegment for GitSegment {
    fn render(&self, palette: &Palette) -> RenderedSegment {
        let mut text = palette.icon_label(palette.cyan, BRANCH_SYMBOL, &self.branch_name);
        if self.dirty {
            text.push_str(&palette.paint(palette.yellow, DIRTY_SYMBOL));
        }
        if self.ahead > 0 {
            text.push_str(&palette.paint(palette.green, format!("{}{}", AHEAD_SYMBOL, self.ahead)));
        }
        if self.behind > 0 {
            text.push_str(&palette.paint(palette.red, format!("{}{}", BEHIND_SYMBOL, self.behind)));
        }
        RenderedSegment::new(text)
    }
}

pub struct StashSegment {
    count: usize,
}

impl StashSegment {
    pub fn new(context: &Context) -> Option<Self> {
        match context.git.as_ref()?.stash_count {
            0 => None,
            count => Some(StashSegment { count }),
        }
    }
}

impl StatusSegment for StashSegment {
    fn render(&self, palette: &Palette) -> RenderedSegment {
        RenderedSegment::new(palette.icon_label(palette.yellow, STASH_SYMBOL, self.count))
    }
}

/// Coarse "how long ago" for a number of elapsed seconds.
fn format_age(seconds: i64) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const WEEK: i64 = 7 * DAY;

    if seconds < MINUTE {
        String::from("just now")
    } else if seconds < HOUR {
        format!("{}m ago", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{}h ago", seconds / HOUR)
    } else if seconds < WEEK {
        format!("{}d ago", seconds / DAY)
    } else {
        format!("{}w ago", seconds / WEEK)
    }
}

/// Age of the HEAD commit.
pub struct CommitAgeSegment {
    age: String,
}

impl CommitAgeSegment {
    pub fn new(context: &Context) -> Option<Self> {
        let timestamp = context.git.as_ref()?.last_commit?;
        Some(CommitAgeSegment {
            age: format_age(context.now - timestamp),
        })
    }
}

impl StatusSegment for CommitAgeSegment {
    fn render(&self, palette: &Palette) -> RenderedSegment {
        RenderedSegment::new(palette.paint(
            palette.grey,
            format!("{} {}", COMMIT_AGE_SYMBOL, self.age),
        ))
    }
}
