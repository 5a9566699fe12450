mod agents;
mod ansi;
mod colors;
mod context_bar;
mod error;
mod git;
mod input;
mod model;
mod path;
mod segments;
mod todos;
mod version;

use std::{
    io::{self, Read, Write},
    panic::{self, AssertUnwindSafe},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::Parser;
use colors::Palette;
use context_bar::{render_context_bar, DEFAULT_BAR_SEGMENTS};
use git::{CommitAgeSegment, GitFacts, GitSegment, StashSegment};
use input::SessionInput;
use segments::*;
use terminal_size::{self, Width};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_COLUMNS: usize = 120;
const CLAUDE_DIR: &str = ".claude";

/// Renders a one-line status summary for a coding-assistant session from the
/// session JSON on stdin.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Width of the line in columns [default: terminal width, else 120]
    #[arg(long, env = "CLAUDELINE_COLUMNS")]
    columns: Option<usize>,

    /// Directory holding the `todos/` and `tasks/` session files [default: ~/.claude]
    #[arg(long, env = "CLAUDE_CONFIG_DIR")]
    claude_dir: Option<PathBuf>,

    /// Number of cells in the context usage bar
    #[arg(long, env = "CLAUDELINE_BAR_SEGMENTS", default_value_t = DEFAULT_BAR_SEGMENTS)]
    bar_segments: usize,

    /// Log filter for diagnostics on stderr, e.g. `debug`
    #[arg(long, env = "CLAUDELINE_LOG", default_value = "off")]
    log_level: String,
}

/// The fitted status line and how many of the left-hand segments it kept.
#[derive(PartialEq, Eq, Debug)]
struct Layout {
    text: String,
    kept: usize,
}

/// Packs `segments` left to right into `term_width` columns, highest priority
/// first, with `reserved` pinned to the right edge.
///
/// Segments are only ever kept whole and as a prefix: the first one that does
/// not fit ends the line. If not even the first segment fits it is kept
/// anyway, so the line can overflow `term_width` in that one case.
fn layout_segments(
    segments: &[RenderedSegment],
    separator: &RenderedSegment,
    reserved: Option<&RenderedSegment>,
    term_width: usize,
) -> Layout {
    let right_reserve = reserved.map_or(0, |x| x.width + separator.width);
    let max_left = term_width.saturating_sub(right_reserve);

    let mut left_width = 0;
    let mut kept = 0;
    for segment in segments {
        let cost = if kept == 0 {
            segment.width
        } else {
            separator.width + segment.width
        };
        if left_width + cost > max_left {
            break;
        }
        left_width += cost;
        kept += 1;
    }

    if kept == 0 && !segments.is_empty() {
        tracing::debug!(
            width = segments[0].width,
            max_left,
            "first segment overflows, keeping it anyway"
        );
        kept = 1;
    }

    let mut text = segments[..kept]
        .iter()
        .map(|x| x.text.as_str())
        .collect::<Vec<_>>()
        .join(separator.text.as_str());
    if let Some(reserved) = reserved {
        text.push_str(&separator.text);
        text.push_str(&reserved.text);
    }
    Layout { text, kept }
}

fn setup_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("off"));
    let subscriber = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init();
}

fn build_context(input: &SessionInput, args: &Args) -> anyhow::Result<Context> {
    let path = match input.current_dir() {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("no workspace directory")?,
    };
    let claude_dir = args
        .claude_dir
        .clone()
        .or_else(|| dirs::home_dir().map(|x| x.join(CLAUDE_DIR)));
    let git = GitFacts::collect(&path);

    Ok(Context {
        model_name: input.display_name().unwrap_or("Claude").to_string(),
        session_id: input.session_id().map(String::from),
        remaining_percentage: input.remaining_percentage(),
        claude_dir,
        git,
        now: chrono::Utc::now().timestamp(),
        path,
    })
}

fn term_width(args: &Args) -> usize {
    args.columns
        .or_else(|| terminal_size::terminal_size().map(|(Width(w), _)| w as usize))
        .unwrap_or(DEFAULT_COLUMNS)
}

fn render_line(
    context: &Context,
    palette: &Palette,
    bar_segments: usize,
    term_width: usize,
) -> String {
    let segments: Vec<Box<dyn StatusSegment>> = vec![
        model::ModelSegment::new(context).map(|x| Box::new(x) as Box<dyn StatusSegment>),
        GitSegment::new(context).map(|x| Box::new(x) as Box<dyn StatusSegment>),
        StashSegment::new(context).map(|x| Box::new(x) as Box<dyn StatusSegment>),
        path::PathSegment::new(context).map(|x| Box::new(x) as Box<dyn StatusSegment>),
        version::VersionSegment::new(context).map(|x| Box::new(x) as Box<dyn StatusSegment>),
        CommitAgeSegment::new(context).map(|x| Box::new(x) as Box<dyn StatusSegment>),
        todos::TodoSegment::new(context).map(|x| Box::new(x) as Box<dyn StatusSegment>),
        agents::AgentsSegment::new(context).map(|x| Box::new(x) as Box<dyn StatusSegment>),
    ]
    .into_iter()
    .flatten()
    .collect();

    let rendered: Vec<RenderedSegment> = segments.iter().map(|x| x.render(palette)).collect();
    let separator = RenderedSegment::new(palette.separator);
    let reserved = render_context_bar(context.remaining_percentage, bar_segments, palette);

    let layout = layout_segments(&rendered, &separator, reserved.as_ref(), term_width);
    tracing::debug!(
        kept = layout.kept,
        dropped = rendered.len() - layout.kept,
        term_width,
        line = %ansi::strip_ansi(&layout.text),
        "rendered status line"
    );
    layout.text
}

fn run(args: &Args, stdin: impl Read) -> anyhow::Result<String> {
    let input = SessionInput::from_reader(stdin)?;
    let context = build_context(&input, args)?;
    Ok(render_line(
        &context,
        &Palette::DEFAULT,
        args.bar_segments,
        term_width(args),
    ))
}

fn main() {
    let args = Args::parse();
    setup_logging(&args.log_level);
    panic::set_hook(Box::new(|info| tracing::error!(%info, "panicked")));

    match panic::catch_unwind(AssertUnwindSafe(|| run(&args, io::stdin().lock()))) {
        Ok(Ok(line)) => {
            print!("{}", line);
            let _ = io::stdout().flush();
        }
        Ok(Err(e)) => tracing::warn!(error = %format!("{:#}", e), "no status line rendered"),
        Err(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ansi::visible_width,
        colors::Palette,
        layout_segments, render_line,
        segments::{Context, RenderedSegment},
    };

    fn segment(width: usize) -> RenderedSegment {
        RenderedSegment::new(format!("\x1b[32m{}\x1b[0m", "x".repeat(width)))
    }

    fn separator() -> RenderedSegment {
        RenderedSegment::new(Palette::DEFAULT.separator)
    }

    #[test]
    fn layout_all_fit() {
        let segments = vec![segment(10), segment(8)];
        let layout = layout_segments(&segments, &separator(), None, 40);
        assert_eq!(layout.kept, 2);
        assert_eq!(visible_width(&layout.text), 21);
        assert_eq!(
            layout.text,
            format!("{}{}{}", segments[0].text, separator().text, segments[1].text)
        );
    }

    #[test]
    fn layout_drops_to_fit_reserved() {
        let segments = vec![segment(10), segment(8)];
        let reserved = segment(20);
        let layout = layout_segments(&segments, &separator(), Some(&reserved), 35);
        assert_eq!(layout.kept, 1);
        assert_eq!(
            layout.text,
            format!("{}{}{}", segments[0].text, separator().text, reserved.text)
        );
        assert_eq!(visible_width(&layout.text), 33);
    }

    #[test]
    fn layout_exact_fit() {
        let segments = vec![segment(10), segment(8)];
        let reserved = segment(20);
        let layout = layout_segments(&segments, &separator(), Some(&reserved), 44);
        assert_eq!(layout.kept, 2);
        assert_eq!(visible_width(&layout.text), 44);

        let layout = layout_segments(&segments, &separator(), Some(&reserved), 43);
        assert_eq!(layout.kept, 1);
    }

    #[test]
    fn layout_keeps_prefix_only() {
        // the third segment would fit on its own, but follows one that did not
        let segments = vec![segment(5), segment(30), segment(2)];
        let layout = layout_segments(&segments, &separator(), None, 20);
        assert_eq!(layout.kept, 1);
        assert_eq!(layout.text, segments[0].text);
    }

    #[test]
    fn layout_forces_first_segment() {
        let segments = vec![segment(10), segment(3)];
        let layout = layout_segments(&segments, &separator(), None, 5);
        assert_eq!(layout.kept, 1);
        assert_eq!(visible_width(&layout.text), 10);

        let layout = layout_segments(&segments, &separator(), None, 0);
        assert_eq!(layout.kept, 1);
    }

    #[test]
    fn layout_reserved_always_shown() {
        let segments = vec![segment(10)];
        let reserved = segment(20);
        let layout = layout_segments(&segments, &separator(), Some(&reserved), 0);
        assert_eq!(layout.kept, 1);
        assert!(layout.text.ends_with(&reserved.text));
    }

    #[test]
    fn layout_empty() {
        let layout = layout_segments(&[], &separator(), None, 80);
        assert_eq!(layout, crate::Layout { text: String::new(), kept: 0 });

        let reserved = segment(4);
        let layout = layout_segments(&[], &separator(), Some(&reserved), 80);
        assert_eq!(layout.text, format!("{}{}", separator().text, reserved.text));
    }

    #[test]
    fn layout_never_exceeds_budget() {
        let segments = vec![segment(10), segment(4), segment(7), segment(1), segment(9)];
        let reserved = segment(20);
        for term_width in 10..=80 {
            let layout = layout_segments(&segments, &separator(), None, term_width);
            assert!(visible_width(&layout.text) <= term_width);
        }
        for term_width in 33..=100 {
            let layout = layout_segments(&segments, &separator(), Some(&reserved), term_width);
            assert!(visible_width(&layout.text) <= term_width);
            assert!(layout.text.ends_with(&reserved.text));
        }
    }

    #[test]
    fn render_line_orders_segments() {
        let context = Context {
            model_name: "Claude Opus 4".to_string(),
            remaining_percentage: Some(100.0),
            ..Context::for_test("/work/app")
        };
        let line = render_line(&context, &Palette::DEFAULT, 15, 120);
        let plain = crate::ansi::strip_ansi(&line);
        assert_eq!(plain, format!("◆ Opus 4 · ⌂ app · {} 0%", "─".repeat(15)));
    }

    #[test]
    fn render_line_narrow_terminal() {
        let context = Context {
            model_name: "Claude Opus 4".to_string(),
            remaining_percentage: Some(100.0),
            ..Context::for_test("/work/app")
        };
        let line = render_line(&context, &Palette::DEFAULT, 15, 20);
        let plain = crate::ansi::strip_ansi(&line);
        assert_eq!(plain, format!("◆ Opus 4 · {} 0%", "─".repeat(15)));
    }
}
