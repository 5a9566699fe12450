use crate::{colors::Palette, segments::RenderedSegment};

pub const DEFAULT_BAR_SEGMENTS: usize = 15;

const FILLED: char = '━';
const EMPTY: char = '─';
const CRITICAL_SYMBOL: char = '💀';

/// Raw usage this high already draws a full bar.
const SATURATION_PERCENT: f64 = 80.0;

/// Converts the remaining context percentage into the rescaled usage the bar
/// displays, in `0..=100`.
pub fn scaled_usage(remaining: f64) -> u32 {
    let used = (100.0 - remaining).clamp(0.0, 100.0);
    (used / SATURATION_PERCENT * 100.0).round().clamp(0.0, 100.0) as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Band {
    Safe,
    Caution,
    Warning,
    Critical,
}

impl Band {
    /// Band of a bar position, keyed by how far along the bar it sits.
    fn for_position(position: usize, total: usize) -> Band {
        let fraction = position as f64 / total as f64;
        if fraction < 0.4 {
            Band::Safe
        } else if fraction < 0.6 {
            Band::Caution
        } else if fraction < 0.8 {
            Band::Warning
        } else {
            Band::Critical
        }
    }

    /// Band of the percentage label.
    fn for_usage(scaled: u32) -> Band {
        match scaled {
            0..=62 => Band::Safe,
            63..=80 => Band::Caution,
            81..=94 => Band::Warning,
            _ => Band::Critical,
        }
    }

    fn color(self, palette: &Palette) -> &'static str {
        match self {
            Band::Safe => palette.green,
            Band::Caution => palette.yellow,
            Band::Warning => palette.orange,
            Band::Critical => palette.red,
        }
    }
}

/// Renders the right-pinned context gauge: a gradient bar and a percentage
/// label. Returns `None` when the session did not report a remaining
/// percentage.
pub fn render_context_bar(
    remaining: Option<f64>,
    total_segments: usize,
    palette: &Palette,
) -> Option<RenderedSegment> {
    let remaining = remaining.filter(|x| !x.is_nan())?;
    let scaled = scaled_usage(remaining);
    let filled = ((scaled as f64 / 100.0) * total_segments as f64)
        .round()
        .clamp(0.0, total_segments as f64) as usize;

    let mut text = String::new();
    for position in 0..total_segments {
        if position < filled {
            let color = Band::for_position(position, total_segments).color(palette);
            text.push_str(&palette.paint(color, FILLED));
        } else {
            text.push_str(&palette.paint(palette.grey, EMPTY));
        }
    }

    text.push(' ');
    let band = Band::for_usage(scaled);
    if band == Band::Critical {
        text.push_str(&format!(
            "{}{}{}% {}{}",
            palette.blink, palette.red, scaled, CRITICAL_SYMBOL, palette.reset
        ));
    } else {
        text.push_str(&palette.paint(band.color(palette), format!("{}%", scaled)));
    }

    tracing::debug!(remaining, scaled, filled, "rendered context bar");
    Some(RenderedSegment::new(text))
}
