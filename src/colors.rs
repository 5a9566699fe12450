use const_format::formatcp;

#[derive(Clone, Copy)]
struct Color {
    pub fg: u8,
}

const RED: Color = Color { fg: 31 };
const GREEN: Color = Color { fg: 32 };
const YELLOW: Color = Color { fg: 33 };
const MAGENTA: Color = Color { fg: 35 };
const CYAN: Color = Color { fg: 36 };

// 256-color palette indexes
const ORANGE_256: u8 = 208;
const BLUE_256: u8 = 75;
const PURPLE_256: u8 = 141;
const GREY_256: u8 = 242;
const PINK_256: u8 = 213;

const CSI: &str = "\x1b[";

const RESET: &str = formatcp!("{}0m", CSI);
const BOLD: &str = formatcp!("{}1m", CSI);
const DIM: &str = formatcp!("{}2m", CSI);
const BLINK: &str = formatcp!("{}5m", CSI);

const SEPARATOR: &str = formatcp!("{}38;5;{}m · {}", CSI, GREY_256, RESET);

/// The escape sequences used to paint a status line. Handed by reference to
/// every renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub reset: &'static str,
    pub bold: &'static str,
    pub dim: &'static str,
    pub blink: &'static str,
    pub red: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub magenta: &'static str,
    pub cyan: &'static str,
    pub orange: &'static str,
    pub blue: &'static str,
    pub purple: &'static str,
    pub grey: &'static str,
    pub pink: &'static str,
    pub separator: &'static str,
}

impl Palette {
    pub const DEFAULT: Palette = Palette {
        reset: RESET,
        bold: BOLD,
        dim: DIM,
        blink: BLINK,
        red: formatcp!("{}{}m", CSI, RED.fg),
        green: formatcp!("{}{}m", CSI, GREEN.fg),
        yellow: formatcp!("{}{}m", CSI, YELLOW.fg),
        magenta: formatcp!("{}{}m", CSI, MAGENTA.fg),
        cyan: formatcp!("{}{}m", CSI, CYAN.fg),
        orange: formatcp!("{}38;5;{}m", CSI, ORANGE_256),
        blue: formatcp!("{}38;5;{}m", CSI, BLUE_256),
        purple: formatcp!("{}38;5;{}m", CSI, PURPLE_256),
        grey: formatcp!("{}38;5;{}m", CSI, GREY_256),
        pink: formatcp!("{}38;5;{}m", CSI, PINK_256),
        separator: SEPARATOR,
    };

    /// Wraps `text` in `style` and a trailing reset.
    pub fn paint(&self, style: &str, text: impl std::fmt::Display) -> String {
        format!("{}{}{}", style, text, self.reset)
    }

    /// The `<icon> <label>` shape shared by most segments: a colored icon
    /// followed by dimmed text.
    pub fn icon_label(&self, icon_style: &str, icon: char, label: impl std::fmt::Display) -> String {
        format!(
            "{} {}",
            self.paint(icon_style, icon),
            self.paint(self.dim, label)
        )
    }
}
