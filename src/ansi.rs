const ESC: char = '\x1b';

/// Byte length of the SGR sequence at the start of `s`, if there is one.
///
/// Matches `ESC [ [0-9;]* m` exactly. Anything else (a lone ESC, a CSI with
/// another final byte, an unterminated sequence) is not a match.
fn sgr_len(s: &str) -> Option<usize> {
    let rest = s.strip_prefix(ESC)?.strip_prefix('[')?;
    let params = rest
        .bytes()
        .take_while(|b| b.is_ascii_digit() || *b == b';')
        .count();
    if rest.as_bytes().get(params) == Some(&b'm') {
        Some(ESC.len_utf8() + 1 + params + 1)
    } else {
        None
    }
}

/// Calls `f` with every run of text between SGR sequences.
fn for_each_visible<'a>(s: &'a str, mut f: impl FnMut(&'a str)) {
    let mut start = 0;
    let mut cursor = 0;
    while let Some(offset) = s[cursor..].find(ESC) {
        let at = cursor + offset;
        match sgr_len(&s[at..]) {
            Some(len) => {
                f(&s[start..at]);
                cursor = at + len;
                start = cursor;
            }
            None => cursor = at + ESC.len_utf8(),
        }
    }
    f(&s[start..]);
}

/// On-screen width of `s` with SGR color codes removed.
///
/// Counts Unicode scalar values, so glyphs that a terminal draws two columns
/// wide (emoji) count as one.
pub fn visible_width(s: &str) -> usize {
    let mut width = 0;
    for_each_visible(s, |run| width += run.chars().count());
    width
}

/// `s` with every SGR sequence removed.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for_each_visible(s, |run| out.push_str(run));
    out
}

#[cfg(test)]
mod tests {
    use super::{strip_ansi, visible_width};

    #[test]
    fn plain_text() {
        assert_eq!(visible_width(""), 0);
        assert_eq!(visible_width("main"), 4);
    }

    #[test]
    fn colored_text() {
        for color in ["\x1b[32m", "\x1b[38;5;208m", "\x1b[1;31m", "\x1b[m"] {
            let s = format!("{}feature/x{}", color, "\x1b[0m");
            assert_eq!(visible_width(&s), "feature/x".len());
        }
    }

    #[test]
    fn multibyte_glyphs_count_once() {
        assert_eq!(visible_width("\x1b[38;5;141m◆\x1b[0m \x1b[2mOpus\x1b[0m"), 6);
        assert_eq!(visible_width("\x1b[5m\x1b[31m97% 💀\x1b[0m"), 5);
        assert_eq!(visible_width("━━─"), 3);
    }

    #[test]
    fn non_sgr_escapes_are_kept() {
        // cursor movement is not a color code
        assert_eq!(visible_width("\x1b[2Kab"), 6);
        assert_eq!(visible_width("\x1b[12"), 4);
        assert_eq!(visible_width("a\x1b"), 2);
        assert_eq!(visible_width("\x1b\x1b[0mx"), 2);
    }

    #[test]
    fn strip_is_idempotent() {
        let s = "\x1b[36m⌥\x1b[0m \x1b[2mmain\x1b[0m\x1b[33m*\x1b[0m";
        let stripped = strip_ansi(s);
        assert_eq!(stripped, "⌥ main*");
        assert_eq!(visible_width(&stripped), visible_width(s));
        assert_eq!(strip_ansi(&stripped), stripped);
    }
}
