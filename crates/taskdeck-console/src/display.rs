/*
[INPUT]:  Free-form task text (names, commands, outputs)
[OUTPUT]: Single-line, width-bounded strings for tables
[POS]:    Binary helpers shared by the CLI printer and the TUI
[UPDATE]: When column rendering rules change
*/

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Collapse whitespace runs (including newlines) into single spaces.
pub(crate) fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `width` terminal columns, marking the cut with `…`.
pub(crate) fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// `fit` and then pad with spaces to exactly `width` columns.
pub(crate) fn pad(text: &str, width: usize) -> String {
    let fitted = fit(text, width);
    let fill = width.saturating_sub(fitted.width());
    format!("{fitted}{}", " ".repeat(fill))
}
