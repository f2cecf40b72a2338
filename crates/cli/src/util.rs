use unicode_width::UnicodeWidthStr;

/// Widest column the human tables will print before truncating.
pub(crate) const MAX_COLUMN_WIDTH: usize = 48;

/// Display width of a string, accounting for CJK double-width, emoji, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `width` display columns, adding ".." if truncated.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if width < 3 {
        return s
            .chars()
            .find(|&ch| unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0) <= width)
            .map(String::from)
            .unwrap_or_default();
    }

    if display_width(s) <= width {
        return s.to_string();
    }

    // Stop at width - 2 to leave room for ".."
    let budget = width - 2;
    let mut used = 0;
    let mut end_byte = 0;
    for (i, ch) in s.char_indices() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            end_byte = i;
            break;
        }
        used += cw;
        end_byte = i + ch.len_utf8();
    }

    format!("{}..", &s[..end_byte])
}

/// Pad or truncate a string to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = display_width(s);
    if sw > width {
        truncate_display(s, width)
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}

/// Right-align within `width` columns. Used for numeric cells.
pub(crate) fn pad_left(s: &str, width: usize) -> String {
    let sw = display_width(s);
    if sw > width {
        truncate_display(s, width)
    } else {
        format!("{}{}", " ".repeat(width - sw), s)
    }
}

/// Column alignment for [`render_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Right,
}

/// Render rows as a plain-text table with a header rule.
///
/// Column widths fit the widest cell, capped at [`MAX_COLUMN_WIDTH`].
pub(crate) fn render_table(headers: &[(&str, Align)], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|(h, _)| display_width(h)).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(display_width(cell));
        }
    }
    for w in &mut widths {
        *w = (*w).min(MAX_COLUMN_WIDTH);
    }

    let mut out = String::new();
    out.push_str(&render_line(headers.iter().map(|(h, _)| *h), headers, &widths));
    out.push('\n');
    out.push_str(&widths.iter().map(|&w| "-".repeat(w)).collect::<Vec<_>>().join("  "));
    out.push('\n');
    for row in rows {
        out.push_str(&render_line(row.iter().map(String::as_str), headers, &widths));
        out.push('\n');
    }
    out
}

fn render_line<'a>(
    cells: impl Iterator<Item = &'a str>,
    headers: &[(&str, Align)],
    widths: &[usize],
) -> String {
    let padded: Vec<String> = cells
        .zip(headers.iter().zip(widths))
        .map(|(cell, ((_, align), &w))| match align {
            Align::Left => pad_right(cell, w),
            Align::Right => pad_left(cell, w),
        })
        .collect();
    padded.join("  ").trim_end().to_string()
}
