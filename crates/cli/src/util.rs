use unicode_width::UnicodeWidthStr;

/// Display width of a string, accounting for CJK double-width, emoji, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `width` display columns, adding ".." if truncated.
/// Uses Unicode display width so CJK/emoji alignment stays correct.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if width < 3 {
        // Just return the first char if it fits, else empty
        for ch in s.chars() {
            let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
            if cw <= width {
                return ch.to_string();
            }
        }
        return String::new();
    }

    let str_width = UnicodeWidthStr::width(s);
    if str_width <= width {
        return s.to_string();
    }

    // Walk chars, accumulating display width, stop at width - 2 to leave room for ".."
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
/// If shorter, right-pads with spaces. If longer, truncates with "..".
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = UnicodeWidthStr::width(s);
    if sw > width {
        truncate_display(s, width)
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}

/// Left-pad to `width` display columns. Longer strings are returned as is.
pub(crate) fn pad_left(s: &str, width: usize) -> String {
    let sw = UnicodeWidthStr::width(s);
    format!("{}{}", " ".repeat(width.saturating_sub(sw)), s)
}

/// Render rows under a header as an aligned plain-text table.
/// Columns listed in `right` are right-aligned; cells wider than
/// `max_width` are truncated.
pub(crate) fn render_table(headers: &[String], rows: &[Vec<String>], right: &[usize], max_width: usize) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h).min(max_width)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(display_width(cell).min(max_width));
            }
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &w))| {
                let cell = truncate_display(cell, w);
                if right.contains(&i) {
                    pad_left(&cell, w)
                } else {
                    pad_right(&cell, w)
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(headers);
    out.push('\n');
    out.push_str(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    for row in rows {
        out.push('\n');
        out.push_str(&line(row));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_width_ascii() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn display_width_cjk() {
        // CJK characters are 2 display columns each
        assert_eq!(display_width("\u{4e16}\u{754c}"), 4); // "世界"
    }

    #[test]
    fn truncate_fits() {
        assert_eq!(truncate_display("abc", 5), "abc");
        assert_eq!(truncate_display("abc", 3), "abc");
    }

    #[test]
    fn truncate_cuts() {
        assert_eq!(truncate_display("abcdef", 5), "abc..");
        assert_eq!(truncate_display("abcdef", 4), "ab..");
    }

    #[test]
    fn truncate_narrow() {
        assert_eq!(truncate_display("abc", 2), "a");
        assert_eq!(truncate_display("abc", 1), "a");
    }

    #[test]
    fn truncate_empty() {
        assert_eq!(truncate_display("", 5), "");
        assert_eq!(truncate_display("", 0), "");
    }

    #[test]
    fn truncate_cjk_boundary() {
        // "世界你好" is 8 display cols; truncate to 6 should cut at char boundary
        let s = "\u{4e16}\u{754c}\u{4f60}\u{597d}";
        let t = truncate_display(s, 6);
        // Budget is 4 display cols for text + 2 for ".."
        // "世界" = 4 display cols, fits in budget of 4
        assert_eq!(t, "\u{4e16}\u{754c}..");
        assert!(display_width(&t) <= 6);
    }

    #[test]
    fn pad_right_short() {
        assert_eq!(pad_right("ab", 5), "ab   ");
    }

    #[test]
    fn pad_right_exact() {
        assert_eq!(pad_right("abcde", 5), "abcde");
    }

    #[test]
    fn pad_right_long() {
        assert_eq!(pad_right("abcdef", 5), "abc..");
    }

    #[test]
    fn pad_left_short() {
        assert_eq!(pad_left("7", 3), "  7");
        assert_eq!(pad_left("1234", 3), "1234");
    }

    #[test]
    fn table_alignment() {
        let headers = vec!["name".to_string(), "n".to_string()];
        let rows = vec![
            vec!["alpha".to_string(), "1".to_string()],
            vec!["b".to_string(), "100".to_string()],
        ];
        let out = render_table(&headers, &rows, &[1], 40);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "name     n");
        assert_eq!(lines[1], "-----  ---");
        assert_eq!(lines[2], "alpha    1");
        assert_eq!(lines[3], "b      100");
    }

    #[test]
    fn table_truncates_wide_cells() {
        let headers = vec!["c".to_string()];
        let rows = vec![vec!["abcdefghij".to_string()]];
        let out = render_table(&headers, &rows, &[], 6);
        assert_eq!(out.lines().nth(2), Some("abcd.."));
    }
}
