/// A single source line with its indentation measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRef<'a> {
    /// 1-based line number in the source document.
    pub number: usize,
    /// The line without its newline terminator.
    pub raw: &'a str,
    /// Width of the leading whitespace. A tab counts as one indent step.
    pub indent: usize,
    /// The line with surrounding whitespace removed.
    pub content: &'a str,
}

/// Width a leading tab contributes to [`LineRef::indent`].
pub const TAB_WIDTH: usize = 2;

/// Returns an iterator over the lines of `text` with their indentation.
///
/// Both `\n` and `\r\n` terminators are accepted; a missing final newline is fine.
pub fn lines_with_indent(text: &str) -> impl Iterator<Item = LineRef<'_>> {
    text.lines().enumerate().map(|(i, raw)| LineRef {
        number: i + 1,
        raw,
        indent: indent_width(raw),
        content: raw.trim(),
    })
}

fn indent_width(raw: &str) -> usize {
    raw.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_spaces_and_tabs() {
        let lines: Vec<_> = lines_with_indent("a\n  b\n\tc\n").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!((lines[0].indent, lines[0].content), (0, "a"));
        assert_eq!((lines[1].indent, lines[1].content), (2, "b"));
        assert_eq!((lines[2].indent, lines[2].content), (2, "c"));
    }

    #[test]
    fn strips_carriage_returns() {
        let lines: Vec<_> = lines_with_indent("key: v\r\n  other: w\r\n").collect();
        assert_eq!(lines[0].raw, "key: v");
        assert_eq!(lines[1].content, "other: w");
        assert_eq!(lines[1].number, 2);
    }

    #[test]
    fn blank_line_has_empty_content() {
        let lines: Vec<_> = lines_with_indent("   \n").collect();
        assert_eq!(lines[0].content, "");
        assert_eq!(lines[0].indent, 3);
    }
}
