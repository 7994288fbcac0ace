//! Line classification for the supported Markdown subset.
//!
//! Each source line is classified on its own, without terminator. Whether a
//! classification applies (e.g. inside an open code block) is decided by the
//! builder's state machine, not here.

use std::sync::LazyLock;

use regex::Regex;

/// The closing fence of a code block. Must match the whole line.
pub(crate) const CLOSING_FENCE: &str = "```";

/// Structural category of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind {
    /// Empty or whitespace-only.
    Blank,
    /// Starts with one or more `#`; carries the marker count.
    Heading { level: usize },
    /// A fence followed by at least one character, e.g. ```` ```java ````.
    FenceOpen,
    /// A pipe-framed table row such as `| a | b |`.
    TableRow,
    /// Anything else, including a bare closing fence outside a code block.
    Text,
}

/// Classify a line (terminator already removed).
pub(crate) fn classify(line: &str) -> LineKind {
    static FENCE_OPEN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^`{3}.+$").expect("valid regex"));
    static TABLE_ROW_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\|(.*\|)+$").expect("valid regex"));

    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    let level = heading_level(line);
    if level > 0 {
        return LineKind::Heading { level };
    }

    if FENCE_OPEN_RE.is_match(line) {
        return LineKind::FenceOpen;
    }

    if TABLE_ROW_RE.is_match(line) {
        return LineKind::TableRow;
    }

    LineKind::Text
}

/// Number of consecutive `#` markers at the start of `line`.
pub fn heading_level(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b'#').count()
}

/// Strip one trailing `\n` or `\r\n` from a raw line.
pub(crate) fn strip_terminator(raw: &str) -> &str {
    match raw.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => raw,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_headings() {
        assert_eq!(classify("# Title"), LineKind::Heading { level: 1 });
        assert_eq!(classify("### Deep"), LineKind::Heading { level: 3 });
        assert_eq!(classify("#NoSpace"), LineKind::Heading { level: 1 });
        // Leading whitespace means it is not a heading.
        assert_eq!(classify("  # indented"), LineKind::Text);
    }

    #[test]
    fn heading_level_counts_only_leading_markers() {
        assert_eq!(heading_level("## a # b"), 2);
        assert_eq!(heading_level("###### six"), 6);
        assert_eq!(heading_level("plain"), 0);
    }

    #[test]
    fn classify_fences() {
        assert_eq!(classify("```java"), LineKind::FenceOpen);
        assert_eq!(classify("````text"), LineKind::FenceOpen);
        // A bare fence does not open a block.
        assert_eq!(classify("```"), LineKind::Text);
    }

    #[test]
    fn classify_table_rows() {
        assert_eq!(classify("|a|b|"), LineKind::TableRow);
        assert_eq!(classify("| --- | --- |"), LineKind::TableRow);
        assert_eq!(classify("|only|"), LineKind::TableRow);
        assert_eq!(classify("|open"), LineKind::Text);
        assert_eq!(classify("a | b"), LineKind::Text);
    }

    #[test]
    fn classify_blank_lines() {
        assert_eq!(classify(""), LineKind::Blank);
        assert_eq!(classify("   \t"), LineKind::Blank);
    }

    #[test]
    fn strip_terminator_handles_both_endings() {
        assert_eq!(strip_terminator("abc\n"), "abc");
        assert_eq!(strip_terminator("abc\r\n"), "abc");
        assert_eq!(strip_terminator("abc"), "abc");
    }
}
