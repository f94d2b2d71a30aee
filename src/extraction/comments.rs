//! Collects the text of full-line comments.
//!
//! Works on raw lines rather than the syntax tree: a line whose trimmed form
//! starts with `#` is a comment line, and its text is whatever follows the
//! marker. Separator comments (`# -----`, `# ====`) and comments without any
//! ASCII letter, such as ones already in Chinese, are dropped.

use super::{FragmentKind, FragmentSet, TextFragment};

/// Comment marker for Python
pub const COMMENT_MARKER: char = '#';

/// Text of a comment line, if the line is one
pub fn comment_text(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix(COMMENT_MARKER)
        .map(str::trim)
}

/// Whether a comment candidate is prose worth translating
pub fn is_translatable(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic())
}

/// Scan all lines and collect translatable comment texts in line order
pub fn collect_comments(source: &str) -> FragmentSet {
    source
        .split('\n')
        .filter_map(comment_text)
        .filter(|text| is_translatable(text))
        .map(|text| TextFragment::new(text, FragmentKind::Comment))
        .collect()
}
