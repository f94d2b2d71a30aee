/*!
 * Text-preserving reinsertion of translated fragments.
 *
 * Literals are replaced by position: only the call arguments the extractor
 * recorded are candidates, and only when their whole content equals a
 * fragment. Keyword values it skipped, dictionary keys and other code strings
 * keep their text even when it matches. Comments are replaced line by line,
 * and only on lines whose comment starts with the fragment.
 */

use log::debug;
use std::collections::HashMap;
use std::ops::Range;

use crate::extraction::comments::COMMENT_MARKER;
use crate::translation::TranslationTable;

pub mod lexer;

use lexer::StringToken;

/// Table entries that actually change, longest first
///
/// Ties keep table order, so the plan is deterministic for a given table.
#[derive(Debug, Clone, PartialEq)]
pub struct RewritePlan {
    entries: Vec<(String, String)>,
}

impl RewritePlan {
    pub fn new(table: &TranslationTable) -> Self {
        let mut entries: Vec<(String, String)> = table.iter()
            .filter(|(original, replacement)| original != replacement)
            .map(|(o, r)| (o.to_string(), r.to_string()))
            .collect();
        // Stable sort keeps table order among equal lengths
        entries.sort_by_key(|(original, _)| std::cmp::Reverse(original.chars().count()));
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in substitution order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(o, r)| (o.as_str(), r.as_str()))
    }

    fn replacement_for(&self, original: &str) -> Option<&str> {
        self.entries.iter()
            .find(|(o, _)| o == original)
            .map(|(_, r)| r.as_str())
    }
}

/// Splice the table's replacements into `source`
///
/// `sites` are the content ranges of the literals that may change, as
/// recorded by extraction. Never fails. With no entry that changes anything
/// the result is byte-identical to `source`.
pub fn rewrite(source: &str, sites: &[Range<usize>], table: &TranslationTable) -> String {
    let plan = RewritePlan::new(table);
    if plan.is_empty() {
        return source.to_string();
    }

    let text = rewrite_literals(source, sites, &plan);
    rewrite_comments(&text, &plan)
}

/// Replace whole literal contents at `sites` that match a plan entry
///
/// Edits are applied back to front so earlier ranges stay valid.
pub fn rewrite_literals(source: &str, sites: &[Range<usize>], plan: &RewritePlan) -> String {
    let site_ends: HashMap<usize, usize> = sites.iter().map(|r| (r.start, r.end)).collect();
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();

    let candidates = lexer::string_literals(source)
        .filter(StringToken::is_plain_text)
        .filter(|token| site_ends.get(&token.content.start) == Some(&token.content.end));
    for token in candidates {
        let content = &source[token.content.clone()];
        let Some(replacement) = plan.replacement_for(content) else {
            continue;
        };
        match escape_for_literal(replacement, &token) {
            Some(escaped) => edits.push((token.content, escaped)),
            None => debug!("Replacement for {:?} cannot be written into a raw literal, keeping original", content),
        }
    }

    let mut output = source.to_string();
    for (range, replacement) in edits.into_iter().rev() {
        output.replace_range(range, &replacement);
    }
    output
}

/// Replace fragments on comment lines that start with them
pub fn rewrite_comments(source: &str, plan: &RewritePlan) -> String {
    plan.iter().fold(source.to_string(), |text, (original, replacement)| {
        let replacement = collapse_newlines(replacement);
        text.split('\n')
            .map(|line| rewrite_comment_line(line, original, &replacement))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn rewrite_comment_line(line: &str, original: &str, replacement: &str) -> String {
    let indent = line.len() - line.trim_start().len();
    let body = &line[indent..];
    let Some(after_marker) = body.strip_prefix(COMMENT_MARKER) else {
        return line.to_string();
    };

    let anchored = after_marker.starts_with(original)
        || after_marker.strip_prefix(' ').is_some_and(|rest| rest.starts_with(original));
    if !anchored {
        return line.to_string();
    }

    let marker_end = indent + COMMENT_MARKER.len_utf8();
    format!("{}{}", &line[..marker_end], line[marker_end..].replace(original, replacement))
}

fn collapse_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Escape `text` so it reads back as the same characters inside `token`'s quotes
///
/// Backslashes are kept as typed, so escape sequences the translation kept
/// from the original stay escape sequences. Raw literals cannot escape their
/// quote, so a replacement that needs it yields `None`.
pub fn escape_for_literal(text: &str, token: &StringToken) -> Option<String> {
    let quote = token.quote as char;
    let raw = token.is_raw();

    if raw {
        let breaks_line = !token.triple && text.contains(['\n', '\r']);
        let closes_early = if token.triple {
            text.contains(&quote.to_string().repeat(3)) || text.ends_with(quote)
        } else {
            has_unescaped(text, quote)
        };
        if breaks_line || closes_early || trailing_backslashes(text) % 2 == 1 {
            return None;
        }
        return Some(text.to_string());
    }

    let mut escaped = String::with_capacity(text.len());
    let mut backslashes = 0usize;
    for c in text.chars() {
        match c {
            '\n' if !token.triple => escaped.push_str("\\n"),
            '\r' if !token.triple => escaped.push_str("\\r"),
            c if c == quote && backslashes % 2 == 0 => {
                escaped.push('\\');
                escaped.push(c);
            }
            c => escaped.push(c),
        }
        backslashes = if c == '\\' { backslashes + 1 } else { 0 };
    }
    if backslashes % 2 == 1 {
        escaped.push('\\');
    }
    Some(escaped)
}

fn has_unescaped(text: &str, quote: char) -> bool {
    let mut backslashes = 0usize;
    for c in text.chars() {
        if c == quote && backslashes % 2 == 0 {
            return true;
        }
        backslashes = if c == '\\' { backslashes + 1 } else { 0 };
    }
    false
}

fn trailing_backslashes(text: &str) -> usize {
    text.chars().rev().take_while(|&c| c == '\\').count()
}
