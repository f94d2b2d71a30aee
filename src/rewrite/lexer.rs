/*!
 * Minimal Python lexer for string literals and comments.
 *
 * Only the spans that matter for text replacement are produced; everything
 * else is skipped. All delimiters are ASCII, so scanning bytes never splits
 * a UTF-8 sequence at a token boundary.
 */

use std::ops::Range;

/// A string literal with its delimiters resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringToken {
    /// Whole literal, prefix and quotes included
    pub span: Range<usize>,
    /// Text between the quotes
    pub content: Range<usize>,
    /// Prefix letters as written (`r`, `Rb`, `f`, ...)
    pub prefix: String,
    /// `'` or `"`
    pub quote: u8,
    /// Triple-quoted literal
    pub triple: bool,
}

impl StringToken {
    fn has_prefix(&self, letters: &[char]) -> bool {
        self.prefix.chars().any(|c| letters.contains(&c.to_ascii_lowercase()))
    }

    pub fn is_raw(&self) -> bool {
        self.has_prefix(&['r'])
    }

    pub fn is_bytes(&self) -> bool {
        self.has_prefix(&['b'])
    }

    /// f-strings and t-strings interpolate their content
    pub fn is_interpolated(&self) -> bool {
        self.has_prefix(&['f', 't'])
    }

    /// Plain text literal whose content can be replaced as a whole
    pub fn is_plain_text(&self) -> bool {
        !self.is_bytes() && !self.is_interpolated()
    }
}

/// Lexed token of interest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    String(StringToken),
    /// From `#` up to, not including, the line break
    Comment(Range<usize>),
}

const STRING_PREFIXES: &[&str] = &["r", "u", "b", "f", "t", "br", "rb", "fr", "rf", "tr", "rt"];

fn is_string_prefix(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    STRING_PREFIXES.contains(&lower.as_str())
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Tokenise `source` into string literals and comments, in source order
///
/// Total: unterminated literals end at the line break (single-quoted) or at
/// the end of input (triple-quoted).
pub fn tokenize(source: &str) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'#' => {
                let end = line_end(bytes, i);
                tokens.push(Token::Comment(i..end));
                i = end;
            }
            b'\'' | b'"' => {
                let token = scan_string(bytes, i, i, String::new());
                i = token.span.end;
                tokens.push(Token::String(token));
            }
            b if is_word_byte(b) => {
                let start = i;
                while i < bytes.len() && is_word_byte(bytes[i]) {
                    i += 1;
                }
                let word = &source[start..i];
                if i < bytes.len() && matches!(bytes[i], b'\'' | b'"') && is_string_prefix(word) {
                    let token = scan_string(bytes, start, i, word.to_string());
                    i = token.span.end;
                    tokens.push(Token::String(token));
                }
            }
            _ => i += 1,
        }
    }

    tokens
}

/// String literals only
pub fn string_literals(source: &str) -> impl Iterator<Item = StringToken> {
    tokenize(source).into_iter().filter_map(|t| match t {
        Token::String(s) => Some(s),
        Token::Comment(_) => None,
    })
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter()
        .position(|&b| b == b'\n' || b == b'\r')
        .map(|p| from + p)
        .unwrap_or(bytes.len())
}

/// Scan a literal whose opening quote sits at `quote_at`
fn scan_string(bytes: &[u8], start: usize, quote_at: usize, prefix: String) -> StringToken {
    let quote = bytes[quote_at];
    let triple = bytes.len() >= quote_at + 3 && bytes[quote_at + 1] == quote && bytes[quote_at + 2] == quote;
    let content_start = quote_at + if triple { 3 } else { 1 };
    let interpolated = prefix.chars().any(|c| matches!(c.to_ascii_lowercase(), 'f' | 't'));

    let mut i = content_start;
    let mut depth = 0usize;
    let (content_end, end) = loop {
        if i >= bytes.len() {
            break (bytes.len(), bytes.len());
        }
        let b = bytes[i];
        match b {
            // Escapes never end a literal, raw or not
            b'\\' => i += 2,
            b'{' if interpolated => {
                if depth == 0 && bytes.get(i + 1) == Some(&b'{') {
                    i += 2;
                } else {
                    depth += 1;
                    i += 1;
                }
            }
            b'}' if interpolated && depth > 0 => {
                depth -= 1;
                i += 1;
            }
            b'\'' | b'"' if depth > 0 => {
                i = scan_string(bytes, i, i, String::new()).span.end;
            }
            b'\n' | b'\r' if !triple && depth == 0 => break (i, i),
            _ if b == quote && depth == 0 => {
                if !triple {
                    break (i, i + 1);
                }
                if bytes.get(i + 1) == Some(&quote) && bytes.get(i + 2) == Some(&quote) {
                    break (i, i + 3);
                }
                i += 1;
            }
            _ => i += 1,
        }
    };

    StringToken {
        span: start..end,
        content: content_start..content_end.min(bytes.len()),
        prefix,
        quote,
        triple,
    }
}
