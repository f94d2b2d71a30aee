/*!
 * Parsing of collaborator replies.
 */

use log::debug;
use std::collections::HashMap;

use crate::errors::TranslationError;

/// Locate the JSON object inside a model reply
///
/// Accepts a bare object, a ```json fenced block, an unlabelled fence holding
/// an object, or else the span from the first `{` to the last `}`.
pub fn extract_json(response: &str) -> Option<&str> {
    let trimmed = response.trim();

    if trimmed.starts_with('{') {
        return Some(trimmed);
    }

    if let Some(start) = trimmed.find("```json") {
        if let Some(end) = trimmed[start + 7..].find("```") {
            return Some(trimmed[start + 7..start + 7 + end].trim());
        }
    }

    if let Some(start) = trimmed.find("```") {
        if let Some(end) = trimmed[start + 3..].find("```") {
            let json = trimmed[start + 3..start + 3 + end].trim();
            if json.starts_with('{') {
                return Some(json);
            }
        }
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end > start => Some(&trimmed[start..=end]),
        _ => None,
    }
}

/// Parse a translation reply into a text mapping
///
/// Non-string values are dropped, so the affected fragments keep their
/// original text.
pub fn parse_translation_reply(response: &str) -> Result<HashMap<String, String>, TranslationError> {
    let json = extract_json(response)
        .ok_or_else(|| TranslationError::Unavailable("reply contains no JSON object".to_string()))?;

    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| TranslationError::Unavailable(format!("reply is not valid JSON: {}", e)))?;

    let serde_json::Value::Object(map) = value else {
        return Err(TranslationError::Unavailable("reply is not a JSON object".to_string()));
    };

    Ok(map.into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::String(text) => Some((key, text)),
            other => {
                debug!("Ignoring non-string translation for {:?}: {}", key, other);
                None
            }
        })
        .collect())
}

/// Remove a Markdown code fence wrapped around a code reply
///
/// A fence is a line starting with three backticks at column 0. The block
/// runs from the first fence to the last one, so fences nested inside a
/// Markdown report stay in it; text outside is discarded. A reply without
/// such a fence is returned whole with only trailing whitespace trimmed, so
/// indentation and backticks inside the code survive.
pub fn strip_code_fence(reply: &str) -> &str {
    let leading = reply.trim_start();
    let open = if leading.starts_with(FENCE) {
        Some(reply.len() - leading.len())
    } else {
        fence_lines(reply, 0).next()
    };
    let Some(open) = open else {
        return reply.trim_end();
    };

    // Skip the info string (`python`, `py`, ...) up to the end of the line
    let body_start = reply[open..].find('\n').map(|i| open + i + 1).unwrap_or(reply.len());

    match fence_lines(reply, body_start).last() {
        Some(close) => reply[body_start..close].trim_end_matches([' ', '\t']).trim_end_matches(['\n', '\r']),
        None if leading.starts_with(FENCE) => reply[body_start..].trim_end(),
        None => reply.trim_end(),
    }
}

const FENCE: &str = "```";

/// Byte offsets of the lines at or after `from` that start with a fence
fn fence_lines(text: &str, from: usize) -> impl Iterator<Item = usize> + '_ {
    text[from..]
        .split('\n')
        .scan(from, |offset, line| {
            let start = *offset;
            *offset += line.len() + 1;
            Some((start, line))
        })
        .filter(|(_, line)| line.starts_with(FENCE))
        .map(|(start, _)| start)
}
