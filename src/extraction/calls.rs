//! Collects string literals passed to presentation calls.
//!
//! A call qualifies when it invokes a member whose name is in the configured
//! allow-list (`plt.title(...)`, `ax.set_xlabel(...)`, `fig.suptitle(...)`).
//! Only plain string literals count: f-strings, bytes and implicit
//! concatenations are left alone since they cannot be swapped for a single
//! replacement literal.

use std::ops::Range;

use tree_sitter::{Node, Tree};

use super::{FragmentKind, FragmentSet, TextFragment};
use crate::app_config::ExtractionConfig;

/// A plain string literal located in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral<'a> {
    /// Source text between the opening and closing quotes
    pub content: &'a str,
    /// Prefix letters before the opening quote (`r`, `u`, ...)
    pub prefix: &'a str,
    /// Byte range of `content` in the source
    pub site: Range<usize>,
}

/// Walk the tree and collect literal arguments of allow-listed calls
pub fn collect_call_arguments(tree: &Tree, source: &str, config: &ExtractionConfig) -> FragmentSet {
    let mut fragments = FragmentSet::new();
    let mut stack = vec![tree.root_node()];

    // Explicit stack keeps tree order without recursing on deeply nested code
    while let Some(node) = stack.pop() {
        if node.kind() == "call" {
            visit_call(node, source, config, &mut fragments);
        }

        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    fragments
}

fn visit_call(call: Node, source: &str, config: &ExtractionConfig, fragments: &mut FragmentSet) {
    let Some(name) = called_member_name(call, source) else {
        return;
    };
    if !config.is_target_call(name) {
        return;
    }
    let Some(arguments) = call.child_by_field_name("arguments") else {
        return;
    };

    let mut cursor = arguments.walk();
    for argument in arguments.named_children(&mut cursor) {
        let value = match argument.kind() {
            "keyword_argument" => {
                let keyword = argument
                    .child_by_field_name("name")
                    .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                    .unwrap_or_default();
                if config.is_protected_keyword(keyword) {
                    continue;
                }
                match argument.child_by_field_name("value") {
                    Some(value) => value,
                    None => continue,
                }
            }
            _ => argument,
        };

        if let Some(literal) = plain_string_literal(value, source) {
            if !literal.content.trim().is_empty() {
                fragments.insert_literal(TextFragment::new(literal.content, FragmentKind::CallArgument), literal.site);
            }
        }
    }
}

/// Name of the member being invoked, e.g. `set_title` for `ax.set_title(...)`
fn called_member_name<'a>(call: Node, source: &'a str) -> Option<&'a str> {
    let function = call.child_by_field_name("function")?;
    if function.kind() != "attribute" {
        return None;
    }
    function
        .child_by_field_name("attribute")?
        .utf8_text(source.as_bytes())
        .ok()
}

/// Interpret a node as a plain (non-f, non-bytes) string literal
pub fn plain_string_literal<'a>(node: Node, source: &'a str) -> Option<StringLiteral<'a>> {
    if node.kind() != "string" {
        return None;
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    if children.iter().any(|c| c.kind() == "interpolation") {
        return None;
    }

    let start = children.iter().find(|c| c.kind() == "string_start")?;
    let end = children.iter().rev().find(|c| c.kind() == "string_end")?;

    let opener = start.utf8_text(source.as_bytes()).ok()?;
    let prefix_len = opener.find(['"', '\''])?;
    let prefix = &opener[..prefix_len];
    if prefix.chars().any(|c| matches!(c, 'f' | 'F' | 'b' | 'B' | 't' | 'T')) {
        return None;
    }

    let site = start.end_byte()..end.start_byte();
    let content = source.get(site.clone())?;
    Some(StringLiteral { content, prefix, site })
}
