/*!
 * Fragment extraction from Python plotting scripts.
 *
 * Human-readable text lives in two structurally different places:
 * - `calls`: string literals passed to presentation calls (`ax.set_title("...")`)
 * - `comments`: full-line `#` comments
 *
 * Both passes are pure functions over the source text. Their results are merged
 * into a single `FragmentSet` keyed by the literal text, so a string used both as
 * a label and as a comment is translated once. The set also records where every
 * collected call argument sits, so reinsertion only touches those literals.
 */

use std::collections::HashMap;
use std::ops::Range;

use tree_sitter::{Node, Parser, Tree};

use crate::app_config::ExtractionConfig;
use crate::errors::ExtractionError;

pub mod calls;
pub mod comments;

/// Where a fragment was first found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// String literal passed positionally or by keyword to a presentation call
    CallArgument,
    /// Text of a full-line comment
    Comment,
}

/// A unique piece of human-readable text found in code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    /// The literal text, exactly as it appears between quotes or after `#`
    pub text: String,
    /// Where the text was first seen
    pub kind: FragmentKind,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, kind: FragmentKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Insertion-ordered set of fragments, deduplicated by text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentSet {
    fragments: Vec<TextFragment>,
    index: HashMap<String, usize>,
    literal_sites: Vec<Range<usize>>,
}

impl FragmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment; returns false when the same text is already present
    pub fn insert(&mut self, fragment: TextFragment) -> bool {
        if self.index.contains_key(&fragment.text) {
            return false;
        }
        self.index.insert(fragment.text.clone(), self.fragments.len());
        self.fragments.push(fragment);
        true
    }

    /// Add a call argument found at `site`, the byte range between its quotes
    ///
    /// Every occurrence is recorded even when the text is already present.
    pub fn insert_literal(&mut self, fragment: TextFragment, site: Range<usize>) -> bool {
        self.literal_sites.push(site);
        self.insert(fragment)
    }

    /// Merge another set into this one, keeping first-seen kinds
    pub fn extend(&mut self, other: FragmentSet) {
        self.literal_sites.extend(other.literal_sites);
        for fragment in other.fragments {
            self.insert(fragment);
        }
    }

    /// Content ranges of every collected call argument, in tree order
    pub fn literal_sites(&self) -> &[Range<usize>] {
        &self.literal_sites
    }

    pub fn contains(&self, text: &str) -> bool {
        self.index.contains_key(text)
    }

    pub fn get(&self, text: &str) -> Option<&TextFragment> {
        self.index.get(text).map(|&i| &self.fragments[i])
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextFragment> {
        self.fragments.iter()
    }

    /// Fragment texts in insertion order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(|f| f.text.as_str())
    }

    /// Number of fragments of the given kind
    pub fn count_kind(&self, kind: FragmentKind) -> usize {
        self.fragments.iter().filter(|f| f.kind == kind).count()
    }
}

impl FromIterator<TextFragment> for FragmentSet {
    fn from_iter<I: IntoIterator<Item = TextFragment>>(iter: I) -> Self {
        let mut set = FragmentSet::new();
        for fragment in iter {
            set.insert(fragment);
        }
        set
    }
}

/// Parse Python source into a syntax tree, rejecting sources with syntax errors
pub fn parse_python(source: &str) -> Result<Tree, ExtractionError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ExtractionError::Grammar(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ExtractionError::Grammar("parser returned no tree".to_string()))?;

    if let Some(node) = first_error_node(tree.root_node()) {
        let position = node.start_position();
        return Err(ExtractionError::Parse {
            line: position.row + 1,
            column: position.column + 1,
        });
    }

    Ok(tree)
}

/// Check whether a text is syntactically valid Python
pub fn is_valid_python(source: &str) -> bool {
    parse_python(source).is_ok()
}

fn first_error_node(node: Node) -> Option<Node> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .find_map(first_error_node)
        .or(Some(node))
}

/// Extract all translatable fragments from a Python source
///
/// Call arguments are collected first (in tree order), then comments
/// (in line order). Fails only when the source does not parse.
pub fn extract(source: &str, config: &ExtractionConfig) -> Result<FragmentSet, ExtractionError> {
    let tree = parse_python(source)?;

    let mut fragments = calls::collect_call_arguments(&tree, source, config);
    fragments.extend(comments::collect_comments(source));

    Ok(fragments)
}
