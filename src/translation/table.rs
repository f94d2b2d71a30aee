/*!
 * Translation table and its reconciliation against a collaborator reply.
 */

use log::debug;
use std::collections::HashMap;

use crate::errors::TranslationError;
use crate::extraction::FragmentSet;
use crate::translation::TextCollaborator;

/// Ordered mapping from original fragment text to its replacement
///
/// Keys are unique and keep the order of the fragment set they came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table mapping every fragment to itself
    pub fn identity(fragments: &FragmentSet) -> Self {
        fragments.texts().map(|t| (t.to_string(), t.to_string())).collect()
    }

    /// Insert or replace the mapping for `original`, keeping its first position
    pub fn insert(&mut self, original: impl Into<String>, replacement: impl Into<String>) {
        let original = original.into();
        let replacement = replacement.into();
        match self.index.get(&original) {
            Some(&i) => self.entries[i].1 = replacement,
            None => {
                self.index.insert(original.clone(), self.entries.len());
                self.entries.push((original, replacement));
            }
        }
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.index.get(original).map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains_key(&self, original: &str) -> bool {
        self.index.contains_key(original)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in table order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries whose replacement differs from the original
    pub fn changed_count(&self) -> usize {
        self.entries.iter().filter(|(k, v)| k != v).count()
    }

    /// Render as a JSON object, keys in table order
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self.entries.iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl FromIterator<(String, String)> for TranslationTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

/// Obtain a replacement for every fragment with a single collaborator call
///
/// An empty fragment set yields an empty table without calling the collaborator.
/// Fragments the reply leaves out keep their original text; reply keys that
/// were never asked for are dropped.
pub async fn reconcile<C>(fragments: &FragmentSet, collaborator: &C) -> Result<TranslationTable, TranslationError>
where
    C: TextCollaborator + ?Sized,
{
    if fragments.is_empty() {
        return Ok(TranslationTable::new());
    }

    let batch = TranslationTable::identity(fragments);
    let reply = collaborator.batch_translate(&batch).await?;

    for key in reply.keys().filter(|k| !batch.contains_key(k.as_str())) {
        debug!("Ignoring unrequested key in translation reply: {:?}", key);
    }

    let table = batch.iter()
        .map(|(original, _)| {
            let replacement = reply.get(original).map(String::as_str).unwrap_or(original);
            (original.to_string(), replacement.to_string())
        })
        .collect::<TranslationTable>();

    debug!("Reconciled {} fragments, {} translated", table.len(), table.changed_count());
    Ok(table)
}
