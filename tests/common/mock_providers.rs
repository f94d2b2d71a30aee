/*!
 * Test doubles for the text collaborator seam
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use plotlingo::errors::TranslationError;
use plotlingo::translation::{TextCollaborator, TranslationTable};

/// Collaborator that translates from a fixed dictionary and records every call
///
/// Unknown keys are left out of the reply, like a model that skipped them.
#[derive(Debug, Clone, Default)]
pub struct RecordingCollaborator {
    dictionary: HashMap<String, String>,
    fail: bool,
    batch_calls: Arc<AtomicUsize>,
    batches: Arc<Mutex<Vec<Vec<String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    generated: Arc<Mutex<Vec<String>>>,
    rewrite_reply: Option<String>,
}

impl RecordingCollaborator {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            dictionary: entries.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ..Self::default()
        }
    }

    /// Every call fails with `Unavailable`
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    /// Reply to `rewrite_whole` with this text
    pub fn with_rewrite_reply(mut self, reply: &str) -> Self {
        self.rewrite_reply = Some(reply.to_string());
        self
    }

    /// Queue replies for `generate`, handed out in order
    pub fn with_generated<'a>(self, replies: impl IntoIterator<Item = &'a str>) -> Self {
        self.generated.lock().extend(replies.into_iter().map(str::to_string));
        self
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    /// Keys of every batch received
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().clone()
    }

    /// Prompts passed to `generate`
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextCollaborator for RecordingCollaborator {
    async fn batch_translate(&self, batch: &TranslationTable) -> Result<HashMap<String, String>, TranslationError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().push(batch.iter().map(|(k, _)| k.to_string()).collect());
        if self.fail {
            return Err(TranslationError::Unavailable("recording collaborator set to fail".to_string()));
        }

        Ok(batch
            .iter()
            .filter_map(|(key, _)| self.dictionary.get(key).map(|v| (key.to_string(), v.clone())))
            .collect())
    }

    async fn rewrite_whole(&self, code: &str) -> Result<String, TranslationError> {
        if self.fail {
            return Err(TranslationError::Unavailable("recording collaborator set to fail".to_string()));
        }
        Ok(self.rewrite_reply.clone().unwrap_or_else(|| code.to_string()))
    }

    async fn generate(&self, prompt: &str) -> Result<String, TranslationError> {
        self.prompts.lock().push(prompt.to_string());
        if self.fail {
            return Err(TranslationError::Unavailable("recording collaborator set to fail".to_string()));
        }
        let mut generated = self.generated.lock();
        if generated.is_empty() {
            return Err(TranslationError::Unavailable("no generated reply queued".to_string()));
        }
        Ok(generated.remove(0))
    }

    fn target_language(&self) -> &str {
        "Simplified Chinese"
    }
}
