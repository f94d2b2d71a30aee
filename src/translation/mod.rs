/*!
 * Translation of extracted fragments through a text collaborator.
 *
 * - `table`: the translation table and its reconciliation
 * - `core`: the LLM-backed collaborator
 * - `prompts`: prompt templates
 * - `response`: reply parsing
 */

use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::TranslationError;

pub mod core;
pub mod prompts;
pub mod response;
pub mod table;

pub use self::core::{TokenUsageStats, TranslationService};
pub use self::table::{reconcile, TranslationTable};

/// Remote text-generation capability used by the pipeline
///
/// Every call either yields a usable result or an explicit error; callers
/// decide how a failure affects the file being processed.
#[async_trait]
pub trait TextCollaborator: Send + Sync {
    /// Translate the values of an identity batch, keyed by original text
    async fn batch_translate(&self, batch: &TranslationTable) -> Result<HashMap<String, String>, TranslationError>;

    /// Rework a whole script for layout; the reply may still carry fences
    async fn rewrite_whole(&self, code: &str) -> Result<String, TranslationError>;

    /// Free-form generation for reports and refactorings
    async fn generate(&self, prompt: &str) -> Result<String, TranslationError>;

    /// Target language name used in prompts
    fn target_language(&self) -> &str;
}
