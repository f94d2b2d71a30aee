/*!
 * # plotlingo - translate the text of Python plotting scripts with AI
 *
 * A Rust library that localizes the human-readable text of matplotlib scripts:
 * titles, axis labels, legends, annotations and comments.
 *
 * ## Features
 *
 * - Extract translatable fragments with a tree-sitter Python parser
 * - Translate them in one batch through an LLM provider:
 *   - DeepSeek and OpenAI (chat completions API)
 *   - Anthropic API
 *   - Ollama (local LLM)
 * - Rewrite only the literals and comments that were translated, keeping
 *   quoting and line endings
 * - Inject a CJK font configuration block after the pyplot import
 * - Optionally rework the figure layout, write analysis reports and rename
 *   variables per a naming standard
 *
 * ## Architecture
 *
 * - `extraction`: fragment discovery in call arguments and comments
 * - `translation`: the collaborator seam, prompts and the translation table
 * - `rewrite`: position-exact literal and comment replacement
 * - `injection`: CJK font block insertion
 * - `pipeline`: per-file orchestration
 * - `analysis`: reports and variable renaming
 * - `app_controller`: single file and folder runs
 * - `providers`: HTTP clients for the supported LLM APIs
 * - `app_config`, `file_utils`, `language_utils`, `errors`: support code
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod analysis;
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod extraction;
pub mod file_utils;
pub mod injection;
pub mod language_utils;
pub mod pipeline;
pub mod providers;
pub mod rewrite;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use extraction::{FragmentSet, TextFragment};
pub use pipeline::{FileOutcome, Pipeline, PipelineOptions, SourceDocument};
pub use translation::{TextCollaborator, TranslationService, TranslationTable};
pub use language_utils::{get_language_name, normalize_to_part2t};
pub use errors::{AppError, ExtractionError, PipelineError, ProviderError, TranslationError};
