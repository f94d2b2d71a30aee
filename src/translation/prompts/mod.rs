/*!
 * Prompt construction for the text collaborators.
 *
 * This module provides:
 * - The batch fragment translation prompt
 * - The layout beautify prompt
 * - The analysis report and variable rename prompts
 */

pub mod templates;

// Re-export main types
pub use templates::{
    analysis_prompt, beautify_prompt, fragment_translation_prompt, rename_prompt, PromptTemplate,
    ReportSection,
};
