/*!
 * Code analysis reports and variable renaming.
 *
 * Both hand a whole script to the collaborator and write the reply next to
 * the input; nothing is written when the call fails.
 */

use anyhow::{anyhow, Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use crate::extraction;
use crate::file_utils::FileManager;
use crate::translation::prompts::{self, ReportSection};
use crate::translation::response::strip_code_fence;
use crate::translation::TextCollaborator;

/// Suffix of analysis report files
pub const ANALYSIS_SUFFIX: &str = "_analysis";

/// Suffix of renamed scripts
pub const RENAMED_SUFFIX: &str = "_redefined";

fn read_script(path: &Path) -> Result<String> {
    let code = FileManager::read_to_string(path)?;
    if code.trim().is_empty() {
        return Err(anyhow!("Input file is empty: {:?}", path));
    }
    Ok(code)
}

/// Write a Markdown report with the requested sections to `<stem>_analysis.md`
pub async fn analyze<C>(path: &Path, sections: &[ReportSection], collaborator: &C) -> Result<PathBuf>
where
    C: TextCollaborator + ?Sized,
{
    let sections: Vec<ReportSection> = if sections.is_empty() {
        ReportSection::ALL.to_vec()
    } else {
        sections.to_vec()
    };

    let code = read_script(path)?;
    let prompt = prompts::analysis_prompt(collaborator.target_language(), &sections, &code);
    let report = collaborator.generate(&prompt).await
        .with_context(|| format!("Analysis request failed for {:?}", path))?;

    let output_path = FileManager::sibling_path(path, ANALYSIS_SUFFIX, ".md");
    FileManager::write_to_file(&output_path, &format!("{}\n", strip_markdown_fence(&report)))?;
    info!("Analysis report written to {}", output_path.display());
    Ok(output_path)
}

/// Rename variables per a naming standard and write `<stem>_redefined<ext>`
///
/// The reply must be valid Python; anything else is rejected.
pub async fn rename_variables<C>(path: &Path, standards_path: &Path, collaborator: &C) -> Result<PathBuf>
where
    C: TextCollaborator + ?Sized,
{
    let code = read_script(path)?;
    let standards = FileManager::read_to_string(standards_path)?;
    if standards.trim().is_empty() {
        return Err(anyhow!("Naming standards file is empty: {:?}", standards_path));
    }

    let reply = collaborator.generate(&prompts::rename_prompt(&standards, &code)).await
        .with_context(|| format!("Rename request failed for {:?}", path))?;
    let renamed = strip_code_fence(&reply);
    if renamed.trim().is_empty() {
        return Err(anyhow!("Rename reply for {:?} contained no code", path));
    }
    if let Err(e) = extraction::parse_python(renamed) {
        return Err(anyhow!("Renamed code for {:?} does not parse: {}", path, e));
    }

    let output_path = FileManager::output_path(path, RENAMED_SUFFIX);
    FileManager::write_to_file(&output_path, &format!("{}\n", renamed))?;
    info!("Renamed script written to {}", output_path.display());
    Ok(output_path)
}

/// Reports are Markdown already; drop a wrapping ```markdown fence only
fn strip_markdown_fence(report: &str) -> &str {
    let trimmed = report.trim();
    let is_wrapped = (trimmed.starts_with("```markdown") || trimmed.starts_with("```md"))
        && trimmed.ends_with("```");
    if is_wrapped {
        strip_code_fence(trimmed)
    } else {
        trimmed
    }
}
