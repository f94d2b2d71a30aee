/*!
 * Prompt templates for the text collaborators.
 *
 * Every template asks for a reply with no surrounding commentary; the
 * reply parsers in `translation::response` still tolerate fences.
 */

use std::fmt;
use std::str::FromStr;

/// Prompt template with `{placeholder}` substitution.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: &'static str,
}

impl PromptTemplate {
    /// Batch translation of a JSON object of fragments.
    pub const FRAGMENT_TRANSLATOR: &'static str = r#"You are a precise translation engine for source-code annotations.
Translate every string value of the JSON object below into concise, professional, idiomatic {target_language}.

## Rules
- Keep every key exactly as given; translate only the values
- These are plot titles, axis labels, legend entries and code comments: keep them short
- Leave code identifiers, units, numbers and LaTeX math (`$...$`) untouched
- Return ONLY a JSON object with the same keys, no explanations

## Input
{payload}"#;

    /// Whole-file layout rework of a plotting script.
    pub const LAYOUT_BEAUTIFIER: &'static str = r#"You are a senior Python data-visualisation engineer. Refactor the script below so the figures it produces look more professional.

## Principles
1. Layout: when several subplots are stacked in a single row or column (for example 4x1), rearrange them into a compact grid (for example 2x2).
2. Visuals: harmonise font sizes, line widths and colours. A style such as `plt.style.use('seaborn-v0_8-paper')` is fine. Prefer larger, clearer fonts and keep all text inside the figure.
3. Readability: tidy the code structure without changing its core logic.
4. Preservation: keep all plotting logic, titles, labels and comments.
5. Output: reply with the refactored Python code only. No explanations and no Markdown fences.

## Script
```python
{payload}
```"#;

    /// Technical analysis report of a script.
    pub const CODE_ANALYST: &'static str = r#"You are a research software engineer who writes clear technical documentation for scientific code.
Analyse the Python script below and write a Markdown report in {target_language} covering the following sections:

{sections}

## Output rules
- Reply with the Markdown report only
- No preamble, no closing remarks

## Script
```python
{payload}
```"#;

    /// Rename variables according to a naming standard.
    pub const VARIABLE_RENAMER: &'static str = r#"You are a refactoring expert who strictly follows the team's coding standards. Rename the variables of the Python script below so they follow the naming standard.

## Rules
1. Apply the naming standard below to the script, matching variables by their meaning in context.
2. Only rename variables. Never change logic, algorithms, function calls, control flow or output.
3. Keep comments, string contents, function names and import aliases (`np`, `pd`, `plt`) exactly as they are.
4. Rename each variable consistently across the whole script.
5. Reply with the complete refactored Python code only, with no explanations and no Markdown fences.

## Naming standard
```text
{standards}
```

## Script
```python
{payload}
```"#;

    /// Create a new prompt template.
    pub const fn new(template: &'static str) -> Self {
        Self { template }
    }

    /// Render the template, replacing each `{name}` with its value.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        vars.iter().fold(self.template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{}}}", name), value)
        })
    }
}

/// Section of the analysis report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportSection {
    /// What the script takes in, computes and produces
    Summary,
    /// Step by step structure and data flow
    Structure,
    /// Formulas in LaTeX plus a variable table
    Math,
}

impl ReportSection {
    pub const ALL: [ReportSection; 3] = [Self::Summary, Self::Structure, Self::Math];

    /// Instruction inserted into the analysis prompt
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Summary => "### Function summary\nIn a few sentences, state what the script takes as input, what it computes and what it produces.",
            Self::Structure => "### Implementation logic\nBreak the script down step by step: how data is initialised, processed and transformed, what each key function or block does, and how any algorithm (gradient descent, curve fitting, ...) works.",
            Self::Math => "### Core formulas and variables\nIdentify the mathematical operations the code implements and write them as numbered LaTeX equations. Then list the main variables in a Markdown table mapping each name to its mathematical symbol and meaning (for example `learning_rate` to $\\alpha$, `np.dot(X, w) + b` to $X \\cdot w + b$).",
        }
    }
}

impl fmt::Display for ReportSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Summary => "summary",
            Self::Structure => "structure",
            Self::Math => "math",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ReportSection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "structure" => Ok(Self::Structure),
            "math" => Ok(Self::Math),
            _ => Err(anyhow::anyhow!("Invalid report section: {}", s)),
        }
    }
}

/// Prompt asking for a translated copy of `batch_json`
pub fn fragment_translation_prompt(target_language: &str, batch_json: &str) -> String {
    PromptTemplate::new(PromptTemplate::FRAGMENT_TRANSLATOR)
        .render(&[("target_language", target_language), ("payload", batch_json)])
}

/// Prompt asking for a layout rework of `code`
pub fn beautify_prompt(code: &str) -> String {
    PromptTemplate::new(PromptTemplate::LAYOUT_BEAUTIFIER).render(&[("payload", code)])
}

/// Prompt asking for an analysis report with the given sections, in order
pub fn analysis_prompt(target_language: &str, sections: &[ReportSection], code: &str) -> String {
    let instructions = sections.iter()
        .map(|s| s.instruction())
        .collect::<Vec<_>>()
        .join("\n\n");
    PromptTemplate::new(PromptTemplate::CODE_ANALYST).render(&[
        ("target_language", target_language),
        ("sections", &instructions),
        ("payload", code),
    ])
}

/// Prompt asking for `code` with variables renamed per `standards`
pub fn rename_prompt(standards: &str, code: &str) -> String {
    PromptTemplate::new(PromptTemplate::VARIABLE_RENAMER)
        .render(&[("standards", standards), ("payload", code)])
}
