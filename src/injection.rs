/*!
 * Idempotent insertion of the matplotlib CJK font block.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::InjectionConfig;

/// Any line containing this has already been patched
pub const PATCH_MARKER: &str = "plt.rcParams['font.sans-serif']";

static PYPLOT_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)(?:import\s+matplotlib\.pyplot\s+as\s+plt|from\s+matplotlib\s+import\s+pyplot\s+as\s+plt)\b")
        .expect("Invalid pyplot import regex")
});

/// What the injector did to the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionOutcome {
    /// Block inserted after the (0-based) anchor line
    Inserted { after_line: usize },
    /// The marker was already present
    AlreadyPatched,
    /// No pyplot import to anchor on
    AnchorMissing,
    /// Injection is turned off in the configuration
    Disabled,
}

impl InjectionOutcome {
    /// Whether the text differs from what went in
    pub fn changed_text(&self) -> bool {
        matches!(self, Self::Inserted { .. })
    }
}

/// Lines after injection plus what happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    pub lines: Vec<String>,
    pub outcome: InjectionOutcome,
}

/// The font block, indented like the anchor
pub fn font_block(indent: &str, config: &InjectionConfig) -> Vec<String> {
    let fonts = config.font_families.iter()
        .map(|f| format!("'{}'", f.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        format!("{}# --- CJK font support ---", indent),
        format!("{}{} = [{}]", indent, PATCH_MARKER, fonts),
        format!("{}plt.rcParams['axes.unicode_minus'] = False", indent),
        format!("{}# ------------------------", indent),
    ]
}

/// Insert the font block after the first pyplot import, unless already present
pub fn inject(lines: Vec<String>, config: &InjectionConfig) -> Injection {
    if !config.enabled {
        return Injection { lines, outcome: InjectionOutcome::Disabled };
    }

    if lines.iter().any(|line| line.contains(PATCH_MARKER)) {
        debug!("Font support block already present");
        return Injection { lines, outcome: InjectionOutcome::AlreadyPatched };
    }

    let anchor = lines.iter().enumerate().find_map(|(i, line)| {
        PYPLOT_IMPORT.captures(line).map(|c| (i, c.get(1).map_or("", |m| m.as_str()).to_string()))
    });

    let Some((index, indent)) = anchor else {
        warn!("No 'import matplotlib.pyplot as plt' found, font support block not injected");
        return Injection { lines, outcome: InjectionOutcome::AnchorMissing };
    };

    let mut lines = lines;
    let block = font_block(&indent, config);
    // Split line endings are kept on each line, so match a CRLF anchor
    let block = if lines[index].ends_with('\r') {
        block.into_iter().map(|l| l + "\r").collect()
    } else {
        block
    };
    lines.splice(index + 1..index + 1, block);

    debug!("Font support block inserted after line {}", index + 1);
    Injection { lines, outcome: InjectionOutcome::Inserted { after_line: index } }
}

/// Convenience over whole text: split on `\n`, inject, join
pub fn inject_text(text: &str, config: &InjectionConfig) -> (String, InjectionOutcome) {
    let lines = text.split('\n').map(str::to_string).collect();
    let injection = inject(lines, config);
    (injection.lines.join("\n"), injection.outcome)
}
