//! Language utilities for ISO language code handling
//!
//! Validates ISO 639-1 (2-letter) and ISO 639-2 (3-letter) language codes
//! and turns them into the names used in prompts. Codes may carry a region
//! or script subtag (`zh-TW`, `pt_BR`).

use anyhow::{Result, anyhow};
use isolang::Language;

/// Language code type
#[derive(Debug, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// ISO 639-2/B codes that differ from their ISO 639-2/T form
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Split `zh-TW` into (`zh`, Some(`tw`))
fn split_subtag(code: &str) -> (String, Option<String>) {
    let normalized = code.trim().to_lowercase();
    match normalized.split_once(['-', '_']) {
        Some((base, subtag)) => (base.to_string(), Some(subtag.to_string())),
        None => (normalized, None),
    }
}

fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    PART2B_TO_PART2T.iter()
        .find(|(b, _)| *b == code)
        .map(|(_, t)| *t)
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let (base, _) = split_subtag(code);

    if base.len() == 2 && Language::from_639_1(&base).is_some() {
        return Ok(LanguageCodeType::Part1);
    }
    if base.len() == 3 {
        if Language::from_639_3(&base).is_some() {
            return Ok(LanguageCodeType::Part2T);
        }
        if part2b_to_part2t(&base).is_some() {
            return Ok(LanguageCodeType::Part2B);
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let (base, _) = split_subtag(code);

    match validate_language_code(&base)? {
        LanguageCodeType::Part1 => Language::from_639_1(&base)
            .map(|lang| lang.to_639_3().to_string())
            .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code)),
        LanguageCodeType::Part2T => Ok(base),
        LanguageCodeType::Part2B => part2b_to_part2t(&base)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code)),
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Name of the target language as it should appear in a prompt
///
/// Chinese is spelled out by script, since the bare ISO name does not say
/// which one the reader expects.
pub fn prompt_language_name(code: &str) -> Result<String> {
    let name = get_language_name(code)?;
    if normalize_to_part2t(code)? != "zho" {
        return Ok(name);
    }

    let (_, subtag) = split_subtag(code);
    let traditional = matches!(subtag.as_deref(), Some("tw" | "hk" | "mo" | "hant"));
    Ok(if traditional {
        "Traditional Chinese".to_string()
    } else {
        "Simplified Chinese".to_string()
    })
}
