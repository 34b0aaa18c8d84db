use once_cell::sync::Lazy;
use regex::RegexSet;

use crate::error::{AutodrawError, Result};

/// Phrases that read as a request to produce an image. Any single match
/// triggers generation; add new phrases here.
const BUILTIN_PATTERNS: &[&str] = &[
    r"(?i)\b(создай|сгенерируй|нарисуй|сделай|покажи)\s+(картинк|изображен|рисунок|фото)",
    r"(?i)\bнарисуй\b",
];

static BUILTIN_SET: Lazy<RegexSet> =
    Lazy::new(|| RegexSet::new(BUILTIN_PATTERNS).expect("builtin trigger patterns compile"));

#[derive(Debug)]
pub struct TriggerDetector {
    patterns: RegexSet,
}

impl TriggerDetector {
    /// Compiles the built-in phrases plus any operator-supplied extras.
    /// Extras are matched case-insensitively like the built-ins.
    pub fn new(extra_patterns: &[String]) -> Result<Self> {
        if extra_patterns.is_empty() {
            return Ok(Self {
                patterns: BUILTIN_SET.clone(),
            });
        }

        let combined: Vec<String> = BUILTIN_PATTERNS
            .iter()
            .map(|pattern| (*pattern).to_string())
            .chain(extra_patterns.iter().map(|pattern| format!("(?i){pattern}")))
            .collect();
        let patterns = RegexSet::new(&combined)
            .map_err(|e| AutodrawError::Config(format!("invalid trigger pattern: {e}")))?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.patterns.is_match(text)
    }
}
