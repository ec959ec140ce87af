//! JD Keyword Extractor: derives skill, keyword and action-verb sets from a raw
//! job description. Pure pattern matching, no LLM call.
//!
//! Steps:
//! 1. technology patterns on the original-case text → `skills`
//! 2. word-like tokens of the lower-cased text → `keywords`
//! 3. action-verb vocabulary by substring presence → `action_verbs`
//! 4. "Required:" / "Must have:" style blocks split into phrases → `keywords`

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::analysis::patterns::{ACTION_VERBS, COMPILED_TECH_PATTERNS, STOP_WORDS};

static JD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z][a-z0-9+#.]+\b").expect("Invalid regex: JD token"));

static REQUIREMENT_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:required|must have|qualifications?|requirements?)[:\s]+")
        .expect("Invalid regex: requirement label")
});

static REQUIREMENT_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;•\-–—\n]").expect("Invalid regex: requirement split"));

const MIN_TOKEN_CHARS: usize = 3;
const MAX_TOKEN_CHARS: usize = 29;
const MIN_PHRASE_CHARS: usize = 4;
const MAX_PHRASE_CHARS: usize = 39;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Insertion-ordered set of terms, deduplicated case-insensitively.
/// The first-seen casing is kept. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermSet {
    terms: Vec<String>,
    seen: HashSet<String>,
}

impl TermSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `term` unless an equal term (ignoring case) is already present.
    pub fn insert(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if self.seen.insert(term.to_lowercase()) {
            self.terms.push(term);
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    pub fn contains(&self, term: &str) -> bool {
        self.seen.contains(&term.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TermSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TermSet::new();
        for term in iter {
            set.insert(term);
        }
        set
    }
}

impl Serialize for TermSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.terms.serialize(serializer)
    }
}

/// Keyword signal derived from one job description. Ephemeral, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JdKeywordSet {
    pub skills: TermSet,
    pub keywords: TermSet,
    pub action_verbs: TermSet,
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction
// ────────────────────────────────────────────────────────────────────────────

/// Extracts skills, keywords and action verbs from a job description.
/// Never fails: empty or whitespace input yields three empty sets.
pub fn extract_jd_keywords(jd_text: &str) -> JdKeywordSet {
    if jd_text.trim().is_empty() {
        return JdKeywordSet::default();
    }

    let lowered = jd_text.to_lowercase();
    let mut result = JdKeywordSet::default();

    for (_, pattern) in COMPILED_TECH_PATTERNS.iter() {
        for m in pattern.find_iter(jd_text) {
            let skill = m.as_str().trim();
            if !skill.is_empty() {
                result.skills.insert(skill);
            }
        }
    }

    for m in JD_TOKEN.find_iter(&lowered) {
        let token = m.as_str();
        let len = token.chars().count();
        if (MIN_TOKEN_CHARS..=MAX_TOKEN_CHARS).contains(&len) && !STOP_WORDS.contains(&token) {
            result.keywords.insert(token);
        }
    }

    for verb in ACTION_VERBS {
        if lowered.contains(verb) {
            result.action_verbs.insert(*verb);
        }
    }

    for block in requirement_blocks(jd_text) {
        for fragment in REQUIREMENT_SPLIT.split(block) {
            let phrase = fragment.trim().to_lowercase();
            let len = phrase.chars().count();
            if (MIN_PHRASE_CHARS..=MAX_PHRASE_CHARS).contains(&len) {
                result.keywords.insert(phrase);
            }
        }
    }

    result
}

/// Returns each labelled requirement block: the label itself plus everything up
/// to the next blank line (or end of text). Blocks never overlap.
fn requirement_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    while let Some(label) = REQUIREMENT_LABEL.find_at(text, cursor) {
        let body_start = label.end();
        let body_end = text[body_start..]
            .find("\n\n")
            .map_or(text.len(), |offset| body_start + offset);
        blocks.push(&text[label.start()..body_end]);
        cursor = body_end;
    }

    blocks
}

/// First non-empty line of the JD, which is usually the job title.
pub fn extract_job_title(jd_text: &str) -> String {
    jd_text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}
