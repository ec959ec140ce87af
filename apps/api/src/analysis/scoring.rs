//! ATS Scoring: measures how much of a JD's keyword signal a résumé covers.
//!
//! Pure, deterministic, no LLM call. Algorithm:
//! 1. target = JD skills ∪ JD keywords (normalized)
//! 2. vocabulary = declared résumé skills ∪ tokens from summary, experience, projects
//! 3. a target term is matched when any vocabulary term contains it or is contained by it
//! 4. score = round(matched / |target| × 100); empty target → `NEUTRAL_SCORE`
//!
//! Bidirectional substring matching is intentionally loose: short terms match
//! inside longer ones ("go" inside "mongo"). Scores depend on that behaviour.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::keywords::{extract_jd_keywords, JdKeywordSet};
use crate::models::resume::StructuredResume;

/// Returned when the JD yields no extractable terms, so thin JDs are not penalised.
pub const NEUTRAL_SCORE: u8 = 75;

static RESUME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z0-9+#.]+\b").expect("Invalid regex: resume token"));

const MIN_TOKEN_CHARS: usize = 3;
const MAX_TOKEN_CHARS: usize = 29;
const MAX_LISTED_GAPS: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Full ATS report. `overall_score` is the number every other component uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsReport {
    pub overall_score: u8, // 0 – 100
    pub matched_terms: Vec<String>,
    pub missing_terms: Vec<String>,
    pub recommendation: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Computes the 0–100 ATS compatibility score between a résumé and a JD.
pub fn calculate_ats_score(resume: &StructuredResume, jd_text: &str) -> u8 {
    score_report(resume, jd_text).overall_score
}

/// Scores and explains which JD terms the résumé covers.
pub fn score_report(resume: &StructuredResume, jd_text: &str) -> AtsReport {
    let jd = extract_jd_keywords(jd_text);
    score_against(resume, &jd)
}

/// Same as [`score_report`] for an already-extracted keyword set.
pub fn score_against(resume: &StructuredResume, jd: &JdKeywordSet) -> AtsReport {
    let target = target_terms(jd);

    if target.is_empty() {
        return AtsReport {
            overall_score: NEUTRAL_SCORE,
            matched_terms: vec![],
            missing_terms: vec![],
            recommendation: "No keywords found in the job description; neutral score applied."
                .to_string(),
        };
    }

    let vocabulary = resume_vocabulary(resume);

    let (matched_terms, missing_terms): (Vec<String>, Vec<String>) = target
        .into_iter()
        .partition(|term| vocabulary.iter().any(|v| terms_overlap(v, term)));

    let total = matched_terms.len() + missing_terms.len();
    let ratio = matched_terms.len() as f64 / total as f64;
    let overall_score = (ratio * 100.0).round().clamp(0.0, 100.0) as u8;

    debug!(
        "ATS score {}/100 ({} of {} JD terms matched)",
        overall_score,
        matched_terms.len(),
        total
    );

    let recommendation = build_recommendation(overall_score, &missing_terms);

    AtsReport {
        overall_score,
        matched_terms,
        missing_terms,
        recommendation,
    }
}

/// Bidirectional substring test on already-normalized terms.
pub fn terms_overlap(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Lower-cases and collapses internal whitespace.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalized JD skills ∪ keywords, first-seen order, no empties.
fn target_terms(jd: &JdKeywordSet) -> Vec<String> {
    let mut seen = HashSet::new();
    jd.skills
        .iter()
        .chain(jd.keywords.iter())
        .map(normalize)
        .filter(|term| !term.is_empty() && seen.insert(term.clone()))
        .collect()
}

/// Everything the résumé could be credited for: declared skills plus body tokens.
fn resume_vocabulary(resume: &StructuredResume) -> HashSet<String> {
    let mut vocabulary: HashSet<String> = resume
        .declared_skills()
        .map(normalize)
        .filter(|s| !s.is_empty())
        .collect();

    let mut body: Vec<&str> = vec![resume.summary.as_str()];
    for exp in &resume.experience {
        body.extend(exp.responsibilities.iter().map(String::as_str));
        body.push(&exp.role);
        body.push(&exp.company);
    }
    for project in &resume.projects {
        body.push(&project.title);
        body.push(&project.description);
        body.extend(project.tech_stack.iter().map(String::as_str));
        body.extend(project.achievements.iter().map(String::as_str));
    }

    let text = body.join(" ").to_lowercase();
    for m in RESUME_TOKEN.find_iter(&text) {
        let len = m.as_str().chars().count();
        if (MIN_TOKEN_CHARS..=MAX_TOKEN_CHARS).contains(&len) {
            vocabulary.insert(m.as_str().to_string());
        }
    }

    vocabulary
}

/// Builds a human-readable recommendation string from score and missing terms.
fn build_recommendation(score: u8, missing: &[String]) -> String {
    let top_gaps: Vec<&str> = missing
        .iter()
        .take(MAX_LISTED_GAPS)
        .map(String::as_str)
        .collect();

    if score >= 80 {
        "Strong match. The résumé already covers most of the JD keywords.".to_string()
    } else if score >= 50 {
        format!(
            "Moderate match ({score}/100). Consider covering: {}.",
            top_gaps.join(", ")
        )
    } else {
        format!(
            "Low match ({score}/100). Missing key terms: {}. Tailor skills and bullets to the JD.",
            top_gaps.join(", ")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
