//! Declarative pattern tables for JD and résumé analysis.
//!
//! Tables are plain data. Regexes are compiled once on first use.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Coarse grouping for technology patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Language,
    Frontend,
    Runtime,
    DataStore,
    Cloud,
    Infrastructure,
    ApiStyle,
    Methodology,
    MachineLearning,
    Styling,
}

/// Technology-name patterns applied (case-insensitively) to the original JD text.
/// Table order is match order.
pub const TECH_PATTERNS: &[(SkillCategory, &str)] = &[
    (SkillCategory::Language, r"\b(?:javascript|typescript|js|ts)\b"),
    (SkillCategory::Frontend, r"\b(?:react|vue|angular|svelte)\b"),
    (SkillCategory::Runtime, r"\b(?:node\.?js|nodejs|express)\b"),
    (
        SkillCategory::Language,
        r"\b(?:python|java|c#|c\+\+|go|rust|kotlin|swift)\b",
    ),
    (
        SkillCategory::DataStore,
        r"\b(?:sql|mongodb|postgresql|mysql|redis|elasticsearch)\b",
    ),
    (SkillCategory::Cloud, r"\b(?:aws|azure|gcp|google cloud)\b"),
    (
        SkillCategory::Infrastructure,
        r"\b(?:docker|kubernetes|k8s|terraform)\b",
    ),
    (SkillCategory::ApiStyle, r"\b(?:rest|graphql|api|microservices)\b"),
    (
        SkillCategory::Methodology,
        r"\b(?:git|ci/cd|jenkins|agile|scrum)\b",
    ),
    (
        SkillCategory::MachineLearning,
        r"\b(?:machine learning|ml|ai|nlp|tensorflow|pytorch)\b",
    ),
    (
        SkillCategory::Styling,
        r"\b(?:html|css|scss|sass|redux|webpack)\b",
    ),
];

/// Verbs recognised as strong bullet openers.
pub const ACTION_VERBS: &[&str] = &[
    "developed",
    "implemented",
    "designed",
    "led",
    "managed",
    "optimized",
    "created",
    "built",
    "delivered",
    "improved",
    "reduced",
    "increased",
    "automated",
    "architected",
    "coordinated",
    "executed",
    "launched",
    "streamlined",
    "transformed",
    "scaled",
    "deployed",
    "integrated",
    "analyzed",
    "resolved",
    "established",
    "collaborated",
    "drove",
];

/// Used for bullet rewriting when the JD mentions none of `ACTION_VERBS`.
pub const DEFAULT_ACTION_VERBS: &[&str] = &["developed", "implemented", "led", "managed", "optimized"];

pub const STOP_WORDS: &[&str] = &["the", "and", "for", "with", "from", "this", "that"];

/// Substrings that mark a résumé skill fragment as technical.
pub const RESUME_TECH_KEYWORDS: &[&str] = &[
    "javascript",
    "typescript",
    "react",
    "vue",
    "angular",
    "node",
    "python",
    "java",
    "c#",
    "c++",
    "sql",
    "mongodb",
    "postgresql",
    "aws",
    "azure",
    "docker",
    "kubernetes",
    "git",
    "rest",
    "graphql",
    "html",
    "css",
    "scss",
    "redux",
    "express",
    "django",
    "flask",
    "machine learning",
    "tensorflow",
    "pytorch",
    "agile",
    "scrum",
    "ci/cd",
    "jenkins",
    "terraform",
    "linux",
    "api",
    "microservices",
    "redis",
    "elasticsearch",
    "rust",
    "kotlin",
    "swift",
    "golang",
    "gcp",
    "kafka",
    "spark",
    "hadoop",
    "figma",
    "excel",
    "ruby",
    "php",
    "scala",
    "perl",
    "bash",
    "dart",
    "haskell",
    "elixir",
];

/// Names too short for substring matching; compared whole.
pub const SHORT_TECH_NAMES: &[&str] = &["go", "c", "r"];

/// Résumé section a header line switches into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
    Certifications,
}

/// Header patterns, checked in order. Anchored at line start so body text
/// ("Built profile service...") does not switch sections.
pub const SECTION_HEADER_PATTERNS: &[(SectionKind, &str)] = &[
    (
        SectionKind::Summary,
        r"(?i)^(?:(?:professional|career)\s+)?(?:summary|objective|profile)\b|^about\s+me\b",
    ),
    (
        SectionKind::Skills,
        r"(?i)^(?:(?:technical|core|key)\s+)?(?:skills|competencies)\b",
    ),
    (
        SectionKind::Experience,
        r"(?i)^(?:(?:work|professional)\s+)?experience\b|^employment\b|^work\s+history\b",
    ),
    (
        SectionKind::Education,
        r"(?i)^(?:education|academic|qualifications)",
    ),
    (
        SectionKind::Projects,
        r"(?i)^(?:key\s+)?projects\b|^project\s+experience\b",
    ),
    (
        SectionKind::Certifications,
        r"(?i)^(?:certifications?|licenses|certificates)\b",
    ),
];

// ────────────────────────────────────────────────────────────────────────────
// Compiled tables
// ────────────────────────────────────────────────────────────────────────────

// Pattern literals above are fixed; a failed compile is a programming error.
pub static COMPILED_TECH_PATTERNS: LazyLock<Vec<(SkillCategory, Regex)>> = LazyLock::new(|| {
    TECH_PATTERNS
        .iter()
        .map(|(category, pattern)| {
            let regex = Regex::new(&format!("(?i){pattern}"))
                .unwrap_or_else(|e| panic!("invalid tech pattern {pattern}: {e}"));
            (*category, regex)
        })
        .collect()
});

pub static COMPILED_SECTION_HEADERS: LazyLock<Vec<(SectionKind, Regex)>> = LazyLock::new(|| {
    SECTION_HEADER_PATTERNS
        .iter()
        .map(|(kind, pattern)| {
            let regex = Regex::new(pattern)
                .unwrap_or_else(|e| panic!("invalid header pattern {pattern}: {e}"));
            (*kind, regex)
        })
        .collect()
});

/// Returns the section a header-like line opens, if any.
pub fn match_section_header(line: &str) -> Option<SectionKind> {
    COMPILED_SECTION_HEADERS
        .iter()
        .find(|(_, regex)| regex.is_match(line))
        .map(|(kind, _)| *kind)
}
