//! Résumé text parser: turns decoded résumé text into a `StructuredResume`.
//!
//! Flow: contact fields (whole text) → name (first line) → section scan
//! (line by line) → skills merge → legacy migration.
//!
//! The section scan is a small state machine. `Section` is the current
//! state; `Pending` holds the one multi-line entry under construction.
//! Every section switch and the end of input go through `flush`, so an
//! entry is never dropped and experience/project entries never interleave.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::analysis::patterns::{
    match_section_header, SectionKind, RESUME_TECH_KEYWORDS, SHORT_TECH_NAMES,
};
use crate::extraction::contact::extract_contact;
use crate::models::resume::{
    dedup_case_insensitive, Certification, Education, Experience, Project, StructuredResume,
};

const MONTHS: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

static DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    let date = format!(r"(?:\b{MONTHS}\.?\s*\d{{4}}|\d{{1,2}}/\d{{4}}|\d{{4}})");
    Regex::new(&format!(
        r"(?i){date}\s*[-–—]\s*(?:{date}|present|now|current)?|\b{MONTHS}\.?\s*\d{{4}}"
    ))
    .expect("Invalid regex: date range")
});

static PROJECT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^(?:\d{{4}}\b|{MONTHS}\b)")).expect("Invalid regex: project start")
});

static EDUCATION_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("Invalid regex: education year"));

static GPA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+\.?\d*\s*(?:cgpa|gpa|/\s*\d+\.?\d*)").expect("Invalid regex: gpa")
});

static ENTRY_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[|–—\-]").expect("Invalid regex: entry split"));

static SKILL_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|•\-–—]").expect("Invalid regex: skill split"));

static TECH_STACK_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|]").expect("Invalid regex: tech stack split"));

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s*").expect("Invalid regex: numbered item"));

/// Symbol-bearing names (C#, .NET, Vue.js) or short acronyms (SQL, AWS).
static TECH_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9]*[#+.][A-Za-z0-9#+.]*|[A-Z][A-Z0-9]{1,5})$")
        .expect("Invalid regex: tech token")
});

const BULLET_MARKERS: &[char] = &['•', '-', '*', '▪'];

const MAX_HEADER_CHARS: usize = 50;
const MIN_SUMMARY_CHARS: usize = 21;
const MAX_EXPERIENCE_HEADER_CHARS: usize = 100;
const MIN_FREE_RESPONSIBILITY_CHARS: usize = 21;
const MAX_PROJECT_TITLE_CHARS: usize = 60;
const MAX_EDUCATION_HEADER_CHARS: usize = 80;
const MIN_INSTITUTION_CHARS: usize = 6;
const CERTIFICATION_CHARS: std::ops::RangeInclusive<usize> = 6..=149;
const SKILL_CHARS: std::ops::RangeInclusive<usize> = 2..=49;
const NAME_CHARS: std::ops::RangeInclusive<usize> = 3..=59;

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Parses raw résumé text. Never fails: empty or unrecognisable input yields
/// defaulted fields.
pub fn extract_resume_data(raw_text: &str) -> StructuredResume {
    let mut resume = StructuredResume::default();
    if raw_text.trim().is_empty() {
        return resume;
    }

    let contact = extract_contact(raw_text);
    resume.email = contact.email;
    resume.phone = contact.phone;
    resume.linkedin = contact.linkedin;
    resume.github = contact.github;
    resume.portfolio = contact.portfolio;

    let lines: Vec<&str> = raw_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if let Some(first) = lines.first() {
        if NAME_CHARS.contains(&first.chars().count()) && !first.contains('@') {
            resume.full_name = first.to_string();
        }
    }

    let mut scanner = SectionScanner::default();
    for line in &lines {
        scanner.feed(line);
    }
    let scanned = scanner.finish();

    debug!(
        "Scanned {} lines: {} experience, {} projects, {} education, {} certifications",
        lines.len(),
        scanned.experience.len(),
        scanned.projects.len(),
        scanned.education.len(),
        scanned.certifications.len()
    );

    resume.summary = scanned.summary;
    resume.skills = dedup_case_insensitive(
        scanned
            .technical_skills
            .iter()
            .chain(scanned.soft_skills.iter())
            .cloned(),
    );
    resume.technical_skills = scanned.technical_skills;
    resume.soft_skills = scanned.soft_skills;
    resume.experience = scanned.experience;
    resume.projects = scanned.projects;
    resume.education = scanned.education;
    resume.certifications = scanned.certifications;

    resume.migrated()
}

// ────────────────────────────────────────────────────────────────────────────
// Section state machine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Section {
    #[default]
    None,
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
    Certifications,
}

impl From<SectionKind> for Section {
    fn from(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Summary => Section::Summary,
            SectionKind::Skills => Section::Skills,
            SectionKind::Experience => Section::Experience,
            SectionKind::Education => Section::Education,
            SectionKind::Projects => Section::Projects,
            SectionKind::Certifications => Section::Certifications,
        }
    }
}

/// The single multi-line entry being accumulated.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Pending {
    Experience(Experience),
    Project(Project),
    Education(Education),
}

/// Everything the scan produced, before it is folded into a `StructuredResume`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ScannedSections {
    pub summary: String,
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
}

#[derive(Debug, Default)]
pub(crate) struct SectionScanner {
    section: Section,
    pending: Option<Pending>,
    out: ScannedSections,
}

impl SectionScanner {
    #[cfg(test)]
    pub fn section(&self) -> Section {
        self.section
    }

    #[cfg(test)]
    pub fn pending(&self) -> Option<&Pending> {
        self.pending.as_ref()
    }

    /// Feeds one trimmed, non-empty line.
    pub fn feed(&mut self, line: &str) {
        if line.chars().count() < MAX_HEADER_CHARS {
            if let Some(kind) = match_section_header(line) {
                self.enter(kind.into());
                // "Skills: Rust, Go" carries content on the header line itself
                if let Some((_, rest)) = line.split_once(':') {
                    let rest = rest.trim();
                    if !rest.is_empty() {
                        self.handle(rest);
                    }
                }
                return;
            }
        }
        self.handle(line);
    }

    /// Switches section, flushing whatever entry was in progress.
    pub fn enter(&mut self, section: Section) {
        self.flush();
        self.section = section;
    }

    /// Moves the pending entry, if any, into its output list.
    pub fn flush(&mut self) {
        match self.pending.take() {
            Some(Pending::Experience(exp)) => self.out.experience.push(exp),
            Some(Pending::Project(project)) => self.out.projects.push(project),
            Some(Pending::Education(edu)) => self.out.education.push(edu),
            None => {}
        }
    }

    pub fn finish(mut self) -> ScannedSections {
        self.flush();
        self.out
    }

    fn handle(&mut self, line: &str) {
        match self.section {
            Section::None => {}
            Section::Summary => self.handle_summary(line),
            Section::Skills => self.handle_skills(line),
            Section::Experience => self.handle_experience(line),
            Section::Projects => self.handle_project(line),
            Section::Education => self.handle_education(line),
            Section::Certifications => self.handle_certification(line),
        }
    }

    fn handle_summary(&mut self, line: &str) {
        if line.chars().count() >= MIN_SUMMARY_CHARS {
            self.out.summary = line.to_string();
            self.section = Section::None;
        }
    }

    fn handle_skills(&mut self, line: &str) {
        for fragment in SKILL_SPLIT.split(line) {
            let skill = fragment.trim();
            if !SKILL_CHARS.contains(&skill.chars().count())
                || skill.chars().all(|c| c.is_ascii_digit())
            {
                continue;
            }
            let bucket = if is_technical_skill(skill) {
                &mut self.out.technical_skills
            } else {
                &mut self.out.soft_skills
            };
            if !bucket.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
                bucket.push(skill.to_string());
            }
        }
    }

    fn handle_experience(&mut self, line: &str) {
        let len = line.chars().count();
        if len < MAX_EXPERIENCE_HEADER_CHARS {
            if let Some(date) = DATE_RANGE.find(line) {
                self.flush();
                let parts: Vec<&str> = ENTRY_SPLIT.split(line).map(str::trim).collect();
                self.pending = Some(Pending::Experience(Experience {
                    company: non_empty_or(parts.first(), "Company"),
                    role: non_empty_or(parts.get(1), "Role"),
                    duration: date.as_str().trim().to_string(),
                    ..Default::default()
                }));
                return;
            }
        }

        if let Some(Pending::Experience(exp)) = self.pending.as_mut() {
            if let Some(item) = strip_list_marker(line) {
                if !item.is_empty() {
                    exp.responsibilities.push(item.to_string());
                }
            } else if len >= MIN_FREE_RESPONSIBILITY_CHARS {
                exp.responsibilities.push(line.to_string());
            }
        }
    }

    fn handle_project(&mut self, line: &str) {
        let starts_new = PROJECT_START.is_match(line)
            || (line.chars().count() < MAX_PROJECT_TITLE_CHARS && !starts_with_bullet(line));
        if starts_new {
            self.flush();
            self.pending = Some(Pending::Project(Project {
                title: line.to_string(),
                ..Default::default()
            }));
            return;
        }

        let Some(Pending::Project(project)) = self.pending.as_mut() else {
            return;
        };
        if mentions_tech_stack(line) {
            project.tech_stack = parse_tech_stack(line);
        } else if starts_with_bullet(line) {
            if let Some(item) = strip_list_marker(line).filter(|s| !s.is_empty()) {
                project.achievements.push(item.to_string());
            }
        } else {
            project.description = line.to_string();
        }
    }

    fn handle_education(&mut self, line: &str) {
        if line.chars().count() < MAX_EDUCATION_HEADER_CHARS {
            if let Some(year) = EDUCATION_YEAR.find(line) {
                self.flush();
                let mut degree = trim_separators(&line[..year.start()]);
                if degree.is_empty() {
                    degree = trim_separators(&line[year.end()..]);
                }
                let cgpa = GPA
                    .find(line)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();
                self.pending = Some(Pending::Education(Education {
                    degree,
                    year: year.as_str().to_string(),
                    cgpa,
                    ..Default::default()
                }));
                return;
            }
        }

        if let Some(Pending::Education(edu)) = self.pending.as_mut() {
            if line.chars().count() >= MIN_INSTITUTION_CHARS {
                edu.institution = line.to_string();
            }
        }
    }

    fn handle_certification(&mut self, line: &str) {
        if CERTIFICATION_CHARS.contains(&line.chars().count()) {
            let name = strip_list_marker(line).unwrap_or(line);
            if !name.is_empty() {
                self.out.certifications.push(Certification::named(name));
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Line helpers
// ────────────────────────────────────────────────────────────────────────────

fn is_technical_skill(skill: &str) -> bool {
    let lowered = skill.to_lowercase();
    RESUME_TECH_KEYWORDS.iter().any(|k| lowered.contains(k))
        || SHORT_TECH_NAMES.contains(&lowered.as_str())
        || TECH_TOKEN.is_match(skill)
}

fn starts_with_bullet(line: &str) -> bool {
    line.starts_with(BULLET_MARKERS)
}

/// Returns the text after a bullet marker or `1.` / `1)` prefix, or `None`
/// when the line is not a list item.
fn strip_list_marker(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix(BULLET_MARKERS) {
        return Some(rest.trim_start());
    }
    NUMBERED_ITEM
        .find(line)
        .map(|m| line[m.end()..].trim_start())
}

fn mentions_tech_stack(line: &str) -> bool {
    let lowered = line.to_lowercase();
    lowered.contains("tech") || lowered.contains("stack")
}

/// The whole line is the list; a leading label stays on the first item.
fn parse_tech_stack(line: &str) -> Vec<String> {
    TECH_STACK_SPLIT
        .split(line)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn trim_separators(text: &str) -> String {
    text.trim_matches(|c: char| c.is_whitespace() || ",|–—-():".contains(c))
        .to_string()
}

fn non_empty_or(part: Option<&&str>, fallback: &str) -> String {
    part.filter(|p| !p.is_empty())
        .map(|p| p.to_string())
        .unwrap_or_else(|| fallback.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
