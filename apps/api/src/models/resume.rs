//! Structured résumé schema: the single shape produced by extraction and
//! consumed by scoring and optimization.
//!
//! Wire format is camelCase JSON. Every field defaults (and `null` reads as the
//! default), so partial payloads from the builder UI or older saved drafts
//! deserialize without error and consumers can iterate unconditionally.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const TECHNICAL_GROUP_TITLE: &str = "Technical Skills";
pub const SOFT_GROUP_TITLE: &str = "Soft Skills";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredResume {
    #[serde(deserialize_with = "text")]
    pub full_name: String,
    #[serde(deserialize_with = "text")]
    pub email: String,
    #[serde(deserialize_with = "text")]
    pub phone: String,
    #[serde(deserialize_with = "text")]
    pub linkedin: String,
    #[serde(deserialize_with = "text")]
    pub github: String,
    #[serde(deserialize_with = "text")]
    pub portfolio: String,
    #[serde(deserialize_with = "text")]
    pub summary: String,
    #[serde(deserialize_with = "lenient")]
    pub skill_groups: Vec<SkillGroup>,
    /// Flattened convenience list. Older drafts carry only this one.
    #[serde(deserialize_with = "string_or_list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub technical_skills: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub soft_skills: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "lenient")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "lenient")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "lenient")]
    pub certifications: Vec<Certification>,
    #[serde(deserialize_with = "lenient")]
    pub achievements: Vec<String>,
}

/// A named cluster of comma-separated skills, e.g. `Frontend: React, CSS`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "text")]
    pub skills: String,
}

impl SkillGroup {
    /// Trimmed, non-empty entries of the comma-delimited `skills` string.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.skills.split(',').map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    #[serde(deserialize_with = "text")]
    pub company: String,
    #[serde(deserialize_with = "text")]
    pub role: String,
    #[serde(deserialize_with = "text")]
    pub duration: String,
    #[serde(deserialize_with = "text")]
    pub location: String,
    #[serde(deserialize_with = "lenient")]
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "text")]
    pub description: String,
    /// The builder UI sometimes posts this as one comma-separated string.
    #[serde(deserialize_with = "string_or_list")]
    pub tech_stack: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "text")]
    pub degree: String,
    #[serde(deserialize_with = "text")]
    pub institution: String,
    #[serde(deserialize_with = "text")]
    pub year: String,
    #[serde(deserialize_with = "text")]
    pub cgpa: String,
    #[serde(deserialize_with = "text")]
    pub location: String,
}

/// Certification entry. Legacy drafts store a bare string, read as `specialization`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CertificationRepr")]
pub struct Certification {
    pub company: String,
    pub duration: String,
    pub specialization: String,
}

impl Certification {
    pub fn named(specialization: impl Into<String>) -> Self {
        Self {
            specialization: specialization.into(),
            ..Default::default()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CertificationRepr {
    Legacy(String),
    Record {
        #[serde(default, deserialize_with = "text")]
        company: String,
        #[serde(default, deserialize_with = "text")]
        duration: String,
        #[serde(default, deserialize_with = "text")]
        specialization: String,
    },
}

impl From<CertificationRepr> for Certification {
    fn from(repr: CertificationRepr) -> Self {
        match repr {
            CertificationRepr::Legacy(specialization) => Certification::named(specialization),
            CertificationRepr::Record {
                company,
                duration,
                specialization,
            } => Certification {
                company,
                duration,
                specialization,
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Legacy → canonical migration
// ────────────────────────────────────────────────────────────────────────────

impl StructuredResume {
    /// Normalizes legacy skill shapes in place. Idempotent.
    ///
    /// 1. No non-empty `skill_groups` but `technical_skills`/`soft_skills` present
    ///    → one group per legacy list.
    /// 2. Empty flat `skills` → filled from groups and legacy lists
    ///    (case-insensitive dedup, first-seen order).
    ///
    /// Certification strings are already normalized during deserialization.
    pub fn migrate_legacy(&mut self) {
        let has_groups = self.skill_groups.iter().any(|g| g.entries().next().is_some());
        if !has_groups && (!self.technical_skills.is_empty() || !self.soft_skills.is_empty()) {
            let mut groups = Vec::new();
            if !self.technical_skills.is_empty() {
                groups.push(SkillGroup {
                    title: TECHNICAL_GROUP_TITLE.to_string(),
                    skills: self.technical_skills.join(", "),
                });
            }
            if !self.soft_skills.is_empty() {
                groups.push(SkillGroup {
                    title: SOFT_GROUP_TITLE.to_string(),
                    skills: self.soft_skills.join(", "),
                });
            }
            self.skill_groups = groups;
        }

        if self.skills.iter().all(|s| s.trim().is_empty()) {
            let candidates: Vec<String> = self
                .skill_groups
                .iter()
                .flat_map(|g| g.entries().map(str::to_string).collect::<Vec<_>>())
                .chain(self.technical_skills.iter().cloned())
                .chain(self.soft_skills.iter().cloned())
                .collect();
            self.skills = dedup_case_insensitive(candidates);
        }
    }

    /// Consuming form of [`StructuredResume::migrate_legacy`].
    pub fn migrated(mut self) -> Self {
        self.migrate_legacy();
        self
    }

    /// Every explicitly listed skill across flat, grouped and legacy fields.
    pub fn declared_skills(&self) -> impl Iterator<Item = &str> {
        self.skills
            .iter()
            .map(String::as_str)
            .chain(self.skill_groups.iter().flat_map(SkillGroup::entries))
            .chain(self.technical_skills.iter().map(String::as_str))
            .chain(self.soft_skills.iter().map(String::as_str))
    }
}

/// Drops empty entries and case-insensitive repeats, keeping first-seen order and casing.
pub fn dedup_case_insensitive<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field deserializers
//
// A field of the wrong JSON type reads as its default instead of failing the
// whole payload.
// ────────────────────────────────────────────────────────────────────────────

/// Any field type: `null` or a mistyped value reads as `T::default()`.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Strings as-is, numbers and booleans as their text, anything else empty.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// A list of strings, or one comma-separated string. Non-string list items are
/// skipped.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}
