//! Rule-Based Optimizer: deterministic résumé rewrite used when no generative
//! backend is configured or the backend fails.
//!
//! Steps (each appends to the change log in order):
//! 1. stable-partition `skills` so JD-matching skills come first
//! 2. prepend JD skills the résumé does not yet cover
//! 3. prefix weak experience bullets with an action verb
//!
//! Always works on a copy; the caller's résumé is never touched.

use serde::Serialize;
use tracing::debug;

use crate::analysis::keywords::{extract_jd_keywords, JdKeywordSet};
use crate::analysis::patterns::DEFAULT_ACTION_VERBS;
use crate::analysis::scoring::terms_overlap;
use crate::models::resume::StructuredResume;

pub const REORDERED_SKILLS: &str = "Reordered skills to prioritize JD keywords";

/// Bullets this short (in chars) are left alone.
const MIN_REWRITE_CHARS: usize = 10;

/// A rewritten résumé and the ordered log of what changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedResume {
    pub resume: StructuredResume,
    pub changes: Vec<String>,
}

pub fn rule_based_optimize(resume: &StructuredResume, jd_text: &str) -> OptimizedResume {
    optimize_with_keywords(resume, &extract_jd_keywords(jd_text))
}

/// Same as [`rule_based_optimize`] with keywords the caller already extracted.
pub fn optimize_with_keywords(resume: &StructuredResume, jd: &JdKeywordSet) -> OptimizedResume {
    let mut result = resume.clone();
    let mut changes = Vec::new();

    let jd_skills: Vec<String> = jd.skills.iter().map(str::to_lowercase).collect();

    // 1. JD-relevant skills first
    if !result.skills.is_empty() && !jd_skills.is_empty() {
        let (mut sorted, rest): (Vec<String>, Vec<String>) = result
            .skills
            .iter()
            .cloned()
            .partition(|skill| matches_any(skill, &jd_skills));
        sorted.extend(rest);

        if result.technical_skills.is_empty() {
            result.technical_skills = sorted.clone();
        }
        result.skills = sorted;
        changes.push(REORDERED_SKILLS.to_string());
    }

    // 2. missing JD skills, presence set grows as skills are added
    let mut present: Vec<String> = result
        .skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    for skill in jd.skills.iter() {
        let lowered = skill.to_lowercase();
        if !present.iter().any(|p| terms_overlap(p, &lowered)) {
            result.skills.insert(0, skill.to_string());
            present.push(lowered);
            changes.push(format!("Added missing skill: {skill}"));
        }
    }

    // 3. action verbs on weak bullets
    let verbs: Vec<&str> = if jd.action_verbs.is_empty() {
        DEFAULT_ACTION_VERBS.to_vec()
    } else {
        jd.action_verbs.iter().collect()
    };
    for exp in &mut result.experience {
        for (index, bullet) in exp.responsibilities.iter_mut().enumerate() {
            let lowered = bullet.to_lowercase();
            if verbs.iter().any(|v| lowered.starts_with(v))
                || bullet.chars().count() <= MIN_REWRITE_CHARS
            {
                continue;
            }
            if let Some(rewritten) = prefix_action_verb(bullet, verbs[index % verbs.len()]) {
                *bullet = rewritten;
                changes.push(format!("Improved bullet in {}: added action verb", exp.company));
            }
        }
    }

    debug!("Rule-based optimization produced {} changes", changes.len());

    OptimizedResume {
        resume: result,
        changes,
    }
}

/// True when `skill` overlaps any lower-cased JD skill. Blank skills never match.
fn matches_any(skill: &str, jd_skills: &[String]) -> bool {
    let lowered = skill.trim().to_lowercase();
    !lowered.is_empty() && jd_skills.iter().any(|j| terms_overlap(&lowered, j))
}

/// "Responsible for the billing API" + "developed" →
/// "Developed Responsible for the billing API". Leading punctuation is dropped;
/// the rest of the bullet keeps its case. `None` when the bullet has no words.
fn prefix_action_verb(bullet: &str, verb: &str) -> Option<String> {
    let start = bullet.find(|c: char| c.is_alphanumeric() || c == '_')?;

    let mut verb_chars = verb.chars();
    let capitalized: String = verb_chars
        .next()
        .map(|first| first.to_uppercase().chain(verb_chars).collect())
        .unwrap_or_default();

    Some(format!("{capitalized} {}", &bullet[start..]))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scoring::calculate_ats_score;
    use crate::models::resume::{Experience, SkillGroup};
    use serde_json::json;

    const SCENARIO_JD: &str =
        "Looking for a React developer with Node.js and AWS experience. Must have: Docker, CI/CD.";

    fn resume_with_skills(skills: &[&str]) -> StructuredResume {
        StructuredResume {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_scenario_adds_missing_docker() {
        let resume = resume_with_skills(&["JavaScript"]);
        let out = rule_based_optimize(&resume, SCENARIO_JD);

        assert!(out.resume.skills.iter().any(|s| s == "Docker"));
        assert!(out.changes.contains(&"Added missing skill: Docker".to_string()));
        assert_eq!(out.changes[0], REORDERED_SKILLS);
    }

    #[test]
    fn test_scenario_score_does_not_drop() {
        let resume = resume_with_skills(&["JavaScript"]);
        let before = calculate_ats_score(&resume, SCENARIO_JD);
        let out = rule_based_optimize(&resume, SCENARIO_JD);
        let after = calculate_ats_score(&out.resume, SCENARIO_JD);
        assert!(after >= before, "after {after} < before {before}");
        assert!(after > before);
    }

    #[test]
    fn test_input_is_never_mutated() {
        let resume = StructuredResume {
            skills: vec!["JavaScript".to_string()],
            experience: vec![Experience {
                company: "Acme".to_string(),
                responsibilities: vec!["responsible for the billing pipeline".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        };
        let snapshot = resume.clone();
        let out = rule_based_optimize(&resume, SCENARIO_JD);
        assert_eq!(resume, snapshot);
        assert_ne!(out.resume, snapshot);
    }

    #[test]
    fn test_missing_skills_are_prepended_in_jd_order() {
        let out = rule_based_optimize(&resume_with_skills(&["Python"]), "We use Docker and Kubernetes");
        assert_eq!(out.resume.skills, vec!["Kubernetes", "Docker", "Python"]);
        assert_eq!(
            out.changes,
            vec![
                REORDERED_SKILLS,
                "Added missing skill: Docker",
                "Added missing skill: Kubernetes",
            ]
        );
    }

    #[test]
    fn test_reorder_is_stable_and_fills_technical_skills() {
        let resume = resume_with_skills(&["Excel", "Docker", "Figma", "React"]);
        let out = rule_based_optimize(&resume, "React and Docker shop");
        assert_eq!(out.resume.skills, vec!["Docker", "React", "Excel", "Figma"]);
        assert_eq!(out.resume.technical_skills, out.resume.skills);
    }

    #[test]
    fn test_existing_technical_skills_are_kept() {
        let resume = StructuredResume {
            skills: vec!["Docker".to_string()],
            technical_skills: vec!["Terraform".to_string()],
            ..Default::default()
        };
        let out = rule_based_optimize(&resume, "Docker");
        assert_eq!(out.resume.technical_skills, vec!["Terraform"]);
    }

    #[test]
    fn test_substring_presence_counts_as_covered() {
        // "js" is covered by "node.js"
        let out = rule_based_optimize(&resume_with_skills(&["Node.js"]), "Strong JS skills");
        assert!(!out.changes.iter().any(|c| c.starts_with("Added missing skill")));
    }

    #[test]
    fn test_empty_skills_get_jd_skills_without_reorder() {
        let out = rule_based_optimize(&StructuredResume::default(), "Docker");
        assert_eq!(out.resume.skills, vec!["Docker"]);
        assert_eq!(out.changes, vec!["Added missing skill: Docker"]);
    }

    #[test]
    fn test_blank_skill_entries_do_not_block_additions() {
        let out = rule_based_optimize(&resume_with_skills(&["", " "]), "Docker");
        assert_eq!(out.resume.skills[0], "Docker");
    }

    #[test]
    fn test_bullets_get_cycled_default_verbs() {
        let resume = StructuredResume {
            experience: vec![Experience {
                company: "Acme".to_string(),
                responsibilities: vec![
                    "- worked on the checkout flow".to_string(),
                    "Developed the payments SDK".to_string(),
                    "on-call for the search cluster".to_string(),
                    "short one".to_string(),
                ],
                ..Default::default()
            }],
            ..Default::default()
        };
        let out = rule_based_optimize(&resume, "");
        let bullets = &out.resume.experience[0].responsibilities;
        assert_eq!(bullets[0], "Developed worked on the checkout flow");
        assert_eq!(bullets[1], "Developed the payments SDK");
        assert_eq!(bullets[2], "Led on-call for the search cluster");
        assert_eq!(bullets[3], "short one");
        assert_eq!(
            out.changes,
            vec![
                "Improved bullet in Acme: added action verb",
                "Improved bullet in Acme: added action verb",
            ]
        );
    }

    #[test]
    fn test_bullets_use_jd_action_verbs() {
        let resume = StructuredResume {
            experience: vec![Experience {
                company: "Globex".to_string(),
                responsibilities: vec!["Owned the ledger rewrite".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        };
        let out = rule_based_optimize(&resume, "You have automated releases and deployed services.");
        assert_eq!(
            out.resume.experience[0].responsibilities[0],
            "Automated Owned the ledger rewrite"
        );
    }

    #[test]
    fn test_prefix_keeps_bullet_casing() {
        assert_eq!(
            prefix_action_verb("API gateway for partners", "built").as_deref(),
            Some("Built API gateway for partners")
        );
        assert_eq!(
            prefix_action_verb("- Python scripts for nightly ETL", "developed").as_deref(),
            Some("Developed Python scripts for nightly ETL")
        );
        assert_eq!(prefix_action_verb("•••", "led"), None);
    }

    #[test]
    fn test_proper_noun_bullets_keep_casing() {
        let resume = StructuredResume {
            experience: vec![Experience {
                company: "Acme".to_string(),
                responsibilities: vec![
                    "Python scripts for nightly ETL".to_string(),
                    "Kubernetes cluster upgrades".to_string(),
                ],
                ..Default::default()
            }],
            ..Default::default()
        };
        let out = rule_based_optimize(&resume, "");
        assert_eq!(
            out.resume.experience[0].responsibilities,
            vec![
                "Developed Python scripts for nightly ETL",
                "Implemented Kubernetes cluster upgrades",
            ]
        );
    }

    #[test]
    fn test_legacy_certifications_optimize_without_error() {
        let resume: StructuredResume = serde_json::from_value(json!({
            "skills": ["React"],
            "certifications": ["AWS Certified Developer", {"specialization": "CKA"}]
        }))
        .unwrap();
        let out = rule_based_optimize(&resume, SCENARIO_JD);
        assert_eq!(out.resume.certifications, resume.certifications);
    }

    #[test]
    fn test_skill_groups_survive_untouched() {
        let resume = StructuredResume {
            skill_groups: vec![SkillGroup {
                title: "Frontend".to_string(),
                skills: "React".to_string(),
            }],
            ..Default::default()
        }
        .migrated();
        let out = rule_based_optimize(&resume, SCENARIO_JD);
        assert_eq!(out.resume.skill_groups, resume.skill_groups);
        assert_eq!(out.resume.skills.last().map(String::as_str), Some("React"));
    }
}
