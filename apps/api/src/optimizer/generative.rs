//! Generative optimization: pluggable, trait-based backend that asks a model
//! to rewrite the résumé.
//!
//! Default backend: `LlmOptimizer` over any `ChatCompletion` client.
//! The orchestrator holds an `Option<Arc<dyn GenerativeOptimizer>>` and never
//! names a concrete backend.
//!
//! The model's reply is overlaid onto a copy of the input, so fields the model
//! does not return (contact data, education, certifications) survive.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::analysis::keywords::{extract_job_title, JdKeywordSet};
use crate::llm_client::prompts::{ATS_FORMAT_RULES, JSON_ONLY_SYSTEM};
use crate::llm_client::{extract_json_payload, ChatCompletion, LlmError};
use crate::models::resume::{Experience, Project, StructuredResume};
use crate::optimizer::prompts::{OPTIMIZE_PROMPT_TEMPLATE, OPTIMIZE_SYSTEM};
use crate::optimizer::rule_based::OptimizedResume;

pub const DEFAULT_AI_CHANGE: &str = "AI-powered optimization applied";

#[derive(Debug, Error)]
pub enum GenerativeError {
    #[error("generative backend failed: {0}")]
    Backend(#[from] LlmError),

    #[error("reply is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("reply has none of summary, experience, skills, projects")]
    Malformed,

    #[error("failed to serialize résumé for the prompt: {0}")]
    Prompt(String),
}

/// Everything a backend needs for one optimization.
#[derive(Debug, Clone, Copy)]
pub struct GenerativeRequest<'a> {
    pub resume: &'a StructuredResume,
    pub jd_text: &'a str,
    pub job_title: &'a str,
    pub keywords: &'a JdKeywordSet,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap generative backends without touching the
/// orchestrator or handlers.
#[async_trait]
pub trait GenerativeOptimizer: Send + Sync {
    async fn optimize(
        &self,
        request: GenerativeRequest<'_>,
    ) -> Result<OptimizedResume, GenerativeError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmOptimizer
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmOptimizer {
    chat: Arc<dyn ChatCompletion>,
}

impl LlmOptimizer {
    pub fn new(chat: Arc<dyn ChatCompletion>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl GenerativeOptimizer for LlmOptimizer {
    async fn optimize(
        &self,
        request: GenerativeRequest<'_>,
    ) -> Result<OptimizedResume, GenerativeError> {
        let prompt = build_optimization_prompt(request)?;
        let reply = self.chat.complete_chat(OPTIMIZE_SYSTEM, &prompt).await?;
        debug!("Generative reply: {} characters", reply.len());
        parse_generative_reply(&reply, request.resume)
    }
}

/// Fills the optimization template. An empty job title falls back to the
/// first line of the JD.
pub fn build_optimization_prompt(request: GenerativeRequest<'_>) -> Result<String, GenerativeError> {
    let resume_json = serde_json::to_string_pretty(request.resume)
        .map_err(|e| GenerativeError::Prompt(e.to_string()))?;

    let job_title = match request.job_title.trim() {
        "" => extract_job_title(request.jd_text),
        title => title.to_string(),
    };

    let keywords = request.keywords.skills.iter().collect::<Vec<_>>().join(", ");

    Ok(OPTIMIZE_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_SYSTEM)
        .replace("{format_rules}", ATS_FORMAT_RULES)
        .replace("{job_title}", &job_title)
        .replace("{keywords}", &keywords)
        .replace("{jd_text}", request.jd_text)
        .replace("{resume_json}", &resume_json))
}

// ────────────────────────────────────────────────────────────────────────────
// Reply parsing
// ────────────────────────────────────────────────────────────────────────────

/// The subset of résumé fields a model may return.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerativePatch {
    summary: Option<String>,
    experience: Option<Vec<Experience>>,
    skills: Option<Vec<String>>,
    projects: Option<Vec<Project>>,
    changes: Option<Vec<String>>,
}

impl GenerativePatch {
    fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.experience.is_none()
            && self.skills.is_none()
            && self.projects.is_none()
    }
}

/// Parses model output and overlays it onto a copy of `base`.
///
/// The payload is the first fenced code block, else the first `{...}` span.
/// It must be a JSON object carrying at least one of summary, experience,
/// skills or projects. Missing `changes` defaults to one generic entry.
pub fn parse_generative_reply(
    reply: &str,
    base: &StructuredResume,
) -> Result<OptimizedResume, GenerativeError> {
    let value: Value = serde_json::from_str(extract_json_payload(reply))?;
    if !value.is_object() {
        return Err(GenerativeError::Malformed);
    }

    let patch: GenerativePatch = serde_json::from_value(value)?;
    if patch.is_empty() {
        return Err(GenerativeError::Malformed);
    }

    let mut resume = base.clone();
    if let Some(summary) = patch.summary {
        resume.summary = summary;
    }
    if let Some(experience) = patch.experience {
        resume.experience = experience;
    }
    if let Some(skills) = patch.skills {
        resume.skills = skills;
    }
    if let Some(projects) = patch.projects {
        resume.projects = projects;
    }

    Ok(OptimizedResume {
        resume,
        changes: patch
            .changes
            .unwrap_or_else(|| vec![DEFAULT_AI_CHANGE.to_string()]),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::keywords::extract_jd_keywords;
    use crate::models::resume::Certification;
    use std::sync::Mutex;

    const JD: &str = "Senior Frontend Engineer\nWe need React and TypeScript experience.";

    fn base_resume() -> StructuredResume {
        StructuredResume {
            full_name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            summary: "Engineer.".to_string(),
            skills: vec!["JavaScript".to_string()],
            certifications: vec![Certification::named("AWS Certified")],
            ..Default::default()
        }
    }

    /// Returns a canned reply and records the prompt it was given.
    struct CannedChat {
        reply: Result<String, u16>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedChat {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatCompletion for CannedChat {
        async fn complete_chat(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(|status| LlmError::Api {
                status,
                message: "boom".to_string(),
            })
        }
    }

    #[test]
    fn test_parse_overlays_returned_fields() {
        let reply = r#"```json
{"summary": "Frontend engineer shipping React apps.", "skills": ["React", "JavaScript"], "changes": ["Rewrote summary"]}
```"#;
        let out = parse_generative_reply(reply, &base_resume()).unwrap();
        assert_eq!(out.resume.summary, "Frontend engineer shipping React apps.");
        assert_eq!(out.resume.skills, vec!["React", "JavaScript"]);
        assert_eq!(out.resume.full_name, "Jane Doe");
        assert_eq!(out.resume.certifications, vec![Certification::named("AWS Certified")]);
        assert_eq!(out.changes, vec!["Rewrote summary"]);
    }

    #[test]
    fn test_parse_defaults_changes() {
        let out = parse_generative_reply(r#"{"summary": "Better."}"#, &base_resume()).unwrap();
        assert_eq!(out.changes, vec![DEFAULT_AI_CHANGE]);
    }

    #[test]
    fn test_parse_accepts_object_inside_prose() {
        let reply = r#"Here is the result: {"experience": [{"company": "Acme", "responsibilities": ["Led X"]}]} Done."#;
        let out = parse_generative_reply(reply, &base_resume()).unwrap();
        assert_eq!(out.resume.experience[0].company, "Acme");
        assert_eq!(out.resume.experience[0].role, "");
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = parse_generative_reply("I cannot help with that.", &base_resume()).unwrap_err();
        assert!(matches!(err, GenerativeError::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        let err = parse_generative_reply(r#"{"foo": 1}"#, &base_resume()).unwrap_err();
        assert!(matches!(err, GenerativeError::Malformed));

        let err = parse_generative_reply("```\n[1, 2]\n```", &base_resume()).unwrap_err();
        assert!(matches!(err, GenerativeError::Malformed));
    }

    #[test]
    fn test_parse_rejects_mistyped_fields() {
        let err = parse_generative_reply(r#"{"skills": 42}"#, &base_resume()).unwrap_err();
        assert!(matches!(err, GenerativeError::Parse(_)));
    }

    #[test]
    fn test_prompt_uses_first_jd_line_when_title_missing() {
        let keywords = extract_jd_keywords(JD);
        let resume = base_resume();
        let prompt = build_optimization_prompt(GenerativeRequest {
            resume: &resume,
            jd_text: JD,
            job_title: "  ",
            keywords: &keywords,
        })
        .unwrap();
        assert!(prompt.contains("JOB TITLE: Senior Frontend Engineer"));
        assert!(prompt.contains("KEYWORDS TO INCORPORATE: TypeScript, React"));
        assert!(prompt.contains("\"fullName\": \"Jane Doe\""));
        assert!(!prompt.contains("{resume_json}"));
    }

    #[tokio::test]
    async fn test_llm_optimizer_round_trip() {
        let chat = Arc::new(CannedChat::replying(r#"{"summary": "Sharper summary."}"#));
        let optimizer = LlmOptimizer::new(chat.clone());
        let keywords = extract_jd_keywords(JD);
        let resume = base_resume();

        let out = optimizer
            .optimize(GenerativeRequest {
                resume: &resume,
                jd_text: JD,
                job_title: "Frontend Lead",
                keywords: &keywords,
            })
            .await
            .unwrap();

        assert_eq!(out.resume.summary, "Sharper summary.");
        let prompts = chat.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("JOB TITLE: Frontend Lead"));
    }

    #[tokio::test]
    async fn test_llm_optimizer_surfaces_backend_error_without_retry() {
        let chat = Arc::new(CannedChat::failing(529));
        let optimizer = LlmOptimizer::new(chat.clone());
        let keywords = JdKeywordSet::default();
        let resume = base_resume();

        let err = optimizer
            .optimize(GenerativeRequest {
                resume: &resume,
                jd_text: JD,
                job_title: "",
                keywords: &keywords,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, GenerativeError::Backend(LlmError::Api { status: 529, .. })));
        assert_eq!(chat.prompts.lock().unwrap().len(), 1);
    }
}
