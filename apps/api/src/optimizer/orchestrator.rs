//! Optimization Orchestrator: the composition root of the optimizer.
//!
//! Pipeline: before score → JD keywords (once) → strategy (generative if
//! configured, rule-based otherwise or on any generative failure) → after score.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::keywords::extract_jd_keywords;
use crate::analysis::scoring::calculate_ats_score;
use crate::models::resume::StructuredResume;
use crate::optimizer::generative::{GenerativeOptimizer, GenerativeRequest};
use crate::optimizer::rule_based::{optimize_with_keywords, OptimizedResume};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub resume: StructuredResume,
    pub before_score: u8,
    pub after_score: u8,
    pub changes: Vec<String>,
}

/// Shared read-only across requests.
#[derive(Clone, Default)]
pub struct Orchestrator {
    generative: Option<Arc<dyn GenerativeOptimizer>>,
}

impl Orchestrator {
    /// Orchestrator that always uses the rule-based strategy.
    pub fn rule_based() -> Self {
        Self::default()
    }

    pub fn with_generative(generative: Arc<dyn GenerativeOptimizer>) -> Self {
        Self {
            generative: Some(generative),
        }
    }

    pub fn has_generative(&self) -> bool {
        self.generative.is_some()
    }

    /// Scores, optimizes and re-scores `resume` against `jd_text`. Never fails:
    /// generative errors fall back to the rule-based rewrite.
    pub async fn optimize(
        &self,
        resume: &StructuredResume,
        jd_text: &str,
        job_title: &str,
    ) -> OptimizationResult {
        let before_score = calculate_ats_score(resume, jd_text);
        let keywords = extract_jd_keywords(jd_text);

        let optimized = match &self.generative {
            Some(generative) => {
                let request = GenerativeRequest {
                    resume,
                    jd_text,
                    job_title,
                    keywords: &keywords,
                };
                match generative.optimize(request).await {
                    Ok(optimized) => optimized,
                    Err(e) => {
                        warn!("Generative optimization failed, using rule-based: {e}");
                        optimize_with_keywords(resume, &keywords)
                    }
                }
            }
            None => optimize_with_keywords(resume, &keywords),
        };

        let OptimizedResume { resume, changes } = optimized;
        let after_score = calculate_ats_score(&resume, jd_text);

        info!(
            "Optimization complete: score {} → {} ({} changes)",
            before_score,
            after_score,
            changes.len()
        );

        OptimizationResult {
            resume,
            before_score,
            after_score,
            changes,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::generative::{GenerativeError, DEFAULT_AI_CHANGE};
    use crate::optimizer::rule_based::rule_based_optimize;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SCENARIO_JD: &str =
        "Looking for a React developer with Node.js and AWS experience. Must have: Docker, CI/CD.";

    fn scenario_resume() -> StructuredResume {
        StructuredResume {
            skills: vec!["JavaScript".to_string()],
            ..Default::default()
        }
    }

    /// Backend that replays a fixed outcome and counts calls.
    struct StubGenerative {
        outcome: fn(&StructuredResume) -> Result<OptimizedResume, GenerativeError>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GenerativeOptimizer for StubGenerative {
        async fn optimize(
            &self,
            request: GenerativeRequest<'_>,
        ) -> Result<OptimizedResume, GenerativeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)(request.resume)
        }
    }

    fn stub(
        outcome: fn(&StructuredResume) -> Result<OptimizedResume, GenerativeError>,
    ) -> Arc<StubGenerative> {
        Arc::new(StubGenerative {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_rule_based_path_matches_direct_call() {
        let orchestrator = Orchestrator::rule_based();
        assert!(!orchestrator.has_generative());

        let resume = scenario_resume();
        let result = orchestrator.optimize(&resume, SCENARIO_JD, "").await;
        let direct = rule_based_optimize(&resume, SCENARIO_JD);

        assert_eq!(result.resume, direct.resume);
        assert_eq!(result.changes, direct.changes);
        assert!(result.changes.contains(&"Added missing skill: Docker".to_string()));
        assert!(result.after_score >= result.before_score);
        assert!(result.before_score < 50);
    }

    #[tokio::test]
    async fn test_generative_success_is_used() {
        let backend = stub(|resume| {
            let mut resume = resume.clone();
            resume.skills = vec!["React".to_string(), "Docker".to_string()];
            Ok(OptimizedResume {
                resume,
                changes: vec![DEFAULT_AI_CHANGE.to_string()],
            })
        });
        let orchestrator = Orchestrator::with_generative(backend.clone());

        let result = orchestrator.optimize(&scenario_resume(), SCENARIO_JD, "Dev").await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.resume.skills, vec!["React", "Docker"]);
        assert_eq!(result.changes, vec![DEFAULT_AI_CHANGE]);
        assert_eq!(result.after_score, calculate_ats_score(&result.resume, SCENARIO_JD));
    }

    #[tokio::test]
    async fn test_generative_failure_falls_back_to_rules() {
        let backend = stub(|_| Err(GenerativeError::Malformed));
        let orchestrator = Orchestrator::with_generative(backend.clone());
        let resume = scenario_resume();

        let result = orchestrator.optimize(&resume, SCENARIO_JD, "").await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.changes, rule_based_optimize(&resume, SCENARIO_JD).changes);
        assert!(result.changes.contains(&"Added missing skill: Docker".to_string()));
    }

    #[tokio::test]
    async fn test_input_resume_is_not_mutated() {
        let orchestrator = Orchestrator::rule_based();
        let resume = scenario_resume();
        let snapshot = resume.clone();
        let _ = orchestrator.optimize(&resume, SCENARIO_JD, "").await;
        assert_eq!(resume, snapshot);
    }

    #[tokio::test]
    async fn test_empty_jd_scores_neutral() {
        let result = Orchestrator::rule_based()
            .optimize(&scenario_resume(), "", "")
            .await;
        assert_eq!(result.before_score, 75);
        assert_eq!(result.after_score, 75);
    }

    #[tokio::test]
    async fn test_legacy_certifications_optimize() {
        let resume: StructuredResume = serde_json::from_value(json!({
            "skills": ["React"],
            "certifications": ["AWS Certified Developer"]
        }))
        .unwrap();
        let result = Orchestrator::rule_based()
            .optimize(&resume, SCENARIO_JD, "")
            .await;
        assert_eq!(
            result.resume.certifications[0].specialization,
            "AWS Certified Developer"
        );
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = OptimizationResult {
            resume: StructuredResume::default(),
            before_score: 10,
            after_score: 40,
            changes: vec![],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["beforeScore"], 10);
        assert_eq!(value["afterScore"], 40);
        assert!(value["resume"].is_object());
    }
}
