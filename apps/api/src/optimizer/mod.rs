// Résumé optimization: rule-based rewrite, optional generative backend, and
// the orchestrator that scores before/after and picks the strategy.
// All LLM calls go through llm_client.

pub mod generative;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod rule_based;
