// JD analysis and ATS scoring. Pure pattern matching, no LLM calls.

pub mod handlers;
pub mod keywords;
pub mod patterns;
pub mod scoring;
