// LLM prompt constants for the optimizer.
// Shared fragments come from llm_client::prompts.

/// System prompt for résumé optimization.
pub const OPTIMIZE_SYSTEM: &str = "You are an expert ATS resume optimizer. Return only valid JSON.";

/// Optimization prompt. Replace `{job_title}`, `{jd_text}`, `{keywords}`,
/// `{resume_json}`, `{json_only}` and `{format_rules}` before sending.
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer and ATS specialist. Optimize this resume for the following job.

JOB TITLE: {job_title}

JOB DESCRIPTION:
{jd_text}

KEYWORDS TO INCORPORATE: {keywords}

RESUME DATA (JSON):
{resume_json}

Return a JSON object with these exact keys:
- "summary": Improved professional summary (2-4 sentences) that incorporates JD keywords
- "experience": Array of experience objects, each with: company, role, duration, responsibilities (array of improved bullet points starting with strong action verbs, quantified where possible)
- "skills": Reordered skills array (JD-relevant skills first)
- "projects": Array of project objects with: title, techStack, description, achievements
- "changes": Array of strings describing what was changed (e.g. "Added 'React' to skills", "Quantified achievement in first bullet")

{json_only}

Rules:
- Use strong action verbs (developed, implemented, led, optimized, etc.)
- Add metrics/numbers where reasonable
- Incorporate missing JD keywords naturally
{format_rules}"#;
