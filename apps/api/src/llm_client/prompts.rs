// Cross-cutting prompt fragments. Feature modules keep their own prompts.rs
// and pull shared pieces from here.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// ATS formatting rules shared by every résumé-writing prompt.
pub const ATS_FORMAT_RULES: &str = "\
- Keep ATS-friendly: no tables, standard headings
- Single column format compatible
- Preserve all original information, just improve presentation";
