// All LLM prompt constants for the Optimizer module.

/// System prompt for resume optimization — enforces JSON-only output with
/// LaTeX commands escaped for JSON transport.
pub const OPTIMIZE_SYSTEM: &str = "You are an ATS resume expert. \
    ALWAYS return clean JSON with properly escaped LaTeX (double backslashes). \
    Never use markdown code blocks. \
    Do NOT include any text outside the JSON object.";

/// Optimization prompt template.
/// Replace `{job_description}` and `{latex_code}` before sending.
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"You are an expert ATS resume optimizer. Analyze the job description and enhance the LaTeX resume.

JOB DESCRIPTION:
{job_description}

RESUME TO OPTIMIZE:
{latex_code}

TASKS:
1. Add exact keywords from the job description naturally into existing bullet points
2. Keep ALL LaTeX structure perfect (commands, braces, sections)
3. Maintain original formatting and layout
4. Return 3-5 actionable improvement suggestions

OUTPUT ONLY VALID JSON (no markdown):
{
  "keywords_added": ["Django", "PostgreSQL", "REST API"],
  "modified_latex": "COMPLETE LaTeX code with \\textbf, \\section etc",
  "match_score": 87,
  "suggestions": ["Quantify achievements with numbers", "Add more action verbs", "Include GitHub link"]
}

CRITICAL: Use double backslashes \\ for ALL LaTeX commands."#;

/// Builds the final user prompt from the template.
pub fn build_optimize_prompt(latex_code: &str, job_description: &str) -> String {
    OPTIMIZE_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{latex_code}", latex_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_both_inputs() {
        let prompt = build_optimize_prompt("\\section*{Skills}", "Looking for Rust");
        assert!(prompt.contains("\\section*{Skills}"));
        assert!(prompt.contains("Looking for Rust"));
        assert!(!prompt.contains("{latex_code}"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[test]
    fn test_system_prompt_forbids_markdown() {
        assert!(OPTIMIZE_SYSTEM.contains("Never use markdown code blocks"));
    }
}
