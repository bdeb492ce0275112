// LLM prompt constants for the screening module.
//
// The score marker and the four section labels in this template are a contract
// with `parser` — both sides must agree on the same literals, so the template
// is rendered from `SCORE_MARKER` and `Section::label()` rather than repeating
// them inline.

use crate::screening::parser::{Section, SCORE_MARKER};

/// Evaluation prompt template. Placeholders: `{job_description}`, `{resume_text}`.
/// Both are embedded verbatim — no escaping, no truncation. Very large inputs
/// are the caller's concern.
const EVALUATION_PROMPT_TEMPLATE: &str = r#"Analyze this resume against the job description and provide:
1. A precise match percentage between 0-100% (just the number)
2. Detailed feedback on:
   - Skills match (what skills match and which are missing)
   - Experience relevance (how experience aligns with requirements)
   - Project alignment (relevant projects)
   - Missing qualifications (what's lacking)

Format your response like this:
{score_marker} XX%
{skills}: [analysis]
{experience}: [analysis]
{projects}: [analysis]
{missing}: [analysis]

Job Description: {job_description}
Resume Text: {resume_text}"#;

/// Renders the evaluation prompt for one resume / job-description pair.
/// Deterministic: same inputs, same prompt.
pub fn build_evaluation_prompt(resume_text: &str, job_description: &str) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replace("{score_marker}", SCORE_MARKER)
        .replace("{skills}", Section::Skills.label())
        .replace("{experience}", Section::Experience.label())
        .replace("{projects}", Section::Projects.label())
        .replace("{missing}", Section::MissingQualifications.label())
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_evaluation_prompt("resume", "jd");
        let b = build_evaluation_prompt("resume", "jd");
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_embeds_inputs_verbatim() {
        let prompt = build_evaluation_prompt("10 years of Rust & C++", "Senior <Engineer>");
        assert!(prompt.contains("Resume Text: 10 years of Rust & C++"));
        assert!(prompt.contains("Job Description: Senior <Engineer>"));
    }

    #[test]
    fn test_prompt_carries_the_parser_contract() {
        let prompt = build_evaluation_prompt("", "");
        assert!(prompt.contains(SCORE_MARKER));
        for section in Section::ALL {
            assert!(
                prompt.contains(&format!("{}:", section.label())),
                "missing label {}",
                section.label()
            );
        }
        assert!(!prompt.contains("{score_marker}"));
        assert!(!prompt.contains("{skills}"));
    }
}
