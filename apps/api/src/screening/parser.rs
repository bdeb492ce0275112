//! Reply parser — turns the model's free-text reply into a `MatchReport`.
//!
//! The upstream text is natural language with no format guarantee, so this
//! parser is total: malformed input degrades to a best-effort, partially-empty
//! report instead of failing.

use serde::{Deserialize, Serialize};

/// Line marker the score is read from. Shared contract with
/// `prompts::EVALUATION_PROMPT_TEMPLATE` — change both together.
pub const SCORE_MARKER: &str = "Match Score:";

/// The four feedback sections, in declaration order. The order matters:
/// when a line contains more than one label, the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Skills,
    Experience,
    Projects,
    MissingQualifications,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Skills,
        Section::Experience,
        Section::Projects,
        Section::MissingQualifications,
    ];

    /// The literal label as it appears in model output. Shared contract with
    /// the prompt template.
    pub fn label(self) -> &'static str {
        match self {
            Section::Skills => "Skills",
            Section::Experience => "Experience",
            Section::Projects => "Projects",
            Section::MissingQualifications => "Missing Qualifications",
        }
    }
}

/// Accumulated feedback text per section. Untouched sections stay empty —
/// placeholder strings are the presentation layer's call, not ours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionFeedback {
    pub skills: String,
    pub experience: String,
    pub projects: String,
    pub missing_qualifications: String,
}

impl SectionFeedback {
    fn get_mut(&mut self, section: Section) -> &mut String {
        match section {
            Section::Skills => &mut self.skills,
            Section::Experience => &mut self.experience,
            Section::Projects => &mut self.projects,
            Section::MissingQualifications => &mut self.missing_qualifications,
        }
    }
}

/// Full evaluation report for one resume against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// 0–100, always clamped.
    pub match_score: u32,
    pub sections: SectionFeedback,
    /// Set only when the backend failed and the pipeline degraded the result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl MatchReport {
    /// Report returned when the LLM backend fails: score zero, empty sections,
    /// and a diagnostic explaining why.
    pub fn degraded(diagnostic: String) -> Self {
        MatchReport {
            match_score: 0,
            sections: SectionFeedback::default(),
            diagnostic: Some(diagnostic),
        }
    }
}

/// Section segmentation state: outside any section, or accumulating into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentState {
    NoSection,
    Inside(Section),
}

/// Parses a raw model reply. Pure and total: identical input always yields an
/// identical report, and no input is an error.
pub fn parse_reply(raw_reply: &str) -> MatchReport {
    MatchReport {
        match_score: extract_score(raw_reply),
        sections: segment_sections(raw_reply),
        diagnostic: None,
    }
}

/// Finds the first `Match Score:` line and concatenates every digit after the
/// first colon into one integer, clamped to [0, 100].
///
/// Deliberately reproduces the legacy heuristic: "95%" → 95, but "8 out of
/// 100" → 8100 → 100. See DESIGN.md before tightening this.
fn extract_score(raw_reply: &str) -> u32 {
    for line in raw_reply.lines() {
        if !line.contains(SCORE_MARKER) {
            continue;
        }
        let after_colon = line.splitn(2, ':').nth(1).unwrap_or("");
        let digits: String = after_colon
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            return 0;
        }
        // A digit run too long for u64 is far past the clamp anyway.
        return digits.parse::<u64>().map(|n| n.min(100)).unwrap_or(100) as u32;
    }
    0
}

/// Scans the reply line by line, switching sections whenever a line contains a
/// section label as a substring. Lines before the first label are discarded;
/// non-empty lines inside a section accumulate with a trailing newline.
///
/// Substring matching is intentional tolerance for loosely formatted model
/// output: "Here is the Skills breakdown" starts the Skills section.
fn segment_sections(raw_reply: &str) -> SectionFeedback {
    let mut feedback = SectionFeedback::default();
    let mut state = SegmentState::NoSection;

    for raw_line in raw_reply.lines() {
        let mut line = raw_line.trim().to_string();

        if let Some(section) = Section::ALL
            .iter()
            .copied()
            .find(|s| line.contains(s.label()))
        {
            state = SegmentState::Inside(section);
            line = line
                .replace(&format!("{}:", section.label()), "")
                .trim()
                .to_string();
        }

        if let SegmentState::Inside(section) = state {
            if !line.is_empty() {
                let buf = feedback.get_mut(section);
                buf.push_str(&line);
                buf.push('\n');
            }
        }
    }

    feedback
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "Match Score: 88%\n\
        Skills: matches\n\
        Experience: matches\n\
        Projects: none\n\
        Missing Qualifications: none";

    #[test]
    fn test_score_simple_percentage() {
        for s in [0u32, 1, 42, 95, 100] {
            let reply = format!("Match Score: {s}%\nSkills: fine");
            assert_eq!(parse_reply(&reply).match_score, s, "score {s}");
        }
    }

    #[test]
    fn test_score_above_100_clamps() {
        assert_eq!(parse_reply("Match Score: 250%").match_score, 100);
    }

    #[test]
    fn test_score_digit_concatenation_is_legacy() {
        // "8 out of 100" concatenates to 8100, which clamps to 100.
        assert_eq!(parse_reply("Match Score: 8 out of 100").match_score, 100);
    }

    #[test]
    fn test_score_missing_marker_defaults_to_zero() {
        assert_eq!(parse_reply("Skills: Python").match_score, 0);
    }

    #[test]
    fn test_score_marker_with_no_digits_defaults_to_zero() {
        assert_eq!(parse_reply("Match Score: unknown").match_score, 0);
    }

    #[test]
    fn test_score_uses_first_marker_line_only() {
        let reply = "Match Score: 40%\nsome text\nMatch Score: 90%";
        assert_eq!(parse_reply(reply).match_score, 40);
    }

    #[test]
    fn test_score_huge_digit_run_clamps() {
        assert_eq!(
            parse_reply("Match Score: 99999999999999999999999%").match_score,
            100
        );
    }

    #[test]
    fn test_all_four_sections_segment() {
        let reply = "Skills: Python, Go\nExperience: 5 years\nProjects: none\nMissing Qualifications: cloud certs";
        let report = parse_reply(reply);
        assert_eq!(report.sections.skills.trim(), "Python, Go");
        assert_eq!(report.sections.experience.trim(), "5 years");
        assert_eq!(report.sections.projects.trim(), "none");
        assert_eq!(report.sections.missing_qualifications.trim(), "cloud certs");
    }

    #[test]
    fn test_stored_sections_keep_trailing_newline() {
        let report = parse_reply("Skills: Python");
        assert_eq!(report.sections.skills, "Python\n");
    }

    #[test]
    fn test_reordered_sections_segment_by_appearance() {
        let reply = "Experience: senior roles\nSkills: Rust";
        let report = parse_reply(reply);
        assert_eq!(report.sections.experience.trim(), "senior roles");
        assert_eq!(report.sections.skills.trim(), "Rust");
    }

    #[test]
    fn test_multiline_section_accumulates() {
        let reply = "Skills: Rust\nasync experience\n\nExperience: 3 years";
        let report = parse_reply(reply);
        assert_eq!(report.sections.skills, "Rust\nasync experience\n");
        assert_eq!(report.sections.experience.trim(), "3 years");
    }

    #[test]
    fn test_lines_before_first_label_are_discarded() {
        let reply = "Here is my analysis of the candidate.\nSkills: Python";
        let report = parse_reply(reply);
        assert_eq!(report.sections.skills.trim(), "Python");
        assert!(!report.sections.skills.contains("analysis"));
    }

    #[test]
    fn test_substring_label_match_starts_section() {
        // Tolerance for loosely formatted output, by substring containment.
        let reply = "Here is the Skills breakdown\n- strong in Rust";
        let report = parse_reply(reply);
        assert!(report.sections.skills.contains("- strong in Rust"));
    }

    #[test]
    fn test_label_line_with_empty_content_starts_empty_section() {
        let reply = "Skills:\nExperience: 2 years";
        let report = parse_reply(reply);
        assert_eq!(report.sections.skills, "");
        assert_eq!(report.sections.experience.trim(), "2 years");
    }

    #[test]
    fn test_untouched_sections_stay_empty() {
        let report = parse_reply("Skills: Python");
        assert_eq!(report.sections.projects, "");
        assert_eq!(report.sections.missing_qualifications, "");
    }

    #[test]
    fn test_empty_reply_yields_default_report() {
        let report = parse_reply("");
        assert_eq!(report.match_score, 0);
        assert_eq!(report.sections, SectionFeedback::default());
        assert!(report.diagnostic.is_none());
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(parse_reply(WELL_FORMED), parse_reply(WELL_FORMED));
    }

    #[test]
    fn test_well_formed_reply_end_to_end() {
        let report = parse_reply(WELL_FORMED);
        assert_eq!(report.match_score, 88);
        assert_eq!(report.sections.skills.trim(), "matches");
        assert_eq!(report.sections.experience.trim(), "matches");
        assert_eq!(report.sections.projects.trim(), "none");
        assert_eq!(report.sections.missing_qualifications.trim(), "none");
    }

    #[test]
    fn test_score_marker_line_does_not_leak_into_sections() {
        let report = parse_reply(WELL_FORMED);
        assert!(!report.sections.skills.contains("Match Score"));
    }
}
