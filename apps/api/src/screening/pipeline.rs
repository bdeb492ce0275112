//! Evaluation pipeline — prompt construction, one LLM round trip, reply parsing.
//!
//! Fail-soft at the boundary: screening is advisory, so a backend failure
//! becomes a degraded report (score 0, diagnostic set), never an error the
//! caller has to handle. Extraction failures stay with the caller — they
//! indicate an input the user must fix.

use std::sync::Arc;

use tracing::warn;

use crate::llm::LlmBackend;
use crate::screening::parser::{parse_reply, MatchReport};
use crate::screening::prompts::build_evaluation_prompt;

/// Stateless between invocations; safe to call concurrently from independent
/// tasks. The only blocking step is the network round trip in the backend.
#[derive(Clone)]
pub struct EvaluationPipeline {
    llm: Arc<dyn LlmBackend>,
}

impl EvaluationPipeline {
    pub fn new(llm: Arc<dyn LlmBackend>) -> Self {
        Self { llm }
    }

    /// Evaluates one resume against one job description. Empty inputs are a
    /// valid, low-quality case — not rejected here.
    pub async fn evaluate(&self, resume_text: &str, job_description: &str) -> MatchReport {
        let prompt = build_evaluation_prompt(resume_text, job_description);

        match self.llm.generate(&prompt).await {
            Ok(reply) => parse_reply(&reply),
            Err(e) => {
                warn!(
                    "LLM backend failed (model={}), returning degraded report: {e}",
                    self.llm.model_id()
                );
                MatchReport::degraded(format!("Evaluation unavailable: {e}"))
            }
        }
    }
}

/// One candidate's report in a batch run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CandidateReport {
    pub filename: String,
    #[serde(flatten)]
    pub report: MatchReport,
}

/// Orders batch results by descending match score. The sort is stable, so
/// ties keep their original submission order.
pub fn rank_candidates(mut candidates: Vec<CandidateReport>) -> Vec<CandidateReport> {
    candidates.sort_by(|a, b| b.report.match_score.cmp(&a.report.match_score));
    candidates
}
