use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extract::{extract_text, DocumentFormat};
use crate::screening::parser::MatchReport;
use crate::screening::pipeline::{rank_candidates, CandidateReport};
use crate::state::AppState;

/// Placeholders applied when the model left a section empty. Presentation
/// concern only — the parser itself stores empty strings.
const PLACEHOLDER: &str = "Not specified";
const PLACEHOLDER_MISSING: &str = "None identified";

#[derive(Debug, Serialize)]
pub struct RenderedFeedback {
    pub skills: String,
    pub experience: String,
    pub projects: String,
    pub missing_qualifications: String,
}

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub filename: String,
    pub match_score: u32,
    pub feedback: RenderedFeedback,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SkippedDocument {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct BatchEvaluationResponse {
    /// Ranked by descending match score; ties keep submission order.
    pub results: Vec<EvaluationResponse>,
    pub skipped: Vec<SkippedDocument>,
}

/// One uploaded resume pulled out of the multipart body.
struct UploadedResume {
    filename: String,
    content_type: Option<String>,
    data: Vec<u8>,
}

fn render_response(filename: String, report: MatchReport) -> EvaluationResponse {
    let placeholder = |text: &str, fallback: &str| {
        let trimmed = text.trim_end();
        if trimmed.is_empty() {
            fallback.to_string()
        } else {
            trimmed.to_string()
        }
    };

    EvaluationResponse {
        filename,
        match_score: report.match_score,
        feedback: RenderedFeedback {
            skills: placeholder(&report.sections.skills, PLACEHOLDER),
            experience: placeholder(&report.sections.experience, PLACEHOLDER),
            projects: placeholder(&report.sections.projects, PLACEHOLDER),
            missing_qualifications: placeholder(
                &report.sections.missing_qualifications,
                PLACEHOLDER_MISSING,
            ),
        },
        diagnostic: report.diagnostic,
    }
}

async fn collect_upload(
    multipart: &mut Multipart,
) -> Result<(Option<String>, Vec<UploadedResume>), AppError> {
    let mut job_description = None;
    let mut resumes = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        // Capture the name up front; the arms below consume the field.
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("job_description") => {
                job_description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("Invalid field: {e}")))?,
                );
            }
            Some("resume") => {
                let filename = field.file_name().unwrap_or("resume").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid file upload: {e}")))?;
                resumes.push(UploadedResume {
                    filename,
                    content_type,
                    data: data.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok((job_description, resumes))
}

/// POST /api/v1/evaluations
/// Multipart: one `resume` file (PDF/DOCX) + `job_description` text field.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EvaluationResponse>, AppError> {
    let (job_description, mut resumes) = collect_upload(&mut multipart).await?;

    let job_description = job_description
        .ok_or_else(|| AppError::Validation("Missing 'job_description' field".to_string()))?;
    if resumes.is_empty() {
        return Err(AppError::Validation("Missing 'resume' file".to_string()));
    }
    let resume = resumes.remove(0);

    info!(filename = %resume.filename, "Evaluating resume");

    let format = DocumentFormat::detect(Some(&resume.filename), resume.content_type.as_deref())?;
    let resume_text = extract_text(&resume.data, format)?;

    let report = state.pipeline.evaluate(&resume_text, &job_description).await;
    Ok(Json(render_response(resume.filename, report)))
}

/// POST /api/v1/evaluations/batch
/// Multipart: repeated `resume` files + one `job_description` field.
/// Unreadable documents are skipped with a reason; they never abort the batch.
pub async fn handle_evaluate_batch(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BatchEvaluationResponse>, AppError> {
    let (job_description, resumes) = collect_upload(&mut multipart).await?;

    let job_description = job_description
        .ok_or_else(|| AppError::Validation("Missing 'job_description' field".to_string()))?;
    if resumes.is_empty() {
        return Err(AppError::Validation("No 'resume' files supplied".to_string()));
    }

    info!(count = resumes.len(), "Evaluating resume batch");

    let mut candidates = Vec::new();
    let mut skipped = Vec::new();

    for resume in resumes {
        let extracted = DocumentFormat::detect(Some(&resume.filename), resume.content_type.as_deref())
            .and_then(|format| extract_text(&resume.data, format));

        match extracted {
            Ok(resume_text) => {
                let report = state.pipeline.evaluate(&resume_text, &job_description).await;
                candidates.push(CandidateReport {
                    filename: resume.filename,
                    report,
                });
            }
            Err(e) => {
                warn!(filename = %resume.filename, "Skipping document: {e}");
                skipped.push(SkippedDocument {
                    filename: resume.filename,
                    reason: e.to_string(),
                });
            }
        }
    }

    let results = rank_candidates(candidates)
        .into_iter()
        .map(|c| render_response(c.filename, c.report))
        .collect();

    Ok(Json(BatchEvaluationResponse { results, skipped }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::parser::SectionFeedback;

    #[test]
    fn test_render_applies_placeholders_to_empty_sections() {
        let report = MatchReport {
            match_score: 0,
            sections: SectionFeedback::default(),
            diagnostic: None,
        };
        let rendered = render_response("cv.pdf".into(), report);
        assert_eq!(rendered.feedback.skills, "Not specified");
        assert_eq!(rendered.feedback.experience, "Not specified");
        assert_eq!(rendered.feedback.projects, "Not specified");
        assert_eq!(rendered.feedback.missing_qualifications, "None identified");
    }

    #[test]
    fn test_render_trims_trailing_newline_from_stored_sections() {
        let report = MatchReport {
            match_score: 72,
            sections: SectionFeedback {
                skills: "Rust, Python\n".to_string(),
                ..Default::default()
            },
            diagnostic: None,
        };
        let rendered = render_response("cv.pdf".into(), report);
        assert_eq!(rendered.feedback.skills, "Rust, Python");
        assert_eq!(rendered.match_score, 72);
    }

    #[test]
    fn test_render_preserves_diagnostic() {
        let rendered = render_response(
            "cv.pdf".into(),
            MatchReport::degraded("Evaluation unavailable: timeout".into()),
        );
        assert_eq!(rendered.match_score, 0);
        assert_eq!(
            rendered.diagnostic.as_deref(),
            Some("Evaluation unavailable: timeout")
        );
    }
}
