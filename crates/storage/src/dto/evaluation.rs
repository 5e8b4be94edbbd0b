use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{Criterion, Team};

/// Evaluation payload as posted by a jury member.
///
/// Every field is optional at the wire level so that absent fields surface
/// as [`SubmissionError::MissingFields`] rather than a body parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub jury_name: Option<String>,
    pub sheet_link: Option<String>,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,

    #[validate(range(min = 0.0, max = 15.0))]
    pub innovation: Option<f64>,

    #[validate(range(min = 0.0, max = 15.0))]
    pub creativity: Option<f64>,

    #[validate(range(min = 0.0, max = 20.0))]
    pub technical_implementation: Option<f64>,

    #[validate(range(min = 0.0, max = 10.0))]
    pub use_of_google_technology: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Missing required fields: juryName, sheetLink, teamId, teamName")]
    MissingFields,

    #[error("Scores are out of valid range")]
    ScoreOutOfRange,
}

/// Whole scores go out as JSON integers (`40`, not `40.0`).
fn serialize_score<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// The four criterion scores of a validated submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    #[serde(serialize_with = "serialize_score")]
    pub innovation: f64,
    #[serde(serialize_with = "serialize_score")]
    pub creativity: f64,
    #[serde(serialize_with = "serialize_score")]
    pub technical_implementation: f64,
    #[serde(serialize_with = "serialize_score")]
    pub use_of_google_technology: f64,
}

impl Scores {
    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Innovation => self.innovation,
            Criterion::Creativity => self.creativity,
            Criterion::TechnicalImplementation => self.technical_implementation,
            Criterion::UseOfGoogleTechnology => self.use_of_google_technology,
        }
    }

    pub fn total(&self) -> f64 {
        Criterion::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

/// A submission that passed validation. Serializes to the same camelCase
/// shape as the request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub jury_name: String,
    pub sheet_link: String,
    pub team_id: i64,
    pub team_name: String,
    #[serde(flatten)]
    pub scores: Scores,
}

fn present(field: &Option<String>) -> Option<String> {
    field.as_deref().filter(|s| !s.is_empty()).map(String::from)
}

impl EvaluationRequest {
    /// Checks required fields, then score ranges. No I/O happens here.
    pub fn into_submission(self) -> Result<Submission, SubmissionError> {
        let (Some(jury_name), Some(sheet_link), Some(team_name), Some(team_id)) = (
            present(&self.jury_name),
            present(&self.sheet_link),
            present(&self.team_name),
            self.team_id.filter(|id| *id != 0),
        ) else {
            return Err(SubmissionError::MissingFields);
        };

        if self.validate().is_err() {
            return Err(SubmissionError::ScoreOutOfRange);
        }

        let (
            Some(innovation),
            Some(creativity),
            Some(technical_implementation),
            Some(use_of_google_technology),
        ) = (
            self.innovation,
            self.creativity,
            self.technical_implementation,
            self.use_of_google_technology,
        )
        else {
            return Err(SubmissionError::ScoreOutOfRange);
        };

        let scores = Scores {
            innovation,
            creativity,
            technical_implementation,
            use_of_google_technology,
        };

        if !Criterion::ALL.iter().all(|c| c.accepts(scores.get(*c))) {
            return Err(SubmissionError::ScoreOutOfRange);
        }

        Ok(Submission {
            jury_name,
            sheet_link,
            team_id,
            team_name,
            scores,
        })
    }
}

/// Successful submission summary.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResponse {
    pub success: bool,
    pub message: String,
    pub is_updated: bool,
    #[serde(serialize_with = "serialize_score")]
    pub total_score: f64,
    /// Body returned by the spreadsheet webhook.
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

impl EvaluationResponse {
    pub fn new(was_already_evaluated: bool, total_score: f64, data: serde_json::Value) -> Self {
        let message = if was_already_evaluated {
            "Re-evaluation submitted successfully"
        } else {
            "Evaluation submitted successfully"
        };

        Self {
            success: true,
            message: message.to_string(),
            is_updated: was_already_evaluated,
            total_score,
            data,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TeamListQuery {
    /// Jury whose teams to list; defaults to the configured default jury
    pub jury_name: Option<String>,
    /// Team id (exact) or part of a team name (case-insensitive)
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamListResponse {
    pub message: String,
    pub method: String,
    pub jury_name: String,
    pub teams: Vec<Team>,
}

impl TeamListResponse {
    pub fn new(jury_name: String, teams: Vec<Team>) -> Self {
        Self {
            message: "Evaluation API endpoint is running".to_string(),
            method: "Use POST to submit evaluations".to_string(),
            jury_name,
            teams,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriterionInfo {
    pub key: Criterion,
    pub label: String,
    pub max_score: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RubricResponse {
    pub criteria: Vec<CriterionInfo>,
    pub max_total: f64,
}

impl RubricResponse {
    pub fn current() -> Self {
        Self {
            criteria: Criterion::ALL
                .iter()
                .map(|c| CriterionInfo {
                    key: *c,
                    label: c.label().to_string(),
                    max_score: c.max_score(),
                })
                .collect(),
            max_total: crate::models::rubric::max_total_score(),
        }
    }
}
