//! Outbound webhooks that mirror evaluations into the organisers' spreadsheet.

pub mod apps_script;
pub mod notifier;

use async_trait::async_trait;
use jury_storage::dto::evaluation::Submission;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use apps_script::AppsScriptMirror;
pub use notifier::{DeadLetterLog, StatusNotifier};

pub const UPDATE_TEAM_STATUS_ACTION: &str = "updateTeamStatus";

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Spreadsheet webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Google Apps Script responded with status: {status}")]
    Status { status: u16, body: String },

    #[error("Invalid response from spreadsheet webhook: {0}")]
    InvalidBody(String),

    #[error("Failed to encode webhook payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Body sent to the evaluation webhook: the submission as received plus the
/// flags the team will carry once the submission is applied.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayPayload {
    #[serde(flatten)]
    pub submission: Submission,
    pub is_evaluated: bool,
    pub is_updated: bool,
}

/// Body sent to the status-only webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub action: String,
    pub target_sheet_id: String,
    pub team_id: i64,
    pub is_evaluated: bool,
    pub is_updated: bool,
}

impl StatusUpdate {
    pub fn new(target_sheet_id: impl Into<String>, team_id: i64, is_evaluated: bool, is_updated: bool) -> Self {
        Self {
            action: UPDATE_TEAM_STATUS_ACTION.to_string(),
            target_sheet_id: target_sheet_id.into(),
            team_id,
            is_evaluated,
            is_updated,
        }
    }
}

#[async_trait]
pub trait SpreadsheetMirror: Send + Sync {
    /// Relays a full evaluation and returns the webhook's JSON response.
    async fn submit_evaluation(&self, payload: &RelayPayload) -> Result<serde_json::Value, MirrorError>;

    /// Pushes the team's evaluation flags to the status sheet.
    async fn update_team_status(&self, update: &StatusUpdate) -> Result<(), MirrorError>;
}
