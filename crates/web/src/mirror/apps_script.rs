use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};

use super::{MirrorError, RelayPayload, SpreadsheetMirror, StatusUpdate};

/// Google Apps Script web apps receiving evaluations and status updates.
pub struct AppsScriptMirror {
    client: Client,
    evaluation_url: String,
    status_url: String,
}

impl AppsScriptMirror {
    pub fn new(
        evaluation_url: impl Into<String>,
        status_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MirrorError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            evaluation_url: evaluation_url.into(),
            status_url: status_url.into(),
        })
    }
}

#[async_trait]
impl SpreadsheetMirror for AppsScriptMirror {
    async fn submit_evaluation(&self, payload: &RelayPayload) -> Result<serde_json::Value, MirrorError> {
        tracing::info!(
            "Relaying evaluation of team {} by {}",
            payload.submission.team_id,
            payload.submission.jury_name
        );

        let response = self
            .client
            .post(&self.evaluation_url)
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MirrorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| MirrorError::InvalidBody(e.to_string()))
    }

    async fn update_team_status(&self, update: &StatusUpdate) -> Result<(), MirrorError> {
        let body = serde_json::to_string(update)?;
        tracing::debug!("Sending team status update: {}", body);

        // text/plain keeps Apps Script from demanding a CORS pre-flight.
        let response = self
            .client
            .post(&self.status_url)
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        tracing::debug!("Team status webhook answered {}: {}", status, text);

        if !status.is_success() {
            return Err(MirrorError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(())
    }
}
