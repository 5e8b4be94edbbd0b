use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;

use super::{MirrorError, SpreadsheetMirror, StatusUpdate};

/// Append-only JSON-lines file of status updates the webhook never accepted.
#[derive(Debug, Clone)]
pub struct DeadLetterLog {
    path: PathBuf,
}

impl DeadLetterLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn record(&self, update: &StatusUpdate, error: &MirrorError) -> std::io::Result<()> {
        let mut line = json!({
            "failedAt": Utc::now(),
            "error": error.to_string(),
            "update": update,
        })
        .to_string();
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

/// Fire-and-forget delivery of team status updates.
///
/// Each notification runs on its own task; failures end up in the log and the
/// optional dead-letter file, never with the caller.
#[derive(Clone)]
pub struct StatusNotifier {
    mirror: Arc<dyn SpreadsheetMirror>,
    target_sheet_id: Arc<str>,
    dead_letter: Option<DeadLetterLog>,
}

impl StatusNotifier {
    pub fn new(
        mirror: Arc<dyn SpreadsheetMirror>,
        target_sheet_id: impl Into<Arc<str>>,
        dead_letter: Option<DeadLetterLog>,
    ) -> Self {
        Self {
            mirror,
            target_sheet_id: target_sheet_id.into(),
            dead_letter,
        }
    }

    pub fn notify(&self, team_id: i64, is_evaluated: bool, is_updated: bool) -> JoinHandle<()> {
        let update = StatusUpdate::new(&*self.target_sheet_id, team_id, is_evaluated, is_updated);
        let mirror = Arc::clone(&self.mirror);
        let dead_letter = self.dead_letter.clone();

        tokio::spawn(async move {
            match mirror.update_team_status(&update).await {
                Ok(()) => {
                    tracing::info!("Spreadsheet status updated for team {}", update.team_id);
                }
                Err(e) => {
                    tracing::error!(
                        target: "dead_letter",
                        "Failed to update spreadsheet status for team {}: {}",
                        update.team_id,
                        e
                    );
                    if let Some(log) = dead_letter {
                        if let Err(io) = log.record(&update, &e).await {
                            tracing::error!("Cannot write dead letter to {}: {}", log.path.display(), io);
                        }
                    }
                }
            }
        })
    }
}
