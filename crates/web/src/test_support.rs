//! Fakes and fixtures shared by the unit tests of this crate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    routing::post,
};
use jury_storage::{
    FileTeamRepository, JuryPartitions, TeamRepository,
    dto::evaluation::{EvaluationRequest, Submission},
    models::Team,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::JuryProfile;
use crate::middleware::auth::StaticCredentials;
use crate::mirror::{MirrorError, RelayPayload, SpreadsheetMirror, StatusNotifier, StatusUpdate};
use crate::state::AppState;

pub struct TempDir(PathBuf);

impl TempDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("jury-web-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&path).unwrap();
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

/// In-process spreadsheet mirror that records every call.
#[derive(Default)]
pub struct FakeMirror {
    relay_failure: Option<u16>,
    status_failure: Option<u16>,
    relayed: Mutex<Vec<serde_json::Value>>,
    status_updates: Mutex<Vec<StatusUpdate>>,
}

impl FakeMirror {
    pub fn failing_relay() -> Self {
        Self {
            relay_failure: Some(502),
            ..Self::default()
        }
    }

    pub fn failing_status() -> Self {
        Self {
            status_failure: Some(503),
            ..Self::default()
        }
    }

    pub async fn relayed(&self) -> Vec<serde_json::Value> {
        self.relayed.lock().await.clone()
    }

    /// Every status update attempted, including the ones answered with an error.
    pub async fn status_updates(&self) -> Vec<StatusUpdate> {
        self.status_updates.lock().await.clone()
    }

    /// Waits until the spawned status notification has landed.
    pub async fn wait_for_status_updates(&self, count: usize) -> Vec<StatusUpdate> {
        for _ in 0..100 {
            let updates = self.status_updates().await;
            if updates.len() >= count {
                return updates;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        self.status_updates().await
    }
}

#[async_trait]
impl SpreadsheetMirror for FakeMirror {
    async fn submit_evaluation(&self, payload: &RelayPayload) -> Result<serde_json::Value, MirrorError> {
        if let Some(status) = self.relay_failure {
            return Err(MirrorError::Status {
                status,
                body: "relay unavailable".to_string(),
            });
        }
        self.relayed
            .lock()
            .await
            .push(serde_json::to_value(payload).unwrap());
        Ok(serde_json::json!({ "result": "success" }))
    }

    async fn update_team_status(&self, update: &StatusUpdate) -> Result<(), MirrorError> {
        self.status_updates.lock().await.push(update.clone());
        match self.status_failure {
            Some(status) => Err(MirrorError::Status {
                status,
                body: "status sheet unavailable".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub content_type: String,
    pub body: String,
}

/// Minimal webhook endpoint bound on an ephemeral local port.
pub struct WebhookServer {
    url: String,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl WebhookServer {
    pub async fn start(status: StatusCode, response: &'static str) -> Self {
        let received: Arc<Mutex<Vec<ReceivedRequest>>> = Arc::default();

        let app = Router::new()
            .route(
                "/exec",
                post(
                    move |State(received): State<Arc<Mutex<Vec<ReceivedRequest>>>>,
                          headers: HeaderMap,
                          body: Bytes| async move {
                        received.lock().await.push(ReceivedRequest {
                            content_type: headers
                                .get(CONTENT_TYPE)
                                .and_then(|v| v.to_str().ok())
                                .unwrap_or_default()
                                .to_string(),
                            body: String::from_utf8_lossy(&body).into_owned(),
                        });
                        (status, response)
                    },
                ),
            )
            .with_state(Arc::clone(&received));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/exec", addr),
            received,
        }
    }

    pub fn url(&self) -> String {
        self.url.clone()
    }

    pub async fn requests(&self) -> Vec<ReceivedRequest> {
        self.received.lock().await.clone()
    }
}

pub fn jury_profiles() -> Vec<JuryProfile> {
    vec![
        JuryProfile {
            name: "A".to_string(),
            email: "jury1@example.com".to_string(),
            password: "pass-1".to_string(),
            teams_file: "jury-a.json".into(),
            sheet_link: "https://sheets.example/a".to_string(),
        },
        JuryProfile {
            name: "B".to_string(),
            email: "jury2@example.com".to_string(),
            password: "pass-2".to_string(),
            teams_file: "jury-b.json".into(),
            sheet_link: "https://sheets.example/b".to_string(),
        },
    ]
}

pub fn evaluation_request(jury_name: &str, team_id: i64, scores: [f64; 4]) -> EvaluationRequest {
    EvaluationRequest {
        jury_name: Some(jury_name.to_string()),
        sheet_link: Some(format!("https://sheets.example/{}", jury_name.to_lowercase())),
        team_id: Some(team_id),
        team_name: Some(format!("Team {}", team_id)),
        innovation: Some(scores[0]),
        creativity: Some(scores[1]),
        technical_implementation: Some(scores[2]),
        use_of_google_technology: Some(scores[3]),
    }
}

pub fn submission(jury_name: &str, team_id: i64, scores: [f64; 4]) -> Submission {
    evaluation_request(jury_name, team_id, scores)
        .into_submission()
        .unwrap()
}

/// File-backed state over a temp directory, with juries "A" and "B" seeded
/// from the given teams and an empty fallback file.
pub struct Fixture {
    pub dir: TempDir,
    pub mirror: Arc<FakeMirror>,
    pub state: AppState,
}

impl Fixture {
    pub fn new(mirror: FakeMirror, teams_a: &[Team], teams_b: &[Team]) -> Self {
        Self::with_repository(mirror, teams_a, teams_b, |repo| Arc::new(repo))
    }

    /// Same as [`Fixture::new`], with the file repository wrapped by `wrap`.
    pub fn with_repository(
        mirror: FakeMirror,
        teams_a: &[Team],
        teams_b: &[Team],
        wrap: impl FnOnce(FileTeamRepository) -> Arc<dyn TeamRepository>,
    ) -> Self {
        let dir = TempDir::new();
        let profiles: Vec<JuryProfile> = jury_profiles()
            .into_iter()
            .map(|mut p| {
                p.teams_file = dir.path().join(&p.teams_file);
                p
            })
            .collect();

        std::fs::write(&profiles[0].teams_file, serde_json::to_vec_pretty(teams_a).unwrap()).unwrap();
        std::fs::write(&profiles[1].teams_file, serde_json::to_vec_pretty(teams_b).unwrap()).unwrap();
        std::fs::write(dir.path().join("data.json"), b"[]").unwrap();

        let mut partitions = JuryPartitions::new(dir.path().join("data.json"));
        for profile in &profiles {
            partitions.insert(profile.name.clone(), profile.teams_file.clone());
        }

        let mirror = Arc::new(mirror);
        let state = state_over(wrap(FileTeamRepository::new(partitions)), mirror.clone());

        Self { dir, mirror, state }
    }

    pub fn jury_file(&self, jury_name: &str) -> PathBuf {
        self.dir
            .path()
            .join(format!("jury-{}.json", jury_name.to_lowercase()))
    }

    pub fn read_bytes(&self, jury_name: &str) -> Vec<u8> {
        std::fs::read(self.jury_file(jury_name)).unwrap()
    }

    pub fn read_teams(&self, jury_name: &str) -> Vec<Team> {
        serde_json::from_slice(&self.read_bytes(jury_name)).unwrap()
    }
}

/// State over any team store, with the fake mirror and the two test juries.
pub fn state_over(teams: Arc<dyn TeamRepository>, mirror: Arc<FakeMirror>) -> AppState {
    let notifier = StatusNotifier::new(mirror.clone(), "status-sheet", None);
    AppState::new(
        teams,
        mirror,
        notifier,
        Arc::new(StaticCredentials::from_profiles(&jury_profiles())),
        "A",
    )
}
