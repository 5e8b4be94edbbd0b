use jury_storage::dto::evaluation::{
    EvaluationRequest, EvaluationResponse, TeamListQuery, TeamListResponse,
};

use tokio::sync::OwnedMutexGuard;

use crate::error::{WebError, WebResult};
use crate::mirror::RelayPayload;
use crate::state::AppState;

/// List a jury's teams, optionally narrowed by a search query.
pub async fn list_teams(state: &AppState, query: TeamListQuery) -> WebResult<TeamListResponse> {
    let jury_name = query
        .jury_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| state.default_jury_name.to_string());

    let mut teams = state.teams.get(&jury_name).await?;
    if let Some(search) = query.search.as_deref() {
        teams.retain(|t| t.matches_search(search));
    }

    tracing::info!("Loaded {} teams for jury: {}", teams.len(), jury_name);

    Ok(TeamListResponse::new(jury_name, teams))
}

/// Validate, relay and record one evaluation.
///
/// The spreadsheet webhook is called before the team file is touched, so a
/// relay failure leaves local state unchanged. Submissions that map to the
/// same partition are serialized for the whole cycle.
pub async fn submit_evaluation(
    state: &AppState,
    request: EvaluationRequest,
) -> WebResult<EvaluationResponse> {
    let submission = request.into_submission()?;
    let jury_name = submission.jury_name.clone();
    let team_id = submission.team_id;

    let guard = state
        .locks
        .acquire(state.teams.partition_of(&jury_name))
        .await;

    let teams = state.teams.get(&jury_name).await?;

    let was_already_evaluated = teams
        .iter()
        .find(|t| t.team_id == team_id)
        .map(|t| t.is_evaluated)
        .ok_or(WebError::TeamNotFound)?;

    let total_score = submission.scores.total();
    let payload = RelayPayload {
        submission,
        is_evaluated: true,
        is_updated: was_already_evaluated,
    };
    let data = state.mirror.submit_evaluation(&payload).await?;

    // The spreadsheet already holds the scores: the local update runs on its
    // own task so it completes even if the caller is dropped.
    tokio::spawn(record_evaluation(
        state.clone(),
        jury_name.clone(),
        team_id,
        was_already_evaluated,
        guard,
    ))
    .await
    .map_err(|e| WebError::Unhandled(e.to_string()))??;

    tracing::info!(
        "Evaluation of team {} by {} recorded (re-evaluation: {}, total: {})",
        team_id,
        jury_name,
        was_already_evaluated,
        total_score
    );

    Ok(EvaluationResponse::new(was_already_evaluated, total_score, data))
}

/// Re-load the partition, flip the team's flags, persist, then send the
/// status notification. Holds the partition lock until the write is done.
async fn record_evaluation(
    state: AppState,
    jury_name: String,
    team_id: i64,
    was_already_evaluated: bool,
    _guard: OwnedMutexGuard<()>,
) -> WebResult<()> {
    let mut fresh = state.teams.get(&jury_name).await?;

    match fresh.iter_mut().find(|t| t.team_id == team_id) {
        Some(team) => {
            team.record_evaluation(was_already_evaluated);
            state.teams.put(&jury_name, &fresh).await?;
        }
        None => {
            tracing::warn!(
                "Team {} disappeared from {}'s file after relay, local flags not updated",
                team_id,
                jury_name
            );
        }
    }

    state.notifier.notify(team_id, true, was_already_evaluated);

    Ok(())
}
