use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use jury_storage::dto::evaluation::{
    EvaluationRequest, EvaluationResponse, RubricResponse, TeamListQuery, TeamListResponse,
};

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/evaluation",
    params(TeamListQuery),
    responses(
        (status = 200, description = "Teams assigned to the jury", body = TeamListResponse),
        (status = 500, description = "Team file could not be read")
    ),
    tag = "evaluation"
)]
pub async fn list_teams(
    State(state): State<AppState>,
    Query(query): Query<TeamListQuery>,
) -> Result<Response, WebError> {
    let response = services::list_teams(&state, query).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/evaluation",
    request_body = EvaluationRequest,
    responses(
        (status = 200, description = "Evaluation relayed and recorded", body = EvaluationResponse),
        (status = 400, description = "Missing fields or scores out of range"),
        (status = 404, description = "Team not found"),
        (status = 500, description = "Spreadsheet relay or unexpected failure")
    ),
    tag = "evaluation"
)]
pub async fn submit_evaluation(
    State(state): State<AppState>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(request) = payload.map_err(|e| WebError::BadRequest(e.body_text()))?;

    let response = services::submit_evaluation(&state, request).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/evaluation/rubric",
    responses(
        (status = 200, description = "Scoring criteria and their maximum scores", body = RubricResponse)
    ),
    tag = "evaluation"
)]
pub async fn get_rubric() -> Json<RubricResponse> {
    Json(RubricResponse::current())
}
