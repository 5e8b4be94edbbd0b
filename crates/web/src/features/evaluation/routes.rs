use axum::{Router, routing::get};

use super::handlers::{get_rubric, list_teams, submit_evaluation};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/evaluation", get(list_teams).post(submit_evaluation))
        .route("/evaluation/rubric", get(get_rubric))
}
