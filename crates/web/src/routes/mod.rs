use axum::Router;

use crate::features::{auth, evaluation};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(evaluation::routes::routes())
        .merge(auth::routes::routes(state.sessions.clone()));

    Router::new().nest("/api", api).with_state(state)
}
