use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{current_session, login, logout};
use crate::middleware::auth::{SessionStore, require_auth};
use crate::state::AppState;

pub fn routes(sessions: SessionStore) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/session", get(current_session))
        .route("/auth/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(sessions, require_auth));

    Router::new().route("/auth/login", post(login)).merge(protected)
}
