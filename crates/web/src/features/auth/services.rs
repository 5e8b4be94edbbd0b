use jury_storage::dto::auth::{LoginRequest, LoginResponse, SessionResponse};

use crate::error::WebResult;
use crate::middleware::auth::{Credentials, JuryAuthenticator, Session, SessionStore};

/// Check credentials and open a session for the jury member.
pub async fn login(
    authenticator: &dyn JuryAuthenticator,
    sessions: &SessionStore,
    request: &LoginRequest,
) -> WebResult<LoginResponse> {
    let identity = authenticator.authenticate(&Credentials {
        email: request.email.clone(),
        password: request.password.clone(),
    })?;

    let session = sessions.issue(identity).await;
    tracing::info!("Jury {} logged in", session.identity.name());

    Ok(LoginResponse {
        token: session.token,
        jury_name: session.identity.name().to_string(),
        sheet_link: session.identity.sheet_link().to_string(),
    })
}

pub fn describe(session: &Session) -> SessionResponse {
    SessionResponse {
        jury_name: session.identity.name().to_string(),
        sheet_link: session.identity.sheet_link().to_string(),
        issued_at: session.issued_at,
    }
}

pub async fn logout(sessions: &SessionStore, session: &Session) {
    if sessions.revoke(&session.token).await {
        tracing::info!("Jury {} logged out", session.identity.name());
    }
}
