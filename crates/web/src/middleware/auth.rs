use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::JuryProfile;
use crate::error::WebError;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A jury member whose credentials were accepted by a [`JuryAuthenticator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JuryIdentity {
    name: String,
    sheet_link: String,
}

impl JuryIdentity {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sheet_link(&self) -> &str {
        &self.sheet_link
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
}

/// Policy deciding who may act as a jury member.
pub trait JuryAuthenticator: Send + Sync {
    fn authenticate(&self, credentials: &Credentials) -> Result<JuryIdentity, AuthError>;
}

/// Accounts taken from the jury configuration file.
#[derive(Clone)]
pub struct StaticCredentials {
    accounts: Vec<JuryProfile>,
}

impl StaticCredentials {
    pub fn from_profiles(profiles: &[JuryProfile]) -> Self {
        Self {
            accounts: profiles.to_vec(),
        }
    }
}

impl JuryAuthenticator for StaticCredentials {
    fn authenticate(&self, credentials: &Credentials) -> Result<JuryIdentity, AuthError> {
        self.accounts
            .iter()
            .find(|a| {
                a.email.eq_ignore_ascii_case(credentials.email.trim())
                    && a.password == credentials.password
            })
            .map(|a| JuryIdentity {
                name: a.name.clone(),
                sheet_link: a.sheet_link.clone(),
            })
            .ok_or(AuthError::InvalidCredentials)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub identity: JuryIdentity,
    pub issued_at: DateTime<Utc>,
}

/// In-memory bearer sessions. Sessions do not survive a restart.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn issue(&self, identity: JuryIdentity) -> Session {
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            identity,
            issued_at: Utc::now(),
        };

        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());

        session
    }

    pub async fn lookup(&self, token: &str) -> Option<Session> {
        self.sessions.read().await.get(token).cloned()
    }

    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Rejects requests without a live session and hands the session to the
/// handler as a request extension.
pub async fn require_auth(
    State(sessions): State<SessionStore>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let Some(token) = bearer_token(&req) else {
        return Err(WebError::Unauthorized);
    };

    let Some(session) = sessions.lookup(token).await else {
        tracing::warn!("Request with unknown session token");
        return Err(WebError::Unauthorized);
    };

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
