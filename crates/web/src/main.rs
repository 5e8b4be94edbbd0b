use std::sync::Arc;

use anyhow::Context;
use jury_storage::{FileTeamRepository, TeamRepository};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod mirror;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use config::Config;
use middleware::auth::StaticCredentials;
use mirror::{AppsScriptMirror, DeadLetterLog, SpreadsheetMirror, StatusNotifier};
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::evaluation::handlers::list_teams,
        features::evaluation::handlers::submit_evaluation,
        features::evaluation::handlers::get_rubric,
        features::auth::handlers::login,
        features::auth::handlers::current_session,
        features::auth::handlers::logout,
    ),
    components(
        schemas(
            jury_storage::dto::evaluation::EvaluationRequest,
            jury_storage::dto::evaluation::EvaluationResponse,
            jury_storage::dto::evaluation::TeamListResponse,
            jury_storage::dto::evaluation::RubricResponse,
            jury_storage::dto::evaluation::CriterionInfo,
            jury_storage::dto::auth::LoginRequest,
            jury_storage::dto::auth::LoginResponse,
            jury_storage::dto::auth::SessionResponse,
            jury_storage::models::Team,
            jury_storage::models::Criterion,
        )
    ),
    tags(
        (name = "evaluation", description = "Team listing and score submission"),
        (name = "auth", description = "Jury login sessions"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("Session token")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting jury evaluation API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!(
        "Configuration loaded: {} juries, default jury {}",
        config.juries.len(),
        config.default_jury_name
    );

    for jury in &config.juries {
        tracing::info!("Jury {} reads teams from {}", jury.name, jury.teams_file.display());
    }
    tracing::info!(
        "Unknown juries fall back to {}",
        config.fallback_teams_file.display()
    );

    let teams: Arc<dyn TeamRepository> = Arc::new(FileTeamRepository::new(config.partitions()));

    let mirror: Arc<dyn SpreadsheetMirror> = Arc::new(
        AppsScriptMirror::new(
            &config.evaluation_webhook_url,
            &config.status_webhook_url,
            config.relay_timeout,
        )
        .context("Failed to build spreadsheet webhook client")?,
    );

    let dead_letter = config.dead_letter_path.as_ref().map(|path| {
        tracing::info!("Failed status updates will be appended to {}", path.display());
        DeadLetterLog::new(path)
    });
    let notifier = StatusNotifier::new(
        Arc::clone(&mirror),
        config.team_status_sheet_id.as_str(),
        dead_letter,
    );

    let state = AppState::new(
        teams,
        mirror,
        notifier,
        Arc::new(StaticCredentials::from_profiles(&config.juries)),
        config.default_jury_name.as_str(),
    );

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let app = routes::router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    axum::serve(listener, app).await?;

    Ok(())
}
