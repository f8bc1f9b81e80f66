//! HTTP transport for actions.

use crate::config::ServerConfig;
use crate::congo::CongoRules;
use crate::db::GameRepository;
use crate::dispatch::{ActionRouter, ErrorKind, ResponseBuilder};
use crate::protocol::{Action, ActionType, Update};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Builds the router serving `POST /action` and `GET /health`.
pub fn app(router: Arc<ActionRouter>) -> Router {
    Router::new()
        .route("/action", post(handle_action))
        .route("/health", get(health))
        .with_state(router)
}

/// Decodes one action, dispatches it off the async runtime and returns
/// the resulting update.
#[instrument(skip_all, fields(body_len = body.len()))]
pub async fn handle_action(State(router): State<Arc<ActionRouter>>, body: String) -> Json<Update> {
    let action = match serde_json::from_str::<Action>(&body) {
        Ok(action) => action,
        Err(e) => return Json(router.reject_malformed(&format!("Malformed action: {}", e))),
    };
    debug!(communication_type = %action.communication_type, "Decoded action");

    let worker = Arc::clone(&router);
    match tokio::task::spawn_blocking(move || worker.route(action)).await {
        Ok(update) => Json(update),
        Err(e) => {
            error!(error = %e, "Action worker failed");
            let action = Action::new(ActionType::Unknown(String::new()));
            Json(
                router
                    .builder()
                    .error(&action, ErrorKind::InfraFailure, "Action worker failed"),
            )
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Opens storage, wires the router and serves until the listener fails.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the address cannot
/// be bound.
#[instrument(skip(config), fields(bind = %config.bind_address()))]
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let repository = GameRepository::open(config.db_path().clone())?;
    let router = Arc::new(ActionRouter::new(
        Arc::new(repository),
        Arc::new(CongoRules::new()),
        ResponseBuilder::new(*config.protocol_version()),
    ));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(address = %config.bind_address(), "Server ready");
    axum::serve(listener, app(router)).await?;
    info!("Server stopped");
    Ok(())
}
