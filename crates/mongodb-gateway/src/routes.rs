use std::sync::Arc;

use axum::extract::{Path, RawPathParams, State};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use configuration::Configuration;
use http::StatusCode;
use itertools::Itertools as _;
use mongodb_gateway_common::health::check_health;
use mongodb_gateway_common::interface_types::GatewayError;
use mongodb_gateway_common::query::handle_collection_query;
use mongodb_gateway_common::state::ConnectorState;

#[derive(Clone)]
pub struct AppState {
    pub configuration: Arc<Configuration>,
    pub connector: ConnectorState,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/healthz", get(healthz))
        .route("/:collection", get(query_collection))
        .route("/:collection/", get(query_collection))
        .route("/:collection/:params", get(query_collection_with_params))
        .with_state(state)
}

/// Human-readable summary of the active configuration.
async fn welcome(State(state): State<AppState>) -> Html<String> {
    let configuration = &state.configuration;
    let user = configuration.mongo_user.as_deref().unwrap_or("None");
    let collections = configuration.collections.iter().join(", ");
    Html(format!(
        "<h3>MongoDB data microservice</h3>\n\
         <ul>\n\
         <li>Server: <b>{}</b>\n\
         <li>Port: <b>{}</b>\n\
         <li>Database: <b>{}</b>\n\
         <li>User: <b>{}</b>\n\
         <li>Collections: <b>{}</b>\n\
         </ul>",
        configuration.mongo_host,
        configuration.mongo_port,
        configuration.database,
        user,
        collections,
    ))
}

async fn healthz(State(state): State<AppState>) -> StatusCode {
    match check_health(&state.connector).await {
        Ok(status) => status,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

async fn query_collection(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Response {
    run_query(&state, &collection, None).await
}

/// Parameters arrive as a literal trailing path segment, not as the HTTP query component.
/// Existing clients send requests shaped like `/articulos/limit=50&count`. The segment is read
/// through `RawPathParams` so percent sequences reach the parameter parser verbatim; `Path`
/// would decode them first.
async fn query_collection_with_params(
    State(state): State<AppState>,
    Path((collection, _)): Path<(String, String)>,
    raw: RawPathParams,
) -> Response {
    let raw_params = raw
        .iter()
        .find(|(name, _)| *name == "params")
        .map(|(_, value)| value);
    run_query(&state, &collection, raw_params).await
}

async fn run_query(state: &AppState, collection: &str, raw_params: Option<&str>) -> Response {
    match handle_collection_query(&state.configuration, &state.connector, collection, raw_params)
        .await
    {
        Ok(envelope) => Json(envelope).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: GatewayError) -> Response {
    let (status, body) = err.status_and_error_response();
    if status.is_server_error() {
        tracing::error!(%status, message = %body.message, "request failed");
    } else {
        tracing::debug!(%status, message = %body.message, "rejected request");
    }
    (status, Json(body)).into_response()
}
