mod descriptor;
mod execute;
mod literal;
pub mod response;

pub use self::descriptor::{QueryDescriptor, SortDirection};
pub use self::execute::{execute_query, QueryResult};
pub use self::literal::{parse_literal, LiteralError};
pub use self::response::ResponseEnvelope;

use std::time::Instant;

use configuration::Configuration;
use time::OffsetDateTime;

use self::response::assemble_response;
use crate::interface_types::GatewayError;
use crate::mongodb::DatabaseTrait;
use crate::sanitize::sanitize_document;
use crate::state::ConnectorState;
use crate::url_params::parse_url_params;

/// Handles one collection request end to end: parse the raw parameter segment, build the query
/// descriptor, check the whitelist, run the query, sanitize, and assemble the response envelope.
pub async fn handle_collection_query(
    configuration: &Configuration,
    state: &ConnectorState,
    collection_name: &str,
    raw_params: Option<&str>,
) -> Result<ResponseEnvelope, GatewayError> {
    let database = state.database();
    // This delegates to a function that is generic over the database handle, which gives us
    // a point to inject a mock driver for testing.
    run_collection_query(database, configuration, collection_name, raw_params).await
}

pub async fn run_collection_query(
    database: impl DatabaseTrait,
    configuration: &Configuration,
    collection_name: &str,
    raw_params: Option<&str>,
) -> Result<ResponseEnvelope, GatewayError> {
    let url_params = parse_url_params(raw_params);
    let descriptor = QueryDescriptor::from_url_params(&url_params)?;
    tracing::debug!(?descriptor, "constructed query descriptor");

    // Validation is complete at this point; nothing reaches the driver for a collection outside
    // the whitelist.
    if !configuration.is_collection_permitted(collection_name) {
        return Err(GatewayError::UnauthorizedCollection(
            collection_name.to_owned(),
        ));
    }

    let started_at = OffsetDateTime::now_utc();
    let timer = Instant::now();
    let result = execute_query(database, &descriptor, collection_name).await?;
    let elapsed = timer.elapsed();

    let result = match result {
        QueryResult::Documents(documents) => {
            QueryResult::Documents(documents.into_iter().map(sanitize_document).collect())
        }
        count => count,
    };

    let envelope = assemble_response(url_params, collection_name, started_at, elapsed, result);
    tracing::debug!(
        response = %serde_json::to_string(&envelope).unwrap_or_default(),
        "assembled response"
    );
    Ok(envelope)
}
