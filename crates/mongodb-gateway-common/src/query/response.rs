use std::time::Duration;

use mongodb::bson::Bson;
use serde::Serialize;
use time::OffsetDateTime;

use super::execute::QueryResult;
use crate::url_params::{ParamValue, UrlParams};

/// The JSON body of a successful gateway response: the echoed request parameters (with the
/// collection name added), the request start timestamp as epoch seconds, the executor wall-clock
/// time in seconds, the document count, and - outside of count mode - the documents themselves.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub params: UrlParams,
    pub date: f64,
    pub time: f64,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<serde_json::Value>>,
}

pub fn assemble_response(
    mut params: UrlParams,
    collection_name: &str,
    started_at: OffsetDateTime,
    elapsed: Duration,
    result: QueryResult,
) -> ResponseEnvelope {
    params.insert(
        "collection".to_owned(),
        ParamValue::Text(collection_name.to_owned()),
    );
    let (count, list) = match result {
        QueryResult::Count(count) => (count, None),
        QueryResult::Documents(documents) => (
            documents.len() as u64,
            Some(
                documents
                    .into_iter()
                    .map(|document| Bson::Document(document).into_relaxed_extjson())
                    .collect(),
            ),
        ),
    };
    ResponseEnvelope {
        params,
        date: (started_at - OffsetDateTime::UNIX_EPOCH).as_seconds_f64(),
        time: elapsed.as_secs_f64(),
        count,
        list,
    }
}
