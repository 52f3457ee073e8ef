use std::collections::HashMap;
use std::fmt::{self, Display};

use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Everything that can go wrong while handling a gateway request. Parse and validation errors are
/// raised before any database call is made.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A `q`, `f`, or `s` parameter that does not conform to the restricted literal grammar, or
    /// that parses to the wrong shape for its role.
    MalformedLiteral {
        parameter: &'static str,
        detail: anyhow::Error,
    },

    /// A `skip` or `limit` parameter that is not a non-negative integer.
    InvalidInteger {
        parameter: &'static str,
        value: String,
    },

    /// Requested collection is not in the configured whitelist.
    UnauthorizedCollection(String),

    MongoDB(#[from] mongodb::error::Error),
}

use GatewayError::*;

impl GatewayError {
    pub fn status_and_error_response(&self) -> (StatusCode, ErrorResponse) {
        match self {
            MalformedLiteral { parameter, detail } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(&format!(
                    "parameter \"{parameter}\" is not a valid literal structure: {detail}"
                )),
            ),
            InvalidInteger { parameter, value } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(&format!(
                    "parameter \"{parameter}\" must be a non-negative integer, got \"{value}\""
                )),
            ),
            UnauthorizedCollection(collection_name) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    message: format!(
                        "collection \"{collection_name}\" is not available through this gateway"
                    ),
                    details: Some(
                        [(
                            "collection".to_owned(),
                            serde_json::Value::String(collection_name.clone()),
                        )]
                        .into(),
                    ),
                },
            ),
            MongoDB(err) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(&err)),
        }
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (_, err) = self.status_and_error_response();
        write!(f, "{}", err.message)
    }
}

/// JSON body sent with non-success status codes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

impl ErrorResponse {
    pub fn new<T>(message: &T) -> ErrorResponse
    where
        T: Display + ?Sized,
    {
        ErrorResponse {
            message: format!("{message}"),
            details: None,
        }
    }
}
