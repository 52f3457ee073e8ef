use anyhow::anyhow;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::FindOptions;

use super::literal::parse_literal;
use crate::interface_types::GatewayError;
use crate::url_params::{ParamValue, UrlParams};

/// Sort direction for a single field, the `1` / `-1` of a MongoDB sort spec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn from_bson(value: &Bson) -> Option<SortDirection> {
        match value {
            Bson::Int32(1) | Bson::Int64(1) => Some(SortDirection::Ascending),
            Bson::Int32(-1) | Bson::Int64(-1) => Some(SortDirection::Descending),
            _ => None,
        }
    }

    pub fn as_bson(self) -> Bson {
        match self {
            SortDirection::Ascending => Bson::Int32(1),
            SortDirection::Descending => Bson::Int32(-1),
        }
    }
}

/// The typed query built from a request's URL parameters. This is everything the executor needs:
/// filter, projection, sort, pagination window, and whether the caller asked for a count instead
/// of documents.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryDescriptor {
    pub skip: u64,
    /// 0 means unbounded
    pub limit: u64,
    /// Always contains `_id: 0` - the identity field is suppressed from output
    pub projection: Document,
    pub filter: Document,
    pub sort: Vec<(String, SortDirection)>,
    pub count_only: bool,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        QueryDescriptor {
            skip: 0,
            limit: 0,
            projection: doc! { "_id": 0 },
            filter: Document::new(),
            sort: vec![],
            count_only: false,
        }
    }
}

impl QueryDescriptor {
    /// Builds a descriptor from parsed URL parameters. Recognized keys are `count`, `skip`,
    /// `limit`, `q` (filter), `f` (projection), and `s` (sort); anything else is ignored here and
    /// echoed back verbatim in the response.
    pub fn from_url_params(params: &UrlParams) -> Result<QueryDescriptor, GatewayError> {
        let mut descriptor = QueryDescriptor {
            count_only: params.contains_key("count"),
            ..Default::default()
        };
        if let Some(value) = params.get("skip") {
            descriptor.skip = parse_non_negative_integer("skip", value)?;
        }
        if let Some(value) = params.get("limit") {
            descriptor.limit = parse_non_negative_integer("limit", value)?;
        }
        if let Some(value) = params.get("q") {
            descriptor.filter = parse_filter(value)?;
        }
        if let Some(value) = params.get("f") {
            descriptor.projection = parse_projection(value)?;
        }
        if let Some(value) = params.get("s") {
            descriptor.sort = parse_sort(value)?;
        }
        // Suppression of the identity field happens unconditionally as the last step, overriding
        // any caller-supplied projection entry for it.
        descriptor.projection.insert("_id", 0);
        Ok(descriptor)
    }

    /// The sort spec as a MongoDB sort document, preserving field order.
    pub fn sort_document(&self) -> Document {
        self.sort
            .iter()
            .map(|(field, direction)| (field.clone(), direction.as_bson()))
            .collect()
    }

    /// Driver options for list-mode execution. Sort is set only when non-empty so that driver
    /// default ordering applies otherwise; skip and limit are set only when non-zero.
    pub fn find_options(&self) -> FindOptions {
        let mut options = FindOptions::default();
        options.projection = Some(self.projection.clone());
        if !self.sort.is_empty() {
            options.sort = Some(self.sort_document());
        }
        if self.skip > 0 {
            options.skip = Some(self.skip);
        }
        if self.limit > 0 {
            // Saturate rather than wrap; a negative driver limit means "limit and close cursor".
            options.limit = Some(i64::try_from(self.limit).unwrap_or(i64::MAX));
        }
        options
    }
}

fn parse_non_negative_integer(
    parameter: &'static str,
    value: &ParamValue,
) -> Result<u64, GatewayError> {
    let text = value.text().ok_or_else(|| GatewayError::InvalidInteger {
        parameter,
        value: "true".to_owned(),
    })?;
    text.parse().map_err(|_| GatewayError::InvalidInteger {
        parameter,
        value: text.to_owned(),
    })
}

fn parse_structured(parameter: &'static str, value: &ParamValue) -> Result<Bson, GatewayError> {
    let text = value.text().ok_or_else(|| GatewayError::MalformedLiteral {
        parameter,
        detail: anyhow!("parameter has no value"),
    })?;
    parse_literal(text).map_err(|err| GatewayError::MalformedLiteral {
        parameter,
        detail: err.into(),
    })
}

fn parse_filter(value: &ParamValue) -> Result<Document, GatewayError> {
    match parse_structured("q", value)? {
        Bson::Document(filter) => Ok(filter),
        other => Err(GatewayError::MalformedLiteral {
            parameter: "q",
            detail: anyhow!("expected an object, got {other}"),
        }),
    }
}

fn parse_projection(value: &ParamValue) -> Result<Document, GatewayError> {
    let fields = match parse_structured("f", value)? {
        Bson::Document(fields) => fields,
        other => Err(GatewayError::MalformedLiteral {
            parameter: "f",
            detail: anyhow!("expected an object, got {other}"),
        })?,
    };
    fields
        .into_iter()
        .map(|(field, flag)| match flag {
            Bson::Int32(0) | Bson::Int64(0) => Ok((field, Bson::Int32(0))),
            Bson::Int32(1) | Bson::Int64(1) => Ok((field, Bson::Int32(1))),
            other => Err(GatewayError::MalformedLiteral {
                parameter: "f",
                detail: anyhow!("projection value for \"{field}\" must be 0 or 1, got {other}"),
            }),
        })
        .collect()
}

fn parse_sort(value: &ParamValue) -> Result<Vec<(String, SortDirection)>, GatewayError> {
    let malformed = |detail: anyhow::Error| GatewayError::MalformedLiteral {
        parameter: "s",
        detail,
    };
    let pairs = match parse_structured("s", value)? {
        Bson::Array(pairs) => pairs,
        other => return Err(malformed(anyhow!("expected a sequence, got {other}"))),
    };
    pairs
        .into_iter()
        .map(|pair| match pair {
            Bson::Array(pair) => match &pair[..] {
                [Bson::String(field), direction] => {
                    let direction = SortDirection::from_bson(direction).ok_or_else(|| {
                        malformed(anyhow!(
                            "sort direction for \"{field}\" must be 1 or -1, got {direction}"
                        ))
                    })?;
                    Ok((field.clone(), direction))
                }
                _ => Err(malformed(anyhow!(
                    "each sort entry must be a (field, direction) pair"
                ))),
            },
            other => Err(malformed(anyhow!(
                "each sort entry must be a (field, direction) pair, got {other}"
            ))),
        })
        .collect()
}
