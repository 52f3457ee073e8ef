use futures_util::TryStreamExt as _;
use mongodb::bson::Document;

use super::descriptor::QueryDescriptor;
use crate::interface_types::GatewayError;
use crate::mongodb::{CollectionTrait as _, DatabaseTrait};

type Result<T> = std::result::Result<T, GatewayError>;

/// What came back from the database: a bare cardinality in count mode, or the matching documents
/// in list mode.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryResult {
    Count(u64),
    Documents(Vec<Document>),
}

/// Runs a query descriptor against a collection. In count mode only the filter applies -
/// projection, sort, skip, and limit are ignored. In list mode the driver applies sort before
/// skip and limit.
pub async fn execute_query(
    database: impl DatabaseTrait,
    descriptor: &QueryDescriptor,
    collection_name: &str,
) -> Result<QueryResult> {
    tracing::debug!(collection = collection_name, ?descriptor, "executing query");
    let collection = database.collection(collection_name);
    if descriptor.count_only {
        let count = collection
            .count_documents(descriptor.filter.clone(), None)
            .await?;
        Ok(QueryResult::Count(count))
    } else {
        let cursor = collection
            .find(descriptor.filter.clone(), descriptor.find_options())
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        tracing::debug!(returned = documents.len(), "query returned documents");
        Ok(QueryResult::Documents(documents))
    }
}
