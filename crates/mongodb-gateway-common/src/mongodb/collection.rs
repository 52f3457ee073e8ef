use async_trait::async_trait;
use futures_util::Stream;
use mongodb::{
    bson::Document,
    error::Error,
    options::{CountOptions, FindOptions},
    Collection,
};

#[cfg(test)]
use mockall::automock;

#[cfg(test)]
use super::test_helpers::MockCursor;

/// Abstract MongoDB collection methods. This lets us mock a database connection in tests. The
/// automock attribute generates a struct called MockCollectionTrait that implements this trait.
/// The mock provides a variety of methods for mocking and spying on database behavior in tests.
/// See https://docs.rs/mockall/latest/mockall/
///
/// Collections are fixed to `Document` because that is the only instantiation this gateway uses.
#[cfg_attr(test, automock(
    type DocumentCursor = MockCursor<Document>;
))]
#[async_trait]
pub trait CollectionTrait {
    type DocumentCursor: Stream<Item = Result<Document, Error>> + 'static + Unpin;

    async fn find<Options>(
        &self,
        filter: Document,
        options: Options,
    ) -> Result<Self::DocumentCursor, Error>
    where
        Options: Into<Option<FindOptions>> + Send + 'static;

    async fn count_documents<Options>(
        &self,
        filter: Document,
        options: Options,
    ) -> Result<u64, Error>
    where
        Options: Into<Option<CountOptions>> + Send + 'static;
}

#[async_trait]
impl CollectionTrait for Collection<Document> {
    type DocumentCursor = mongodb::Cursor<Document>;

    async fn find<Options>(
        &self,
        filter: Document,
        options: Options,
    ) -> Result<Self::DocumentCursor, Error>
    where
        Options: Into<Option<FindOptions>> + Send + 'static,
    {
        Collection::find(self, filter, options).await
    }

    async fn count_documents<Options>(
        &self,
        filter: Document,
        options: Options,
    ) -> Result<u64, Error>
    where
        Options: Into<Option<CountOptions>> + Send + 'static,
    {
        Collection::count_documents(self, filter, options).await
    }
}
