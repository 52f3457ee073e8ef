use futures_util::stream::{iter, Iter};
use mongodb::{
    bson::Document,
    error::Error,
    options::{CountOptions, FindOptions},
};
use pretty_assertions::assert_eq;

use super::{MockCollectionTrait, MockDatabaseTrait};

// The mock cursor type wraps a Vec iterator in `Iter`, which implements `Stream` (and by
// extension `TryStreamExt`). Use the `mock_stream` function to produce one.
pub type MockCursor<T> = Iter<<Vec<Result<T, Error>> as IntoIterator>::IntoIter>;

/// Create a stream that can be returned from mock implementations of CollectionTrait::find.
pub fn mock_stream<T>(items: Vec<Result<T, Error>>) -> MockCursor<T> {
    iter(items)
}

/// Mocks the result of a find call on a given collection, ignoring the options passed in.
pub fn mock_collection_find_response(
    collection: impl ToString,
    result: Vec<Document>,
) -> MockDatabaseTrait {
    let collection_name = collection.to_string();

    let mut db = MockDatabaseTrait::new();
    db.expect_collection().returning(move |name| {
        assert_eq!(name, collection_name, "unexpected target for mock find");

        // Clones to work around ownership issues - these closures are `FnMut`, not `FnOnce`.
        let per_collection_result = result.clone();

        let mut mock_collection = MockCollectionTrait::new();
        mock_collection
            .expect_find()
            .returning(move |_filter, _options: FindOptions| {
                Ok(mock_stream(
                    per_collection_result.clone().into_iter().map(Ok).collect(),
                ))
            });
        mock_collection
    });
    db
}

/// Mocks the result of a find call on a given collection. Asserts that the filter and the
/// pagination-relevant options the find call receives match the given ones.
pub fn mock_collection_find_response_for_options(
    collection: impl ToString,
    expected_filter: Document,
    expected_options: FindOptions,
    result: Vec<Document>,
) -> MockDatabaseTrait {
    let collection_name = collection.to_string();

    let mut db = MockDatabaseTrait::new();
    db.expect_collection().returning(move |name| {
        assert_eq!(name, collection_name, "unexpected target for mock find");

        let per_collection_filter = expected_filter.clone();
        let per_collection_options = expected_options.clone();
        let per_collection_result = result.clone();

        let mut mock_collection = MockCollectionTrait::new();
        mock_collection
            .expect_find()
            .returning(move |filter, options: FindOptions| {
                assert_eq!(
                    filter, per_collection_filter,
                    "actual filter (left) did not match expected (right)"
                );
                assert_eq!(options.projection, per_collection_options.projection);
                assert_eq!(options.sort, per_collection_options.sort);
                assert_eq!(options.skip, per_collection_options.skip);
                assert_eq!(options.limit, per_collection_options.limit);
                Ok(mock_stream(
                    per_collection_result.clone().into_iter().map(Ok).collect(),
                ))
            });
        mock_collection
    });
    db
}

/// Mocks the result of a count_documents call on a given collection. Asserts that only the
/// expected filter is passed through.
pub fn mock_collection_count_response(
    collection: impl ToString,
    expected_filter: Document,
    count: u64,
) -> MockDatabaseTrait {
    let collection_name = collection.to_string();

    let mut db = MockDatabaseTrait::new();
    db.expect_collection().returning(move |name| {
        assert_eq!(name, collection_name, "unexpected target for mock count");

        let per_collection_filter = expected_filter.clone();

        let mut mock_collection = MockCollectionTrait::new();
        mock_collection.expect_count_documents().returning(
            move |filter, _options: Option<CountOptions>| {
                assert_eq!(
                    filter, per_collection_filter,
                    "actual filter (left) did not match expected (right)"
                );
                Ok(count)
            },
        );
        mock_collection
    });
    db
}
