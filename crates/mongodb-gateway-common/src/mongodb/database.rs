use mongodb::{bson::Document, Collection, Database};

#[cfg(test)]
use mockall::automock;

use super::CollectionTrait;

#[cfg(test)]
use super::MockCollectionTrait;

/// Abstract MongoDB database methods. The automock attribute generates MockDatabaseTrait for
/// injecting a mock driver in tests.
#[cfg_attr(test, automock(
    type Collection = MockCollectionTrait;
))]
pub trait DatabaseTrait {
    type Collection: CollectionTrait;

    fn collection(&self, name: &str) -> Self::Collection;
}

impl DatabaseTrait for Database {
    type Collection = Collection<Document>;

    fn collection(&self, name: &str) -> Self::Collection {
        Database::collection::<Document>(self, name)
    }
}
