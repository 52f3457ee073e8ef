mod collection;
mod database;

#[cfg(test)]
pub mod test_helpers;

pub use self::collection::CollectionTrait;
pub use self::database::DatabaseTrait;

#[cfg(test)]
pub use self::collection::MockCollectionTrait;
#[cfg(test)]
pub use self::database::MockDatabaseTrait;
