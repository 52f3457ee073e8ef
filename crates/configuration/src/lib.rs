mod configuration;

pub use crate::configuration::{CollectionsSpec, Configuration, ALL_COLLECTIONS_SENTINEL};
