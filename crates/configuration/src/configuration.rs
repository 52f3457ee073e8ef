use std::collections::BTreeSet;
use std::convert::Infallible;
use std::str::FromStr;

use serde::Serialize;

/// Value of the collections flag that stands for "every collection currently in the database".
pub const ALL_COLLECTIONS_SENTINEL: &str = "_all";

/// Process-wide gateway configuration. Built once at startup and shared read-only for the life of
/// the process - request handlers receive it behind an `Arc` and never mutate it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// MongoDB server host name
    pub mongo_host: String,

    /// MongoDB server port number
    pub mongo_port: u16,

    /// Optional database credentials
    pub mongo_user: Option<String>,
    #[serde(skip_serializing)]
    pub mongo_password: Option<String>,

    /// Name of the database queries run against
    pub database: String,

    /// Collections the gateway is permitted to query. Non-empty - startup fails otherwise.
    pub collections: BTreeSet<String>,

    /// Enables diagnostic logging of constructed queries and responses
    pub verbose: bool,
}

impl Configuration {
    /// Membership test against the collection whitelist. Callers must refuse to run a query when
    /// this returns false.
    pub fn is_collection_permitted(&self, collection_name: &str) -> bool {
        self.collections.contains(collection_name)
    }
}

/// Collection whitelist as given on the command line, before resolution against the database.
/// Either the `_all` sentinel, or an explicit comma-separated list of names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollectionsSpec {
    All,
    Explicit(Vec<String>),
}

impl FromStr for CollectionsSpec {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.eq_ignore_ascii_case(ALL_COLLECTIONS_SENTINEL) {
            Ok(CollectionsSpec::All)
        } else {
            Ok(CollectionsSpec::Explicit(
                input
                    .split(',')
                    .map(|name| name.trim().to_owned())
                    .filter(|name| !name.is_empty())
                    .collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{CollectionsSpec, Configuration};

    fn example_configuration() -> Configuration {
        Configuration {
            mongo_host: "localhost".to_owned(),
            mongo_port: 27017,
            mongo_user: None,
            mongo_password: None,
            database: "inventario".to_owned(),
            collections: ["articulos".to_owned(), "ventas".to_owned()].into(),
            verbose: false,
        }
    }

    #[test]
    fn permits_whitelisted_collections_only() {
        let configuration = example_configuration();
        assert!(configuration.is_collection_permitted("articulos"));
        assert!(configuration.is_collection_permitted("ventas"));
        assert!(!configuration.is_collection_permitted("usuarios"));
        assert!(!configuration.is_collection_permitted(""));
    }

    #[test]
    fn parses_all_sentinel_case_insensitively() {
        assert_eq!("_all".parse(), Ok(CollectionsSpec::All));
        assert_eq!("_ALL".parse(), Ok(CollectionsSpec::All));
    }

    #[test]
    fn parses_explicit_collection_list() {
        assert_eq!(
            "articulos, ventas".parse(),
            Ok(CollectionsSpec::Explicit(vec![
                "articulos".to_owned(),
                "ventas".to_owned()
            ]))
        );
    }

    #[test]
    fn drops_empty_names_from_explicit_list() {
        assert_eq!(
            "articulos,,".parse(),
            Ok(CollectionsSpec::Explicit(vec!["articulos".to_owned()]))
        );
    }
}
