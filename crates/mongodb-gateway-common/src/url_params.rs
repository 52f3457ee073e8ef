use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Parameters extracted from the trailing path segment of a request, in the order they appeared.
/// Later occurrences of a key overwrite earlier ones.
pub type UrlParams = IndexMap<String, ParamValue>;

/// A single URL parameter value. A bare key with no `=` is a presence-only flag; anything else is
/// the raw text after the first `=`. Values are not percent-decoded - the gateway's wire contract
/// treats them as opaque substrings of the path segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    Flag,
    Text(String),
}

impl ParamValue {
    pub fn text(&self) -> Option<&str> {
        match self {
            ParamValue::Flag => None,
            ParamValue::Text(value) => Some(value),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ParamValue::Flag => serializer.serialize_bool(true),
            ParamValue::Text(value) => serializer.serialize_str(value),
        }
    }
}

/// Splits a raw parameter string into key-value pairs. Segments are separated by `&`; each segment
/// is split at its first `=` so values may themselves contain `=`. Never fails - malformed input
/// degrades to best-effort keys.
pub fn parse_url_params(raw: Option<&str>) -> UrlParams {
    let mut params = UrlParams::new();
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return params,
    };
    for segment in raw.split('&') {
        match segment.split_once('=') {
            Some((key, value)) => {
                params.insert(key.to_owned(), ParamValue::Text(value.to_owned()))
            }
            None => params.insert(segment.to_owned(), ParamValue::Flag),
        };
    }
    params
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    use super::{parse_url_params, ParamValue, UrlParams};

    fn text(value: &str) -> ParamValue {
        ParamValue::Text(value.to_owned())
    }

    #[test]
    fn empty_and_absent_input_yield_empty_maps() {
        assert_eq!(parse_url_params(None), UrlParams::new());
        assert_eq!(parse_url_params(Some("")), UrlParams::new());
    }

    #[test]
    fn parses_key_value_pairs_and_flags() {
        assert_eq!(
            parse_url_params(Some("limit=50")),
            IndexMap::from([("limit".to_owned(), text("50"))])
        );
        assert_eq!(
            parse_url_params(Some("count")),
            IndexMap::from([("count".to_owned(), ParamValue::Flag)])
        );
    }

    #[test]
    fn splits_each_segment_at_the_first_equals_only() {
        assert_eq!(
            parse_url_params(Some("q={'nivel':'a=b'}&count")),
            IndexMap::from([
                ("q".to_owned(), text("{'nivel':'a=b'}")),
                ("count".to_owned(), ParamValue::Flag),
            ])
        );
    }

    #[test]
    fn keeps_empty_values_and_does_not_decode() {
        assert_eq!(
            parse_url_params(Some("f=&q=%7B'a'%3A1%7D")),
            IndexMap::from([
                ("f".to_owned(), text("")),
                ("q".to_owned(), text("%7B'a'%3A1%7D")),
            ])
        );
    }

    #[test]
    fn later_occurrences_overwrite_earlier_ones() {
        assert_eq!(
            parse_url_params(Some("limit=10&limit=50")),
            IndexMap::from([("limit".to_owned(), text("50"))])
        );
    }

    #[test]
    fn preserves_parameter_order() {
        let params = parse_url_params(Some("skip=5&count&limit=2"));
        let keys: Vec<&str> = params.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["skip", "count", "limit"]);
    }
}
