use mongodb::bson::{Bson, Document};

/// Replaces NaN with null throughout a document so that results always serialize to plain JSON.
/// Recursion is over the closed `Bson` variant type; keys, order, and length are preserved.
pub fn sanitize_document(document: Document) -> Document {
    document
        .into_iter()
        .map(|(key, value)| (key, sanitize_value(value)))
        .collect()
}

pub fn sanitize_value(value: Bson) -> Bson {
    match value {
        Bson::Document(document) => Bson::Document(sanitize_document(document)),
        Bson::Array(elements) => {
            Bson::Array(elements.into_iter().map(sanitize_value).collect())
        }
        Bson::Double(number) if number.is_nan() => Bson::Null,
        other => other,
    }
}
