use bson::Bson;
use larder_core::doc::{Document, Value};

/// Converts a BSON document into the engine's read-only document form.
pub(crate) fn to_document(doc: &bson::Document) -> Document {
    doc.iter()
        .map(|(key, value)| (key.clone(), to_value(value)))
        .collect()
}

pub(crate) fn to_value(bson: &Bson) -> Value {
    match bson {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(v) => Value::Bool(*v),
        Bson::Int32(v) => Value::I64(*v as i64),
        Bson::Int64(v) => Value::I64(*v),
        Bson::Double(v) => Value::F64(*v),
        Bson::String(v) => Value::String(v.clone()),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(v) => Value::I64(v.timestamp_millis()),
        Bson::Decimal128(v) => Value::String(v.to_string()),
        Bson::Array(items) => Value::List(items.iter().map(to_value).collect()),
        Bson::Document(doc) => Value::Nested(to_document(doc)),
        // binary, regex, and friends have no scalar destination form;
        // carry their display form so the value survives lossily
        other => Value::String(other.to_string()),
    }
}
