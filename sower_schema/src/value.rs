//! Typed column values and their mapping to Weaviate wire values.

use serde_json::{json, Value as JsonValue};
use snafu::Snafu;

use crate::data_type::{DataType, Field};

/// A typed column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    TextArray(Vec<String>),
    Int(i64),
    Number(f64),
    Boolean(bool),
    /// RFC 3339 timestamp.
    Date(String),
    Geo { latitude: f64, longitude: f64 },
    Vector(Vec<f32>),
    /// Beacon URIs pointing at other objects.
    Reference(Vec<String>),
}

#[derive(Debug, Clone, Snafu)]
#[snafu(visibility(pub))]
pub enum TypeError {
    #[snafu(display("column {column} is not nullable but the value is null"))]
    NullValue { column: String },
    #[snafu(display("column {column} expects {expected} but the value is {actual}"))]
    Mismatch {
        column: String,
        expected: DataType,
        actual: &'static str,
    },
}

impl Value {
    /// A short name for the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::TextArray(_) => "text array",
            Value::Int(_) => "int",
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::Date(_) => "date",
            Value::Geo { .. } => "geo coordinates",
            Value::Vector(_) => "vector",
            Value::Reference(_) => "reference",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Converts the value to its wire representation for the given column.
    ///
    /// Returns `Ok(None)` for a null value in a nullable column: the target
    /// API treats an absent property as unset, so the property must be
    /// omitted rather than serialized as a JSON null. An empty text array is
    /// an empty list on the wire, never an omitted property.
    pub fn to_wire(&self, field: &Field) -> Result<Option<JsonValue>, TypeError> {
        if self.is_null() {
            if field.is_nullable() {
                return Ok(None);
            }
            return NullValueSnafu {
                column: field.name(),
            }
            .fail();
        }

        let wire = match (field.data_type(), self) {
            (DataType::Text, Value::Text(s)) => json!(s),
            (DataType::TextArray, Value::TextArray(items)) => json!(items),
            (DataType::Int, Value::Int(n)) => json!(n),
            (DataType::Number, Value::Number(n)) => json!(n),
            (DataType::Number, Value::Int(n)) => json!(*n as f64),
            (DataType::Boolean, Value::Boolean(b)) => json!(b),
            (DataType::Date, Value::Date(ts)) => json!(ts),
            (
                DataType::GeoCoordinates,
                Value::Geo {
                    latitude,
                    longitude,
                },
            ) => json!({ "latitude": latitude, "longitude": longitude }),
            (DataType::Vector, Value::Vector(v)) => json!(v),
            (DataType::Reference, Value::Reference(beacons)) => {
                json!(beacons
                    .iter()
                    .map(|b| json!({ "beacon": b }))
                    .collect::<Vec<_>>())
            }
            (expected, actual) => {
                return MismatchSnafu {
                    column: field.name(),
                    expected,
                    actual: actual.kind(),
                }
                .fail();
            }
        };

        Ok(Some(wire))
    }
}
