//! Row to object conversion.

use snafu::{ResultExt, Snafu};
use uuid::Uuid;

use sower_schema::{DataType, Row, Schema, SchemaError, TypeError, Value};
use sower_weaviate::types::WeaviateObject;

/// A row that could not be converted into an object.
#[derive(Debug, Clone, Snafu)]
#[snafu(visibility(pub))]
pub enum BuildError {
    #[snafu(display("type mapping failed: {source}"))]
    Type { source: TypeError },
    #[snafu(display("column {column} does not contain a valid uuid: {value}"))]
    InvalidId { column: String, value: String },
    #[snafu(display("column {column} must contain a vector value, got {actual}"))]
    InvalidVector { column: String, actual: &'static str },
}

/// Converts rows into object creation payloads for one class.
///
/// Construction validates the bound schema once, so unsupported column
/// types surface before any row is processed rather than per row.
#[derive(Debug, Clone)]
pub struct ObjectBuilder {
    class_name: String,
    schema: Schema,
    id_column: Option<String>,
    vector_column: Option<String>,
}

impl ObjectBuilder {
    pub fn new(
        class_name: impl Into<String>,
        schema: Schema,
        id_column: Option<String>,
        vector_column: Option<String>,
    ) -> Result<Self, SchemaError> {
        schema.validate()?;

        if let Some(column) = &id_column {
            schema.require_column(column, DataType::Text)?;
        }
        if let Some(column) = &vector_column {
            schema.require_column(column, DataType::Vector)?;
        }

        // Every remaining column must have a property representation.
        for field in schema.fields() {
            let reserved = Some(field.name()) == id_column.as_deref()
                || Some(field.name()) == vector_column.as_deref();
            if !reserved && !field.data_type().is_property_type() {
                return sower_schema::data_type::UnsupportedColumnTypeSnafu {
                    name: field.name(),
                    data_type: field.data_type(),
                }
                .fail();
            }
        }

        Ok(Self {
            class_name: class_name.into(),
            schema,
            id_column,
            vector_column,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The schema restricted to columns that become class properties.
    pub fn property_schema(&self) -> Schema {
        self.schema
            .fields()
            .iter()
            .filter(|field| {
                Some(field.name()) != self.id_column.as_deref()
                    && Some(field.name()) != self.vector_column.as_deref()
            })
            .cloned()
            .collect()
    }

    /// Builds one object from one row.
    ///
    /// Walks the schema in declaration order, mapping each column value to
    /// its wire representation. The configured id and vector columns go to
    /// the object's dedicated fields and never into the property map.
    pub fn build(&self, row: &Row) -> Result<WeaviateObject, BuildError> {
        let mut object = WeaviateObject::new(self.class_name.clone());

        for field in self.schema.fields() {
            let value = row.value_or_null(field.name());

            if Some(field.name()) == self.id_column.as_deref() {
                object.id = extract_id(field.name(), value)?;
                continue;
            }
            if Some(field.name()) == self.vector_column.as_deref() {
                object.vector = extract_vector(field.name(), value)?;
                continue;
            }

            if let Some(wire) = value.to_wire(field).context(TypeSnafu {})? {
                object.properties.insert(field.name().to_string(), wire);
            }
        }

        Ok(object)
    }
}

fn extract_id(column: &str, value: &Value) -> Result<Option<Uuid>, BuildError> {
    match value {
        Value::Null => Ok(None),
        Value::Text(raw) => {
            let id = Uuid::parse_str(raw).map_err(|_| BuildError::InvalidId {
                column: column.to_string(),
                value: raw.clone(),
            })?;
            Ok(Some(id))
        }
        other => InvalidIdSnafu {
            column,
            value: other.kind(),
        }
        .fail(),
    }
}

fn extract_vector(column: &str, value: &Value) -> Result<Option<Vec<f32>>, BuildError> {
    match value {
        Value::Null => Ok(None),
        Value::Vector(v) => Ok(Some(v.clone())),
        other => InvalidVectorSnafu {
            column,
            actual: other.kind(),
        }
        .fail(),
    }
}
