use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// The semantic type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// UTF-8 text.
    Text,
    /// Ordered list of UTF-8 text values.
    TextArray,
    /// A signed 64-bit integer.
    Int,
    /// A 64-bit floating point number.
    Number,
    /// A boolean.
    Boolean,
    /// An RFC 3339 timestamp.
    Date,
    /// A geographic coordinate pair.
    GeoCoordinates,
    /// A dense float vector.
    ///
    /// Weaviate stores vectors outside the property map, so this type is
    /// only valid for the column designated as the vector column.
    Vector,
    /// A cross-reference to other objects, as beacon URIs.
    Reference,
}

impl DataType {
    /// The Weaviate property data type name, or `None` for types that
    /// cannot appear in a class property.
    pub fn weaviate_name(&self) -> Option<&'static str> {
        match self {
            DataType::Text => Some("text"),
            DataType::TextArray => Some("text[]"),
            DataType::Int => Some("int"),
            DataType::Number => Some("number"),
            DataType::Boolean => Some("boolean"),
            DataType::Date => Some("date"),
            DataType::GeoCoordinates => Some("geoCoordinates"),
            DataType::Vector => None,
            DataType::Reference => Some("cref"),
        }
    }

    /// Whether this type can be used for a regular class property.
    pub fn is_property_type(&self) -> bool {
        self.weaviate_name().is_some()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.weaviate_name().unwrap_or("vector"))
    }
}

/// A named, typed dataset column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    name: String,
    data_type: DataType,
    nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

/// An ordered collection of fields, immutable once bound to a write job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

#[derive(Debug, Clone, Snafu)]
#[snafu(visibility(pub))]
pub enum SchemaError {
    #[snafu(display("schema contains a column with an empty name"))]
    EmptyColumnName,
    #[snafu(display("schema contains duplicate column {name}"))]
    DuplicateColumn { name: String },
    #[snafu(display("column {name} has type {data_type} which cannot be used as a class property"))]
    UnsupportedColumnType { name: String, data_type: DataType },
    #[snafu(display("column {name} is not part of the schema"))]
    UnknownColumn { name: String },
    #[snafu(display("column {name} has type {actual} but {expected} is required"))]
    ColumnTypeRequired {
        name: String,
        expected: DataType,
        actual: DataType,
    },
}

impl Schema {
    /// Creates a schema from fields in declaration order.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Checks structural validity: no empty or duplicate column names.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name().is_empty() {
                return EmptyColumnNameSnafu {}.fail();
            }
            if !seen.insert(field.name()) {
                return DuplicateColumnSnafu { name: field.name() }.fail();
            }
        }
        Ok(())
    }

    /// Requires that `name` exists and has the given type.
    pub fn require_column(&self, name: &str, expected: DataType) -> Result<&Field, SchemaError> {
        let field = self
            .field(name)
            .ok_or_else(|| SchemaError::UnknownColumn { name: name.into() })?;
        if field.data_type() != expected {
            return ColumnTypeRequiredSnafu {
                name,
                expected,
                actual: field.data_type(),
            }
            .fail();
        }
        Ok(field)
    }
}

impl FromIterator<Field> for Schema {
    fn from_iter<T: IntoIterator<Item = Field>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
