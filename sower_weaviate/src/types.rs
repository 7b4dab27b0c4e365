//! Wire payload types for the Weaviate REST API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use sower_schema::Schema;
use uuid::Uuid;

/// A single object creation payload.
///
/// Serialized as `{class, properties, id?, vector?}`; the batch endpoint
/// takes an array of these under an `objects` key. Derived deterministically
/// from one row and its schema, immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaviateObject {
    pub class: String,
    pub properties: Map<String, JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
}

impl WeaviateObject {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            properties: Map::new(),
            id: None,
            vector: None,
        }
    }
}

/// A class (schema unit) definition for the schema endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub class: String,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vectorizer: Option<String>,
}

/// A single property in a class definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(rename = "dataType")]
    pub data_type: Vec<String>,
}

impl ClassDefinition {
    /// A bare class with no declared properties.
    pub fn named(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            properties: Vec::new(),
            vectorizer: None,
        }
    }

    /// Derives a class definition from a dataset schema.
    ///
    /// Columns whose type has no property representation (vectors) are
    /// skipped; the caller is expected to have routed those to the object's
    /// vector field instead.
    pub fn from_schema(class: impl Into<String>, schema: &Schema) -> Self {
        let properties = schema
            .fields()
            .iter()
            .filter_map(|field| {
                field.data_type().weaviate_name().map(|name| PropertyDefinition {
                    name: field.name().to_string(),
                    data_type: vec![name.to_string()],
                })
            })
            .collect();

        Self {
            class: class.into(),
            properties,
            vectorizer: None,
        }
    }
}

/// Per-object outcome returned by the batch endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectResult {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub result: ResultStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultStatus {
    #[serde(default)]
    pub status: ObjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorPayload>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectStatus {
    #[default]
    Success,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error: Vec<ErrorMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ObjectResult {
    pub fn is_success(&self) -> bool {
        self.result.status == ObjectStatus::Success
    }

    /// The server's error detail for a failed object, joined into one line.
    pub fn error_message(&self) -> Option<String> {
        let payload = self.result.errors.as_ref()?;
        if payload.error.is_empty() {
            return None;
        }
        Some(
            payload
                .error
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// An object as returned by the object listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedObject {
    pub class: String,
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub properties: Map<String, JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
}

/// Response page for the object listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectsPage {
    #[serde(default)]
    pub objects: Vec<RetrievedObject>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sower_schema::{DataType, Field};

    use super::*;

    #[test]
    fn test_object_serialization_omits_absent_id_and_vector() {
        let mut object = WeaviateObject::new("Article");
        object.properties.insert("title".into(), json!("Sam"));

        let wire = serde_json::to_value(&object).unwrap();
        assert_eq!(wire, json!({ "class": "Article", "properties": { "title": "Sam" } }));
    }

    #[test]
    fn test_object_serialization_includes_id_and_vector() {
        let id = Uuid::new_v4();
        let mut object = WeaviateObject::new("Article");
        object.id = Some(id);
        object.vector = Some(vec![0.1, 0.2]);

        let wire = serde_json::to_value(&object).unwrap();
        assert_eq!(wire["id"], json!(id.to_string()));
        assert_eq!(wire["vector"], json!([0.1, 0.2]));
    }

    #[test]
    fn test_class_definition_from_schema_skips_vector_columns() {
        let schema = Schema::new(vec![
            Field::new("title", DataType::Text, true),
            Field::new("keywords", DataType::TextArray, true),
            Field::new("embedding", DataType::Vector, true),
        ]);
        let definition = ClassDefinition::from_schema("Article", &schema);

        assert_eq!(definition.class, "Article");
        assert_eq!(definition.properties.len(), 2);
        assert_eq!(definition.properties[0].name, "title");
        assert_eq!(definition.properties[0].data_type, vec!["text"]);
        assert_eq!(definition.properties[1].name, "keywords");
        assert_eq!(definition.properties[1].data_type, vec!["text[]"]);
    }

    #[test]
    fn test_object_result_parses_server_failure() {
        let raw = json!({
            "id": "5c372f32-4b3b-4e8f-8787-2bbbd3b0a6c1",
            "result": {
                "status": "FAILED",
                "errors": { "error": [
                    { "message": "invalid text property" },
                    { "message": "schema mismatch" }
                ]}
            }
        });
        let result: ObjectResult = serde_json::from_value(raw).unwrap();
        assert!(!result.is_success());
        assert_eq!(
            result.error_message().as_deref(),
            Some("invalid text property; schema mismatch")
        );
    }

    #[test]
    fn test_object_result_defaults_to_success() {
        let result: ObjectResult = serde_json::from_value(json!({})).unwrap();
        assert!(result.is_success());
        assert_eq!(result.error_message(), None);
    }
}
