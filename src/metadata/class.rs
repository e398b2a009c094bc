use crate::core::DataType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

impl FieldMapping {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
        }
    }
}

/// Shape of a mapped entity class: its canonical name, fields and identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMetadata {
    name: String,
    #[serde(default)]
    identifier: Vec<String>,
    #[serde(default)]
    fields: Vec<FieldMapping>,
    #[serde(default, rename = "abstract")]
    is_abstract: bool,
    #[serde(default)]
    mapped_superclass: bool,
}

impl ClassMetadata {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            identifier: Vec::new(),
            fields: Vec::new(),
            is_abstract: false,
            mapped_superclass: false,
        }
    }

    /// Adds a field mapping
    pub fn field(mut self, name: &str, data_type: DataType) -> Self {
        self.fields.push(FieldMapping::new(name, data_type));
        self
    }

    /// Adds a field mapping and marks it as part of the identifier
    pub fn id_field(mut self, name: &str, data_type: DataType) -> Self {
        self.fields.push(FieldMapping::new(name, data_type));
        self.identifier.push(name.to_string());
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn mapped_superclass(mut self) -> Self {
        self.mapped_superclass = true;
        self
    }

    /// Canonical class name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identifier_field_names(&self) -> &[String] {
        &self.identifier
    }

    pub fn fields(&self) -> &[FieldMapping] {
        &self.fields
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_mapped_superclass(&self) -> bool {
        self.mapped_superclass
    }

    pub fn field_type(&self, name: &str) -> Option<&DataType> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.data_type)
    }

    pub fn is_identifier(&self, name: &str) -> bool {
        self.identifier.iter().any(|field| field == name)
    }

    /// Names of identifier fields that have no field mapping.
    pub fn unmapped_identifier_fields(&self) -> Vec<&str> {
        self.identifier
            .iter()
            .filter(|id| self.field_type(id).is_none())
            .map(|id| id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_tracks_identifier_order() {
        let meta = ClassMetadata::new("Order")
            .id_field("tenant", DataType::Text)
            .id_field("number", DataType::Integer)
            .field("total", DataType::Float);

        assert_eq!(meta.identifier_field_names(), &["tenant", "number"]);
        assert!(meta.is_identifier("number"));
        assert!(!meta.is_identifier("total"));
        assert_eq!(meta.field_type("total"), Some(&DataType::Float));
        assert!(meta.unmapped_identifier_fields().is_empty());
    }

    #[test]
    fn test_deserialize_defaults() {
        let meta: ClassMetadata = serde_json::from_str(
            r#"{"name": "Tag", "identifier": ["id"], "fields": [{"name": "id", "type": "integer"}]}"#,
        )
        .unwrap();

        assert_eq!(meta.name(), "Tag");
        assert!(!meta.is_abstract());
        assert!(!meta.is_mapped_superclass());
    }
}
