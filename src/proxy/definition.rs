use super::instance::{Cloner, Initializer, Proxy};
use crate::core::{ProxyError, Result, Value};
use crate::metadata::ClassMetadata;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Writes one field directly on a proxy, skipping interception.
/// Obtained once when the definition is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSetter {
    field: String,
}

impl FieldSetter {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn set(&self, proxy: &mut dyn Proxy, value: Value) -> Result<()> {
        proxy.set_field_raw(&self.field, value)
    }
}

/// How to build proxies of one entity class. Immutable once built.
#[derive(Clone)]
pub struct ProxyDefinition {
    proxy_class_name: String,
    initializer: Initializer,
    cloner: Cloner,
    identifier_fields: Vec<String>,
    reflection_fields: HashMap<String, FieldSetter>,
}

impl ProxyDefinition {
    pub fn new(
        proxy_class_name: &str,
        identifier_fields: Vec<String>,
        initializer: Initializer,
        cloner: Cloner,
    ) -> Self {
        let reflection_fields = identifier_fields
            .iter()
            .map(|field| (field.clone(), FieldSetter::new(field)))
            .collect();

        Self {
            proxy_class_name: proxy_class_name.to_string(),
            initializer,
            cloner,
            identifier_fields,
            reflection_fields,
        }
    }

    pub fn proxy_class_name(&self) -> &str {
        &self.proxy_class_name
    }

    pub fn initializer(&self) -> &Initializer {
        &self.initializer
    }

    pub fn cloner(&self) -> &Cloner {
        &self.cloner
    }

    pub fn identifier_fields(&self) -> &[String] {
        &self.identifier_fields
    }

    pub fn reflection_fields(&self) -> &HashMap<String, FieldSetter> {
        &self.reflection_fields
    }

    pub fn reflection_field(&self, field: &str) -> Result<&FieldSetter> {
        self.reflection_fields.get(field).ok_or_else(|| {
            ProxyError::UnknownField(self.proxy_class_name.clone(), field.to_string())
        })
    }
}

impl fmt::Debug for ProxyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyDefinition")
            .field("proxy_class_name", &self.proxy_class_name)
            .field("identifier_fields", &self.identifier_fields)
            .finish_non_exhaustive()
    }
}

/// Extension points a concrete factory supplies.
pub trait ProxyDefinitionBuilder: Send + Sync {
    /// Whether `metadata` must not be proxied (and not pre-generated).
    fn skip_class(&self, metadata: &ClassMetadata) -> bool;

    fn create_proxy_definition(&self, metadata: &Arc<ClassMetadata>) -> Result<ProxyDefinition>;

    /// Called instead of `create_proxy_definition` when a proxy is requested
    /// for a skipped class.
    fn skipped_class(&self, metadata: &Arc<ClassMetadata>) -> Result<ProxyDefinition> {
        Err(ProxyError::UnsupportedOperation(format!(
            "Class '{}' cannot be proxied",
            metadata.name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;
    use crate::proxy::instance::{LazyProxy, ProxyShape};

    #[test]
    fn test_setters_precomputed_per_identifier_field() {
        let noop: Initializer = Arc::new(|_proxy: &mut dyn Proxy| Ok(()));
        let definition = ProxyDefinition::new(
            "P::__CG__::Line",
            vec!["order".to_string(), "line".to_string()],
            noop.clone(),
            noop,
        );

        assert_eq!(definition.identifier_fields(), &["order", "line"]);
        assert_eq!(definition.reflection_fields().len(), 2);
        assert_eq!(definition.reflection_field("line").unwrap().field(), "line");
        assert!(definition.reflection_field("qty").is_err());
    }

    #[test]
    fn test_setter_bypasses_initialization() {
        let metadata = ClassMetadata::new("Line").id_field("line", DataType::Integer);
        let shape = Arc::new(ProxyShape::from_metadata("P", &metadata));
        let mut proxy = LazyProxy::new(shape, None, None);

        FieldSetter::new("line").set(&mut proxy, Value::Integer(3)).unwrap();
        assert_eq!(proxy.field_raw("line"), Some(&Value::Integer(3)));
        assert!(!proxy.is_initialized());
    }
}
