use super::naming;
use crate::core::{DataType, Identifier, ProxyError, Result, Value};
use crate::metadata::{ClassMetadata, FieldMapping};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Populates a proxy's field data. Runs at most once per successful initialization.
pub type Initializer = Arc<dyn Fn(&mut dyn Proxy) -> Result<()> + Send + Sync>;

/// Runs on the copy when an uninitialized proxy is duplicated.
pub type Cloner = Arc<dyn Fn(&mut dyn Proxy) -> Result<()> + Send + Sync>;

/// Runtime contract of a generated proxy class.
///
/// `field_raw`/`set_field_raw` bypass interception: they never trigger
/// initialization. `get_field`/`set_field` are the intercepted accessors.
pub trait Proxy: Send + Sync + fmt::Debug {
    fn proxy_class_name(&self) -> &str;

    /// Entity class this proxy stands in for.
    fn entity_class_name(&self) -> &str {
        naming::real_class_name(self.proxy_class_name())
    }

    fn is_initialized(&self) -> bool;
    fn set_initialized(&mut self, initialized: bool);

    fn initializer(&self) -> Option<&Initializer>;
    fn set_initializer(&mut self, initializer: Option<Initializer>);

    fn cloner(&self) -> Option<&Cloner>;
    fn set_cloner(&mut self, cloner: Option<Cloner>);

    fn field_raw(&self, field: &str) -> Option<&Value>;
    fn set_field_raw(&mut self, field: &str, value: Value) -> Result<()>;

    /// Identifier field values; readable without initialization.
    fn identifier(&self) -> Identifier;

    fn initialize(&mut self) -> Result<()>;
    fn get_field(&mut self, field: &str) -> Result<Value>;
    fn set_field(&mut self, field: &str, value: Value) -> Result<()>;
    fn duplicate(&self) -> Result<Box<dyn Proxy>>;

    fn as_any(&self) -> &dyn Any;
}

/// Everything a generated proxy class knows about its entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyShape {
    pub proxy_class_name: String,
    pub entity_class_name: String,
    pub identifier_fields: Vec<String>,
    pub fields: Vec<FieldMapping>,
}

impl ProxyShape {
    pub fn from_metadata(namespace: &str, metadata: &ClassMetadata) -> Self {
        Self {
            proxy_class_name: naming::proxy_class_name(namespace, metadata.name()),
            entity_class_name: metadata.name().to_string(),
            identifier_fields: metadata.identifier_field_names().to_vec(),
            fields: metadata.fields().to_vec(),
        }
    }

    pub fn field_type(&self, field: &str) -> Option<&DataType> {
        self.fields
            .iter()
            .find(|mapping| mapping.name == field)
            .map(|mapping| &mapping.data_type)
    }

    pub fn is_identifier(&self, field: &str) -> bool {
        self.identifier_fields.iter().any(|id| id == field)
    }
}

/// The proxy type every generated proxy class instantiates, parameterized by
/// its [`ProxyShape`].
#[derive(Clone)]
pub struct LazyProxy {
    shape: Arc<ProxyShape>,
    values: HashMap<String, Value>,
    initialized: bool,
    initializer: Option<Initializer>,
    cloner: Option<Cloner>,
}

impl LazyProxy {
    pub fn new(shape: Arc<ProxyShape>, initializer: Option<Initializer>, cloner: Option<Cloner>) -> Self {
        let values = shape
            .fields
            .iter()
            .map(|mapping| (mapping.name.clone(), Value::Null))
            .collect();

        Self {
            shape,
            values,
            initialized: false,
            initializer,
            cloner,
        }
    }

    pub fn shape(&self) -> &ProxyShape {
        &self.shape
    }

    fn unknown_field(&self, field: &str) -> ProxyError {
        ProxyError::UnknownField(self.shape.entity_class_name.clone(), field.to_string())
    }
}

impl Proxy for LazyProxy {
    fn proxy_class_name(&self) -> &str {
        &self.shape.proxy_class_name
    }

    fn entity_class_name(&self) -> &str {
        &self.shape.entity_class_name
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn set_initialized(&mut self, initialized: bool) {
        self.initialized = initialized;
    }

    fn initializer(&self) -> Option<&Initializer> {
        self.initializer.as_ref()
    }

    fn set_initializer(&mut self, initializer: Option<Initializer>) {
        self.initializer = initializer;
    }

    fn cloner(&self) -> Option<&Cloner> {
        self.cloner.as_ref()
    }

    fn set_cloner(&mut self, cloner: Option<Cloner>) {
        self.cloner = cloner;
    }

    fn field_raw(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    fn set_field_raw(&mut self, field: &str, value: Value) -> Result<()> {
        let data_type = self
            .shape
            .field_type(field)
            .ok_or_else(|| self.unknown_field(field))?;

        if !data_type.is_compatible(&value) {
            return Err(ProxyError::TypeMismatch(format!(
                "Field '{}.{}' expects {}, got {}",
                self.shape.entity_class_name,
                field,
                data_type,
                value.type_name()
            )));
        }

        self.values.insert(field.to_string(), value);
        Ok(())
    }

    fn identifier(&self) -> Identifier {
        self.shape
            .identifier_fields
            .iter()
            .map(|field| {
                let value = self.values.get(field).cloned().unwrap_or(Value::Null);
                (field.clone(), value)
            })
            .collect()
    }

    fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        let initializer = self.initializer.take().ok_or_else(|| {
            ProxyError::UnsupportedOperation(format!(
                "Proxy '{}' has no initializer armed",
                self.shape.proxy_class_name
            ))
        })?;

        match initializer(&mut *self) {
            Ok(()) => {
                self.initialized = true;
                self.cloner = None;
                Ok(())
            }
            Err(err) => {
                self.initializer = Some(initializer);
                Err(err)
            }
        }
    }

    fn get_field(&mut self, field: &str) -> Result<Value> {
        if !self.values.contains_key(field) {
            return Err(self.unknown_field(field));
        }
        if !self.shape.is_identifier(field) {
            self.initialize()?;
        }
        Ok(self.values.get(field).cloned().unwrap_or(Value::Null))
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<()> {
        if !self.values.contains_key(field) {
            return Err(self.unknown_field(field));
        }
        self.initialize()?;
        self.set_field_raw(field, value)
    }

    fn duplicate(&self) -> Result<Box<dyn Proxy>> {
        let mut copy = self.clone();
        if !copy.initialized {
            if let Some(cloner) = copy.cloner.clone() {
                cloner(&mut copy)?;
            }
        }
        Ok(Box::new(copy))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for LazyProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyProxy")
            .field("class", &self.shape.proxy_class_name)
            .field("identifier", &self.identifier())
            .field("initialized", &self.initialized)
            .field("has_initializer", &self.initializer.is_some())
            .field("has_cloner", &self.cloner.is_some())
            .finish()
    }
}
