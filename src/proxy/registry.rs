use super::instance::{Cloner, Initializer, LazyProxy, Proxy, ProxyShape};
use crate::core::{ProxyError, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Builds an armed, uninitialized instance of one proxy class.
pub type ProxyConstructor = Arc<dyn Fn(Initializer, Cloner) -> Box<dyn Proxy> + Send + Sync>;

/// Proxy classes available to the running process, keyed by proxy class name.
///
/// Loading or in-process generation registers a class here; the factory only
/// instantiates classes found in the registry. Registering a name twice
/// replaces the constructor.
#[derive(Default)]
pub struct ProxyClassRegistry {
    classes: RwLock<HashMap<String, ProxyConstructor>>,
}

impl ProxyClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, proxy_class_name: &str, constructor: ProxyConstructor) -> Result<()> {
        let mut classes = self.classes.write()?;
        classes.insert(proxy_class_name.to_string(), constructor);
        Ok(())
    }

    /// Registers a data-driven proxy class backed by [`LazyProxy`].
    pub fn register_shape(&self, shape: Arc<ProxyShape>) -> Result<()> {
        let name = shape.proxy_class_name.clone();
        let constructor: ProxyConstructor =
            Arc::new(move |initializer: Initializer, cloner: Cloner| -> Box<dyn Proxy> {
                Box::new(LazyProxy::new(shape.clone(), Some(initializer), Some(cloner)))
            });
        self.register(&name, constructor)
    }

    pub fn contains(&self, proxy_class_name: &str) -> Result<bool> {
        Ok(self.classes.read()?.contains_key(proxy_class_name))
    }

    pub fn instantiate(
        &self,
        proxy_class_name: &str,
        initializer: Initializer,
        cloner: Cloner,
    ) -> Result<Box<dyn Proxy>> {
        let constructor = self
            .classes
            .read()?
            .get(proxy_class_name)
            .cloned()
            .ok_or_else(|| ProxyError::ProxyClassNotLoaded(proxy_class_name.to_string()))?;
        Ok(constructor(initializer, cloner))
    }

    pub fn class_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<_> = self.classes.read()?.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    pub fn len(&self) -> usize {
        self.classes.read().map(|classes| classes.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;
    use crate::metadata::ClassMetadata;

    fn noop() -> Initializer {
        Arc::new(|_proxy: &mut dyn Proxy| Ok(()))
    }

    #[test]
    fn test_instantiate_registered_shape() {
        let registry = ProxyClassRegistry::new();
        let metadata = ClassMetadata::new("Tag").id_field("id", DataType::Integer);
        registry
            .register_shape(Arc::new(ProxyShape::from_metadata("P", &metadata)))
            .unwrap();

        assert!(registry.contains("P::__CG__::Tag").unwrap());
        let proxy = registry.instantiate("P::__CG__::Tag", noop(), noop()).unwrap();
        assert_eq!(proxy.entity_class_name(), "Tag");
        assert!(!proxy.is_initialized());
        assert!(proxy.initializer().is_some());
        assert!(proxy.cloner().is_some());
    }

    #[test]
    fn test_unknown_class_is_not_loaded() {
        let registry = ProxyClassRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.instantiate("P::__CG__::Tag", noop(), noop()),
            Err(ProxyError::ProxyClassNotLoaded(_))
        ));
    }
}
