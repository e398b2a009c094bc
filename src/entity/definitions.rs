use super::store::EntityLoader;
use crate::core::{ProxyError, Result, describe_identifier};
use crate::metadata::ClassMetadata;
use crate::proxy::{Cloner, Initializer, Proxy, ProxyDefinition, ProxyDefinitionBuilder, naming};
use log::warn;
use std::sync::Arc;

/// Definition builder for mapped entities whose data comes from an [`EntityLoader`].
///
/// Abstract classes and mapped superclasses are never proxied.
pub struct EntityProxyDefinitions {
    namespace: String,
    loader: Arc<dyn EntityLoader>,
}

impl EntityProxyDefinitions {
    pub fn new(namespace: &str, loader: Arc<dyn EntityLoader>) -> Self {
        Self {
            namespace: namespace.to_string(),
            loader,
        }
    }
}

impl ProxyDefinitionBuilder for EntityProxyDefinitions {
    fn skip_class(&self, metadata: &ClassMetadata) -> bool {
        metadata.is_mapped_superclass() || metadata.is_abstract()
    }

    fn create_proxy_definition(&self, metadata: &Arc<ClassMetadata>) -> Result<ProxyDefinition> {
        let initializer: Initializer = {
            let loader = self.loader.clone();
            let class_name = metadata.name().to_string();
            Arc::new(move |proxy: &mut dyn Proxy| hydrate(loader.as_ref(), &class_name, proxy))
        };

        let cloner: Cloner = {
            let loader = self.loader.clone();
            let class_name = metadata.name().to_string();
            Arc::new(move |proxy: &mut dyn Proxy| {
                if proxy.is_initialized() {
                    return Ok(());
                }
                hydrate(loader.as_ref(), &class_name, proxy)?;
                proxy.set_initialized(true);
                proxy.set_initializer(None);
                proxy.set_cloner(None);
                Ok(())
            })
        };

        Ok(ProxyDefinition::new(
            &naming::proxy_class_name(&self.namespace, metadata.name()),
            metadata.identifier_field_names().to_vec(),
            initializer,
            cloner,
        ))
    }
}

/// Copies the loaded row onto `proxy`, leaving identifier fields as they are.
fn hydrate(loader: &dyn EntityLoader, class_name: &str, proxy: &mut dyn Proxy) -> Result<()> {
    let identifier = proxy.identifier();
    let row = loader
        .load(class_name, &identifier)?
        .ok_or_else(|| ProxyError::EntityNotFound(class_name.to_string(), describe_identifier(&identifier)))?;

    for (field, value) in row {
        if identifier.contains_key(&field) {
            continue;
        }
        match proxy.set_field_raw(&field, value) {
            Ok(()) => {}
            Err(ProxyError::UnknownField(_, field)) => {
                warn!("Ignoring unmapped field '{}' loaded for '{}'", field, class_name);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataType, Identifier, Value};
    use crate::entity::{EntityRow, InMemoryEntityStore};
    use crate::proxy::{LazyProxy, ProxyShape};

    fn metadata() -> Arc<ClassMetadata> {
        Arc::new(
            ClassMetadata::new("Article")
                .id_field("id", DataType::Integer)
                .field("title", DataType::Text),
        )
    }

    fn store_with_article() -> Arc<InMemoryEntityStore> {
        let store = Arc::new(InMemoryEntityStore::new());
        let mut identifier = Identifier::new();
        identifier.insert("id".to_string(), Value::Integer(1));
        let mut row = EntityRow::new();
        row.insert("id".to_string(), Value::Integer(1));
        row.insert("title".to_string(), Value::from("Lazy loading"));
        row.insert("legacy_column".to_string(), Value::Null);
        store.insert("Article", &identifier, row).unwrap();
        store
    }

    fn proxy_for(definition: &ProxyDefinition, id: i64) -> LazyProxy {
        let shape = Arc::new(ProxyShape::from_metadata("Proxies", &metadata()));
        let mut proxy = LazyProxy::new(
            shape,
            Some(definition.initializer().clone()),
            Some(definition.cloner().clone()),
        );
        proxy.set_field_raw("id", Value::Integer(id)).unwrap();
        proxy
    }

    #[test]
    fn test_skips_abstract_and_mapped_superclasses() {
        let builder = EntityProxyDefinitions::new("Proxies", Arc::new(InMemoryEntityStore::new()));
        assert!(builder.skip_class(&ClassMetadata::new("Base").abstract_class()));
        assert!(builder.skip_class(&ClassMetadata::new("Timestamps").mapped_superclass()));
        assert!(!builder.skip_class(&metadata()));
    }

    #[test]
    fn test_initializer_hydrates_from_loader() {
        let store = store_with_article();
        let builder = EntityProxyDefinitions::new("Proxies", store.clone());
        let definition = builder.create_proxy_definition(&metadata()).unwrap();
        assert_eq!(definition.proxy_class_name(), "Proxies::__CG__::Article");

        let mut proxy = proxy_for(&definition, 1);
        assert_eq!(store.load_count(), 0);
        assert_eq!(proxy.get_field("title").unwrap(), Value::from("Lazy loading"));
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn test_missing_entity_surfaces_not_found() {
        let builder = EntityProxyDefinitions::new("Proxies", store_with_article());
        let definition = builder.create_proxy_definition(&metadata()).unwrap();

        let mut proxy = proxy_for(&definition, 2);
        assert!(matches!(
            proxy.get_field("title"),
            Err(ProxyError::EntityNotFound(class, _)) if class == "Article"
        ));
    }

    #[test]
    fn test_cloner_initializes_duplicate_independently() {
        let store = store_with_article();
        let builder = EntityProxyDefinitions::new("Proxies", store.clone());
        let definition = builder.create_proxy_definition(&metadata()).unwrap();

        let proxy = proxy_for(&definition, 1);
        let copy = proxy.duplicate().unwrap();

        assert!(copy.is_initialized());
        assert_eq!(copy.field_raw("title"), Some(&Value::from("Lazy loading")));
        assert!(!proxy.is_initialized());
    }
}
