// ============================================================================
// lazyproxy Library
// ============================================================================

pub mod config;
pub mod core;
pub mod entity;
pub mod generator;
pub mod metadata;
pub mod proxy;

// Re-export main types for convenience
pub use config::ProxyConfig;
pub use crate::core::{DataType, Identifier, ProxyError, Result, Value};
pub use entity::{EntityLoader, EntityProxyDefinitions, EntityRow, InMemoryEntityStore};
pub use generator::{
    ArtifactTarget, FileProxyLoader, ManifestGenerator, ProxyArtifact, ProxyGenerator, ProxyLoader,
};
pub use metadata::{ClassMetadata, FieldMapping, InMemoryCatalog, MetadataCatalog};
pub use proxy::{
    AutogenerateMode, Cloner, FieldSetter, GenerationAction, Initializer, LazyProxy, Proxy,
    ProxyClassRegistry, ProxyDefinition, ProxyDefinitionBuilder, ProxyFactory, ProxyShape,
    ProxyToolchain,
};

// ============================================================================
// Entity proxies from configuration
// ============================================================================

/// Builds a [`ProxyFactory`] for entity classes from `config`, with artifacts
/// stored under `config.proxy_dir` and entity data read through `loader`.
///
/// # Examples
///
/// ```
/// use lazyproxy::{
///     AutogenerateMode, ClassMetadata, DataType, Identifier, InMemoryCatalog,
///     InMemoryEntityStore, Proxy, ProxyConfig, Value,
/// };
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = InMemoryCatalog::new().with_class(
///     ClassMetadata::new("User")
///         .id_field("id", DataType::Integer)
///         .field("name", DataType::Text),
/// )?;
/// let config = ProxyConfig::default().autogenerate(AutogenerateMode::Eval);
/// let factory = lazyproxy::entity_proxy_factory(
///     &config,
///     Arc::new(catalog),
///     Arc::new(InMemoryEntityStore::new()),
/// );
///
/// let mut identifier = Identifier::new();
/// identifier.insert("id".to_string(), Value::Integer(42));
/// let mut user = factory.get_proxy("User", &identifier)?;
///
/// assert_eq!(user.get_field("id")?, Value::Integer(42));
/// assert!(!user.is_initialized());
/// # Ok(())
/// # }
/// ```
pub fn entity_proxy_factory(
    config: &ProxyConfig,
    catalog: std::sync::Arc<dyn MetadataCatalog>,
    loader: std::sync::Arc<dyn EntityLoader>,
) -> ProxyFactory {
    let definitions = EntityProxyDefinitions::new(&config.proxy_namespace, loader);
    ProxyFactory::from_config(config, catalog, std::sync::Arc::new(definitions))
}
