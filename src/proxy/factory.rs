use super::definition::{ProxyDefinition, ProxyDefinitionBuilder};
use super::instance::Proxy;
use super::naming;
use super::registry::ProxyClassRegistry;
use super::strategy::{AutogenerateMode, GenerationAction};
use crate::config::ProxyConfig;
use crate::core::{Identifier, ProxyError, Result};
use crate::generator::{ArtifactTarget, FileProxyLoader, ManifestGenerator, ProxyGenerator, ProxyLoader};
use crate::metadata::{ClassMetadata, MetadataCatalog};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{Level, event, info_span};

/// Generator, loader and the registry they both feed.
#[derive(Clone)]
pub struct ProxyToolchain {
    pub generator: Arc<dyn ProxyGenerator>,
    pub loader: Arc<dyn ProxyLoader>,
    pub registry: Arc<ProxyClassRegistry>,
}

impl ProxyToolchain {
    /// Manifest artifacts under `config.proxy_dir`, loaded from disk.
    pub fn from_config(config: &ProxyConfig) -> Self {
        let registry = Arc::new(ProxyClassRegistry::new());
        Self {
            generator: Arc::new(ManifestGenerator::new(
                &config.proxy_dir,
                &config.proxy_namespace,
                registry.clone(),
            )),
            loader: Arc::new(FileProxyLoader::new(registry.clone())),
            registry,
        }
    }
}

/// Creates lazy proxies for entity classes.
///
/// Definitions are resolved on first use and cached by canonical class name
/// for the lifetime of the factory. The factory can be shared across threads;
/// two threads racing on the same cold class may both generate, and the first
/// definition stored wins.
pub struct ProxyFactory {
    catalog: Arc<dyn MetadataCatalog>,
    toolchain: ProxyToolchain,
    definitions_builder: Arc<dyn ProxyDefinitionBuilder>,
    autogenerate: AutogenerateMode,
    definitions: RwLock<HashMap<String, Arc<ProxyDefinition>>>,
}

impl ProxyFactory {
    pub fn new(
        catalog: Arc<dyn MetadataCatalog>,
        toolchain: ProxyToolchain,
        definitions_builder: Arc<dyn ProxyDefinitionBuilder>,
        autogenerate: AutogenerateMode,
    ) -> Self {
        Self {
            catalog,
            toolchain,
            definitions_builder,
            autogenerate,
            definitions: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(
        config: &ProxyConfig,
        catalog: Arc<dyn MetadataCatalog>,
        definitions_builder: Arc<dyn ProxyDefinitionBuilder>,
    ) -> Self {
        Self::new(
            catalog,
            ProxyToolchain::from_config(config),
            definitions_builder,
            config.autogenerate,
        )
    }

    pub fn autogenerate_mode(&self) -> AutogenerateMode {
        self.autogenerate
    }

    pub fn registry(&self) -> &Arc<ProxyClassRegistry> {
        &self.toolchain.registry
    }

    /// Number of cached definitions
    pub fn definition_count(&self) -> Result<usize> {
        Ok(self.definitions.read()?.len())
    }

    /// Returns an uninitialized proxy of `class_name` with its identifier
    /// fields set. Reading identifier fields never initializes the proxy.
    pub fn get_proxy(&self, class_name: &str, identifier: &Identifier) -> Result<Box<dyn Proxy>> {
        let definition = self.definition(class_name)?;

        let missing = definition
            .identifier_fields()
            .iter()
            .find(|field| !identifier.contains_key(field.as_str()));
        if let Some(field) = missing {
            return Err(ProxyError::MissingIdentifier(
                naming::real_class_name(definition.proxy_class_name()).to_string(),
                field.clone(),
            ));
        }

        let mut proxy = self.toolchain.registry.instantiate(
            definition.proxy_class_name(),
            definition.initializer().clone(),
            definition.cloner().clone(),
        )?;

        for field in definition.identifier_fields() {
            let setter = definition.reflection_field(field)?;
            let value = identifier[field.as_str()].clone();
            setter.set(proxy.as_mut(), value)?;
        }

        Ok(proxy)
    }

    /// Re-arms an uninitialized proxy with the current initializer and cloner
    /// of its class. Fails without touching the proxy if it is initialized.
    pub fn reset_uninitialized_proxy<'a, P>(&self, proxy: &'a mut P) -> Result<&'a mut P>
    where
        P: Proxy + ?Sized,
    {
        if proxy.is_initialized() {
            return Err(ProxyError::uninitialized_proxy_expected(proxy.proxy_class_name()));
        }

        let class_name = proxy.entity_class_name().to_string();
        let definition = self.definition(&class_name)?;

        proxy.set_initializer(Some(definition.initializer().clone()));
        proxy.set_cloner(Some(definition.cloner().clone()));
        Ok(proxy)
    }

    /// Writes proxy artifacts for `classes` into `target_dir` (or the
    /// generator's default directory), overwriting existing ones. Returns how
    /// many were generated; skipped classes are not counted.
    pub fn generate_proxy_classes(
        &self,
        classes: &[Arc<ClassMetadata>],
        target_dir: Option<&Path>,
    ) -> Result<usize> {
        let mut generated = 0;

        for metadata in classes {
            if self.definitions_builder.skip_class(metadata) {
                event!(Level::DEBUG, class = metadata.name(), "skipping proxy generation");
                continue;
            }

            let path = self.toolchain.generator.artifact_path(metadata.name(), target_dir);
            self.toolchain
                .generator
                .materialize(metadata, ArtifactTarget::File(&path))?;
            generated += 1;
        }

        event!(Level::INFO, generated, requested = classes.len(), "generated proxy classes");
        Ok(generated)
    }

    fn definition(&self, class_name: &str) -> Result<Arc<ProxyDefinition>> {
        if let Some(definition) = self.definitions.read()?.get(class_name) {
            return Ok(Arc::clone(definition));
        }

        let metadata = self.catalog.metadata_for(class_name)?;
        let canonical = metadata.name();
        if let Some(definition) = self.definitions.read()?.get(canonical) {
            return Ok(Arc::clone(definition));
        }

        let span = info_span!("proxy_definition", class = canonical, mode = %self.autogenerate);
        let _enter = span.enter();

        let definition = if self.definitions_builder.skip_class(&metadata) {
            event!(Level::DEBUG, "class skipped by definition builder");
            self.definitions_builder.skipped_class(&metadata)?
        } else {
            self.definitions_builder.create_proxy_definition(&metadata)?
        };
        self.ensure_proxy_class(&metadata, definition.proxy_class_name())?;

        let mut definitions = self.definitions.write()?;
        let definition = definitions
            .entry(canonical.to_string())
            .or_insert_with(|| Arc::new(definition));
        Ok(Arc::clone(definition))
    }

    /// Makes `proxy_class_name` available in the registry according to the
    /// autogeneration mode.
    fn ensure_proxy_class(&self, metadata: &ClassMetadata, proxy_class_name: &str) -> Result<()> {
        let registry = &self.toolchain.registry;
        if registry.contains(proxy_class_name)? {
            return Ok(());
        }

        let generator = &self.toolchain.generator;
        let loader = &self.toolchain.loader;
        let path = generator.artifact_path(metadata.name(), None);
        let artifact_exists = self.autogenerate.probes_artifact() && loader.artifact_exists(&path);

        let action = self.autogenerate.decide(artifact_exists);
        event!(Level::DEBUG, ?action, artifact = %path.display(), "resolving proxy class");

        match action {
            GenerationAction::Load => loader.load(&path, proxy_class_name)?,
            GenerationAction::GenerateAndLoad => {
                generator.materialize(metadata, ArtifactTarget::File(&path))?;
                loader.load(&path, proxy_class_name)?;
            }
            GenerationAction::GenerateInProcess => {
                generator.materialize(metadata, ArtifactTarget::InProcess)?;
            }
        }

        if !registry.contains(proxy_class_name)? {
            return Err(ProxyError::ProxyClassNotLoaded(proxy_class_name.to_string()));
        }
        Ok(())
    }
}
