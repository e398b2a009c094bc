use super::artifact::{ProxyArtifact, write_artifact};
use super::{ArtifactTarget, ProxyGenerator};
use crate::core::Result;
use crate::metadata::ClassMetadata;
use crate::proxy::{ProxyClassRegistry, ProxyShape, naming};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Generates proxy classes as JSON shape manifests.
pub struct ManifestGenerator {
    proxy_dir: PathBuf,
    namespace: String,
    registry: Arc<ProxyClassRegistry>,
}

impl ManifestGenerator {
    pub fn new<P: AsRef<Path>>(proxy_dir: P, namespace: &str, registry: Arc<ProxyClassRegistry>) -> Self {
        Self {
            proxy_dir: proxy_dir.as_ref().to_path_buf(),
            namespace: namespace.to_string(),
            registry,
        }
    }

    pub fn proxy_dir(&self) -> &Path {
        &self.proxy_dir
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl ProxyGenerator for ManifestGenerator {
    fn artifact_path(&self, class_name: &str, target_dir: Option<&Path>) -> PathBuf {
        naming::artifact_path(target_dir.unwrap_or(&self.proxy_dir), class_name)
    }

    fn materialize(&self, metadata: &ClassMetadata, target: ArtifactTarget<'_>) -> Result<()> {
        let shape = ProxyShape::from_metadata(&self.namespace, metadata);

        match target {
            ArtifactTarget::File(path) => {
                debug!(
                    "Writing proxy artifact for '{}' to {}",
                    shape.entity_class_name,
                    path.display()
                );
                write_artifact(path, &ProxyArtifact::new(shape))
            }
            ArtifactTarget::InProcess => {
                debug!("Registering proxy class '{}' in process", shape.proxy_class_name);
                self.registry.register_shape(Arc::new(shape))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;
    use crate::generator::read_artifact;
    use tempfile::TempDir;

    fn metadata() -> ClassMetadata {
        ClassMetadata::new("Shop::Product").id_field("sku", DataType::Text)
    }

    #[test]
    fn test_artifact_path_defaults_to_proxy_dir() {
        let registry = Arc::new(ProxyClassRegistry::new());
        let generator = ManifestGenerator::new("/var/proxies", "Proxies", registry);

        assert_eq!(
            generator.artifact_path("Shop::Product", None),
            PathBuf::from("/var/proxies/__CG__Shop.Product.proxy.json")
        );
        assert_eq!(
            generator.artifact_path("Shop::Product", Some(Path::new("/tmp/out"))),
            PathBuf::from("/tmp/out/__CG__Shop.Product.proxy.json")
        );
    }

    #[test]
    fn test_materialize_to_file_does_not_register() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Arc::new(ProxyClassRegistry::new());
        let generator = ManifestGenerator::new(temp_dir.path(), "Proxies", registry.clone());
        let path = generator.artifact_path("Shop::Product", None);

        generator.materialize(&metadata(), ArtifactTarget::File(&path)).unwrap();

        let artifact = read_artifact(&path).unwrap();
        assert_eq!(artifact.shape.proxy_class_name, "Proxies::__CG__::Shop::Product");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_materialize_in_process_registers_without_storage() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Arc::new(ProxyClassRegistry::new());
        let generator = ManifestGenerator::new(temp_dir.path(), "Proxies", registry.clone());

        generator.materialize(&metadata(), ArtifactTarget::InProcess).unwrap();

        assert!(registry.contains("Proxies::__CG__::Shop::Product").unwrap());
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
