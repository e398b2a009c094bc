use super::ProxyLoader;
use super::artifact::read_artifact;
use crate::core::{ProxyError, Result};
use crate::proxy::ProxyClassRegistry;
use log::info;
use std::path::Path;
use std::sync::Arc;

/// Loads proxy artifacts from disk into a registry.
pub struct FileProxyLoader {
    registry: Arc<ProxyClassRegistry>,
}

impl FileProxyLoader {
    pub fn new(registry: Arc<ProxyClassRegistry>) -> Self {
        Self { registry }
    }
}

impl ProxyLoader for FileProxyLoader {
    fn artifact_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn load(&self, path: &Path, proxy_class_name: &str) -> Result<()> {
        let artifact = read_artifact(path)?;
        if artifact.shape.proxy_class_name != proxy_class_name {
            return Err(ProxyError::ArtifactCorrupt(
                path.to_path_buf(),
                format!(
                    "holds proxy class '{}', expected '{}'",
                    artifact.shape.proxy_class_name, proxy_class_name
                ),
            ));
        }
        info!(
            "Loaded proxy class '{}' from {} (generated {})",
            artifact.shape.proxy_class_name,
            path.display(),
            artifact.generated_at
        );
        self.registry.register_shape(Arc::new(artifact.shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;
    use crate::generator::{ArtifactTarget, ManifestGenerator, ProxyGenerator};
    use crate::metadata::ClassMetadata;
    use tempfile::TempDir;

    #[test]
    fn test_load_registers_generated_class() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Arc::new(ProxyClassRegistry::new());
        let generator = ManifestGenerator::new(temp_dir.path(), "Proxies", registry.clone());
        let loader = FileProxyLoader::new(registry.clone());

        let metadata = ClassMetadata::new("Coupon").id_field("code", DataType::Text);
        let path = generator.artifact_path("Coupon", None);
        assert!(!loader.artifact_exists(&path));

        generator.materialize(&metadata, ArtifactTarget::File(&path)).unwrap();
        assert!(loader.artifact_exists(&path));

        loader.load(&path, "Proxies::__CG__::Coupon").unwrap();
        assert!(registry.contains("Proxies::__CG__::Coupon").unwrap());
    }

    #[test]
    fn test_load_rejects_artifact_of_another_class() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Arc::new(ProxyClassRegistry::new());
        let generator = ManifestGenerator::new(temp_dir.path(), "Proxies", registry.clone());
        let loader = FileProxyLoader::new(registry.clone());

        let metadata = ClassMetadata::new("Coupon").id_field("code", DataType::Text);
        let path = generator.artifact_path("Voucher", None);
        generator.materialize(&metadata, ArtifactTarget::File(&path)).unwrap();

        let result = loader.load(&path, "Proxies::__CG__::Voucher");
        assert!(matches!(result, Err(ProxyError::ArtifactCorrupt(_, _))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_missing_artifact_fails() {
        let temp_dir = TempDir::new().unwrap();
        let loader = FileProxyLoader::new(Arc::new(ProxyClassRegistry::new()));

        let result = loader.load(
            &temp_dir.path().join("__CG__Coupon.proxy.json"),
            "Proxies::__CG__::Coupon",
        );
        assert!(matches!(result, Err(ProxyError::ArtifactNotFound(_))));
    }
}
