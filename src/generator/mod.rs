//! Proxy artifact generation and loading.
//!
//! A generated proxy class is persisted as a [`ProxyArtifact`]: a versioned
//! JSON manifest of the proxy's shape. Loading an artifact registers the
//! class with a [`ProxyClassRegistry`](crate::proxy::ProxyClassRegistry).

pub mod artifact;
pub mod loader;
pub mod manifest;

pub use artifact::{ARTIFACT_FORMAT_VERSION, ProxyArtifact, read_artifact, write_artifact};
pub use loader::FileProxyLoader;
pub use manifest::ManifestGenerator;

use crate::core::Result;
use crate::metadata::ClassMetadata;
use std::path::{Path, PathBuf};

/// Where `ProxyGenerator::materialize` puts a generated proxy class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactTarget<'a> {
    /// Write the artifact to this path, replacing any existing one.
    File(&'a Path),
    /// Make the class available in the running process without writing storage.
    InProcess,
}

pub trait ProxyGenerator: Send + Sync {
    /// Artifact path for `class_name`, under `target_dir` or the generator's default directory.
    fn artifact_path(&self, class_name: &str, target_dir: Option<&Path>) -> PathBuf;

    fn materialize(&self, metadata: &ClassMetadata, target: ArtifactTarget<'_>) -> Result<()>;
}

pub trait ProxyLoader: Send + Sync {
    fn artifact_exists(&self, path: &Path) -> bool;

    /// Loads the artifact at `path` into the process. Missing or corrupt
    /// artifacts are errors, and so is an artifact holding any class other
    /// than `proxy_class_name`.
    fn load(&self, path: &Path, proxy_class_name: &str) -> Result<()>;
}
