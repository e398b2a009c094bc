use crate::core::{ProxyError, Result};
use crate::proxy::ProxyShape;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyArtifact {
    pub format_version: u32,
    /// RFC 3339 generation time
    pub generated_at: String,
    pub shape: ProxyShape,
}

impl ProxyArtifact {
    pub fn new(shape: ProxyShape) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            generated_at: Utc::now().to_rfc3339(),
            shape,
        }
    }
}

/// Writes `artifact` to `path` through a temp file in the same directory and
/// a rename, so readers see either the old artifact or the new one.
pub fn write_artifact(path: &Path, artifact: &ProxyArtifact) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| {
        ProxyError::Io(format!("Failed to create proxy directory '{}': {}", dir.display(), e))
    })?;

    let temp = NamedTempFile::new_in(dir)
        .map_err(|e| ProxyError::Io(format!("Failed to create temp file: {}", e)))?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, artifact)
            .map_err(|e| ProxyError::Io(format!("Failed to serialize proxy artifact: {}", e)))?;
        writer
            .flush()
            .map_err(|e| ProxyError::Io(format!("Failed to flush proxy artifact: {}", e)))?;
    }
    temp.as_file()
        .sync_all()
        .map_err(|e| ProxyError::Io(format!("Failed to sync proxy artifact: {}", e)))?;
    temp.persist(path).map_err(|e| {
        ProxyError::Io(format!("Failed to persist proxy artifact '{}': {}", path.display(), e))
    })?;
    Ok(())
}

pub fn read_artifact(path: &Path) -> Result<ProxyArtifact> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ProxyError::ArtifactNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ProxyError::Io(format!(
                "Failed to read proxy artifact '{}': {}",
                path.display(),
                e
            )));
        }
    };

    let artifact: ProxyArtifact = serde_json::from_slice(&data)
        .map_err(|e| ProxyError::ArtifactCorrupt(path.to_path_buf(), e.to_string()))?;

    if artifact.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(ProxyError::ArtifactCorrupt(
            path.to_path_buf(),
            format!(
                "unsupported format version {} (expected {})",
                artifact.format_version, ARTIFACT_FORMAT_VERSION
            ),
        ));
    }
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;
    use crate::metadata::ClassMetadata;
    use tempfile::TempDir;

    fn artifact() -> ProxyArtifact {
        let metadata = ClassMetadata::new("Invoice")
            .id_field("id", DataType::Integer)
            .field("amount", DataType::Float);
        ProxyArtifact::new(ProxyShape::from_metadata("Proxies", &metadata))
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("__CG__Invoice.proxy.json");

        write_artifact(&path, &artifact()).unwrap();
        let loaded = read_artifact(&path).unwrap();

        assert_eq!(loaded.shape.proxy_class_name, "Proxies::__CG__::Invoice");
        assert_eq!(loaded.shape.identifier_fields, vec!["id"]);
    }

    #[test]
    fn test_write_replaces_existing_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("__CG__Invoice.proxy.json");
        fs::write(&path, "stale").unwrap();

        write_artifact(&path, &artifact()).unwrap();
        assert!(read_artifact(&path).is_ok());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_and_corrupt_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("__CG__Invoice.proxy.json");
        assert!(matches!(read_artifact(&path), Err(ProxyError::ArtifactNotFound(_))));

        fs::write(&path, "{\"format_version\": 1").unwrap();
        assert!(matches!(read_artifact(&path), Err(ProxyError::ArtifactCorrupt(_, _))));

        let mut future = artifact();
        future.format_version = 99;
        write_artifact(&path, &future).unwrap();
        assert!(matches!(read_artifact(&path), Err(ProxyError::ArtifactCorrupt(_, _))));
    }
}
