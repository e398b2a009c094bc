use super::ClassMetadata;
use crate::core::{ProxyError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Source of entity class descriptions.
pub trait MetadataCatalog: Send + Sync {
    /// Resolves `class_name` (exact, alias or case variant) to its canonical description.
    fn metadata_for(&self, class_name: &str) -> Result<Arc<ClassMetadata>>;

    /// All known classes, sorted by canonical name.
    fn all_metadata(&self) -> Vec<Arc<ClassMetadata>>;
}

/// On-disk catalog layout: `{"classes": [...], "aliases": {"alias": "Class"}}`
#[derive(Debug, Deserialize)]
struct CatalogFile {
    classes: Vec<ClassMetadata>,
    #[serde(default)]
    aliases: HashMap<String, String>,
}

/// Catalog of class descriptions. Immutable once built, cheap to clone:
/// every `with_*` returns a new catalog and leaves the old one untouched.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    classes: Arc<HashMap<String, Arc<ClassMetadata>>>,
    /// lowercase name or alias -> canonical name
    folded: Arc<HashMap<String, String>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class. Fails if a class with the same name (ignoring case) exists
    /// or if an identifier field has no mapping.
    pub fn with_class(self, metadata: ClassMetadata) -> Result<Self> {
        let name = metadata.name().to_string();
        let folded_name = name.to_lowercase();

        if self.classes.contains_key(&name) || self.folded.contains_key(&folded_name) {
            return Err(ProxyError::ClassExists(name));
        }
        if let Some(field) = metadata.unmapped_identifier_fields().first() {
            return Err(ProxyError::UnknownField(name, field.to_string()));
        }

        let mut classes = (*self.classes).clone();
        classes.insert(name.clone(), Arc::new(metadata));
        let mut folded = (*self.folded).clone();
        folded.insert(folded_name, name);

        Ok(Self {
            classes: Arc::new(classes),
            folded: Arc::new(folded),
        })
    }

    /// Registers `alias` as another name for the class `target` resolves to.
    pub fn with_alias(self, alias: &str, target: &str) -> Result<Self> {
        let canonical = self.canonical_name(target)?.to_string();
        let folded_alias = alias.to_lowercase();

        if let Some(existing) = self.folded.get(&folded_alias) {
            if existing != &canonical {
                return Err(ProxyError::ClassExists(alias.to_string()));
            }
            return Ok(self);
        }

        let mut folded = (*self.folded).clone();
        folded.insert(folded_alias, canonical);

        Ok(Self {
            classes: self.classes,
            folded: Arc::new(folded),
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| ProxyError::Config(format!("Invalid catalog: {}", e)))?;

        let mut catalog = Self::new();
        for class in file.classes {
            catalog = catalog.with_class(class)?;
        }
        let mut aliases: Vec<_> = file.aliases.into_iter().collect();
        aliases.sort();
        for (alias, target) in aliases {
            catalog = catalog.with_alias(&alias, &target)?;
        }
        Ok(catalog)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            ProxyError::Io(format!("Failed to read catalog '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn canonical_name(&self, class_name: &str) -> Result<&str> {
        if let Some(metadata) = self.classes.get(class_name) {
            return Ok(metadata.name());
        }
        self.folded
            .get(&class_name.to_lowercase())
            .map(|name| name.as_str())
            .ok_or_else(|| ProxyError::ClassNotFound(class_name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl MetadataCatalog for InMemoryCatalog {
    fn metadata_for(&self, class_name: &str) -> Result<Arc<ClassMetadata>> {
        let canonical = self.canonical_name(class_name)?;
        self.classes
            .get(canonical)
            .cloned()
            .ok_or_else(|| ProxyError::ClassNotFound(class_name.to_string()))
    }

    fn all_metadata(&self) -> Vec<Arc<ClassMetadata>> {
        let mut all: Vec<_> = self.classes.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;

    fn user() -> ClassMetadata {
        ClassMetadata::new("User").id_field("id", DataType::Integer)
    }

    #[test]
    fn test_resolves_case_variants_and_aliases() {
        let catalog = InMemoryCatalog::new()
            .with_class(user())
            .unwrap()
            .with_alias("App:User", "User")
            .unwrap();

        assert_eq!(catalog.metadata_for("User").unwrap().name(), "User");
        assert_eq!(catalog.metadata_for("user").unwrap().name(), "User");
        assert_eq!(catalog.metadata_for("app:user").unwrap().name(), "User");
        assert!(matches!(
            catalog.metadata_for("Account"),
            Err(ProxyError::ClassNotFound(_))
        ));
    }

    #[test]
    fn test_copy_on_write() {
        let base = InMemoryCatalog::new();
        let extended = base.clone().with_class(user()).unwrap();

        assert!(base.is_empty());
        assert_eq!(extended.len(), 1);
    }

    #[test]
    fn test_rejects_duplicates_and_unmapped_identifiers() {
        let catalog = InMemoryCatalog::new().with_class(user()).unwrap();
        assert!(matches!(
            catalog.clone().with_class(ClassMetadata::new("USER")),
            Err(ProxyError::ClassExists(_))
        ));

        let broken: ClassMetadata = serde_json::from_str(
            r#"{"name": "Broken", "identifier": ["id"], "fields": [{"name": "name", "type": "text"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            catalog.with_class(broken),
            Err(ProxyError::UnknownField(_, field)) if field == "id"
        ));
    }

    #[test]
    fn test_from_json_str() {
        let catalog = InMemoryCatalog::from_json_str(
            r#"{
                "classes": [
                    {"name": "Post", "identifier": ["id"], "fields": [{"name": "id", "type": "integer"}]},
                    {"name": "BaseEntity", "mapped_superclass": true}
                ],
                "aliases": {"Blog:Post": "Post"}
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.metadata_for("blog:post").unwrap().name(), "Post");
        let names: Vec<_> = catalog
            .all_metadata()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(names, vec!["BaseEntity", "Post"]);
    }
}
