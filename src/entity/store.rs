use crate::core::{Identifier, Result, Value, describe_identifier};
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Field data of one entity, keyed by field name.
pub type EntityRow = HashMap<String, Value>;

/// Fetches the field data behind a proxy.
pub trait EntityLoader: Send + Sync {
    /// `Ok(None)` when no entity of `class_name` has this identifier.
    fn load(&self, class_name: &str, identifier: &Identifier) -> Result<Option<EntityRow>>;
}

/// Entity rows held in memory, keyed by class and identifier.
#[derive(Default)]
pub struct InMemoryEntityStore {
    rows: RwLock<HashMap<String, HashMap<String, EntityRow>>>,
    loads: AtomicUsize,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, class_name: &str, identifier: &Identifier, row: EntityRow) -> Result<()> {
        let mut rows = self.rows.write()?;
        rows.entry(class_name.to_string())
            .or_default()
            .insert(describe_identifier(identifier), row);
        Ok(())
    }

    pub fn remove(&self, class_name: &str, identifier: &Identifier) -> Result<Option<EntityRow>> {
        let mut rows = self.rows.write()?;
        Ok(rows
            .get_mut(class_name)
            .and_then(|class_rows| class_rows.remove(&describe_identifier(identifier))))
    }

    /// Number of `load` calls served so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl EntityLoader for InMemoryEntityStore {
    fn load(&self, class_name: &str, identifier: &Identifier) -> Result<Option<EntityRow>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.read()?;
        Ok(rows
            .get(class_name)
            .and_then(|class_rows| class_rows.get(&describe_identifier(identifier)))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_load_remove() {
        let store = InMemoryEntityStore::new();
        let mut identifier = Identifier::new();
        identifier.insert("id".to_string(), Value::Integer(1));
        let mut row = EntityRow::new();
        row.insert("title".to_string(), Value::from("Hello"));

        store.insert("Post", &identifier, row.clone()).unwrap();
        assert_eq!(store.load("Post", &identifier).unwrap(), Some(row));
        assert_eq!(store.load("Comment", &identifier).unwrap(), None);
        assert_eq!(store.load_count(), 2);

        assert!(store.remove("Post", &identifier).unwrap().is_some());
        assert_eq!(store.load("Post", &identifier).unwrap(), None);
    }
}
