//! Entity class descriptions and the catalog that resolves class names to them.

pub mod catalog;
pub mod class;

pub use catalog::{InMemoryCatalog, MetadataCatalog};
pub use class::{ClassMetadata, FieldMapping};
