//! Entity-backed proxy definitions: proxies whose initializer loads the
//! entity row from an [`EntityLoader`].

pub mod definitions;
pub mod store;

pub use definitions::EntityProxyDefinitions;
pub use store::{EntityLoader, EntityRow, InMemoryEntityStore};
