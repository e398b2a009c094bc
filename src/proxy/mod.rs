//! Lazy proxy definitions, the proxy runtime contract and the factory that
//! ties them to generated proxy classes.

pub mod definition;
pub mod factory;
pub mod instance;
pub mod naming;
pub mod registry;
pub mod strategy;

pub use definition::{FieldSetter, ProxyDefinition, ProxyDefinitionBuilder};
pub use factory::{ProxyFactory, ProxyToolchain};
pub use instance::{Cloner, Initializer, LazyProxy, Proxy, ProxyShape};
pub use registry::{ProxyClassRegistry, ProxyConstructor};
pub use strategy::{AutogenerateMode, GenerationAction};
